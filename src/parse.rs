use rss::{Channel, Item};
use serde::Serialize;

use crate::error::ParseError;
use crate::model::{FeedFields, PostFields};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedFeed {
    pub feed: FeedFields,
    pub posts: Vec<PostFields>,
}

/// Extract the channel triple and one triple per `<item>`.
///
/// Titles are required (they key deduplication); a missing `link` or
/// `description` becomes an empty string.
pub fn parse(raw_xml: &str) -> Result<ParsedFeed, ParseError> {
    let channel = parse_channel(raw_xml)?;

    let title = channel.title().trim();
    if title.is_empty() { return Err(ParseError::MissingField("channel/title")); }
    let feed = FeedFields {
        title: title.to_string(),
        link: channel.link().trim().to_string(),
        description: channel.description().trim().to_string(),
    };

    let posts = channel.items().iter().map(post_fields).collect::<Result<Vec<_>, _>>()?;
    Ok(ParsedFeed { feed, posts })
}

fn parse_channel(raw_xml: &str) -> Result<Channel, ParseError> {
    Channel::read_from(raw_xml.as_bytes()).map_err(|e| match e {
        rss::Error::InvalidStartTag => ParseError::NotRss,
        other => ParseError::Malformed(other.to_string()),
    })
}

fn post_fields(item: &Item) -> Result<PostFields, ParseError> {
    let title = item.title().map(str::trim).filter(|t| !t.is_empty()).ok_or(ParseError::MissingField("item/title"))?;
    Ok(PostFields {
        title: title.to_string(),
        link: item.link().unwrap_or("").trim().to_string(),
        description: item.description().unwrap_or("").trim().to_string(),
    })
}
