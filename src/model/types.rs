use std::fmt;

use serde::Serialize;
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeedId(Uuid);

impl FeedId {
    pub fn new() -> Self { FeedId(Uuid::new_v4()) }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    pub fn new() -> Self { PostId(Uuid::new_v4()) }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Channel-level fields extracted by the parser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeedFields {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// Item-level fields extracted by the parser, before an identity is assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostFields {
    pub title: String,
    pub link: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub id: FeedId,
    pub url: String,
    pub title: String,
    pub link: String,
    pub description: String,
}

impl Feed {
    pub fn new(url: impl Into<String>, fields: FeedFields) -> Self {
        Feed { id: FeedId::new(), url: url.into(), title: fields.title, link: fields.link, description: fields.description }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub feed_id: FeedId,
    pub title: String,
    pub link: String,
    pub description: String,
}

impl Post {
    pub fn new(feed_id: FeedId, fields: PostFields) -> Self {
        Post { id: PostId::new(), feed_id, title: fields.title, link: fields.link, description: fields.description }
    }
}

/// Phase of the single user-initiated ingestion. The polling loop never touches it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl OperationPhase {
    #[cfg(test)]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationPhase::Idle => "idle",
            OperationPhase::Submitting => "submitting",
            OperationPhase::Succeeded => "succeeded",
            OperationPhase::Failed => "failed",
        }
    }
}

/// Stable identifiers handed to the UI for localization.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "networkError")]
    NetworkError,
    #[serde(rename = "urlDownloadError")]
    UrlDownloadError,
    #[serde(rename = "invalidUrlFormat")]
    InvalidUrlFormat,
    #[serde(rename = "urlIsRequired")]
    UrlIsRequired,
    #[serde(rename = "urlIsDuplicate")]
    UrlIsDuplicate,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "networkError",
            ErrorCode::UrlDownloadError => "urlDownloadError",
            ErrorCode::InvalidUrlFormat => "invalidUrlFormat",
            ErrorCode::UrlIsRequired => "urlIsRequired",
            ErrorCode::UrlIsDuplicate => "urlIsDuplicate",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_as_stable_identifiers() {
        let s = serde_json::to_string(&[ErrorCode::NetworkError, ErrorCode::UrlIsDuplicate]).unwrap();
        assert_eq!(s, r#"["networkError","urlIsDuplicate"]"#);
        assert_eq!(ErrorCode::InvalidUrlFormat.to_string(), "invalidUrlFormat");
    }

    #[test]
    fn post_serializes_feed_id_in_camel_case() {
        let feed_id = FeedId::new();
        let post = Post::new(feed_id, PostFields { title: "t".into(), link: "l".into(), description: "d".into() });
        let v = serde_json::to_value(&post).unwrap();
        assert_eq!(v["feedId"], serde_json::json!(feed_id.to_string()));
        assert_eq!(v["title"], "t");
    }

    #[test]
    fn identities_are_distinct() {
        assert_ne!(FeedId::new(), FeedId::new());
        assert_ne!(PostId::new(), PostId::new());
    }
}
