use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing::Instrument;

use crate::engine::Engine;
use crate::error::OperationError;
use crate::merge::merge_new_posts;
use crate::model::FeedId;
use crate::parse::{parse, ParsedFeed};
use crate::proxy::Transport;
use crate::telemetry::{self};
use crate::telemetry::ops::poll::Phase as PollPhase;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub feeds: usize,
    pub failed: usize,
    pub new_posts: usize,
}

impl<T: Transport> Engine<T> {
    /// One polling cycle over every tracked feed.
    ///
    /// Fetches run concurrently; each feed's posts are merged and appended as
    /// soon as its own fetch and parse finish. Failed feeds are logged and
    /// skipped.
    pub async fn poll_once(&self) -> CycleReport {
        let log = telemetry::poll();
        let tracked: Vec<(FeedId, String)> = self.lock_state().feeds().iter().map(|f| (f.id, f.url.clone())).collect();
        let mut report = CycleReport { feeds: tracked.len(), ..CycleReport::default() };

        let mut pending: FuturesUnordered<_> = tracked
            .into_iter()
            .map(|(feed_id, url)| async move {
                let res = self.refresh(&url).await;
                (feed_id, url, res)
            })
            .collect();

        while let Some((feed_id, url, res)) = pending.next().await {
            match res {
                Ok(parsed) => {
                    let _m = log.span_kv(&PollPhase::Merge, [("feed_id", feed_id.to_string())]).entered();
                    let mut st = self.lock_state();
                    let posts = merge_new_posts(parsed.posts, feed_id, st.posts());
                    report.new_posts += st.append_posts(feed_id, posts);
                }
                Err(e) => {
                    report.failed += 1;
                    log.feed_failed(feed_id, &url, &e.to_string());
                }
            }
        }

        log.cycle_summary(report.feeds, report.failed, report.new_posts);
        report
    }

    async fn refresh(&self, url: &str) -> Result<ParsedFeed, OperationError> {
        let log = telemetry::poll();
        let raw = self.fetch_document(url).instrument(log.span_kv(&PollPhase::FetchFeed, [("url", url.to_string())])).await?;
        let _p = log.span(&PollPhase::ParseFeed).entered();
        Ok(parse(&raw)?)
    }
}
