//! One-shot "add feed" flow: validate → fetch → parse → merge → commit.
//!
//! Drives `operationPhase` through `submitting` to `succeeded` or `failed`.
//! Validation failures never touch the network.

use anyhow::{bail, Result};
use clap::Args;
use tracing::Instrument;

use crate::engine::Engine;
use crate::error::{OperationError, ValidationErrors};
use crate::merge::merge_new_posts;
use crate::model::Feed;
use crate::parse::parse;
use crate::proxy::Transport;
use crate::state::AggregateState;
use crate::telemetry::{self};
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::ingest::{Ingest, Phase as IngestPhase};
use crate::validate::validate;

mod types;

pub use types::{AddOutcome, Submission};

/// rssagg add <URL>...
#[derive(Args, Debug)]
pub struct IngestCmd {
    /// Feed URLs, submitted in order
    #[arg(required = true)]
    pub urls: Vec<String>,
}

pub async fn run<T: Transport>(engine: &Engine<T>, args: IngestCmd) -> Result<()> {
    let log = telemetry::ingest();
    let mut failed = 0usize;
    for url in args.urls {
        let outcome = match engine.submit(&url).await {
            Ok(sub) => AddOutcome { url, phase: engine.snapshot().operation_phase, errors: Vec::new(), reason: None, submission: Some(sub) },
            Err(e) => {
                failed += 1;
                AddOutcome { url, phase: engine.snapshot().operation_phase, errors: e.codes(), reason: Some(e.to_string()), submission: None }
            }
        };
        if telemetry::config::json_mode() {
            log.result(&outcome)?;
        } else if let Some(sub) = &outcome.submission {
            log.info(format!("📡 {} — {}", sub.feed.title, sub.feed.url));
            for p in &sub.posts { log.info(format!("  • {} <{}>", p.title, p.link)); }
        }
    }
    if failed > 0 { bail!("{} feed(s) could not be added", failed); }
    Ok(())
}

impl<T: Transport> Engine<T> {
    /// Add the feed at `url` and all of its posts.
    ///
    /// The outcome is also recorded in the shared state (`operationPhase`,
    /// `lastError`) for subscribers.
    pub async fn submit(&self, url: &str) -> Result<Submission, OperationError> {
        let log = telemetry::ingest();
        let span = log.root_span_kv([("url", url.to_string())]);
        async {
            let result = self.ingest(&log, url).await;
            match &result {
                Ok(sub) => log.accepted(sub.feed.id, url, sub.posts.len()),
                Err(e) => log.rejected(url, &e.codes(), &e.to_string()),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn ingest(&self, log: &LogCtx<Ingest>, url: &str) -> Result<Submission, OperationError> {
        let existing = {
            let mut st = self.lock_state();
            st.begin_operation();
            st.feed_urls()
        };

        let checked = { let _s = log.span(&IngestPhase::Validate).entered(); validate(url, &existing) };
        if let Err(errs) = checked {
            return Err(fail(&mut self.lock_state(), errs.into()));
        }

        let raw = match self.fetch_document(url).instrument(log.span(&IngestPhase::Fetch)).await {
            Ok(raw) => raw,
            Err(e) => return Err(fail(&mut self.lock_state(), e.into())),
        };

        let parsed = { let _s = log.span(&IngestPhase::Parse).entered(); parse(&raw) };
        let parsed = match parsed {
            Ok(p) => p,
            Err(e) => return Err(fail(&mut self.lock_state(), e.into())),
        };

        let _c = log.span(&IngestPhase::Commit).entered();
        let mut st = self.lock_state();
        let feed = Feed::new(url, parsed.feed);
        // another submission may have committed the same url while this one was fetching
        if let Err(dup) = st.push_feed(feed.clone()) {
            return Err(fail(&mut st, ValidationErrors::single(dup).into()));
        }
        let posts = {
            let _m = log.span_kv(&IngestPhase::Merge, [("candidates", parsed.posts.len().to_string())]).entered();
            merge_new_posts(parsed.posts, feed.id, st.posts())
        };
        st.append_posts(feed.id, posts.clone());
        st.succeed_operation();
        Ok(Submission { feed, posts })
    }
}

fn fail(st: &mut AggregateState, err: OperationError) -> OperationError {
    st.fail_operation(err.clone());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::{DownloadError, FetchError, ParseError};
    use crate::model::{ErrorCode, OperationPhase};
    use crate::state::StateEvent;
    use crate::test_utils::{rss_doc, FakeTransport};

    const URL: &str = "https://example.com/feed.xml";

    fn engine(fake: &FakeTransport) -> Engine<FakeTransport> { Engine::new(EngineConfig::default(), fake.clone()) }

    #[tokio::test]
    async fn adds_feed_with_its_posts() {
        let fake = FakeTransport::new();
        fake.set_feed(URL, rss_doc("Example", &["First", "Second"]));
        let engine = engine(&fake);

        let sub = engine.submit(URL).await.unwrap();
        assert_eq!(sub.feed.title, "Example");
        assert_eq!(sub.feed.url, URL);

        let snap = engine.snapshot();
        assert_eq!(snap.feeds.len(), 1);
        assert_eq!(snap.feeds[0].title, "Example");
        assert_eq!(snap.posts.len(), 2);
        assert!(snap.posts.iter().all(|p| p.feed_id == snap.feeds[0].id));
        assert_eq!(snap.posts[0].title, "First");
        assert_eq!(snap.posts[1].title, "Second");
        assert_eq!(snap.operation_phase, OperationPhase::Succeeded);
        assert_eq!(snap.last_error, None);
    }

    #[tokio::test]
    async fn duplicate_url_fails_without_network() {
        let fake = FakeTransport::new();
        fake.set_feed(URL, rss_doc("Example", &["First"]));
        let engine = engine(&fake);
        engine.submit(URL).await.unwrap();
        let calls = fake.proxy_requests().len();

        let err = engine.submit(URL).await.unwrap_err();
        assert_eq!(err.codes(), vec![ErrorCode::UrlIsDuplicate]);
        assert_eq!(fake.proxy_requests().len(), calls);

        let snap = engine.snapshot();
        assert_eq!(snap.operation_phase, OperationPhase::Failed);
        assert_eq!(snap.last_error, Some(ErrorCode::UrlIsDuplicate));
        assert_eq!(snap.feeds.len(), 1);
        assert_eq!(snap.posts.len(), 1);
    }

    #[tokio::test]
    async fn malformed_and_empty_urls_fail_validation() {
        let fake = FakeTransport::new();
        let engine = engine(&fake);

        let err = engine.submit("not a url").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidUrlFormat);
        let err = engine.submit("").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UrlIsRequired);

        assert!(fake.proxy_requests().is_empty());
        assert_eq!(engine.snapshot().operation_phase, OperationPhase::Failed);
    }

    #[tokio::test]
    async fn connectivity_failure_is_network_error() {
        let fake = FakeTransport::new();
        fake.set_error(URL, FetchError::Network("connection refused".into()));
        let engine = engine(&fake);

        let err = engine.submit(URL).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NetworkError);
        let snap = engine.snapshot();
        assert_eq!(snap.last_error, Some(ErrorCode::NetworkError));
        assert!(snap.feeds.is_empty());
    }

    #[tokio::test]
    async fn bad_status_and_bad_xml_are_download_errors() {
        let fake = FakeTransport::new();
        fake.set_error(URL, FetchError::UpstreamStatus(404));
        fake.set_feed("https://example.com/page.html", "<html><body>hi</body></html>".into());
        let engine = engine(&fake);

        let err = engine.submit(URL).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UrlDownloadError);
        assert!(matches!(err, OperationError::DownloadOrParse(DownloadError::Fetch(FetchError::UpstreamStatus(404)))));

        let err = engine.submit("https://example.com/page.html").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UrlDownloadError);
        assert!(matches!(err, OperationError::DownloadOrParse(DownloadError::Parse(ParseError::NotRss))));
        assert!(engine.snapshot().feeds.is_empty());
    }

    #[tokio::test]
    async fn next_submission_clears_previous_error() {
        let fake = FakeTransport::new();
        let engine = engine(&fake);
        engine.submit(URL).await.unwrap_err();
        assert_eq!(engine.snapshot().last_error, Some(ErrorCode::NetworkError));

        fake.set_feed(URL, rss_doc("Example", &[]));
        engine.submit(URL).await.unwrap();
        let snap = engine.snapshot();
        assert_eq!(snap.operation_phase, OperationPhase::Succeeded);
        assert_eq!(snap.last_error, None);
    }

    #[tokio::test]
    async fn phase_changes_are_published() {
        let fake = FakeTransport::new();
        fake.set_feed(URL, rss_doc("Example", &["First"]));
        let engine = engine(&fake);
        let mut rx = engine.subscribe();

        engine.submit(URL).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            seen.push(match ev {
                StateEvent::PhaseChanged { phase, .. } => phase.as_str().to_string(),
                StateEvent::FeedAdded(_) => "feed".to_string(),
                StateEvent::PostsAdded { posts, .. } => format!("posts:{}", posts.len()),
            });
        }
        assert_eq!(seen, ["submitting", "feed", "posts:1", "succeeded"]);
    }

    #[tokio::test]
    async fn concurrent_submissions_of_one_url_add_it_once() {
        let fake = FakeTransport::new();
        fake.set_feed(URL, rss_doc("Example", &["First"]));
        let engine = engine(&fake);

        let (a, b) = tokio::join!(engine.submit(URL), engine.submit(URL));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let snap = engine.snapshot();
        assert_eq!(snap.feeds.len(), 1);
        assert_eq!(snap.posts.len(), 1);
    }
}
