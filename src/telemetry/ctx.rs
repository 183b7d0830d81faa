use anyhow::Result;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{info, debug, warn, Span};

use crate::model::{ErrorCode, FeedId};
use crate::output::{Emitter, Envelope, OutputConfig};

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

pub struct LogCtx<O: OpMarker> {
    json: bool,
    _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    pub(crate) fn new(json: bool) -> Self { LogCtx { json, _marker: PhantomData } }

    fn op_name(&self) -> &'static str { O::NAME }

    pub fn root_span(&self) -> Span { O::root_span() }

    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.root_span();
        let details = kv_to_string(fields);
        if details.is_empty() {
            info!(op = %self.op_name(), "start");
        } else {
            info!(op = %self.op_name(), details = %details, "start");
        }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span { ph.span() }

    pub fn span_kv<'a, T>(&self, ph: &O::Phase, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.span(ph);
        let details = kv_to_string(fields);
        if details.is_empty() {
            debug!(op = %self.op_name(), phase = ph.name(), "span_start");
        } else {
            debug!(op = %self.op_name(), phase = ph.name(), details = %details, "span_start");
        }
        span
    }

    pub fn info(&self, msg: impl AsRef<str>) { if self.json { info!(op = %self.op_name(), "{}", msg.as_ref()); } else { info!("{}", msg.as_ref()); } }
    pub fn warn(&self, msg: impl AsRef<str>) { if self.json { warn!(op = %self.op_name(), "{}", msg.as_ref()); } else { warn!("{}", msg.as_ref()); } }

    /// Emit a result envelope on stdout.
    pub fn result<T: Serialize>(&self, result: &T) -> Result<()> {
        let env = Envelope::result(self.op_name(), result)?;
        Emitter::from_config(OutputConfig::from_env()).emit(&env)?;
        Ok(())
    }
}

impl LogCtx<crate::telemetry::ops::ingest::Ingest> {
    pub fn accepted(&self, feed_id: FeedId, url: &str, posts: usize) {
        if self.json { info!(op = %self.op_name(), %feed_id, url, posts, "feed_added"); }
        else { info!("➕ Feed {} added from {} with {} post(s)", feed_id, url, posts); }
    }

    pub fn rejected(&self, url: &str, codes: &[ErrorCode], reason: &str) {
        let codes: Vec<&str> = codes.iter().map(ErrorCode::as_str).collect();
        let codes = codes.join(",");
        if self.json { warn!(op = %self.op_name(), url, codes = %codes, reason, "feed_rejected"); }
        else { warn!("❌ {} rejected ({}): {}", url, codes, reason); }
    }
}

impl LogCtx<crate::telemetry::ops::poll::Poll> {
    pub fn feed_failed(&self, feed_id: FeedId, url: &str, reason: &str) {
        if self.json { warn!(op = %self.op_name(), %feed_id, url, reason, "feed_skipped"); }
        else { warn!("↩️ skip feed {} ({}): {}", feed_id, url, reason); }
    }

    pub fn cycle_summary(&self, feeds: usize, failed: usize, new_posts: usize) {
        if self.json { info!(op = %self.op_name(), feeds, failed, new_posts, "cycle_summary"); }
        else { info!("🔁 Poll cycle — feeds={} failed={} new_posts={}", feeds, failed, new_posts); }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    let mut parts: Vec<String> = Vec::new();
    for (k, v) in kv { parts.push(format!("{}={}", k, v)); }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_pairs_render_in_order() {
        let s = kv_to_string([("feed_id", "7".to_string()), ("url", "https://a.example/rss".to_string())]);
        assert_eq!(s, "feed_id=7 url=https://a.example/rss");
        assert_eq!(kv_to_string(std::iter::empty::<(&str, String)>()), "");
    }
}
