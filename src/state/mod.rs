//! Process-wide aggregate of feeds and posts.
//!
//! `feeds` and `posts` are append-only. Every mutation is announced on a
//! broadcast channel so rendering collaborators can subscribe instead of
//! polling the state.

use std::collections::HashSet;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::{OperationError, ValidationError};
use crate::model::{ErrorCode, Feed, FeedId, OperationPhase, Post};

mod events;

pub use events::StateEvent;

const EVENT_CAPACITY: usize = 256;

pub struct AggregateState {
    feeds: Vec<Feed>,
    posts: Vec<Post>,
    phase: OperationPhase,
    last_error: Option<OperationError>,
    events: broadcast::Sender<StateEvent>,
}

/// Read-only copy handed to consumers.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub feeds: Vec<Feed>,
    pub posts: Vec<Post>,
    pub operation_phase: OperationPhase,
    pub last_error: Option<ErrorCode>,
}

impl AggregateState {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        AggregateState { feeds: Vec::new(), posts: Vec::new(), phase: OperationPhase::Idle, last_error: None, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> { self.events.subscribe() }

    pub fn feeds(&self) -> &[Feed] { &self.feeds }
    pub fn posts(&self) -> &[Post] { &self.posts }
    pub fn phase(&self) -> OperationPhase { self.phase }
    #[cfg(test)]
    pub fn last_error(&self) -> Option<&OperationError> { self.last_error.as_ref() }

    pub fn feed_urls(&self) -> HashSet<String> { self.feeds.iter().map(|f| f.url.clone()).collect() }

    pub fn has_feed(&self, id: FeedId) -> bool { self.feeds.iter().any(|f| f.id == id) }

    pub fn begin_operation(&mut self) {
        self.last_error = None;
        self.set_phase(OperationPhase::Submitting);
    }

    pub fn succeed_operation(&mut self) {
        self.last_error = None;
        self.set_phase(OperationPhase::Succeeded);
    }

    pub fn fail_operation(&mut self, err: OperationError) {
        self.last_error = Some(err);
        self.set_phase(OperationPhase::Failed);
    }

    /// Append a feed; the url must not be tracked yet.
    pub fn push_feed(&mut self, feed: Feed) -> Result<(), ValidationError> {
        if self.feeds.iter().any(|f| f.url == feed.url) { return Err(ValidationError::DuplicateUrl); }
        self.feeds.push(feed.clone());
        let _ = self.events.send(StateEvent::FeedAdded(feed));
        Ok(())
    }

    /// Append already-merged posts of one feed in a single step. Returns how many were appended.
    pub fn append_posts(&mut self, feed_id: FeedId, posts: Vec<Post>) -> usize {
        debug_assert!(self.has_feed(feed_id), "posts appended for unknown feed {feed_id}");
        debug_assert!(posts.iter().all(|p| p.feed_id == feed_id));
        if posts.is_empty() { return 0; }
        let n = posts.len();
        self.posts.extend(posts.iter().cloned());
        let _ = self.events.send(StateEvent::PostsAdded { feed_id, posts });
        n
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            feeds: self.feeds.clone(),
            posts: self.posts.clone(),
            operation_phase: self.phase,
            last_error: self.last_error.as_ref().map(OperationError::code),
        }
    }

    fn set_phase(&mut self, phase: OperationPhase) {
        self.phase = phase;
        let _ = self.events.send(StateEvent::PhaseChanged { phase, error: self.last_error.clone() });
    }
}

impl Default for AggregateState {
    fn default() -> Self { Self::new() }
}
