use crate::error::OperationError;
use crate::model::{Feed, FeedId, OperationPhase, Post};

/// Change descriptor pushed to subscribers after each state mutation.
#[derive(Clone, Debug)]
pub enum StateEvent {
    FeedAdded(Feed),
    PostsAdded { feed_id: FeedId, posts: Vec<Post> },
    PhaseChanged { phase: OperationPhase, error: Option<OperationError> },
}
