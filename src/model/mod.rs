pub mod types;

pub use types::{ErrorCode, Feed, FeedFields, FeedId, OperationPhase, Post, PostFields, PostId};
