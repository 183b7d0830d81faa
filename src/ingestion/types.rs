use serde::Serialize;

use crate::model::{ErrorCode, Feed, OperationPhase, Post};

/// A successfully ingested feed with the posts appended for it.
#[derive(Clone, Debug, Serialize)]
pub struct Submission {
    pub feed: Feed,
    pub posts: Vec<Post>,
}

// `rssagg add` result envelope, one per submitted URL
#[derive(Serialize)]
pub struct AddOutcome {
    pub url: String,
    pub phase: OperationPhase,
    pub errors: Vec<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}
