use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Ingest;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Validate, Fetch, Parse, Merge, Commit }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Validate => "validate",
        Phase::Fetch => "fetch",
        Phase::Parse => "parse",
        Phase::Merge => "merge",
        Phase::Commit => "commit",
    }}
    fn span(&self) -> Span { match self {
        Phase::Validate => info_span!("validate"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Parse => info_span!("parse"),
        Phase::Merge => info_span!("merge"),
        Phase::Commit => info_span!("commit"),
    }}
}

impl OpMarker for Ingest {
    const NAME: &'static str = "ingest";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("ingest") }
}
