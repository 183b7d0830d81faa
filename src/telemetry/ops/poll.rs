use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Poll;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Cycle, FetchFeed, ParseFeed, Merge, Sleep }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Cycle => "cycle",
        Phase::FetchFeed => "fetch_feed",
        Phase::ParseFeed => "parse_feed",
        Phase::Merge => "merge",
        Phase::Sleep => "sleep",
    }}
    fn span(&self) -> Span { match self {
        Phase::Cycle => info_span!("cycle"),
        Phase::FetchFeed => info_span!("fetch_feed"),
        Phase::ParseFeed => info_span!("parse_feed"),
        Phase::Merge => info_span!("merge"),
        Phase::Sleep => info_span!("sleep"),
    }}
}

impl OpMarker for Poll {
    const NAME: &'static str = "poll";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("poll") }
}
