use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Inspect;

#[derive(Copy, Clone, Debug)]
pub enum Phase { ProxyUrl, ParseFile }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::ProxyUrl => "proxy_url", Phase::ParseFile => "parse_file" } }
    fn span(&self) -> Span { match self { Phase::ProxyUrl => info_span!("proxy_url"), Phase::ParseFile => info_span!("parse_file") } }
}

impl OpMarker for Inspect {
    const NAME: &'static str = "inspect";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("inspect") }
}
