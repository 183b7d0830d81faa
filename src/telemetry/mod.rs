pub mod config;
pub mod ctx;
pub mod ops;

use ctx::LogCtx;

pub fn ingest() -> LogCtx<ops::ingest::Ingest> { LogCtx::new(config::logs_are_json()) }
pub fn poll() -> LogCtx<ops::poll::Poll> { LogCtx::new(config::logs_are_json()) }
pub fn inspect() -> LogCtx<ops::inspect::Inspect> { LogCtx::new(config::logs_are_json()) }
