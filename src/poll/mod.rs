//! Background refresh of every tracked feed.

use std::future::Future;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::engine::Engine;
use crate::model::{FeedId, Post};
use crate::proxy::Transport;
use crate::state::StateEvent;
use crate::telemetry::{self};
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::poll::Poll;

mod cycle;
mod handle;

pub use cycle::CycleReport;
pub use handle::PollHandle;

/// rssagg watch <URL>...
#[derive(Args, Debug)]
pub struct WatchCmd {
    /// Feed URLs to add before polling starts
    #[arg(required = true)]
    pub urls: Vec<String>,
}

#[derive(Serialize)]
struct NewPosts<'a> {
    feed_id: FeedId,
    posts: &'a [Post],
}

pub async fn run<T: Transport>(engine: &Engine<T>, args: WatchCmd) -> Result<()> {
    for url in &args.urls {
        // rejections are logged by submit
        let _ = engine.submit(url).await;
    }
    if engine.snapshot().feeds.is_empty() { bail!("no feed could be added; nothing to watch"); }
    watch(engine, tokio::signal::ctrl_c()).await
}

/// Poll in the background and report new posts until `stop` resolves.
/// The loop is shut down on every exit path.
async fn watch<T: Transport, S: Future>(engine: &Engine<T>, stop: S) -> Result<()> {
    let log = telemetry::poll();
    let rx = engine.subscribe();
    let handle = engine.spawn_polling()?;
    log.info(format!(
        "👀 Watching {} feed(s) every {}s — Ctrl-C to stop",
        engine.snapshot().feeds.len(),
        engine.config().poll_interval.as_secs()
    ));

    let outcome = follow(&log, rx, stop).await;
    handle.shutdown().await;
    outcome
}

async fn follow<S: Future>(log: &LogCtx<Poll>, mut rx: Receiver<StateEvent>, stop: S) -> Result<()> {
    tokio::pin!(stop);
    loop {
        tokio::select! {
            _ = &mut stop => return Ok(()),
            ev = rx.recv() => match ev {
                Ok(StateEvent::PostsAdded { feed_id, posts }) => {
                    if telemetry::config::json_mode() {
                        log.result(&NewPosts { feed_id, posts: &posts })?;
                    } else {
                        for p in &posts { log.info(format!("🆕 {} <{}>", p.title, p.link)); }
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(n)) => log.warn(format!("missed {} state event(s)", n)),
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }
}
