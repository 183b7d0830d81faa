//! Shared handle over the aggregate state, the proxy gateway and the transport.
//!
//! Ingestion (`crate::ingestion`) and polling (`crate::poll`) add their
//! operations as further `impl` blocks on [`Engine`]. All state mutation goes
//! through one mutex and never spans a suspension point.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::config::EngineConfig;
use crate::error::FetchError;
use crate::proxy::{HttpTransport, ProxyGateway, Transport};
use crate::state::{AggregateState, StateEvent, StateSnapshot};

pub struct Engine<T> {
    pub(crate) inner: Arc<Inner<T>>,
}

pub(crate) struct Inner<T> {
    pub(crate) state: Mutex<AggregateState>,
    pub(crate) gateway: ProxyGateway,
    pub(crate) transport: T,
    pub(crate) config: EngineConfig,
    pub(crate) polling: AtomicBool,
}

impl<T> Clone for Engine<T> {
    fn clone(&self) -> Self { Engine { inner: Arc::clone(&self.inner) } }
}

impl Engine<HttpTransport> {
    pub fn from_config(config: EngineConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(config.fetch_timeout)?;
        Ok(Engine::new(config, transport))
    }
}

impl<T: Transport> Engine<T> {
    pub fn new(config: EngineConfig, transport: T) -> Self {
        let inner = Inner {
            state: Mutex::new(AggregateState::new()),
            gateway: ProxyGateway::new(config.proxy_endpoint.clone()),
            transport,
            config,
            polling: AtomicBool::new(false),
        };
        Engine { inner: Arc::new(inner) }
    }

    pub fn config(&self) -> &EngineConfig { &self.inner.config }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> { self.lock_state().subscribe() }

    pub fn snapshot(&self) -> StateSnapshot { self.lock_state().snapshot() }

    /// A panic while holding the lock leaves the append-only vectors intact, so poisoning is ignored.
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, AggregateState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route `target_url` through the proxy and return the wrapped document.
    pub(crate) async fn fetch_document(&self, target_url: &str) -> Result<String, FetchError> {
        let proxy_url = self.inner.gateway.build_fetch_url(target_url);
        self.inner.transport.fetch(&proxy_url).await
    }
}
