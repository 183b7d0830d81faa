//! In-memory transport and feed fixtures for engine tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use url::Url;

use crate::error::FetchError;
use crate::proxy::Transport;

/// Answers proxied requests from a table keyed by the *target* URL.
/// Unknown targets fail with a network error.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<HashMap<String, Result<String, FetchError>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub fn new() -> Self { Self::default() }

    pub fn set_feed(&self, target: &str, xml: String) {
        self.responses.lock().unwrap().insert(target.to_string(), Ok(xml));
    }

    pub fn set_error(&self, target: &str, err: FetchError) {
        self.responses.lock().unwrap().insert(target.to_string(), Err(err));
    }

    pub fn proxy_requests(&self) -> Vec<String> { self.requests.lock().unwrap().clone() }

    /// Target URLs requested so far, decoded from the proxy query string.
    pub fn targets(&self) -> Vec<String> {
        self.proxy_requests().iter().filter_map(|u| target_of(u)).collect()
    }
}

fn target_of(proxy_url: &str) -> Option<String> {
    let url = Url::parse(proxy_url).ok()?;
    url.query_pairs().find(|(k, _)| k == "url").map(|(_, v)| v.into_owned())
}

impl Transport for FakeTransport {
    async fn fetch(&self, proxy_url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(proxy_url.to_string());
        let target = target_of(proxy_url).unwrap_or_default();
        self.responses
            .lock()
            .unwrap()
            .get(&target)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Network(format!("no route to {target}"))))
    }
}

/// Minimal RSS 2.0 document with one `<item>` per title.
pub fn rss_doc(title: &str, items: &[&str]) -> String {
    let mut body = String::new();
    for (i, t) in items.iter().enumerate() {
        body.push_str(&format!(
            "<item><title>{t}</title><link>https://feeds.example/{i}</link><description>about {t}</description></item>"
        ));
    }
    format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>{title}</title><link>https://feeds.example/</link><description>{title} feed</description>{body}</channel></rss>"#
    )
}
