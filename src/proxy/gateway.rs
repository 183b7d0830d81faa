use url::Url;

pub const DEFAULT_PROXY_ENDPOINT: &str = "https://allorigins.hexlet.app/get";

/// Builds fetch URLs that route through a CORS-bypass proxy.
#[derive(Clone, Debug)]
pub struct ProxyGateway {
    endpoint: Url,
}

impl ProxyGateway {
    pub fn new(endpoint: Url) -> Self { ProxyGateway { endpoint } }

    pub fn endpoint(&self) -> &Url { &self.endpoint }

    /// `<endpoint>?url=<target>&disableCache=true`, form-urlencoded.
    /// Existing `url`/`disableCache` params on the endpoint are replaced; others are kept.
    pub fn build_fetch_url(&self, target: &str) -> String {
        let mut out = self.endpoint.clone();
        let kept: Vec<(String, String)> = self
            .endpoint
            .query_pairs()
            .filter(|(k, _)| k != "url" && k != "disableCache")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        out.set_query(None);
        {
            let mut q = out.query_pairs_mut();
            for (k, v) in &kept { q.append_pair(k, v); }
            q.append_pair("url", target);
            q.append_pair("disableCache", "true");
        }
        out.into()
    }
}

impl Default for ProxyGateway {
    fn default() -> Self {
        // constant is a valid absolute URL
        let endpoint = Url::parse(DEFAULT_PROXY_ENDPOINT).expect("default proxy endpoint parses");
        ProxyGateway { endpoint }
    }
}
