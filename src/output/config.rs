use std::env;

use crate::telemetry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl OutputConfig {
    pub fn from_env() -> Self {
        let format = if telemetry::config::json_mode() { OutputFormat::Json } else { OutputFormat::Text };
        OutputConfig { format, pretty: is_truthy(env::var("RSSAGG_OUTPUT_PRETTY").ok().as_deref()) }
    }
}

fn is_truthy(v: Option<&str>) -> bool {
    match v {
        Some(v) => v.eq_ignore_ascii_case("1") || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        for v in ["1", "true", "TRUE", "yes"] { assert!(is_truthy(Some(v))); }
        for v in ["0", "no", ""] { assert!(!is_truthy(Some(v))); }
        assert!(!is_truthy(None));
    }
}
