// src/inspect.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::parse::parse;
use crate::proxy::ProxyGateway;
use crate::telemetry::{self};
use crate::telemetry::ops::inspect::Phase as InspectPhase;

/// `rssagg proxy-url <URL>`
#[derive(Args, Debug)]
pub struct ProxyUrlCmd {
    pub url: String,
}

/// `rssagg parse <FILE>`
#[derive(Args, Debug)]
pub struct ParseCmd {
    /// Local RSS document
    pub file: PathBuf,
}

#[derive(Serialize)]
struct ProxyUrl<'a> { target: &'a str, fetch_url: String }

pub fn proxy_url(gateway: &ProxyGateway, args: ProxyUrlCmd) -> Result<()> {
    let log = telemetry::inspect();
    let _g = log.root_span().entered();
    let _s = log.span(&InspectPhase::ProxyUrl).entered();
    let fetch_url = gateway.build_fetch_url(&args.url);
    if telemetry::config::json_mode() {
        log.result(&ProxyUrl { target: &args.url, fetch_url })?;
    } else {
        println!("{}", fetch_url);
    }
    Ok(())
}

pub fn parse_file(args: ParseCmd) -> Result<()> {
    let log = telemetry::inspect();
    let _g = log.root_span_kv([("file", args.file.display().to_string())]).entered();
    let _s = log.span(&InspectPhase::ParseFile).entered();
    let raw = std::fs::read_to_string(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let parsed = parse(&raw).with_context(|| format!("parsing {}", args.file.display()))?;
    if telemetry::config::json_mode() {
        log.result(&parsed)?;
    } else {
        println!("{} — {} ({})", parsed.feed.title, parsed.feed.link, parsed.feed.description);
        for p in &parsed.posts { println!("  • {} <{}>", p.title, p.link); }
    }
    Ok(())
}
