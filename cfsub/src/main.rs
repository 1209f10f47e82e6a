use anyhow::{Context, Result};
use cfsub_core::{CoreType, Fingerprint, Settings};
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{IdentityOptions, Layout};

const EXAMPLES: &str = "\
Examples:
  cfsub --convert 1 --number 3 -H Dusseldorf.kotick.site -b ./bin/xray
  cfsub --convert 1 --number 3 -H Dusseldorf.kotick.site -ct sing-box -b ./bin/sing-box
  cfsub --convert 1 --number 3 -H Dusseldorf.kotick.site -b ./bin/xray -ip discord.com
  cfsub -b ./bin/sing-box
  cfsub -b ./bin/sing-box -cn 2";

/// Single-dash multi-letter flags and the long flags they stand for.
const LEGACY_SHORTS: &[(&str, &str)] = &[
    ("-sp", "--socks-port"),
    ("-hp", "--http-port"),
    ("-cp", "--cutter-port"),
    ("-ip", "--internet-protocol"),
    ("-fp", "--fingerprint"),
    ("-uuid", "--UUID"),
    ("-ds", "--download-sort"),
    ("-us", "--upload-sort"),
    ("-ct", "--core-type"),
    ("-cn", "--config-number"),
];

#[derive(Debug, Parser)]
#[command(name = "cfsub", version, about = "Turn endpoint scan results into ranked proxy client configs", after_help = EXAMPLES)]
struct Cli {
    /// Optional config file (YAML). If omitted, loads ./cfsub.yaml if present.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Local socks inbound port (-sp)
    #[arg(long, value_name = "PORT", default_value_t = 10808)]
    socks_port: u16,
    /// Local http inbound port (-hp)
    #[arg(long, value_name = "PORT", default_value_t = 10809)]
    http_port: u16,
    /// Local tunnel redirect port, e.g. 22500; 0 disables (-cp)
    #[arg(long, value_name = "PORT", default_value_t = 0)]
    cutter_port: u16,
    /// Endpoint address to use instead of the scan results (-ip)
    #[arg(long = "internet-protocol", value_name = "ADDRESS")]
    ip: Option<String>,
    /// Remote port
    #[arg(long, short = 'p', default_value_t = 443)]
    port: u16,
    /// TLS fingerprint: chrome, firefox, safari, ios, android, edge, 360, qq, random, randomized (-fp)
    #[arg(long, value_name = "NAME", default_value = "chrome", value_parser = parse_fingerprint)]
    fingerprint: Fingerprint,
    /// TLS server name and websocket Host header
    #[arg(long, short = 'H', default_value = "Lille.kotick.site")]
    host: String,
    /// Client identity; fetched remotely or read from the fallback file when omitted (-uuid)
    #[arg(long = "UUID", value_name = "UUID")]
    uuid: Option<String>,
    /// Download metric to rank by: speed, latency, jitter (-ds)
    #[arg(long, value_name = "METRIC", default_value = "speed")]
    download_sort: String,
    /// Upload metric to rank by; overrides --download-sort when set (-us)
    #[arg(long, value_name = "METRIC")]
    upload_sort: Option<String>,
    /// Maximum number of ranked configs to write
    #[arg(long, short = 'n', default_value_t = 5)]
    number: usize,
    /// Client core: xray or sing-box (-ct)
    #[arg(long, value_name = "CORE", default_value = "xray")]
    core_type: String,
    /// Client executable to run against the generated configs
    #[arg(long, short = 'b', value_name = "PATH")]
    binpath: Option<String>,
    /// Which generated config to run; should not exceed --number (-cn)
    #[arg(long, value_name = "N", default_value_t = 1)]
    config_number: u32,
    /// Convert the latest scan result into configs; any non-empty value, even 0, enables it
    #[arg(long, short = 'c', value_name = "BOOL", action = ArgAction::Set, num_args = 0..=1,
          default_missing_value = "1", value_parser = parse_switch)]
    convert: Option<bool>,
}

impl Cli {
    fn settings(&self) -> Settings {
        let non_empty = |s: &Option<String>| s.clone().filter(|v| !v.is_empty());
        Settings {
            socks_port: self.socks_port,
            http_port: self.http_port,
            cutter_port: Some(self.cutter_port).filter(|p| *p != 0),
            ip_override: non_empty(&self.ip),
            port: self.port,
            fingerprint: self.fingerprint,
            host: self.host.clone(),
            uuid: non_empty(&self.uuid),
            download_sort: self.download_sort.clone(),
            upload_sort: non_empty(&self.upload_sort),
            number: self.number,
            core_type: self.core_type.clone(),
            binpath: non_empty(&self.binpath),
            config_number: self.config_number,
            convert: self.convert.unwrap_or(false),
        }
    }
}

fn parse_fingerprint(s: &str) -> Result<Fingerprint, String> { s.parse() }

/// Same truthiness the old tool had: only an empty value switches it off.
fn parse_switch(s: &str) -> Result<bool, String> { Ok(!s.is_empty()) }

/// Rewrite `-sp 10808` style flags to their long form so clap can parse them.
/// Nothing after a bare `--` is touched.
fn expand_legacy_shorts<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for arg in args {
        let arg: OsString = arg.into();
        if passthrough { out.push(arg); continue; }
        let Some(s) = arg.to_str() else { out.push(arg); continue };
        if s == "--" { passthrough = true; out.push(arg); continue; }
        let (flag, value) = match s.split_once('=') {
            Some((f, v)) => (f, Some(v)),
            None => (s, None),
        };
        match LEGACY_SHORTS.iter().find(|(short, _)| *short == flag) {
            Some((_, long)) => out.push(match value {
                Some(v) => format!("{long}={v}").into(),
                None => (*long).into(),
            }),
            None => out.push(arg),
        }
    }
    out
}

/// Locate and load the newest scan, fill the template for every selected endpoint, and
/// write the numbered configs. Clears the working directories on the way.
fn convert(settings: &Settings, layout: &Layout, id_opts: &IdentityOptions) -> Result<Vec<PathBuf>> {
    let core: CoreType = settings.core_type.parse()?;
    let latest = results::latest_result(&layout.results)?;
    let template = synth::load_template(&layout.templates, core)
        .with_context(|| format!("loading {} template", core))?;

    let chain = identity::default_chain(
        settings.uuid.as_deref(),
        &id_opts.url,
        id_opts.timeout,
        id_opts.fallback_file.clone(),
    );
    let id = identity::resolve(&chain)?;

    results::reset_working_dirs(&layout.working_dirs(), &latest)?;
    let rows = results::load_measurements(&latest)?;

    let key = ranking::SortKey::resolve(&settings.download_sort, settings.upload_sort.as_deref());
    let ranked = ranking::rank(rows, key);
    let endpoints = synth::Selection::choose(settings, &ranked).endpoints();
    let rendered = synth::render(&template, synth::schema_for(core), settings, &id, &endpoints)?;
    let paths = synth::write_all(&layout.configs, &rendered)?;
    info!(core = %core, latest = %latest.display(), written = paths.len(), "conversion finished");
    Ok(paths)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse_from(expand_legacy_shorts(std::env::args_os()));
    let cfg = config::load_config(cli.config.as_deref())?.unwrap_or_default();
    let layout = Layout::from_config(&cfg);
    let settings = cli.settings();

    if settings.convert {
        convert(&settings, &layout, &IdentityOptions::from_config(&cfg))?;
    }
    if let Some(bin) = &settings.binpath {
        dispatch::dispatch(bin, &layout.configs, settings.config_number);
    }
    Ok(())
}
