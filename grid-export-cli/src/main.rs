//! `grid-export` entry point.
//!
//! Connects to a NIOS Grid Master, retrieves every authoritative zone from
//! all DNS views, collects each zone's A and CNAME records and writes them
//! to a CSV file. Zones are processed strictly one at a time; a zone that
//! fails to fetch leaves its rows partial while the run carries on, and
//! whatever was collected is written even after partial failures.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use grid_export_wapi::{SessionConfig, WapiSession, collect_all, fetch_zones, reduce_zones, save_report};

/// Environment variable consulted for the password before prompting.
const PASSWORD_ENV: &str = "WAPI_PASSWORD";

#[derive(Parser)]
#[command(name = "grid-export", version)]
#[command(
    about = "Connects to an Infoblox NIOS Grid, retrieves all zones from all DNS views, \
             then retrieves each zone's A and CNAME records and writes them to a CSV file."
)]
#[command(after_help = "Examples:\n  \
    grid-export -k -w 2.10 -m 500 -u aensminger -o example.csv mygrid.lab\n  \
    grid-export -w 2.12 -m 1000 -u foouser -o example2.csv 192.168.1.133")]
struct Cli {
    /// The hostname or IP address of the Grid Master/Grid Master Candidate
    #[arg(value_name = "HOST")]
    host: String,

    /// The username for authentication
    #[arg(short, long, default_value = "admin")]
    user: String,

    /// WAPI version to use
    #[arg(short = 'w', long = "wapi-version", value_name = "VERSION", default_value = "2.12.2")]
    wapi_version: String,

    /// Number of results per request
    #[arg(
        short,
        long,
        value_name = "MAX-RESULTS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_results: u32,

    /// Disable SSL verification
    #[arg(short = 'k', long = "insecure")]
    insecure: bool,

    /// CSV output filename
    #[arg(short, long, value_name = "FILE", default_value = "zones.csv")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let password = resolve_password(&cli.user)?;
    let output = ensure_csv_extension(cli.output);

    let config = SessionConfig {
        host: cli.host,
        wapi_version: cli.wapi_version,
        username: cli.user,
        password,
        max_results: cli.max_results,
        insecure_tls: cli.insecure,
    };

    let started = Instant::now();

    tracing::info!(
        "logging in to {} as {} (WAPI v{})",
        config.host,
        config.username,
        config.wapi_version.trim_start_matches('v')
    );
    let session = WapiSession::login(&config).await.context("login failed")?;

    tracing::info!("gathering all authoritative zones from {}", session.host());
    let raw_zones = fetch_zones(&session)
        .await
        .context("zone listing failed")?;

    let mut zones = reduce_zones(raw_zones);
    tracing::info!("gathering A and CNAME records for {} zones", zones.len());
    let failures = collect_all(&session, &mut zones).await;

    if let Err(e) = session.logout().await {
        tracing::warn!("{e}");
    }

    save_report(&output, &zones)
        .with_context(|| format!("could not write {}", output.display()))?;

    let rows: usize = zones.iter().map(|(_, zone)| zone.records.len()).sum();
    tracing::info!(
        "wrote {rows} rows for {} zones to {} ({} fetches failed) in {:.2}s",
        zones.len(),
        output.display(),
        failures.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Take the password from `WAPI_PASSWORD`, falling back to a prompt on the
/// terminal.
fn resolve_password(user: &str) -> anyhow::Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }

    eprint!("Enter the password for user '{user}': ");
    std::io::stderr().flush().context("could not write prompt")?;

    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("could not read password")?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

/// Append `.csv` when the output filename has no such extension.
fn ensure_csv_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
        path
    } else {
        let mut name = path.file_name().map_or_else(
            || std::ffi::OsString::from("zones"),
            std::ffi::OsStr::to_os_string,
        );
        name.push(".csv");
        path.with_file_name(name)
    }
}
