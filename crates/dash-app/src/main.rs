// File: crates/dash-app/src/main.rs
// Summary: `tickerdash` binary; parses flags, fetches prices and writes the dashboard.

use anyhow::{Context, Result};
use clap::Parser;
use dash_app::config::{load_dotenv, Cli, Settings};
use dash_app::run::{run, summary};
use dash_fetch::{CsvDirSource, PriceSource, YahooSource};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tickerdash=info,dash_app=info,dash_fetch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let today = chrono::Local::now().date_naive();
    let request = cli.to_request(today).context("invalid request")?;
    let settings = Settings::resolve(&cli);

    let source: Box<dyn PriceSource> = match &settings.data_dir {
        Some(dir) => Box::new(CsvDirSource::new(dir)),
        None => Box::new(YahooSource::with_base_url(settings.yahoo_url.as_str())),
    };

    let (report, written) = run(&request, source.as_ref(), &settings)?;
    print!("{}", summary(&report));
    for path in &written.files {
        println!("Wrote {}", path.display());
    }
    println!("Open {} in a browser", written.page.display());
    Ok(())
}
