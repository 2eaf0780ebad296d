use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use flight_availability::{
    AvailabilityParser, AvailabilityQuery, ExecutionMode, FlightAvailabilityService,
    HttpAvailabilitySource, ParserConfig, RetryConfig, UpstreamConfig,
};
use tracing_subscriber::EnvFilter;

/// Normalize airline availability into JSON, from a local document or the upstream API
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Transform this XML document instead of calling the upstream API
    #[arg(long, conflicts_with_all = ["origin", "destination", "departure", "return_date", "passengers"])]
    file: Option<PathBuf>,

    #[arg(long)]
    origin: Option<String>,

    #[arg(long)]
    destination: Option<String>,

    /// Departure date as the upstream expects it, e.g. 2014-01-02
    #[arg(long)]
    departure: Option<String>,

    #[arg(long)]
    return_date: Option<String>,

    #[arg(long)]
    passengers: Option<u32>,

    #[arg(long, default_value = flight_availability::upstream::DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Normalize flights on the rayon pool
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn query(&self) -> anyhow::Result<AvailabilityQuery> {
        match (
            &self.origin,
            &self.destination,
            &self.departure,
            &self.return_date,
            self.passengers,
        ) {
            (Some(origin), Some(destination), Some(departure), Some(return_date), Some(passengers)) => {
                Ok(AvailabilityQuery {
                    origin: origin.clone(),
                    destination: destination.clone(),
                    departure: departure.clone(),
                    return_date: return_date.clone(),
                    passengers,
                })
            }
            _ => bail!(
                "either --file or all of --origin --destination --departure --return-date --passengers are required"
            ),
        }
    }

    fn parser(&self) -> AvailabilityParser {
        let execution = if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        };
        AvailabilityParser::with_config(ParserConfig {
            execution,
            ..Default::default()
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let parser = args.parser();

    let json = match &args.file {
        Some(path) => {
            let xml = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let response = parser.process(&xml)?;
            parser.to_json(&response)?
        }
        None => {
            let query = args.query()?;
            let source = HttpAvailabilitySource::new(UpstreamConfig {
                base_url: args.base_url.clone(),
                timeout_ms: args.timeout_ms,
                retry_config: RetryConfig {
                    max_retries: args.max_retries,
                    ..Default::default()
                },
            })?;
            FlightAvailabilityService::new(source, parser)
                .availability_json(&query)
                .await?
        }
    };

    println!("{}", json);
    Ok(())
}
