use anyhow::{anyhow, Context, Error};
use clap::Parser;
use telegraf_client::{config::parse_tag, ClientConfig, Fields, TagSet, TelegrafClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Send one metric to a Telegraf UDP listener", long_about = None)]
struct Args {
    // Collector host, overrides the config file and environment
    #[arg(long)]
    host: Option<String>,

    // Collector UDP port, overrides the config file and environment
    #[arg(short, long)]
    port: Option<u16>,

    // JSON file with host, port and default tags
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    // Tag for this metric, may be repeated
    #[arg(short, long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
    tags: Vec<(String, String)>,

    // Timestamp written verbatim at the end of the line
    #[arg(long, conflicts_with = "now")]
    timestamp: Option<i64>,

    // Stamp the line with the current time in nanoseconds
    #[arg(long)]
    now: bool,

    // Print the line instead of sending it
    #[arg(long)]
    dry_run: bool,

    measurement: String,

    // JSON object of fields, or a single JSON value
    fields: String,
}

fn load_config(args: &Args) -> Result<ClientConfig, Error> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_path(path)?,
        None => ClientConfig::default(),
    }
    .merge_env()?;

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    Ok(config)
}

fn line_timestamp(args: &Args) -> Result<Option<i64>, Error> {
    if !args.now {
        return Ok(args.timestamp);
    }
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .map(Some)
        .ok_or_else(|| anyhow!("Current time does not fit in nanoseconds"))
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let json: serde_json::Value = serde_json::from_str(&args.fields)
        .with_context(|| format!("Fields are not valid JSON: {}", args.fields))?;
    let fields = Fields::from_json(&json)?;
    let tags: TagSet = args.tags.iter().cloned().collect();

    let timestamp = line_timestamp(&args)?;

    let client = TelegrafClient::new(config.clone())
        .with_context(|| format!("Failed to open socket for {}", config.addr()))?;

    if args.dry_run {
        let line = client.prepare(&args.measurement, fields, Some(&tags), timestamp)?;
        println!("{}", line);
        return Ok(());
    }

    client.track(&args.measurement, fields, Some(&tags), timestamp)?;
    tracing::info!(addr = %config.addr(), measurement = %args.measurement, "metric sent");
    Ok(())
}
