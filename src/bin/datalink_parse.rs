use clap::Parser;
use datalink_feed::{
    codec, logging, Config, FeedReader, FeedResult, Provider, Record, SubscriptionConfig, Symbol,
};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing::info;

/// Parse a Nasdaq Data Link CSV feed into JSON lines
#[derive(Debug, Parser)]
#[command(name = "datalink-parse", version)]
struct Args {
    /// Feed file to read
    file: PathBuf,

    /// Symbol the feed belongs to, e.g. UMICH/SOC1
    #[arg(short, long)]
    symbol: String,

    /// Header column supplying the value (defaults to `close`)
    #[arg(short, long)]
    column: Option<String>,

    /// Feed vendor: nasdaq-data-link or quandl
    #[arg(long)]
    provider: Option<Provider>,

    /// Fall back to the close position when the column is missing
    #[arg(long)]
    lenient: bool,

    /// Keep going past lines that fail to parse
    #[arg(long)]
    skip_bad_lines: bool,

    /// Configuration file
    #[arg(long, default_value = "datalink.toml")]
    config: PathBuf,
}

fn main() {
    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging_with_level(&config.logging.level) {
        eprintln!("Error: failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Some(column) = args.column.clone() {
        config.feed.value_column = Some(column);
    }
    if let Some(provider) = args.provider {
        config.feed.provider = provider;
    }
    if args.lenient {
        config.feed.strict_columns = false;
    }

    if let Err(e) = run(&args, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.feed.resolve_path(&args.file);
    let symbol = Symbol::new(args.symbol.as_str());
    logging::log_startup("datalink-parse", Some(&path.display().to_string()));

    let reader = FeedReader::from_path(
        config.feed.build_parser(),
        SubscriptionConfig::daily(symbol.clone()),
        &path,
    )?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut written = 0usize;
    let mut skipped = 0usize;

    for result in reader {
        match result {
            Ok(record) => {
                writeln!(out, "{}", output_line(&record)?)?;
                written += 1;
            }
            Err(e) if args.skip_bad_lines && e.is_recoverable() => skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }
    out.flush()?;

    info!(symbol = %symbol, written, skipped, "Feed parsed");
    Ok(())
}

/// One output line: the record's JSON body plus its symbol, so lines from
/// several feeds stay distinguishable
fn output_line(record: &Record) -> FeedResult<String> {
    let mut line: serde_json::Value = serde_json::from_str(&codec::to_json(record)?)?;
    if let Some(fields) = line.as_object_mut() {
        fields.insert(
            "symbol".to_string(),
            serde_json::Value::String(record.symbol().to_string()),
        );
    }
    Ok(line.to_string())
}
