mod batch;
mod sources;

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_ascii_core::{
    chars_for_mode, get_encoder, level_table, load_and_convert, AsciiConverter, CharsetMode, Config, GridCache,
    OutputFormat, ResizeSampler, SampleFilter,
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use batch::{BatchConverter, BatchStatus};
use sources::AutoSource;

#[derive(Parser, Debug)]
#[command(name = "folio-ascii")]
#[command(about = "Convert images to colored ASCII grids", long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "folio-ascii.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single image path or URL
    Convert {
        source: String,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Convert several images concurrently, converting repeated sources once
    Batch {
        #[arg(required = true)]
        sources: Vec<String>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the glyph inventory of a charset mode
    Charset {
        #[arg(value_enum)]
        mode: CharsetMode,

        /// Print the per-level candidate glyphs instead of the flat palette
        #[arg(long)]
        levels: bool,
    },
}

/// Command-line overrides for the [converter] and [output] config sections
#[derive(clap::Args, Debug)]
struct Overrides {
    /// Grid width in characters (overrides config)
    #[arg(long)]
    cols: Option<u32>,

    /// Grid height in characters (overrides config)
    #[arg(long)]
    rows: Option<u32>,

    /// Charset mode (overrides config)
    #[arg(long, value_enum)]
    mode: Option<CharsetMode>,

    /// Keep glyphs that may not render single-width
    #[arg(long)]
    no_safe_char: bool,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(cols) = self.cols {
            config.converter.cols = cols;
        }
        if let Some(rows) = self.rows {
            config.converter.rows = rows;
        }
        if let Some(mode) = self.mode {
            config.converter.charset_mode = mode;
        }
        if self.no_safe_char {
            config.converter.use_safe_char = false;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for grid output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = Config::load_or_default(&args.config)?;

    match args.command {
        Command::Convert { source, overrides } => {
            overrides.apply(&mut config);
            config.validate()?;
            run_convert(&config, &source).await
        }
        Command::Batch { sources, overrides } => {
            overrides.apply(&mut config);
            config.validate()?;
            run_batch(&config, &sources).await
        }
        Command::Charset { mode, levels } => {
            print_charset(mode, levels);
            Ok(())
        }
    }
}

fn build_converter(filter: SampleFilter) -> AsciiConverter {
    AsciiConverter::with_sampler(ResizeSampler::new(filter.filter_type()))
}

async fn run_convert(config: &Config, source: &str) -> Result<()> {
    let image_source = AutoSource::new(Duration::from_secs(config.loader.http_timeout_secs))?;
    let converter = build_converter(config.converter.filter);
    let options = config.converter.options();

    info!("Converting {}", source);

    let loaded = load_and_convert(
        &image_source,
        &converter,
        source,
        config.converter.cols,
        config.converter.rows,
        &options,
    )
    .await;

    info!(
        "Produced {}x{} grid ({})",
        loaded.grid.cols(),
        loaded.grid.rows(),
        loaded.origin
    );

    let encoder = get_encoder(config.output.format);
    println!("{}", encoder.encode(&loaded.grid)?);

    Ok(())
}

async fn run_batch(config: &Config, sources: &[String]) -> Result<()> {
    let image_source = AutoSource::new(Duration::from_secs(config.loader.http_timeout_secs))?;
    let batch = BatchConverter::new(
        image_source,
        build_converter(config.converter.filter),
        config.converter.cols,
        config.converter.rows,
        config.converter.options(),
        config.loader.concurrency,
    );

    let mut cache = GridCache::new();
    let entries = batch.run(sources, &mut cache).await;
    let encoder = get_encoder(config.output.format);

    for entry in &entries {
        if encoder.format() != OutputFormat::Json {
            let status = match &entry.status {
                BatchStatus::Cached => "cached".to_string(),
                BatchStatus::Loaded(origin) => origin.to_string(),
            };
            println!("== {} [{}]", entry.source, status);
        }
        println!("{}", encoder.encode(&entry.grid)?);
    }

    info!("Batch complete: {} grids, {} cached", entries.len(), cache.len());

    Ok(())
}

fn print_charset(mode: CharsetMode, levels: bool) {
    if levels {
        for (level, candidates) in level_table(mode).iter().enumerate() {
            println!("{:>2}: {:?}", level, candidates);
        }
    } else {
        println!("{}", chars_for_mode(mode));
    }
}
