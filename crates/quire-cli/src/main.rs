use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, WrapErr};
use quire_delta::{
    Delta, SchemaVersion, delta_from_plain_text, extract_files, extract_images,
};
use quire_renderer::{
    HtmlVariant, LinkAttribute, pure_text_lenient, render_delta_html, render_delta_text,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser)]
#[command(version, about = "quire - convert rich-text deltas to HTML and plain text", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a KDL config file
    #[arg(long, global = true, env = "QUIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Log classification decisions and degraded input
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a delta as an HTML fragment
    Html {
        /// Delta JSON file, or `-` for stdin
        input: PathBuf,

        /// Drop file blots and mentions, strip query strings from media
        #[arg(long)]
        without_file_blot: bool,

        /// Write `href` on links instead of the legacy `herf`
        #[arg(long)]
        href: bool,

        /// Close mention spans
        #[arg(long)]
        close_mentions: bool,
    },
    /// Render a delta as plain text with media placeholders
    Text {
        /// Delta JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// Render a delta as bare text for search indexing
    PureText {
        /// Delta JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// Convert a delta between schema versions
    Migrate {
        /// Delta JSON file, or `-` for stdin
        input: PathBuf,

        #[arg(long, value_enum)]
        to: Schema,
    },
    /// Classify hosted image embeds into images, videos and file blots
    Classify {
        /// Raw delta JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// List image URLs in document order
    Images {
        /// Delta JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// List file blot URLs in document order
    Files {
        /// Delta JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// Build a delta from plain text
    FromText { text: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Schema {
    V1,
    V2,
}

impl From<Schema> for SchemaVersion {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::V1 => SchemaVersion::V1,
            Schema::V2 => SchemaVersion::V2,
        }
    }
}

fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Html {
            input,
            without_file_blot,
            href,
            close_mentions,
        } => {
            let delta = read_delta(&input)?;
            let mut options = config.html_options();
            if without_file_blot {
                options.variant = HtmlVariant::WithoutFileBlot;
            }
            if href {
                options.link_attribute = LinkAttribute::Href;
            }
            if close_mentions {
                options.close_mentions = true;
            }
            println!("{}", render_delta_html(&delta, options));
        }
        Commands::Text { input } => {
            let delta = read_delta(&input)?;
            print!("{}", render_delta_text(&delta));
        }
        Commands::PureText { input } => {
            // Unreadable deltas degrade to empty output rather than failing.
            print!("{}", pure_text_lenient(read_json(&input)?));
        }
        Commands::Migrate { input, to } => {
            let delta = read_delta(&input)?;
            print_json(&delta.migrate(to.into()))?;
        }
        Commands::Classify { input } => {
            let delta = read_delta(&input)?;
            print_json(&config.classifier().classify_delta(&delta))?;
        }
        Commands::Images { input } => {
            let delta = read_delta(&input)?;
            for url in extract_images(&delta) {
                println!("{url}");
            }
        }
        Commands::Files { input } => {
            let delta = read_delta(&input)?;
            for url in extract_files(&delta) {
                println!("{url}");
            }
        }
        Commands::FromText { text } => {
            print_json(&delta_from_plain_text(&text))?;
        }
    }

    Ok(())
}

fn read_json(input: &Path) -> Result<Value> {
    let text = if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .into_diagnostic()
            .wrap_err("failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(input)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", input.display()))?
    };
    serde_json::from_str(&text)
        .into_diagnostic()
        .wrap_err("input is not valid JSON")
}

fn read_delta(input: &Path) -> Result<Delta> {
    let delta = Delta::from_value(read_json(input)?)?;
    tracing::debug!(ops = delta.len(), "loaded delta");
    Ok(delta)
}

fn print_json(delta: &Delta) -> Result<()> {
    let json = serde_json::to_string_pretty(delta).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
