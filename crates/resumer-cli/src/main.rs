use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use resumer_core::config_file::{self, ConfigFile};
use resumer_ingest::{
    DEFAULT_EXTRACTION_TIMEOUT, DocumentSource, parse_document, parse_resume_with_timeout,
    resume_or_default,
};
use resumer_parsing::{ParsingConfigBuilder, ResumeParser};

mod output;

use output::ColorMode;

/// Resume Parser - Extract structured resume data from PDF documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a resume PDF, token dump (.json), or http(s) URL
    Parse {
        /// Path or URL of the document to parse
        input: String,

        /// Print the resume as compact JSON
        #[arg(long)]
        json: bool,

        /// Print the resume as pretty-printed JSON
        #[arg(long, conflicts_with = "json")]
        pretty: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Extraction timeout in seconds (default: 15)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print an empty resume instead of failing when extraction fails
        #[arg(long)]
        fallback: bool,
    },

    /// Show an intermediate pipeline stage
    Inspect {
        /// Path or URL of the document to inspect
        input: String,

        /// Stage to print
        #[arg(long, value_enum, default_value_t = Stage::Sections)]
        stage: Stage,

        /// Print the stage as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show the config file location and effective thresholds
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Tokens,
    Lines,
    Sections,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Parse {
            input,
            json,
            pretty,
            output,
            no_color,
            timeout,
            fallback,
        } => {
            parse(ParseArgs {
                input,
                json,
                pretty,
                output,
                no_color,
                timeout,
                fallback,
            })
            .await
        }
        Command::Inspect {
            input,
            stage,
            json,
            no_color,
        } => inspect(&input, stage, json, no_color).await,
        Command::Config => show_config(),
    }
}

/// Log to stderr. `RESUMER_LOG` wins over `RUST_LOG`; `-v` overrides both.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("RESUMER_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_parser(file: &ConfigFile) -> anyhow::Result<ResumeParser> {
    let config = ParsingConfigBuilder::from_config_file(file)
        .build()
        .context("invalid parsing configuration")?;
    Ok(ResumeParser::with_config(config))
}

/// Resolve the extraction timeout: CLI flag > env var > config file > default.
fn resolve_timeout(flag: Option<u64>, env: Option<String>, file: &ConfigFile) -> Duration {
    flag.or_else(|| env.and_then(|v| v.trim().parse().ok()))
        .or_else(|| file.extraction.as_ref().and_then(|e| e.timeout_secs))
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_EXTRACTION_TIMEOUT)
}

fn env_timeout() -> Option<String> {
    std::env::var("RESUMER_TIMEOUT_SECS").ok()
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?,
        )
    } else {
        Box::new(std::io::stdout())
    })
}

struct ParseArgs {
    input: String,
    json: bool,
    pretty: bool,
    output: Option<PathBuf>,
    no_color: bool,
    timeout: Option<u64>,
    fallback: bool,
}

async fn parse(args: ParseArgs) -> anyhow::Result<()> {
    let file = config_file::load_config();
    let parser = build_parser(&file)?;
    let timeout = resolve_timeout(args.timeout, env_timeout(), &file);

    let source = DocumentSource::from_arg(&args.input);
    let result = parse_resume_with_timeout(source, parser, timeout).await;
    let resume = if args.fallback {
        resume_or_default(result)
    } else {
        result.with_context(|| format!("failed to parse {}", args.input))?
    };

    let color = ColorMode(!args.no_color && args.output.is_none());
    let mut writer = open_writer(args.output.as_deref())?;
    if args.json || args.pretty {
        output::print_json(&mut *writer, &resume, args.pretty)?;
    } else {
        output::print_resume(&mut *writer, &resume, color)?;
    }
    writer.flush()?;
    Ok(())
}

async fn inspect(input: &str, stage: Stage, json: bool, no_color: bool) -> anyhow::Result<()> {
    let file = config_file::load_config();
    let parser = build_parser(&file)?;
    let timeout = resolve_timeout(None, env_timeout(), &file);

    let doc = parse_document(DocumentSource::from_arg(input), parser, timeout)
        .await
        .with_context(|| format!("failed to parse {input}"))?;

    let color = ColorMode(!no_color);
    let mut stdout = std::io::stdout().lock();
    match (stage, json) {
        (Stage::Tokens, true) => output::print_json(&mut stdout, &doc.tokens, true)?,
        (Stage::Lines, true) => output::print_json(&mut stdout, &doc.lines, true)?,
        (Stage::Sections, true) => output::print_json(&mut stdout, &doc.sections, true)?,
        (Stage::Tokens, false) => output::print_tokens(&mut stdout, &doc.tokens, color)?,
        (Stage::Lines, false) => output::print_lines(&mut stdout, &doc.lines, color)?,
        (Stage::Sections, false) => output::print_sections(&mut stdout, &doc.sections, color)?,
    }
    Ok(())
}

fn show_config() -> anyhow::Result<()> {
    let file = config_file::load_config();
    let parser = build_parser(&file)?;
    let timeout = resolve_timeout(None, env_timeout(), &file);

    let mut stdout = std::io::stdout().lock();
    output::print_config(
        &mut stdout,
        config_file::config_path().as_deref(),
        parser.config().thresholds(),
        timeout,
    )?;
    Ok(())
}
