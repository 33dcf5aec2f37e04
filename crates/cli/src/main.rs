// ABOUTME: CLI for cleaning Gutenberg / word-processor HTML with gutenclean-core.
// ABOUTME: Reads a file or stdin, writes cleaned HTML (or a JSON envelope), optionally prints stats.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gutenclean_core::{normalize_bytes, MarkerPolicy, Normalized, Options, ParserChoice};
use serde_json::json;

/// Exit status when no parser accepted the input. The original text is still written.
const EXIT_NORMALIZE_FAILED: u8 = 2;
const EXIT_IO_FAILED: u8 = 1;

/// Normalize HTML for re-import into the block editor.
#[derive(Parser, Debug)]
#[command(name = "gutenclean")]
#[command(about = "Clean nested, empty and marker-only paragraphs out of Gutenberg HTML", long_about = None)]
struct Args {
    /// Input file. Reads stdin when absent or "-".
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Keep paragraphs that wrap only block-level elements
    #[arg(long = "no-unwrap")]
    no_unwrap: bool,

    /// Keep empty paragraphs
    #[arg(long = "keep-empty")]
    keep_empty: bool,

    /// Leave wp: block marker comments in place
    #[arg(long = "keep-markers")]
    keep_markers: bool,

    /// Which markers to strip: all, or only empty-regions
    #[arg(long = "marker-policy", default_value = "all")]
    marker_policy: MarkerPolicy,

    /// Move markers found inside paragraphs out after them
    #[arg(long = "extract-markers")]
    extract_markers: bool,

    /// Treat paragraphs holding only empty inline elements as empty
    #[arg(long = "deep-empty")]
    deep_empty: bool,

    /// Indent the output
    #[arg(long = "pretty")]
    pretty: bool,

    /// Keep html/head/body when the input is a full document
    #[arg(long = "keep-wrapper")]
    keep_wrapper: bool,

    /// Write markers as <!--wp:x--> without inner padding
    #[arg(long = "compact-markers")]
    compact_markers: bool,

    /// Parser to try first: auto, html5ever or lenient
    #[arg(long = "parser", default_value = "auto")]
    parser: ParserChoice,

    /// Input character encoding label (default: detect)
    #[arg(long = "charset")]
    charset: Option<String>,

    /// Print stats as JSON to stderr
    #[arg(long = "stats")]
    stats: bool,

    /// Write a JSON envelope (html, stats, parser, warnings, error) instead of HTML
    #[arg(long = "json")]
    json_output: bool,

    /// More log output on stderr (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> Options {
        Options::builder()
            .unwrap_block_wrapped_paragraphs(!self.no_unwrap)
            .remove_empty(!self.keep_empty)
            .strip_block_markers(!self.keep_markers)
            .marker_policy(self.marker_policy)
            .extract_markers(self.extract_markers)
            .deep_empty_check(self.deep_empty)
            .pretty_print(self.pretty)
            .strip_document_wrapper(!self.keep_wrapper)
            .compact_markers(self.compact_markers)
            .parser(self.parser)
            .build()
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(EXIT_IO_FAILED)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let bytes = load_bytes(args.input.as_deref())?;
    let result = normalize_bytes(&bytes, args.charset.as_deref(), &args.options());

    if let Some(err) = &result.error {
        eprintln!("error: {}", err);
    }

    let body = if args.json_output {
        serde_json::to_string_pretty(&envelope(&result))?
    } else {
        result.html.clone()
    };
    write_output(args.output.as_deref(), &body)?;

    if args.stats {
        eprintln!("{}", serde_json::to_string(&result.stats)?);
    }

    if result.is_failure() {
        Ok(ExitCode::from(EXIT_NORMALIZE_FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn envelope(result: &Normalized) -> serde_json::Value {
    json!({
        "ok": result.is_ok(),
        "html": result.html,
        "stats": result.stats,
        "parser": result.parser,
        "warnings": result.warnings,
        "error": result.error.as_ref().map(|e| e.to_string()),
    })
}

fn load_bytes(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(output: Option<&Path>, body: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, body).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(body.as_bytes()).context("writing stdout")?;
            if !body.is_empty() && !body.ends_with('\n') {
                stdout.write_all(b"\n").context("writing stdout")?;
            }
            stdout.flush().context("writing stdout")
        }
    }
}
