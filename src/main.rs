//! quire - TEI to HTML, plain text, and EPUB chapters

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use quire::export::{ChapterExporter, Exporter, HtmlExporter, TextExporter};
use quire::{Document, Format, HtmlConfig, IdentifierMap, TextConfig};

#[derive(Parser)]
#[command(name = "quire")]
#[command(version, about = "Render TEI documents to HTML, plain text, and EPUB chapters", long_about = None)]
#[command(after_help = "EXAMPLES:
    quire book.xml                    Write book.html, book.txt and book/chapter-*.xhtml
    quire book.xml -f text --width 66 Plain text only, 66 columns wide
    quire book.xml --ids              Show where each identifier lands")]
struct Cli {
    /// Input TEI file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output formats, comma-separated
    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = [FormatArg::Html, FormatArg::Text, FormatArg::Epub])]
    format: Vec<FormatArg>,

    /// Output directory
    #[arg(short, long, value_name = "OUTDIR", default_value = ".")]
    output: PathBuf,

    /// Plain-text line width
    #[arg(long, value_name = "N", default_value_t = 72)]
    width: usize,

    /// Extra CSS to embed after the default stylesheet
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Emit well-formed XHTML for the HTML format
    #[arg(long)]
    strict: bool,

    /// Print the identifier map as JSON instead of converting
    #[arg(long)]
    ids: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Log more detail (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Html,
    Text,
    Epub,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Format {
        match arg {
            FormatArg::Html => Format::Html,
            FormatArg::Text => Format::Text,
            FormatArg::Epub => Format::Epub,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let doc = match Document::open(&cli.input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    if cli.ids {
        return match show_ids(&doc) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let css = match cli.css.as_deref().map(fs::read_to_string).transpose() {
        Ok(css) => css,
        Err(e) => {
            eprintln!("error: reading stylesheet: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::create_dir_all(&cli.output) {
        eprintln!("error: {}: {e}", cli.output.display());
        return ExitCode::FAILURE;
    }

    let stem = cli
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    // A failed format does not stop the others.
    let mut failed = false;
    for format in dedup(&cli.format) {
        match convert(&doc, format, &cli, &stem, css.as_deref()) {
            Ok(path) => {
                if !cli.quiet {
                    println!("{format}: {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("error: {format}: {e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let filter = match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        (false, 1) => EnvFilter::new("quire=info"),
        (false, _) => EnvFilter::new("quire=debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dedup(formats: &[FormatArg]) -> Vec<Format> {
    let mut seen = Vec::new();
    for &f in formats {
        let f = Format::from(f);
        if !seen.contains(&f) {
            seen.push(f);
        }
    }
    seen
}

fn convert(doc: &Document, format: Format, cli: &Cli, stem: &str, css: Option<&str>) -> quire::Result<PathBuf> {
    match format {
        Format::Html => {
            let exporter = HtmlExporter::with_config(HtmlConfig {
                strict: cli.strict,
                stylesheet: css.map(str::to_string),
                language: None,
            });
            let path = cli.output.join(format!("{stem}.{}", format.extension()));
            let mut buf = Vec::new();
            exporter.export(doc, &mut buf)?;
            fs::write(&path, buf)?;
            Ok(path)
        }
        Format::Text => {
            let exporter = TextExporter::with_config(TextConfig {
                line_width: cli.width,
                ..TextConfig::default()
            });
            let path = cli.output.join(format!("{stem}.{}", format.extension()));
            let mut buf = Vec::new();
            exporter.export(doc, &mut buf)?;
            fs::write(&path, buf)?;
            Ok(path)
        }
        Format::Epub => {
            let mut exporter = ChapterExporter::new();
            if let Some(css) = css {
                exporter = exporter.with_stylesheet(css);
            }
            let dir = cli.output.join(stem);
            let written = exporter.export_dir(doc, &dir)?;
            tracing::info!(files = written.len(), "packaged chapters");
            Ok(dir)
        }
    }
}

fn show_ids(doc: &Document) -> Result<(), String> {
    let map = IdentifierMap::build(doc).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&map).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
