//! CLI tool for compiling slide deck documents into PowerPoint files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_core::{CompilerOptions, Document, Language, RenderRequest, RotationMode, StyleConfig, ThemeKey};
use deck_pptx::{Compiler, PptxReader};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Compile JSON slide decks into .pptx files.
#[derive(Parser, Debug)]
#[command(name = "keynote-build")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a render request into a .pptx (or a .zip of parts)
    Build(BuildArgs),
    /// Print the slides, text and notes of a .pptx file
    Inspect {
        /// The .pptx file to read
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    /// Render request JSON: {document, style, parts?}
    input: PathBuf,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Split the deck into this many files
    #[arg(short, long)]
    parts: Option<i64>,

    /// Override the style's theme key
    #[arg(short, long)]
    theme: Option<String>,

    /// Compiler options JSON file
    #[arg(long)]
    options: Option<PathBuf>,

    /// Caption language (en, sv)
    #[arg(short, long, value_parser = parse_language)]
    language: Option<Language>,

    /// Restart color rotation in every part instead of continuing the deck
    #[arg(long)]
    per_part_rotation: bool,

    /// Fail on unknown theme keys instead of using the default theme
    #[arg(long)]
    no_fallback_theme: bool,

    /// Compile the minimal fallback deck when the document cannot be parsed
    #[arg(long)]
    fallback_on_invalid: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match &args.command {
        Command::Build(build) => {
            let path = build_file(build, args.verbose)?;
            println!("{}", path.display());
        }
        Command::Inspect { input } => inspect_file(input)?,
    }

    Ok(())
}

fn parse_language(code: &str) -> std::result::Result<Language, String> {
    Language::parse(code).ok_or_else(|| format!("unsupported language '{}' (expected en or sv)", code))
}

/// Compile one request file and write the result next to it.
fn build_file(args: &BuildArgs, verbose: bool) -> Result<PathBuf> {
    let options = load_options(args)?;
    let mut request = load_request(&args.input, args.fallback_on_invalid, options.language)?;

    if let Some(theme) = &args.theme {
        request.style.theme_key = theme.clone();
    }
    if let Some(parts) = args.parts {
        request.parts = Some(parts);
    }

    log::debug!(
        "Building {} ({} slides, theme '{}')",
        args.input.display(),
        request.document.slides.len(),
        request.style.theme_key
    );

    let output = Compiler::new(options)
        .compile(&request, None)
        .with_context(|| format!("Failed to compile {}", args.input.display()))?;

    let dir = output_dir(&args.input, args.output.as_ref())?;
    let path = dir.join(&output.filename);
    write_output(&path, &output.bytes)?;

    if verbose {
        eprintln!(
            "Wrote {} part(s), {} bytes, {}",
            output.parts,
            output.bytes.len(),
            output.content_type
        );
    }
    Ok(path)
}

/// Options file first, then flags on top.
fn load_options(args: &BuildArgs) -> Result<CompilerOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Invalid options in {}", path.display()))?
        }
        None => CompilerOptions::default(),
    };

    if let Some(language) = args.language {
        options = options.with_language(language);
    }
    if args.per_part_rotation {
        options = options.with_rotation(RotationMode::PerPart);
    }
    if args.no_fallback_theme {
        options = options.with_fallback_theme(None);
    }
    Ok(options)
}

fn load_request(path: &Path, fallback_on_invalid: bool, language: Language) -> Result<RenderRequest> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    match serde_json::from_value::<RenderRequest>(value.clone()) {
        Ok(request) => Ok(request),
        Err(e) if fallback_on_invalid => {
            log::warn!("Unusable request in {} ({}), using fallback deck", path.display(), e);
            Ok(fallback_request(&value, path, language))
        }
        Err(e) => Err(e).with_context(|| format!("Invalid render request in {}", path.display())),
    }
}

/// Salvage what we can from a request whose document did not parse.
fn fallback_request(value: &Value, path: &Path, language: Language) -> RenderRequest {
    let topic = value
        .pointer("/document/title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Presentation")
                .to_string()
        });

    let style = value
        .get("style")
        .and_then(|s| serde_json::from_value::<StyleConfig>(s.clone()).ok())
        .filter(|s| s.validate().is_ok())
        .unwrap_or_else(|| StyleConfig::themed(ThemeKey::DEFAULT.as_str()));

    let mut request = RenderRequest::new(Document::fallback(&topic, language), style);
    request.parts = value.get("parts").and_then(Value::as_i64);
    request
}

fn inspect_file(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let summary = PptxReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", summary.title.as_deref().unwrap_or("(untitled)"))?;
    for slide in &summary.slides {
        writeln!(out)?;
        writeln!(out, "Slide {} ({} picture(s))", slide.number, slide.pictures)?;
        for text in &slide.texts {
            writeln!(out, "  {}", text.replace('\n', "\n  "))?;
        }
        if !slide.notes.is_empty() {
            writeln!(out, "  Notes: {}", slide.notes.replace('\n', "\n         "))?;
        }
    }
    Ok(())
}

/// Determine the directory the output is written to.
fn output_dir(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            Ok(dir.clone())
        }
        None => Ok(input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()),
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    Ok(())
}
