//! unoffice CLI - office document to Markdown conversion tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unoffice::convert::LegacyConverter;
use unoffice::detect::{detect_format_from_path, sniff_container_from_path, FileFormat};
use unoffice::{to_json, JsonFormat, OfficeParser, ParseResult, ParserOptions};

#[derive(Parser)]
#[command(name = "unoffice")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert office documents to Markdown and JSON", long_about = None)]
struct Cli {
    /// Input document
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Base URL for image links
    #[arg(long, global = true, env = "UNOFFICE_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Directory to store extracted images
    #[arg(long, global = true, env = "UNOFFICE_IMAGE_DIR", value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Keep running headers, footers and page numbers
    #[arg(long, global = true)]
    no_filter: bool,

    /// Reject legacy .doc files instead of converting them
    #[arg(long, global = true)]
    no_doc_conversion: bool,

    /// LibreOffice executable used for .doc conversion
    #[arg(long, global = true, env = "UNOFFICE_LIBREOFFICE", value_name = "PATH")]
    libreoffice: Option<PathBuf>,

    /// Skip Unicode NFC normalization
    #[arg(long, global = true)]
    no_normalize: bool,
}

impl GlobalArgs {
    fn to_options(&self) -> ParserOptions {
        let mut options = ParserOptions::new()
            .with_header_footer_filter(!self.no_filter)
            .with_doc_conversion(!self.no_doc_conversion)
            .with_unicode_normalization(!self.no_normalize);

        if let Some(ref url) = self.base_url {
            options = options.with_image_base_url(url.as_str());
        }
        if let Some(ref dir) = self.image_dir {
            options = options.with_image_dir(dir);
        }
        if let Some(ref path) = self.libreoffice {
            options = options.with_libreoffice_path(path);
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to Markdown or JSON
    Convert {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the full result as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Convert several documents into a directory
    Batch {
        /// Input documents
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Show document information
    Info {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.global.to_options();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            json,
            compact,
        }) => cmd_convert(&input, output.as_deref(), json, compact, options),
        Some(Commands::Batch { inputs, output }) => cmd_batch(&inputs, &output, options),
        Some(Commands::Info { input }) => cmd_info(&input, &options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false, false, options)
            } else {
                println!("{}", "Usage: unoffice <FILE> [OUTPUT]".yellow());
                println!("       unoffice --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    json: bool,
    compact: bool,
    options: ParserOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = OfficeParser::new(options).parse(input);

    let content = if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        to_json(&result, format)?
    } else {
        markdown_or_error(&result)?.to_string()
    };

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    if json && !result.success {
        return Err(result.error.unwrap_or_default().into());
    }
    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    options: ParserOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;
    let parser = OfficeParser::new(options);

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut failures = Vec::new();
    for input in inputs {
        pb.set_message(input.display().to_string());
        let result = parser.parse(input);
        match markdown_or_error(&result) {
            Ok(markdown) => {
                fs::write(output_path(input, output_dir), markdown)?;
            }
            Err(e) => failures.push((input.clone(), e)),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    let converted = inputs.len() - failures.len();
    println!(
        "\n{} {} converted, {} failed",
        "Summary:".green().bold(),
        converted,
        failures.len()
    );
    for (input, error) in &failures {
        println!("  {} {}: {}", "✗".red(), input.display(), error);
    }

    if converted == 0 && !inputs.is_empty() {
        return Err("no document could be converted".into());
    }
    Ok(())
}

fn cmd_info(input: &Path, options: &ParserOptions) -> Result<(), Box<dyn std::error::Error>> {
    let meta = fs::metadata(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {} bytes", "Size".bold(), meta.len());
    match detect_format_from_path(input) {
        Ok(format) => {
            println!("{}: {}", "Format".bold(), format);
            let container = sniff_container_from_path(input)?;
            let shown = container
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            if container.is_some_and(|c| c != format.expected_container()) {
                println!(
                    "{}: {} ({} expected)",
                    "Container".bold(),
                    shown.yellow(),
                    format.expected_container()
                );
            } else {
                println!("{}: {}", "Container".bold(), shown);
            }
            if format == FileFormat::Doc {
                print_converter_status(options);
            }
        }
        Err(e) => println!("{}: {}", "Format".bold(), e.to_string().yellow()),
    }

    Ok(())
}

fn print_converter_status(options: &ParserOptions) {
    let converter = LegacyConverter::new(
        options.libreoffice_path.as_deref(),
        options.conversion_timeout,
    );
    if converter.is_available() {
        let path = converter
            .executable()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!("{}: {}", "LibreOffice".bold(), path);
    } else {
        println!("{}: {}", "LibreOffice".bold(), "not found".yellow());
    }
}

fn cmd_version() {
    println!("{} {}", "unoffice".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Office document to Markdown conversion tool");
    println!();
    println!("License: MIT");
}

fn markdown_or_error(result: &ParseResult) -> Result<&str, String> {
    if result.success {
        Ok(&result.markdown)
    } else {
        Err(result
            .error
            .clone()
            .unwrap_or_else(|| "conversion failed".to_string()))
    }
}

fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.md", stem))
}
