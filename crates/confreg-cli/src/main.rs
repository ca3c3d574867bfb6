//! `confreg` CLI — read, edit, convert and merge configuration files.
//!
//! ## Usage
//!
//! ```sh
//! # Read one value (printed as JSON)
//! confreg get database.host -i app.json
//!
//! # Read from an INI file with sections
//! confreg get server.port -i app.ini --sections
//!
//! # Set a value and write the result (VALUE is JSON if it parses, else a string)
//! confreg set server.port 9090 -i app.json -o app.json
//!
//! # Convert INI to JSON (stdin → stdout)
//! cat app.ini | confreg convert --from ini --to json --sections
//!
//! # Layer several files, later ones winning
//! confreg merge defaults.json site.ini local.json --recursive --to json
//! ```
//!
//! Set `RUST_LOG=confreg=debug` (or pass `-v`) to see what was loaded.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use confreg::format::json;
use confreg::{Format, Options, Registry};
use std::io::{self, Read};
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "confreg",
    version,
    about = "Hierarchical configuration registry CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log what is loaded and merged (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by every command that reads a document.
#[derive(Args)]
struct InputArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Input format: json or ini (default: from extension, or sniffed on stdin)
    #[arg(long = "from")]
    from: Option<String>,
    /// Treat INI [section] headers as nested mappings
    #[arg(long)]
    sections: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a path as JSON
    Get {
        /// Path to read, e.g. database.host
        path: String,
        #[command(flatten)]
        input: InputArgs,
        /// Path separator
        #[arg(long, default_value = ".")]
        separator: String,
    },
    /// Set the value at a path and write the whole document
    Set {
        /// Path to write, e.g. database.host
        path: String,
        /// New value: parsed as JSON when valid, otherwise stored as a string
        value: String,
        #[command(flatten)]
        input: InputArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format (default: input format)
        #[arg(long)]
        to: Option<String>,
        /// Path separator
        #[arg(long, default_value = ".")]
        separator: String,
    },
    /// Re-render a document in another format
    Convert {
        #[command(flatten)]
        input: InputArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format
        #[arg(long)]
        to: String,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Merge files left to right; later files win
    Merge {
        /// Files to layer, lowest precedence first
        #[arg(required = true)]
        files: Vec<String>,
        /// Merge nested mappings instead of replacing them
        #[arg(short, long)]
        recursive: bool,
        /// Treat INI [section] headers as nested mappings
        #[arg(long)]
        sections: bool,
        /// Output format
        #[arg(long, default_value = "json")]
        to: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Get {
            path,
            input,
            separator,
        } => {
            let (registry, _) = load(&input)?;
            match registry.get_with_separator(&path, &separator) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("Error: no value at '{path}'");
                    process::exit(1);
                }
            }
        }
        Commands::Set {
            path,
            value,
            input,
            output,
            to,
            separator,
        } => {
            let (mut registry, format) = load(&input)?;
            let value = parse_cli_value(&value);
            registry.set_with_separator(&path, value, &separator);
            let format = match to {
                Some(name) => parse_format(&name)?,
                None => format,
            };
            let text = registry
                .to_string_as(format, &options(input.sections))
                .context("Failed to render registry")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Convert {
            input,
            output,
            to,
            pretty,
        } => {
            let (registry, _) = load(&input)?;
            let format = parse_format(&to)?;
            let rendered = if pretty && format == Format::Json {
                json::render_pretty(registry.as_mapping())
            } else {
                registry.to_string_as(format, &options(input.sections))
            };
            let text = rendered.context("Failed to render registry")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Merge {
            files,
            recursive,
            sections,
            to,
            output,
        } => {
            let options = options(sections);
            let mut merged = Registry::new();
            for file in &files {
                let mut layer = Registry::new();
                layer
                    .load_file(file, None, &options)
                    .with_context(|| format!("Failed to load {file}"))?;
                merged.merge(&layer, recursive);
            }
            let text = merged
                .to_string_as(parse_format(&to)?, &options)
                .context("Failed to render registry")?;
            write_output(output.as_deref(), &text)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins when set; otherwise `-v`
/// selects debug and the default is warn.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn options(sections: bool) -> Options {
    Options::default().process_sections(sections)
}

fn parse_format(name: &str) -> Result<Format> {
    name.parse::<Format>()
        .with_context(|| format!("Unsupported format: '{name}'"))
}

/// Load the input document, returning the registry and the format it was
/// read as.
///
/// Format precedence: `--from`, then the file extension, then sniffing the
/// text itself.
fn load(input: &InputArgs) -> Result<(Registry, Format)> {
    let text = read_input(input.input.as_deref())?;
    let format = match (&input.from, &input.input) {
        (Some(name), _) => parse_format(name)?,
        (None, Some(path)) => Format::from_path(Path::new(path)),
        (None, None) => Format::sniff(&text),
    };
    debug!(format = %format, bytes = text.len(), "read input");
    let registry = Registry::from_text(&text, format, &options(input.sections))
        .with_context(|| format!("Failed to parse input as {format}"))?;
    Ok((registry, format))
}

/// `42` → integer, `true` → bool, `{"a":1}` → mapping, anything that is not
/// JSON → string.
fn parse_cli_value(raw: &str) -> confreg::Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(native) => native.into(),
        Err(_) => raw.into(),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
