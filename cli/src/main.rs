mod config;
mod discover;
mod error;

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cookbook_metadata_core::{MetadataError, PackageMetadata, codec, compare_versions, evaluate};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::discover::discover_cookbook;
use crate::error::{CliError, Result};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cookbook-meta")]
#[command(about = "Generate, inspect and validate cookbook metadata")]
struct Cli {
    /// Log declarations and decoding steps to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two dotted-numeric versions.
    Compare(CompareArgs),
    /// Check whether a version satisfies a constraint expression.
    Check(CheckArgs),
    /// Build metadata for a cookbook directory.
    Generate(GenerateArgs),
    /// Load a JSON or YAML metadata document and print it normalized.
    Show(ShowArgs),
    /// Validate one or more JSON or YAML metadata documents.
    Validate(ValidateArgs),
    /// Write the built-in configuration to a YAML file.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct CompareArgs {
    left: String,
    right: String,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Candidate version (e.g. 1.2.3).
    candidate: String,
    /// Constraint expression (e.g. ">= 1.0").
    expression: String,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Cookbook root directory.
    cookbook_dir: PathBuf,
    /// Cookbook name (default: the directory name).
    #[arg(long)]
    name: Option<String>,
    /// YAML configuration with authorship defaults and recipe layout.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the document here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Metadata document (`.yml`/`.yaml` is read as YAML, anything else as JSON).
    input: PathBuf,
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Metadata documents (`.yml`/`.yaml` is read as YAML, anything else as JSON).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Destination YAML path.
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Compare(args) => run_compare(args),
        Command::Check(args) => run_check(args),
        Command::Generate(args) => run_generate(args),
        Command::Show(args) => run_show(args),
        Command::Validate(args) => run_validate(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_compare(args: CompareArgs) -> Result<()> {
    let symbol = match compare_versions(&args.left, &args.right)? {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{symbol}");
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    if !evaluate(&args.candidate, &args.expression)? {
        return Err(CliError::Unsatisfied {
            version: args.candidate,
            constraint: args.expression,
        });
    }
    println!("{} satisfies {}", args.candidate, args.expression);
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let cookbook = discover_cookbook(&args.cookbook_dir, args.name.as_deref(), &config)?;
    let metadata = PackageMetadata::with_defaults(&cookbook, config.defaults);
    let rendered = render(&metadata, args.format)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| CliError::io(parent, err))?;
                }
            }
            fs::write(path, rendered).map_err(|err| CliError::io(path, err))?;
            println!(
                "Wrote metadata for '{}' with {} recipe(s) to '{}'.",
                metadata.name(),
                metadata.recipes().len(),
                path.display()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let metadata = load_document(&args.input)?;
    println!("{}", render(&metadata, args.format)?);
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    for path in &args.inputs {
        let metadata = load_document(path)?;
        debug!(path = %path.display(), cookbook = %metadata.name(), "document valid");
    }
    println!("Validated {} metadata document(s).", args.inputs.len());
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    CliConfig::default().save(&args.output)?;
    println!("Wrote default configuration to '{}'.", args.output.display());
    Ok(())
}

/// Reads a metadata document. Files ending in `.yml` or `.yaml` are parsed
/// as YAML, everything else as JSON.
fn load_document(path: &Path) -> Result<PackageMetadata> {
    let raw = fs::read_to_string(path).map_err(|err| CliError::io(path, err))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

    let decoded = if is_yaml {
        serde_yaml::from_str::<serde_json::Value>(&raw)
            .map_err(|err| MetadataError::InvalidDocument(err.to_string()))
            .and_then(|value| codec::from_value(&value))
    } else {
        codec::from_json(&raw)
    };
    decoded.map_err(|source| CliError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

fn render(metadata: &PackageMetadata, format: CliOutputFormat) -> Result<String> {
    match format {
        CliOutputFormat::Json => Ok(codec::to_json_pretty(metadata)?),
        CliOutputFormat::Yaml => Ok(serde_yaml::to_string(metadata)?),
    }
}
