#![deny(unsafe_code)]

//! SmartRead CLI — token-budgeted document reading from the command line.
//!
//! Every command prints one JSON document on stdout. Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use smartread_config::AppConfig;
use smartread_core::{
    DocumentReader, ReadMode, ToolRegistry, ToolRequest, build_info, format_preamble,
};

const TOC_NOTE: &str = "Use read_section(file_path, heading) to read a specific section";

/// SmartRead — read large documents without flooding the context window.
#[derive(Parser)]
#[command(name = "smartread", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "smartread.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a document, summarizing it when it is too large.
    Read {
        path: String,

        /// auto, full or summary.
        #[arg(short, long)]
        mode: Option<ReadMode>,

        /// Summary style (default from config).
        #[arg(short, long)]
        style: Option<String>,
    },

    /// Extract one section by a fragment of its heading.
    Section { path: String, heading: String },

    /// List every heading in a document.
    Toc { path: String },

    /// Print the tool catalogue.
    Tools,

    /// Call a tool by name with JSON arguments.
    Call {
        tool: String,
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

/// A document read from disk.
struct Document {
    text: String,
    size_bytes: usize,
    absolute: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, found) = load_config(&cli.config).await?;

    let filter = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    debug!(version = %build_info::version_string(), "smartread starting");
    if !found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    let output = match cli.command {
        Commands::Read { path, mode, style } => {
            let request = ToolRequest::SmartRead {
                file_path: path,
                mode,
                summary_style: style,
            };
            dispatch(&config, &request).await?
        }
        Commands::Section { path, heading } => {
            let request = ToolRequest::ReadSection {
                file_path: path,
                section_heading: heading,
            };
            dispatch(&config, &request).await?
        }
        Commands::Toc { path } => {
            dispatch(&config, &ToolRequest::ListSections { file_path: path }).await?
        }
        Commands::Call { tool, args } => {
            let args: Value =
                serde_json::from_str(&args).context("tool arguments must be a JSON object")?;
            let request = ToolRequest::parse(&tool, args)?;
            dispatch(&config, &request).await?
        }
        Commands::Tools => ToolRegistry::with_defaults().catalogue(),
        Commands::Config { show } => return cmd_config(&cli.config, &config, show),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Read the request's file and answer it. File problems become error JSON.
async fn dispatch(config: &AppConfig, request: &ToolRequest) -> Result<Value> {
    let path = Path::new(request.file_path());
    let document = match read_document(path).await {
        Ok(document) => document,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "File not found");
            return Ok(error_json(format!("File not found: {}", request.file_path())));
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read file");
            return Ok(error_json(format!("Error reading file: {e}")));
        }
    };

    let reader = DocumentReader::from_config(config)?;
    info!(
        tool = request.tool_name(),
        path = %path.display(),
        bytes = document.size_bytes,
        "Handling request"
    );

    let mut response = reader.call(request, &document.text)?;
    annotate(&mut response, request, &document);
    Ok(response)
}

async fn read_document(path: &Path) -> std::io::Result<Document> {
    let bytes = tokio::fs::read(path).await?;
    let size_bytes = bytes.len();
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                path = %path.display(),
                valid_up_to = e.utf8_error().valid_up_to(),
                "File is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(Document {
        text,
        size_bytes,
        absolute: std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    })
}

/// Add file-level metadata the core doesn't know about.
fn annotate(response: &mut Value, request: &ToolRequest, document: &Document) {
    let is_summary = response["type"] == "summary";
    let original_tokens = response["original_tokens"].as_u64().unwrap_or(0) as usize;
    let summary_tokens = response["summary_tokens"].as_u64().unwrap_or(0) as usize;
    let Some(map) = response.as_object_mut() else {
        return;
    };

    let path = document.absolute.display().to_string();
    match request {
        ToolRequest::SmartRead { file_path, .. } if is_summary => {
            map.insert(
                "preamble".to_string(),
                Value::String(format_preamble(original_tokens, summary_tokens, file_path)),
            );
            let filename = document
                .absolute
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            map.insert(
                "original".to_string(),
                json!({
                    "path": path,
                    "filename": filename,
                    "size_bytes": document.size_bytes,
                    "size_tokens": original_tokens,
                }),
            );
        }
        ToolRequest::ListSections { .. } => {
            map.insert("type".to_string(), Value::from("toc"));
            map.insert("path".to_string(), Value::String(path));
            map.insert("note".to_string(), Value::from(TOC_NOTE));
        }
        _ => {
            map.insert("path".to_string(), Value::String(path));
        }
    }
}

fn error_json(message: String) -> Value {
    json!({ "error": message, "type": "error" })
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str = toml::to_string_pretty(config).context("failed to render configuration")?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Load the config file, or defaults when it doesn't exist. The flag reports
/// whether a file was found.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if path.exists() {
        let config = AppConfig::load(path)
            .await
            .with_context(|| format!("invalid configuration in '{}'", path.display()))?;
        Ok((config, true))
    } else {
        Ok((AppConfig::default(), false))
    }
}
