//! CLI subcommands and the helpers they share.

pub mod config;
pub mod demo;
pub mod process;
pub mod prompt;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::{debug, warn};

use clareia_core::models::config::UploadConfig;
use clareia_core::{ClareiaConfig, MediaType, UploadedFile};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clareia")
        .join("config.json")
}

/// Load the config from `--config` or the default path.
///
/// A file that does not exist yet means built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ClareiaConfig> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(ClareiaConfig::default());
    }

    debug!("Loading config from {}", path.display());
    ClareiaConfig::from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}

/// Read a file from disk the way the upload form would hand it over.
///
/// Enforces the size limit; media types outside the accepted list are only
/// warned about since they still go through the plain-text branch.
pub fn read_upload(
    path: &Path,
    media_type: Option<&str>,
    policy: &UploadConfig,
) -> anyhow::Result<UploadedFile> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let size = fs::metadata(path)?.len();
    if size > policy.max_file_bytes {
        anyhow::bail!(
            "File {} is {} bytes, which exceeds the {} byte upload limit",
            path.display(),
            size,
            policy.max_file_bytes
        );
    }

    let media_type = match media_type {
        Some(declared) => MediaType::parse(declared),
        None => MediaType::from_path(path),
    };

    if !policy.accepts(media_type.as_str()) {
        warn!("{} is not a PDF, JPG or PNG; reading it as text", media_type.as_str());
        eprintln!(
            "{} {} will be read as plain text",
            style("!").yellow(),
            path.display()
        );
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(UploadedFile::new(name, media_type, fs::read(path)?))
}

/// Print `output` or write it to `path`.
pub fn emit(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output)?;
            println!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}
