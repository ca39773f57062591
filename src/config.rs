use anyhow::{Context, Result};
use clap::Parser;
use std::{env, path::PathBuf, str::FromStr};

use crate::models::namespace::NamespaceRoots;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: String,
    pub public_base_url: String,
    pub batch_concurrency: usize,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Product, order and profile asset store")]
pub struct Args {
    /// Host to bind to (overrides ASSET_STORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides ASSET_STORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Root directory holding the asset namespaces (overrides ASSET_STORE_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Base URL used to build access URIs (overrides ASSET_STORE_PUBLIC_BASE_URL)
    #[arg(long)]
    pub public_base_url: Option<String>,

    /// Items processed concurrently inside one batch (overrides ASSET_STORE_BATCH_CONCURRENCY)
    #[arg(long)]
    pub batch_concurrency: Option<usize>,

    /// Request body limit in bytes (overrides ASSET_STORE_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("ASSET_STORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_number("ASSET_STORE_PORT", 3000u16)?;
        let env_storage =
            env::var("ASSET_STORE_STORAGE_DIR").unwrap_or_else(|_| "./data/assets".into());
        let env_base_url = env::var("ASSET_STORE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());
        let env_concurrency = env_number("ASSET_STORE_BATCH_CONCURRENCY", 4usize)?;
        let env_max_upload =
            env_number("ASSET_STORE_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            public_base_url: args.public_base_url.unwrap_or(env_base_url),
            batch_concurrency: args.batch_concurrency.unwrap_or(env_concurrency).max(1),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn namespace_roots(&self) -> NamespaceRoots {
        NamespaceRoots::under(PathBuf::from(&self.storage_dir))
    }
}

/// Read a numeric env var, falling back to `default` when unset.
fn env_number<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = match env::var(key) {
        Ok(value) => Some(value),
        Err(env::VarError::NotPresent) => None,
        Err(err) => return Err(err).with_context(|| format!("reading {}", key)),
    };
    parse_number(key, raw, default)
}

fn parse_number<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        None => Ok(default),
    }
}
