//! CLI routing and command dispatch.

use crate::constants;
use crate::core::config;
use crate::core::export::ExportFormat;
use crate::core::paths::StorePaths;
use crate::models::config::ConfigFile;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub mod create;
pub mod describe;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: StorePaths,
    pub namespace: String,
    pub timeout: Duration,
    pub export_format: ExportFormat,
}

#[derive(Parser, Debug)]
#[command(
    name = "helmcred",
    version,
    about = "Create or update secrets for Helm repository authentication"
)]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true, value_name = "PATH", env = "HELMCRED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory of the resource store
    #[arg(long, global = true, value_name = "PATH", env = "HELMCRED_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Namespace of the secret
    #[arg(short = 'n', long, global = true, env = "HELMCRED_NAMESPACE")]
    pub namespace: Option<String>,

    /// Deadline for store operations (e.g. 30s, 5m, 1m30s)
    #[arg(long, global = true, value_parser = parse_duration, env = "HELMCRED_TIMEOUT")]
    pub timeout: Option<Duration>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let defaults = config.defaults;

        let namespace = self
            .namespace
            .filter(|ns| !ns.is_empty())
            .or(defaults.namespace)
            .unwrap_or_else(|| constants::DEFAULT_NAMESPACE.to_string());

        let timeout = match (self.timeout, defaults.timeout) {
            (Some(t), _) => t,
            (None, Some(raw)) => parse_duration(&raw)
                .map_err(anyhow::Error::msg)
                .context("invalid timeout in config file")?,
            (None, None) => Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS),
        };

        let ctx = CliContext {
            paths: StorePaths::resolve(self.store_dir, defaults.store_dir),
            namespace,
            timeout,
            export_format: defaults.export_format.unwrap_or_default(),
        };

        match self.command {
            Commands::Create(args) => create::run(&ctx, args),
            Commands::Describe(args) => describe::run(&ctx, args),
        }
    }

    /// Explicit config paths must exist; the default one is optional and
    /// read best-effort.
    fn load_config(&self) -> Result<ConfigFile> {
        if let Some(path) = &self.config {
            if !path.is_file() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return config::load(path);
        }
        let path = PathBuf::from(constants::DEFAULT_CONFIG_PATH);
        match config::load(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("ignoring config {}: {:#}", path.display(), e);
                Ok(ConfigFile::default())
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update a Helm repository authentication secret
    Create(create::CreateArgs),
    /// Show a stored secret's metadata and payload keys
    Describe(describe::DescribeArgs),
}

/// Validate a secret name as a DNS-1123 subdomain.
pub fn parse_secret_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("secret name is required".into());
    }
    if s.len() > constants::MAX_NAME_LEN {
        return Err(format!(
            "must be no more than {} characters",
            constants::MAX_NAME_LEN
        ));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err("only lowercase [a-z0-9.-] allowed".into());
    }
    let alnum = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !alnum(s.chars().next()) || !alnum(s.chars().last()) {
        return Err("must start and end with an alphanumeric character".into());
    }
    Ok(s.to_string())
}

/// Parse a Go-style duration (`1m30s`, `500ms`, `2h`) or bare seconds,
/// up to `MAX_TIMEOUT_SECS`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".into());
    }
    let out_of_range = || format!("duration '{}' out of range", s);
    let max = Duration::from_secs(constants::MAX_TIMEOUT_SECS);

    let total = if let Ok(secs) = s.parse::<u64>() {
        Duration::from_secs(secs)
    } else {
        let mut total = Duration::ZERO;
        let mut rest = s;
        while !rest.is_empty() {
            let digits = rest
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(|| format!("missing unit in duration '{}'", s))?;
            if digits == 0 {
                return Err(format!("invalid duration '{}'", s));
            }
            let value: u64 = rest[..digits].parse().map_err(|_| out_of_range())?;
            rest = &rest[digits..];
            let unit_len = rest
                .find(|c: char| c.is_ascii_digit())
                .unwrap_or(rest.len());
            let unit = match &rest[..unit_len] {
                "ms" => Some(Duration::from_millis(value)),
                "s" => Some(Duration::from_secs(value)),
                "m" => value.checked_mul(60).map(Duration::from_secs),
                "h" => value.checked_mul(3600).map(Duration::from_secs),
                other => return Err(format!("unknown unit '{}' in duration '{}'", other, s)),
            };
            total = unit
                .and_then(|u| total.checked_add(u))
                .ok_or_else(out_of_range)?;
            rest = &rest[unit_len..];
        }
        total
    };

    if total > max {
        return Err(out_of_range());
    }
    Ok(total)
}
