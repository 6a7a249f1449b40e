//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shop_core::{LoadId, StorefrontConfig};
use shop_observability::{LogFormat, LogLevel, StructuredLogger};

use crate::output::Output;

/// File names searched for, in order, from the working directory upward.
pub const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Page configuration.
    pub config: StorefrontConfig,
    /// File the configuration came from; `None` means built-in defaults.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => Self::find_config(&cwd),
        };

        let config = match &config_path {
            Some(path) => StorefrontConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => StorefrontConfig::default(),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }

    /// Logger for one page load, matching the output mode.
    pub fn logger(&self, load_id: LoadId) -> StructuredLogger {
        let format = if self.output.is_json() {
            LogFormat::Json
        } else {
            LogFormat::Tracing
        };
        let level = if self.output.is_verbose() {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        StructuredLogger::new(load_id)
            .with_format(format)
            .with_min_level(level)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
