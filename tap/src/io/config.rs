//! `tap check` configuration, read from a TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::summary::SuccessPolicy;

/// Check configuration (TOML).
///
/// Missing fields default to the lenient behavior of plain TAP harnesses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckConfig {
    /// Treat skipped tests as failures.
    pub fail_on_skip: bool,

    /// Treat TODO tests that pass as failures.
    pub fail_on_bonus: bool,

    /// Print diagnostics attached to failing tests.
    pub show_diagnostics: bool,

    /// Print at most this many diagnostic lines per failing test.
    pub max_diagnostic_lines: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fail_on_skip: false,
            fail_on_bonus: false,
            show_diagnostics: true,
            max_diagnostic_lines: 20,
        }
    }
}

impl CheckConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_diagnostic_lines == 0 {
            return Err(anyhow!("max_diagnostic_lines must be > 0"));
        }
        Ok(())
    }

    pub fn policy(&self) -> SuccessPolicy {
        SuccessPolicy {
            fail_on_skip: self.fail_on_skip,
            fail_on_bonus: self.fail_on_bonus,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `CheckConfig::default()`.
pub fn load_config(path: &Path) -> Result<CheckConfig> {
    if !path.exists() {
        return Ok(CheckConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CheckConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
