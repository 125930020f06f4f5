//! XML configuration support.
//!
//! ```xml
//! <config>
//!   <source_root>/path/to/tree</source_root>
//!   <result_dir>/path/to/Result</result_dir>
//!   <log_level>normal</log_level>
//!   <log_file>/path/to/consolidate.log</log_file>
//!   <header_mode>if-empty</header_mode>
//!   <keep_going>false</keep_going>
//! </config>
//! ```
//!
//! Notes:
//! - This module only reads the config file; directory validation happens elsewhere.
//! - Unknown XML fields are rejected so misconfigurations surface early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{CONFIG_ENV, default_config_path};
use super::types::{Config, LogLevel, OnError};
use crate::report::HeaderMode;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source_root: Option<String>,
    result_dir: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    header_mode: Option<String>,
    keep_going: Option<bool>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    cfg.source_root = non_empty(parsed.source_root.as_deref()).map(PathBuf::from);
    if let Some(dir) = non_empty(parsed.result_dir.as_deref()) {
        cfg.result_dir = PathBuf::from(dir);
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);

    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.header_mode.as_deref()) {
        cfg.header_mode = s.parse::<HeaderMode>().map_err(anyhow::Error::msg)?;
    }
    if parsed.keep_going.unwrap_or(false) {
        cfg.on_error = OnError::Skip;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Load the config file, if there is one.
///
/// - `$FILE_CONSOLIDATE_CONFIG` set but missing: error.
/// - Default location missing: `Ok(None)`, callers use defaults.
pub fn load_config_from_xml() -> Result<Option<Config>> {
    let explicit = env::var_os(CONFIG_ENV).is_some();
    let path = default_config_path()?;
    if !path.exists() {
        if explicit {
            bail!("{CONFIG_ENV} points to '{}', which does not exist", path.display());
        }
        debug!(path = %path.display(), "No config file; using defaults");
        return Ok(None);
    }
    debug!(path = %path.display(), "Loading config file");
    load_config_from_xml_path(&path).map(Some)
}
