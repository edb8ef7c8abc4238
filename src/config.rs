use anyhow::{Context, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use toml_scaffold::TomlScaffold;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "sharekeeper.toml";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, JsonSchema, TomlScaffold)]
pub struct Config {
    /// Which imports are disallowed and where
    #[serde(default)]
    pub rule: RuleConfig,
    /// How the working tree scan behaves
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema, TomlScaffold)]
pub struct RuleConfig {
    /// Module that must not be imported directly. Matches the literal clause `from "<module>"`
    #[serde(default = "default_module")]
    pub module: String,
    /// File suffixes treated as React components (case-sensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Paths containing this substring may import the module directly
    #[serde(default = "default_excluded_dir")]
    pub excluded_dir: String,
    /// Only paths containing this substring are checked
    #[serde(default = "default_tracked_marker")]
    pub tracked_marker: String,
    /// Extra glob patterns for paths that may import the module directly (optional, defaults to [])
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            module: default_module(),
            extensions: default_extensions(),
            excluded_dir: default_excluded_dir(),
            tracked_marker: default_tracked_marker(),
            exclude: vec![],
        }
    }
}

impl RuleConfig {
    /// Compile the `exclude` patterns
    pub fn exclude_set(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern)
                .with_context(|| format!("Invalid exclude pattern '{}'", pattern))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, JsonSchema, TomlScaffold)]
pub struct ScanConfig {
    /// What to do when a file's diff cannot be fetched: "abort" the scan or "skip" the file
    #[serde(default)]
    pub on_diff_error: DiffErrorPolicy,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiffErrorPolicy {
    #[default]
    Abort,
    Skip,
}

impl TomlScaffold for DiffErrorPolicy {}

fn default_module() -> String {
    "@nextui-org/react".to_string()
}

fn default_extensions() -> Vec<String> {
    vec![".tsx".to_string(), ".jsx".to_string()]
}

fn default_excluded_dir() -> String {
    "src/components".to_string()
}

fn default_tracked_marker() -> String {
    "src".to_string()
}

impl Config {
    /// Load config from `path` and apply `key.path=value` overrides.
    ///
    /// A missing file at the default path yields the default config; a
    /// missing file anywhere else is an error.
    pub fn load(path: &str, overrides: &[String]) -> anyhow::Result<Self> {
        let mut table = if Path::new(path).exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path))?;
            toml::from_str::<toml::Table>(&content)
                .with_context(|| format!("Failed to parse config file {}", path))?
        } else if path == DEFAULT_CONFIG_PATH {
            debug!("No {} found, using default config", path);
            toml::Table::new()
        } else {
            bail!("Config file {} not found", path);
        };

        for entry in overrides {
            apply_override(&mut table, entry)?;
        }

        let config: Config = toml::Value::Table(table)
            .try_into()
            .with_context(|| format!("Invalid config {}", path))?;
        config.rule.exclude_set()?;
        Ok(config)
    }
}

/// Write the commented default config to `path`. An existing file is
/// only replaced when `overwrite` is set.
pub fn write_scaffold(path: &str, overwrite: bool) -> anyhow::Result<()> {
    if Path::new(path).exists() && !overwrite {
        bail!(
            "Config file {} already exists, use --override to replace it",
            path
        );
    }

    let content = Config::default()
        .to_scaffold()
        .context("Failed to render default config")?;
    fs::write(path, content).with_context(|| format!("Failed to write config file {}", path))?;
    Ok(())
}

/// Apply a single `a.b.c=value` override. The value is parsed as TOML,
/// falling back to a plain string.
fn apply_override(table: &mut toml::Table, entry: &str) -> anyhow::Result<()> {
    let Some((key, raw)) = entry.split_once('=') else {
        bail!("Invalid config override '{}', expected key=value", entry);
    };
    let keys: Vec<&str> = key.trim().split('.').collect();
    if keys.iter().any(|k| k.is_empty()) {
        bail!("Invalid config override key '{}'", key);
    }

    let raw = raw.trim();
    let value = toml::from_str::<toml::Table>(&format!("value = {}", raw))
        .ok()
        .and_then(|mut t| t.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()));

    let Some((last, parents)) = keys.split_last() else {
        bail!("Invalid config override key '{}'", key);
    };
    let mut current = table;
    for k in parents {
        current = current
            .entry(k.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .with_context(|| format!("Config key '{}' is not a table", k))?;
    }
    current.insert(last.to_string(), value);
    Ok(())
}
