use crate::cli::CliArgs;
use crate::columns::ColumnStore;
use crate::model::NamespaceScope;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_CANDIDATES: [&str; 3] = ["podji.yaml", "podji.yml", ".podji.yaml"];

/// Startup presets. Every field is optional; flags win over the file.
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct PodjiConfig {
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub kind: Option<String>,
    /// Visible column ids per kind name.
    pub columns: BTreeMap<String, Vec<String>>,
}

impl PodjiConfig {
    /// Loads `explicit` if given, otherwise the first config file found in `dir`.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_path(dir),
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Flags override the file: `-A` beats `-n`, which beats `namespace:`.
    pub fn merge_args(mut self, args: &CliArgs) -> Self {
        if args.all_namespaces {
            self.namespace = Some(NamespaceScope::All.label());
        } else if let Some(namespace) = &args.namespace {
            self.namespace = Some(namespace.clone());
        }
        if let Some(context) = &args.context {
            self.context = Some(context.clone());
        }
        if let Some(kind) = &args.kind {
            self.kind = Some(kind.clone());
        }
        self
    }

    pub fn seed_columns(&self, store: &ColumnStore) {
        for (kind, ids) in &self.columns {
            store.set(kind, ids.clone());
        }
    }
}

fn discover_config_path(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.exists())
}
