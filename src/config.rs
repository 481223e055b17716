//! Export profiles loaded from a TOML file.
//!
//! ```toml
//! [profiles.catalog]
//! path = "/catalog"
//! root = "catalog"
//! xslt = "catalog.xsl"
//! include_variants = true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root element name used by profiles that do not set one.
pub const DEFAULT_ROOT: &str = "root";

/// Parsed configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    /// Directory the file was loaded from; relative stylesheets resolve here.
    #[serde(skip)]
    base_dir: PathBuf,
}

/// A named set of export options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Store path of the exported tree.
    pub path: Option<String>,
    /// Name of the document root element.
    pub root: Option<String>,
    /// Stylesheet; an empty string means none.
    pub xslt: Option<String>,
    #[serde(default)]
    pub include_variants: bool,
    #[serde(default)]
    pub omit_relation_object_fields: bool,
}

impl Config {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles.get(name).with_context(|| {
            let known: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
            format!("Unknown profile '{}' (configured: {})", name, known.join(", "))
        })
    }

    /// Resolve a profile's stylesheet against the config file location.
    pub fn stylesheet(&self, profile: &Profile) -> Option<PathBuf> {
        let xslt = profile.xslt.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(self.base_dir.join(xslt))
    }
}

impl Profile {
    /// Root element name, falling back to [`DEFAULT_ROOT`].
    pub fn root(&self) -> &str {
        self.root.as_deref().unwrap_or(DEFAULT_ROOT)
    }
}
