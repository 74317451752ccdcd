use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::FetchSettings;
use crate::engine::{EntityConfig, DEFAULT_PAGE_SIZE};
use crate::entity::Entity;
use crate::pipeline::{FieldKind, FieldSchema, Filters, SortConfig, SortKey, ALL};
use crate::sdk::{EntitySdk, MemorySdk, RestSdk};

/// Environment variable holding the backend API token.
pub const TOKEN_ENV: &str = "ENTAB_API_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub backend: BackendConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  /// Rows per page for tabs that do not set their own
  pub page_size: Option<usize>,
  /// Custom title for the header
  pub title: Option<String>,
  pub tabs: Vec<TabConfig>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
  /// JSON over HTTP, one endpoint per tab
  Rest,
  /// In-process records seeded from the config; nothing is persisted
  #[default]
  Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
  #[serde(default)]
  pub kind: BackendKind,
  /// Base URL of the REST API; required for `rest`
  pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// Default list TTL
  pub ttl_secs: Option<u64>,
  pub cooldown_ms: Option<u64>,
  pub max_retries: Option<u32>,
  pub base_delay_ms: Option<u64>,
  pub max_delay_ms: Option<u64>,
}

impl CacheConfig {
  pub fn fetch_settings(&self) -> FetchSettings {
    let defaults = FetchSettings::default();
    FetchSettings {
      default_ttl: self
        .ttl_secs
        .map(Duration::from_secs)
        .unwrap_or(defaults.default_ttl),
      max_retries: self.max_retries.unwrap_or(defaults.max_retries),
      base_delay: self
        .base_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(defaults.base_delay),
      max_delay: self
        .max_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(defaults.max_delay),
      cooldown: self
        .cooldown_ms
        .map(Duration::from_millis)
        .unwrap_or(defaults.cooldown),
    }
  }
}

/// One categorical filter shown in the filter bar.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
  /// Record field the filter compares against
  pub name: String,
  pub label: Option<String>,
  pub values: Vec<String>,
  /// Initial value; `all` when unset
  pub default: Option<String>,
}

impl FilterConfig {
  pub fn label(&self) -> &str {
    self.label.as_deref().unwrap_or(&self.name)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
  pub name: String,
  #[serde(default)]
  pub kind: FieldKind,
  pub label: Option<String>,
  /// Show the field in the create/edit form
  #[serde(default = "default_true")]
  pub form: bool,
  /// Show the field as a table column
  #[serde(default = "default_true")]
  pub column: bool,
}

fn default_true() -> bool {
  true
}

impl FieldConfig {
  pub fn label(&self) -> &str {
    self.label.as_deref().unwrap_or(&self.name)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TabConfig {
  /// Cache key and command name
  pub key: String,
  /// Singular display name
  pub name: String,
  pub plural: Option<String>,
  /// Path below the backend URL; defaults to the key
  pub endpoint: Option<String>,
  pub ttl_secs: Option<u64>,
  pub page_size: Option<usize>,
  pub sort_hint: Option<String>,
  pub title_field: Option<String>,
  #[serde(default)]
  pub search_fields: Vec<String>,
  #[serde(default)]
  pub filters: Vec<FilterConfig>,
  #[serde(default)]
  pub initial_sort: Vec<SortKey>,
  #[serde(default)]
  pub fields: Vec<FieldConfig>,
  /// Field whose values become kanban columns
  pub kanban_field: Option<String>,
  /// Seed records for the memory backend
  #[serde(default)]
  pub records: Vec<Value>,
}

impl TabConfig {
  pub fn endpoint(&self) -> &str {
    self.endpoint.as_deref().unwrap_or(&self.key)
  }

  pub fn plural(&self) -> String {
    self
      .plural
      .clone()
      .unwrap_or_else(|| format!("{}s", self.name))
  }

  pub fn schema(&self) -> FieldSchema {
    self
      .fields
      .iter()
      .fold(FieldSchema::new(), |schema, field| {
        schema.with(field.name.clone(), field.kind)
      })
  }

  pub fn initial_filters(&self) -> Filters {
    self.filters.iter().fold(Filters::new(), |filters, filter| {
      filters.with(
        filter.name.clone(),
        filter.default.clone().unwrap_or_else(|| ALL.to_string()),
      )
    })
  }

  /// Engine configuration for this tab.
  pub fn entity_config(&self, sdk: Arc<dyn EntitySdk>, default_page_size: usize) -> EntityConfig {
    let mut config = EntityConfig::new(self.key.clone(), self.name.clone(), sdk)
      .with_plural(self.plural())
      .with_search_fields(self.search_fields.clone())
      .with_initial_filters(self.initial_filters())
      .with_initial_sort(SortConfig::new(self.initial_sort.clone()))
      .with_fields(self.schema())
      .with_page_size(self.page_size.unwrap_or(default_page_size));

    if let Some(ttl) = self.ttl_secs {
      config = config.with_ttl(Duration::from_secs(ttl));
    }
    if let Some(hint) = &self.sort_hint {
      config = config.with_sort_hint(hint.clone());
    }
    if let Some(field) = &self.title_field {
      config = config.with_title_field(field.clone());
    }
    config
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./entab.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/entab/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/entab/config.yaml\n\
         See entab.example.yaml for the format."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("entab.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("entab").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  /// Parse and validate YAML configuration.
  pub fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.tabs.is_empty() {
      return Err(eyre!("at least one tab must be configured"));
    }
    for (i, tab) in self.tabs.iter().enumerate() {
      if self.tabs[..i].iter().any(|other| other.key == tab.key) {
        return Err(eyre!("duplicate tab key '{}'", tab.key));
      }
    }
    if self.backend.kind == BackendKind::Rest && self.backend.url.is_none() {
      return Err(eyre!("backend.url is required for the rest backend"));
    }
    Ok(())
  }

  pub fn page_size(&self) -> usize {
    self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
  }

  pub fn tab(&self, key: &str) -> Option<&TabConfig> {
    self.tabs.iter().find(|t| t.key == key)
  }

  /// Get the API token from the environment, if set.
  pub fn api_token() -> Option<String> {
    std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty())
  }

  /// Build the SDK serving one tab.
  pub fn build_sdk(&self, tab: &TabConfig, client: &reqwest::Client) -> Result<Arc<dyn EntitySdk>> {
    match self.backend.kind {
      BackendKind::Memory => {
        let records = tab
          .records
          .iter()
          .cloned()
          .filter_map(Entity::from_value)
          .collect();
        Ok(Arc::new(MemorySdk::with_records(records)))
      }
      BackendKind::Rest => {
        let url = self
          .backend
          .url
          .as_deref()
          .ok_or_else(|| eyre!("backend.url is required for the rest backend"))?;
        let sdk = RestSdk::new(client.clone(), url, tab.endpoint(), Self::api_token())
          .map_err(|e| eyre!("Failed to set up SDK for {}: {}", tab.key, e))?;
        Ok(Arc::new(sdk))
      }
    }
  }
}
