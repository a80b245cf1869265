use serde::{Deserialize, Serialize};

pub const DEFAULT_NON_WINE_MARKER: &str = "~";

/// On-disk shape of a pattern registry. Patterns are plain regex source and
/// are compiled case-insensitively by [`super::PatternRegistry::from_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_non_wine_marker")]
    pub non_wine_marker: String,
    pub wineries: Vec<WineryConfig>,
    #[serde(default)]
    pub grapes: Vec<NamedPatternConfig>,
    #[serde(default)]
    pub sizes: Vec<NamedPatternConfig>,
    #[serde(default)]
    pub qualifiers: Vec<QualifierConfig>,
    #[serde(default)]
    pub forced_tags: Vec<ForcedTagConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineryConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub category: CategoryConfig,
    #[serde(default)]
    pub abbreviations: Vec<AbbreviationConfig>,
    #[serde(default)]
    pub priority: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryConfig {
    Ignore,
    /// `null` entries are stop markers.
    NamedProduct { products: Vec<Option<String>> },
    Spirit { subtypes: Vec<NamedPatternConfig> },
    #[default]
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedPatternConfig {
    pub name: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbbreviationConfig {
    pub phrase: String,
    pub pattern: String,
}

/// A `null` name marks a negation ("without gift box") that suppresses any
/// later qualifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifierConfig {
    pub name: Option<String>,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForcedTagConfig {
    pub winery: String,
    pub tag: String,
}

fn default_non_wine_marker() -> String {
    DEFAULT_NON_WINE_MARKER.to_string()
}
