//! Compiled pattern registry.
//!
//! Everything the engine knows about wineries, grapes, bottle sizes and
//! qualifiers lives here as ordered, first-match-wins lists. The registry is
//! built once from a [`RegistryConfig`] and never mutated afterwards.

pub mod config;

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::engine::text::word_matcher;
use crate::{ClientError, ClientResult};

pub use config::RegistryConfig;

const BUILTIN_REGISTRY_JSON: &str = include_str!("builtin_registry.json");
pub const BUILTIN_ORIGIN: &str = "builtin";

#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    pub pattern: Regex,
}

#[derive(Debug, Clone)]
pub struct QualifierRule {
    pub name: Option<String>,
    pub pattern: Regex,
}

#[derive(Debug, Clone)]
pub enum ProductEntry {
    Name { name: String, matcher: Regex },
    Stop,
}

#[derive(Debug, Clone)]
pub enum CategoryKind {
    Ignore,
    NamedProduct(Vec<ProductEntry>),
    Spirit(Vec<PatternRule>),
    Default,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::NamedProduct(_) => "named_product",
            Self::Spirit(_) => "spirit",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WineryRule {
    pub name: String,
    pub pattern: Regex,
    pub category: CategoryKind,
    /// Keyed by the abbreviated phrase as it appears in master descriptions.
    pub abbreviations: Vec<PatternRule>,
    pub priority: Vec<String>,
}

impl WineryRule {
    pub fn expansion_for(&self, phrase: &str) -> Option<&Regex> {
        self.abbreviations
            .iter()
            .find(|rule| rule.name == phrase)
            .map(|rule| &rule.pattern)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedTag {
    pub winery: String,
    pub tag: String,
}

#[derive(Debug, Clone)]
pub struct PatternRegistry {
    pub origin: String,
    pub non_wine_marker: String,
    pub wineries: Vec<WineryRule>,
    pub grapes: Vec<PatternRule>,
    pub sizes: Vec<PatternRule>,
    pub qualifiers: Vec<QualifierRule>,
    pub forced_tags: Vec<ForcedTag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryCounts {
    pub wineries: usize,
    pub ignore_category_wineries: usize,
    pub named_product_wineries: usize,
    pub spirit_wineries: usize,
    pub grapes: usize,
    pub sizes: usize,
    pub qualifiers: usize,
    pub forced_tags: usize,
}

impl PatternRegistry {
    pub fn builtin() -> ClientResult<Self> {
        Self::from_json(BUILTIN_REGISTRY_JSON, BUILTIN_ORIGIN)
    }

    pub fn from_json(content: &str, origin: &str) -> ClientResult<Self> {
        let config = serde_json::from_str::<RegistryConfig>(content)
            .map_err(|error| ClientError::registry_invalid(origin, &error.to_string()))?;
        Self::from_config(&config, origin)
    }

    pub fn from_config(config: &RegistryConfig, origin: &str) -> ClientResult<Self> {
        let mut seen_names = HashSet::new();
        let mut wineries = Vec::with_capacity(config.wineries.len());
        for winery in &config.wineries {
            if !seen_names.insert(winery.name.as_str()) {
                return Err(ClientError::registry_invalid(
                    origin,
                    &format!("winery `{}` is declared more than once", winery.name),
                ));
            }
            wineries.push(compile_winery(winery, origin)?);
        }

        let grapes = compile_named(&config.grapes, "grape", origin)?;
        let sizes = compile_named(&config.sizes, "size", origin)?;

        let mut qualifiers = Vec::with_capacity(config.qualifiers.len());
        for qualifier in &config.qualifiers {
            let label = qualifier.name.as_deref().unwrap_or("(negation)");
            let owner = format!("qualifier `{label}`");
            qualifiers.push(QualifierRule {
                name: qualifier.name.clone(),
                pattern: compile_pattern(&qualifier.pattern, &owner, origin)?,
            });
        }

        let mut forced_tags = Vec::with_capacity(config.forced_tags.len());
        for forced in &config.forced_tags {
            if !seen_names.contains(forced.winery.as_str()) {
                return Err(ClientError::registry_invalid(
                    origin,
                    &format!("forced tag names unknown winery `{}`", forced.winery),
                ));
            }
            forced_tags.push(ForcedTag {
                winery: forced.winery.clone(),
                tag: forced.tag.clone(),
            });
        }

        Ok(Self {
            origin: origin.to_string(),
            non_wine_marker: config.non_wine_marker.clone(),
            wineries,
            grapes,
            sizes,
            qualifiers,
            forced_tags,
        })
    }

    pub fn winery(&self, index: usize) -> Option<&WineryRule> {
        self.wineries.get(index)
    }

    pub fn forced_tag(&self, winery: &str) -> Option<&str> {
        self.forced_tags
            .iter()
            .find(|forced| forced.winery == winery)
            .map(|forced| forced.tag.as_str())
    }

    pub fn is_non_wine(&self, winery: &str) -> bool {
        !self.non_wine_marker.is_empty() && winery.starts_with(&self.non_wine_marker)
    }

    pub fn counts(&self) -> RegistryCounts {
        let count_kind = |wanted: &str| {
            self.wineries
                .iter()
                .filter(|winery| winery.category.as_str() == wanted)
                .count()
        };
        RegistryCounts {
            wineries: self.wineries.len(),
            ignore_category_wineries: count_kind("ignore"),
            named_product_wineries: count_kind("named_product"),
            spirit_wineries: count_kind("spirit"),
            grapes: self.grapes.len(),
            sizes: self.sizes.len(),
            qualifiers: self.qualifiers.len(),
            forced_tags: self.forced_tags.len(),
        }
    }
}

fn compile_winery(winery: &config::WineryConfig, origin: &str) -> ClientResult<WineryRule> {
    let owner = format!("winery `{}`", winery.name);
    let category = match &winery.category {
        config::CategoryConfig::Ignore => CategoryKind::Ignore,
        config::CategoryConfig::Default => CategoryKind::Default,
        config::CategoryConfig::Spirit { subtypes } => {
            CategoryKind::Spirit(compile_named(subtypes, &format!("{owner} subtype"), origin)?)
        }
        config::CategoryConfig::NamedProduct { products } => {
            let mut entries = Vec::with_capacity(products.len());
            for product in products {
                match product {
                    Some(name) => {
                        let matcher = word_matcher(name).map_err(|error| {
                            ClientError::registry_invalid(
                                origin,
                                &format!("{owner} product `{name}`: {error}"),
                            )
                        })?;
                        entries.push(ProductEntry::Name {
                            name: name.clone(),
                            matcher,
                        });
                    }
                    None => entries.push(ProductEntry::Stop),
                }
            }
            CategoryKind::NamedProduct(entries)
        }
    };

    let mut abbreviations = Vec::with_capacity(winery.abbreviations.len());
    for abbreviation in &winery.abbreviations {
        abbreviations.push(PatternRule {
            name: abbreviation.phrase.clone(),
            pattern: compile_pattern(
                &abbreviation.pattern,
                &format!("{owner} abbreviation `{}`", abbreviation.phrase),
                origin,
            )?,
        });
    }

    Ok(WineryRule {
        name: winery.name.clone(),
        pattern: compile_pattern(&winery.pattern, &owner, origin)?,
        category,
        abbreviations,
        priority: winery.priority.clone(),
    })
}

fn compile_named(
    entries: &[config::NamedPatternConfig],
    kind: &str,
    origin: &str,
) -> ClientResult<Vec<PatternRule>> {
    entries
        .iter()
        .map(|entry| {
            Ok(PatternRule {
                name: entry.name.clone(),
                pattern: compile_pattern(
                    &entry.pattern,
                    &format!("{kind} `{}`", entry.name),
                    origin,
                )?,
            })
        })
        .collect()
}

fn compile_pattern(pattern: &str, owner: &str, origin: &str) -> ClientResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|error| ClientError::registry_invalid(origin, &format!("{owner}: {error}")))
}

#[cfg(test)]
mod tests {
    use super::{CategoryKind, PatternRegistry, ProductEntry};

    #[test]
    fn builtin_registry_compiles() {
        let registry = PatternRegistry::builtin();
        assert!(registry.is_ok());
        if let Ok(registry) = registry {
            assert_eq!(registry.origin, "builtin");
            assert!(registry.counts().wineries > 10);
            assert!(registry.counts().spirit_wineries > 0);
            assert!(registry.counts().named_product_wineries > 0);
        }
    }

    #[test]
    fn invalid_pattern_names_the_offending_entry() {
        let result = PatternRegistry::from_json(
            r#"{"wineries": [{"name": "Acme", "pattern": "acme("}]}"#,
            "broken.json",
        );
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "registry_invalid");
            assert!(error.message.contains("broken.json"));
            assert!(error.message.contains("winery `Acme`"));
        }
    }

    #[test]
    fn duplicate_winery_names_are_rejected() {
        let result = PatternRegistry::from_json(
            r#"{"wineries": [
                {"name": "Acme", "pattern": "acme"},
                {"name": "Acme", "pattern": "acme cellars"}
            ]}"#,
            "dupes.json",
        );
        assert!(result.is_err());
    }

    #[test]
    fn forced_tags_must_reference_a_declared_winery() {
        let result = PatternRegistry::from_json(
            r#"{
                "wineries": [{"name": "Acme", "pattern": "acme"}],
                "forced_tags": [{"winery": "Nobody", "tag": "Res"}]
            }"#,
            "forced.json",
        );
        assert!(result.is_err());
    }

    #[test]
    fn compiled_patterns_ignore_case() {
        let result = PatternRegistry::from_json(
            r#"{"wineries": [{
                "name": "Dominus",
                "pattern": "\\bdominus\\b",
                "category": {"kind": "named_product", "products": ["Napanook", null]}
            }]}"#,
            "case.json",
        );
        assert!(result.is_ok());
        if let Ok(registry) = result {
            let rule = &registry.wineries[0];
            assert!(rule.pattern.is_match("DOMINUS ESTATE"));
            let CategoryKind::NamedProduct(entries) = &rule.category else {
                panic!("expected named product category");
            };
            assert!(matches!(entries[1], ProductEntry::Stop));
            if let ProductEntry::Name { matcher, .. } = &entries[0] {
                assert!(matcher.is_match("dominus napanook 2018"));
                assert!(!matcher.is_match("dominus napanookish"));
            }
        }
    }

    #[test]
    fn non_wine_marker_is_a_name_prefix() {
        let result = PatternRegistry::from_json(
            r#"{"wineries": [{"name": "~Buffalo Trace", "pattern": "buffalo\\s+trace"}]}"#,
            "marker.json",
        );
        assert!(result.is_ok());
        if let Ok(registry) = result {
            assert!(registry.is_non_wine("~Buffalo Trace"));
            assert!(!registry.is_non_wine("Caymus"));
        }
    }
}
