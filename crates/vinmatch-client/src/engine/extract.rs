//! Stateless attribute extractors.
//!
//! Each extractor scans an ordered rule list and returns the first hit along
//! with the byte span it covered, so the lookup builder can cut the token out
//! of a master description.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::engine::text::word_span;
use crate::registry::{CategoryKind, PatternRegistry, PatternRule, ProductEntry, WineryRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub value: String,
    pub span: Range<usize>,
}

impl TokenMatch {
    fn new(value: &str, span: Range<usize>) -> Self {
        Self {
            value: value.to_string(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WineryMatch {
    pub index: usize,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// Winery is configured to never carry a category.
    Ignored,
    /// Named-product scan reached a stop marker.
    Stopped,
    Matched(TokenMatch),
    Unmatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Ignored,
    Stopped,
    Matched,
    Unmatched,
}

impl CategoryOutcome {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Matched(found) => Some(found.value.as_str()),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::Matched(found) => Some(found.span.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> CategoryStatus {
        match self {
            Self::Ignored => CategoryStatus::Ignored,
            Self::Stopped => CategoryStatus::Stopped,
            Self::Matched(_) => CategoryStatus::Matched,
            Self::Unmatched => CategoryStatus::Unmatched,
        }
    }
}

/// Four-digit pairs, then a bounded four-digit year, then two digits.
static VINTAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:^|\s)((?:19|20)\d{2})\s*[-/&]\s*((?:19|20)\d{2})(?:\s|$)",
        r"(?:^|\s)((?:19|20)\d{2})(?:\s|$)",
        r"(?:^|\s)['’](\d{2})(?:\s|$)|\s(\d{2})\s*$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static SHIPS_AS_DISCLAIMER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\(?\b(?:will\s+)?ships?\s+as\b[^)]*\)?").ok());

static CASE_LOT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\b12\s*x\s*750\s*ml\b|\bcase\b").ok());

pub const CASE_TOKEN: &str = "case";

/// First winery rule whose pattern matches. A hint (the previous record's rule
/// index) is tried first but only accepted when no earlier rule matches, so
/// the answer is always the same as a full scan.
pub fn find_winery(
    registry: &PatternRegistry,
    text: &str,
    hint: Option<usize>,
) -> Option<WineryMatch> {
    if let Some(index) = hint
        && let Some(rule) = registry.winery(index)
        && let Some(found) = rule.pattern.find(text)
    {
        let shadowed = registry.wineries[..index]
            .iter()
            .any(|earlier| earlier.pattern.is_match(text));
        if !shadowed {
            return Some(WineryMatch {
                index,
                span: found.range(),
            });
        }
    }

    registry
        .wineries
        .iter()
        .enumerate()
        .find_map(|(index, rule)| {
            rule.pattern.find(text).map(|found| WineryMatch {
                index,
                span: found.range(),
            })
        })
}

pub fn find_category(
    registry: &PatternRegistry,
    winery: &WineryRule,
    text: &str,
) -> CategoryOutcome {
    match &winery.category {
        CategoryKind::Ignore => CategoryOutcome::Ignored,
        CategoryKind::NamedProduct(entries) => find_named_product(winery, entries, text),
        CategoryKind::Spirit(subtypes) => first_rule_match(subtypes, text),
        CategoryKind::Default => first_rule_match(&registry.grapes, text),
    }
}

fn find_named_product(winery: &WineryRule, entries: &[ProductEntry], text: &str) -> CategoryOutcome {
    for entry in entries {
        let ProductEntry::Name { name, matcher } = entry else {
            return CategoryOutcome::Stopped;
        };
        if let Some(span) = word_span(matcher, text) {
            return CategoryOutcome::Matched(TokenMatch::new(name, span));
        }
        if let Some(found) = winery
            .expansion_for(name)
            .and_then(|expansion| expansion.find(text))
        {
            return CategoryOutcome::Matched(TokenMatch::new(name, found.range()));
        }
    }
    CategoryOutcome::Unmatched
}

fn first_rule_match(rules: &[PatternRule], text: &str) -> CategoryOutcome {
    rules
        .iter()
        .find_map(|rule| {
            rule.pattern
                .find(text)
                .map(|found| TokenMatch::new(&rule.name, found.range()))
        })
        .map_or(CategoryOutcome::Unmatched, CategoryOutcome::Matched)
}

/// Vintage from the first date pattern that matches; within that match the
/// capture groups are checked in order and the first non-empty one wins.
///
/// The span covers the whole date token (both years of a pair, the
/// apostrophe of `'09`) so cutting it leaves no stray separator behind.
pub fn find_vintage(text: &str) -> Option<TokenMatch> {
    VINTAGE_PATTERNS.iter().find_map(|pattern| {
        let captures = pattern.captures(text)?;
        let value = captures
            .iter()
            .skip(1)
            .flatten()
            .find(|group| !group.as_str().is_empty())?;
        let whole = captures.get(0)?;
        Some(TokenMatch::new(
            value.as_str(),
            trim_whitespace(text, whole.range()),
        ))
    })
}

pub fn find_size(registry: &PatternRegistry, text: &str) -> Option<TokenMatch> {
    let disclaimers = SHIPS_AS_DISCLAIMER
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .map(|found| found.range())
        .collect::<Vec<Range<usize>>>();

    registry.sizes.iter().find_map(|rule| {
        rule.pattern
            .find_iter(text)
            .find(|found| !disclaimers.iter().any(|clause| overlaps(clause, &found.range())))
            .map(|found| TokenMatch::new(&rule.name, found.range()))
    })
}

/// A negation rule (no name) that matches first means "no qualifier".
pub fn find_qualifier(registry: &PatternRegistry, text: &str) -> Option<TokenMatch> {
    for rule in &registry.qualifiers {
        if let Some(found) = rule.pattern.find(text) {
            return rule
                .name
                .as_deref()
                .map(|name| TokenMatch::new(name, found.range()));
        }
    }
    None
}

pub fn find_case(text: &str) -> Option<TokenMatch> {
    CASE_LOT
        .as_ref()?
        .find(text)
        .map(|found| TokenMatch::new(CASE_TOKEN, found.range()))
}

pub fn find_case_flag(text: &str) -> bool {
    CASE_LOT
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}

fn trim_whitespace(text: &str, span: Range<usize>) -> Range<usize> {
    let slice = &text[span.clone()];
    let start = span.start + (slice.len() - slice.trim_start().len());
    let end = span.end - (slice.len() - slice.trim_end().len());
    start..end.max(start)
}

fn overlaps(left: &Range<usize>, right: &Range<usize>) -> bool {
    left.start < right.end && right.start < left.end
}

#[cfg(test)]
mod tests {
    use super::{
        CategoryOutcome, find_case_flag, find_category, find_qualifier, find_size, find_vintage,
        find_winery,
    };
    use crate::registry::PatternRegistry;

    fn registry() -> PatternRegistry {
        let built = PatternRegistry::from_json(
            r#"{
                "wineries": [
                    {"name": "Acme Reserve Cellars", "pattern": "\\bacme\\s+reserve\\b"},
                    {"name": "Acme", "pattern": "\\bacme\\b"},
                    {"name": "Opus One", "pattern": "\\bopus\\s+one\\b", "category": {"kind": "ignore"}},
                    {"name": "Dominus", "pattern": "\\bdominus\\b",
                     "category": {"kind": "named_product", "products": ["Napanook", null, "Othello"]},
                     "abbreviations": [{"phrase": "Napanook", "pattern": "\\bnapa\\s*nook\\b"}]},
                    {"name": "~Don Julio", "pattern": "\\bdon\\s+julio\\b",
                     "category": {"kind": "spirit", "subtypes": [
                        {"name": "1942", "pattern": "\\b1942\\b"},
                        {"name": "Anejo", "pattern": "\\banejo\\b"}
                     ]}}
                ],
                "grapes": [
                    {"name": "CabFranc", "pattern": "\\bcab(ernet)?\\s*franc\\b"},
                    {"name": "Cab", "pattern": "\\bcab(ernet)?(\\s*sauvignon)?\\b"}
                ],
                "sizes": [
                    {"name": "1.5Ltr", "pattern": "\\b1\\.5\\s*l(tr)?\\b|\\bmagnum\\b"},
                    {"name": "375mL", "pattern": "\\b375\\s*ml\\b"}
                ],
                "qualifiers": [
                    {"name": null, "pattern": "\\bw/o\\s+gift\\b"},
                    {"name": "Gift", "pattern": "\\bgift\\b"},
                    {"name": "Etch", "pattern": "\\betched\\b"}
                ]
            }"#,
            "extract-tests",
        );
        assert!(built.is_ok());
        match built {
            Ok(registry) => registry,
            Err(error) => panic!("test registry failed to compile: {}", error.message),
        }
    }

    #[test]
    fn first_winery_in_registry_order_wins() {
        let registry = registry();
        let found = find_winery(&registry, "ACME Reserve Cab 2016", None);
        assert_eq!(found.map(|winery| winery.index), Some(0));
        let plain = find_winery(&registry, "Acme Cab 2016", None);
        assert_eq!(plain.map(|winery| winery.index), Some(1));
        assert!(find_winery(&registry, "Unknown Cellars Merlot", None).is_none());
    }

    #[test]
    fn winery_hint_never_changes_the_answer() {
        let registry = registry();
        let text = "Acme Reserve Cab 2016";
        for hint in [None, Some(0), Some(1), Some(3), Some(99)] {
            let found = find_winery(&registry, text, hint);
            assert_eq!(found.map(|winery| winery.index), Some(0), "hint {hint:?}");
        }
        let hinted = find_winery(&registry, "Dominus 2018", Some(3));
        assert_eq!(hinted.map(|winery| winery.index), Some(3));
    }

    #[test]
    fn ignore_category_is_distinct_from_not_found() {
        let registry = registry();
        let opus = &registry.wineries[2];
        assert_eq!(
            find_category(&registry, opus, "Opus One Cab 2015"),
            CategoryOutcome::Ignored
        );
        let acme = &registry.wineries[1];
        assert_eq!(
            find_category(&registry, acme, "Acme Merlot 2015"),
            CategoryOutcome::Unmatched
        );
    }

    #[test]
    fn grape_list_is_first_match_wins() {
        let registry = registry();
        let acme = &registry.wineries[1];
        let outcome = find_category(&registry, acme, "Acme Cabernet Franc 2015");
        assert_eq!(outcome.name(), Some("CabFranc"));
        let outcome = find_category(&registry, acme, "Acme Cabernet Sauvignon 2015");
        assert_eq!(outcome.name(), Some("Cab"));
        assert_eq!(outcome.span(), Some(5..23));
    }

    #[test]
    fn named_products_use_expansions_and_stop_markers() {
        let registry = registry();
        let dominus = &registry.wineries[3];
        let expanded = find_category(&registry, dominus, "Dominus Napa Nook 2017");
        assert_eq!(expanded.name(), Some("Napanook"));
        let stopped = find_category(&registry, dominus, "Dominus Othello 2017");
        assert_eq!(stopped, CategoryOutcome::Stopped);
    }

    #[test]
    fn spirit_subtypes_follow_configured_order() {
        let registry = registry();
        let don = &registry.wineries[4];
        let outcome = find_category(&registry, don, "Don Julio Anejo 1942 Tequila");
        assert_eq!(outcome.name(), Some("1942"));
    }

    #[test]
    fn vintage_patterns_are_tried_in_priority_order() {
        assert_eq!(
            find_vintage("Acme Cab 2014/2015 blend").map(|found| found.value),
            Some("2014".to_string())
        );
        assert_eq!(
            find_vintage("Acme Cab 2015").map(|found| found.value),
            Some("2015".to_string())
        );
        assert_eq!(
            find_vintage("Acme Cab '09 Magnum").map(|found| found.value),
            Some("09".to_string())
        );
        assert_eq!(
            find_vintage("Acme Cab 15").map(|found| found.value),
            Some("15".to_string())
        );
        assert_eq!(find_vintage("Acme Cab 12 X 750 ML"), None);
        assert_eq!(find_vintage("Acme Cab NV"), None);
    }

    #[test]
    fn vintage_span_covers_the_whole_date_token() {
        let text = "Acme Cab 2012 - 2013 Reserve";
        let found = find_vintage(text);
        assert!(found.is_some());
        if let Some(found) = found {
            assert_eq!(found.value, "2012");
            assert_eq!(&text[found.span], "2012 - 2013");
        }

        let text = "Acme Cab '09 Magnum";
        let found = find_vintage(text);
        assert!(found.is_some());
        if let Some(found) = found {
            assert_eq!(&text[found.span], "'09");
        }
    }

    #[test]
    fn size_inside_ships_as_disclaimer_is_ignored() {
        let registry = registry();
        assert_eq!(find_size(&registry, "Acme Cab 2015 (ships as 375mL)"), None);
        assert_eq!(
            find_size(&registry, "Acme Cab 375ml 2015 (ships as 1.5L)").map(|found| found.value),
            Some("375mL".to_string())
        );
        assert_eq!(
            find_size(&registry, "Acme Cab Magnum 2015").map(|found| found.value),
            Some("1.5Ltr".to_string())
        );
    }

    #[test]
    fn gift_negation_suppresses_later_qualifiers() {
        let registry = registry();
        assert_eq!(find_qualifier(&registry, "Acme Cab w/o Gift box etched"), None);
        assert_eq!(
            find_qualifier(&registry, "Acme Cab etched gift").map(|found| found.value),
            Some("Gift".to_string())
        );
    }

    #[test]
    fn case_flag_detects_twelve_bottle_lots() {
        assert!(find_case_flag("Acme Cab 2015 12 X 750 ML"));
        assert!(find_case_flag("Acme Cab 2015 case"));
        assert!(find_case_flag("Acme Cab 2015 12x750ml"));
        assert!(!find_case_flag("Acme Cab 2015 Showcase"));
        assert!(!find_case_flag("Acme Cab 2015"));
    }
}
