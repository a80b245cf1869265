//! Lookup table derived from master descriptions.
//!
//! Every master description is reduced to the words that are left once the
//! winery, category, vintage, size, qualifier and case tokens are cut out.
//! Those residual words become a phrase set in the `(winery, category)`
//! bucket. The table is frozen once [`LookupTableBuilder::finish`] runs.

use std::collections::BTreeMap;
use std::ops::Range;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::extract::{
    find_case, find_category, find_qualifier, find_size, find_vintage, find_winery,
};
use crate::engine::text::{excise, locate_literal, residual_phrases, word_matcher};
use crate::registry::PatternRegistry;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct Phrase {
    pub text: String,
    pub matcher: Regex,
}

/// Phrases that must all be present for the set to apply.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    pub phrases: Vec<Phrase>,
}

impl PhraseSet {
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn texts(&self) -> Vec<String> {
        self.phrases
            .iter()
            .map(|phrase| phrase.text.clone())
            .collect()
    }
}

type Bucket = BTreeMap<Option<String>, Vec<PhraseSet>>;

#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    wineries: BTreeMap<String, Bucket>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    pub masters_read: usize,
    pub masters_used: usize,
    pub masters_skipped: usize,
    pub buckets: usize,
    pub phrase_sets: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketView {
    pub winery: String,
    pub category: Option<String>,
    pub phrase_sets: Vec<Vec<String>>,
}

impl LookupTable {
    pub fn phrase_sets(&self, winery: &str, category: Option<&str>) -> &[PhraseSet] {
        self.wineries
            .get(winery)
            .and_then(|bucket| bucket.get(&category.map(str::to_string)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn bucket_count(&self) -> usize {
        self.wineries.values().map(BTreeMap::len).sum()
    }

    pub fn phrase_set_count(&self) -> usize {
        self.wineries
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn buckets(&self, winery_filter: Option<&str>) -> Vec<BucketView> {
        self.wineries
            .iter()
            .filter(|(winery, _)| winery_filter.is_none_or(|wanted| wanted == winery.as_str()))
            .flat_map(|(winery, bucket)| {
                bucket.iter().map(move |(category, sets)| BucketView {
                    winery: winery.clone(),
                    category: category.clone(),
                    phrase_sets: sets.iter().map(PhraseSet::texts).collect(),
                })
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct LookupTableBuilder<'a> {
    registry: &'a PatternRegistry,
    pending: BTreeMap<String, BTreeMap<Option<String>, Vec<Vec<String>>>>,
    summary: BuildSummary,
    last_winery: Option<usize>,
}

impl<'a> LookupTableBuilder<'a> {
    pub fn new(registry: &'a PatternRegistry) -> Self {
        Self {
            registry,
            pending: BTreeMap::new(),
            summary: BuildSummary::default(),
            last_winery: None,
        }
    }

    /// Feeds one known-canonical description. Returns `false` when no winery
    /// could be identified and the description was skipped.
    pub fn add(&mut self, canonical: &str) -> bool {
        let registry = self.registry;
        self.summary.masters_read += 1;

        let Some(winery_match) = find_winery(registry, canonical, self.last_winery) else {
            self.summary.masters_skipped += 1;
            debug!(description = canonical, "master description has no known winery");
            return false;
        };
        self.last_winery = Some(winery_match.index);
        let Some(winery) = registry.winery(winery_match.index) else {
            self.summary.masters_skipped += 1;
            return false;
        };

        let category = find_category(registry, winery, canonical);
        let category_name = category.name().map(str::to_string);

        let mut spans: Vec<Range<usize>> = Vec::new();
        spans.push(locate_literal(canonical, &winery.name).unwrap_or(winery_match.span));
        if let Some(name) = category_name.as_deref() {
            let fallback = category.span();
            if let Some(span) = locate_literal(canonical, name).or(fallback) {
                spans.push(span);
            }
        }
        spans.extend(find_vintage(canonical).map(|found| found.span));
        spans.extend(find_size(registry, canonical).map(|found| found.span));
        spans.extend(find_qualifier(registry, canonical).map(|found| found.span));
        spans.extend(find_case(canonical).map(|found| found.span));

        let residual = residual_phrases(&excise(canonical, &spans));
        self.summary.masters_used += 1;
        let sets = self
            .pending
            .entry(winery.name.clone())
            .or_default()
            .entry(category_name)
            .or_default();
        if !residual.is_empty() && !sets.contains(&residual) {
            sets.push(residual);
        }
        true
    }

    pub fn finish(self) -> ClientResult<(LookupTable, BuildSummary)> {
        let mut summary = self.summary;
        let mut wineries = BTreeMap::new();

        for (winery, categories) in self.pending {
            let mut bucket = Bucket::new();
            for (category, mut sets) in categories {
                // stable: equal-length sets keep master order
                sets.sort_by(|left, right| right.len().cmp(&left.len()));
                let compiled = sets
                    .into_iter()
                    .map(|phrases| compile_phrase_set(&winery, phrases))
                    .collect::<ClientResult<Vec<PhraseSet>>>()?;
                bucket.insert(category, compiled);
            }
            wineries.insert(winery, bucket);
        }

        let table = LookupTable { wineries };
        summary.buckets = table.bucket_count();
        summary.phrase_sets = table.phrase_set_count();
        info!(
            masters_read = summary.masters_read,
            masters_skipped = summary.masters_skipped,
            buckets = summary.buckets,
            phrase_sets = summary.phrase_sets,
            "lookup table built"
        );
        Ok((table, summary))
    }
}

fn compile_phrase_set(winery: &str, phrases: Vec<String>) -> ClientResult<PhraseSet> {
    let compiled = phrases
        .into_iter()
        .map(|text| {
            let matcher = word_matcher(&text).map_err(|error| {
                ClientError::new(
                    "internal_phrase_compile",
                    &format!("Could not compile phrase `{text}` for `{winery}`: {error}"),
                    Vec::new(),
                )
            })?;
            Ok(Phrase { text, matcher })
        })
        .collect::<ClientResult<Vec<Phrase>>>()?;
    Ok(PhraseSet { phrases: compiled })
}
