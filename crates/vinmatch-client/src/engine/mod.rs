//! Canonicalization engine.
//!
//! Two phases: [`Canonicalizer::from_masters`] freezes a [`LookupTable`] from
//! known-canonical descriptions, then [`Canonicalizer::canonicalize`] runs the
//! extractors, the resolver and the assembler over raw text. Nothing here
//! touches the filesystem.

pub mod assemble;
pub mod extract;
pub mod lookup;
pub mod resolve;
pub mod text;

use serde::Serialize;

use crate::ClientResult;
use crate::registry::PatternRegistry;

pub use assemble::CanonicalParts;
pub use extract::CategoryStatus;
pub use lookup::{BucketView, BuildSummary, LookupTable, LookupTableBuilder};

use assemble::{Extracted, assemble};
use extract::{
    find_case_flag, find_category, find_qualifier, find_size, find_vintage, find_winery,
};
use resolve::resolve_attributes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Canonicalized {
    pub winery_index: usize,
    pub category_status: CategoryStatus,
    pub parts: CanonicalParts,
    pub description: String,
}

#[derive(Debug)]
pub struct Canonicalizer {
    registry: PatternRegistry,
    table: LookupTable,
}

impl Canonicalizer {
    pub fn new(registry: PatternRegistry, table: LookupTable) -> Self {
        Self { registry, table }
    }

    pub fn from_masters<'m, I>(
        registry: PatternRegistry,
        masters: I,
    ) -> ClientResult<(Self, BuildSummary)>
    where
        I: IntoIterator<Item = &'m str>,
    {
        let (table, summary) = {
            let mut builder = LookupTableBuilder::new(&registry);
            for master in masters {
                builder.add(master);
            }
            builder.finish()?
        };
        Ok((Self { registry, table }, summary))
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Canonical form of `text`, or `None` when no winery rule matches.
    ///
    /// `hint` is the winery index found for the previous record. It only
    /// speeds up the scan; the result is identical with or without it.
    pub fn canonicalize(&self, text: &str, hint: Option<usize>) -> Option<Canonicalized> {
        let registry = &self.registry;
        let winery_match = find_winery(registry, text, hint)?;
        let winery = registry.winery(winery_match.index)?;

        let category = find_category(registry, winery, text);
        let phrases = resolve_attributes(
            text,
            winery,
            self.table.phrase_sets(&winery.name, category.name()),
            registry.forced_tag(&winery.name),
        );

        let parts = assemble(
            text,
            Extracted {
                winery: winery.name.clone(),
                non_wine: registry.is_non_wine(&winery.name),
                category: category.name().map(str::to_string),
                phrases,
                vintage: find_vintage(text).map(|found| found.value),
                size: find_size(registry, text).map(|found| found.value),
                qualifier: find_qualifier(registry, text).map(|found| found.value),
                case_lot: find_case_flag(text),
            },
        );

        Some(Canonicalized {
            winery_index: winery_match.index,
            category_status: category.status(),
            description: parts.description(),
            parts,
        })
    }

    /// Canonicalizes texts in order, carrying the winery hint from one
    /// matched record to the next.
    pub fn canonicalize_all<'t, I>(&self, texts: I) -> Vec<Option<Canonicalized>>
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut hint = None;
        texts
            .into_iter()
            .map(|text| {
                let result = self.canonicalize(text, hint);
                if let Some(found) = &result {
                    hint = Some(found.winery_index);
                }
                result
            })
            .collect()
    }
}
