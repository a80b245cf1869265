use serde::Serialize;

use crate::engine::extract::{CASE_TOKEN, find_vintage};
use crate::engine::text::{contains_ignore_case, strip_phrase};

/// Every piece that goes into one canonical description, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalParts {
    pub winery: String,
    pub category: Option<String>,
    pub phrases: Vec<String>,
    pub vintage: Option<String>,
    pub size: Option<String>,
    pub qualifier: Option<String>,
    pub case_lot: bool,
}

impl CanonicalParts {
    pub fn description(&self) -> String {
        let mut tokens: Vec<&str> = vec![self.winery.as_str()];
        tokens.extend(self.category.as_deref());
        tokens.extend(self.phrases.iter().map(String::as_str));
        tokens.extend(self.vintage.as_deref());
        tokens.extend(self.size.as_deref());
        tokens.extend(self.qualifier.as_deref());
        if self.case_lot {
            tokens.push(CASE_TOKEN);
        }
        tokens
            .into_iter()
            .filter(|token| !token.trim().is_empty())
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

/// Raw extraction results before cleanup.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub winery: String,
    pub non_wine: bool,
    pub category: Option<String>,
    pub phrases: Vec<String>,
    pub vintage: Option<String>,
    pub size: Option<String>,
    pub qualifier: Option<String>,
    pub case_lot: bool,
}

pub fn assemble(text: &str, extracted: Extracted) -> CanonicalParts {
    let Extracted {
        winery,
        non_wine,
        category,
        mut phrases,
        mut vintage,
        mut size,
        qualifier,
        case_lot,
    } = extracted;

    if let Some(category_token) = category.as_deref()
        && !phrases.is_empty()
    {
        let single_letter = phrases.len() == 1 && phrases[0].chars().count() == 1;
        if !single_letter && contains_ignore_case(category_token, &phrases.join(" ")) {
            phrases.clear();
        }
    }

    if let Some(found) = vintage.as_deref()
        && phrases.iter().any(|phrase| phrase.contains(found))
    {
        let stripped = phrases
            .iter()
            .fold(text.to_string(), |current, phrase| strip_phrase(&current, phrase));
        vintage = find_vintage(&stripped).map(|found| found.value);
    }

    if non_wine {
        vintage = None;
    }

    if let Some(found) = size.as_deref()
        && contains_ignore_case(&phrases.join(" "), found)
    {
        size = None;
    }

    CanonicalParts {
        winery,
        category,
        phrases,
        vintage,
        size,
        qualifier,
        case_lot,
    }
}
