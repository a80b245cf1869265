use crate::engine::lookup::{Phrase, PhraseSet};
use crate::registry::WineryRule;

/// Picks the phrase set that describes `text` within one winery/category
/// bucket. `sets` must already be ordered most specific first.
///
/// Multi-phrase sets are trusted as soon as every phrase is present. Single
/// phrases are collected and settled afterwards: a forced tag wins outright,
/// otherwise the winery's priority list breaks the tie.
pub fn resolve_attributes(
    text: &str,
    winery: &WineryRule,
    sets: &[PhraseSet],
    forced_tag: Option<&str>,
) -> Vec<String> {
    let mut candidates: Vec<&str> = Vec::new();

    for set in sets {
        let applies = !set.is_empty()
            && set
                .phrases
                .iter()
                .all(|phrase| phrase_applies(text, winery, phrase));
        if !applies {
            continue;
        }
        if set.len() >= 2 {
            return set.texts();
        }
        candidates.push(set.phrases[0].text.as_str());
    }

    pick_candidate(&candidates, &winery.priority, forced_tag)
        .map(|tag| vec![tag.to_string()])
        .unwrap_or_default()
}

fn phrase_applies(text: &str, winery: &WineryRule, phrase: &Phrase) -> bool {
    phrase.matcher.is_match(text)
        || winery
            .expansion_for(&phrase.text)
            .is_some_and(|expansion| expansion.is_match(text))
}

fn pick_candidate<'c>(
    candidates: &[&'c str],
    priority: &[String],
    forced_tag: Option<&str>,
) -> Option<&'c str> {
    let first = *candidates.first()?;

    if let Some(forced) = forced_tag
        && let Some(tag) = candidates.iter().copied().find(|candidate| *candidate == forced)
    {
        return Some(tag);
    }

    if candidates.len() == 1 || priority.is_empty() {
        return Some(first);
    }

    // Unranked candidates go ahead of the ranked ones, in the order found.
    let mut order = candidates
        .iter()
        .copied()
        .filter(|candidate| !priority.iter().any(|ranked| ranked.as_str() == *candidate))
        .collect::<Vec<&str>>();
    order.extend(priority.iter().map(String::as_str));

    order
        .into_iter()
        .find_map(|entry| candidates.iter().copied().find(|candidate| *candidate == entry))
        .or(Some(first))
}
