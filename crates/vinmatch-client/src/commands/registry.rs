use std::path::Path;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{RegistryData, RegistryWineryView};
use crate::state::load_registry;

#[derive(Debug, Default)]
pub struct RegistryOptions<'a> {
    pub registry: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(registry: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(RegistryOptions {
        registry,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: RegistryOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let (registry, source) = load_registry(options.registry.as_deref(), options.home_override)?;

    let wineries = registry
        .wineries
        .iter()
        .map(|winery| RegistryWineryView {
            name: winery.name.clone(),
            category_kind: winery.category.as_str().to_string(),
            non_wine: registry.is_non_wine(&winery.name),
            abbreviations: winery
                .abbreviations
                .iter()
                .map(|rule| rule.name.clone())
                .collect(),
            priority: winery.priority.clone(),
            forced_tag: registry.forced_tag(&winery.name).map(str::to_string),
        })
        .collect();

    let data = RegistryData {
        source,
        non_wine_marker: registry.non_wine_marker.clone(),
        counts: registry.counts(),
        wineries,
    };
    success("registry", data)
}
