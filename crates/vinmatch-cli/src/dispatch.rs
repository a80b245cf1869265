use vinmatch_client::commands;
use vinmatch_client::commands::canonicalize::CanonicalizeOptions;
use vinmatch_client::commands::describe::DescribeOptions;
use vinmatch_client::commands::registry::RegistryOptions;
use vinmatch_client::commands::table::TableOptions;
use vinmatch_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Canonicalize {
            input,
            master,
            output,
            raw_field,
            canonical_field,
            new_field,
            match_field,
            registry,
            json: _,
        } => commands::canonicalize::run_with_options(CanonicalizeOptions {
            input: input.clone(),
            master: master.clone(),
            output: output.clone(),
            raw_field: raw_field.clone(),
            canonical_field: canonical_field.clone(),
            new_field: new_field.clone(),
            match_field: match_field.clone(),
            registry: registry.clone(),
            ..CanonicalizeOptions::default()
        }),
        Commands::Describe {
            text,
            master,
            canonical_field,
            registry,
            ..
        } => commands::describe::run_with_options(DescribeOptions {
            text: text.clone(),
            master: master.clone(),
            canonical_field: canonical_field.clone(),
            registry: registry.clone(),
            home_override: None,
        }),
        Commands::Table {
            master,
            winery,
            canonical_field,
            registry,
            ..
        } => commands::table::run_with_options(TableOptions {
            master: master.clone(),
            canonical_field: canonical_field.clone(),
            winery: winery.clone(),
            registry: registry.clone(),
            home_override: None,
        }),
        Commands::Registry { registry, .. } => commands::registry::run(registry.clone()),
    }
}
