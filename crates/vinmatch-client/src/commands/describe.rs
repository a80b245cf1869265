use std::path::Path;

use crate::commands::common::{DEFAULT_CANONICAL_FIELD, field_or_default, load_master_table};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::DescribeData;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct DescribeOptions<'a> {
    pub text: String,
    pub master: String,
    pub canonical_field: Option<String>,
    pub registry: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(text: String, master: String) -> ClientResult<SuccessEnvelope> {
    run_with_options(DescribeOptions {
        text,
        master,
        ..DescribeOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: DescribeOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.text.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Pass a non-empty description to canonicalize.",
            Some("describe"),
        ));
    }

    let canonical_field =
        field_or_default(options.canonical_field.as_deref(), DEFAULT_CANONICAL_FIELD);
    let table = load_master_table(
        &options.master,
        &canonical_field,
        options.registry.as_deref(),
        options.home_override,
    )?;

    let found = table.canonicalizer.canonicalize(&options.text, None);
    let data = match found {
        Some(found) => DescribeData {
            text: options.text,
            matched: true,
            category_status: Some(found.category_status),
            parts: Some(found.parts),
            description: Some(found.description),
            registry: table.registry,
            build: table.build,
        },
        None => DescribeData {
            text: options.text,
            matched: false,
            category_status: None,
            parts: None,
            description: None,
            registry: table.registry,
            build: table.build,
        },
    };
    success("describe", data)
}
