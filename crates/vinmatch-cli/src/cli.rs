use clap::{Parser, Subcommand};

/// Extended help shown after `vinmatch canonicalize --help`.
pub const CANONICALIZE_AFTER_HELP: &str = "\
How canonicalize works:
  1. Every row of the --master file holds one already-correct description in its
     `canonical` column. Those rows teach vinmatch which extra words (Reserve,
     SS, Napa, ...) distinguish one product from another for the same winery.
  2. Every row of <input> is read from its `description` column, matched
     against the pattern registry and the master table, and given a canonical
     description in a new `new_canonical` column.
  3. Rows whose winery cannot be identified are skipped, counted, and left
     with an empty `new_canonical` value. They never fail the run.

  Accepted formats:
    JSON: one top-level array of objects
    CSV:  one header row, then one record per line

  <input> is a local file path. Use `-` to read stdin (requires --output).
  The output keeps the input format. By default it is written next to the
  input as `<name>.canonical.<ext>`.

Prior values:
  When an input row already has a `canonical` value, vinmatch also writes
  `canonical_matches` (true/false) so you can review drift.

Registry:
  --registry <path> wins. Otherwise `$VINMATCH_HOME/registry.json` is used
  when present (home defaults to ~/.vinmatch), else the bundled registry.
  Run `vinmatch registry` to see which one is active.
";

#[derive(Debug, Parser)]
#[command(
    name = "vinmatch",
    version,
    about = "canonical descriptions for wine and spirit listings",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Canonicalize every record of a CSV or JSON file
    #[command(after_long_help = CANONICALIZE_AFTER_HELP)]
    Canonicalize {
        /// Path to a CSV or JSON file of raw records (use `-` for stdin)
        input: String,
        /// Path to the master file of known-canonical descriptions
        #[arg(long)]
        master: String,
        /// Where to write the canonicalized records
        #[arg(long)]
        output: Option<String>,
        /// Input field holding the raw description (default: description)
        #[arg(long)]
        raw_field: Option<String>,
        /// Field holding known-canonical text in master and input records (default: canonical)
        #[arg(long)]
        canonical_field: Option<String>,
        /// Field to write the new canonical description into (default: new_canonical)
        #[arg(long)]
        new_field: Option<String>,
        /// Field to write the prior-value comparison into (default: canonical_matches)
        #[arg(long)]
        match_field: Option<String>,
        /// Pattern registry JSON file to use instead of the default
        #[arg(long)]
        registry: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Canonicalize one description and show every extracted part
    Describe {
        /// Raw description text (quote it)
        text: String,
        /// Path to the master file of known-canonical descriptions
        #[arg(long)]
        master: String,
        /// Master field holding known-canonical text (default: canonical)
        #[arg(long)]
        canonical_field: Option<String>,
        /// Pattern registry JSON file to use instead of the default
        #[arg(long)]
        registry: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show the lookup table built from a master file
    Table {
        /// Path to the master file of known-canonical descriptions
        #[arg(long)]
        master: String,
        /// Only show buckets for this winery
        #[arg(long)]
        winery: Option<String>,
        /// Master field holding known-canonical text (default: canonical)
        #[arg(long)]
        canonical_field: Option<String>,
        /// Pattern registry JSON file to use instead of the default
        #[arg(long)]
        registry: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show which pattern registry is active and what it contains
    Registry {
        /// Pattern registry JSON file to inspect instead of the default
        #[arg(long)]
        registry: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn json(&self) -> bool {
        match self {
            Self::Canonicalize { json, .. }
            | Self::Describe { json, .. }
            | Self::Table { json, .. }
            | Self::Registry { json, .. } => *json,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
