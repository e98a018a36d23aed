//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Prepare publication records and publish them for a DOI
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "vedra", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new record file
    New {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check a record against the publish rules
    Validate {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
    },

    /// Show a summary of a record
    Preview {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a field by its dot path, e.g. `basicInformation.publicationDate`
    Set {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        #[arg(value_name = "FIELD")]
        field: String,
        /// Lists are comma-separated; flags are true/false
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Append a title
    AddTitle {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        title: String,
        /// Title type (main, alternative, subtitle, translated, other)
        #[arg(long = "type")]
        title_type: Option<String>,
    },

    /// Append a creator
    AddCreator {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        /// "Family, Given" or an organisation name
        name: String,
        #[arg(long)]
        orcid: Option<String>,
        #[arg(long)]
        affiliation: Option<String>,
    },

    /// Add keywords
    AddKeyword {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        #[arg(required = true)]
        keywords: Vec<String>,
    },

    /// Attach files from disk
    AddFile {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Save a server-side draft
    SaveDraft {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Validate and publish a record
    Publish {
        #[arg(value_name = "RECORD")]
        record: PathBuf,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Search published records
    Search {
        /// Query string; empty lists everything
        #[arg(default_value = "")]
        query: String,
        #[arg(long, default_value_t = 10)]
        size: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct AuthArgs {
    /// API token (or set VEDRA_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Existing draft to update
    #[arg(long)]
    pub draft_id: Option<String>,
}

/// Parse command-line arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
