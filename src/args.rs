use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::params::CampaignParams;

#[derive(Parser, Debug)]
#[command(
    name = "utm-builder",
    about = "Build UTM-tagged campaign links and keep a short local history",
    version,
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a settings.json file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// History database to use instead of the configured one
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble a tracking link and record it in history
    Build(BuildArgs),

    /// List recently generated links, newest first
    History {
        /// Number of entries to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Split a history entry (1-based index) or a URL back into its fields
    Load {
        target: String,

        /// Print the fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy a history entry to the clipboard
    Copy {
        /// 1-based history index
        #[arg(default_value_t = 1)]
        index: usize,
    },

    /// Export the history as CSV
    Export {
        /// Output file, or "-" for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the built-in source/medium templates
    Templates,
}

#[derive(clap::Args, Debug, Default)]
pub struct BuildArgs {
    /// Destination page; https:// is assumed when no scheme is given
    #[arg(short, long)]
    pub url: Option<String>,

    /// Traffic source, e.g. google or newsletter
    #[arg(short, long)]
    pub source: Option<String>,

    /// Marketing medium, e.g. cpc or email
    #[arg(short, long)]
    pub medium: Option<String>,

    /// Campaign name
    #[arg(short = 'n', long)]
    pub campaign: Option<String>,

    /// Paid search keyword
    #[arg(long)]
    pub term: Option<String>,

    /// Ad or link variant
    #[arg(long)]
    pub content: Option<String>,

    /// Prefill source and medium from a template (see `templates`)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Copy the generated link to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Do not record the link in history
    #[arg(long)]
    pub no_history: bool,
}

impl BuildArgs {
    /// Overlay the typed fields onto `params`, leaving untyped ones alone.
    pub fn fill(&self, params: &mut CampaignParams) {
        let overlay = [
            (&self.url, &mut params.url),
            (&self.source, &mut params.source),
            (&self.medium, &mut params.medium),
            (&self.campaign, &mut params.campaign),
            (&self.term, &mut params.term),
            (&self.content, &mut params.content),
        ];
        for (value, slot) in overlay {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }
}
