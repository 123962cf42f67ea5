//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rmgd_catalog::{FilterCriteria, RecordPatch};
use rmgd_core::{RecordKind, RecordStatus, Role};

#[derive(Parser)]
#[command(name = "rmgd")]
#[command(about = "Retro Mobile Gaming Database catalog dashboard", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database path (overrides RMGD_DATABASE and settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Read and write records through this REST API instead of the local database
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filters shared by list and report.
#[derive(Args, Clone, Default)]
pub(crate) struct FilterArgs {
    /// Case-insensitive text search over name, maker, description and id
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Exact maker (developer or manufacturer)
    #[arg(short, long)]
    pub maker: Option<String>,

    /// Decade start year, e.g. 1990 for 1990-1999
    #[arg(short, long)]
    pub decade: Option<i32>,

    /// Exact status (e.g. active, pending, on_loan)
    #[arg(long)]
    pub status: Option<RecordStatus>,

    /// Only records you submitted
    #[arg(long)]
    pub mine: bool,
}

impl FilterArgs {
    pub fn to_criteria(&self, username: &str) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if let Some(text) = &self.search {
            criteria = criteria.search(text.as_str());
        }
        if let Some(category) = &self.category {
            criteria = criteria.category(category.as_str());
        }
        if let Some(maker) = &self.maker {
            criteria = criteria.maker(maker.as_str());
        }
        if let Some(decade) = self.decade {
            criteria = criteria.decade(decade);
        }
        if let Some(status) = self.status {
            criteria = criteria.status(status);
        }
        if self.mine {
            criteria = criteria.submitted_by(username);
        }
        criteria
    }
}

/// Editable record fields for add and edit.
#[derive(Args, Clone, Default)]
pub(crate) struct RecordFields {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Category (see `rmgd nav` for suggestions)
    #[arg(long)]
    pub category: Option<String>,

    /// Developer or manufacturer
    #[arg(long)]
    pub maker: Option<String>,

    /// Release year; pass an empty string to clear
    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Image URL (repeatable; replaces the whole list)
    #[arg(long = "image")]
    pub images: Vec<String>,

    #[arg(long)]
    pub status: Option<RecordStatus>,
}

impl RecordFields {
    pub fn to_patch(&self) -> RecordPatch {
        RecordPatch {
            name: self.name.clone(),
            category: self.category.clone(),
            maker: self.maker.clone(),
            year: self.year.clone(),
            description: self.description.clone(),
            images: (!self.images.is_empty()).then(|| self.images.clone()),
            status: self.status,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the views and actions available to your role
    Nav,

    /// Headline numbers for games and devices
    Overview,

    /// List records with optional filters
    List {
        /// games or devices
        kind: RecordKind,

        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Full breakdown of one collection
    Stats {
        /// games or devices
        kind: RecordKind,
    },

    /// Export records or aggregates as CSV
    Report {
        /// games or devices
        kind: RecordKind,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Export aggregate counts instead of records
        #[arg(long)]
        aggregates: bool,
    },

    /// Submit a new record
    Add {
        /// games or devices
        kind: RecordKind,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Edit an existing record
    Edit {
        /// games or devices
        kind: RecordKind,

        /// Record id
        id: String,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Delete a record and its stored images
    Delete {
        /// games or devices
        kind: RecordKind,

        /// Record id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the review queue, or set the status of one record
    Review {
        /// games or devices
        kind: RecordKind,

        /// Record id (omit to list pending records)
        id: Option<String>,

        /// New status (e.g. approved, rejected)
        status: Option<RecordStatus>,
    },

    /// Bulk-import records from a JSON or YAML file
    Import {
        /// games or devices
        kind: RecordKind,

        /// JSON array, export object or YAML file
        file: PathBuf,
    },

    /// Upload an image and attach it to a record
    Upload {
        /// games or devices
        kind: RecordKind,

        /// Record id
        id: String,

        /// Image file (jpg, jpeg, png, gif or webp; max 5 MiB)
        file: PathBuf,
    },

    /// Detach an image from a record and delete it from storage
    RemoveImage {
        /// games or devices
        kind: RecordKind,

        /// Record id
        id: String,

        /// Image URL as shown by `rmgd list`
        url: String,
    },

    /// Sign in
    Login {
        username: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user and their capabilities
    Whoami,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum UserAction {
    /// Create an account (the first account is always an admin)
    Add {
        username: String,

        /// admin, researcher or contributor
        #[arg(long, default_value = "contributor")]
        role: Role,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// List accounts
    List,

    /// Delete an account
    Remove { username: String },

    /// Change an account's role
    Role { username: String, role: Role },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where each value comes from
    Show,

    /// Print the settings file path
    Path,

    /// Set a value in the settings file (empty value clears it)
    Set { key: String, value: String },
}
