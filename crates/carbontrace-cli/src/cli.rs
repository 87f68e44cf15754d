//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// carbontrace - Filter supply-chain products by ledger state and history.
#[derive(Debug, Parser)]
#[command(name = "carbontrace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CARBONTRACE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Ledger database path (overrides the profile)
    #[arg(long, global = true, env = "CARBONTRACE_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a filter chain and print the matching products
    Filter(FilterArgs),

    /// Show one product with its raw materials and transformations
    Show(ShowArgs),

    /// List products
    Products(ProductsArgs),

    /// List raw materials
    Materials(MaterialsArgs),

    /// Load a JSON ledger export into the local database
    Import(ImportArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter interactive filter mode
    Repl,
}

/// Arguments for the filter command.
#[derive(Debug, Parser)]
pub struct FilterArgs {
    /// Filter expression: <field> <op> <value> [and|or <field> <op> <value>]...
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub expression: Vec<String>,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Product ID
    pub id: String,
}

/// Arguments for the products command.
#[derive(Debug, Parser)]
pub struct ProductsArgs {
    /// Only products owned by this address
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Only products that are not ended (uses the profile owner if --owner is absent)
    #[arg(short, long)]
    pub updatable: bool,
}

/// Arguments for the materials command.
#[derive(Debug, Parser)]
pub struct MaterialsArgs {
    /// Only unused materials shipped to this transformer
    #[arg(long)]
    pub usable_by: Option<String>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// JSON ledger export
    pub file: PathBuf,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Ledger database path
        #[arg(short, long)]
        database: PathBuf,
        /// Default owner / transformer address
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
