//! # FormForge CLI
//!
//! Command-line interface for FormForge.
//!
//! Works against a directory of stored forms (see [`config::CliConfig`]).
//!
//! ## Commands
//!
//! - `catalog` - List the field types available in the palette
//! - `templates` - List built-in form templates
//! - `new` - Create a form from a template
//! - `duplicate` - Copy a stored form as a new draft
//! - `list` - List stored forms
//! - `show` - Display a form and its fields
//! - `validate` - Validate stored forms or form files
//! - `edit` - Replay a JSON script of editor commands against a form
//! - `publish` - Validate a form and mark it published
//!

pub mod commands;
pub mod config;
pub mod output;

use clap::{ArgAction, Subcommand};
use commands::CommandContext;
use config::CliConfig;
use formforge_editor::FileGateway;
use output::OutputFormat;
use std::path::PathBuf;

pub use clap::Parser;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser, Debug)]
#[command(name = "formforge", version, about = "Build and edit forms from the command line", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./formforge.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding stored forms
    #[arg(long, env = "FORMFORGE_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List field types
    Catalog,
    /// List built-in templates
    Templates,
    /// Create a form from a template
    New {
        /// Template id
        #[arg(short, long, default_value = "blank")]
        template: String,
        /// Form title (defaults to the template name)
        #[arg(long)]
        title: Option<String>,
        /// Form description (defaults to the template description)
        #[arg(long)]
        description: Option<String>,
    },
    /// Copy a stored form as a new draft
    Duplicate { form: String },
    /// List stored forms
    List,
    /// Show a form and its fields
    Show { form: String },
    /// Validate a stored form, a form file, or a directory of form files
    Validate { target: String },
    /// Apply a JSON script of editor commands to a form and save it
    Edit {
        form: String,
        /// Path to the script
        #[arg(short, long)]
        script: PathBuf,
        /// Apply without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a form and mark it published
    Publish { form: String },
}

impl Cli {
    /// Log filter to use when `RUST_LOG` is not set
    pub fn log_filter(&self, config: &CliConfig) -> String {
        match self.verbose {
            0 => config.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }

    /// Load the config file and apply command-line overrides
    pub fn load_config(&self) -> anyhow::Result<CliConfig> {
        let config = CliConfig::load(self.config.as_deref())?;
        Ok(config.with_store_dir(self.store.clone()))
    }
}

/// Run a parsed command line
pub fn run(cli: Cli, config: CliConfig) -> anyhow::Result<()> {
    let ctx = CommandContext {
        gateway: FileGateway::new(config.store_dir.clone()),
        format: cli.format,
        pretty: config.pretty,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Command::Catalog => commands::catalog(&ctx),
            Command::Templates => commands::templates(&ctx),
            Command::New {
                template,
                title,
                description,
            } => commands::new_form(&ctx, &template, title, description).await,
            Command::Duplicate { form } => commands::duplicate(&ctx, &form).await,
            Command::List => commands::list(&ctx).await,
            Command::Show { form } => commands::show(&ctx, &form).await,
            Command::Validate { target } => commands::validate(&ctx, &target).await,
            Command::Edit {
                form,
                script,
                dry_run,
            } => commands::edit(&ctx, &form, &script, dry_run).await,
            Command::Publish { form } => commands::publish(&ctx, &form).await,
        }
    })
}
