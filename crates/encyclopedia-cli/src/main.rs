mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use encyclopedia_cli::output::OutputFormat;
use encyclopedia_lib::{SearchOptions, SheetFormat};

use crate::commands::export::{handle_export_command, ExportCommandArgs};
use crate::commands::item::{handle_item_command, ItemCommandArgs};
use crate::commands::search::handle_search_command;
use crate::commands::settings::{handle_settings_set, handle_settings_show, SettingsUpdate};

#[derive(Parser, Debug)]
#[command(author, version, about = "Item encyclopedia: cards, search and blueprint costs")]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Directory holding the dataset JSON files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL to fetch the dataset JSON files from.
    #[arg(long, global = true, conflicts_with = "data_dir")]
    pub data_url: Option<String>,

    /// Language of the localization strings, overriding the saved setting.
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the card for an item, by id or exact name.
    Item {
        /// Item id or localized name.
        query: String,
        /// Skill training rate in skill points per minute for this card.
        #[arg(long)]
        training_rate: Option<f64>,
        /// Fail when an attribute has no metadata.
        #[arg(long, conflicts_with = "lenient")]
        strict: bool,
        /// Omit attributes without metadata.
        #[arg(long)]
        lenient: bool,
    },
    /// Search items by keywords in their localized names.
    Search {
        /// Keywords; every word longer than two characters must match.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Include items from test groups.
        #[arg(long)]
        include_test: bool,
        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export blueprint costs as a sheet.
    Export {
        /// Blueprint ids or names.
        #[arg(required = true, num_args = 1..)]
        blueprints: Vec<String>,
        /// Sheet format: csv, tsv or json.
        #[arg(long, default_value = "csv")]
        sheet_format: SheetFormat,
        /// Write a timestamped file into this directory instead of stdout.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Show or change persisted settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Show the current settings.
    Show,
    /// Change and save settings.
    Set {
        /// Default language.
        #[arg(long)]
        language: Option<String>,
        /// Training rate in skill points per minute (presets: 30, 60, 65, 70, 75).
        #[arg(long)]
        training_rate: Option<f64>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let global = &cli.global;

    match cli.command {
        Command::Item {
            query,
            training_rate,
            strict,
            lenient,
        } => handle_item_command(
            global,
            &ItemCommandArgs {
                query,
                training_rate,
                strict: match (strict, lenient) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            },
        ),
        Command::Search {
            query,
            include_test,
            limit,
        } => handle_search_command(
            global,
            &query,
            SearchOptions {
                include_test,
                limit,
            },
        ),
        Command::Export {
            blueprints,
            sheet_format,
            output_dir,
        } => handle_export_command(
            global,
            &ExportCommandArgs {
                blueprints,
                sheet_format,
                output_dir,
            },
        ),
        Command::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => handle_settings_show(global),
            SettingsAction::Set {
                language,
                training_rate,
            } => handle_settings_set(
                global,
                &SettingsUpdate {
                    language,
                    training_rate,
                },
            ),
        },
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
