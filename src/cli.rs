use clap::{Args, Parser, Subcommand};

use crate::editor::SettingsField;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the persisted settings document.
    #[arg(long, global = true, default_value = "maktaba-data")]
    pub data_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List categories and books, optionally filtered.
    List(ListArgs),
    /// Select a book, pass the ad gate, and read a part.
    Read(ReadArgs),
    Promotions,
    About,
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive match on title or author.
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    #[arg(long)]
    pub book: String,

    /// Category id, when the book id is not unique across categories.
    #[arg(long)]
    pub category: Option<String>,

    /// Part to read (required for multi-part books; omit to list parts).
    #[arg(long)]
    pub part: Option<String>,

    /// Length of one countdown second, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub tick_ms: u64,

    /// Save the unlocked content as a text file in this directory instead of printing it.
    #[arg(long)]
    pub download: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Print the current settings as JSON.
    Show,
    Export(ExportArgs),
    Import(ImportArgs),
    Set(SetArgs),
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    Book {
        #[command(subcommand)]
        command: BookCommand,
    },
    Promo {
        #[command(subcommand)]
        command: PromoCommand,
    },
    /// Replace categories and/or promotional ads from JSON array files.
    ApplyJson(ApplyJsonArgs),
    /// Replace text inside every string value of the settings.
    Replace(ReplaceArgs),
    Gist {
        #[command(subcommand)]
        command: GistCommand,
    },
    /// Forget persisted settings and return to the defaults.
    Reset(ConfirmArgs),
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file path for the settings JSON.
    #[arg(long)]
    pub out: String,

    /// Overwrite the output file if it exists.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Settings JSON file (needs `siteName` and a `categories` array).
    #[arg(long)]
    pub file: String,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(value_enum)]
    pub field: SettingsField,

    pub value: String,
}

#[derive(Debug, Args)]
pub struct ConfirmArgs {
    /// Confirm the destructive action.
    #[arg(long, default_value_t = false)]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        emoji: String,
    },
    Delete {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum BookCommand {
    Add(BookAddArgs),
    Edit(BookEditArgs),
    Delete {
        #[arg(long)]
        category: String,
        #[arg(long)]
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Debug, Args)]
pub struct BookAddArgs {
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,

    /// Initial content text.
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the initial content from a file.
    #[arg(long)]
    pub content_file: Option<String>,

    /// Cover theme token.
    #[arg(long)]
    pub cover: Option<String>,
}

#[derive(Debug, Args)]
pub struct BookEditArgs {
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub cover: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum PromoCommand {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        image: String,
        #[arg(long)]
        link: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ApplyJsonArgs {
    /// JSON file with the full categories array.
    #[arg(long)]
    pub categories: Option<String>,

    /// JSON file with the full promotional ads array.
    #[arg(long)]
    pub promotions: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReplaceArgs {
    #[arg(long)]
    pub find: String,

    #[arg(long, default_value = "")]
    pub replace: String,
}

#[derive(Debug, Subcommand)]
pub enum GistCommand {
    /// Replace the settings with the configured gist document.
    Load,
    /// Upload the settings to the configured gist.
    Save,
}
