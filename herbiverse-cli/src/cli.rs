use std::path::PathBuf;

use clap::{Parser, Subcommand};
use herbiverse_types::Category;

#[derive(Parser)]
#[command(
    name = "herbiverse",
    about = "Herbiverse - medicinal herb catalogue, favourites and notes",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, env = "HERBIVERSE_API_URL", help = "API base URL")]
    pub api_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = "HERBIVERSE_DATA_DIR",
        help = "Directory holding session.json and config.toml [default: ~/.herbiverse]"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Log in and remember the session")]
    Login {
        #[arg(help = "Account email")]
        email: String,

        #[arg(long, env = "HERBIVERSE_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Create an account and log in")]
    Signup {
        #[arg(help = "Display name")]
        name: String,

        #[arg(help = "Account email")]
        email: String,

        #[arg(long, env = "HERBIVERSE_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Log out and forget the session")]
    Logout,

    #[command(about = "Show the logged-in user")]
    Whoami {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Re-fetch the profile from the server")]
    Refresh,

    #[command(subcommand, about = "Manage favourite plants")]
    Favourites(FavouriteCommands),

    #[command(subcommand, about = "Manage notes on plants")]
    Notes(NoteCommands),

    #[command(about = "Look up the server id of a plant by name")]
    PlantId {
        #[arg(help = "Plant name, e.g. Tulsi")]
        name: String,
    },

    #[command(about = "Show a herb with its favourite status and your notes")]
    Herb {
        #[arg(help = "Plant name, e.g. Tulsi")]
        name: String,
    },

    #[command(about = "Search a herb catalogue file")]
    Catalog {
        #[arg(help = "Path to a JSON array of herbs")]
        file: PathBuf,

        #[arg(short, long, help = "Case-insensitive name filter")]
        search: Option<String>,

        #[arg(short, long, help = "Only this category, e.g. \"digestive health\"")]
        category: Option<Category>,

        #[arg(short, long, help = "Group results by category")]
        group: bool,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum FavouriteCommands {
    #[command(about = "List favourite plants")]
    List {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Add a plant to favourites")]
    Add {
        #[arg(help = "Plant id")]
        plant_id: String,
    },

    #[command(about = "Remove a plant from favourites")]
    Remove {
        #[arg(help = "Plant id")]
        plant_id: String,
    },

    #[command(about = "Check whether a plant is a favourite")]
    Check {
        #[arg(help = "Plant id")]
        plant_id: String,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    #[command(about = "List notes, optionally for one plant")]
    List {
        #[arg(long, help = "Only notes on this plant id")]
        plant: Option<String>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Add a note to a plant")]
    Add {
        #[arg(help = "Plant id")]
        plant_id: String,

        #[arg(help = "Note text")]
        content: String,
    },

    #[command(about = "Replace the text of a note")]
    Edit {
        #[arg(help = "Note id")]
        note_id: String,

        #[arg(help = "New note text")]
        content: String,
    },

    #[command(about = "Delete a note")]
    Delete {
        #[arg(help = "Note id")]
        note_id: String,
    },
}
