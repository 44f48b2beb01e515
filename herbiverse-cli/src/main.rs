//! `herbiverse` - command-line client for the Herbiverse API.
//!
//! The session (token and cached profile) lives in `<data dir>/session.json`
//! and is reconciled with the server before every command that needs it.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use herbiverse_client::{FileStorage, HerbiverseClient, SessionStorage};
use tracing_subscriber::EnvFilter;

mod catalog_commands;
mod cli;
mod plant_commands;
mod session_commands;
mod settings;

use cli::{Cli, Commands, FavouriteCommands, NoteCommands};
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Catalog { file, search, category, group, json } = cli.command {
        return catalog_commands::search_catalog(&file, search, category, group, json);
    }

    let data_dir = settings::resolve_data_dir(cli.data_dir)?;
    let settings = Settings::load(&data_dir, cli.api_url.as_deref())?;
    tracing::debug!("Using data dir {} and API {}", data_dir.display(), settings.api_url);

    let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::in_dir(&data_dir));
    let client = HerbiverseClient::new(settings.client_config(), storage)?;
    client.session().initialize().await;

    match cli.command {
        Commands::Login { email, password } => {
            session_commands::login(&client, &email, &password).await
        },
        Commands::Signup { name, email, password } => {
            session_commands::signup(&client, &name, &email, &password).await
        },
        Commands::Logout => session_commands::logout(&client).await,
        Commands::Whoami { json } => session_commands::whoami(&client, json),
        Commands::Refresh => session_commands::refresh(&client).await,
        Commands::Favourites(cmd) => match cmd {
            FavouriteCommands::List { json } => plant_commands::list_favourites(&client, json).await,
            FavouriteCommands::Add { plant_id } => {
                plant_commands::add_favourite(&client, &plant_id).await
            },
            FavouriteCommands::Remove { plant_id } => {
                plant_commands::remove_favourite(&client, &plant_id).await
            },
            FavouriteCommands::Check { plant_id } => {
                plant_commands::check_favourite(&client, &plant_id).await
            },
        },
        Commands::Notes(cmd) => match cmd {
            NoteCommands::List { plant, json } => {
                plant_commands::list_notes(&client, plant.as_deref(), json).await
            },
            NoteCommands::Add { plant_id, content } => {
                plant_commands::add_note(&client, &plant_id, &content).await
            },
            NoteCommands::Edit { note_id, content } => {
                plant_commands::edit_note(&client, &note_id, &content).await
            },
            NoteCommands::Delete { note_id } => plant_commands::delete_note(&client, &note_id).await,
        },
        Commands::PlantId { name } => plant_commands::plant_id(&client, &name).await,
        Commands::Herb { name } => plant_commands::show_herb(&client, &name).await,
        Commands::Catalog { .. } => Ok(()),
    }
}
