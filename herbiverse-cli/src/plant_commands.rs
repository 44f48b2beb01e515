use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use herbiverse_client::{HerbiverseClient, Notice, NoticeKind};
use herbiverse_types::{AddFavouriteOutcome, Note};

pub async fn list_favourites(client: &HerbiverseClient, json: bool) -> Result<()> {
    let favourites = client.favourites().list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&favourites)?);
        return Ok(());
    }

    if favourites.is_empty() {
        println!("{}", "No favourites yet.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Plant ID", "Name", "Scientific name"]);
    for fav in &favourites {
        table.add_row(vec![
            Cell::new(&fav.plant.id),
            Cell::new(&fav.plant.name),
            Cell::new(fav.plant.scientific_name.as_deref().unwrap_or("-")),
        ]);
    }

    println!("{table}");
    println!("\n{} favourites total", favourites.len());
    Ok(())
}

pub async fn add_favourite(client: &HerbiverseClient, plant_id: &str) -> Result<()> {
    match client.favourites().add(plant_id).await? {
        outcome @ AddFavouriteOutcome::Added => println!("{} {}", "✓".green(), outcome.message()),
        outcome @ AddFavouriteOutcome::AlreadyFavourite => println!("{}", outcome.message().yellow()),
    }
    Ok(())
}

pub async fn remove_favourite(client: &HerbiverseClient, plant_id: &str) -> Result<()> {
    client.favourites().remove(plant_id).await?;
    println!("{} Removed from Favorites", "✓".green());
    Ok(())
}

pub async fn check_favourite(client: &HerbiverseClient, plant_id: &str) -> Result<()> {
    if client.favourites().is_favourite(plant_id).await? {
        println!("{} {} is a favourite", "✓".green(), plant_id);
    } else {
        println!("{} is not a favourite", plant_id);
    }
    Ok(())
}

pub async fn list_notes(client: &HerbiverseClient, plant: Option<&str>, json: bool) -> Result<()> {
    let notes = match plant {
        Some(plant_id) => client.notes().list_for(plant_id).await?,
        None => client.notes().list_all().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("{}", "No notes found.".yellow());
        return Ok(());
    }

    println!("{}", notes_table(&notes));
    println!("\n{} notes total", notes.len());
    Ok(())
}

pub async fn add_note(client: &HerbiverseClient, plant_id: &str, content: &str) -> Result<()> {
    let note = client.notes().add(plant_id, content).await?;
    println!("{} Note added successfully ({})", "✓".green(), note.id);
    Ok(())
}

pub async fn edit_note(client: &HerbiverseClient, note_id: &str, content: &str) -> Result<()> {
    client.notes().update(note_id, content).await?;
    println!("{} Note updated successfully", "✓".green());
    Ok(())
}

pub async fn delete_note(client: &HerbiverseClient, note_id: &str) -> Result<()> {
    client.notes().delete(note_id).await?;
    println!("{} Note deleted successfully", "✓".green());
    Ok(())
}

pub async fn plant_id(client: &HerbiverseClient, name: &str) -> Result<()> {
    let id = client.plants().find_id(name).await?.context("Plant not found")?;
    println!("{id}");
    Ok(())
}

pub async fn show_herb(client: &HerbiverseClient, name: &str) -> Result<()> {
    let panel = client.herb_panel();
    panel.open(name).await;
    let state = panel.state();
    panel.close();

    if let Some(notice) = state.visible_favourite_notice() {
        print_notice(notice);
    }
    let Some(plant_id) = state.plant_id.as_deref() else {
        anyhow::bail!("Plant not found: {}", name);
    };

    println!("{} ({})", name.bold(), plant_id);
    if !client.session().is_authenticated() {
        println!("{}", "Log in to see favourites and notes.".yellow());
        return Ok(());
    }

    if state.is_favourite {
        println!("{} In your favourites", "★".yellow());
    } else {
        println!("☆ Not in your favourites");
    }

    if let Some(notice) = state.visible_note_notice() {
        print_notice(notice);
    }
    if state.notes.is_empty() {
        println!("No notes yet.");
    } else {
        println!("{}", notes_table(&state.notes));
    }
    Ok(())
}

fn notes_table(notes: &[Note]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Note ID", "Plant", "Created", "Content"]);
    for note in notes {
        table.add_row(vec![
            Cell::new(&note.id),
            Cell::new(note.plant.as_ref().map_or("-", |p| p.id())),
            Cell::new(
                note.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(&note.content),
        ]);
    }
    table
}

fn print_notice(notice: &Notice) {
    match notice.kind {
        NoticeKind::Success => println!("{} {}", "✓".green(), notice.message),
        NoticeKind::Error => println!("{} {}", "✗".red(), notice.message.red()),
    }
}
