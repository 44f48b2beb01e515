use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use herbiverse_types::{Catalog, CatalogQuery, Category, Herb};

pub fn search_catalog(
    file: &Path,
    search: Option<String>,
    category: Option<Category>,
    group: bool,
    json: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let catalog = Catalog::from_json(&content).context("Failed to parse herb catalogue JSON")?;

    let mut query = CatalogQuery::new();
    if let Some(text) = search {
        query = query.search(text);
    }
    if let Some(category) = category {
        query = query.category(category);
    }

    if group {
        let groups = catalog.group(&query);
        if json {
            let labelled: Vec<_> = groups
                .iter()
                .map(|(category, herbs)| serde_json::json!({"category": category, "herbs": herbs}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&labelled)?);
            return Ok(());
        }
        if groups.is_empty() {
            println!("{}", "No herbs match.".yellow());
        }
        for (category, herbs) in &groups {
            println!("{} ({})", category.label().bold(), herbs.len());
            println!("{}", herb_table(herbs));
        }
        return Ok(());
    }

    let herbs = catalog.filter(&query);
    if json {
        println!("{}", serde_json::to_string_pretty(&herbs)?);
        return Ok(());
    }
    if herbs.is_empty() {
        println!("{}", "No herbs match.".yellow());
        return Ok(());
    }
    println!("{}", herb_table(&herbs));
    println!("\n{} of {} herbs", herbs.len(), catalog.len());
    Ok(())
}

fn herb_table(herbs: &[&Herb]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Scientific name", "Categories"]);
    for herb in herbs {
        let categories: Vec<&str> =
            herb.effective_categories().into_iter().map(Category::label).collect();
        table.add_row(vec![
            Cell::new(&herb.id),
            Cell::new(&herb.name),
            Cell::new(&herb.scientific_name),
            Cell::new(categories.join(", ")),
        ]);
    }
    table
}
