use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use herbiverse_client::HerbiverseClient;
use herbiverse_types::UserProfile;

pub async fn login(client: &HerbiverseClient, email: &str, password: &str) -> Result<()> {
    let profile = client.session().login(email, password).await?;
    println!("{} Logged in as {}", "✓".green(), display_name(&profile).green());
    Ok(())
}

pub async fn signup(client: &HerbiverseClient, name: &str, email: &str, password: &str) -> Result<()> {
    let profile = client.session().signup(name, email, password).await?;
    println!("{} Account created for {}", "✓".green(), display_name(&profile).green());
    Ok(())
}

pub async fn logout(client: &HerbiverseClient) -> Result<()> {
    if !client.session().is_authenticated() {
        println!("{}", "Not logged in.".yellow());
        return Ok(());
    }
    client.session().logout().await;
    println!("{} Logged out", "✓".green());
    Ok(())
}

pub fn whoami(client: &HerbiverseClient, json: bool) -> Result<()> {
    let session = client.session().session();

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    if !session.is_authenticated {
        println!("{}", "Not logged in.".yellow());
        return Ok(());
    }

    let Some(user) = session.user else {
        println!("{} Logged in (profile unavailable)", "✓".green());
        return Ok(());
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    for (key, value) in user.as_map() {
        let value = match value.as_str() {
            Some(text) => text.to_string(),
            None => value.to_string(),
        };
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    println!("{table}");
    Ok(())
}

pub async fn refresh(client: &HerbiverseClient) -> Result<()> {
    if !client.session().is_authenticated() {
        anyhow::bail!("Not logged in");
    }
    if client.session().refresh_profile().await {
        let name = client.session().user().map(|u| display_name(&u)).unwrap_or_default();
        println!("{} Profile refreshed for {}", "✓".green(), name.green());
        Ok(())
    } else if client.session().is_authenticated() {
        anyhow::bail!("Could not refresh profile; keeping the cached one")
    } else {
        anyhow::bail!("Session expired; log in again")
    }
}

fn display_name(profile: &UserProfile) -> String {
    profile.name().or_else(|| profile.email()).unwrap_or("unknown user").to_string()
}
