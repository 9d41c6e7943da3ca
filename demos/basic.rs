//! Basic example demonstrating the Gerrit API client.
//!
//! Run with:
//! ```
//! GERRIT_SERVER=gerrit.example.com cargo run --example basic
//! ```

use chrono::Utc;
use gerritapi::{
    get_active_projects, get_changes_in_period, GerritClient, Get, ProjectInfo,
};

#[tokio::main]
async fn main() -> gerritapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Gerrit client...");
    let client = GerritClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    println!("\n--- Active Projects ---");
    let projects = get_active_projects(&client).await;
    println!("Found {} active projects", projects.items.len());
    for name in projects.items.iter().take(10) {
        println!("  - {name}");
    }

    if let Some(first) = projects.items.first() {
        println!("\n--- Project Details ---");
        let project = ProjectInfo::get(&client, first.clone()).await?;
        println!("Project: {}", project.display_name());
        println!("  Parent: {}", project.parent.as_deref().unwrap_or("-"));
        println!("  State: {:?}", project.state);
    }

    println!("\n--- Changes in the last 24 hours ---");
    let changes = get_changes_in_period(&client, "24Hours", Utc::now()).await?;
    println!("Found {} changes", changes.items.len());
    for change in changes.items.iter().take(5) {
        println!(
            "  {} {} (owner: {})",
            change.get("_number").cloned().unwrap_or_default(),
            change.get("subject").and_then(|s| s.as_str()).unwrap_or(""),
            change.get("owner").cloned().unwrap_or_default(),
        );
    }

    if !changes.is_complete() {
        println!("\n{} warning(s):", changes.warnings.len());
        for warning in &changes.warnings {
            println!("  - {warning}");
        }
    }

    println!("\nDone!");
    Ok(())
}
