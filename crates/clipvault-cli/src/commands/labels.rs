use anyhow::{Context, Result};

use crate::app::App;

pub async fn run(app: &App) -> Result<()> {
    let labels = app
        .backend()
        .list_labels()
        .await
        .context("Failed to list labels")?;

    if labels.is_empty() {
        println!("No labels");
    }
    for label in labels {
        println!("{label}");
    }

    Ok(())
}
