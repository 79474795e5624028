use super::ui;
use crate::core::AdminApi;
use anyhow::{Context, Result};
use console::Term;
use tracing::info;

/// Asks on the terminal whether to go ahead. Anything but `y`/`yes` declines.
pub fn confirm_on_terminal(prompt: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{prompt} [y/N] "))?;
    let answer = term.read_line().context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Deletes a trade permanently once `confirm` agrees.
pub async fn run(
    api: &(dyn AdminApi + Send + Sync),
    id: u64,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<()> {
    if !confirm(&format!("Delete trade {id}? This cannot be undone."))? {
        println!("Aborted, trade {id} was not deleted.");
        return Ok(());
    }

    api.delete_trade(id)
        .await
        .with_context(|| format!("Failed to delete trade {id}"))?;
    info!("Deleted trade {}", id);
    ui::notify_success(&format!("Deleted trade {id}"));
    Ok(())
}
