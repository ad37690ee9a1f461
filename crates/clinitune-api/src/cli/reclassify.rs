use anyhow::Result;
use console::style;

use clinitune_core::chat::reclassify::fix_classifications;

use crate::state::AppState;

/// Re-scan every stored chat and print what changed.
pub async fn reclassify(state: &AppState, quiet: bool) -> Result<()> {
    let report = fix_classifications(state.triage_service.chat_repo()).await?;
    if quiet {
        return Ok(());
    }

    println!();
    println!(
        "  {} Re-scanned {} chats",
        style("✓").green().bold(),
        style(report.scanned).cyan()
    );
    println!("  {:<14} {}", style("Updated").dim(), report.updated);
    println!("  {:<14} {}", style("Alerts").dim(), report.total_alerts);
    println!();
    Ok(())
}
