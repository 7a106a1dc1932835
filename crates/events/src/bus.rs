use super::models::{AppEvent, EventBus};
use std::sync::Arc;
use colored::Colorize;

impl EventBus {
    pub fn new(silent_mode: bool) -> Arc<Self> {
        Arc::new(Self { silent_mode })
    }

    pub fn emit(&self, event: AppEvent) {
        if self.silent_mode {
            tracing::debug!("{:?}", event);
            return;
        }

        match event {
            // Application lifecycle
            AppEvent::Starting => {
                println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
                println!("  {}", "mdimg - Markdown Image Keeper".white().bold());
                println!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            }
            AppEvent::Ready { addr } => {
                println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
                println!("  {} {}", "Server".white(), addr.cyan());
                println!("  {} {}", "API   ".white(), format!("http://{}/api/status", addr).blue());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
            }
            AppEvent::Shutdown => {
                println!("\n{}", "Server shutting down".red());
            }

            // Configuration
            AppEvent::ConfigLoading { path } => {
                println!("  {} {}", "Loading config".dimmed(), path.cyan());
            }
            AppEvent::ConfigLoaded { path } => {
                println!("  {} Config ready ({})", "✓".green(), path.dimmed());
            }
            AppEvent::ConfigCreated { path } => {
                tracing::warn!("Configuration file not found");
                tracing::info!("Created default configuration at: {}", path);
            }
            AppEvent::ConfigMigrated { added_fields } => {
                if !added_fields.is_empty() {
                    println!("  {} Config updated: added {}",
                        "↻".blue(),
                        added_fields.join(", ").dimmed()
                    );
                }
            }

            // Mapping store
            AppEvent::MappingLoaded { path, entries } => {
                if entries == 0 {
                    println!("  {} Mapping empty ({})", "⚠".yellow(), path.dimmed());
                } else {
                    println!("  {} {} mapping(s) from {}", "✓".green(), entries.to_string().cyan(), path.dimmed());
                }
            }
            AppEvent::MappingSaveFailed { path, error } => {
                tracing::error!("Failed to save mapping to {}: {}", path, error);
            }
            AppEvent::MappingMigrated { path, normalized, backup } => {
                println!("  {} Normalized {} mapping key(s) in {}", "↻".blue(), normalized.to_string().cyan(), path.dimmed());
                println!("    {} {}", "previous file".dimmed(), backup.dimmed());
            }

            // Operations
            AppEvent::ScanCompleted { directory, documents, images, invalid, unused, duration } => {
                println!(
                    "  {} Scanned {} ({} docs, {} images, {} invalid, {} unused) in {:.2}s",
                    "✓".green(),
                    directory.cyan(),
                    documents,
                    images,
                    invalid.to_string().yellow(),
                    unused.to_string().yellow(),
                    duration.as_secs_f64()
                );
            }
            AppEvent::UploadCompleted { document, uploaded, skipped, failed } => {
                let failed_label = if failed > 0 {
                    failed.to_string().red()
                } else {
                    failed.to_string().dimmed()
                };
                println!(
                    "  {} Uploaded {} from {} ({} skipped, {} failed)",
                    "↑".blue(),
                    uploaded.to_string().cyan(),
                    document.cyan(),
                    skipped,
                    failed_label
                );
            }
            AppEvent::LinksRewritten { document, replaced, link_type } => {
                println!("  {} Rewrote {} link(s) in {} to {}", "↻".blue(), replaced.to_string().cyan(), document.cyan(), link_type);
            }
            AppEvent::CleanupCompleted { directory, deleted, candidates } => {
                println!("  {} Deleted {}/{} unused image(s) in {}", "-".red(), deleted.to_string().cyan(), candidates, directory.cyan());
            }
            AppEvent::DownloadCompleted { document, downloaded, failed } => {
                println!("  {} Downloaded {} image(s) for {} ({} failed)", "↓".blue(), downloaded.to_string().cyan(), document.cyan(), failed);
            }
            AppEvent::PathsFixed { directory, fixed, invalid } => {
                println!("  {} Fixed {}/{} invalid reference(s) in {}", "✓".green(), fixed.to_string().cyan(), invalid, directory.cyan());
            }
            AppEvent::FixUndone { directory, restored } => {
                println!("  {} Restored {} document(s) in {}", "↺".yellow(), restored.to_string().cyan(), directory.cyan());
            }
            AppEvent::ReportExported { path } => {
                println!("  {} Report written to {}", "✓".green(), path.cyan());
            }
            AppEvent::LinksChecked { directory, checked, broken } => {
                let broken_label = if broken > 0 {
                    broken.to_string().red()
                } else {
                    broken.to_string().green()
                };
                println!("  {} Checked {} remote link(s) in {}, {} broken", "?".blue(), checked, directory.cyan(), broken_label);
            }

            // Errors
            AppEvent::Error { context, error } => {
                tracing::error!("{}: {}", context, error);
            }
        }
    }
}
