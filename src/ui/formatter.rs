//! Pure formatting functions for UI output.
//!
//! Everything the library reports goes through here, so the look of the
//! output is decided in one place.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::version_file::{BatchReport, FileKind, FileStatus};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Show one version line before and after the rewrite.
pub fn display_rewrite(old: &str, new: &str) {
    println!("    {} {}", style("-").red(), style(old).dim());
    println!("    {} {}", style("+").green(), new);
}

/// Summarise a batch: written files, failed files and their reasons.
///
/// # Arguments
/// * `kind` - The file kind the batch ran over
/// * `report` - The batch outcome
pub fn display_batch_summary(kind: FileKind, report: &BatchReport) {
    println!(
        "\n{} {}: {} written, {} failed",
        style("Summary").bold(),
        kind,
        report.written().count(),
        report.failed().count()
    );
    for outcome in &report.files {
        match &outcome.status {
            FileStatus::Written => {
                let encoding = outcome.encoding.map(|v| v.encoding.label()).unwrap_or("?");
                println!(
                    "  {} {} ({})",
                    style("✓").green(),
                    outcome.path.display(),
                    encoding
                );
            }
            FileStatus::Failed(reason) => {
                println!("  {} {}: {}", style("✗").red(), outcome.path.display(), reason);
            }
        }
    }
}

/// Display the full version read from a set of files.
pub fn display_version(kind: FileKind, version: &str) {
    println!("{} version: {}", kind, style(version).cyan().bold());
}

/// Display a created commit.
///
/// # Arguments
/// * `id` - The commit id
/// * `message` - The commit message
pub fn display_commit(id: &str, message: &str) {
    let short = id.get(..7).unwrap_or(id);
    println!("{} [{}] {}", style("✓").green(), style(short).yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_status() {
        display_status("test status");
        display_success("test success");
    }

    #[test]
    fn test_display_commit_with_short_id() {
        display_commit("abc", "Update version to 1.2.3");
        display_commit("0123456789abcdef", "Update version to 1.2.3");
    }

    #[test]
    fn test_display_batch_summary_empty() {
        display_batch_summary(FileKind::ManifestJson, &BatchReport::default());
    }
}
