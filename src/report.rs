// src/report.rs
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::ToolError;
use crate::validator::ValidationReport;

/// 検証レポートを Markdown にする
pub fn render_validation_markdown(report: &ValidationReport, ext: &str) -> String {
    let still_missing = report.still_missing();
    let mut markdown = String::from("# Component Validation Report\n\n");

    markdown.push_str("## Summary\n\n");
    let _ = writeln!(markdown, "- Existing components: {}", report.existing.len());
    let _ = writeln!(markdown, "- Missing components: {}", still_missing.len());
    let _ = writeln!(markdown, "- Created components: {}", report.created.len());
    if !report.failed.is_empty() {
        let _ = writeln!(markdown, "- Failed to create: {}", report.failed.len());
    }
    markdown.push('\n');

    if !report.created.is_empty() {
        markdown.push_str("## Created Components\n\n");
        for path in &report.created {
            let _ = writeln!(markdown, "- `{}`", file_name(path, ext));
        }
        markdown.push('\n');
    }

    if !still_missing.is_empty() {
        markdown.push_str("## Still Missing Components\n\n");
        for missing in &still_missing {
            let _ = writeln!(markdown, "- `{}`", file_name(&missing.path, ext));
        }
        markdown.push('\n');
    }

    if !report.failed.is_empty() {
        markdown.push_str("## Errors\n\n");
        for failure in &report.failed {
            let _ = writeln!(markdown, "- `{}`: {}", file_name(&failure.path, ext), failure.error);
        }
        markdown.push('\n');
    }

    markdown
}

/// レポートを書き出す。失敗したら実行全体の失敗。
pub fn write_report(path: &Path, markdown: &str) -> Result<(), ToolError> {
    fs::write(path, markdown).map_err(|source| ToolError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// コンソール向けの要約
pub fn print_summary(report: &ValidationReport) {
    println!();
    println!("Summary:");
    println!("- Checked paths: {}", report.checked());
    println!("- Existing components: {}", report.existing.len());
    println!("- Missing components: {}", report.still_missing().len());
    println!("- Created components: {}", report.created.len());
    if !report.failed.is_empty() {
        println!("- Failed to create: {}", report.failed.len());
    }
}

fn file_name(path: &str, ext: &str) -> String {
    if crate::resolver::has_file_extension(path) {
        path.to_string()
    } else {
        format!("{}.{}", path, ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{MissingComponent, ScaffoldFailure};

    fn sample() -> ValidationReport {
        ValidationReport {
            existing: vec!["pages/DashboardPage".into()],
            missing: vec![
                MissingComponent {
                    name: "Invoices".into(),
                    path: "pages/invoices/InvoiceDashboard".into(),
                },
                MissingComponent { name: "Broken".into(), path: "blocked/Broken".into() },
            ],
            created: vec!["pages/invoices/InvoiceDashboard".into()],
            failed: vec![ScaffoldFailure {
                path: "blocked/Broken".into(),
                error: "Not a directory".into(),
            }],
        }
    }

    #[test]
    fn markdown_has_all_sections() {
        let markdown = render_validation_markdown(&sample(), "tsx");
        assert!(markdown.starts_with("# Component Validation Report\n\n## Summary\n\n"));
        assert!(markdown.contains("- Existing components: 1\n"));
        assert!(markdown.contains("- Missing components: 1\n"));
        assert!(markdown.contains("- Created components: 1\n"));
        assert!(markdown
            .contains("## Created Components\n\n- `pages/invoices/InvoiceDashboard.tsx`\n"));
        assert!(markdown.contains("## Still Missing Components\n\n- `blocked/Broken.tsx`\n"));
        assert!(markdown.contains("## Errors\n\n- `blocked/Broken.tsx`: Not a directory\n"));
    }

    #[test]
    fn clean_report_only_has_summary() {
        let report = ValidationReport {
            existing: vec!["pages/DashboardPage".into()],
            ..Default::default()
        };
        let markdown = render_validation_markdown(&report, "tsx");
        assert!(!markdown.contains("## Created Components"));
        assert!(!markdown.contains("## Still Missing Components"));
        assert!(!markdown.contains("## Errors"));
    }

    #[test]
    fn write_report_to_missing_dir_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = write_report(&dir.path().join("nope").join("REPORT.md"), "# x").unwrap_err();
        assert!(matches!(err, ToolError::OutputWrite { .. }));
    }
}
