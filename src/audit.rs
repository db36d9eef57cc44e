// src/audit.rs
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;
use walkdir::WalkDir;

use crate::flatten::walk_preorder;
use crate::model::SidebarConfig;
use crate::resolver::{component_key, component_name, kebab_case};

/// 走査するディレクトリ (src 相対)
const AUDIT_DIRS: &[&str] = &["pages", "components"];

/// ディスク上で見つかったコンポーネントファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFile {
    /// src 相対・拡張子なし (例: "pages/trips/ActiveTripsPage")
    pub component: String,
    pub name: String,
}

/// sidebar に追加する候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarSuggestion {
    pub id: String,
    pub label: String,
    pub path: String,
    pub component: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub total_files: usize,
    pub referenced_files: usize,
    pub unrouted: Vec<SidebarSuggestion>,
}

/// `<src>/pages` と `<src>/components` の下にあるコンポーネントファイルを集める
///
/// テスト (`.test.`) / ストーリー等 (`.spec.`) は除外。相対パス順に並べて返す。
pub fn collect_component_files(src_dir: &Path, ext: &str) -> Vec<ComponentFile> {
    let suffix = format!(".{}", ext);
    let mut files = Vec::new();

    for dir in AUDIT_DIRS {
        let root = src_dir.join(dir);
        if !root.is_dir() {
            tracing::debug!(dir = %root.display(), "audit directory not found, skipped");
            continue;
        }

        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let Some(fname) = entry.file_name().to_str() else {
                continue;
            };
            if !fname.ends_with(&suffix) || fname.contains(".test.") || fname.contains(".spec.") {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(src_dir) else {
                continue;
            };
            let relative: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            let joined = relative.join("/");
            let component = joined[..joined.len() - suffix.len()].to_string();
            let name = component_name(&component).to_string();
            files.push(ComponentFile { component, name });
        }
    }

    files.sort_by(|a, b| a.component.cmp(&b.component));
    files
}

/// ページらしいファイルかどうか
pub fn is_page_like(file: &ComponentFile) -> bool {
    file.name.contains("Page")
        || file.name.contains("Dashboard")
        || file.name.contains("Management")
        || file.component.starts_with("pages/")
}

/// sidebar から参照されている component (正規化済み) の集合
pub fn referenced_components(config: &SidebarConfig) -> HashSet<String> {
    let mut referenced = HashSet::new();
    walk_preorder(&config.items, &mut |item, _| {
        if let Some(component) = item.component() {
            referenced.insert(component_key(component));
        }
        for sub in &item.sub_components {
            referenced.insert(component_key(sub));
        }
    });
    referenced
}

/// ページらしいのに sidebar から参照されていないファイルについて、sidebar エントリ案を作る
pub fn suggest_entry(file: &ComponentFile) -> SidebarSuggestion {
    let base_name = file.name.strip_suffix("Page").filter(|s| !s.is_empty()).unwrap_or(&file.name);

    let mut segments: Vec<String> = file
        .component
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .split_last()
        .map(|(_, dirs)| dirs.iter().map(|d| kebab_case(d)).collect())
        .unwrap_or_default();
    if segments.first().map_or(false, |s| s == "pages") {
        segments.remove(0);
    }
    segments.push(kebab_case(base_name));

    SidebarSuggestion {
        id: kebab_case(&file.name),
        label: label_from_name(base_name),
        path: format!("/{}", segments.join("/")),
        component: file.component.clone(),
    }
}

pub fn audit_routes(config: &SidebarConfig, src_dir: &Path, ext: &str) -> AuditReport {
    let files = collect_component_files(src_dir, ext);
    let referenced = referenced_components(config);

    let referenced_files = files.iter().filter(|f| referenced.contains(&f.component)).count();
    let unrouted: Vec<SidebarSuggestion> = files
        .iter()
        .filter(|f| is_page_like(f) && !referenced.contains(&f.component))
        .map(suggest_entry)
        .collect();

    tracing::info!(files = files.len(), unrouted = unrouted.len(), "route audit finished");
    AuditReport {
        total_files: files.len(),
        referenced_files,
        unrouted,
    }
}

pub fn render_audit_markdown(report: &AuditReport) -> String {
    let mut markdown = String::from("# Route Audit Report\n\n");

    markdown.push_str("## Summary\n\n");
    let _ = writeln!(markdown, "- Total component files: {}", report.total_files);
    let _ = writeln!(markdown, "- Referenced by the sidebar: {}", report.referenced_files);
    let _ = writeln!(markdown, "- Potentially unrouted pages: {}", report.unrouted.len());
    markdown.push('\n');

    if report.unrouted.is_empty() {
        markdown.push_str("All page components are reachable from the sidebar.\n");
        return markdown;
    }

    markdown.push_str("## Unrouted Page Components\n\n");
    for suggestion in &report.unrouted {
        let _ = writeln!(markdown, "- `{}`", suggestion.component);
    }
    markdown.push('\n');

    markdown.push_str("## Suggested Sidebar Entries\n\n");
    markdown.push_str("```typescript\n");
    let entries: Vec<String> = report
        .unrouted
        .iter()
        .map(|s| {
            format!(
                "{{\n  id: '{}',\n  label: '{}',\n  path: '{}',\n  component: '{}'\n}}",
                s.id, s.label, s.path, s.component
            )
        })
        .collect();
    markdown.push_str(&entries.join(",\n"));
    markdown.push_str("\n```\n");
    markdown
}

fn label_from_name(name: &str) -> String {
    let mut label = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            label.push(' ');
        }
        if c == '-' || c == '_' {
            label.push(' ');
            prev_lower = false;
            continue;
        }
        label.push(c);
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
    }
    label
}
