// src/scaffold.rs
use std::fs;
use std::io;
use std::path::Path;

use crate::resolver::{component_file, is_page, IdentifierTable, SourceFlavor};
use crate::validator::{MissingComponent, ScaffoldFailure, ValidationReport};

/// 仮実装の見た目の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// pages 配下: 見出し付きの全画面レイアウト
    Page,
    /// それ以外: カード型のコンパクトなレイアウト
    Component,
}

impl PlaceholderKind {
    pub fn for_component(component: &str) -> Self {
        if is_page(component) {
            PlaceholderKind::Page
        } else {
            PlaceholderKind::Component
        }
    }
}

/// 「開発中」と表示するだけの仮コンポーネントのソースを作る
///
/// JavaScript で書く場合は Props の型宣言と `React.FC` 注釈を出さない。
pub fn placeholder_source(name: &str, component: &str, flavor: SourceFlavor) -> String {
    let ident = IdentifierTable::default().assign(component);
    // 見出しは JS の文字列式として埋め込む ({"Maps & Tracking"} など)
    let title = serde_json::to_string(name).unwrap_or_else(|_| "\"\"".to_string());

    let body = match PlaceholderKind::for_component(component) {
        PlaceholderKind::Page => format!(
            r#"    <div className="p-4">
      <h1 className="text-xl font-bold mb-4">{{{title}}}</h1>
      <div className="bg-white rounded-lg shadow p-4">
        <p className="text-gray-500">This page is under development.</p>
      </div>
    </div>"#
        ),
        PlaceholderKind::Component => format!(
            r#"    <div className="rounded-lg border p-4 mb-4">
      <h2 className="text-lg font-medium mb-2">{{{title}}}</h2>
      <div className="text-gray-500">
        <p>This component is under development.</p>
      </div>
    </div>"#
        ),
    };

    let declaration = match flavor {
        SourceFlavor::TypeScript => format!(
            "interface {ident}Props {{}}\n\nconst {ident}: React.FC<{ident}Props> = () => {{"
        ),
        SourceFlavor::JavaScript => format!("const {ident} = () => {{"),
    };

    format!(
        r#"import React from 'react';

{declaration}
  return (
{body}
  );
}};

export default {ident};
"#
    )
}

/// 検証で見つからなかったコンポーネントを仮実装で作る
///
/// 1 件の失敗で残りを止めない。成功は `created`、失敗は `failed` に入る。
pub fn scaffold_missing(report: &mut ValidationReport, base: &Path, ext: &str) {
    if report.missing.is_empty() {
        tracing::info!("no missing components to create");
        return;
    }

    let flavor = SourceFlavor::from_extension(ext);
    for missing in &report.missing {
        match write_placeholder(missing, base, ext, flavor) {
            Ok(()) => {
                tracing::info!(path = %missing.path, "created component");
                report.created.push(missing.path.clone());
            }
            Err(err) => {
                tracing::warn!(path = %missing.path, error = %err, "failed to create component");
                report.failed.push(ScaffoldFailure {
                    path: missing.path.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
}

fn write_placeholder(
    missing: &MissingComponent,
    base: &Path,
    ext: &str,
    flavor: SourceFlavor,
) -> io::Result<()> {
    let file = component_file(base, &missing.path, ext);
    if let Some(dir) = file.parent() {
        if !dir.is_dir() {
            fs::create_dir_all(dir)?;
            tracing::debug!(dir = %dir.display(), "created directory");
        }
    }
    fs::write(&file, placeholder_source(&missing.name, &missing.path, flavor))
}
