// src/validator.rs
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::flatten::walk_preorder;
use crate::model::SidebarConfig;
use crate::resolver::{component_file, component_name};

/// 見つからなかったコンポーネント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingComponent {
    /// スキャフォールドの見出しに使う名前
    /// (メインは sidebar の label、補助は component 名)
    pub name: String,
    pub path: String,
}

/// スキャフォールドに失敗したコンポーネント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldFailure {
    pub path: String,
    pub error: String,
}

/// 検証レポート
///
/// `missing` は検証時点の結果のまま残し、スキャフォールドの結果は
/// `created` / `failed` に積む。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub existing: Vec<String>,
    pub missing: Vec<MissingComponent>,
    pub created: Vec<String>,
    pub failed: Vec<ScaffoldFailure>,
}

impl ValidationReport {
    /// 検証したパスの総数
    pub fn checked(&self) -> usize {
        self.existing.len() + self.missing.len()
    }

    /// スキャフォールド後もまだ存在しないもの
    pub fn still_missing(&self) -> Vec<&MissingComponent> {
        self.missing
            .iter()
            .filter(|m| !self.created.contains(&m.path))
            .collect()
    }
}

/// ツリー上のすべての component と subComponents の存在を確認する
///
/// 前順でたどり、同じファイルに解決される参照は最初の 1 回だけ確認する。
/// path のないノードの component も対象。
/// ファイルがあるかどうかだけを見て、中身が正しいコンポーネントかどうかは見ない。
pub fn validate_components(config: &SidebarConfig, base: &Path, ext: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    walk_preorder(&config.items, &mut |item, _depth| {
        let main = item.component().map(|c| (c, item.label.as_str()));
        let subs = item.sub_components.iter().map(|s| (s.as_str(), component_name(s)));

        for (path, name) in main.into_iter().chain(subs) {
            let file = component_file(base, path, ext);
            if seen.contains(&file) {
                continue;
            }
            if file.is_file() {
                tracing::debug!(%path, "component exists");
                report.existing.push(path.to_string());
            } else {
                tracing::debug!(%path, file = %file.display(), "component missing");
                report.missing.push(MissingComponent {
                    name: name.to_string(),
                    path: path.to_string(),
                });
            }
            seen.insert(file);
        }
    });

    report
}
