//! sidebar の component 参照 (例: "pages/trips/ActiveTripsPage") から
//! ディスク上の場所や生成コードで使う名前を導き出す規則をまとめたモジュール。
//!
//! 規則:
//! - 最後のセグメントに `.` を含むものは「拡張子付きのファイルパス」とみなす
//! - ファイルの場所は `<base>/<component>.<ext>` (拡張子付きならそのまま)
//! - `pages` ディレクトリ配下ならページ扱い
//! - ルートパスの先頭セグメントがセクション、残りが子ルートの断片

use path_absolutize::Absolutize;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// 生成するソースの書き方。拡張子で決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFlavor {
    /// 型注釈付き (.ts / .tsx)
    TypeScript,
    /// 型注釈なし (.js / .jsx など)
    JavaScript,
}

impl SourceFlavor {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => SourceFlavor::TypeScript,
            _ => SourceFlavor::JavaScript,
        }
    }

    /// ファイルパスの拡張子から決める。拡張子がなければ TypeScript。
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(SourceFlavor::TypeScript, SourceFlavor::from_extension)
    }
}

/// 最後のセグメントが拡張子を持つかどうか
pub fn has_file_extension(component: &str) -> bool {
    last_segment(component).contains('.')
}

/// component 参照から実際のファイルパスを作る
pub fn component_file(base: &Path, component: &str, ext: &str) -> PathBuf {
    let relative = trim_relative_prefix(component);
    if has_file_extension(relative) {
        base.join(relative)
    } else {
        base.join(format!("{}.{}", relative, ext))
    }
}

/// 最後のセグメントから拡張子を除いたもの (例: "pages/tyres/inspection.tsx" → "inspection")
pub fn component_name(component: &str) -> &str {
    let last = last_segment(component);
    match last.find('.') {
        Some(dot) => &last[..dot],
        None => last,
    }
}

/// ディレクトリ部分に `pages` セグメントがあるか
pub fn is_page(component: &str) -> bool {
    let segments: Vec<&str> = trim_relative_prefix(component)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    match segments.split_last() {
        Some((_, dirs)) => dirs.iter().any(|s| *s == "pages"),
        None => false,
    }
}

/// ルートパスの先頭セグメント (例: "/trips/active" → Some("trips"))
pub fn route_section(path: &str) -> Option<&str> {
    path.split('/').find(|s| !s.is_empty())
}

/// セクションに対する相対的な子ルート断片
///
/// "/trips/active" → "active", "/trips/maps/live" → "maps/live", "/trips" → ""
pub fn child_fragment(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .skip(1)
        .collect::<Vec<_>>()
        .join("/")
}

/// 比較用に正規化した component 参照 (先頭の "./" "../" と拡張子を落とす)
pub fn component_key(component: &str) -> String {
    let relative = trim_relative_prefix(component);
    if has_file_extension(relative) {
        let cut = relative.len() - last_segment(relative).len() + component_name(relative).len();
        relative[..cut].to_string()
    } else {
        relative.to_string()
    }
}

/// "FleetUtilizationPage" → "fleet-utilization-page"
pub fn kebab_case(name: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_lower = true;
        } else {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// 生成ファイルから見た import 指定子
pub fn import_specifier(component: &str) -> String {
    format!("./{}", trim_relative_prefix(component))
}

/// component 名を PascalCase の識別子にする (例: "fleet-map" → "FleetMap")
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// 生成コード内で重複しない識別子を割り当てるための表
///
/// 同じ名前の別コンポーネントが来たら親ディレクトリ名を前に付け、
/// それでも衝突すれば連番を付ける。割り当て順が同じなら結果も同じ。
#[derive(Debug, Default)]
pub struct IdentifierTable {
    taken: HashSet<String>,
}

impl IdentifierTable {
    /// 生成コード側で既に使っている名前を予約した状態で作る
    pub fn with_reserved(names: &[&str]) -> Self {
        IdentifierTable {
            taken: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn assign(&mut self, component: &str) -> String {
        let mut ident = pascal_case(component_name(component));
        if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
            ident = format!("Component{}", ident);
        }

        if self.taken.contains(&ident) {
            let parent = trim_relative_prefix(component)
                .rsplit('/')
                .nth(1)
                .map(pascal_case)
                .unwrap_or_default();
            ident = format!("{}{}", parent, ident);
        }

        let base = ident.clone();
        let mut n = 2;
        while self.taken.contains(&ident) {
            ident = format!("{}{}", base, n);
            n += 1;
        }

        self.taken.insert(ident.clone());
        ident
    }
}

/// プロジェクトルートを絶対パス化する (存在しなくてもよい)
pub fn absolutize_root(root: &Path) -> io::Result<PathBuf> {
    Ok(root.absolutize()?.to_path_buf())
}

/// `base` 相対の設定値を解決する。絶対パスならそのまま。
pub fn resolve_under(base: &Path, value: &Path) -> io::Result<PathBuf> {
    Ok(value.absolutize_from(base)?.to_path_buf())
}

fn last_segment(component: &str) -> &str {
    component.rsplit('/').next().unwrap_or(component)
}

/// "./" や "../" で始まる参照 (lazy import 由来) を src 相対に揃える
fn trim_relative_prefix(component: &str) -> &str {
    let mut rest = component;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_detected_on_last_segment_only() {
        assert!(has_file_extension("pages/tyres/inspection.tsx"));
        assert!(!has_file_extension("pages/v1.2/InvoicePage"));
        assert!(!has_file_extension("pages/DashboardPage"));
    }

    #[test]
    fn component_file_appends_extension() {
        let base = Path::new("/app/src");
        assert_eq!(
            component_file(base, "pages/invoices/InvoiceDashboard", "tsx"),
            PathBuf::from("/app/src/pages/invoices/InvoiceDashboard.tsx")
        );
    }

    #[test]
    fn component_file_keeps_existing_extension() {
        let base = Path::new("/app/src");
        assert_eq!(
            component_file(base, "components/maps/MapsView.jsx", "tsx"),
            PathBuf::from("/app/src/components/maps/MapsView.jsx")
        );
    }

    #[test]
    fn component_file_strips_relative_prefix() {
        let base = Path::new("/app/src");
        assert_eq!(
            component_file(base, "../pages/DashboardPage", "tsx"),
            PathBuf::from("/app/src/pages/DashboardPage.tsx")
        );
    }

    #[test]
    fn component_name_drops_directories_and_extension() {
        assert_eq!(component_name("pages/trips/ActiveTripsPage"), "ActiveTripsPage");
        assert_eq!(component_name("components/TripForm.tsx"), "TripForm");
        assert_eq!(component_name("Standalone"), "Standalone");
    }

    #[test]
    fn pages_prefix_marks_page() {
        assert!(is_page("pages/invoices/InvoiceDashboard"));
        assert!(is_page("pages/DashboardPage"));
        assert!(is_page("../pages/DashboardPage"));
        assert!(!is_page("components/TripManagement/TripForm"));
        // ファイル名が "pages" でもディレクトリではないのでページ扱いしない
        assert!(!is_page("components/pages"));
        assert!(!is_page("components/mypages/Widget"));
    }

    #[test]
    fn section_and_fragment_split() {
        assert_eq!(route_section("/trips/active"), Some("trips"));
        assert_eq!(route_section("/"), None);
        assert_eq!(child_fragment("/trips/active"), "active");
        assert_eq!(child_fragment("/settings/users/roles"), "users/roles");
        assert_eq!(child_fragment("/trips"), "");
        assert_eq!(child_fragment("trips/active/"), "active");
    }

    #[test]
    fn import_specifier_is_src_relative() {
        assert_eq!(import_specifier("pages/DashboardPage"), "./pages/DashboardPage");
        assert_eq!(import_specifier("./pages/DashboardPage"), "./pages/DashboardPage");
    }

    #[test]
    fn component_key_normalizes_prefix_and_extension() {
        assert_eq!(component_key("../pages/DashboardPage"), "pages/DashboardPage");
        assert_eq!(component_key("pages/tyres/inspection.tsx"), "pages/tyres/inspection");
        assert_eq!(component_key("pages/v1.2/InvoicePage"), "pages/v1.2/InvoicePage");
    }

    #[test]
    fn kebab_case_splits_on_capitals() {
        assert_eq!(kebab_case("FleetUtilizationPage"), "fleet-utilization-page");
        assert_eq!(kebab_case("inventory"), "inventory");
        assert_eq!(kebab_case("Tyre_History"), "tyre-history");
    }

    #[test]
    fn pascal_case_handles_kebab_and_lowercase() {
        assert_eq!(pascal_case("inspection"), "Inspection");
        assert_eq!(pascal_case("fleet-map"), "FleetMap");
        assert_eq!(pascal_case("ActiveTripsPage"), "ActiveTripsPage");
    }

    #[test]
    fn identifier_table_disambiguates_same_name() {
        let mut table = IdentifierTable::default();
        assert_eq!(table.assign("pages/tyres/reports"), "Reports");
        assert_eq!(table.assign("pages/inventory/reports"), "InventoryReports");
        assert_eq!(table.assign("pages/other/inventory/reports"), "InventoryReports2");
    }

    #[test]
    fn identifier_table_avoids_reserved_names() {
        let mut table = IdentifierTable::with_reserved(&["Layout"]);
        assert_eq!(table.assign("components/layout/Layout"), "LayoutLayout");
        assert_eq!(table.assign("pages/reports/2024"), "Component2024");
    }

    #[test]
    fn resolve_under_keeps_absolute_paths() {
        let base = Path::new("/app");
        assert_eq!(
            resolve_under(base, Path::new("/tmp/out.tsx")).unwrap(),
            PathBuf::from("/tmp/out.tsx")
        );
        assert_eq!(
            resolve_under(base, Path::new("src/AppRoutes.tsx")).unwrap(),
            PathBuf::from("/app/src/AppRoutes.tsx")
        );
    }

    #[test]
    fn flavor_follows_extension() {
        assert_eq!(SourceFlavor::from_extension("tsx"), SourceFlavor::TypeScript);
        assert_eq!(SourceFlavor::from_extension(".ts"), SourceFlavor::TypeScript);
        assert_eq!(SourceFlavor::from_extension("jsx"), SourceFlavor::JavaScript);
        assert_eq!(SourceFlavor::from_extension("js"), SourceFlavor::JavaScript);
        let jsx = SourceFlavor::from_path(Path::new("src/AppRoutes.jsx"));
        assert_eq!(jsx, SourceFlavor::JavaScript);
        let bare = SourceFlavor::from_path(Path::new("src/AppRoutes"));
        assert_eq!(bare, SourceFlavor::TypeScript);
    }
}
