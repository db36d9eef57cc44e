// src/generator.rs
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::ToolError;
use crate::model::RouteEntry;
use crate::resolver::{
    child_fragment, has_file_extension, import_specifier, pascal_case, route_section,
    IdentifierTable, SourceFlavor,
};

/// 生成コードの中で予約済みの識別子
const RESERVED_IDENTIFIERS: &[&str] = &[
    "React",
    "lazy",
    "Suspense",
    "Router",
    "Routes",
    "Route",
    "Navigate",
    "Layout",
    "Loading",
    "AppRoutes",
];

const HEADER: &str =
    "// This file is generated from the sidebar configuration. Do not edit it by hand.\n";

/// 出力するルートファイルの形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLayout {
    /// Router / Layout まで含む完結したルーティングモジュール。
    /// セクションごとに入れ子にする。
    Nested,
    /// 既存の Routes に埋め込む絶対パスのフラグメント
    Flat,
}

/// 生成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRoutes {
    pub source: String,
    pub imports: usize,
    pub routes: usize,
    /// 拡張子付きのファイルパスを指していたため出力しなかった component
    pub skipped: Vec<String>,
}

/// ファイルに書いた結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// import 対象となった 1 ルート
struct ResolvedRoute<'a> {
    entry: &'a RouteEntry,
    ident: String,
}

/// セクション (パス先頭セグメント) ごとにまとめたルート
struct SectionGroup<'a> {
    name: String,
    index: Option<&'a ResolvedRoute<'a>>,
    children: Vec<(String, &'a ResolvedRoute<'a>)>,
}

/// フラット化済みのルート列からルートファイルのソースを作る
///
/// 入力順がそのまま import 順・ルート順になるので、同じツリーからは常に同じ出力になる。
/// `flavor` が JavaScript なら型注釈を出さない。
pub fn generate_routes(
    routes: &[RouteEntry],
    layout: RouteLayout,
    flavor: SourceFlavor,
) -> GeneratedRoutes {
    let mut table = IdentifierTable::with_reserved(RESERVED_IDENTIFIERS);
    let mut idents: HashMap<String, String> = HashMap::new();
    let mut imports: Vec<(String, String)> = Vec::new();
    let mut resolved: Vec<ResolvedRoute> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    for entry in routes {
        if has_file_extension(&entry.component) {
            tracing::warn!(
                id = %entry.id,
                component = %entry.component,
                "component points at a file with an extension, route skipped"
            );
            if !skipped.contains(&entry.component) {
                skipped.push(entry.component.clone());
            }
            continue;
        }

        let specifier = import_specifier(&entry.component);
        let ident = match idents.get(&specifier) {
            Some(ident) => ident.clone(),
            None => {
                let ident = table.assign(&entry.component);
                idents.insert(specifier.clone(), ident.clone());
                imports.push((ident.clone(), specifier));
                ident
            }
        };
        resolved.push(ResolvedRoute { entry, ident });
    }

    let mut source = String::new();
    source.push_str(HEADER);
    source.push_str("import React, { lazy, Suspense } from 'react';\n");
    match layout {
        RouteLayout::Nested => {
            source.push_str(
                "import { BrowserRouter as Router, Routes, Route, Navigate } \
                 from 'react-router-dom';\n",
            );
            source.push_str("import Layout from './components/layout/Layout';\n");
        }
        RouteLayout::Flat => {
            source.push_str("import { Route, Navigate } from 'react-router-dom';\n");
        }
    }
    source.push('\n');

    for (ident, specifier) in &imports {
        let _ = writeln!(source, "const {} = lazy(() => import({}));", ident, js_string(specifier));
    }
    if !imports.is_empty() {
        source.push('\n');
    }

    source.push_str(
        "const Loading = () => <div className=\"p-4 text-gray-500\">Loading...</div>;\n\n",
    );
    render_role_map(&mut source, &resolved, flavor);

    match layout {
        RouteLayout::Nested => render_nested(&mut source, &resolved),
        RouteLayout::Flat => render_flat(&mut source, &resolved),
    }

    GeneratedRoutes {
        source,
        imports: imports.len(),
        routes: resolved.len(),
        skipped,
    }
}

/// ルートファイルを書き出す。内容が同じなら書かない。
///
/// 書き込めない場合は実行全体の失敗として返す。
pub fn write_routes(path: &Path, generated: &GeneratedRoutes) -> Result<WriteOutcome, ToolError> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == generated.source {
            tracing::info!(path = %path.display(), "routes file unchanged");
            return Ok(WriteOutcome::Unchanged);
        }
    }

    let output_err = |source| ToolError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(output_err)?;
    }
    fs::write(path, &generated.source).map_err(output_err)?;

    tracing::info!(
        path = %path.display(),
        routes = generated.routes,
        imports = generated.imports,
        "routes file written"
    );
    Ok(WriteOutcome::Written)
}

fn render_role_map(source: &mut String, resolved: &[ResolvedRoute], flavor: SourceFlavor) {
    let declaration = match flavor {
        SourceFlavor::TypeScript => "export const routeRoles: Record<string, string[]> =",
        SourceFlavor::JavaScript => "export const routeRoles =",
    };
    let with_roles: Vec<&ResolvedRoute> = resolved
        .iter()
        .filter(|r| !r.entry.roles.is_empty())
        .collect();
    if with_roles.is_empty() {
        let _ = writeln!(source, "{} {{}};\n", declaration);
        return;
    }

    let _ = writeln!(source, "{} {{", declaration);
    for route in with_roles {
        let roles: Vec<String> = route.entry.roles.iter().map(|r| js_string(r)).collect();
        let _ = writeln!(source, "  {}: [{}],", js_string(&route.entry.path), roles.join(", "));
    }
    source.push_str("};\n\n");
}

fn render_nested(source: &mut String, resolved: &[ResolvedRoute]) {
    let mut top_level: Vec<&ResolvedRoute> = Vec::new();
    let mut sections: Vec<SectionGroup> = Vec::new();

    for route in resolved {
        let Some(section) = route_section(&route.entry.path) else {
            top_level.push(route);
            continue;
        };
        let position = match sections.iter().position(|s| s.name == section) {
            Some(position) => position,
            None => {
                sections.push(SectionGroup {
                    name: section.to_string(),
                    index: None,
                    children: Vec::new(),
                });
                sections.len() - 1
            }
        };
        let group = &mut sections[position];
        let fragment = child_fragment(&route.entry.path);
        if fragment.is_empty() && group.index.is_none() {
            group.index = Some(route);
        } else {
            group.children.push((fragment, route));
        }
    }

    source.push_str("const AppRoutes = () => (\n");
    source.push_str("  <Router>\n");
    source.push_str("    <Routes>\n");
    source.push_str("      <Route element={<Layout />}>\n");

    for route in top_level {
        let _ = writeln!(source, "        <Route index element={{{}}} />", suspended(&route.ident));
    }

    for group in &sections {
        let _ = writeln!(source, "        {{/* {} */}}", pascal_case(&group.name));
        let _ = writeln!(source, "        <Route path=\"{}\">", attr(&group.name));
        match (group.index, group.children.first()) {
            (Some(index), _) => {
                let _ = writeln!(
                    source,
                    "          <Route index element={{{}}} />",
                    suspended(&index.ident)
                );
            }
            (None, Some((fragment, _))) => {
                let _ = writeln!(
                    source,
                    "          <Route index element={{<Navigate to=\"/{}/{}\" replace />}} />",
                    attr(&group.name),
                    attr(fragment)
                );
            }
            (None, None) => {}
        }
        for (fragment, route) in &group.children {
            if fragment.is_empty() {
                // セクション直下に同じパスが 2 つ目以降。index は 1 つしか置けない。
                tracing::warn!(
                    id = %route.entry.id,
                    path = %route.entry.path,
                    "duplicate section root route skipped"
                );
                continue;
            }
            let _ = writeln!(
                source,
                "          <Route path=\"{}\" element={{{}}} />",
                attr(fragment),
                suspended(&route.ident)
            );
        }
        source.push_str("        </Route>\n");
    }

    source.push_str("        {/* Fallback */}\n");
    source.push_str("        <Route path=\"*\" element={<Navigate to=\"/\" replace />} />\n");
    source.push_str("      </Route>\n");
    source.push_str("    </Routes>\n");
    source.push_str("  </Router>\n");
    source.push_str(");\n\n");
    source.push_str("export default AppRoutes;\n");
}

fn render_flat(source: &mut String, resolved: &[ResolvedRoute]) {
    source.push_str("export const AppRoutes = () => {\n");
    source.push_str("  return (\n");
    source.push_str("    <>\n");
    for route in resolved {
        let _ = writeln!(
            source,
            "      <Route path=\"{}\" element={{{}}} />",
            attr(&route.entry.path),
            suspended(&route.ident)
        );
    }
    source.push_str("      {/* Fallback */}\n");
    source.push_str("      <Route path=\"*\" element={<Navigate to=\"/\" replace />} />\n");
    source.push_str("    </>\n");
    source.push_str("  );\n");
    source.push_str("};\n");
}

fn suspended(ident: &str) -> String {
    format!("<Suspense fallback={{<Loading />}}><{} /></Suspense>", ident)
}

/// シングルクォートの JS 文字列リテラル
fn js_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// JSX 属性値 (ダブルクォート) 用のエスケープ
fn attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
