use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser as SwcParser, StringInput, Syntax, TsConfig};
use swc_ecma_visit::{Visit, VisitWith};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ToolError;
use crate::model::RawSidebarItem;

/// 本命の変数名。これが見つかれば他の候補より優先する。
const SIDEBAR_VAR: &str = "sidebarConfig";

/// AST をトラバースして sidebar 設定の配列リテラルを抽出する Visitor
struct SidebarVisitor {
    /// 見つかった変数名と、その配列から組み立てたノード
    found: Option<(String, Vec<RawSidebarItem>)>,
}

impl SidebarVisitor {
    fn new() -> Self {
        SidebarVisitor { found: None }
    }

    /// ObjectLit (例: `{ id: 'trips', label: 'Trips', children: [...] }`) を
    /// RawSidebarItem に変換する。知らないキーは無視。
    fn parse_item_object(&self, obj_lit: &ObjectLit) -> RawSidebarItem {
        let mut item = RawSidebarItem::default();

        for prop in &obj_lit.props {
            let PropOrSpread::Prop(boxed_prop) = prop else {
                continue;
            };
            let Prop::KeyValue(KeyValueProp { key, value }) = &**boxed_prop else {
                continue;
            };
            let Some(key_name) = prop_key(key) else {
                continue;
            };

            match key_name.as_str() {
                "id" => item.id = string_value(value).unwrap_or_default(),
                "label" => item.label = string_value(value).unwrap_or_default(),
                "path" => item.path = string_value(value),
                "icon" => item.icon = string_value(value).or_else(|| ident_value(value)),
                "component" => {
                    item.component = string_value(value).or_else(|| lazy_import_path(value))
                }
                "roles" => item.roles = string_array(value),
                "subComponents" => item.sub_components = string_array(value),
                "children" => {
                    if let Some(arr_lit) = as_array(value) {
                        item.children = self.extract_items_from_array(arr_lit);
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(id = %item.id, children = item.children.len(), "parsed sidebar item");
        item
    }

    /// 配列リテラルの要素のうちオブジェクトだけを拾う
    fn extract_items_from_array(&self, arr_lit: &ArrayLit) -> Vec<RawSidebarItem> {
        arr_lit
            .elems
            .iter()
            .flatten()
            .filter_map(|elem| match unwrap_ts(&elem.expr) {
                Expr::Object(obj_lit) => Some(self.parse_item_object(obj_lit)),
                _ => None,
            })
            .collect()
    }
}

impl Visit for SidebarVisitor {
    /// 変数宣言をキャッチして、sidebar 設定らしい配列を記録する
    fn visit_var_decl(&mut self, var_decl: &VarDecl) {
        for declarator in &var_decl.decls {
            let Pat::Ident(BindingIdent { id, .. }) = &declarator.name else {
                continue;
            };
            let var_name = id.sym.to_string();

            let exact = var_name == SIDEBAR_VAR;
            let candidate = exact || var_name.to_lowercase().contains("sidebar");
            if !candidate {
                continue;
            }
            // 既に本命を見つけている、または別の候補を先に見つけている場合はそちらを使う
            if let Some((found_name, _)) = &self.found {
                if found_name == SIDEBAR_VAR || !exact {
                    continue;
                }
            }

            if let Some(arr_lit) = declarator.init.as_deref().and_then(as_array) {
                let items = self.extract_items_from_array(arr_lit);
                tracing::debug!(variable = %var_name, count = items.len(), "sidebar array found");
                self.found = Some((var_name, items));
            }
        }

        var_decl.visit_children_with(self);
    }
}

/// sidebarConfig.ts を読み込んで sidebar ノードを取り出す
pub fn parse_sidebar_file(file_path: &Path) -> Result<Vec<RawSidebarItem>, ToolError> {
    let src = fs::read_to_string(file_path).map_err(|source| ToolError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %file_path.display(), bytes = src.len(), "parsing sidebar config");
    parse_sidebar_source(file_path, src)
}

/// ソース文字列から sidebar ノードを取り出す。`file_path` は拡張子 (tsx 判定) とエラー表示に使う。
pub fn parse_sidebar_source(
    file_path: &Path,
    src: String,
) -> Result<Vec<RawSidebarItem>, ToolError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Real(file_path.to_path_buf()), src);

    let tsx = file_path.extension().map_or(false, |ext| ext == "tsx");
    let syntax = Syntax::Typescript(TsConfig {
        tsx,
        decorators: true,
        dts: false,
        no_early_errors: true,
        disallow_ambiguous_jsx_like: true,
    });

    let lexer = Lexer::new(syntax, Default::default(), StringInput::from(&*fm), None);
    let mut parser = SwcParser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| ToolError::Parse {
        path: file_path.to_path_buf(),
        message: format!("{:?}", e.kind()),
    })?;

    let mut visitor = SidebarVisitor::new();
    visitor.visit_module(&module);

    match visitor.found {
        Some((_, items)) => Ok(items),
        None => Err(ToolError::ConfigNotFound(PathBuf::from(file_path))),
    }
}

fn prop_key(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(Str { value, .. }) => Some(value.to_string()),
        _ => None,
    }
}

/// `as const` / `satisfies` / 括弧を剥がす
fn unwrap_ts(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(ParenExpr { expr, .. })
        | Expr::TsAs(TsAsExpr { expr, .. })
        | Expr::TsConstAssertion(TsConstAssertion { expr, .. })
        | Expr::TsSatisfies(TsSatisfiesExpr { expr, .. }) => unwrap_ts(expr),
        other => other,
    }
}

fn as_array(expr: &Expr) -> Option<&ArrayLit> {
    match unwrap_ts(expr) {
        Expr::Array(arr_lit) => Some(arr_lit),
        _ => None,
    }
}

/// 文字列リテラルか、式を含まないテンプレートリテラル
fn string_value(expr: &Expr) -> Option<String> {
    match unwrap_ts(expr) {
        Expr::Lit(Lit::Str(Str { value, .. })) => Some(value.to_string()),
        Expr::Tpl(Tpl { exprs, quasis, .. }) if exprs.is_empty() => {
            quasis.first().map(|q| q.raw.to_string())
        }
        _ => None,
    }
}

fn ident_value(expr: &Expr) -> Option<String> {
    match unwrap_ts(expr) {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        _ => None,
    }
}

fn string_array(expr: &Expr) -> Vec<String> {
    as_array(expr)
        .map(|arr_lit| {
            arr_lit
                .elems
                .iter()
                .flatten()
                .filter_map(|elem| string_value(&elem.expr))
                .collect()
        })
        .unwrap_or_default()
}

/// `lazy(() => import('../pages/X'))` や `() => import('./X').then(...)` から import 先を取り出す
fn lazy_import_path(expr: &Expr) -> Option<String> {
    match unwrap_ts(expr) {
        Expr::Call(CallExpr { callee: Callee::Import(_), args, .. }) => {
            args.first().and_then(|arg| string_value(&arg.expr))
        }
        Expr::Call(CallExpr { callee, args, .. }) => {
            let from_callee = match callee {
                Callee::Expr(callee_expr) => lazy_import_path(callee_expr),
                _ => None,
            };
            from_callee.or_else(|| args.iter().find_map(|arg| lazy_import_path(&arg.expr)))
        }
        Expr::Arrow(ArrowExpr { body, .. }) => match &**body {
            BlockStmtOrExpr::Expr(body_expr) => lazy_import_path(body_expr),
            BlockStmtOrExpr::BlockStmt(block) => block.stmts.iter().find_map(|stmt| match stmt {
                Stmt::Return(ReturnStmt { arg: Some(arg), .. }) => lazy_import_path(arg),
                _ => None,
            }),
        },
        Expr::Member(MemberExpr { obj, .. }) => lazy_import_path(obj),
        _ => None,
    }
}
