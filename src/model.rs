// src/model.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ToolError;
use crate::flatten::walk_preorder;

/// 外部ソース (sidebarConfig.ts / JSON) から読んだままの sidebar ノード
///
/// path と component が揃っているかどうかはまだ分からない。
/// `SidebarItem` に変換するときに区別する。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSidebarItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub path: Option<String>,
    /// import パス (例: "pages/trips/ActiveTripsPage")
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub children: Vec<RawSidebarItem>,
    #[serde(default)]
    pub sub_components: Vec<String>,
}

/// ノードの種類
///
/// ルートを持つかどうかを型で表す。children はどちらの種類にも付けられる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// ルートを持たないノード。path のない component は存在チェックだけに使う。
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        component: Option<String>,
    },
    /// path と component を両方持つルーティング可能ノード
    Route { path: String, component: String },
}

/// 正規化済みの sidebar ノード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarItem {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SidebarItem>,
    /// 存在チェックだけに使う補助コンポーネントのパス
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_components: Vec<String>,
}

impl SidebarItem {
    pub fn route(&self) -> Option<(&str, &str)> {
        match &self.kind {
            NodeKind::Route { path, component } => Some((path, component)),
            NodeKind::Section { .. } => None,
        }
    }

    /// ルートの有無にかかわらず、このノードが参照する component
    pub fn component(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Route { component, .. } => Some(component.as_str()),
            NodeKind::Section { component } => component.as_deref(),
        }
    }
}

impl From<RawSidebarItem> for SidebarItem {
    fn from(raw: RawSidebarItem) -> Self {
        if raw.id.is_empty() {
            tracing::warn!(label = %raw.label, "sidebar item without id");
        }

        let kind = match (raw.path, raw.component) {
            (Some(path), Some(component)) => NodeKind::Route { path, component },
            (Some(path), None) => {
                tracing::warn!(
                    id = %raw.id,
                    %path,
                    "item has a path but no component, treated as section"
                );
                NodeKind::Section { component: None }
            }
            (None, Some(component)) => {
                tracing::warn!(
                    id = %raw.id,
                    %component,
                    "item has a component but no path, not routed"
                );
                NodeKind::Section {
                    component: Some(component),
                }
            }
            (None, None) => NodeKind::Section { component: None },
        };

        SidebarItem {
            id: raw.id,
            label: raw.label,
            kind,
            icon: raw.icon,
            roles: raw.roles,
            children: raw.children.into_iter().map(SidebarItem::from).collect(),
            sub_components: raw.sub_components,
        }
    }
}

/// ツールに明示的に渡す sidebar 設定ツリー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarConfig {
    pub items: Vec<SidebarItem>,
}

impl SidebarConfig {
    pub fn new(items: Vec<SidebarItem>) -> Self {
        SidebarConfig { items }
    }

    pub fn from_raw(raw: Vec<RawSidebarItem>) -> Self {
        SidebarConfig::new(raw.into_iter().map(SidebarItem::from).collect())
    }

    /// ツリー全体で id が一意かを確認する。最初に見つかった重複でエラー。
    ///
    /// id のないノードは読み込み時に警告済みなので、ここでは比較しない。
    pub fn check_unique_ids(&self) -> Result<(), ToolError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        let mut duplicate: Option<ToolError> = None;

        walk_preorder(&self.items, &mut |item, _depth| {
            if duplicate.is_some() || item.id.is_empty() {
                return;
            }
            if let Some(first) = seen.insert(item.id.as_str(), item.label.as_str()) {
                duplicate = Some(ToolError::DuplicateId {
                    id: item.id.clone(),
                    first: first.to_string(),
                    second: item.label.clone(),
                });
            }
        });

        match duplicate {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// フラット化されたルーティング可能ノード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub id: String,
    pub label: String,
    pub path: String,
    pub component: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// ツリー上の深さ (ルート直下が 0)
    pub depth: usize,
}

#[cfg(test)]
impl SidebarItem {
    pub fn section(id: &str, label: &str) -> Self {
        SidebarItem {
            id: id.to_string(),
            label: label.to_string(),
            kind: NodeKind::Section { component: None },
            icon: None,
            roles: Vec::new(),
            children: Vec::new(),
            sub_components: Vec::new(),
        }
    }

    pub fn routed(id: &str, label: &str, path: &str, component: &str) -> Self {
        SidebarItem {
            kind: NodeKind::Route {
                path: path.to_string(),
                component: component.to_string(),
            },
            ..SidebarItem::section(id, label)
        }
    }

    pub fn unrouted(id: &str, label: &str, component: &str) -> Self {
        SidebarItem {
            kind: NodeKind::Section {
                component: Some(component.to_string()),
            },
            ..SidebarItem::section(id, label)
        }
    }

    pub fn with_children(mut self, children: Vec<SidebarItem>) -> Self {
        self.children = children;
        self
    }

    pub fn with_sub_components(mut self, subs: &[&str]) -> Self {
        self.sub_components = subs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_item_with_path_and_component_becomes_route() {
        let raw = RawSidebarItem {
            id: "dashboard".into(),
            label: "Dashboard".into(),
            path: Some("/dashboard".into()),
            component: Some("pages/DashboardPage".into()),
            ..Default::default()
        };
        let item = SidebarItem::from(raw);
        assert_eq!(item.route(), Some(("/dashboard", "pages/DashboardPage")));
    }

    #[test]
    fn raw_item_missing_component_becomes_section() {
        let raw = RawSidebarItem {
            id: "trips".into(),
            label: "Trips".into(),
            path: Some("/trips".into()),
            children: vec![RawSidebarItem {
                id: "active".into(),
                label: "Active".into(),
                path: Some("/trips/active".into()),
                component: Some("pages/trips/ActiveTripsPage".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let item = SidebarItem::from(raw);
        assert_eq!(item.kind, NodeKind::Section { component: None });
        assert_eq!(item.children.len(), 1);
        assert!(item.children[0].route().is_some());
    }

    #[test]
    fn unique_ids_pass() {
        let config = SidebarConfig::new(vec![
            SidebarItem::section("invoices", "Invoices").with_children(vec![SidebarItem::routed(
                "invoice-dashboard",
                "Dashboard",
                "/invoices/dashboard",
                "pages/invoices/InvoiceDashboard",
            )]),
        ]);
        assert!(config.check_unique_ids().is_ok());
    }

    #[test]
    fn duplicate_id_in_nested_child_is_rejected() {
        let config = SidebarConfig::new(vec![
            SidebarItem::routed(
                "reports",
                "Trip Reports",
                "/trips/reports",
                "pages/trips/TripReportPage",
            ),
            SidebarItem::section("inventory", "Inventory").with_children(vec![SidebarItem::routed(
                "reports",
                "Inventory Reports",
                "/inventory/reports",
                "pages/inventory/InventoryReportsPage",
            )]),
        ]);
        match config.check_unique_ids() {
            Err(ToolError::DuplicateId { id, first, second }) => {
                assert_eq!(id, "reports");
                assert_eq!(first, "Trip Reports");
                assert_eq!(second, "Inventory Reports");
            }
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn json_serialization_tags_kind() {
        let item =
            SidebarItem::routed("dashboard", "Dashboard", "/dashboard", "pages/DashboardPage");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "route");
        assert_eq!(json["path"], "/dashboard");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn component_without_path_is_kept_but_not_routed() {
        let raw = RawSidebarItem {
            id: "tyres".into(),
            label: "Tyre Management".into(),
            component: Some("pages/tyres/TyreManagementPage".into()),
            ..Default::default()
        };
        let item = SidebarItem::from(raw);
        assert!(item.route().is_none());
        assert_eq!(item.component(), Some("pages/tyres/TyreManagementPage"));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "section");
        assert_eq!(json["component"], "pages/tyres/TyreManagementPage");
    }

    #[test]
    fn nodes_without_id_are_not_duplicates() {
        let config = SidebarConfig::from_raw(vec![
            RawSidebarItem { label: "Untitled".into(), ..Default::default() },
            RawSidebarItem { label: "Also untitled".into(), ..Default::default() },
        ]);
        assert!(config.check_unique_ids().is_ok());
    }
}
