// src/flatten.rs
use crate::model::{RouteEntry, SidebarItem};

/// ツリーを前順 (親 → 子、兄弟は記述順) でたどり、各ノードと深さを `visit` に渡す
pub fn walk_preorder<'a, F>(items: &'a [SidebarItem], visit: &mut F)
where
    F: FnMut(&'a SidebarItem, usize),
{
    fn walk<'a, F>(items: &'a [SidebarItem], depth: usize, visit: &mut F)
    where
        F: FnMut(&'a SidebarItem, usize),
    {
        for item in items {
            visit(item, depth);
            walk(&item.children, depth + 1, visit);
        }
    }

    walk(items, 0, visit);
}

/// ルーティング可能ノードだけを前順で並べたリストを返す
///
/// path / component のどちらかが欠けたノードはエラーにせず単に除外する。
pub fn flatten_routes(items: &[SidebarItem]) -> Vec<RouteEntry> {
    let mut routes = Vec::new();
    walk_preorder(items, &mut |item, depth| {
        if let Some((path, component)) = item.route() {
            tracing::debug!(id = %item.id, %path, "routable node");
            routes.push(RouteEntry {
                id: item.id.clone(),
                label: item.label.clone(),
                path: path.to_string(),
                component: component.to_string(),
                roles: item.roles.clone(),
                depth,
            });
        }
    });
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet_tree() -> Vec<SidebarItem> {
        let fleet_location = SidebarItem::routed(
            "fleet-location",
            "Fleet Location",
            "/trips/fleet-location",
            "pages/trips/FleetLocationMapPage",
        );
        let maps = SidebarItem::routed(
            "maps-tracking",
            "Maps & Tracking",
            "/trips/maps",
            "pages/trips/Maps",
        )
        .with_children(vec![fleet_location]);
        let active = SidebarItem::routed(
            "active-trips",
            "Active Trips",
            "/trips/active",
            "pages/trips/ActiveTripsPage",
        );
        let trips = SidebarItem::routed(
            "trip-management",
            "Trip Management",
            "/trips",
            "pages/trips/TripManagementPage",
        )
        .with_children(vec![active, maps, SidebarItem::section("trip-tools", "Trip Tools")]);

        vec![
            SidebarItem::routed("dashboard", "Dashboard", "/dashboard", "pages/DashboardPage"),
            trips,
            SidebarItem::section("invoices", "Invoices").with_children(vec![SidebarItem::routed(
                "invoice-dashboard",
                "Invoice Dashboard",
                "/invoices/dashboard",
                "pages/invoices/InvoiceDashboard",
            )]),
        ]
    }

    #[test]
    fn flatten_returns_routable_nodes_in_preorder() {
        let ids: Vec<String> = flatten_routes(&fleet_tree()).into_iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                "dashboard",
                "trip-management",
                "active-trips",
                "maps-tracking",
                "fleet-location",
                "invoice-dashboard",
            ]
        );
    }

    #[test]
    fn section_without_route_is_skipped_but_children_kept() {
        let routes = flatten_routes(&fleet_tree());
        assert!(routes.iter().all(|r| r.id != "invoices" && r.id != "trip-tools"));
        let invoice = routes.iter().find(|r| r.id == "invoice-dashboard").unwrap();
        assert_eq!(invoice.depth, 1);
        assert_eq!(invoice.component, "pages/invoices/InvoiceDashboard");
    }

    #[test]
    fn flatten_matches_preorder_routable_set() {
        let tree = fleet_tree();
        let mut expected = Vec::new();
        walk_preorder(&tree, &mut |item, _| {
            if item.route().is_some() {
                expected.push(item.id.clone());
            }
        });
        let actual: Vec<String> = flatten_routes(&tree).into_iter().map(|r| r.id).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_tree_flattens_to_nothing() {
        assert!(flatten_routes(&[]).is_empty());
    }

    #[test]
    fn walk_reports_depth() {
        let mut depths = Vec::new();
        walk_preorder(&fleet_tree(), &mut |item, depth| depths.push((item.id.clone(), depth)));
        assert!(depths.contains(&("fleet-location".to_string(), 2)));
        assert!(depths.contains(&("dashboard".to_string(), 0)));
    }
}
