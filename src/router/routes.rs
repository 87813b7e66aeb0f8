//! Route table
//!
//! Maps logical route keys to their template, optional container factory and
//! the sidebar icon they activate. Lookup falls back to `Resolved::NotFound`.

use std::collections::HashMap;

use crate::containers::{BillsList, ContainerFactory, Dashboard, NewBillForm};
use crate::model::UserType;
use crate::views::{self, Template, ICON_MAIL_ID, ICON_WINDOW_ID};

/// Logical navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKey {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl RouteKey {
    pub fn all() -> &'static [RouteKey] {
        &[
            RouteKey::Login,
            RouteKey::Bills,
            RouteKey::NewBill,
            RouteKey::Dashboard,
        ]
    }

    /// Canonical path
    pub fn path(&self) -> &'static str {
        match self {
            RouteKey::Login => "/",
            RouteKey::Bills => "#employee/bills",
            RouteKey::NewBill => "#employee/bill/new",
            RouteKey::Dashboard => "#admin/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::all().iter().copied().find(|key| key.path() == path)
    }

    /// Landing page for a role
    pub fn landing_for(user_type: UserType) -> Self {
        match user_type {
            UserType::Employee => RouteKey::Bills,
            UserType::Admin => RouteKey::Dashboard,
        }
    }
}

impl std::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// A navigable page
#[derive(Clone)]
pub struct Route {
    pub key: RouteKey,
    pub render: Template,
    pub container: Option<ContainerFactory>,
    /// Element id of the sidebar icon marked active on this page
    pub icon: Option<&'static str>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("key", &self.key)
            .field("container", &self.container.is_some())
            .field("icon", &self.icon)
            .finish()
    }
}

/// Outcome of resolving a path
#[derive(Debug)]
pub enum Resolved<'a> {
    Found(&'a Route),
    NotFound,
}

/// Route lookup table
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<RouteKey, Route>,
}

impl RouteTable {
    /// Empty table; every path resolves to `NotFound`
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes of the expense-report application
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert(Route {
            key: RouteKey::Login,
            render: views::login_ui,
            container: None,
            icon: None,
        });
        table.insert(Route {
            key: RouteKey::Bills,
            render: views::bills_ui,
            container: Some(BillsList::factory),
            icon: Some(ICON_WINDOW_ID),
        });
        table.insert(Route {
            key: RouteKey::NewBill,
            render: views::new_bill_ui,
            container: Some(NewBillForm::factory),
            icon: Some(ICON_MAIL_ID),
        });
        table.insert(Route {
            key: RouteKey::Dashboard,
            render: views::dashboard_ui,
            container: Some(Dashboard::factory),
            icon: None,
        });
        table
    }

    /// Add or replace the route for `route.key`
    pub fn insert(&mut self, route: Route) {
        self.routes.insert(route.key, route);
    }

    pub fn get(&self, key: RouteKey) -> Option<&Route> {
        self.routes.get(&key)
    }

    pub fn resolve(&self, path: &str) -> Resolved<'_> {
        match RouteKey::from_path(path).and_then(|key| self.routes.get(&key)) {
            Some(route) => Resolved::Found(route),
            None => Resolved::NotFound,
        }
    }

    /// Every sidebar icon managed by this table
    pub fn icon_ids(&self) -> Vec<&'static str> {
        let mut icons: Vec<&'static str> = self.routes.values().filter_map(|r| r.icon).collect();
        icons.sort_unstable();
        icons.dedup();
        icons
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_roundtrip() {
        for key in RouteKey::all() {
            assert_eq!(RouteKey::from_path(key.path()), Some(*key));
        }
        assert_eq!(RouteKey::from_path("#employee/unknown"), None);
    }

    #[test]
    fn test_standard_table() {
        let table = RouteTable::standard();
        assert_eq!(table.len(), 4);
        assert!(matches!(table.resolve("#employee/bills"), Resolved::Found(r) if r.key == RouteKey::Bills));
        assert!(matches!(table.resolve("#nowhere"), Resolved::NotFound));
        assert_eq!(table.icon_ids(), vec![ICON_WINDOW_ID, ICON_MAIL_ID]);
    }

    #[test]
    fn test_empty_table_resolves_nothing() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        assert!(matches!(table.resolve("/"), Resolved::NotFound));
    }

    #[test]
    fn test_landing_pages() {
        assert_eq!(RouteKey::landing_for(UserType::Employee), RouteKey::Bills);
        assert_eq!(RouteKey::landing_for(UserType::Admin), RouteKey::Dashboard);
    }
}
