//! Mounted view
//!
//! Every navigation bumps a generation counter. A `Mount` remembers the
//! generation it was created for; once the router has moved on, its writes
//! are refused so a late asynchronous result cannot overwrite the new page.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::RouteKey;
use crate::dom::{Document, Element, NodeId};
use crate::views::ACTIVE_ICON_CLASS;

/// Ties a mount to the navigation that created it
#[derive(Debug, Clone)]
pub struct MountGuard {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl MountGuard {
    pub fn new(generation: u64, current: Arc<AtomicU64>) -> Self {
        Self {
            generation,
            current,
        }
    }

    /// A guard with its own counter, never invalidated
    pub fn standalone() -> Self {
        Self::new(0, Arc::new(AtomicU64::new(0)))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no navigation happened since this guard was issued
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// The DOM subtree a container owns for one navigation
#[derive(Debug, Clone)]
pub struct Mount {
    document: Document,
    root: NodeId,
    route: Option<RouteKey>,
    active_icon: Option<&'static str>,
    icons: Arc<[&'static str]>,
    guard: MountGuard,
}

impl Mount {
    pub fn new(
        document: Document,
        root: NodeId,
        route: Option<RouteKey>,
        active_icon: Option<&'static str>,
        icons: Vec<&'static str>,
        guard: MountGuard,
    ) -> Self {
        Self {
            document,
            root,
            route,
            active_icon,
            icons: icons.into(),
            guard,
        }
    }

    /// Mount over `root` outside of any router, for hosts and tests that
    /// drive a container directly
    pub fn standalone(document: Document, root: NodeId) -> Self {
        Self::new(document, root, None, None, Vec::new(), MountGuard::standalone())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn route(&self) -> Option<RouteKey> {
        self.route
    }

    pub fn guard(&self) -> &MountGuard {
        &self.guard
    }

    pub fn is_current(&self) -> bool {
        self.guard.is_current()
    }

    /// Replace the root's contents and re-apply the active icon.
    /// Returns false, writing nothing, when the mount is stale.
    pub fn render(&self, markup: Element) -> bool {
        let guard = &self.guard;
        if self
            .document
            .replace_children_if(self.root, markup, || guard.is_current())
        {
            self.apply_icons();
            return true;
        }
        if guard.is_current() {
            tracing::warn!(route = ?self.route, "Mount root is detached");
        } else {
            tracing::debug!(
                route = ?self.route,
                generation = guard.generation(),
                "Skipping render into stale mount"
            );
        }
        false
    }

    /// Mark the route's icon active and clear every other managed icon
    pub fn apply_icons(&self) {
        for icon in self.icons.iter() {
            let Some(node) = self.document.get_element_by_id(icon) else {
                continue;
            };
            if Some(*icon) == self.active_icon {
                self.document.add_class(node, ACTIVE_ICON_CLASS);
            } else {
                self.document.remove_class(node, ACTIVE_ICON_CLASS);
            }
        }
    }

    /// First element under the root with the given test id
    pub fn find(&self, test_id: &str) -> Option<NodeId> {
        self.document.query_within(self.root, test_id)
    }

    /// Every element under the root with the given test id
    pub fn find_all(&self, test_id: &str) -> Vec<NodeId> {
        self.document.query_all_within(self.root, test_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{ICON_MAIL_ID, ICON_WINDOW_ID};

    #[test]
    fn test_guard_invalidated_by_new_generation() {
        let counter = Arc::new(AtomicU64::new(1));
        let guard = MountGuard::new(1, counter.clone());
        assert!(guard.is_current());

        counter.fetch_add(1, Ordering::SeqCst);
        assert!(!guard.is_current());
    }

    #[test]
    fn test_stale_mount_does_not_render() {
        let doc = Document::new();
        let root = doc.append_to_body(Element::new("div").id("root"));
        let counter = Arc::new(AtomicU64::new(3));
        let mount = Mount::new(
            doc.clone(),
            root,
            Some(RouteKey::Bills),
            None,
            Vec::new(),
            MountGuard::new(2, counter),
        );

        assert!(!mount.render(Element::new("p").text("late")));
        assert!(!doc.contains_text("late"));
    }

    #[test]
    fn test_render_after_generation_bump() {
        let doc = Document::new();
        let root = doc.append_to_body(Element::new("div").id("root"));
        let counter = Arc::new(AtomicU64::new(1));
        let mount = Mount::new(
            doc.clone(),
            root,
            Some(RouteKey::Bills),
            None,
            Vec::new(),
            MountGuard::new(1, counter.clone()),
        );

        // A navigation that has bumped the generation but not yet rendered
        counter.fetch_add(1, Ordering::SeqCst);
        assert!(!mount.render(Element::new("p").text("late")));
        assert!(!doc.contains_text("late"));

        let fresh = Mount::new(
            doc.clone(),
            root,
            Some(RouteKey::Bills),
            None,
            Vec::new(),
            MountGuard::new(2, counter),
        );
        assert!(fresh.render(Element::new("p").text("fresh")));
        assert!(doc.contains_text("fresh"));
    }

    #[test]
    fn test_render_applies_icons() {
        let doc = Document::new();
        let root = doc.append_to_body(Element::new("div").id("root"));
        let mount = Mount::new(
            doc.clone(),
            root,
            Some(RouteKey::NewBill),
            Some(ICON_MAIL_ID),
            vec![ICON_WINDOW_ID, ICON_MAIL_ID],
            MountGuard::standalone(),
        );

        assert!(mount.render(crate::views::vertical_layout(true)));
        let window = doc.get_element_by_id(ICON_WINDOW_ID).unwrap();
        let mail = doc.get_element_by_id(ICON_MAIL_ID).unwrap();
        assert!(doc.has_class(mail, ACTIVE_ICON_CLASS));
        assert!(!doc.has_class(window, ACTIVE_ICON_CLASS));
    }
}
