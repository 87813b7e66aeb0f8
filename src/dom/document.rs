//! Document arena
//!
//! Nodes live in a flat map keyed by a never-reused `NodeId`. Replacing a
//! node's children deletes the old subtree from the map, including every
//! listener registered on it, so a handle kept across a re-render simply
//! stops resolving.

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{Element, Event, EventKind};
use crate::model::FileUpload;
use crate::task::Pending;

/// Handle to a node in a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Event listener. Returning a future schedules asynchronous follow-up work.
pub type Listener = Arc<dyn Fn(&Event) -> Option<BoxFuture<'static, ()>> + Send + Sync>;

/// Result of submitting a form
#[must_use]
pub enum SubmitOutcome {
    /// A required control was empty; no submit event was dispatched
    Blocked { missing: Vec<NodeId> },
    /// Submit event dispatched to listeners
    Submitted {
        pending: Pending,
        default_prevented: bool,
    },
}

struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    value: String,
    files: Vec<FileUpload>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<(EventKind, Listener)>,
}

struct Tree {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    body: NodeId,
}

impl Tree {
    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let id = self.alloc();
        let Element {
            tag,
            attributes,
            classes,
            text,
            value,
            files,
            children,
        } = element;

        self.nodes.insert(
            id,
            Node {
                tag,
                attributes,
                classes,
                text,
                value,
                files,
                parent,
                children: Vec::new(),
                listeners: Vec::new(),
            },
        );

        let child_ids: Vec<NodeId> = children
            .into_iter()
            .map(|child| self.insert(child, Some(id)))
            .collect();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = child_ids;
        }
        id
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        let children = match self.nodes.get_mut(&id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.remove_subtree(child);
        }
    }

    fn replace_children(&mut self, id: NodeId, markup: impl IntoIterator<Item = Element>) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        self.clear_children(id);
        let ids: Vec<NodeId> = markup
            .into_iter()
            .map(|el| self.insert(el, Some(id)))
            .collect();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children = ids;
        }
        true
    }

    /// Pre-order walk starting at `root`
    fn walk(&self, root: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(&root) {
            out.push(root);
            for child in &node.children {
                self.walk(*child, out);
            }
        }
    }

    fn find_all(&self, root: NodeId, pred: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.walk(root, &mut all);
        all.into_iter()
            .filter(|id| self.nodes.get(id).map(&pred).unwrap_or(false))
            .collect()
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.nodes.get(&id) {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            for child in &node.children {
                self.text_content(*child, out);
            }
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        out.push('<');
        out.push_str(&node.tag);
        for (name, value) in &node.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, value));
        }
        if !node.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", node.classes.join(" ")));
        }
        if !node.value.is_empty() {
            out.push_str(&format!(" value=\"{}\"", node.value));
        }
        out.push('>');
        if let Some(text) = &node.text {
            out.push_str(text);
        }
        for child in &node.children {
            self.write_html(*child, out);
        }
        out.push_str(&format!("</{}>", node.tag));
    }
}

/// Shared handle to a document. Clones refer to the same tree.
#[derive(Clone)]
pub struct Document {
    inner: Arc<Mutex<Tree>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.inner.lock().nodes.len())
            .finish()
    }
}

impl Document {
    /// Create a document containing only an empty `<body>`
    pub fn new() -> Self {
        let mut tree = Tree {
            nodes: HashMap::new(),
            next_id: 0,
            body: NodeId(0),
        };
        tree.body = tree.insert(Element::new("body"), None);
        Self {
            inner: Arc::new(Mutex::new(tree)),
        }
    }

    pub fn body(&self) -> NodeId {
        self.inner.lock().body
    }

    /// Attach markup as the last child of `parent`
    pub fn append_child(&self, parent: NodeId, markup: Element) -> Option<NodeId> {
        let mut tree = self.inner.lock();
        if !tree.nodes.contains_key(&parent) {
            return None;
        }
        let id = tree.insert(markup, Some(parent));
        if let Some(node) = tree.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        Some(id)
    }

    pub fn append_to_body(&self, markup: Element) -> NodeId {
        let mut tree = self.inner.lock();
        let body = tree.body;
        let id = tree.insert(markup, Some(body));
        if let Some(node) = tree.nodes.get_mut(&body) {
            node.children.push(id);
        }
        id
    }

    /// Replace all children of `node` with `markup`, the equivalent of
    /// assigning `innerHTML`. Returns false if `node` is detached.
    pub fn replace_children(&self, node: NodeId, markup: Element) -> bool {
        self.replace_children_with(node, std::iter::once(markup))
    }

    /// Replace all children of `node` with `markup` only if `condition`
    /// holds. The condition is checked under the document lock, so no other
    /// write lands between the check and the replacement.
    pub fn replace_children_if(
        &self,
        node: NodeId,
        markup: Element,
        condition: impl FnOnce() -> bool,
    ) -> bool {
        let mut tree = self.inner.lock();
        if !condition() {
            return false;
        }
        tree.replace_children(node, std::iter::once(markup))
    }

    /// Replace all children of `node` with several markup trees
    pub fn replace_children_with(
        &self,
        node: NodeId,
        markup: impl IntoIterator<Item = Element>,
    ) -> bool {
        self.inner.lock().replace_children(node, markup)
    }

    /// Replace children of `node` with plain text
    pub fn set_text(&self, node: NodeId, text: impl Into<String>) -> bool {
        let mut tree = self.inner.lock();
        if !tree.nodes.contains_key(&node) {
            return false;
        }
        tree.clear_children(node);
        if let Some(n) = tree.nodes.get_mut(&node) {
            n.text = Some(text.into());
        }
        true
    }

    /// Whether the node is still part of the document
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.inner.lock().nodes.contains_key(&node)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_first_attr("id", id)
    }

    pub fn get_by_test_id(&self, test_id: &str) -> Option<NodeId> {
        self.find_first_attr("data-testid", test_id)
    }

    pub fn get_all_by_test_id(&self, test_id: &str) -> Vec<NodeId> {
        let tree = self.inner.lock();
        let body = tree.body;
        tree.find_all(body, |n| {
            n.attributes.get("data-testid").map(String::as_str) == Some(test_id)
        })
    }

    /// Descendants of `root` (inclusive) carrying a class
    pub fn get_all_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.inner
            .lock()
            .find_all(root, |n| n.classes.iter().any(|c| c == class))
    }

    /// First descendant of `root` (inclusive) with a test id
    pub fn query_within(&self, root: NodeId, test_id: &str) -> Option<NodeId> {
        self.query_all_within(root, test_id).into_iter().next()
    }

    /// Descendants of `root` (inclusive) with a test id, in document order
    pub fn query_all_within(&self, root: NodeId, test_id: &str) -> Vec<NodeId> {
        self.inner.lock().find_all(root, |n| {
            n.attributes.get("data-testid").map(String::as_str) == Some(test_id)
        })
    }

    fn find_first_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        let tree = self.inner.lock();
        let body = tree.body;
        tree.find_all(body, |n| n.attributes.get(name).map(String::as_str) == Some(value))
            .into_iter()
            .next()
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.inner.lock().nodes.get(&node).map(|n| n.tag.clone())
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.inner.lock().text_content(node, &mut out);
        out
    }

    /// Whether any text in the document contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        let tree = self.inner.lock();
        let body = tree.body;
        !tree
            .find_all(body, |n| {
                n.text.as_deref().map(|t| t.contains(needle)).unwrap_or(false)
            })
            .is_empty()
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .lock()
            .nodes
            .get(&node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: impl Into<String>) -> bool {
        match self.inner.lock().nodes.get_mut(&node) {
            Some(n) => {
                n.attributes.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn value(&self, node: NodeId) -> Option<String> {
        self.inner.lock().nodes.get(&node).map(|n| n.value.clone())
    }

    /// Set a control's value. Clearing a file input also clears its files.
    pub fn set_value(&self, node: NodeId, value: impl Into<String>) -> bool {
        match self.inner.lock().nodes.get_mut(&node) {
            Some(n) => {
                n.value = value.into();
                if n.value.is_empty() {
                    n.files.clear();
                }
                true
            }
            None => false,
        }
    }

    pub fn files(&self, node: NodeId) -> Vec<FileUpload> {
        self.inner
            .lock()
            .nodes
            .get(&node)
            .map(|n| n.files.clone())
            .unwrap_or_default()
    }

    /// Select files on a file input. The value becomes a fake path ending
    /// in the first file's name, as browsers report it.
    pub fn set_files(&self, node: NodeId, files: Vec<FileUpload>) -> bool {
        match self.inner.lock().nodes.get_mut(&node) {
            Some(n) => {
                n.value = files
                    .first()
                    .map(|f| format!("C:\\fakepath\\{}", f.name))
                    .unwrap_or_default();
                n.files = files;
                true
            }
            None => false,
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.inner
            .lock()
            .nodes
            .get(&node)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.inner.lock().nodes.get_mut(&node) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.inner.lock().nodes.get_mut(&node) {
            n.classes.retain(|c| c != class);
        }
    }

    pub fn add_event_listener(&self, node: NodeId, kind: EventKind, listener: Listener) -> bool {
        match self.inner.lock().nodes.get_mut(&node) {
            Some(n) => {
                n.listeners.push((kind, listener));
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.inner
            .lock()
            .nodes
            .get(&node)
            .map(|n| n.listeners.iter().filter(|(k, _)| *k == kind).count())
            .unwrap_or(0)
    }

    /// Dispatch an event on `target`, bubbling through its ancestors.
    ///
    /// Listeners run after the document lock is released, so they are free
    /// to query and mutate the document.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Pending {
        self.dispatch_event(Event::new(kind, target))
    }

    fn dispatch_event(&self, event: Event) -> Pending {
        let listeners: Vec<Listener> = {
            let tree = self.inner.lock();
            let mut chain = Vec::new();
            let mut cursor = Some(event.target);
            while let Some(id) = cursor {
                let Some(node) = tree.nodes.get(&id) else {
                    break;
                };
                chain.extend(
                    node.listeners
                        .iter()
                        .filter(|(k, _)| *k == event.kind)
                        .map(|(_, l)| l.clone()),
                );
                cursor = node.parent;
            }
            chain
        };

        let mut pending = Pending::none();
        for listener in listeners {
            if let Some(future) = listener(&event) {
                pending.push(future);
            }
        }
        pending
    }

    /// Submit a form the way a browser does: controls marked `required` must
    /// be non-empty, otherwise no submit event fires.
    pub fn submit(&self, form: NodeId) -> SubmitOutcome {
        let missing = {
            let tree = self.inner.lock();
            tree.find_all(form, |n| {
                n.attributes.contains_key("required") && n.value.trim().is_empty()
            })
        };

        if !missing.is_empty() {
            tracing::debug!(missing = missing.len(), "Form submission blocked by required fields");
            return SubmitOutcome::Blocked { missing };
        }

        let event = Event::new(EventKind::Submit, form);
        let pending = self.dispatch_event(event.clone());
        SubmitOutcome::Submitted {
            pending,
            default_prevented: event.default_prevented(),
        }
    }

    /// Serialize the body as HTML-like text, for debugging and the CLI
    pub fn to_html(&self) -> String {
        let tree = self.inner.lock();
        let mut out = String::new();
        tree.write_html(tree.body, &mut out);
        out
    }

    /// Number of nodes currently in the document
    pub fn node_count(&self) -> usize {
        self.inner.lock().nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(counter: Arc<AtomicUsize>) -> Listener {
        Arc::new(move |_event: &Event| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        })
    }

    #[test]
    fn test_queries() {
        let doc = Document::new();
        doc.append_to_body(
            Element::new("div").id("root").child(
                Element::new("h1")
                    .test_id("title")
                    .text("Mes notes de frais"),
            ),
        );

        let root = doc.get_element_by_id("root").unwrap();
        let title = doc.get_by_test_id("title").unwrap();
        assert_eq!(doc.text_content(root), "Mes notes de frais");
        assert_eq!(doc.tag_name(title).as_deref(), Some("h1"));
        assert!(doc.contains_text("notes de frais"));
    }

    #[test]
    fn test_replace_children_detaches_old_nodes_and_listeners() {
        let doc = Document::new();
        let root = doc.append_to_body(Element::new("div").id("root"));
        doc.replace_children(root, Element::new("button").test_id("btn"));

        let old = doc.get_by_test_id("btn").unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        doc.add_event_listener(old, EventKind::Click, counting_listener(counter.clone()));

        doc.replace_children(root, Element::new("button").test_id("btn"));
        let new = doc.get_by_test_id("btn").unwrap();

        assert_ne!(old, new);
        assert!(!doc.is_attached(old));
        assert_eq!(doc.listener_count(new, EventKind::Click), 0);
        let _ = doc.dispatch(old, EventKind::Click);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(doc.get_all_by_test_id("btn").len(), 1);
    }

    #[test]
    fn test_replace_children_if() {
        let doc = Document::new();
        let root = doc.append_to_body(Element::new("div").id("root"));
        doc.replace_children(root, Element::new("p").text("kept"));

        assert!(!doc.replace_children_if(root, Element::new("p").text("refused"), || false));
        assert!(doc.contains_text("kept"));
        assert!(!doc.contains_text("refused"));

        // The condition runs while the tree is locked
        let inner = doc.clone();
        let written = doc.replace_children_if(root, Element::new("p").text("written"), || {
            inner.inner.try_lock().is_none()
        });
        assert!(written);
        assert!(doc.contains_text("written"));
        assert!(!doc.contains_text("kept"));
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let doc = Document::new();
        let outer = doc.append_to_body(
            Element::new("div")
                .test_id("outer")
                .child(Element::new("span").test_id("inner")),
        );
        let inner = doc.get_by_test_id("inner").unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        doc.add_event_listener(outer, EventKind::Click, counting_listener(counter.clone()));
        doc.add_event_listener(inner, EventKind::Click, counting_listener(counter.clone()));
        doc.add_event_listener(inner, EventKind::Change, counting_listener(counter.clone()));

        let _ = doc.dispatch(inner, EventKind::Click);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_submit_blocked_by_required_fields() {
        let doc = Document::new();
        let form = doc.append_to_body(
            Element::new("form")
                .child(Element::new("input").test_id("name").required())
                .child(Element::new("input").test_id("optional")),
        );
        let counter = Arc::new(AtomicUsize::new(0));
        doc.add_event_listener(form, EventKind::Submit, counting_listener(counter.clone()));

        match doc.submit(form) {
            SubmitOutcome::Blocked { missing } => {
                assert_eq!(missing, vec![doc.get_by_test_id("name").unwrap()]);
            }
            SubmitOutcome::Submitted { .. } => panic!("expected blocked submission"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        doc.set_value(doc.get_by_test_id("name").unwrap(), "filled");
        assert!(matches!(doc.submit(form), SubmitOutcome::Submitted { .. }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_submit_reports_default_prevented() {
        let doc = Document::new();
        let form = doc.append_to_body(Element::new("form"));
        doc.add_event_listener(
            form,
            EventKind::Submit,
            Arc::new(|event: &Event| {
                event.prevent_default();
                None
            }),
        );

        match doc.submit(form) {
            SubmitOutcome::Submitted {
                default_prevented, ..
            } => assert!(default_prevented),
            SubmitOutcome::Blocked { .. } => panic!("form has no required fields"),
        }
    }

    #[test]
    fn test_files_and_value() {
        let doc = Document::new();
        let input = doc.append_to_body(Element::new("input").attr("type", "file"));
        doc.set_files(input, vec![FileUpload::new("file.png", "image/png", b"png".to_vec())]);

        assert_eq!(doc.value(input).as_deref(), Some("C:\\fakepath\\file.png"));
        assert_eq!(doc.files(input).len(), 1);

        doc.set_value(input, "");
        assert!(doc.files(input).is_empty());
    }

    #[test]
    fn test_classes() {
        let doc = Document::new();
        let node = doc.append_to_body(Element::new("div").class("icon"));
        doc.add_class(node, "active-icon");
        doc.add_class(node, "active-icon");
        assert!(doc.has_class(node, "active-icon"));
        assert_eq!(doc.get_all_by_class(doc.body(), "active-icon"), vec![node]);

        doc.remove_class(node, "active-icon");
        assert!(!doc.has_class(node, "active-icon"));
    }

    #[test]
    fn test_to_html() {
        let doc = Document::new();
        doc.append_to_body(Element::new("p").id("x").class("a").text("hi"));
        assert_eq!(doc.to_html(), "<body><p id=\"x\" class=\"a\">hi</p></body>");
    }
}
