//! Hash Router
//!
//! Resolves logical paths to routes and drives the render → attach cycle:
//!
//! ```text
//! navigate(path)
//!   → bump generation (previous mount goes stale)
//!   → resolve path ── unknown ──→ render not-found page
//!   → render(RouteData::default()) into #root, apply active icon
//!   → snapshot session, build container, activate it
//! ```
//!
//! The router owns the mounted container. Containers receive an
//! `OnNavigate` callback holding only a weak reference back to the router.

pub mod error;
pub mod mount;
pub mod routes;

pub use error::{RouterError, RouterResult};
pub use mount::{Mount, MountGuard};
pub use routes::{Resolved, Route, RouteKey, RouteTable};

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::containers::{Container, ContainerDeps};
use crate::dom::{Document, NodeId};
use crate::session::SessionProvider;
use crate::store::RemoteStore;
use crate::task::Pending;
use crate::views::{not_found_page, RouteData};

/// Navigation entry point handed to containers
pub type OnNavigate = Arc<dyn Fn(&str) -> Pending + Send + Sync>;

/// Id of the element the router renders into
pub const ROOT_ID: &str = "root";

/// What the router currently has mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteState {
    /// Before the first navigation
    Idle,
    Mounted(RouteKey),
    /// Fallback page for an unknown path
    NotFound(String),
}

struct Mounted {
    state: RouteState,
    container: Option<Arc<dyn Container>>,
}

struct RouterInner {
    document: Document,
    root: NodeId,
    table: RouteTable,
    icons: Vec<&'static str>,
    store: Option<Arc<dyn RemoteStore>>,
    session: Arc<dyn SessionProvider>,
    generation: Arc<AtomicU64>,
    mounted: Mutex<Mounted>,
    history: Mutex<Vec<String>>,
}

/// Client-side router
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    /// Router over the standard route table, rendering into `#root`
    pub fn new(
        document: Document,
        store: Option<Arc<dyn RemoteStore>>,
        session: Arc<dyn SessionProvider>,
    ) -> RouterResult<Self> {
        Self::with_table(document, ROOT_ID, RouteTable::standard(), store, session)
    }

    pub fn with_table(
        document: Document,
        root_id: &str,
        table: RouteTable,
        store: Option<Arc<dyn RemoteStore>>,
        session: Arc<dyn SessionProvider>,
    ) -> RouterResult<Self> {
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| RouterError::RootMissing(root_id.to_string()))?;
        let icons = table.icon_ids();

        tracing::debug!(routes = table.len(), store = store.is_some(), "Router created");

        Ok(Self {
            inner: Arc::new(RouterInner {
                document,
                root,
                table,
                icons,
                store,
                session,
                generation: Arc::new(AtomicU64::new(0)),
                mounted: Mutex::new(Mounted {
                    state: RouteState::Idle,
                    container: None,
                }),
                history: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Render the page for `path` and activate its container.
    ///
    /// Always fully re-renders, even for the current path. The returned
    /// continuations are the container's asynchronous activation work.
    pub fn navigate(&self, path: &str) -> Pending {
        navigate(&self.inner, path)
    }

    /// Callback containers use to navigate
    pub fn navigator(&self) -> OnNavigate {
        navigator(&self.inner)
    }

    /// Path of the landing page for the current session, login if nobody is
    /// logged in
    pub fn landing_path(&self) -> &'static str {
        match self.inner.session.current() {
            Some(session) => RouteKey::landing_for(session.user_type).path(),
            None => RouteKey::Login.path(),
        }
    }

    pub fn state(&self) -> RouteState {
        self.inner.mounted.lock().state.clone()
    }

    /// Paths navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.inner.history.lock().clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    pub fn root(&self) -> NodeId {
        self.inner.root
    }
}

fn navigator(inner: &Arc<RouterInner>) -> OnNavigate {
    let weak: Weak<RouterInner> = Arc::downgrade(inner);
    Arc::new(move |path: &str| match weak.upgrade() {
        Some(inner) => navigate(&inner, path),
        None => {
            tracing::warn!(path, "Navigation requested after router was dropped");
            Pending::none()
        }
    })
}

fn navigate(inner: &Arc<RouterInner>, path: &str) -> Pending {
    let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
    let guard = MountGuard::new(generation, inner.generation.clone());
    inner.history.lock().push(path.to_string());

    let route = match inner.table.resolve(path) {
        Resolved::Found(route) => route,
        Resolved::NotFound => {
            tracing::warn!(path, "No route for path, rendering not-found page");
            inner
                .document
                .replace_children(inner.root, not_found_page(path));
            let previous = {
                let mut mounted = inner.mounted.lock();
                mounted.state = RouteState::NotFound(path.to_string());
                mounted.container.take()
            };
            drop(previous);
            return Pending::none();
        }
    };

    let mount = Mount::new(
        inner.document.clone(),
        inner.root,
        Some(route.key),
        route.icon,
        inner.icons.clone(),
        guard,
    );
    mount.render((route.render)(&RouteData::default()));

    let container = route.container.map(|factory| {
        factory(ContainerDeps {
            document: inner.document.clone(),
            on_navigate: navigator(inner),
            store: inner.store.clone(),
            session: inner.session.current(),
            mount: mount.clone(),
        })
    });

    // Swap under the lock, drop the previous container outside it
    let previous = {
        let mut mounted = inner.mounted.lock();
        mounted.state = RouteState::Mounted(route.key);
        std::mem::replace(&mut mounted.container, container.clone())
    };
    drop(previous);

    tracing::info!(path, route = ?route.key, generation, "Navigated");

    match container.and_then(|c| c.activate()) {
        Some(activation) => Pending::spawn(activation),
        None => Pending::none(),
    }
}
