//! Administrator dashboard
//!
//! Lists every employee's bills grouped by status. Clicking a card opens its
//! detail; a pending bill can then be accepted or refused with a comment.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::bills::fetch_display_bills;
use super::{settle, show_receipt, Container, ContainerDeps, ContainerError};
use crate::dom::{Event, EventKind, NodeId};
use crate::format::DisplayBill;
use crate::model::{Bill, BillStatus};
use crate::router::RouteKey;
use crate::views::{dashboard_ui, RouteData};

#[derive(Default)]
struct DashboardState {
    bills: Option<Vec<DisplayBill>>,
    selected: Option<String>,
}

/// Controller for the admin dashboard
pub struct Dashboard {
    deps: ContainerDeps,
    state: Mutex<DashboardState>,
}

impl Dashboard {
    pub fn new(deps: ContainerDeps) -> Arc<Self> {
        Arc::new(Self {
            deps,
            state: Mutex::new(DashboardState::default()),
        })
    }

    pub fn factory(deps: ContainerDeps) -> Arc<dyn Container> {
        Self::new(deps)
    }

    /// Bill whose detail is open
    pub fn selected(&self) -> Option<Bill> {
        let state = self.state.lock();
        let id = state.selected.as_ref()?;
        state
            .bills
            .as_ref()?
            .iter()
            .find(|d| &d.bill.id == id)
            .map(|d| d.bill.clone())
    }

    /// Open a bill's detail, or close it when it is already open
    pub fn handle_select(self: &Arc<Self>, bill_id: &str) -> bool {
        {
            let mut state = self.state.lock();
            if state.selected.as_deref() == Some(bill_id) {
                state.selected = None;
            } else {
                state.selected = Some(bill_id.to_string());
            }
        }
        self.render()
    }

    /// Accept or refuse the open bill with the admin comment, then reload
    /// the dashboard. A failed update stays on the page with its message.
    pub fn handle_decision(self: &Arc<Self>, status: BillStatus) -> Option<BoxFuture<'static, ()>> {
        let Some(bill) = self.selected() else {
            tracing::warn!(?status, "No bill selected for decision");
            return None;
        };

        let comment = self
            .deps
            .mount
            .find("commentary2")
            .and_then(|node| self.deps.document.value(node))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let id = bill.id.clone();
        let updated = Bill {
            status,
            comment_admin: comment,
            ..bill
        };

        let Some(store) = self.deps.store.clone() else {
            return settle((self.deps.on_navigate)(RouteKey::Dashboard.path()));
        };

        let this = Arc::clone(self);
        Some(
            async move {
                match store.bills().update(&id, updated).await {
                    Ok(_) => {
                        tracing::info!(bill_id = %id, status = %status, "Bill reviewed");
                        (this.deps.on_navigate)(RouteKey::Dashboard.path())
                            .settled()
                            .await;
                    }
                    Err(e) => {
                        tracing::error!(bill_id = %id, error = %e, "Failed to update bill");
                        this.show_error(&ContainerError::Update(e).to_string());
                    }
                }
            }
            .boxed(),
        )
    }

    pub fn handle_click_icon_eye(&self, icon: NodeId) -> bool {
        show_receipt(&self.deps.document, icon, "modaleFileAdmin")
    }

    async fn load(self: Arc<Self>) {
        let result = match &self.deps.store {
            Some(store) => fetch_display_bills(store.as_ref()).await,
            None => Ok(Vec::new()),
        };

        match result {
            Ok(bills) => {
                self.state.lock().bills = Some(bills);
                self.render();
            }
            Err(e) => {
                self.deps.mount.render(dashboard_ui(&RouteData::with_error(e.to_string())));
            }
        }
    }

    fn render(self: &Arc<Self>) -> bool {
        let bills = self.state.lock().bills.clone();
        let data = RouteData {
            bills,
            error: None,
            selected: self.selected(),
        };
        if !self.deps.mount.render(dashboard_ui(&data)) {
            return false;
        }
        self.attach();
        true
    }

    fn show_error(&self, message: &str) {
        if !self.deps.mount.is_current() {
            return;
        }
        if let Some(slot) = self.deps.mount.find("dashboard-errorMessage") {
            self.deps.document.set_text(slot, message);
        }
    }

    fn attach(self: &Arc<Self>) {
        let document = &self.deps.document;
        let mount = &self.deps.mount;

        for card in document.get_all_by_class(mount.root(), "bill-card") {
            let Some(bill_id) = document.attribute(card, "data-bill-id") else {
                continue;
            };
            let weak = Arc::downgrade(self);
            document.add_event_listener(
                card,
                EventKind::Click,
                Arc::new(move |_event: &Event| {
                    Weak::upgrade(&weak)?.handle_select(&bill_id);
                    None
                }),
            );
        }

        for (test_id, status) in [
            ("btn-accept-bill", BillStatus::Accepted),
            ("btn-refuse-bill", BillStatus::Refused),
        ] {
            let Some(button) = mount.find(test_id) else {
                continue;
            };
            let weak = Arc::downgrade(self);
            document.add_event_listener(
                button,
                EventKind::Click,
                Arc::new(move |_event: &Event| Weak::upgrade(&weak)?.handle_decision(status)),
            );
        }

        if let Some(icon) = mount.find("icon-eye-d") {
            let weak = Arc::downgrade(self);
            document.add_event_listener(
                icon,
                EventKind::Click,
                Arc::new(move |event: &Event| {
                    Weak::upgrade(&weak)?.handle_click_icon_eye(event.target);
                    None
                }),
            );
        }
    }
}

impl Container for Dashboard {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn activate(self: Arc<Self>) -> Option<BoxFuture<'static, ()>> {
        Some(self.load().boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::testing::{harness, Harness};
    use crate::model::Session;
    use crate::store::{MemoryStore, Operation, RemoteStore};

    const PENDING_ID: &str = "47qAXb6fIm2zOKkLzMro";

    async fn loaded(store: Option<Arc<MemoryStore>>) -> (Harness, Arc<Dashboard>) {
        let h = harness(
            dashboard_ui,
            &RouteData::default(),
            store.map(|s| s as Arc<dyn RemoteStore>),
            Some(Session::admin("admin@test.tld")),
        );
        let dashboard = Dashboard::new(h.deps.clone());
        dashboard.clone().activate().unwrap().await;
        (h, dashboard)
    }

    fn open(h: &Harness, id: &str) {
        let card = h.document.get_by_test_id(&format!("open-bill{}", id)).unwrap();
        let _ = h.document.dispatch(card, EventKind::Click);
    }

    fn cards_in(h: &Harness, status: BillStatus) -> usize {
        let container = h
            .document
            .get_by_test_id(&format!("status-bills-container-{}", status))
            .unwrap();
        h.document.get_all_by_class(container, "bill-card").len()
    }

    #[tokio::test]
    async fn test_bills_grouped_by_status() {
        let (h, _dashboard) = loaded(Some(Arc::new(MemoryStore::with_fixtures()))).await;

        assert_eq!(cards_in(&h, BillStatus::Pending), 1);
        assert_eq!(cards_in(&h, BillStatus::Accepted), 1);
        assert_eq!(cards_in(&h, BillStatus::Refused), 2);
        assert!(h.document.get_by_test_id("big-billed-icon").is_some());
    }

    #[tokio::test]
    async fn test_fetch_error_is_displayed() {
        let store = Arc::new(MemoryStore::with_fixtures());
        store.fail(Operation::List, "Erreur 500");
        let (h, _dashboard) = loaded(Some(store)).await;

        let slot = h.document.get_by_test_id("error-message").unwrap();
        assert_eq!(h.document.text_content(slot), "Erreur 500");
    }

    #[tokio::test]
    async fn test_card_click_toggles_detail() {
        let (h, dashboard) = loaded(Some(Arc::new(MemoryStore::with_fixtures()))).await;

        open(&h, PENDING_ID);
        assert_eq!(dashboard.selected().unwrap().id, PENDING_ID);
        let email = h.document.get_by_test_id("detail-email").unwrap();
        assert_eq!(h.document.text_content(email), "a@a");
        assert!(h.document.get_by_test_id("btn-accept-bill").is_some());

        open(&h, PENDING_ID);
        assert!(dashboard.selected().is_none());
        assert!(h.document.get_by_test_id("dashboard-form").is_none());
        assert!(h.document.get_by_test_id("big-billed-icon").is_some());
    }

    #[tokio::test]
    async fn test_accept_updates_and_reloads() {
        let store = Arc::new(MemoryStore::with_fixtures());
        let (h, _dashboard) = loaded(Some(store.clone())).await;
        open(&h, PENDING_ID);

        let comment = h.document.get_by_test_id("commentary2").unwrap();
        h.document.set_value(comment, "Justificatif conforme");
        let button = h.document.get_by_test_id("btn-accept-bill").unwrap();
        h.document.dispatch(button, EventKind::Click).settled().await;

        let bill = store
            .bills_snapshot()
            .into_iter()
            .find(|b| b.id == PENDING_ID)
            .unwrap();
        assert_eq!(bill.status, BillStatus::Accepted);
        assert_eq!(bill.comment_admin.as_deref(), Some("Justificatif conforme"));
        assert_eq!(*h.navigations.lock(), vec!["#admin/dashboard".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_refusal_shows_error() {
        let store = Arc::new(MemoryStore::with_fixtures());
        store.fail(Operation::Update, "Erreur 500");
        let (h, _dashboard) = loaded(Some(store.clone())).await;
        open(&h, PENDING_ID);

        let button = h.document.get_by_test_id("btn-refuse-bill").unwrap();
        h.document.dispatch(button, EventKind::Click).settled().await;

        let slot = h.document.get_by_test_id("dashboard-errorMessage").unwrap();
        assert_eq!(h.document.text_content(slot), "Erreur 500");
        assert!(h.navigations.lock().is_empty());
        assert_eq!(store.count_calls(Operation::Update), 1);
    }

    #[tokio::test]
    async fn test_decision_without_store_navigates() {
        let data = RouteData {
            bills: Some(Vec::new()),
            ..Default::default()
        };
        let h = harness(dashboard_ui, &data, None, None);
        let dashboard = Dashboard::new(h.deps.clone());
        assert!(dashboard.handle_decision(BillStatus::Accepted).is_none());

        dashboard.state.lock().bills = Some(
            crate::fixtures::bills()
                .into_iter()
                .map(crate::format::best_effort)
                .collect(),
        );
        assert!(dashboard.handle_select(PENDING_ID));
        let _ = dashboard.handle_decision(BillStatus::Refused);
        assert_eq!(*h.navigations.lock(), vec!["#admin/dashboard".to_string()]);
    }

    #[tokio::test]
    async fn test_icon_eye_opens_admin_modal() {
        let (h, _dashboard) = loaded(Some(Arc::new(MemoryStore::with_fixtures()))).await;
        open(&h, PENDING_ID);

        let icon = h.document.get_by_test_id("icon-eye-d").unwrap();
        let _ = h.document.dispatch(icon, EventKind::Click);

        let modal = h.document.get_by_test_id("modaleFileAdmin").unwrap();
        assert!(h.document.has_class(modal, "show"));
        assert!(h.document.get_by_test_id("bill-proof").is_some());
    }
}
