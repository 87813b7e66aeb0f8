//! Employee bills list

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::{Arc, Weak};

use super::{settle, show_receipt, Container, ContainerDeps, ContainerError};
use crate::dom::{Event, EventKind, NodeId};
use crate::format::{best_effort, DisplayBill};
use crate::model::Bill;
use crate::router::RouteKey;
use crate::store::RemoteStore;
use crate::task::Pending;
use crate::views::{bills_ui, RouteData};

/// Sort bills by date, most recent first. Stable, so equal dates keep their
/// original order; bills without a valid date go last.
pub fn sort_most_recent_first(bills: &mut [Bill]) {
    bills.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
}

/// List every bill the store returns, most recent first, formatted for
/// display
pub(crate) async fn fetch_display_bills(
    store: &dyn RemoteStore,
) -> Result<Vec<DisplayBill>, ContainerError> {
    let mut bills = store.bills().list().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch bills");
        ContainerError::Fetch(e)
    })?;

    sort_most_recent_first(&mut bills);
    tracing::debug!(count = bills.len(), "Fetched bills");
    Ok(bills.into_iter().map(best_effort).collect())
}

/// Controller for the bills list page
pub struct BillsList {
    deps: ContainerDeps,
}

impl BillsList {
    /// Build the container and wire handlers on whatever list markup is
    /// already rendered
    pub fn new(deps: ContainerDeps) -> Arc<Self> {
        let this = Arc::new(Self { deps });
        this.attach();
        this
    }

    pub fn factory(deps: ContainerDeps) -> Arc<dyn Container> {
        Self::new(deps)
    }

    /// Fetch the session's bills, most recent first, formatted for display.
    ///
    /// Without a store there is nothing to fetch and the list is empty.
    /// A record that cannot be formatted is kept with its raw values; only a
    /// failed fetch is an error.
    pub async fn get_bills(&self) -> Result<Vec<DisplayBill>, ContainerError> {
        match &self.deps.store {
            Some(store) => fetch_display_bills(store.as_ref()).await,
            None => Ok(Vec::new()),
        }
    }

    /// Go to the new-bill form
    pub fn handle_click_new_bill(&self) -> Pending {
        (self.deps.on_navigate)(RouteKey::NewBill.path())
    }

    /// Show the receipt of the row whose eye icon was clicked
    pub fn handle_click_icon_eye(&self, icon: NodeId) -> bool {
        show_receipt(&self.deps.document, icon, "modaleFile")
    }

    /// Wire the "new bill" button and every row's eye icon
    fn attach(self: &Arc<Self>) {
        let document = &self.deps.document;
        let mount = &self.deps.mount;

        if let Some(button) = mount.find("btn-new-bill") {
            let weak = Arc::downgrade(self);
            document.add_event_listener(
                button,
                EventKind::Click,
                Arc::new(move |_event: &Event| {
                    let this = Weak::upgrade(&weak)?;
                    settle(this.handle_click_new_bill())
                }),
            );
        }

        for icon in mount.find_all("icon-eye") {
            let weak = Arc::downgrade(self);
            document.add_event_listener(
                icon,
                EventKind::Click,
                Arc::new(move |event: &Event| {
                    let this = Weak::upgrade(&weak)?;
                    this.handle_click_icon_eye(event.target);
                    None
                }),
            );
        }
    }

    /// Fetch, then replace the loading page with the list or the error
    async fn load(self: Arc<Self>) {
        let data = match self.get_bills().await {
            Ok(bills) => RouteData::with_bills(bills),
            Err(e) => RouteData::with_error(e.to_string()),
        };

        if self.deps.mount.render(bills_ui(&data)) {
            self.attach();
        }
    }
}

impl Container for BillsList {
    fn name(&self) -> &'static str {
        "bills"
    }

    fn activate(self: Arc<Self>) -> Option<BoxFuture<'static, ()>> {
        Some(self.load().boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::testing::harness;
    use crate::model::Session;
    use crate::store::{MemoryStore, Operation};

    fn fixtures_data() -> RouteData {
        RouteData::with_bills(crate::fixtures::bills().into_iter().map(best_effort).collect())
    }

    #[tokio::test]
    async fn test_get_bills_without_store_is_empty() {
        let h = harness(bills_ui, &fixtures_data(), None, None);
        let list = BillsList::new(h.deps);
        assert!(list.get_bills().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_bills_sorted_most_recent_first() {
        let store: Arc<dyn RemoteStore> = Arc::new(MemoryStore::with_fixtures());
        let h = harness(bills_ui, &RouteData::default(), Some(store), None);
        let list = BillsList::new(h.deps);

        let bills = list.get_bills().await.unwrap();
        let dates: Vec<&str> = bills.iter().map(|b| b.bill.date.as_str()).collect();
        assert_eq!(dates, vec!["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);
        assert_eq!(bills[0].date, "4 Avr. 04");
        assert_eq!(bills[0].status, "En attente");
    }

    #[tokio::test]
    async fn test_malformed_record_keeps_raw_values() {
        let mut bills = crate::fixtures::bills();
        bills[2].date = "2003-02-31".to_string();
        let store: Arc<dyn RemoteStore> = Arc::new(MemoryStore::with_bills(bills));
        let h = harness(bills_ui, &RouteData::default(), Some(store), None);

        let displayed = BillsList::new(h.deps).get_bills().await.unwrap();
        assert_eq!(displayed.len(), 4);
        let last = displayed.last().unwrap();
        assert_eq!(last.date, "2003-02-31");
        assert_eq!(last.status, "accepted");
    }

    #[tokio::test]
    async fn test_rendered_rows_descending() {
        let store: Arc<dyn RemoteStore> = Arc::new(MemoryStore::with_fixtures());
        let h = harness(bills_ui, &RouteData::default(), Some(store), None);
        let list = BillsList::new(h.deps);
        list.activate().unwrap().await;

        let rows = h.document.get_all_by_test_id("bill-row");
        let dates: Vec<String> = rows
            .iter()
            .filter_map(|r| h.document.attribute(*r, "data-date"))
            .collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(rows.len(), 4);
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn test_empty_collection_renders_no_rows() {
        let store: Arc<dyn RemoteStore> = Arc::new(MemoryStore::new());
        let h = harness(bills_ui, &RouteData::default(), Some(store), None);
        BillsList::new(h.deps).activate().unwrap().await;

        assert!(h.document.get_by_test_id("tbody").is_some());
        assert!(h.document.get_all_by_test_id("bill-row").is_empty());
        assert!(h.document.get_by_test_id("error-message").is_none());
    }

    #[tokio::test]
    async fn test_fetch_errors_are_displayed() {
        for message in ["Erreur 404", "Erreur 500"] {
            let store = Arc::new(MemoryStore::with_fixtures());
            store.fail(Operation::List, message);
            let h = harness(
                bills_ui,
                &RouteData::default(),
                Some(store as Arc<dyn RemoteStore>),
                Some(Session::employee("a@a")),
            );

            let list = BillsList::new(h.deps);
            let err = list.get_bills().await.unwrap_err();
            assert_eq!(err.to_string(), message);

            list.activate().unwrap().await;
            let slot = h.document.get_by_test_id("error-message").unwrap();
            assert_eq!(h.document.text_content(slot), message);
            assert!(h.document.get_all_by_test_id("bill-row").is_empty());
        }
    }

    #[tokio::test]
    async fn test_click_new_bill_navigates() {
        let h = harness(bills_ui, &fixtures_data(), None, None);
        let _list = BillsList::new(h.deps);

        let button = h.document.get_by_test_id("btn-new-bill").unwrap();
        h.document.dispatch(button, EventKind::Click).settled().await;

        assert_eq!(*h.navigations.lock(), vec!["#employee/bill/new".to_string()]);
    }

    #[test]
    fn test_click_icon_eye_opens_modal() {
        let h = harness(bills_ui, &fixtures_data(), None, None);
        let _list = BillsList::new(h.deps);

        let icons = h.document.get_all_by_test_id("icon-eye");
        assert_eq!(icons.len(), 4);
        let _ = h.document.dispatch(icons[0], EventKind::Click);

        let modal = h.document.get_by_test_id("modaleFile").unwrap();
        assert!(h.document.has_class(modal, "show"));
        assert!(h.document.get_by_test_id("bill-proof").is_some());
        assert!(h.document.to_html().contains("src=\"https://test.storage.tld"));
    }

    #[test]
    fn test_icon_eye_without_url_still_opens() {
        let mut bills = crate::fixtures::bills();
        bills.truncate(1);
        bills[0].file_url = None;
        let data = RouteData::with_bills(bills.into_iter().map(best_effort).collect());
        let h = harness(bills_ui, &data, None, None);
        let list = BillsList::new(h.deps);

        let icon = h.document.get_by_test_id("icon-eye").unwrap();
        assert!(list.handle_click_icon_eye(icon));

        let modal = h.document.get_by_test_id("modaleFile").unwrap();
        assert!(h.document.has_class(modal, "show"));
        assert!(!h.document.to_html().contains("src="));
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut bills = crate::fixtures::bills();
        for bill in bills.iter_mut() {
            bill.date = "2020-05-05".to_string();
        }
        let ids: Vec<String> = bills.iter().map(|b| b.id.clone()).collect();
        sort_most_recent_first(&mut bills);
        let sorted: Vec<String> = bills.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, sorted);
    }
}
