//! Page Containers
//!
//! Per-view controllers. Each one owns the subtree mounted for a single
//! navigation, fetches or posts data through the remote store and writes
//! the outcome back into its subtree:
//!
//! - **bills**: employee bill list, receipt preview, "new bill" button
//! - **new_bill**: receipt validation and upload, bill submission
//! - **dashboard**: administrator review of all bills
//!
//! Containers never block an event handler: asynchronous work is returned as
//! a future which the document or router spawns.

mod bills;
mod dashboard;
mod modal;
mod new_bill;

pub use bills::{sort_most_recent_first, BillsList};
pub use dashboard::Dashboard;
pub use modal::show_receipt;
pub use new_bill::{is_accepted_type, NewBillForm, UploadState, ACCEPTED_TYPES};

use futures_util::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;

use crate::dom::Document;
use crate::model::Session;
use crate::router::{Mount, OnNavigate};
use crate::store::{RemoteStore, StoreError};
use crate::task::Pending;

/// A controller attached to a rendered route
pub trait Container: Send + Sync {
    fn name(&self) -> &'static str;

    /// Start the container's data flow. Returns the asynchronous part, if any.
    fn activate(self: Arc<Self>) -> Option<BoxFuture<'static, ()>>;
}

/// Builds a container for a freshly rendered route
pub type ContainerFactory = fn(ContainerDeps) -> Arc<dyn Container>;

/// Everything a container is constructed with
#[derive(Clone)]
pub struct ContainerDeps {
    pub document: Document,
    pub on_navigate: OnNavigate,
    /// Absent in offline use; data operations are then skipped
    pub store: Option<Arc<dyn RemoteStore>>,
    /// Session snapshot taken when navigating
    pub session: Option<Session>,
    pub mount: Mount,
}

impl ContainerDeps {
    /// Email of the logged-in user, empty when nobody is
    pub fn email(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.email.clone())
            .unwrap_or_default()
    }
}

/// Errors surfaced by container data flows
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContainerError {
    /// Listing bills failed; displays the store's message unchanged
    #[error("{0}")]
    Fetch(StoreError),

    /// Updating a bill failed
    #[error("{0}")]
    Update(StoreError),
}

/// Wrap a navigation's continuations as a listener future
pub(crate) fn settle(pending: Pending) -> Option<BoxFuture<'static, ()>> {
    use futures_util::FutureExt;

    if pending.is_empty() {
        None
    } else {
        Some(pending.settled().boxed())
    }
}
