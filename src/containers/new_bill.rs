//! New bill submission
//!
//! Selecting a receipt validates its declared type and, with a store,
//! uploads it right away. Submitting assembles a pending bill from the form
//! and the stored receipt reference, starts its creation and returns to the
//! bills list without waiting for the store.

use chrono::NaiveDate;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::{settle, Container, ContainerDeps};
use crate::dom::{Event, EventKind, NodeId};
use crate::model::{BillStatus, ExpenseType, FileUpload, NewBill, DEFAULT_PERCENTAGE};
use crate::router::RouteKey;
use crate::store::RemoteStore;
use crate::views::{
    AMOUNT_FORMAT_ERROR, DATE_FORMAT_ERROR, FILE_FORMAT_ERROR, FILE_MISSING_ERROR,
    FILE_UPLOAD_ERROR, UPLOAD_PENDING_ERROR,
};

/// Receipt MIME types the form accepts
pub const ACCEPTED_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

pub fn is_accepted_type(mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    ACCEPTED_TYPES.contains(&mime_type.as_str())
}

/// Receipt upload progress. All references stay unset until an upload
/// succeeds, and are set together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_key: Option<String>,
    pub uploading: bool,
    /// Incremented per upload so a superseded result is ignored
    attempt: u64,
}

/// Controller for the new bill form
pub struct NewBillForm {
    deps: ContainerDeps,
    state: Mutex<UploadState>,
}

impl NewBillForm {
    pub fn new(deps: ContainerDeps) -> Arc<Self> {
        let this = Arc::new(Self {
            deps,
            state: Mutex::new(UploadState::default()),
        });
        this.attach();
        this
    }

    pub fn factory(deps: ContainerDeps) -> Arc<dyn Container> {
        Self::new(deps)
    }

    /// Snapshot of the receipt upload state
    pub fn upload_state(&self) -> UploadState {
        self.state.lock().clone()
    }

    /// Validate the selected receipt and start its upload.
    ///
    /// Returns the upload, if one was started.
    pub fn handle_change_file(self: &Arc<Self>) -> Option<BoxFuture<'static, ()>> {
        let document = &self.deps.document;
        let input = self.deps.mount.find("file")?;
        let file = document.files(input).into_iter().next()?;

        if !is_accepted_type(&file.mime_type) {
            tracing::warn!(file = %file.name, mime_type = %file.mime_type, "Rejected receipt type");
            document.set_value(input, "");
            self.show_error(FILE_FORMAT_ERROR);
            self.reset_upload(false);
            return None;
        }

        self.show_error("");
        let Some(store) = self.deps.store.clone() else {
            tracing::debug!(file = %file.name, "No store, receipt kept local");
            self.reset_upload(false);
            return None;
        };

        let attempt = self.reset_upload(true);
        let email = self.deps.email();
        let this = Arc::clone(self);
        Some(async move { this.upload(store, file, email, attempt).await }.boxed())
    }

    /// Build the bill from the form, start its creation and go back to the
    /// list. The navigation happens before the creation resolves.
    ///
    /// Returns the creation followed by the navigation's own continuations.
    pub fn handle_submit(self: &Arc<Self>, event: Option<&Event>) -> Option<BoxFuture<'static, ()>> {
        if let Some(event) = event {
            event.prevent_default();
        }

        let upload = self.upload_state();
        if self.deps.store.is_some() && upload.file_url.is_none() {
            let message = if upload.uploading {
                UPLOAD_PENDING_ERROR
            } else {
                FILE_MISSING_ERROR
            };
            tracing::warn!(uploading = upload.uploading, "Submit blocked, receipt not stored");
            self.show_error(message);
            return None;
        }

        let bill = match self.read_form(&upload) {
            Ok(bill) => bill,
            Err(message) => {
                self.show_error(message);
                return None;
            }
        };

        let navigation = (self.deps.on_navigate)(RouteKey::Bills.path());
        let Some(store) = self.deps.store.clone() else {
            return settle(navigation);
        };

        let this = Arc::clone(self);
        Some(
            async move {
                match store.bills().create(bill).await {
                    Ok(created) => {
                        tracing::info!(bill_id = %created.id, "Bill created");
                        this.reset_upload(false);
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to create bill"),
                }
                navigation.settled().await;
            }
            .boxed(),
        )
    }

    async fn upload(self: Arc<Self>, store: Arc<dyn RemoteStore>, file: FileUpload, email: String, attempt: u64) {
        let file_name = file.name.clone();
        let result = store.files().create(file, &email).await;

        {
            let mut state = self.state.lock();
            if state.attempt != attempt {
                tracing::debug!(file = %file_name, "Discarding superseded upload");
                return;
            }
            state.uploading = false;
            if let Ok(uploaded) = &result {
                state.file_url = Some(uploaded.file_url.clone());
                state.file_key = Some(uploaded.file_key.clone());
                state.file_name = Some(file_name.clone());
            }
        }

        match result {
            Ok(uploaded) => {
                tracing::info!(file = %file_name, url = %uploaded.file_url, "Receipt uploaded");
            }
            Err(e) => {
                tracing::error!(file = %file_name, error = %e, "Receipt upload failed");
                if !self.deps.mount.is_current() {
                    return;
                }
                if let Some(input) = self.deps.mount.find("file") {
                    self.deps.document.set_value(input, "");
                }
                self.show_error(FILE_UPLOAD_ERROR);
            }
        }
    }

    fn read_form(&self, upload: &UploadState) -> Result<NewBill, &'static str> {
        let expense_type = ExpenseType::from_label(&self.field("expense-type")).unwrap_or_else(|| {
            tracing::warn!("Unknown expense type, filing as other");
            ExpenseType::Other
        });

        let date = self.field("datepicker");
        if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            tracing::warn!(date = %date, "Invalid bill date");
            return Err(DATE_FORMAT_ERROR);
        }

        let amount = self
            .field("amount")
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or(AMOUNT_FORMAT_ERROR)?;

        let commentary = self.field("commentary");

        Ok(NewBill {
            employee_email: self.deps.email(),
            expense_type,
            name: self.field("expense-name"),
            amount,
            date,
            vat: self.field("vat").parse().ok(),
            percentage: self.field("pct").parse().unwrap_or(DEFAULT_PERCENTAGE),
            commentary: (!commentary.is_empty()).then_some(commentary),
            file_url: upload.file_url.clone(),
            file_name: upload.file_name.clone(),
            file_key: upload.file_key.clone(),
            status: BillStatus::Pending,
        })
    }

    fn field(&self, test_id: &str) -> String {
        self.deps
            .mount
            .find(test_id)
            .and_then(|node| self.deps.document.value(node))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn show_error(&self, message: &str) {
        if let Some(slot) = self.deps.mount.find("file-errorMessage") {
            self.deps.document.set_text(slot, message);
        }
    }

    /// Forget any stored receipt. Returns the new attempt number.
    fn reset_upload(&self, uploading: bool) -> u64 {
        let mut state = self.state.lock();
        *state = UploadState {
            uploading,
            attempt: state.attempt + 1,
            ..Default::default()
        };
        state.attempt
    }

    fn attach(self: &Arc<Self>) {
        let document = &self.deps.document;

        if let Some(input) = self.deps.mount.find("file") {
            let weak = Arc::downgrade(self);
            document.add_event_listener(
                input,
                EventKind::Change,
                Arc::new(move |_event: &Event| Weak::upgrade(&weak)?.handle_change_file()),
            );
        }

        if let Some(form) = self.form() {
            let weak = Arc::downgrade(self);
            document.add_event_listener(
                form,
                EventKind::Submit,
                Arc::new(move |event: &Event| Weak::upgrade(&weak)?.handle_submit(Some(event))),
            );
        }
    }

    fn form(&self) -> Option<NodeId> {
        self.deps.mount.find("form-new-bill")
    }
}

impl Container for NewBillForm {
    fn name(&self) -> &'static str {
        "new_bill"
    }

    fn activate(self: Arc<Self>) -> Option<BoxFuture<'static, ()>> {
        None
    }
}
