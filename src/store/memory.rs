//! In-memory store
//!
//! Holds bills in a vector and records every call. Operations can be made to
//! fail with a given message, or held open until released, which is how tests
//! exercise rejected and still-pending requests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

use super::{BillsResource, FilesResource, RemoteStore, StoreError, StoreResult};
use crate::model::{Bill, Created, FileUpload, NewBill, UploadResult};

/// Store operations, for failure injection and holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Upload,
}

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List,
    Create(NewBill),
    Update { id: String, bill: Bill },
    Upload { file_name: String, email: String },
}

/// In-memory remote store
#[derive(Default)]
pub struct MemoryStore {
    bills: Mutex<Vec<Bill>>,
    failures: Mutex<HashMap<Operation, String>>,
    holds: Mutex<HashMap<Operation, Arc<Semaphore>>>,
    calls: Mutex<Vec<StoreCall>>,
    file_base_url: String,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self {
            file_base_url: "https://localhost:3456/images".to_string(),
            ..Default::default()
        }
    }

    /// Store seeded with the sample bills
    pub fn with_fixtures() -> Self {
        Self::with_bills(crate::fixtures::bills())
    }

    pub fn with_bills(bills: Vec<Bill>) -> Self {
        let store = Self::new();
        *store.bills.lock() = bills;
        store
    }

    /// Make `op` reject with `message` until `recover` is called
    pub fn fail(&self, op: Operation, message: impl Into<String>) {
        self.failures.lock().insert(op, message.into());
    }

    pub fn recover(&self, op: Operation) {
        self.failures.lock().remove(&op);
    }

    /// Keep calls to `op` pending until `release` is called
    pub fn hold(&self, op: Operation) {
        self.holds.lock().insert(op, Arc::new(Semaphore::new(0)));
    }

    /// Let every pending and future call to `op` complete
    pub fn release(&self, op: Operation) {
        if let Some(gate) = self.holds.lock().remove(&op) {
            gate.close();
        }
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn count_calls(&self, op: Operation) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation() == op)
            .count()
    }

    /// Snapshot of stored bills
    pub fn bills_snapshot(&self) -> Vec<Bill> {
        self.bills.lock().clone()
    }

    async fn enter(&self, call: StoreCall) -> StoreResult<()> {
        let op = call.operation();
        self.calls.lock().push(call);

        let gate = self.holds.lock().get(&op).cloned();
        if let Some(gate) = gate {
            tracing::debug!(?op, "Holding store call");
            // Closing the semaphore is the release signal
            let _ = gate.acquire().await;
        }

        match self.failures.lock().get(&op) {
            Some(message) => Err(StoreError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

impl StoreCall {
    pub fn operation(&self) -> Operation {
        match self {
            StoreCall::List => Operation::List,
            StoreCall::Create(_) => Operation::Create,
            StoreCall::Update { .. } => Operation::Update,
            StoreCall::Upload { .. } => Operation::Upload,
        }
    }
}

impl RemoteStore for MemoryStore {
    fn bills(&self) -> &dyn BillsResource {
        self
    }

    fn files(&self) -> &dyn FilesResource {
        self
    }
}

#[async_trait]
impl BillsResource for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Bill>> {
        self.enter(StoreCall::List).await?;
        Ok(self.bills.lock().clone())
    }

    async fn create(&self, bill: NewBill) -> StoreResult<Created> {
        self.enter(StoreCall::Create(bill.clone())).await?;
        let id = bill
            .file_key
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.bills.lock().push(bill.into_bill(id.clone()));
        tracing::debug!(bill_id = %id, "Bill created");
        Ok(Created { id })
    }

    async fn update(&self, id: &str, bill: Bill) -> StoreResult<Created> {
        self.enter(StoreCall::Update {
            id: id.to_string(),
            bill: bill.clone(),
        })
        .await?;

        let mut bills = self.bills.lock();
        let slot = bills
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = Bill {
            id: id.to_string(),
            ..bill
        };
        Ok(Created { id: id.to_string() })
    }
}

#[async_trait]
impl FilesResource for MemoryStore {
    async fn create(&self, file: FileUpload, email: &str) -> StoreResult<UploadResult> {
        self.enter(StoreCall::Upload {
            file_name: file.name.clone(),
            email: email.to_string(),
        })
        .await?;

        Ok(UploadResult {
            file_url: format!("{}/{}", self.file_base_url, file.name),
            file_key: Uuid::new_v4().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BillStatus, ExpenseType};

    fn new_bill() -> NewBill {
        NewBill {
            employee_email: "a@a".into(),
            expense_type: ExpenseType::Transports,
            name: "taxi".into(),
            amount: 42.0,
            date: "2024-04-19".into(),
            vat: None,
            percentage: 20,
            commentary: None,
            file_url: None,
            file_name: None,
            file_key: None,
            status: BillStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_list_fixtures() {
        let store = MemoryStore::with_fixtures();
        let bills = store.bills().list().await.unwrap();
        assert_eq!(bills.len(), 4);
        assert_eq!(store.calls(), vec![StoreCall::List]);
    }

    #[tokio::test]
    async fn test_create_then_update() {
        let store = MemoryStore::new();
        let created = store.bills().create(new_bill()).await.unwrap();

        let mut bill = store.bills_snapshot().remove(0);
        assert_eq!(bill.id, created.id);
        bill.status = BillStatus::Accepted;

        store.bills().update(&created.id, bill).await.unwrap();
        assert_eq!(store.bills_snapshot()[0].status, BillStatus::Accepted);
        assert_eq!(store.count_calls(Operation::Create), 1);
        assert_eq!(store.count_calls(Operation::Update), 1);
    }

    #[tokio::test]
    async fn test_create_reuses_upload_key() {
        let store = MemoryStore::new();
        let mut bill = new_bill();
        bill.file_key = Some("upload-key".into());

        let created = store.bills().create(bill).await.unwrap();
        assert_eq!(created.id, "upload-key");
        assert_eq!(store.bills_snapshot()[0].id, "upload-key");
    }

    #[tokio::test]
    async fn test_update_unknown_bill() {
        let store = MemoryStore::new();
        let bill = crate::fixtures::bills().remove(0);
        let err = store.bills().update("nope", bill).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope".into()));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::with_fixtures();
        store.fail(Operation::List, "Erreur 500");

        let err = store.bills().list().await.unwrap_err();
        assert_eq!(err.to_string(), "Erreur 500");

        store.recover(Operation::List);
        assert!(store.bills().list().await.is_ok());
    }

    #[tokio::test]
    async fn test_hold_and_release() {
        let store = Arc::new(MemoryStore::new());
        store.hold(Operation::Create);

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.bills().create(new_bill()).await })
        };

        tokio::task::yield_now().await;
        assert_eq!(store.count_calls(Operation::Create), 1);
        assert!(store.bills_snapshot().is_empty());

        store.release(Operation::Create);
        task.await.unwrap().unwrap();
        assert_eq!(store.bills_snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_upload() {
        let store = MemoryStore::new();
        let result = store
            .files()
            .create(FileUpload::new("file.png", "image/png", b"x".to_vec()), "a@a")
            .await
            .unwrap();

        assert_eq!(result.file_url, "https://localhost:3456/images/file.png");
        assert_eq!(
            store.calls(),
            vec![StoreCall::Upload {
                file_name: "file.png".into(),
                email: "a@a".into()
            }]
        );
    }
}
