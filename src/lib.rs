//! # Billed
//!
//! Client-side core of an employee expense-report tool: a hash router that
//! renders pages into a document, and per-page containers that synchronize
//! bills and receipts with a remote store.
//!
//! ## Features
//!
//! - **Routing**: logical paths resolved through an explicit route table,
//!   with a not-found fallback and active navigation icons
//! - **Bills list**: most recent first, per-record formatting that degrades
//!   to raw values, visible fetch errors
//! - **New bill form**: receipt type validation, upload, pending bill creation
//! - **Admin dashboard**: bills grouped by status, accept or refuse with a
//!   comment
//! - **Stale-write protection**: every navigation invalidates the previous
//!   page's in-flight work
//!
//! ## Modules
//!
//! - [`router`]: route table, navigation and mounts
//! - [`containers`]: per-page controllers
//! - [`views`]: markup templates
//! - [`dom`]: headless document the pages render into
//! - [`store`]: remote store contract, in-memory and REST implementations
//! - [`session`]: read-only access to the persisted session
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use billed::dom::{Document, Element};
//! use billed::model::Session;
//! use billed::router::{Router, ROOT_ID};
//! use billed::session::StaticSession;
//! use billed::store::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = Document::new();
//!     document.append_to_body(Element::new("div").id(ROOT_ID));
//!
//!     let router = Router::new(
//!         document.clone(),
//!         Some(Arc::new(MemoryStore::with_fixtures())),
//!         Arc::new(StaticSession::new(Session::employee("a@a"))),
//!     )?;
//!
//!     // Wait for the list to be fetched and rendered
//!     router.navigate("#employee/bills").settled().await;
//!
//!     println!("{}", document.to_html());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod containers;
pub mod dom;
pub mod fixtures;
pub mod format;
pub mod model;
pub mod router;
pub mod session;
pub mod store;
pub mod task;
pub mod views;

// Re-export top-level types for convenience
pub use config::{Config, ConfigError};

pub use containers::{BillsList, Container, ContainerDeps, ContainerError, Dashboard, NewBillForm};

pub use dom::{Document, Element, Event, EventKind, NodeId};

pub use model::{Bill, BillStatus, ExpenseType, FileUpload, NewBill, Session, UserType};

pub use router::{OnNavigate, RouteKey, RouteState, Router, RouterError, RouterResult};

pub use session::{SessionProvider, StaticSession, StorageSession};

pub use store::{HttpStore, MemoryStore, RemoteStore, StoreError, StoreResult};

pub use task::Pending;
