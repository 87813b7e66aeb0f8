//! Headless Document
//!
//! An in-process element tree standing in for the browser document:
//!
//! - **element**: builder for markup produced by view templates
//! - **document**: shared node arena with queries, mutation and listeners
//! - **event**: click/change/submit events and default prevention
//!
//! # Lifecycle
//!
//! ```text
//! template(data) → Element → Document::replace_children(root, ..)
//!   → old subtree and its listeners dropped → new nodes get fresh ids
//! ```

pub mod document;
pub mod element;
pub mod event;

pub use document::{Document, Listener, NodeId, SubmitOutcome};
pub use element::Element;
pub use event::{Event, EventKind};
