//! Domain Types
//!
//! Records exchanged with the remote store and the session snapshot:
//! - `Bill`: a submitted expense report line
//! - `NewBill`: payload for creating a bill
//! - `Session`: the logged-in user's role and identity

mod bill;
mod lenient;
mod session;

pub use bill::{
    Bill, BillStatus, Created, ExpenseType, FileUpload, NewBill, UploadResult, DEFAULT_PERCENTAGE,
};
pub use session::{Session, UserType};
