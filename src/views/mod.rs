//! View Templates
//!
//! Pure functions turning route data into markup. They hold no state and
//! perform no I/O; containers and the router attach behaviour to the element
//! ids and test ids they produce.

pub mod bills;
pub mod dashboard;
pub mod layout;
pub mod login;
pub mod new_bill;
pub mod states;

pub use bills::bills_ui;
pub use dashboard::dashboard_ui;
pub use layout::{vertical_layout, ACTIVE_ICON_CLASS, ICON_MAIL_ID, ICON_WINDOW_ID};
pub use login::login_ui;
pub use new_bill::{
    new_bill_ui, AMOUNT_FORMAT_ERROR, DATE_FORMAT_ERROR, FILE_FORMAT_ERROR, FILE_MISSING_ERROR,
    FILE_UPLOAD_ERROR, UPLOAD_PENDING_ERROR,
};
pub use states::{error_page, loading_page, not_found_page};

use crate::format::DisplayBill;
use crate::model::Bill;

/// Data handed to a route's template
#[derive(Debug, Clone, Default)]
pub struct RouteData {
    /// Bills to display; `None` while they are being fetched
    pub bills: Option<Vec<DisplayBill>>,
    /// Fetch failure message, shown instead of the content
    pub error: Option<String>,
    /// Bill opened in the admin dashboard
    pub selected: Option<Bill>,
}

impl RouteData {
    pub fn with_bills(bills: Vec<DisplayBill>) -> Self {
        Self {
            bills: Some(bills),
            ..Default::default()
        }
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Signature shared by all route templates
pub type Template = fn(&RouteData) -> crate::dom::Element;
