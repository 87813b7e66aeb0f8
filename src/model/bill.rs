//! Bill records
//!
//! Field names follow the backend's JSON representation (`email`, `type`,
//! `pct`, `fileUrl`, ...), while the Rust side uses descriptive names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Tax percentage assumed when none was entered
pub const DEFAULT_PERCENTAGE: u32 = 20;

fn default_percentage() -> u32 {
    DEFAULT_PERCENTAGE
}

/// A submitted expense bill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Store-assigned identifier
    pub id: String,
    /// Email of the employee who submitted the bill
    #[serde(rename = "email")]
    pub employee_email: String,
    /// Expense category
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    /// Free-form label
    pub name: String,
    /// Amount including taxes, in euros
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
    /// ISO calendar date (`YYYY-MM-DD`), kept raw so malformed values can still be shown
    pub date: String,
    /// VAT amount
    #[serde(default, deserialize_with = "lenient::optional_amount")]
    pub vat: Option<f64>,
    /// Tax percentage
    #[serde(
        rename = "pct",
        default = "default_percentage",
        deserialize_with = "lenient::percentage"
    )]
    pub percentage: u32,
    /// Stored receipt URL, set together with `file_name` after upload
    #[serde(default)]
    pub file_url: Option<String>,
    /// Original receipt file name
    #[serde(default)]
    pub file_name: Option<String>,
    pub status: BillStatus,
    #[serde(default)]
    pub commentary: Option<String>,
    /// Note left by the administrator when accepting or refusing
    #[serde(default)]
    pub comment_admin: Option<String>,
}

impl Bill {
    /// Parse the bill's date, if it is a valid calendar date
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Whether a receipt has been attached
    pub fn has_receipt(&self) -> bool {
        self.file_url.is_some() && self.file_name.is_some()
    }
}

/// Expense category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExpenseType {
    #[serde(rename = "Transports")]
    Transports,
    #[serde(rename = "Restaurants et bars")]
    Restaurants,
    #[serde(rename = "Hôtel et logement")]
    Hotel,
    #[serde(rename = "Services en ligne")]
    OnlineServices,
    #[serde(rename = "IT et électronique")]
    Electronics,
    #[serde(rename = "Equipement et matériel")]
    Equipment,
    #[serde(rename = "Fournitures de bureau")]
    OfficeSupplies,
    /// Category label unknown to this client
    #[serde(other)]
    Other,
}

impl ExpenseType {
    /// All selectable categories, in form order
    pub fn all() -> &'static [ExpenseType] {
        &[
            ExpenseType::Transports,
            ExpenseType::Restaurants,
            ExpenseType::Hotel,
            ExpenseType::OnlineServices,
            ExpenseType::Electronics,
            ExpenseType::Equipment,
            ExpenseType::OfficeSupplies,
        ]
    }

    /// Label as displayed and sent on the wire
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::Restaurants => "Restaurants et bars",
            ExpenseType::Hotel => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::Electronics => "IT et électronique",
            ExpenseType::Equipment => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
            ExpenseType::Other => "Autre",
        }
    }

    /// Look up a category by its label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.label() == label)
    }
}

impl std::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Review state of a bill
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn all() -> &'static [BillStatus] {
        &[BillStatus::Pending, BillStatus::Accepted, BillStatus::Refused]
    }

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a bill. Status is always pending on creation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    #[serde(rename = "email")]
    pub employee_email: String,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub name: String,
    pub amount: f64,
    pub date: String,
    pub vat: Option<f64>,
    #[serde(rename = "pct")]
    pub percentage: u32,
    pub commentary: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    /// Key of the record the receipt upload created, completed in place of a
    /// new record
    #[serde(skip)]
    pub file_key: Option<String>,
    pub status: BillStatus,
}

impl NewBill {
    /// Materialize the stored record once the store has assigned an id
    pub fn into_bill(self, id: impl Into<String>) -> Bill {
        Bill {
            id: id.into(),
            employee_email: self.employee_email,
            expense_type: self.expense_type,
            name: self.name,
            amount: self.amount,
            date: self.date,
            vat: self.vat,
            percentage: self.percentage,
            file_url: self.file_url,
            file_name: self.file_name,
            status: self.status,
            commentary: self.commentary,
            comment_admin: None,
        }
    }
}

/// Receipt file selected by the user
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub name: String,
    /// Declared MIME type, e.g. `image/png`
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Result of a successful receipt upload
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_url: String,
    #[serde(rename = "key")]
    pub file_key: String,
}

/// Identifier returned by create/update operations
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Created {
    pub id: String,
}
