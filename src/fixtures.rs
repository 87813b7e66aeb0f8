//! Sample bills used by the in-memory store, the demo CLI and tests.

use crate::model::{Bill, BillStatus, ExpenseType};

/// Four sample bills with distinct dates, in no particular order
pub fn bills() -> Vec<Bill> {
    vec![
        Bill {
            id: "47qAXb6fIm2zOKkLzMro".to_string(),
            employee_email: "a@a".to_string(),
            expense_type: ExpenseType::Hotel,
            name: "encore".to_string(),
            amount: 400.0,
            date: "2004-04-04".to_string(),
            vat: Some(80.0),
            percentage: 20,
            file_url: Some(
                "https://test.storage.tld/v0/b/billable-677b6.a…f-1.jpg?alt=media&token=c1640e12-a24b-4b11-ae52-529112e9602a"
                    .to_string(),
            ),
            file_name: Some("preview-facture-free-201801-pdf-1.jpg".to_string()),
            status: BillStatus::Pending,
            commentary: Some("séminaire billed".to_string()),
            comment_admin: Some("ok".to_string()),
        },
        Bill {
            id: "BeKy5Mo4jkmdfPGYpTxZ".to_string(),
            employee_email: "a@a".to_string(),
            expense_type: ExpenseType::Transports,
            name: "test1".to_string(),
            amount: 100.0,
            date: "2001-01-01".to_string(),
            vat: None,
            percentage: 20,
            file_url: Some(
                "https://firebasestorage.googleapis.com/v0/b/billable-677b6.a…61.jpeg?alt=media&token=7685cd61-c112-42bc-9929-8a799bb82d8b"
                    .to_string(),
            ),
            file_name: Some("1592770761.jpeg".to_string()),
            status: BillStatus::Refused,
            commentary: Some("plop".to_string()),
            comment_admin: Some("en fait non".to_string()),
        },
        Bill {
            id: "UIUZtnPQvnbFnB0ozvJh".to_string(),
            employee_email: "a@a".to_string(),
            expense_type: ExpenseType::OnlineServices,
            name: "test3".to_string(),
            amount: 300.0,
            date: "2003-03-03".to_string(),
            vat: Some(60.0),
            percentage: 20,
            file_url: Some(
                "https://firebasestorage.googleapis.com/v0/b/billable-677b6.a…f-1.jpg?alt=media&token=4df6ed2c-12c8-42a2-b013-346c1346f732"
                    .to_string(),
            ),
            file_name: Some("facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png".to_string()),
            status: BillStatus::Accepted,
            commentary: None,
            comment_admin: Some("bon bah d'accord".to_string()),
        },
        Bill {
            id: "qcCK3SzECmaZAGRrHjaC".to_string(),
            employee_email: "a@a".to_string(),
            expense_type: ExpenseType::Restaurants,
            name: "test2".to_string(),
            amount: 200.0,
            date: "2002-02-02".to_string(),
            vat: Some(40.0),
            percentage: 20,
            file_url: Some(
                "https://firebasestorage.googleapis.com/v0/b/billable-677b6.a…f-1.jpg?alt=media&token=4df6ed2c-12c8-42a2-b013-346c1346f732"
                    .to_string(),
            ),
            file_name: Some("preview-facture-free-201801-pdf-1.jpg".to_string()),
            status: BillStatus::Refused,
            commentary: Some("test2".to_string()),
            comment_admin: Some("pas la bonne facture".to_string()),
        },
    ]
}
