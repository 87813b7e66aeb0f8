//! Administrator dashboard

use super::layout::vertical_layout;
use super::states::{error_page, loading_page};
use super::RouteData;
use crate::dom::Element;
use crate::format::{format_status, DisplayBill};
use crate::model::{Bill, BillStatus};

fn card(display: &DisplayBill) -> Element {
    let bill = &display.bill;
    Element::new("div")
        .test_id(format!("open-bill{}", bill.id))
        .attr("data-bill-id", bill.id.clone())
        .class("bill-card")
        .children([
            Element::new("div")
                .class("bill-card-name-container")
                .children([
                    Element::new("div").class("bill-card-name").text(bill.employee_email.clone()),
                    Element::new("span").class("bill-card-grey").text("... "),
                ]),
            Element::new("div").class("name-price-container").children([
                Element::new("span").text(bill.name.clone()),
                Element::new("span").text(format!("{} €", bill.amount)),
            ]),
            Element::new("div").class("date-type-container").children([
                Element::new("span").text(display.date.clone()),
                Element::new("span").text(bill.expense_type.label()),
            ]),
        ])
}

fn status_section(status: BillStatus, bills: &[DisplayBill]) -> Element {
    let cards: Vec<Element> = bills
        .iter()
        .filter(|d| d.bill.status == status)
        .map(card)
        .collect();

    Element::new("div")
        .class("status-bills-container")
        .test_id(format!("status-bills-{}", status))
        .children([
            Element::new("div")
                .class("status-bills-header")
                .text(format!("{} ({})", format_status(status), cards.len())),
            Element::new("div")
                .test_id(format!("status-bills-container-{}", status))
                .children(cards),
        ])
}

fn detail(bill: &Bill) -> Element {
    let mut form = Element::new("div")
        .test_id("dashboard-form")
        .class("dashboard-form")
        .children([
            Element::new("div").test_id("detail-email").text(bill.employee_email.clone()),
            Element::new("div").test_id("detail-type").text(bill.expense_type.label()),
            Element::new("div").test_id("detail-name").text(bill.name.clone()),
            Element::new("div").test_id("detail-date").text(bill.date.clone()),
            Element::new("div").test_id("detail-amount").text(format!("{} €", bill.amount)),
            Element::new("div")
                .test_id("detail-commentary")
                .text(bill.commentary.clone().unwrap_or_default()),
            Element::new("div")
                .test_id("detail-file")
                .child_opt(bill.file_name.clone().map(|name| Element::new("span").text(name)))
                .child(
                    Element::new("span")
                        .test_id("icon-eye-d")
                        .attr("data-bill-url", bill.file_url.clone().unwrap_or_default()),
                ),
        ]);

    if bill.status == BillStatus::Pending {
        form = form.children([
            Element::new("textarea")
                .test_id("commentary2")
                .class("form-control blue-border")
                .attr("rows", "5"),
            Element::new("button")
                .attr("type", "button")
                .test_id("btn-accept-bill")
                .class("btn btn-primary")
                .text("Accepter"),
            Element::new("button")
                .attr("type", "button")
                .test_id("btn-refuse-bill")
                .class("btn btn-primary")
                .text("Refuser"),
        ]);
    } else {
        form = form.child(
            Element::new("div")
                .test_id("detail-comment-admin")
                .text(bill.comment_admin.clone().unwrap_or_default()),
        );
    }
    form
}

/// All employees' bills grouped by status, plus the selected bill's detail
pub fn dashboard_ui(data: &RouteData) -> Element {
    if let Some(error) = &data.error {
        return error_page(error);
    }
    let Some(bills) = &data.bills else {
        return loading_page();
    };

    let right = match &data.selected {
        Some(bill) => detail(bill),
        None => Element::new("div")
            .test_id("big-billed-icon")
            .class("big-billed-icon"),
    };

    Element::new("div").class("layout").children([
        vertical_layout(false),
        Element::new("div").class("dashboard-content").children([
            Element::new("div").class("dashboard-left-container").children(
                BillStatus::all()
                    .iter()
                    .map(|status| status_section(*status, bills)),
            ),
            Element::new("div").class("dashboard-right-container").children([
                Element::new("p")
                    .test_id("dashboard-errorMessage")
                    .class("error-message"),
                right,
            ]),
        ]),
        Element::new("div")
            .id("modaleFileAdmin1")
            .test_id("modaleFileAdmin")
            .class("modal fade")
            .child(Element::new("div").class("modal-body").test_id("modal-body-admin")),
    ])
}
