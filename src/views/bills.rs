//! Employee bills list

use super::layout::vertical_layout;
use super::states::{error_page, loading_page};
use super::RouteData;
use crate::dom::Element;
use crate::format::DisplayBill;

fn row(display: &DisplayBill) -> Element {
    let bill = &display.bill;
    Element::new("tr")
        .test_id("bill-row")
        .attr("data-date", bill.date.clone())
        .children([
            Element::new("td").text(bill.expense_type.label()),
            Element::new("td").text(bill.name.clone()),
            Element::new("td").test_id("bill-date").text(display.date.clone()),
            Element::new("td").text(format!("{} €", bill.amount)),
            Element::new("td").test_id("bill-status").text(display.status.clone()),
            Element::new("td").child(
                Element::new("div")
                    .test_id("icon-eye")
                    .class("icon-actions")
                    .attr("data-bill-url", bill.file_url.clone().unwrap_or_default()),
            ),
        ])
}

fn modal() -> Element {
    Element::new("div")
        .id("modaleFile")
        .test_id("modaleFile")
        .class("modal fade")
        .attr("aria-hidden", "true")
        .child(
            Element::new("div").class("modal-dialog").child(
                Element::new("div").class("modal-content").children([
                    Element::new("div")
                        .class("modal-header")
                        .child(Element::new("h5").class("modal-title").text("Justificatif")),
                    Element::new("div").class("modal-body").test_id("modal-body"),
                ]),
            ),
        )
}

/// List of the employee's bills, in the order given
pub fn bills_ui(data: &RouteData) -> Element {
    if let Some(error) = &data.error {
        return error_page(error);
    }
    let Some(bills) = &data.bills else {
        return loading_page();
    };

    Element::new("div").class("layout").children([
        vertical_layout(true),
        Element::new("div").class("content").children([
            Element::new("div").class("content-header").children([
                Element::new("div")
                    .class("content-title")
                    .text("Mes notes de frais"),
                Element::new("button")
                    .attr("type", "button")
                    .test_id("btn-new-bill")
                    .class("btn btn-primary")
                    .text("Nouvelle note de frais"),
            ]),
            Element::new("div").id("data-table").child(
                Element::new("table").class("table").children([
                    Element::new("thead").child(Element::new("tr").children(
                        ["Type", "Nom", "Date", "Montant", "Statut", "Actions"]
                            .into_iter()
                            .map(|h| Element::new("th").text(h)),
                    )),
                    Element::new("tbody")
                        .test_id("tbody")
                        .children(bills.iter().map(row)),
                ]),
            ),
        ]),
        modal(),
    ])
}
