//! New bill form

use super::layout::vertical_layout;
use super::RouteData;
use crate::dom::Element;
use crate::model::ExpenseType;

/// Shown when the selected receipt is not an accepted image type
pub const FILE_FORMAT_ERROR: &str = "* Le format du fichier n'est pas accepté.";
/// Shown when the receipt upload was rejected by the store
pub const FILE_UPLOAD_ERROR: &str = "* Le justificatif n'a pas pu être envoyé, veuillez réessayer.";
/// Shown when submitting before any receipt has been stored
pub const FILE_MISSING_ERROR: &str = "* Veuillez joindre un justificatif.";
/// Shown when submitting while the receipt upload is still running
pub const UPLOAD_PENDING_ERROR: &str = "* Le justificatif est en cours d'envoi.";
/// Shown when the amount is not a number
pub const AMOUNT_FORMAT_ERROR: &str = "* Le montant n'est pas valide.";
/// Shown when the date is not a calendar date
pub const DATE_FORMAT_ERROR: &str = "* La date n'est pas valide.";

fn field(label: &str, control: Element) -> Element {
    Element::new("div").class("form-group").children([
        Element::new("label").class("bold-label").text(label),
        control,
    ])
}

fn form() -> Element {
    let expense_type = Element::new("select")
        .test_id("expense-type")
        .class("form-control blue-border")
        .required()
        .value(ExpenseType::Transports.label())
        .children(
            ExpenseType::all()
                .iter()
                .map(|t| Element::new("option").text(t.label())),
        );

    Element::new("form")
        .test_id("form-new-bill")
        .class("form-newbill-container content-inner")
        .children([
            field("Type de dépense", expense_type),
            field(
                "Nom de la dépense",
                Element::new("input")
                    .attr("type", "text")
                    .test_id("expense-name")
                    .class("form-control blue-border")
                    .attr("placeholder", "Vol Paris Londres"),
            ),
            field(
                "Date",
                Element::new("input")
                    .attr("type", "date")
                    .test_id("datepicker")
                    .class("form-control blue-border")
                    .required(),
            ),
            field(
                "Montant TTC",
                Element::new("input")
                    .attr("type", "number")
                    .test_id("amount")
                    .class("form-control blue-border input-icon input-icon-right")
                    .attr("placeholder", "348")
                    .required(),
            ),
            field(
                "TVA",
                Element::new("input")
                    .attr("type", "number")
                    .test_id("vat")
                    .class("form-control blue-border")
                    .attr("placeholder", "70"),
            ),
            field(
                "%",
                Element::new("input")
                    .attr("type", "number")
                    .test_id("pct")
                    .class("form-control blue-border")
                    .attr("placeholder", "20")
                    .required(),
            ),
            field(
                "Commentaire",
                Element::new("textarea")
                    .test_id("commentary")
                    .class("form-control blue-border")
                    .attr("rows", "3"),
            ),
            field(
                "Justificatif",
                Element::new("input")
                    .attr("type", "file")
                    .attr("accept", ".jpg,.jpeg,.png")
                    .test_id("file")
                    .class("form-control blue-border")
                    .required(),
            ),
            Element::new("p")
                .test_id("file-errorMessage")
                .class("error-message"),
            Element::new("button")
                .attr("type", "submit")
                .id("btn-send-bill")
                .test_id("btn-send-bill")
                .class("btn btn-primary")
                .text("Envoyer"),
        ])
}

/// Receipt submission form
pub fn new_bill_ui(_data: &RouteData) -> Element {
    Element::new("div").class("layout").children([
        vertical_layout(true),
        Element::new("div").class("content").children([
            Element::new("div")
                .class("content-header")
                .child(Element::new("div").class("content-title").text("Envoyer une note de frais")),
            form(),
        ]),
    ])
}
