use crate::dom::{Document, Element, NodeId};

/// Put the receipt referenced by `icon`'s `data-bill-url` into the modal's
/// body and show the modal. A missing URL still opens the modal, without an
/// image source. Returns false if the modal markup is absent.
pub fn show_receipt(document: &Document, icon: NodeId, modal_test_id: &str) -> bool {
    let url = document
        .attribute(icon, "data-bill-url")
        .filter(|u| !u.trim().is_empty());

    let Some(modal) = document.get_by_test_id(modal_test_id) else {
        tracing::warn!(modal = modal_test_id, "Receipt modal not found");
        return false;
    };

    let mut image = Element::new("img").attr("alt", "Bill");
    match &url {
        Some(url) => image = image.attr("src", url.clone()),
        None => tracing::debug!("Bill has no receipt URL"),
    }
    let proof = Element::new("div")
        .class("bill-proof-container")
        .test_id("bill-proof")
        .child(image);

    if let Some(body) = document.get_all_by_class(modal, "modal-body").first() {
        document.replace_children(*body, proof);
    }

    document.add_class(modal, "show");
    document.set_attribute(modal, "aria-hidden", "false");
    true
}
