//! Loading, error and not-found pages

use super::layout::vertical_layout;
use crate::dom::Element;

pub fn loading_page() -> Element {
    Element::new("div").class("layout").children([
        vertical_layout(true),
        Element::new("div")
            .id("loading")
            .test_id("loading")
            .class("content")
            .text("Loading..."),
    ])
}

pub fn error_page(message: &str) -> Element {
    Element::new("div").class("layout").children([
        vertical_layout(true),
        Element::new("div")
            .class("content")
            .child(Element::new("div").test_id("error-message").text(message)),
    ])
}

pub fn not_found_page(path: &str) -> Element {
    Element::new("div")
        .class("not-found")
        .test_id("not-found")
        .children([
            Element::new("h1").text("Page introuvable"),
            Element::new("p").text(format!("Aucune page ne correspond à {:?}.", path)),
        ])
}
