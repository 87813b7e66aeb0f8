//! Vertical navigation bar

use crate::dom::Element;

pub const ICON_WINDOW_ID: &str = "layout-icon1";
pub const ICON_MAIL_ID: &str = "layout-icon2";
/// Class marking the icon of the active page
pub const ACTIVE_ICON_CLASS: &str = "active-icon";

/// Sidebar with the logo and, for employees, the two page icons
pub fn vertical_layout(with_icons: bool) -> Element {
    let mut bar = Element::new("div")
        .class("vertical-navbar")
        .child(Element::new("div").class("layout-title").text("Billed"));

    if with_icons {
        bar = bar
            .child(
                Element::new("div")
                    .id(ICON_WINDOW_ID)
                    .test_id("icon-window")
                    .class("layout-icon"),
            )
            .child(
                Element::new("div")
                    .id(ICON_MAIL_ID)
                    .test_id("icon-mail")
                    .class("layout-icon"),
            );
    }
    bar
}
