//! Login page. Authentication itself is handled by the host shell.

use super::RouteData;
use crate::dom::Element;

fn login_form(role: &str, title: &str) -> Element {
    Element::new("form")
        .test_id(format!("form-{}", role))
        .class("form-signin")
        .children([
            Element::new("h2").class("h3 mb-3 font-weight-normal").text(title),
            Element::new("input")
                .attr("type", "email")
                .test_id(format!("{}-email-input", role))
                .class("form-control")
                .required(),
            Element::new("input")
                .attr("type", "password")
                .test_id(format!("{}-password-input", role))
                .class("form-control")
                .required(),
            Element::new("button")
                .attr("type", "submit")
                .test_id(format!("{}-login-button", role))
                .class("btn btn-lg btn-primary btn-block")
                .text("Se connecter"),
        ])
}

pub fn login_ui(_data: &RouteData) -> Element {
    Element::new("div").class("login-page").children([
        Element::new("div").class("login-title").text("Billed"),
        login_form("employee", "Employé"),
        login_form("admin", "Administration"),
    ])
}
