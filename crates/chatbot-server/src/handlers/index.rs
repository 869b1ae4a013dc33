use actix_web::{web, HttpResponse, Responder};

use crate::state::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../static/index.html");
const TITLE_PLACEHOLDER: &str = "{{TITLE}}";

pub fn render_index(title: &str) -> String {
    INDEX_TEMPLATE.replace(TITLE_PLACEHOLDER, &escape_html(title))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub async fn handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_index(&state.title))
}
