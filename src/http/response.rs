//! Response construction.
//!
//! # Responsibilities
//! - Map page loads onto status codes
//! - Render sitemap bodies with the right content type
//! - Uniform JSON error bodies: `{"error": "..."}`

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::pages::PageLoad;
use crate::sitemap::{render_xml, SitemapEntry};

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// `Ready` → 200 with the page as JSON; `Unavailable` → 503.
pub fn page_response<P: Serialize>(load: PageLoad<P>) -> Response {
    match load {
        PageLoad::Ready(page) => Json(page).into_response(),
        PageLoad::Unavailable { .. } => error_response(StatusCode::SERVICE_UNAVAILABLE, "content unavailable"),
    }
}

pub fn sitemap_xml_response(entries: &[SitemapEntry]) -> Response {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_xml(entries),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_status() {
        assert_eq!(page_response(PageLoad::Ready(json!({"title": "x"}))).status(), StatusCode::OK);
        assert_eq!(
            page_response::<()>(PageLoad::Unavailable { page: "about" }).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_sitemap_content_type() {
        let response = sitemap_xml_response(&[]);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml; charset=utf-8"
        );
    }
}
