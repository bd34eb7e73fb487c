//! Embedded pages and SEO files.
//!
//! Everything is compiled into the binary; nothing is read from disk at
//! request time.

use crate::response::{ContentType, Response};
use crate::{Request, Status};

pub const LANDING: &str = include_str!("../templates/landing.html");
pub const CALCULATOR: &str = include_str!("../templates/calculator.html");
pub const NOT_FOUND: &str = include_str!("../templates/errors/404.html");
pub const SERVER_ERROR: &str = include_str!("../templates/errors/500.html");
pub const ROBOTS_TXT: &str = include_str!("../static/robots.txt");
pub const SITEMAP_XML: &str = include_str!("../static/sitemap.xml");

pub async fn landing(_req: Request) -> Response {
    Response::html(LANDING)
}

pub async fn calculator(_req: Request) -> Response {
    Response::html(CALCULATOR)
}

pub async fn robots_txt(_req: Request) -> Response {
    Response::text(ROBOTS_TXT)
}

pub async fn sitemap_xml(_req: Request) -> Response {
    Response::builder().bytes(ContentType::Xml, SITEMAP_XML.as_bytes().to_vec())
}

/// Body for the errors the router answers itself. 404 and 500 get their
/// pages; anything else is a bare status.
pub fn error_page(status: Status) -> Response {
    let page = match status {
        Status::NotFound => NOT_FOUND,
        Status::InternalServerError => SERVER_ERROR,
        other => return Response::status(other),
    };
    Response::builder().status(status).html(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_pages_carry_their_status() {
        let not_found = error_page(Status::NotFound);
        assert_eq!(not_found.status_code(), 404);
        assert_eq!(not_found.body(), NOT_FOUND.as_bytes());

        let failed = error_page(Status::InternalServerError);
        assert_eq!(failed.status_code(), 500);
        assert_eq!(failed.header("content-type"), Some("text/html; charset=utf-8"));

        let too_large = error_page(Status::ContentTooLarge);
        assert_eq!(too_large.status_code(), 413);
        assert!(too_large.body().is_empty());
    }

    #[test]
    fn sitemap_lists_the_public_pages() {
        assert!(SITEMAP_XML.contains("/calculator"));
        assert!(ROBOTS_TXT.contains("Sitemap:"));
    }
}
