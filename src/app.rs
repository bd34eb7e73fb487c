//! The route table.

use std::sync::Arc;

use crate::chart::ChartEngine;
use crate::config::Config;
use crate::{Request, Router, api, health, pages};

/// Every route the service answers, wired to `engine`.
pub fn router(config: &Config, engine: Arc<ChartEngine>) -> Router {
    Router::new()
        .max_body_bytes(config.max_body_bytes)
        .errors(pages::error_page)
        .get("/",            pages::landing)
        .get("/calculator",  pages::calculator)
        .get("/robots.txt",  pages::robots_txt)
        .get("/sitemap.xml", pages::sitemap_xml)
        .get("/healthz",     health::liveness)
        .get("/readyz",      health::readiness)
        .post("/api/calculate", move |req: Request| api::calculate(Arc::clone(&engine), req))
}
