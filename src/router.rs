//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Around every handler the
//! router applies the request body limit, CORS, tracing and panic recovery,
//! and it answers the requests no handler owns: `404`, `405`, `413` and
//! `OPTIONS` preflights.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use matchit::Router as MatchitRouter;
use tracing::{Instrument, error, warn};

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{cors, trace};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Default cap on request bodies: 16 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Renders the responses the router produces on its own.
pub type ErrorRenderer = fn(Status) -> Response;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve),
/// or drive it directly with [`Router::handle`]. Each registration returns
/// `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    max_body_bytes: usize,
    render_error: ErrorRenderer,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            render_error: Response::status,
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with a route already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// `GET` route. Also answers `HEAD` unless a `HEAD` route is registered.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Largest request body accepted, in bytes. Larger bodies get `413`.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Replaces the bare-status responses for `404`, `405`, `413` and
    /// `500` with rendered ones. The router still sets the status and any
    /// protocol headers.
    pub fn errors(mut self, render: ErrorRenderer) -> Self {
        self.render_error = render;
        self
    }

    /// Routes one request and produces one response. Never fails: every
    /// problem becomes a status code.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let started = Instant::now();
        let span = trace::span(req.method(), req.uri().path());
        let head = req.method() == http::Method::HEAD;

        async move {
            let mut response = self.respond(req).await;
            if head {
                response.strip_body();
            }
            cors::apply(&mut response);
            trace::completed(response.status_code(), started);
            response.into_inner()
        }
        .instrument(span)
        .await
    }

    async fn respond<B>(&self, req: http::Request<B>) -> Response
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let path = req.uri().path().to_owned();
        let Ok(method) = Method::try_from(req.method()) else {
            return self.not_routed(&path);
        };

        let Some((handler, params)) = self.lookup(method, &path) else {
            if method == Method::Options {
                let allowed = self.allowed(&path);
                if !allowed.is_empty() {
                    return cors::preflight(&allowed, header(&req, "access-control-request-headers"));
                }
            }
            return self.not_routed(&path);
        };

        if declared_length(&req).is_some_and(|len| len > self.max_body_bytes) {
            return self.error(Status::ContentTooLarge);
        }

        let (parts, body) = req.into_parts();
        let body = match Limited::new(body, self.max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                return self.error(Status::ContentTooLarge);
            }
            Err(e) => {
                warn!("failed to read request body: {e}");
                return Response::status(Status::BadRequest);
            }
        };

        let request = Request::new(method, path, parts.headers, body, params);

        // A panicking handler takes down its own task, not the connection.
        match tokio::spawn(handler.call(request)).await {
            Ok(response) => response,
            Err(e) => {
                error!("handler failed: {e}");
                self.error(Status::InternalServerError)
            }
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        self.find(method, path).or_else(|| match method {
            Method::Head => self.find(Method::Get, path),
            _ => None,
        })
    }

    fn find(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Comma-separated methods with a route for `path`, or an empty string.
    fn allowed(&self, path: &str) -> String {
        let mut methods: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        if methods.is_empty() {
            return String::new();
        }
        if methods.contains(&Method::Get) {
            methods.push(Method::Head);
        }
        methods.push(Method::Options);
        methods.sort();
        methods.dedup();
        methods.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// `405` with an `allow` header when another method owns `path`, `404` otherwise.
    fn not_routed(&self, path: &str) -> Response {
        let allowed = self.allowed(path);
        if allowed.is_empty() {
            return self.error(Status::NotFound);
        }
        let mut response = self.error(Status::MethodNotAllowed);
        response.set_header("allow", allowed);
        response
    }

    fn error(&self, status: Status) -> Response {
        let mut response = (self.render_error)(status);
        response.status = status.into();
        response
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn header<'r, B>(req: &'r http::Request<B>, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn declared_length<B>(req: &http::Request<B>) -> Option<usize> {
    header(req, "content-length").and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Empty;

    async fn echo(req: Request) -> Response {
        Response::json(req.body().to_vec())
    }

    async fn user(req: Request) -> String {
        format!("user {}", req.param("id").unwrap_or("?"))
    }

    async fn boom(_req: Request) -> Response {
        panic!("boom")
    }

    fn router() -> Router {
        Router::new()
            .max_body_bytes(8)
            .get("/users/{id}", user)
            .post("/echo", echo)
            .get("/boom", boom)
    }

    fn request(method: &str, path: &str, body: &'static str) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    async fn body_of(response: http::Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn routes_with_path_params() {
        let response = router().handle(request("GET", "/users/42", "")).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body_of(response).await, "user 42");
    }

    #[tokio::test]
    async fn head_falls_back_to_get_without_body() {
        let response = router().handle(request("HEAD", "/users/42", "")).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-length"], "7");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let response = router().handle(request("DELETE", "/echo", "")).await;
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["allow"], "OPTIONS, POST");

        let response = router().handle(request("GET", "/echo", "")).await;
        assert_eq!(response.status(), 405);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let response = router().handle(request("GET", "/nope", "")).await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn body_limit_applies_to_streamed_and_declared_lengths() {
        let ok = router().handle(request("POST", "/echo", "12345678")).await;
        assert_eq!(ok.status(), 200);

        let streamed = router().handle(request("POST", "/echo", "123456789")).await;
        assert_eq!(streamed.status(), 413);

        let declared = http::Request::builder()
            .method("POST")
            .uri("/echo")
            .header("content-length", "1000")
            .body(Empty::<Bytes>::new())
            .unwrap();
        assert_eq!(router().handle(declared).await.status(), 413);
    }

    #[tokio::test]
    async fn panicking_handler_is_500() {
        let response = router().handle(request("GET", "/boom", "")).await;
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn preflight_and_cors_headers() {
        let response = router().handle(request("OPTIONS", "/echo", "")).await;
        assert_eq!(response.status(), 204);
        assert_eq!(response.headers()[cors::ALLOW_METHODS], "OPTIONS, POST");
        assert_eq!(response.headers()[cors::ALLOW_ORIGIN], "*");

        let response = router().handle(request("OPTIONS", "/nope", "")).await;
        assert_eq!(response.status(), 404);
        assert_eq!(response.headers()[cors::ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn rendered_errors_keep_the_status() {
        fn render(status: Status) -> Response {
            Response::html(format!("<h1>{}</h1>", u16::from(status)))
        }
        let response = router().errors(render).handle(request("GET", "/nope", "")).await;
        assert_eq!(response.status(), 404);
        assert_eq!(body_of(response).await, "<h1>404</h1>");
    }
}
