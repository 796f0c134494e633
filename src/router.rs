//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler, and the handler gets the router's shared state.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// One radix tree per HTTP method. Build it once at startup with the shared
/// state every handler needs, then pass it to
/// [`Server::serve`](crate::Server::serve). Each [`Router::on`] call returns
/// `self` so registrations chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
}

/// Outcome of matching a method + path against the registered routes.
pub(crate) enum Lookup<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    /// The path exists, but only under these methods.
    MethodNotAllowed(Vec<Method>),
    /// `OPTIONS` on a path with no explicit `OPTIONS` route.
    Options(Vec<Method>),
    NotFound,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Routes one request and produces one response.
    ///
    /// Unknown paths are `404` with no body. A path registered only under other
    /// methods is `405` with an `allow` header.
    ///
    /// `HEAD` runs the `GET` handler and drops the body. `OPTIONS` answers `200`
    /// with the `allow` header. Either can be overridden with an explicit route.
    pub async fn handle(&self, mut req: Request) -> Response {
        let head = req.method() == Method::Head.as_str();
        match self.lookup(req.method(), req.path()) {
            Lookup::Found(handler, params) => {
                req.params = params;
                let mut res = handler.call(self.state.clone(), req).await;
                if head {
                    res.body = Bytes::new();
                }
                res
            }
            Lookup::MethodNotAllowed(allowed) => Response::builder()
                .status(Status::MethodNotAllowed)
                .header("allow", &allow_header(&allowed))
                .no_body(),
            Lookup::Options(allowed) => Response::builder()
                .header("allow", &allow_header(&allowed))
                .no_body(),
            Lookup::NotFound => Response::status(Status::NotFound),
        }
    }

    pub(crate) fn lookup(&self, method: &str, path: &str) -> Lookup<S> {
        let path = normalize(path);
        let method = method.parse::<Method>().ok();

        if let Some(m) = method {
            if let Some(found) = self.find(m, path) {
                return found;
            }
            if m == Method::Head {
                if let Some(found) = self.find(Method::Get, path) {
                    return found;
                }
            }
        }

        let allowed = self.allowed(path);
        if allowed.is_empty() {
            Lookup::NotFound
        } else if method == Some(Method::Options) {
            Lookup::Options(allowed)
        } else {
            Lookup::MethodNotAllowed(allowed)
        }
    }

    /// Matches against the raw path; parameter values are percent-decoded.
    fn find(&self, method: Method, path: &str) -> Option<Lookup<S>> {
        let matched = self.routes.get(&method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
            .collect();
        Some(Lookup::Found(Arc::clone(matched.value), params))
    }

    /// Every method `path` answers to, sorted. Empty if the path is unknown.
    fn allowed(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if allowed.is_empty() {
            return allowed;
        }
        if allowed.contains(&Method::Get) && !allowed.contains(&Method::Head) {
            allowed.push(Method::Head);
        }
        if !allowed.contains(&Method::Options) {
            allowed.push(Method::Options);
        }
        allowed.sort();
        allowed
    }
}

fn allow_header(allowed: &[Method]) -> String {
    allowed.iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drops a single trailing slash so `/customers/` routes like `/customers`.
fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Hits = Arc<std::sync::atomic::AtomicUsize>;

    async fn echo_id(hits: Hits, req: Request) -> Response {
        hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Response::json(req.param("id").unwrap_or_default().to_owned())
    }

    async fn created(_: Hits, _: Request) -> Status {
        Status::Created
    }

    fn router() -> (Router<Hits>, Hits) {
        let hits = Hits::default();
        let router = Router::new(Arc::clone(&hits))
            .on(Method::Get, "/items/{id}", echo_id)
            .on(Method::Delete, "/items/{id}", echo_id)
            .on(Method::Post, "/items", created);
        (router, hits)
    }

    fn request(method: &str, path: &str) -> Request {
        Request::new(method, path, Vec::new(), Bytes::new())
    }

    #[tokio::test]
    async fn extracts_path_params_and_passes_state() {
        let (router, hits) = router();
        let res = router.handle(request("GET", "/items/42")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), b"42");
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn trailing_slash_is_ignored() {
        let (router, _) = router();
        let res = router.handle(request("POST", "/items/")).await;
        assert_eq!(res.status_code(), Status::Created);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let (router, _) = router();
        let res = router.handle(request("GET", "/nothing")).await;
        assert_eq!(res.status_code(), Status::NotFound);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let (router, hits) = router();
        let res = router.handle(request("PUT", "/items/7")).await;
        assert_eq!(res.status_code(), Status::MethodNotAllowed);
        assert_eq!(res.header("allow"), Some("DELETE, GET, HEAD, OPTIONS"));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_method_on_known_path_is_405() {
        let (router, _) = router();
        let res = router.handle(request("BREW", "/items")).await;
        assert_eq!(res.status_code(), Status::MethodNotAllowed);
        assert_eq!(res.header("allow"), Some("OPTIONS, POST"));
    }

    #[tokio::test]
    async fn path_params_are_percent_decoded() {
        let (router, _) = router();
        let res = router.handle(request("GET", "/items/does%20Not")).await;
        assert_eq!(res.body(), b"does Not");
        let res = router.handle(request("GET", "/items/a%22b")).await;
        assert_eq!(res.body(), b"a\"b");
    }

    #[tokio::test]
    async fn head_runs_get_handler_without_body() {
        let (router, hits) = router();
        let res = router.handle(request("HEAD", "/items/42")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert!(res.body().is_empty());
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn head_without_get_route_is_405() {
        let (router, _) = router();
        let res = router.handle(request("HEAD", "/items")).await;
        assert_eq!(res.status_code(), Status::MethodNotAllowed);
        assert_eq!(res.header("allow"), Some("OPTIONS, POST"));
    }

    #[tokio::test]
    async fn options_lists_allowed_methods() {
        let (router, hits) = router();
        let res = router.handle(request("OPTIONS", "/items/7")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("allow"), Some("DELETE, GET, HEAD, OPTIONS"));
        assert!(res.body().is_empty());
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 0);

        let res = router.handle(request("OPTIONS", "/nothing")).await;
        assert_eq!(res.status_code(), Status::NotFound);
    }

    #[test]
    fn root_path_survives_normalization() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/a/"), "/a");
        assert_eq!(normalize("/a"), "/a");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let (router, _) = router();
        let _ = router.on(Method::Get, "/items/{id}", echo_id);
    }
}
