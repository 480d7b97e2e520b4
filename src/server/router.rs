//! Path-based request routing
//!
//! Routes are held in a fixed table and evaluated in order; the first route
//! whose matcher accepts the path handles the request. Paths no route
//! accepts get `404 Not Found`.

use crate::config::Config;
use crate::files::FileStore;
use crate::http::request::Request;
use crate::http::response::Response;

const WELCOME: &str = "Welcome!";
const USER_AGENT_NOT_FOUND: &str = "User-Agent not found";

/// How a route decides whether it accepts a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// Path starts with the given string
    Prefix(&'static str),
    /// Path equals the given string
    Exact(&'static str),
}

impl PathMatch {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Prefix(prefix) => path.starts_with(prefix),
            PathMatch::Exact(exact) => path == *exact,
        }
    }
}

/// The handler a route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Files,
    Echo,
    UserAgent,
    Welcome,
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub matcher: PathMatch,
    pub endpoint: Endpoint,
}

/// Route table in priority order.
pub static ROUTES: [Route; 4] = [
    Route {
        matcher: PathMatch::Prefix("/files"),
        endpoint: Endpoint::Files,
    },
    Route {
        matcher: PathMatch::Prefix("/echo"),
        endpoint: Endpoint::Echo,
    },
    Route {
        matcher: PathMatch::Prefix("/user-agent"),
        endpoint: Endpoint::UserAgent,
    },
    Route {
        matcher: PathMatch::Exact("/"),
        endpoint: Endpoint::Welcome,
    },
];

/// Match a request path against the route table in order
pub fn match_route(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.matcher.matches(path))
}

/// Dispatches parsed requests to their handlers.
#[derive(Debug, Clone)]
pub struct Router {
    store: FileStore,
}

impl Router {
    pub fn new(config: &Config) -> Self {
        Self {
            store: FileStore::new(config.directory.clone()),
        }
    }

    pub fn with_store(store: FileStore) -> Self {
        Self { store }
    }

    /// Produce the response for a request.
    ///
    /// A matched route that yields nothing (a missing file) answers
    /// `404 Not Found` without trying later routes.
    pub async fn route(&self, request: &Request) -> Response {
        let Some(route) = match_route(&request.path) else {
            tracing::debug!(path = %request.path, "No route matched");
            return Response::not_found();
        };

        tracing::debug!(
            path = %request.path,
            endpoint = ?route.endpoint,
            "Matched route"
        );

        self.dispatch(route.endpoint, request)
            .await
            .unwrap_or_else(Response::not_found)
    }

    async fn dispatch(&self, endpoint: Endpoint, request: &Request) -> Option<Response> {
        match endpoint {
            Endpoint::Files => self.store.handle(request).await,
            Endpoint::Echo => Some(Response::ok(echo_text(&request.path))),
            Endpoint::UserAgent => Some(Response::ok(
                request.user_agent().unwrap_or(USER_AGENT_NOT_FOUND),
            )),
            Endpoint::Welcome => Some(Response::ok(WELCOME)),
        }
    }
}

/// Everything after the second `/`-delimited segment, rejoined with `/`.
fn echo_text(path: &str) -> String {
    path.split('/').skip(2).collect::<Vec<_>>().join("/")
}
