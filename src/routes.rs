//! Route table for the orders client — path to view mapping plus the
//! authentication gate.
//!
//! DESIGN
//! ======
//! The table is static configuration. Matching is segment-by-segment;
//! among sibling routes a match with more static segments wins, so
//! `/orders/create` never lands on `/orders/:id`. The only guard is the
//! session's authenticated flag: decoded claims play no part in routing.

use std::collections::BTreeMap;
use std::fmt;

use crate::session::Session;

/// Path every guarded route redirects to.
pub const SIGN_IN_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SignIn,
    /// Container for the order views.
    Orders,
    CreateOrder,
    OrderList,
    OrderDetails,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SignIn => "SignIn",
            Self::Orders => "Orders",
            Self::CreateOrder => "CreateOrder",
            Self::OrderList => "OrderList",
            Self::OrderDetails => "OrderDetails",
        };
        f.write_str(name)
    }
}

/// One entry of the route table. Child paths are relative to the parent.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
    pub requires_auth: bool,
    pub children: Vec<Route>,
}

impl Route {
    #[must_use]
    pub fn new(path: &'static str, view: View) -> Self {
        Self { path, view, requires_auth: false, children: Vec::new() }
    }

    /// Require an authenticated session for this route and its children.
    #[must_use]
    pub fn guarded(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }

    fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// A resolved path: the chain of views to render, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub views: Vec<View>,
    pub params: BTreeMap<String, String>,
    pub requires_auth: bool,
    static_segments: usize,
}

impl RouteMatch {
    /// The innermost matched view.
    #[must_use]
    pub fn view(&self) -> View {
        // Every match holds at least the view of the route that produced it.
        self.views.last().copied().unwrap_or(View::SignIn)
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// What the router does with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(RouteMatch),
    Redirect(&'static str),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    /// The orders application: sign-in at `/`, order views under `/orders`.
    fn default() -> Self {
        Self::new(vec![
            Route::new("/", View::SignIn),
            Route::new("/orders", View::Orders).guarded().with_children(vec![
                Route::new("create", View::CreateOrder),
                Route::new("list", View::OrderList),
                Route::new(":id", View::OrderDetails),
            ]),
        ])
    }
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Match `path` against the table. Query strings and fragments are
    /// ignored, as are repeated and trailing slashes.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        best_match(&self.routes, &segments, false)
    }

    /// Resolve `path` and apply the authentication gate.
    #[must_use]
    pub fn navigate(&self, path: &str, session: &Session) -> Navigation {
        match self.resolve(path) {
            None => Navigation::NotFound,
            Some(m) if m.requires_auth && !session.is_authenticated => {
                tracing::debug!(path, "unauthenticated navigation redirected to sign-in");
                Navigation::Redirect(SIGN_IN_PATH)
            }
            Some(m) => Navigation::Render(m),
        }
    }
}

fn best_match(routes: &[Route], segments: &[&str], inherited_auth: bool) -> Option<RouteMatch> {
    routes
        .iter()
        .filter_map(|route| match_route(route, segments, inherited_auth))
        .reduce(|best, next| if next.static_segments > best.static_segments { next } else { best })
}

fn match_route(route: &Route, segments: &[&str], inherited_auth: bool) -> Option<RouteMatch> {
    let mut params = BTreeMap::new();
    let mut static_segments = 0;
    let mut consumed = 0;

    for pattern in route.segments() {
        let actual = segments.get(consumed)?;
        if let Some(name) = pattern.strip_prefix(':') {
            params.insert(name.to_owned(), (*actual).to_owned());
        } else if pattern == *actual {
            static_segments += 1;
        } else {
            return None;
        }
        consumed += 1;
    }

    let requires_auth = inherited_auth || route.requires_auth;
    let rest = &segments[consumed..];

    if rest.is_empty() {
        return Some(RouteMatch { views: vec![route.view], params, requires_auth, static_segments });
    }

    let child = best_match(&route.children, rest, requires_auth)?;
    let mut views = Vec::with_capacity(child.views.len() + 1);
    views.push(route.view);
    views.extend(child.views);
    params.extend(child.params);
    Some(RouteMatch {
        views,
        params,
        requires_auth: child.requires_auth,
        static_segments: static_segments + child.static_segments,
    })
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
