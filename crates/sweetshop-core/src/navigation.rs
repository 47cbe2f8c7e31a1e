//! # Navigation Module
//!
//! Role-conditional navigation bar and path → view routing.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Navigation States                                    │
//! │                                                                         │
//! │                       login (role = USER)                               │
//! │   ┌─────────────────┐ ───────────────────────► ┌───────────────────┐   │
//! │   │ Unauthenticated │                          │ AuthenticatedUser │   │
//! │   │                 │ ◄─────── logout ──────── │                   │   │
//! │   │ Home Login      │   (→ /login, always)     │ Home Dashboard    │   │
//! │   │ Register        │                          │ Profile  [Logout] │   │
//! │   └─────────────────┘                          └───────────────────┘   │
//! │        ▲     │                                                          │
//! │ logout │     │ login (role = ADMIN)                                     │
//! │        │     ▼                                                          │
//! │   ┌────────────────────┐                                               │
//! │   │ AuthenticatedAdmin │  Admin Home, Manage Sweets  [Logout]          │
//! │   └────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state is derived from the session every time; it is never stored.

use serde::{Serialize, Serializer};

use crate::types::{Role, Session};

// =============================================================================
// Routes
// =============================================================================

/// Every path the storefront renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    AdminHome,
    ManageSweets,
    UserDashboard,
    Profile,
}

/// The three view families a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Public,
    Admin,
    Customer,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::AdminHome,
        Route::ManageSweets,
        Route::UserDashboard,
        Route::Profile,
    ];

    pub const fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::AdminHome => "/admin/home",
            Route::ManageSweets => "/admin/manage-sweets",
            Route::UserDashboard => "/user/dashboard",
            Route::Profile => "/profile",
        }
    }

    /// Matches a location path, ignoring any query string, fragment or
    /// trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    pub const fn view(&self) -> View {
        match self {
            Route::Home | Route::Login | Route::Register => View::Public,
            Route::AdminHome | Route::ManageSweets => View::Admin,
            Route::UserDashboard | Route::Profile => View::Customer,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

// =============================================================================
// Navigation Links
// =============================================================================

/// One entry of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    #[serde(rename = "path")]
    pub route: Route,
}

impl NavLink {
    const fn new(label: &'static str, route: Route) -> Self {
        NavLink { label, route }
    }

    pub fn path(&self) -> &'static str {
        self.route.path()
    }

    /// Highlighting is exact path equality, nothing more.
    pub fn is_active(&self, current_path: &str) -> bool {
        self.path() == current_path
    }
}

static PUBLIC_LINKS: [NavLink; 3] = [
    NavLink::new("Home", Route::Home),
    NavLink::new("Login", Route::Login),
    NavLink::new("Register", Route::Register),
];

static ADMIN_LINKS: [NavLink; 2] = [
    NavLink::new("Admin Home", Route::AdminHome),
    NavLink::new("Manage Sweets", Route::ManageSweets),
];

static USER_LINKS: [NavLink; 3] = [
    NavLink::new("Home", Route::Home),
    NavLink::new("Dashboard", Route::UserDashboard),
    NavLink::new("Profile", Route::Profile),
];

// =============================================================================
// Navigation State
// =============================================================================

/// Which navigation bar to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    Unauthenticated,
    AuthenticatedUser,
    AuthenticatedAdmin,
}

/// Where logout always lands, whichever view triggered it.
pub const LOGOUT_REDIRECT: Route = Route::Login;

impl NavState {
    /// Derives the state from the current session.
    ///
    /// A missing session and a guest-role session are the same thing here.
    pub fn from_session(session: Option<&Session>) -> Self {
        match session.map(|s| s.role) {
            None | Some(Role::Guest) => NavState::Unauthenticated,
            Some(Role::User) => NavState::AuthenticatedUser,
            Some(Role::Admin) => NavState::AuthenticatedAdmin,
        }
    }

    /// The brand link at the left of the bar.
    pub fn brand(&self) -> NavLink {
        match self {
            NavState::AuthenticatedAdmin => NavLink::new("SweetShop Admin", Route::AdminHome),
            NavState::Unauthenticated | NavState::AuthenticatedUser => {
                NavLink::new("SweetShop", Route::Home)
            }
        }
    }

    pub fn links(&self) -> &'static [NavLink] {
        match self {
            NavState::Unauthenticated => &PUBLIC_LINKS,
            NavState::AuthenticatedUser => &USER_LINKS,
            NavState::AuthenticatedAdmin => &ADMIN_LINKS,
        }
    }

    pub fn shows_logout(&self) -> bool {
        match self {
            NavState::Unauthenticated => false,
            NavState::AuthenticatedUser | NavState::AuthenticatedAdmin => true,
        }
    }

    /// Where this state lands after login or on an unknown path.
    pub fn landing(&self) -> Route {
        match self {
            NavState::AuthenticatedAdmin => Route::AdminHome,
            NavState::Unauthenticated | NavState::AuthenticatedUser => Route::Home,
        }
    }
}

// =============================================================================
// View Routing
// =============================================================================

/// Outcome of resolving a path against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "route", rename_all = "snake_case")]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

impl RouteDecision {
    /// The route that ends up on screen.
    pub fn target(&self) -> Route {
        match self {
            RouteDecision::Render(route) | RouteDecision::Redirect(route) => *route,
        }
    }
}

/// Maps a location path to the view to render, or to a redirect.
///
/// ## Rules
/// ```text
/// path              Unauthenticated   AuthenticatedUser   AuthenticatedAdmin
/// ───────────────   ───────────────   ─────────────────   ──────────────────
/// /home             render            render              render
/// /login /register  render            → /home             → /admin/home
/// /admin/*          → /login          → /home             render
/// /user/dashboard   → /login          render              → /admin/home
/// /profile          → /login          render              render
/// /                 → /home           → /home             → /home
/// unknown           → landing         → landing           → landing
/// ```
pub fn resolve(path: &str, session: Option<&Session>) -> RouteDecision {
    let state = NavState::from_session(session);

    if path.trim_end_matches('/').is_empty() {
        return RouteDecision::Redirect(Route::Home);
    }

    let Some(route) = Route::from_path(path) else {
        return RouteDecision::Redirect(state.landing());
    };

    match (route.view(), state) {
        (View::Public, NavState::Unauthenticated) => RouteDecision::Render(route),
        (View::Public, _) if route == Route::Home => RouteDecision::Render(route),
        (View::Public, _) => RouteDecision::Redirect(state.landing()),

        (View::Admin, NavState::AuthenticatedAdmin) => RouteDecision::Render(route),
        (View::Admin, NavState::AuthenticatedUser) => RouteDecision::Redirect(Route::Home),
        (View::Admin, NavState::Unauthenticated) => RouteDecision::Redirect(Route::Login),

        (View::Customer, NavState::Unauthenticated) => RouteDecision::Redirect(Route::Login),
        (View::Customer, NavState::AuthenticatedUser) => RouteDecision::Render(route),
        (View::Customer, NavState::AuthenticatedAdmin) => match route {
            Route::Profile => RouteDecision::Render(route),
            _ => RouteDecision::Redirect(Route::AdminHome),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
