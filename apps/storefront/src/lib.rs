//! # Storefront
//!
//! View models for the Sweet Shop storefront, with no rendering attached.
//!
//! ## Module Organization
//! ```text
//! storefront/
//! ├── lib.rs          ◄─── You are here (tracing, App wiring, mounting)
//! ├── error.rs        ◄─── ViewError and notice text
//! ├── state/
//! │   ├── view_state.rs   ◄─── Arc<Mutex<T>> with with / with_mut
//! │   ├── notice.rs       ◄─── Self-expiring banners
//! │   └── fetch_seq.rs    ◄─── Generation counter for stale responses
//! └── views/
//!     ├── navbar.rs        ◄─── Links per session state, logout
//!     ├── home.rs          ◄─── Public landing page
//!     ├── admin_home.rs    ◄─── Inventory summary
//!     ├── manage_sweets.rs ◄─── Inventory CRUD, search, restock
//!     ├── catalog.rs       ◄─── Customer grid, debounced search, purchase
//!     └── profile.rs       ◄─── Account name and password
//! ```
//!
//! ## Mounting a Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "/admin/home" ──► resolve(path, session) ──► Render(AdminHome)        │
//! │                                          └──► Redirect(Login)          │
//! │                                                                         │
//! │  The target view is constructed and loaded once; its snapshot and the  │
//! │  navigation bar make up a Page.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod state;
pub mod views;

use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sweetshop_client::{ApiGateway, ClientConfig, ClientResult, SessionHolder, ShopApi};
use sweetshop_core::{resolve, Route, RouteDecision};

pub use error::{ViewError, ViewResult};
use views::{
    AdminHome, AdminHomeState, Catalog, CatalogState, HomePage, InventoryManager, InventoryState,
    NavBar, NavBarSnapshot, Profile, ProfileState, ViewContext,
};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,storefront=debug,sweetshop=debug,reqwest=warn";

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=sweetshop_client=trace` - Trace the gateway only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A form-only public page. Signing in happens outside these views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthPage {
    pub title: &'static str,
}

/// The snapshot of whichever view a path mounted.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "state", rename_all = "snake_case")]
pub enum MountedView {
    Home(HomePage),
    Login(AuthPage),
    Register(AuthPage),
    AdminHome(AdminHomeState),
    ManageSweets(InventoryState),
    UserDashboard(CatalogState),
    Profile(ProfileState),
}

/// One rendered location: where the router sent us, the bar, and the view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub decision: RouteDecision,
    pub nav: NavBarSnapshot,
    pub view: MountedView,
}

/// The storefront wired to one API and one session.
pub struct App<A> {
    ctx: ViewContext<A>,
    navbar: NavBar,
}

impl App<ApiGateway> {
    /// Builds the HTTP-backed app, restoring any session saved in `config`.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let session = match config.session() {
            Some(session) => {
                info!(email = %session.email, role = %session.role, "Restoring saved session");
                SessionHolder::with_session(session)
            }
            None => SessionHolder::new(),
        };
        let gateway = ApiGateway::new(&config.api, session.clone())?;
        Ok(App::new(ViewContext::new(gateway, session, config.ui.clone())))
    }
}

impl<A: ShopApi> App<A> {
    pub fn new(ctx: ViewContext<A>) -> Self {
        let navbar = NavBar::new(ctx.session.clone());
        App { ctx, navbar }
    }

    pub fn context(&self) -> &ViewContext<A> {
        &self.ctx
    }

    pub fn navbar(&self) -> &NavBar {
        &self.navbar
    }

    /// Resolves `path` for the current session and mounts the target view.
    ///
    /// Load failures end up in the view's own notice or error field, so
    /// mounting itself never fails.
    pub async fn mount(&self, path: &str) -> Page {
        let session = self.ctx.session.current().await;
        let decision = resolve(path, session.as_ref());
        let route = decision.target();
        debug!(path = %path, ?decision, "Mounting route");

        let view = self.mount_route(route).await;
        Page {
            decision,
            nav: self.navbar.render(route.path()).await,
            view,
        }
    }

    async fn mount_route(&self, route: Route) -> MountedView {
        let ctx = self.ctx.clone();
        match route {
            Route::Home => MountedView::Home(HomePage::mount(&ctx.session).await),
            Route::Login => MountedView::Login(AuthPage { title: "Login" }),
            Route::Register => MountedView::Register(AuthPage { title: "Register" }),
            Route::AdminHome => {
                let view = AdminHome::new(ctx);
                view.load().await;
                MountedView::AdminHome(view.state())
            }
            Route::ManageSweets => {
                let view = InventoryManager::new(ctx);
                if let Err(e) = view.list().await {
                    debug!(error = %e, "Inventory mounted without data");
                }
                MountedView::ManageSweets(view.state())
            }
            Route::UserDashboard => {
                let view = Catalog::new(ctx);
                if let Err(e) = view.mount().await {
                    debug!(error = %e, "Catalog mounted without data");
                }
                MountedView::UserDashboard(view.state())
            }
            Route::Profile => {
                let view = Profile::new(ctx);
                if let Err(e) = view.fetch_self().await {
                    debug!(error = %e, "Profile mounted without data");
                }
                MountedView::Profile(view.state())
            }
        }
    }

    /// Logs out and mounts the page logout lands on.
    pub async fn logout(&self) -> Page {
        let route = self.navbar.logout().await;
        self.mount(route.path()).await
    }
}
