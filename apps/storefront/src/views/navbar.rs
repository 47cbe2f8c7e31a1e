//! Navigation bar shown above every view.

use serde::Serialize;
use tracing::info;

use sweetshop_client::SessionHolder;
use sweetshop_core::{NavLink, NavState, Route, LOGOUT_REDIRECT};

/// One rendered link with its highlight flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    #[serde(flatten)]
    pub link: NavLink,
    pub active: bool,
}

/// What the navigation bar draws for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavBarSnapshot {
    pub state: NavState,
    pub brand: NavLink,
    pub links: Vec<NavItem>,
    pub shows_logout: bool,
}

#[derive(Debug, Clone)]
pub struct NavBar {
    session: SessionHolder,
}

impl NavBar {
    pub fn new(session: SessionHolder) -> Self {
        NavBar { session }
    }

    /// Links for the current session, with `current_path` highlighted.
    pub async fn render(&self, current_path: &str) -> NavBarSnapshot {
        let state = self.session.nav_state().await;
        NavBarSnapshot {
            state,
            brand: state.brand(),
            links: state
                .links()
                .iter()
                .map(|link| NavItem {
                    link: *link,
                    active: link.is_active(current_path),
                })
                .collect(),
            shows_logout: state.shows_logout(),
        }
    }

    /// Clears the session. The caller navigates to the returned route.
    pub async fn logout(&self) -> Route {
        self.session.logout().await;
        info!(redirect = %LOGOUT_REDIRECT, "Logout");
        LOGOUT_REDIRECT
    }
}
