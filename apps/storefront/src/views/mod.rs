//! # Views Module
//!
//! One view model per page. Each view owns its state snapshot and exposes
//! the user's actions as async methods.
//!
//! ## View Organization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         View Families                                   │
//! │                                                                         │
//! │  Public                 Admin                    Customer              │
//! │  ──────                 ─────                    ────────              │
//! │  home::HomePage         admin_home::AdminHome    catalog::Catalog      │
//! │                         manage_sweets::          profile::Profile      │
//! │                           InventoryManager                             │
//! │                                                                         │
//! │  navbar::NavBar is drawn above every view.                             │
//! │                                                                         │
//! │  Every view is built from a ViewContext { api, session, ui }.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod admin_home;
pub mod catalog;
pub mod home;
pub mod manage_sweets;
pub mod navbar;
pub mod profile;

#[cfg(test)]
pub(crate) mod fake_api;

use std::sync::Arc;

use sweetshop_client::{SessionHolder, ShopApi, UiSettings};

pub use admin_home::{AdminHome, AdminHomeState, QuickAction, QUICK_ACTIONS};
pub use catalog::{Catalog, CatalogState};
pub use home::HomePage;
pub use manage_sweets::{InventoryManager, InventoryState};
pub use navbar::{NavBar, NavBarSnapshot, NavItem};
pub use profile::{Profile, ProfileState};

/// What every view is constructed from.
#[derive(Debug)]
pub struct ViewContext<A> {
    pub api: Arc<A>,
    pub session: SessionHolder,
    pub ui: UiSettings,
}

impl<A> Clone for ViewContext<A> {
    fn clone(&self) -> Self {
        ViewContext {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
            ui: self.ui.clone(),
        }
    }
}

impl<A: ShopApi> ViewContext<A> {
    pub fn new(api: A, session: SessionHolder, ui: UiSettings) -> Self {
        ViewContext {
            api: Arc::new(api),
            session,
            ui,
        }
    }
}

// =============================================================================
// Confirmation
// =============================================================================

/// Asked before a destructive action. Returning false aborts it.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
