//! # Admin Home
//!
//! Inventory summary cards, the most recent sweets, and the quick-action
//! grid.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load()                                                                 │
//! │    loading = true                                                       │
//! │    GET /sweets ──► InventoryStats + first five sweets                  │
//! │    loading = false                                                      │
//! │                                                                         │
//! │  A failed fetch is logged; the cards keep their previous numbers.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info};

use sweetshop_client::ShopApi;
use sweetshop_core::stats::recent_sweets;
use sweetshop_core::{InventoryStats, Route, Sweet};

use crate::error::ViewResult;
use crate::state::ViewState;
use crate::views::ViewContext;

/// A card in the quick-action grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Orders, reports and users have no view yet; the router sends them to
    /// the admin landing page.
    pub path: &'static str,
}

pub static QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        title: "Manage Sweets",
        description: "Add, edit, or delete sweets from inventory",
        icon: "🍬",
        path: "/admin/manage-sweets",
    },
    QuickAction {
        title: "View Orders",
        description: "Check customer orders and order history",
        icon: "📦",
        path: "/admin/orders",
    },
    QuickAction {
        title: "Inventory Report",
        description: "View detailed inventory and stock reports",
        icon: "📊",
        path: "/admin/reports",
    },
    QuickAction {
        title: "User Management",
        description: "Manage user accounts and permissions",
        icon: "👥",
        path: "/admin/users",
    },
];

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminHomeState {
    pub loading: bool,
    pub stats: InventoryStats,
    /// Formatted with the configured currency symbol.
    pub total_value_text: String,
    pub recent_sweets: Vec<Sweet>,
    pub quick_actions: &'static [QuickAction],
}

pub struct AdminHome<A> {
    ctx: ViewContext<A>,
    state: ViewState<AdminHomeState>,
}

impl<A: ShopApi> AdminHome<A> {
    pub fn new(ctx: ViewContext<A>) -> Self {
        let initial = AdminHomeState {
            loading: true,
            total_value_text: InventoryStats::default()
                .total_value
                .format_with(&ctx.ui.currency_symbol),
            quick_actions: &QUICK_ACTIONS,
            ..AdminHomeState::default()
        };
        AdminHome {
            ctx,
            state: ViewState::new(initial),
        }
    }

    pub fn state(&self) -> AdminHomeState {
        self.state.snapshot()
    }

    /// Where a quick-action card leads.
    pub fn quick_action_route(action: &QuickAction) -> Option<Route> {
        Route::from_path(action.path)
    }

    /// Refreshes the summary from the full inventory.
    pub async fn load(&self) {
        if let Err(e) = self.try_load().await {
            error!(error = %e, "Error fetching dashboard data");
        }
        self.state.with_mut(|s| s.loading = false);
    }

    async fn try_load(&self) -> ViewResult<()> {
        let start = Instant::now();
        debug!("Loading admin summary");
        self.state.with_mut(|s| s.loading = true);

        let sweets = self.ctx.api.list_sweets().await?;
        let stats = InventoryStats::with_threshold(&sweets, self.ctx.ui.low_stock_threshold);
        let total_value_text = stats.total_value.format_with(&self.ctx.ui.currency_symbol);
        let recent = recent_sweets(&sweets).to_vec();

        self.state.with_mut(|s| {
            s.stats = stats.clone();
            s.total_value_text = total_value_text;
            s.recent_sweets = recent;
        });

        info!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            total = stats.total_sweets,
            low_stock = stats.low_stock,
            "Admin summary loaded"
        );
        Ok(())
    }
}
