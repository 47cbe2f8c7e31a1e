//! # sweetshop-core: Pure Domain Logic for the Sweet Shop Storefront
//!
//! This crate holds everything the storefront decides without talking to
//! the network: the wire types, the money representation, form validation,
//! the role-driven navigation state machine and the admin dashboard maths.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sweet Shop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront (view models)                        │   │
//! │  │  AdminHome ─ ManageSweets ─ CustomerCatalog ─ Profile           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             sweetshop-client (session + HTTP gateway)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ sweetshop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌───────────────┐  │   │
//! │  │   │  types   │ │  money   │ │ navigation │ │  validation   │  │   │
//! │  │   │  Sweet   │ │  Money   │ │  NavState  │ │  forms        │  │   │
//! │  │   │  Session │ │          │ │  routes    │ │  passwords    │  │   │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sweet, Session, Role, SearchFilter, UserAccount)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Form validation run before any request is issued
//! - [`navigation`] - Role → link table and path → view routing
//! - [`stats`] - Admin dashboard aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use sweetshop_core::navigation::NavState;
//!
//! let nav = NavState::from_session(None);
//! assert_eq!(nav, NavState::Unauthenticated);
//! assert!(!nav.shows_logout());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod navigation;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use navigation::{resolve, NavLink, NavState, Route, RouteDecision, View, LOGOUT_REDIRECT};
pub use stats::InventoryStats;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Items with fewer units than this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Minimum accepted length for a new account password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Number of items shown in the admin dashboard's "recent sweets" list.
pub const RECENT_SWEETS_LIMIT: usize = 5;

/// Quantity used when a customer clicks "Buy" without choosing one.
pub const DEFAULT_PURCHASE_QUANTITY: i64 = 1;
