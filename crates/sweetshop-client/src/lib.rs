//! # sweetshop-client: Session and API Access for the Sweet Shop Storefront
//!
//! Everything between the view models and the network lives here.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │   storefront views                                                     │
//! │        │  generic over                                                 │
//! │        ▼                                                                │
//! │  ┌──────────────┐   token   ┌──────────────┐                           │
//! │  │  ShopApi     │ ◄──────── │ SessionHolder│ ◄── ClientConfig.session  │
//! │  │  ApiGateway  │           │              │                           │
//! │  └──────┬───────┘           └──────────────┘                           │
//! │         │ reqwest (JSON, bearer auth, request timeout)                 │
//! │         ▼                                                               │
//! │   Inventory / Auth REST API                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Client error types
//! - [`gateway`] - `ShopApi` trait and its reqwest implementation
//! - [`session`] - Shared session slot with JWT expiry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sweetshop_client::{ApiGateway, ClientConfig, SessionHolder, ShopApi};
//!
//! let config = ClientConfig::load_or_default(None);
//! let session = config.session().map(SessionHolder::with_session).unwrap_or_default();
//! let api = ApiGateway::new(&config.api, session.clone())?;
//!
//! let sweets = api.list_sweets().await?;
//! println!("{} sweets in stock", sweets.len());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod gateway;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiSettings, ClientConfig, SessionSettings, UiSettings};
pub use error::{ClientError, ClientResult};
pub use gateway::{ApiGateway, ShopApi};
pub use session::SessionHolder;
