//! # Customer Catalog
//!
//! The customer's dashboard: a filterable grid of sweets with a purchase
//! button on each card.
//!
//! ## Debounced Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Filter Change Timeline                               │
//! │                                                                         │
//! │  t=0     on_filter_change("tru")    gen 1, sleeping                    │
//! │  t=200   on_filter_change("truf")   gen 2, sleeping                    │
//! │  t=500   gen 1 wakes: superseded, no request                           │
//! │  t=700   gen 2 wakes: current, request issued                          │
//! │  t=...   response arrives: applied only if gen 2 is still current      │
//! │                                                                         │
//! │  The last issued request wins, whatever order responses arrive in.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use sweetshop_client::ShopApi;
use sweetshop_core::validation::validate_purchase_quantity;
use sweetshop_core::{SearchFilter, Sweet, DEFAULT_PURCHASE_QUANTITY};

use crate::error::{ViewError, ViewResult};
use crate::state::{FetchSequence, Generation, Notice, NoticeSlot, ViewState};
use crate::views::ViewContext;

const FETCH_FAILED: &str = "Failed to fetch sweets. Please try again.";
const PURCHASE_FAILED: &str = "Failed to purchase sweet. Please try again.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub sweets: Vec<Sweet>,
    pub filter: SearchFilter,
    pub show_filters: bool,
    pub loading: bool,
    pub notice: NoticeSlot,
}

impl Default for CatalogState {
    fn default() -> Self {
        CatalogState {
            sweets: Vec::new(),
            filter: SearchFilter::default(),
            show_filters: false,
            loading: true,
            notice: NoticeSlot::default(),
        }
    }
}

pub struct Catalog<A> {
    ctx: ViewContext<A>,
    state: ViewState<CatalogState>,
    fetches: FetchSequence,
}

impl<A: ShopApi> Catalog<A> {
    pub fn new(ctx: ViewContext<A>) -> Self {
        Catalog {
            ctx,
            state: ViewState::default(),
            fetches: FetchSequence::new(),
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state.snapshot()
    }

    pub fn toggle_filters(&self) {
        self.state.with_mut(|s| s.show_filters = !s.show_filters);
    }

    /// Initial load with whatever filter is set (normally none).
    pub async fn mount(&self) -> ViewResult<()> {
        let filter = self.state.with(|s| s.filter.clone());
        self.search(filter).await
    }

    /// Loads every sweet and clears the filter so later refetches agree.
    pub async fn list(&self) -> ViewResult<()> {
        let generation = self.fetches.begin();
        self.state.with_mut(|s| s.filter = SearchFilter::default());
        self.fetch(generation, &SearchFilter::default()).await
    }

    /// Fetches right away: `GET /sweets` for an empty filter, otherwise
    /// `GET /sweets/search`.
    pub async fn search(&self, filter: SearchFilter) -> ViewResult<()> {
        let generation = self.fetches.begin();
        self.state.with_mut(|s| s.filter = filter.clone());
        self.fetch(generation, &filter).await
    }

    /// Records the new filter and fetches once typing has paused.
    ///
    /// Resolves early, without a request, when a later change supersedes
    /// this one during the quiet period.
    pub async fn on_filter_change(&self, filter: SearchFilter) -> ViewResult<()> {
        let generation = self.fetches.begin();
        self.state.with_mut(|s| s.filter = filter.clone());

        tokio::time::sleep(self.ctx.ui.search_debounce()).await;

        if !self.fetches.is_current(generation) {
            debug!(?generation, "Filter change superseded before firing");
            return Ok(());
        }
        self.fetch(generation, &filter).await
    }

    /// Resets every filter field. Goes through the debounce like typing.
    pub async fn clear_filters(&self) -> ViewResult<()> {
        self.on_filter_change(SearchFilter::default()).await
    }

    async fn fetch(&self, generation: Generation, filter: &SearchFilter) -> ViewResult<()> {
        let start = Instant::now();
        self.state.with_mut(|s| s.loading = true);

        let result = if filter.is_empty() {
            self.ctx.api.list_sweets().await
        } else {
            self.ctx.api.search_sweets(filter).await
        };

        if !self.fetches.is_current(generation) {
            debug!(?generation, "Dropping stale catalog response");
            return Ok(());
        }
        self.state.with_mut(|s| s.loading = false);

        match result {
            Ok(sweets) => {
                let count = sweets.len();
                self.state.with_mut(|s| s.sweets = sweets);
                info!(
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    count = count,
                    filtered = !filter.is_empty(),
                    "Catalog loaded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error fetching sweets");
                let notice = Notice::error(FETCH_FAILED, self.ctx.ui.notice_ttl());
                self.state.with_mut(|s| s.notice.set(notice));
                Err(e.into())
            }
        }
    }

    /// The card's purchase button: one unit.
    pub async fn buy_one(&self, id: &str) -> ViewResult<()> {
        self.purchase(id, DEFAULT_PURCHASE_QUANTITY).await
    }

    /// Buys `quantity` units, then refetches with the current filter.
    pub async fn purchase(&self, id: &str, quantity: i64) -> ViewResult<()> {
        let result = async {
            validate_purchase_quantity(quantity)?;
            self.ctx.api.purchase(id, quantity).await?;
            Ok::<_, ViewError>(())
        }
        .await;

        let ttl = self.ctx.ui.notice_ttl();
        match result {
            Ok(()) => {
                info!(id = %id, quantity = quantity, "Purchase complete");
                let notice =
                    Notice::success(format!("Successfully purchased {} item(s)!", quantity), ttl);
                self.state.with_mut(|s| s.notice.set(notice));

                let filter = self.state.with(|s| s.filter.clone());
                let generation = self.fetches.begin();
                // A failed refetch reports itself through the notice
                let _ = self.fetch(generation, &filter).await;
                Ok(())
            }
            Err(err) => {
                warn!(id = %id, error = %err, "Error purchasing sweet");
                let text = match &err {
                    ViewError::Client(client) => client
                        .server_message()
                        .unwrap_or(PURCHASE_FAILED)
                        .to_string(),
                    other => other.to_string(),
                };
                self.state.with_mut(|s| s.notice.set(Notice::error(text, ttl)));
                Err(err)
            }
        }
    }
}
