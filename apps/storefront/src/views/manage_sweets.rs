//! # Inventory Manager
//!
//! The admin's CRUD screen: a search bar, the add/edit form, the inventory
//! table, and the restock modal.
//!
//! ## Action Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inventory Manager Actions                            │
//! │                                                                         │
//! │  list()          GET /sweets          ──► sweets + displayed           │
//! │  search(f)       GET /sweets/search   ──► displayed only               │
//! │  reset_search()  (no request)         ──► displayed = sweets           │
//! │                                                                         │
//! │  submit()        validate form ──✗──► notice, no request               │
//! │                      │ ✓                                                │
//! │                      ▼                                                  │
//! │                  POST /sweets or PUT /sweets/{id}                      │
//! │                      │ ✓                                                │
//! │                      ▼                                                  │
//! │                  clear form, leave edit mode, refresh                  │
//! │                                                                         │
//! │  delete(id)      confirm ──✗──► nothing                                │
//! │  restock(id, n)  n ≥ 1   ──✗──► notice, no request                     │
//! │                                                                         │
//! │  No optimistic updates: the table only changes after a refetch.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every list-replacing fetch takes a generation from a [`FetchSequence`];
//! a response that is no longer the latest is dropped.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use sweetshop_client::ShopApi;
use sweetshop_core::validation::{validate_restock_quantity, validate_sweet_form};
use sweetshop_core::{RestockForm, SearchFilter, Sweet, SweetForm};

use crate::error::{ViewError, ViewResult};
use crate::state::{FetchSequence, Notice, NoticeSlot, ViewState};
use crate::views::{Confirm, ViewContext};

/// Asked before every delete.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this sweet?";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryState {
    /// Last full snapshot from `GET /sweets`.
    pub sweets: Vec<Sweet>,
    /// What the table shows: the snapshot or a search result.
    pub displayed: Vec<Sweet>,
    pub filter: SearchFilter,
    pub form: SweetForm,
    /// Set while the form edits an existing sweet.
    pub editing_id: Option<String>,
    /// Open restock modal.
    pub restock: Option<RestockForm>,
    pub loading: bool,
    pub notice: NoticeSlot,
}

impl InventoryState {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }
}

pub struct InventoryManager<A> {
    ctx: ViewContext<A>,
    state: ViewState<InventoryState>,
    fetches: FetchSequence,
}

impl<A: ShopApi> InventoryManager<A> {
    pub fn new(ctx: ViewContext<A>) -> Self {
        InventoryManager {
            ctx,
            state: ViewState::default(),
            fetches: FetchSequence::new(),
        }
    }

    pub fn state(&self) -> InventoryState {
        self.state.snapshot()
    }

    fn success(&self, text: impl Into<String>) {
        let notice = Notice::success(text, self.ctx.ui.notice_ttl());
        self.state.with_mut(|s| s.notice.set(notice));
    }

    fn failure(&self, prefix: &str, err: &ViewError) {
        let notice = Notice::error(format!("{}{}", prefix, err.detail()), self.ctx.ui.notice_ttl());
        self.state.with_mut(|s| s.notice.set(notice));
    }

    // =========================================================================
    // Listing and search
    // =========================================================================

    /// Loads the full inventory into both the snapshot and the table.
    pub async fn list(&self) -> ViewResult<()> {
        self.fetch_all(true).await
    }

    /// Refetch after a mutation. Keeps the mutation's own notice on success.
    async fn refresh(&self) -> ViewResult<()> {
        self.fetch_all(false).await
    }

    async fn fetch_all(&self, announce: bool) -> ViewResult<()> {
        let start = Instant::now();
        let generation = self.fetches.begin();
        self.state.with_mut(|s| s.loading = true);

        let result = self.ctx.api.list_sweets().await;

        if !self.fetches.is_current(generation) {
            debug!(?generation, "Dropping superseded inventory fetch");
            return Ok(());
        }
        self.state.with_mut(|s| s.loading = false);

        match result {
            Ok(sweets) => {
                let count = sweets.len();
                self.state.with_mut(|s| {
                    s.displayed = sweets.clone();
                    s.sweets = sweets;
                });
                if announce {
                    self.success("Sweets loaded successfully");
                }
                info!(
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    count = count,
                    "Inventory loaded"
                );
                Ok(())
            }
            Err(e) => {
                let err = ViewError::from(e);
                warn!(error = %err, "Inventory load failed");
                self.failure("Error loading sweets: ", &err);
                Err(err)
            }
        }
    }

    /// Server-side search. Replaces the table, never the snapshot.
    pub async fn search(&self, filter: SearchFilter) -> ViewResult<()> {
        let start = Instant::now();
        let generation = self.fetches.begin();
        self.state.with_mut(|s| {
            s.filter = filter.clone();
            s.loading = true;
        });

        let result = self.ctx.api.search_sweets(&filter).await;

        if !self.fetches.is_current(generation) {
            debug!(?generation, "Dropping superseded search");
            return Ok(());
        }
        self.state.with_mut(|s| s.loading = false);

        match result {
            Ok(found) => {
                let count = found.len();
                self.state.with_mut(|s| s.displayed = found);
                self.success(format!("Found {} sweets", count));
                info!(
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    count = count,
                    "Inventory search complete"
                );
                Ok(())
            }
            Err(e) => {
                let err = ViewError::from(e);
                warn!(error = %err, "Inventory search failed");
                self.failure("Error searching sweets: ", &err);
                Err(err)
            }
        }
    }

    /// Clears the filter and shows the snapshot again. No request.
    pub fn reset_search(&self) {
        // Any search still in flight must not overwrite the reset table
        self.fetches.begin();
        self.state.with_mut(|s| {
            s.filter = SearchFilter::default();
            s.displayed = s.sweets.clone();
            s.loading = false;
        });
    }

    // =========================================================================
    // Add / edit form
    // =========================================================================

    pub fn set_form(&self, form: SweetForm) {
        self.state.with_mut(|s| s.form = form);
    }

    pub fn begin_edit(&self, sweet: &Sweet) {
        debug!(id = %sweet.id, "Editing sweet");
        self.state.with_mut(|s| {
            s.form = SweetForm::from_sweet(sweet);
            s.editing_id = Some(sweet.id.clone());
        });
    }

    pub fn cancel_edit(&self) {
        self.state.with_mut(|s| {
            s.form = SweetForm::default();
            s.editing_id = None;
        });
    }

    /// Submits the current form as an update when editing, else a create.
    pub async fn submit(&self) -> ViewResult<()> {
        let (form, editing_id) = self.state.with(|s| (s.form.clone(), s.editing_id.clone()));
        match editing_id {
            Some(id) => self.update(&id, form).await,
            None => self.create(form).await,
        }
    }

    pub async fn create(&self, form: SweetForm) -> ViewResult<()> {
        self.save(None, form).await
    }

    pub async fn update(&self, id: &str, form: SweetForm) -> ViewResult<()> {
        self.save(Some(id), form).await
    }

    async fn save(&self, id: Option<&str>, form: SweetForm) -> ViewResult<()> {
        let start = Instant::now();
        self.state.with_mut(|s| s.form = form.clone());

        let result = async {
            let draft = validate_sweet_form(&form)?;
            match id {
                Some(id) => self.ctx.api.update_sweet(id, &draft).await?,
                None => self.ctx.api.create_sweet(&draft).await?,
            }
            Ok::<_, ViewError>(draft)
        }
        .await;

        match result {
            Ok(draft) => {
                self.state.with_mut(|s| {
                    s.form = SweetForm::default();
                    s.editing_id = None;
                });
                self.success(match id {
                    Some(_) => "Sweet updated successfully",
                    None => "Sweet added successfully",
                });
                info!(
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    name = %draft.name,
                    updated = id.is_some(),
                    "Sweet saved"
                );
                // A failed refetch reports itself through the notice
                let _ = self.refresh().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, local = err.is_local(), "Sweet save failed");
                self.failure("Error saving sweet: ", &err);
                Err(err)
            }
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes after confirmation. A declined prompt returns
    /// [`ViewError::Cancelled`] without a request.
    pub async fn delete(&self, id: &str, confirm: &impl Confirm) -> ViewResult<()> {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(id = %id, "Delete declined");
            return Err(ViewError::Cancelled);
        }

        match self.ctx.api.delete_sweet(id).await {
            Ok(()) => {
                self.success("Sweet deleted successfully");
                info!(id = %id, "Sweet deleted");
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                let err = ViewError::from(e);
                warn!(id = %id, error = %err, "Sweet delete failed");
                self.failure("Error deleting sweet: ", &err);
                Err(err)
            }
        }
    }

    // =========================================================================
    // Restock modal
    // =========================================================================

    pub fn open_restock(&self, sweet: &Sweet) {
        self.state.with_mut(|s| {
            s.restock = Some(RestockForm {
                sweet_id: sweet.id.clone(),
                quantity: String::new(),
            })
        });
    }

    pub fn set_restock_quantity(&self, quantity: impl Into<String>) {
        let quantity = quantity.into();
        self.state.with_mut(|s| {
            if let Some(form) = s.restock.as_mut() {
                form.quantity = quantity;
            }
        });
    }

    pub fn close_restock(&self) {
        self.state.with_mut(|s| s.restock = None);
    }

    /// Submits the open modal. Does nothing when no modal is open.
    pub async fn submit_restock(&self) -> ViewResult<()> {
        match self.state.with(|s| s.restock.clone()) {
            Some(form) => self.restock(&form.sweet_id, &form.quantity).await,
            None => Ok(()),
        }
    }

    /// Adds `quantity` (as typed) to the stock of `id`.
    pub async fn restock(&self, id: &str, quantity: &str) -> ViewResult<()> {
        let result = async {
            let qty = validate_restock_quantity(quantity)?;
            self.ctx.api.restock(id, qty).await?;
            Ok::<_, ViewError>(qty)
        }
        .await;

        match result {
            Ok(qty) => {
                self.close_restock();
                self.success("Sweet restocked successfully");
                info!(id = %id, quantity = qty, "Sweet restocked");
                let _ = self.refresh().await;
                Ok(())
            }
            Err(err) => {
                warn!(id = %id, error = %err, "Restock failed");
                self.failure("Error restocking sweet: ", &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::views::fake_api::{sweet, FakeApi};
    use sweetshop_client::{SessionHolder, UiSettings};

    fn inventory() -> Vec<Sweet> {
        vec![
            sweet("1", "Dark Truffle", "Chocolate", 250, 5),
            sweet("2", "Lemon Drop", "Candy", 100, 40),
            sweet("3", "Milk Bar", "Chocolate", 150, 12),
        ]
    }

    fn manager(api: FakeApi) -> InventoryManager<FakeApi> {
        InventoryManager::new(ViewContext::new(api, SessionHolder::new(), UiSettings::default()))
    }

    fn api(m: &InventoryManager<FakeApi>) -> &FakeApi {
        &m.ctx.api
    }

    fn notice_text(m: &InventoryManager<FakeApi>) -> Option<String> {
        m.state().notice.current().map(|n| n.text.clone())
    }

    fn filled_form() -> SweetForm {
        SweetForm {
            name: "Kaju Katli".into(),
            category: "Indian".into(),
            price: "12.50".into(),
            quantity: "30".into(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_list_fills_snapshot_and_table() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();

        let state = m.state();
        assert_eq!(state.sweets.len(), 3);
        assert_eq!(state.displayed, state.sweets);
        assert!(!state.loading);
        assert_eq!(notice_text(&m).as_deref(), Some("Sweets loaded successfully"));
    }

    #[tokio::test]
    async fn test_failed_list_keeps_prior_list() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();

        api(&m).fail("list_sweets", 503, Some("Service unavailable"));
        assert!(m.list().await.is_err());

        let state = m.state();
        assert_eq!(state.displayed.len(), 3);
        assert_eq!(
            notice_text(&m).as_deref(),
            Some("Error loading sweets: Service unavailable")
        );
    }

    #[tokio::test]
    async fn test_list_retries_after_outage() {
        let m = manager(FakeApi::with_sweets(inventory()));
        api(&m).fail("list_sweets", 503, None);
        assert!(m.list().await.is_err());
        assert!(m.state().displayed.is_empty());

        api(&m).recover("list_sweets");
        m.list().await.unwrap();

        assert_eq!(m.state().displayed.len(), 3);
        assert_eq!(api(&m).calls(), vec!["list_sweets", "list_sweets"]);
    }

    #[tokio::test]
    async fn test_search_sends_only_filled_fields_and_keeps_snapshot() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();

        m.search(SearchFilter::default().with_category("Chocolate"))
            .await
            .unwrap();

        assert_eq!(
            api(&m).calls().last().map(String::as_str),
            Some("search_sweets category=Chocolate")
        );
        let state = m.state();
        assert_eq!(state.displayed.len(), 2);
        assert_eq!(state.sweets.len(), 3);
        assert_eq!(notice_text(&m).as_deref(), Some("Found 2 sweets"));
    }

    #[tokio::test]
    async fn test_reset_search_restores_snapshot_without_request() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();
        m.search(SearchFilter::default().with_name("lemon")).await.unwrap();
        let calls_before = api(&m).calls().len();

        m.reset_search();

        let state = m.state();
        assert_eq!(state.displayed.len(), 3);
        assert!(state.filter.is_empty());
        assert_eq!(api(&m).calls().len(), calls_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_search_is_dropped() {
        let m = manager(FakeApi::with_sweets(inventory()));
        api(&m).delay_search("truffle", Duration::from_millis(300));

        let slow = m.search(SearchFilter::default().with_name("truffle"));
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            m.search(SearchFilter::default().with_name("lemon")).await
        };
        let (slow, fast) = tokio::join!(slow, fast);
        slow.unwrap();
        fast.unwrap();

        let names: Vec<_> = m.state().displayed.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Lemon Drop"]);
    }

    #[tokio::test]
    async fn test_submit_with_missing_field_issues_no_request() {
        let m = manager(FakeApi::with_sweets(inventory()));

        for blank in ["name", "category", "price", "quantity"] {
            let mut form = filled_form();
            match blank {
                "name" => form.name.clear(),
                "category" => form.category.clear(),
                "price" => form.price.clear(),
                _ => form.quantity.clear(),
            }
            m.set_form(form.clone());

            let err = m.submit().await.unwrap_err();
            assert!(matches!(err, ViewError::Validation(_)));
            // Form stays populated for another try
            assert_eq!(m.state().form, form);
        }
        assert!(api(&m).calls().is_empty());
        assert!(m.state().notice.current().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_create_clears_form_and_refreshes() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.set_form(filled_form());
        m.submit().await.unwrap();

        assert_eq!(api(&m).calls(), vec!["create_sweet Kaju Katli", "list_sweets"]);
        let state = m.state();
        assert!(state.form.is_blank());
        assert_eq!(state.displayed.len(), 4);
        assert_eq!(notice_text(&m).as_deref(), Some("Sweet added successfully"));
    }

    #[tokio::test]
    async fn test_failed_create_keeps_form() {
        let m = manager(FakeApi::with_sweets(inventory()));
        api(&m).fail("create_sweet", 409, Some("Sweet already exists"));

        assert!(m.create(filled_form()).await.is_err());
        assert_eq!(m.state().form, filled_form());
        assert_eq!(
            notice_text(&m).as_deref(),
            Some("Error saving sweet: Sweet already exists")
        );
    }

    #[tokio::test]
    async fn test_edit_submits_update_and_leaves_edit_mode() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();

        let target = m.state().sweets[1].clone();
        m.begin_edit(&target);
        assert!(m.state().is_editing());

        let mut form = m.state().form;
        form.quantity = "55".into();
        m.set_form(form);
        m.submit().await.unwrap();

        assert!(api(&m).calls().contains(&"update_sweet 2".to_string()));
        let state = m.state();
        assert!(!state.is_editing());
        assert_eq!(state.sweets[1].quantity, 55);
        assert_eq!(notice_text(&m).as_deref(), Some("Sweet updated successfully"));
    }

    #[tokio::test]
    async fn test_cancel_edit_clears_form() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.begin_edit(&inventory()[0]);
        m.cancel_edit();

        let state = m.state();
        assert!(!state.is_editing());
        assert!(state.form.is_blank());
    }

    #[tokio::test]
    async fn test_declined_delete_issues_no_request() {
        let m = manager(FakeApi::with_sweets(inventory()));
        let prompts = std::sync::Mutex::new(Vec::new());
        let decline = |prompt: &str| {
            prompts.lock().unwrap().push(prompt.to_string());
            false
        };

        let err = m.delete("1", &decline).await.unwrap_err();
        assert!(matches!(err, ViewError::Cancelled));
        assert!(api(&m).calls().is_empty());
        assert_eq!(*prompts.lock().unwrap(), vec![DELETE_PROMPT.to_string()]);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_table_unchanged() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();
        let before = m.state().displayed;

        api(&m).fail("delete_sweet", 500, None);
        assert!(m.delete("1", &|_: &str| true).await.is_err());

        assert_eq!(m.state().displayed, before);
        assert!(notice_text(&m).unwrap().starts_with("Error deleting sweet: "));
    }

    #[tokio::test]
    async fn test_delete_refreshes_table() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();
        m.delete("1", &|_: &str| true).await.unwrap();

        assert_eq!(m.state().displayed.len(), 2);
        assert_eq!(notice_text(&m).as_deref(), Some("Sweet deleted successfully"));
    }

    #[tokio::test]
    async fn test_restock_rejects_non_positive_quantity() {
        let m = manager(FakeApi::with_sweets(inventory()));
        for qty in ["0", "-3", "", "two"] {
            assert!(m.restock("1", qty).await.is_err());
        }
        assert!(api(&m).calls().is_empty());
    }

    #[tokio::test]
    async fn test_restock_modal_flow() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();

        m.open_restock(&inventory()[0]);
        m.set_restock_quantity("5");
        m.submit_restock().await.unwrap();

        assert!(api(&m).calls().contains(&"restock 1 5".to_string()));
        let state = m.state();
        assert!(state.restock.is_none());
        assert_eq!(state.sweets[0].quantity, 10);
        assert_eq!(notice_text(&m).as_deref(), Some("Sweet restocked successfully"));
    }

    #[tokio::test]
    async fn test_failed_restock_keeps_modal_open() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.open_restock(&inventory()[0]);
        m.set_restock_quantity("0");

        assert!(m.submit_restock().await.is_err());
        assert!(m.state().restock.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notices_dismiss_after_five_seconds() {
        let m = manager(FakeApi::with_sweets(inventory()));
        m.list().await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(notice_text(&m).is_none());
    }
}
