//! # Profile
//!
//! Shows the signed-in account and lets the customer change their display
//! name and password. Email and role are read-only.
//!
//! The account is found by listing every account and matching on the
//! session email, all behind [`ShopApi::account_by_email`].

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use sweetshop_client::{ClientError, ShopApi};
use sweetshop_core::validation::validate_password_change;
use sweetshop_core::{AccountUpdate, ProfileForm, Route, UserAccount, LOGOUT_REDIRECT};

use crate::error::{ViewError, ViewResult};
use crate::state::{Notice, NoticeSlot, ViewState};
use crate::views::ViewContext;

const FETCH_FAILED: &str = "Failed to fetch user data";
const UPDATE_FAILED: &str = "Failed to update profile";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    pub account: Option<UserAccount>,
    pub form: ProfileForm,
    pub editing: bool,
    pub loading: bool,
    /// Replaces the whole page when the account cannot be shown.
    pub error: Option<String>,
    pub notice: NoticeSlot,
}

impl Default for ProfileState {
    fn default() -> Self {
        ProfileState {
            account: None,
            form: ProfileForm::default(),
            editing: false,
            loading: true,
            error: None,
            notice: NoticeSlot::default(),
        }
    }
}

pub struct Profile<A> {
    ctx: ViewContext<A>,
    state: ViewState<ProfileState>,
}

impl<A: ShopApi> Profile<A> {
    pub fn new(ctx: ViewContext<A>) -> Self {
        Profile {
            ctx,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> ProfileState {
        self.state.snapshot()
    }

    /// Loads the account belonging to the current session.
    pub async fn fetch_self(&self) -> ViewResult<()> {
        let start = Instant::now();
        self.state.with_mut(|s| s.loading = true);

        let result = match self.ctx.session.current().await {
            Some(session) => self.ctx.api.account_by_email(&session.email).await,
            None => Err(ClientError::NotAuthenticated),
        };

        match result {
            Ok(mut account) => {
                // The view never needs the stored hash
                account.extra.remove("password");
                debug!(id = %account.id, "Profile loaded");
                self.state.with_mut(|s| {
                    s.form = ProfileForm::from_account(&account);
                    s.account = Some(account);
                    s.error = None;
                    s.loading = false;
                });
                info!(elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "Profile fetched");
                Ok(())
            }
            Err(e) => {
                let text = match &e {
                    ClientError::NotAuthenticated | ClientError::AccountNotFound => e.to_string(),
                    _ => FETCH_FAILED.to_string(),
                };
                warn!(error = %e, "Profile fetch failed");
                self.state.with_mut(|s| {
                    s.error = Some(text);
                    s.loading = false;
                });
                Err(e.into())
            }
        }
    }

    pub fn begin_edit(&self) {
        self.state.with_mut(|s| s.editing = true);
    }

    /// Leaves edit mode and restores the form from the loaded account.
    pub fn cancel_edit(&self) {
        self.state.with_mut(|s| {
            s.editing = false;
            s.form = s
                .account
                .as_ref()
                .map(ProfileForm::from_account)
                .unwrap_or_default();
            s.notice.clear();
        });
    }

    pub fn set_form(&self, form: ProfileForm) {
        self.state.with_mut(|s| s.form = form);
    }

    /// Submits the form currently held by the view.
    pub async fn submit(&self) -> ViewResult<()> {
        let form = self.state.with(|s| s.form.clone());
        self.update(form).await
    }

    /// Sends the full account record back with the new name and, if typed,
    /// the new password.
    pub async fn update(&self, form: ProfileForm) -> ViewResult<()> {
        let account = self.state.with_mut(|s| {
            s.form = form.clone();
            s.notice.clear();
            s.account.clone()
        });

        let result = async {
            let password = validate_password_change(&form.password, &form.confirm_password)?;
            let account = account.ok_or(ClientError::AccountNotFound)?;
            let update = AccountUpdate::from_account(&account, &form.name, password);
            let updated = self.ctx.api.update_account(&update).await?;
            Ok::<_, ViewError>(updated)
        }
        .await;

        match result {
            Ok(mut updated) => {
                updated.extra.remove("password");
                info!(id = %updated.id, "Profile updated");
                let notice = Notice::success(
                    "Profile updated successfully!",
                    self.ctx.ui.profile_notice_ttl(),
                );
                self.state.with_mut(|s| {
                    s.form = ProfileForm::from_account(&updated);
                    s.account = Some(updated);
                    s.editing = false;
                    s.notice.set(notice);
                });
                Ok(())
            }
            Err(err) => {
                let text = match &err {
                    ViewError::Validation(v) => format!("Error: {}!", v),
                    ViewError::Client(c) => {
                        format!("Error: {}", c.server_message().unwrap_or(UPDATE_FAILED))
                    }
                    ViewError::Cancelled => format!("Error: {}", err),
                };
                warn!(error = %err, local = err.is_local(), "Profile update failed");
                self.state.with_mut(|s| s.notice.set(Notice::sticky_error(text)));
                Err(err)
            }
        }
    }

    /// The page's own logout button. Same outcome as the navigation bar's.
    pub async fn logout(&self) -> Route {
        self.ctx.session.logout().await;
        info!(redirect = %LOGOUT_REDIRECT, "Logout from profile");
        LOGOUT_REDIRECT
    }
}
