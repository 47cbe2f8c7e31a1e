//! In-memory `ShopApi` for view tests. Records every call.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use sweetshop_client::{ClientError, ClientResult, ShopApi};
use sweetshop_core::{AccountUpdate, Money, Role, SearchFilter, Sweet, SweetDraft, UserAccount};

#[derive(Debug, Default)]
pub struct FakeApi {
    sweets: Mutex<Vec<Sweet>>,
    accounts: Mutex<Vec<UserAccount>>,
    calls: Mutex<Vec<String>>,
    /// Operation name → (status, message) to fail with.
    failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
    /// Search name filter → artificial latency.
    search_delays: Mutex<HashMap<String, Duration>>,
    next_id: Mutex<u64>,
}

pub fn sweet(id: &str, name: &str, category: &str, price_minor: i64, quantity: i64) -> Sweet {
    Sweet {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price: Money::from_minor(price_minor),
        quantity,
        description: None,
    }
}

pub fn account(id: &str, username: Option<&str>, email: &str, role: Role) -> UserAccount {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "username": username,
        "email": email,
        "role": role,
        "enabled": true,
        "_class": "com.sweetshop.model.User",
        "password": "$2a$10$hash",
    }))
    .unwrap()
}

impl FakeApi {
    pub fn with_sweets(sweets: Vec<Sweet>) -> Self {
        let api = FakeApi::default();
        *api.next_id.lock().unwrap() = 100;
        *api.sweets.lock().unwrap() = sweets;
        api
    }

    pub fn with_accounts(self, accounts: Vec<UserAccount>) -> Self {
        *self.accounts.lock().unwrap() = accounts;
        self
    }

    pub fn fail(&self, op: &'static str, status: u16, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, (status, message.map(str::to_string)));
    }

    pub fn recover(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    pub fn delay_search(&self, name: &str, delay: Duration) {
        self.search_delays
            .lock()
            .unwrap()
            .insert(name.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sweets(&self) -> Vec<Sweet> {
        self.sweets.lock().unwrap().clone()
    }

    pub fn accounts(&self) -> Vec<UserAccount> {
        self.accounts.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, call: String) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(op) {
            Some((status, message)) => Err(ClientError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn matches(filter: &SearchFilter, sweet: &Sweet) -> bool {
        let name = filter.name.trim().to_lowercase();
        let min = Money::from_decimal_str(&filter.min_price);
        let max = Money::from_decimal_str(&filter.max_price);
        (name.is_empty() || sweet.name.to_lowercase().contains(&name))
            && (filter.category.trim().is_empty() || sweet.category == filter.category.trim())
            && min.map_or(true, |m| sweet.price >= m)
            && max.map_or(true, |m| sweet.price <= m)
    }
}

impl ShopApi for FakeApi {
    async fn list_sweets(&self) -> ClientResult<Vec<Sweet>> {
        self.record("list_sweets", "list_sweets".into())?;
        Ok(self.sweets())
    }

    async fn search_sweets(&self, filter: &SearchFilter) -> ClientResult<Vec<Sweet>> {
        let query: Vec<String> = filter
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        self.record("search_sweets", format!("search_sweets {}", query.join("&")))?;

        let delay = self.search_delays.lock().unwrap().get(&filter.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .sweets()
            .into_iter()
            .filter(|s| Self::matches(filter, s))
            .collect())
    }

    async fn create_sweet(&self, draft: &SweetDraft) -> ClientResult<()> {
        self.record("create_sweet", format!("create_sweet {}", draft.name))?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            next.to_string()
        };
        self.sweets.lock().unwrap().push(Sweet {
            id,
            name: draft.name.clone(),
            category: draft.category.clone(),
            price: draft.price,
            quantity: draft.quantity,
            description: draft.description.clone(),
        });
        Ok(())
    }

    async fn update_sweet(&self, id: &str, draft: &SweetDraft) -> ClientResult<()> {
        self.record("update_sweet", format!("update_sweet {}", id))?;
        let mut sweets = self.sweets.lock().unwrap();
        let sweet = sweets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ClientError::Status {
                status: 404,
                message: Some("Sweet not found".into()),
            })?;
        sweet.name = draft.name.clone();
        sweet.category = draft.category.clone();
        sweet.price = draft.price;
        sweet.quantity = draft.quantity;
        sweet.description = draft.description.clone();
        Ok(())
    }

    async fn delete_sweet(&self, id: &str) -> ClientResult<()> {
        self.record("delete_sweet", format!("delete_sweet {}", id))?;
        self.sweets.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn restock(&self, id: &str, quantity: i64) -> ClientResult<()> {
        self.record("restock", format!("restock {} {}", id, quantity))?;
        if let Some(s) = self.sweets.lock().unwrap().iter_mut().find(|s| s.id == id) {
            s.quantity += quantity;
        }
        Ok(())
    }

    async fn purchase(&self, id: &str, quantity: i64) -> ClientResult<()> {
        self.record("purchase", format!("purchase {} {}", id, quantity))?;
        let mut sweets = self.sweets.lock().unwrap();
        match sweets.iter_mut().find(|s| s.id == id) {
            Some(s) if s.quantity >= quantity => {
                s.quantity -= quantity;
                Ok(())
            }
            _ => Err(ClientError::Status {
                status: 400,
                message: Some("Not enough stock".into()),
            }),
        }
    }

    async fn list_accounts(&self) -> ClientResult<Vec<UserAccount>> {
        self.record("list_accounts", "list_accounts".into())?;
        Ok(self.accounts())
    }

    async fn update_account(&self, update: &AccountUpdate) -> ClientResult<UserAccount> {
        self.record("update_account", format!("update_account {}", update.id))?;
        let mut value = serde_json::to_value(update)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("password");
        }
        let updated: UserAccount = serde_json::from_value(value)?;

        let mut accounts = self.accounts.lock().unwrap();
        if let Some(slot) = accounts.iter_mut().find(|a| a.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }
}
