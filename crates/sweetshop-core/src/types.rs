//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Wire records (from the API)        Form state (typed by the user)     │
//! │  ┌─────────────────┐                ┌─────────────────┐                │
//! │  │  Sweet          │ ◄── edit ───── │  SweetForm      │                │
//! │  │  UserAccount    │                │  RestockForm    │                │
//! │  └─────────────────┘                │  ProfileForm    │                │
//! │                                     │  SearchFilter   │                │
//! │  Payloads (to the API)              └─────────────────┘                │
//! │  ┌─────────────────┐                                                   │
//! │  │  SweetDraft     │ ◄── validation::validate_sweet_form               │
//! │  │  AccountUpdate  │ ◄── AccountUpdate::from_account                   │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  Identity: Session { user_id, email, role, token }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire types use camelCase field names to match the inventory API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Role
// =============================================================================

/// Closed set of roles the storefront renders differently.
///
/// The backend sends role strings; anything outside this set is rejected
/// at decode time rather than silently rendered as a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Role {
    /// Anonymous visitor.
    #[default]
    Guest,
    /// Signed-in customer.
    User,
    /// Shop administrator.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let upper = s.trim().to_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "GUEST" => Ok(Role::Guest),
            "USER" | "CUSTOMER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        value.parse()
    }
}

// =============================================================================
// Session
// =============================================================================

/// The authenticated identity held for the current visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        token: impl Into<String>,
    ) -> Self {
        Session {
            user_id: user_id.into(),
            email: email.into(),
            role,
            token: token.into(),
        }
    }

    /// A guest-role session carries a token but no storefront identity.
    pub fn is_authenticated(&self) -> bool {
        self.role != Role::Guest
    }
}

// =============================================================================
// Sweet (inventory item)
// =============================================================================

/// A catalog record as returned by `GET /sweets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
    /// Backend identifier. Accepts numeric ids and stores them as strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub name: String,

    pub category: String,

    /// Unit price.
    pub price: Money,

    /// Units in stock. Never negative.
    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Sweet {
    /// True when stock is under [`LOW_STOCK_THRESHOLD`].
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    /// Value of the units on hand (price × quantity).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Body of `POST /sweets` and `PUT /sweets/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetDraft {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Form State
// =============================================================================

/// The add/edit sweet form, holding exactly what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
    pub description: String,
}

impl SweetForm {
    /// Pre-fills the form from an existing record for editing.
    pub fn from_sweet(sweet: &Sweet) -> Self {
        SweetForm {
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: sweet.price.to_string(),
            quantity: sweet.quantity.to_string(),
            description: sweet.description.clone().unwrap_or_default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        *self == SweetForm::default()
    }
}

/// The restock modal: which sweet, and how many units to add.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockForm {
    pub sweet_id: String,
    pub quantity: String,
}

/// The profile edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    /// Resets the form to the account's current username, passwords blank.
    pub fn from_account(account: &UserAccount) -> Self {
        ProfileForm {
            name: account.username.clone().unwrap_or_default(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

// =============================================================================
// Search Filter
// =============================================================================

/// Query parameters for `GET /sweets/search`. Ephemeral, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Name substring.
    pub name: String,
    pub category: String,
    pub min_price: String,
    pub max_price: String,
}

impl SearchFilter {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_price_range(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min_price = min.into();
        self.max_price = max.into();
        self
    }

    /// True when no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// The non-empty fields as query parameters, in a fixed order.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::SearchFilter;
    ///
    /// let filter = SearchFilter::default().with_category("Chocolate");
    /// assert_eq!(filter.query_pairs(), vec![("category", "Chocolate".to_string())]);
    /// ```
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("name", &self.name),
            ("category", &self.category),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| (key, value.to_string()))
        })
        .collect()
    }
}

// =============================================================================
// User Account
// =============================================================================

/// An account record from `GET /auth/get`.
///
/// Unknown fields are kept in `extra` so a profile update can send the
/// record back without resetting anything the storefront doesn't model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    pub email: String,

    pub role: Role,

    #[serde(default)]
    pub enabled: bool,

    /// Backend type discriminator, echoed back untouched.
    #[serde(rename = "_class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(
        default,
        deserialize_with = "flexible_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts RFC 3339 timestamps and zone-less `LocalDateTime` strings (read as UTC).
fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {}: {}", raw, e)))
}

impl UserAccount {
    /// Name shown in the profile header.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("User")
    }

    /// Single-letter avatar: first letter of the username, else the email.
    pub fn initial(&self) -> Option<char> {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.email)
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
    }
}

/// Body of `PUT /auth/update`: the full account record plus changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
    #[serde(rename = "_class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Only present when the user typed a new password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountUpdate {
    /// Builds an update that preserves every field of `account`.
    ///
    /// `new_name` replaces the username only when it is non-blank; the
    /// stored password hash is never echoed back.
    pub fn from_account(
        account: &UserAccount,
        new_name: &str,
        new_password: Option<String>,
    ) -> Self {
        let new_name = new_name.trim();
        let username = if new_name.is_empty() {
            account.username.clone()
        } else {
            Some(new_name.to_string())
        };

        let mut extra = account.extra.clone();
        extra.remove("password");

        AccountUpdate {
            id: account.id.clone(),
            email: account.email.clone(),
            role: account.role,
            enabled: account.enabled,
            class: account.class.clone(),
            username,
            password: new_password,
            extra,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn account_json() -> &'static str {
        r#"{
            "id": "u-1",
            "username": "asha",
            "email": "asha@example.com",
            "password": "$2a$10$hash",
            "role": "USER",
            "enabled": true,
            "_class": "com.sweetshop.model.User",
            "updatedAt": "2024-05-01T10:00:00Z",
            "phone": "555-0100"
        }"#
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("ROLE_ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::User);
        assert!(serde_json::from_str::<Role>("\"OWNER\"").is_err());
    }

    #[test]
    fn test_sweet_decodes_numeric_id_and_price() {
        let sweet: Sweet = serde_json::from_str(
            r#"{"id": 7, "name": "Kaju Katli", "category": "Dry Fruits", "price": 12.5, "quantity": 4}"#,
        )
        .unwrap();
        assert_eq!(sweet.id, "7");
        assert_eq!(sweet.price.minor(), 1250);
        assert_eq!(sweet.description, None);
        assert!(sweet.is_low_stock());
        assert_eq!(sweet.stock_value().minor(), 5000);
    }

    #[test]
    fn test_sweet_form_from_sweet() {
        let sweet = Sweet {
            id: "1".into(),
            name: "Ladoo".into(),
            category: "Traditional".into(),
            price: Money::from_minor(1050),
            quantity: 20,
            description: None,
        };
        let form = SweetForm::from_sweet(&sweet);
        assert_eq!(form.price, "10.50");
        assert_eq!(form.quantity, "20");
        assert_eq!(form.description, "");
        assert!(!form.is_blank());
        assert!(SweetForm::default().is_blank());
    }

    #[test]
    fn test_search_filter_pairs_skip_blank_fields() {
        let filter = SearchFilter::default()
            .with_name("  jamun ")
            .with_price_range("", "100");
        assert_eq!(
            filter.query_pairs(),
            vec![("name", "jamun".to_string()), ("maxPrice", "100".to_string())]
        );
        assert!(SearchFilter::default().with_category("   ").is_empty());
    }

    #[test]
    fn test_account_keeps_unknown_fields() {
        let account: UserAccount = serde_json::from_str(account_json()).unwrap();
        assert_eq!(account.class.as_deref(), Some("com.sweetshop.model.User"));
        assert_eq!(account.extra.get("phone"), Some(&Value::from("555-0100")));
        assert_eq!(account.initial(), Some('A'));
        assert!(account.updated_at.is_some());
    }

    #[test]
    fn test_account_accepts_local_timestamp() {
        let account: UserAccount = serde_json::from_str(
            r#"{"id": 3, "email": "b@example.com", "role": "ADMIN", "updatedAt": "2024-05-01T10:00:00.123"}"#,
        )
        .unwrap();
        assert_eq!(account.id, "3");
        assert_eq!(account.display_name(), "User");
        assert_eq!(account.initial(), Some('B'));
        assert!(!account.enabled);
        assert!(account.updated_at.is_some());
    }

    #[test]
    fn test_account_update_preserves_record() {
        let account: UserAccount = serde_json::from_str(account_json()).unwrap();

        let update = AccountUpdate::from_account(&account, "  ", None);
        assert_eq!(update.username.as_deref(), Some("asha"));
        assert_eq!(update.password, None);

        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["email"], "asha@example.com");
        assert_eq!(body["_class"], "com.sweetshop.model.User");
        assert_eq!(body["phone"], "555-0100");
        assert!(body.get("password").is_none());

        let renamed = AccountUpdate::from_account(&account, " Asha K ", Some("secret1".into()));
        let body = serde_json::to_value(&renamed).unwrap();
        assert_eq!(body["username"], "Asha K");
        assert_eq!(body["password"], "secret1");
    }
}
