//! Global Application State
//!
//! Reactive state management using Leptos signals, plus the domain types
//! every view renders. All records are server-authoritative snapshots; the
//! client never enforces stock invariants.

use leptos::*;
use serde::Deserialize;
use std::collections::HashMap;

use crate::state::session;

/// Fallback clinic list used when the directory fetch fails
pub const DEFAULT_CLINICS: &[&str] = &["KPH", "KPKK", "KPP", "KPPR", "KPSS", "KPM"];

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Logged-in user, mirrored to browser storage
    pub user: RwSignal<Option<User>>,
    /// Known locations from the directory (clinics + warehouse)
    pub locations: RwSignal<Vec<String>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Staff roles, used only for client-side route gating
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Role {
    Warehouse,
    Clinic,
    Admin,
}

impl Role {
    /// Dashboard route for this role
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Warehouse => "/warehouse",
            Role::Clinic => "/clinic",
            Role::Admin => "/admin",
        }
    }
}

/// Logged-in user session record
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
    pub location: String,
}

/// Inventory item snapshot from the sheet
///
/// The sheet carries one column per location, so everything that is not a
/// fixed field flattens into a location -> count map.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    #[serde(rename = "Code", deserialize_with = "de_string_from_any", default)]
    pub code: String,
    #[serde(rename = "Item_Name", default)]
    pub name: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "MinStock", deserialize_with = "de_i64_from_any", default)]
    pub min_stock: i64,
    #[serde(flatten)]
    pub stock: HashMap<String, serde_json::Value>,
}

impl Item {
    /// Stock count at a location; missing or malformed cells count as zero
    pub fn stock_at(&self, location: &str) -> i64 {
        self.stock.get(location).map(coerce_count).unwrap_or(0)
    }

    pub fn is_out_of_stock(&self, location: &str) -> bool {
        self.stock_at(location) <= 0
    }

    /// At or below the minimum threshold but not yet empty
    pub fn is_low_stock(&self, location: &str) -> bool {
        let stock = self.stock_at(location);
        stock > 0 && stock <= self.min_stock
    }

    /// Needs restocking (at or below the minimum, empty included)
    pub fn needs_restock(&self, location: &str) -> bool {
        self.stock_at(location) <= self.min_stock
    }

    /// Case-insensitive match on name, code or category
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.code.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
    }
}

/// Transient line in a transfer or usage cart
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CartLine {
    pub code: String,
    pub name: String,
    pub qty: u32,
}

/// Total unit count across cart lines
pub fn cart_units(cart: &[CartLine]) -> u32 {
    cart.iter().map(|line| line.qty).sum()
}

/// Sheet cells arrive as numbers or strings depending on column formatting
pub(crate) fn coerce_count(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn de_string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn de_i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        user: create_rw_signal(session::load_session()),
        locations: create_rw_signal(Vec::new()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Cache the session and make the user current
    pub fn sign_in(&self, user: User) {
        session::store_session(&user);
        self.user.set(Some(user));
    }

    /// Drop the cached session and the current user
    pub fn sign_out(&self) {
        session::clear_session();
        self.user.set(None);
    }

    /// Clinic destinations for transfers; directory first, fallback list
    /// when the directory has not loaded
    pub fn clinic_list(&self) -> Vec<String> {
        let known: Vec<String> = self
            .locations
            .get()
            .into_iter()
            .filter(|l| l != "GUDANG")
            .collect();
        if known.is_empty() {
            DEFAULT_CLINICS.iter().map(|s| s.to_string()).collect()
        } else {
            known
        }
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, name: &str, min: i64, stocks: &[(&str, serde_json::Value)]) -> Item {
        Item {
            code: code.to_string(),
            name: name.to_string(),
            category: "Consumables".to_string(),
            min_stock: min,
            stock: stocks
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_stock_at_coerces_cell_types() {
        let item = item(
            "A100",
            "Gauze",
            5,
            &[
                ("KPH", serde_json::json!(12)),
                ("KPKK", serde_json::json!("7")),
                ("KPP", serde_json::json!(" 3 ")),
                ("KPPR", serde_json::json!(null)),
                ("KPSS", serde_json::json!("n/a")),
            ],
        );

        assert_eq!(item.stock_at("KPH"), 12);
        assert_eq!(item.stock_at("KPKK"), 7);
        assert_eq!(item.stock_at("KPP"), 3);
        assert_eq!(item.stock_at("KPPR"), 0);
        assert_eq!(item.stock_at("KPSS"), 0);
        assert_eq!(item.stock_at("KPM"), 0);
    }

    #[test]
    fn test_low_stock_thresholds() {
        let item = item(
            "A100",
            "Gauze",
            5,
            &[
                ("KPH", serde_json::json!(5)),
                ("KPKK", serde_json::json!(6)),
                ("KPP", serde_json::json!(0)),
            ],
        );

        assert!(item.is_low_stock("KPH"));
        assert!(!item.is_low_stock("KPKK"));
        // empty is out of stock, not "low"
        assert!(!item.is_low_stock("KPP"));
        assert!(item.is_out_of_stock("KPP"));
        assert!(item.needs_restock("KPH"));
        assert!(item.needs_restock("KPP"));
        assert!(!item.needs_restock("KPKK"));
    }

    #[test]
    fn test_search_matches_name_code_and_category() {
        let item = item("A100", "Sterile Gauze", 5, &[]);

        assert!(item.matches_search(""));
        assert!(item.matches_search("gauze"));
        assert!(item.matches_search("a10"));
        assert!(item.matches_search("consum"));
        assert!(!item.matches_search("syringe"));
    }

    #[test]
    fn test_item_deserializes_sheet_row() {
        let row = serde_json::json!({
            "Code": 2001,
            "Item_Name": "Syringe 5ml",
            "Category": "Consumables",
            "MinStock": "10",
            "GUDANG": 240,
            "KPH": "15",
        });

        let item: Item = serde_json::from_value(row).unwrap();
        assert_eq!(item.code, "2001");
        assert_eq!(item.name, "Syringe 5ml");
        assert_eq!(item.min_stock, 10);
        assert_eq!(item.stock_at("GUDANG"), 240);
        assert_eq!(item.stock_at("KPH"), 15);
    }

    #[test]
    fn test_user_roundtrip_matches_service_payload() {
        let payload = r#"{"username":"aini","role":"Clinic","location":"KPH"}"#;
        let user: User = serde_json::from_str(payload).unwrap();

        assert_eq!(user.role, Role::Clinic);
        assert_eq!(user.role.home_path(), "/clinic");

        let back = serde_json::to_string(&user).unwrap();
        let again: User = serde_json::from_str(&back).unwrap();
        assert_eq!(user, again);
    }

    #[test]
    fn test_cart_units() {
        let cart = vec![
            CartLine {
                code: "A100".to_string(),
                name: "Gauze".to_string(),
                qty: 3,
            },
            CartLine {
                code: "A200".to_string(),
                name: "Plaster".to_string(),
                qty: 2,
            },
        ];

        assert_eq!(cart_units(&cart), 5);
        assert_eq!(cart_units(&[]), 0);
    }
}
