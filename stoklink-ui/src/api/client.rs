//! HTTP API Client
//!
//! Functions for talking to the script service through the StokLink relay.
//! Reads go out as GET with an `action` query parameter, writes as POST with
//! an `action` field in the JSON body, matching what the sheet script
//! dispatches on.

use gloo_net::http::{Request, Response};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::state::global::{de_i64_from_any, de_string_from_any, CartLine, Item, User};

/// Default relay URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8090/api";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(url)) = storage.get_item("stoklink_api_url") {
                url
            } else {
                DEFAULT_API_BASE.to_string()
            }
        } else {
            DEFAULT_API_BASE.to_string()
        }
    } else {
        DEFAULT_API_BASE.to_string()
    };
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item("stoklink_api_url", url);
        }
    }
}

/// Escape a user-entered value for a query string
pub fn query_escape(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

// ============ Response Types ============

#[derive(Debug, serde::Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct CheckoutResponse {
    #[serde(rename = "txnId")]
    pub txn_id: String,
}

/// A transfer row from the ledger sheet
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Transfer {
    #[serde(rename = "TransferID", deserialize_with = "de_string_from_any", default)]
    pub transfer_id: String,
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "To", default)]
    pub to: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Items", default)]
    pub items: String,
    #[serde(rename = "Timestamp", default)]
    pub created_at: String,
    #[serde(rename = "ReceivedAt", default)]
    pub received_at: Option<String>,
}

/// A usage deduction row from the ledger sheet
#[derive(Clone, Debug, serde::Deserialize)]
pub struct UsageRecord {
    #[serde(rename = "Item_Name", default)]
    pub item_name: String,
    #[serde(rename = "Code", deserialize_with = "de_string_from_any", default)]
    pub code: String,
    #[serde(rename = "Qty", deserialize_with = "de_i64_from_any", default)]
    pub qty: i64,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub transfers: Vec<Transfer>,
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
}

/// Directory payload for the admin dashboard and destination pickers
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct RelayErrorResponse {
    error: RelayErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct RelayErrorBody {
    message: String,
}

/// Best-effort message out of a non-2xx response body
///
/// The body can only be read once, so take it as text and try the relay
/// error shape first, then the script service's status shape.
async fn error_message(response: &Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<RelayErrorResponse>(&text) {
        return err.error.message;
    }
    if let Ok(body) = serde_json::from_str::<StatusResponse>(&text) {
        if let Some(message) = body.message {
            return message;
        }
    }
    format!("Request failed with status {}", status)
}

/// Turn an authentication payload into a user or a displayable failure
fn auth_result(auth: AuthResponse) -> Result<User, String> {
    if auth.authenticated {
        auth.user
            .ok_or_else(|| "Malformed login response".to_string())
    } else {
        Err(auth
            .message
            .unwrap_or_else(|| "Invalid username or password".to_string()))
    }
}

// ============ API Functions ============

/// Password sign-in
pub async fn login(username: &str, password: &str) -> Result<User, String> {
    let url = format!(
        "{}?action=login&user={}&pass={}",
        get_api_base(),
        query_escape(username),
        query_escape(password),
    );

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    let auth: AuthResponse = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    auth_result(auth)
}

/// Ask the service to issue a one-time passcode for a username
pub async fn send_otp(username: &str) -> Result<StatusResponse, String> {
    let url = format!(
        "{}?action=sendOTP&user={}",
        get_api_base(),
        query_escape(username),
    );

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Exchange a one-time passcode for a session
pub async fn verify_otp(username: &str, code: &str) -> Result<User, String> {
    #[derive(serde::Serialize)]
    struct VerifyOtpRequest<'a> {
        action: &'static str,
        user: &'a str,
        code: &'a str,
    }

    let response = Request::post(&get_api_base())
        .json(&VerifyOtpRequest {
            action: "verifyOTP",
            user: username,
            code,
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    let auth: AuthResponse = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    auth_result(auth)
}

/// Fetch the user directory and location list
pub async fn fetch_login_data() -> Result<LoginData, String> {
    let url = format!("{}?action=getLoginData", get_api_base());

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Fetch the full inventory snapshot (all locations)
pub async fn fetch_inventory() -> Result<Vec<Item>, String> {
    let url = format!("{}?action=getInventory", get_api_base());

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Fetch transfer and usage history for a location
pub async fn fetch_history(location: &str) -> Result<HistoryResponse, String> {
    let url = format!(
        "{}?action=getHistory&location={}",
        get_api_base(),
        query_escape(location),
    );

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Create a transfer; returns the transaction id to show as a QR code
pub async fn checkout(from: &str, to: &str, cart: &[CartLine]) -> Result<String, String> {
    #[derive(serde::Serialize)]
    struct CheckoutRequest<'a> {
        action: &'static str,
        from: &'a str,
        to: &'a str,
        cart: &'a [CartLine],
    }

    let response = Request::post(&get_api_base())
        .json(&CheckoutRequest {
            action: "checkout",
            from,
            to,
            cart,
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    let result: CheckoutResponse = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    Ok(result.txn_id)
}

/// Confirm receipt of a transfer at the destination clinic
pub async fn confirm_receipt(txn_id: &str, to: &str) -> Result<StatusResponse, String> {
    #[derive(serde::Serialize)]
    struct ConfirmReceiptRequest<'a> {
        action: &'static str,
        #[serde(rename = "txnId")]
        txn_id: &'a str,
        to: &'a str,
    }

    let response = Request::post(&get_api_base())
        .json(&ConfirmReceiptRequest {
            action: "confirmReceipt",
            txn_id,
            to,
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Deduct shelf usage at a clinic, not tied to any transfer
pub async fn record_usage(location: &str, cart: &[CartLine]) -> Result<StatusResponse, String> {
    #[derive(serde::Serialize)]
    struct RecordUsageRequest<'a> {
        action: &'static str,
        location: &'a str,
        cart: &'a [CartLine],
    }

    let response = Request::post(&get_api_base())
        .json(&RecordUsageRequest {
            action: "recordUsage",
            location,
            cart,
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Create a staff account (admin only)
pub async fn add_user(
    username: &str,
    password: &str,
    role: &str,
    location: &str,
) -> Result<StatusResponse, String> {
    #[derive(serde::Serialize)]
    struct AddUserRequest<'a> {
        action: &'static str,
        username: &'a str,
        password: &'a str,
        role: &'a str,
        location: &'a str,
    }

    let response = Request::post(&get_api_base())
        .json(&AddUserRequest {
            action: "addUser",
            username,
            password,
            role,
            location,
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_escape() {
        assert_eq!(query_escape("aini"), "aini");
        assert_eq!(query_escape("a b&c"), "a%20b%26c");
        assert_eq!(query_escape("p@ss=1"), "p%40ss%3D1");
    }

    #[test]
    fn test_auth_result() {
        let ok = AuthResponse {
            authenticated: true,
            user: Some(crate::state::global::User {
                username: "aini".to_string(),
                role: crate::state::global::Role::Clinic,
                location: "KPH".to_string(),
            }),
            message: None,
        };
        assert_eq!(auth_result(ok).unwrap().username, "aini");

        let denied = AuthResponse {
            authenticated: false,
            user: None,
            message: Some("Account locked".to_string()),
        };
        assert_eq!(auth_result(denied).unwrap_err(), "Account locked");

        let denied_no_message = AuthResponse {
            authenticated: false,
            user: None,
            message: None,
        };
        assert_eq!(
            auth_result(denied_no_message).unwrap_err(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_status_response_success_flag() {
        let ok: StatusResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(ok.is_success());

        let err: StatusResponse =
            serde_json::from_str(r#"{"status":"error","message":"Invalid Transaction ID"}"#)
                .unwrap();
        assert!(!err.is_success());
        assert_eq!(err.message.as_deref(), Some("Invalid Transaction ID"));
    }

    #[test]
    fn test_history_tolerates_partial_payload() {
        let history: HistoryResponse = serde_json::from_str(r#"{"transfers":[]}"#).unwrap();
        assert!(history.transfers.is_empty());
        assert!(history.usage.is_empty());

        let history: HistoryResponse = serde_json::from_str(
            r#"{
                "transfers": [
                    {"TransferID": "TXN-9F3K2A", "From": "GUDANG", "To": "KPH", "Status": "Pending"}
                ],
                "usage": [
                    {"Item_Name": "Gauze", "Code": 2001, "Qty": "4", "Timestamp": "2024-11-03T09:30:00Z"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(history.transfers[0].transfer_id, "TXN-9F3K2A");
        assert!(history.transfers[0].received_at.is_none());
        assert_eq!(history.usage[0].code, "2001");
        assert_eq!(history.usage[0].qty, 4);
    }
}
