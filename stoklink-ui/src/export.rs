//! History Export
//!
//! Client-side CSV assembly plus the Blob/object-URL download trigger.
//! Export is a stateless transform of whatever records the view already
//! holds; nothing is re-fetched.

use wasm_bindgen::JsCast;

use crate::api::{Transfer, UsageRecord};
use crate::state::global::Item;

/// Quote a CSV field when it needs it
pub fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_document(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        let encoded: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&encoded.join(","));
        out.push('\n');
    }
    out
}

/// Transfer ledger rows as CSV
pub fn transfers_csv(transfers: &[Transfer]) -> String {
    csv_document(
        &["TransferID", "From", "To", "Status", "Items", "Created", "Received"],
        transfers
            .iter()
            .map(|t| {
                vec![
                    t.transfer_id.clone(),
                    t.from.clone(),
                    t.to.clone(),
                    t.status.clone(),
                    t.items.clone(),
                    t.created_at.clone(),
                    t.received_at.clone().unwrap_or_default(),
                ]
            })
            .collect(),
    )
}

/// Usage ledger rows as CSV
pub fn usage_csv(usage: &[UsageRecord]) -> String {
    csv_document(
        &["Item", "Code", "Qty", "Timestamp"],
        usage
            .iter()
            .map(|u| {
                vec![
                    u.item_name.clone(),
                    u.code.clone(),
                    u.qty.to_string(),
                    u.timestamp.clone(),
                ]
            })
            .collect(),
    )
}

/// Inventory snapshot as CSV, one column per location
pub fn inventory_csv(items: &[Item], locations: &[String]) -> String {
    let mut header: Vec<&str> = vec!["Code", "Item", "Category", "MinStock"];
    header.extend(locations.iter().map(|l| l.as_str()));

    csv_document(
        &header,
        items
            .iter()
            .map(|item| {
                let mut row = vec![
                    item.code.clone(),
                    item.name.clone(),
                    item.category.clone(),
                    item.min_stock.to_string(),
                ];
                row.extend(locations.iter().map(|l| item.stock_at(l).to_string()));
                row
            })
            .collect(),
    )
}

/// Render a ledger timestamp for display; unparseable values pass through
pub fn format_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%d %b %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Trigger a browser download of the given CSV content
pub fn download_csv(filename: &str, content: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let blob = web_sys::Blob::new_with_str_sequence(&js_sys::Array::of1(&content.into())).ok();

    if let Some(blob) = blob {
        if let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) {
            if let Some(document) = window.document() {
                if let Ok(a) = document.create_element("a") {
                    let _ = a.set_attribute("href", &url);
                    let _ = a.set_attribute("download", filename);
                    if let Some(el) = a.dyn_ref::<web_sys::HtmlElement>() {
                        el.click();
                    }
                }
            }
            let _ = web_sys::Url::revoke_object_url(&url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_transfers_csv() {
        let transfers = vec![Transfer {
            transfer_id: "TXN-9F3K2A".to_string(),
            from: "GUDANG".to_string(),
            to: "KPH".to_string(),
            status: "Received".to_string(),
            items: "Gauze x3, Plaster x2".to_string(),
            created_at: "2024-11-03T09:30:00Z".to_string(),
            received_at: Some("2024-11-03T11:02:00Z".to_string()),
        }];

        let csv = transfers_csv(&transfers);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "TransferID,From,To,Status,Items,Created,Received"
        );
        assert_eq!(
            lines.next().unwrap(),
            "TXN-9F3K2A,GUDANG,KPH,Received,\"Gauze x3, Plaster x2\",2024-11-03T09:30:00Z,2024-11-03T11:02:00Z"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_usage_csv_empty() {
        let csv = usage_csv(&[]);
        assert_eq!(csv, "Item,Code,Qty,Timestamp\n");
    }

    #[test]
    fn test_inventory_csv_columns_follow_locations() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "Code": "A100",
            "Item_Name": "Gauze",
            "Category": "Consumables",
            "MinStock": 5,
            "GUDANG": 40,
            "KPH": 3,
        }))
        .unwrap();

        let locations = vec!["GUDANG".to_string(), "KPH".to_string(), "KPM".to_string()];
        let csv = inventory_csv(&[item], &locations);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Code,Item,Category,MinStock,GUDANG,KPH,KPM");
        assert_eq!(lines.next().unwrap(), "A100,Gauze,Consumables,5,40,3,0");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-11-03T09:30:00+00:00"),
            "03 Nov 2024 09:30"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
