//! Transaction QR Component
//!
//! Renders a transaction id as an inline SVG QR code. The destination clinic
//! scans it (or types the id) to confirm receipt.

use leptos::*;
use qrcode::render::svg;
use qrcode::QrCode;

/// Encode a value as SVG markup; None if the payload cannot be encoded
pub fn qr_svg(value: &str) -> Option<String> {
    let code = QrCode::new(value.as_bytes()).ok()?;
    Some(
        code.render::<svg::Color>()
            .min_dimensions(140, 140)
            .dark_color(svg::Color("#0f172a"))
            .light_color(svg::Color("#ffffff"))
            .build(),
    )
}

/// QR card shown after a successful checkout
#[component]
pub fn TxnQr(
    #[prop(into)]
    value: String,
) -> impl IntoView {
    let markup = qr_svg(&value);

    view! {
        <div class="text-center">
            {match markup {
                Some(svg_markup) => view! {
                    <div class="mx-auto w-fit border p-2 rounded bg-white" inner_html=svg_markup></div>
                }.into_view(),
                // Unencodable ids still get shown as text for manual entry
                None => view! {
                    <div class="mx-auto w-fit border p-4 rounded bg-slate-50 text-xs text-slate-400">
                        "QR unavailable"
                    </div>
                }.into_view(),
            }}
            <p class="mt-2 font-mono text-xs font-bold text-green-600 uppercase tracking-widest">
                {value}
            </p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_svg_encodes_txn_id() {
        let markup = qr_svg("TXN-9F3K2A").unwrap();
        assert!(markup.starts_with("<?xml") || markup.starts_with("<svg"));
        assert!(markup.contains("svg"));
    }

    #[test]
    fn test_qr_svg_rejects_oversized_payload() {
        // QR capacity tops out well under 8 KB of binary payload
        let huge = "X".repeat(8000);
        assert!(qr_svg(&huge).is_none());
    }
}
