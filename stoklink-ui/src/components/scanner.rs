//! QR Scanner Component
//!
//! Binds the html5-qrcode camera scanner loaded from index.html as an opaque
//! JS global; decoding never happens in Rust. Manual transaction-id entry in
//! the clinic receive view is the fallback when no camera is available.

use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    type Html5QrcodeScanner;

    #[wasm_bindgen(constructor, js_class = "Html5QrcodeScanner")]
    fn new(element_id: &str, config: &JsValue, verbose: bool) -> Html5QrcodeScanner;

    #[wasm_bindgen(method)]
    fn render(this: &Html5QrcodeScanner, on_success: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn clear(this: &Html5QrcodeScanner) -> js_sys::Promise;
}

/// Camera scanner viewport; calls `on_scan` with the decoded text
#[component]
pub fn ScannerBox(
    #[prop(into)]
    on_scan: Callback<String>,
) -> impl IntoView {
    let scanner: StoredValue<Option<Html5QrcodeScanner>> = store_value(None);
    let started = store_value(false);

    create_effect(move |_| {
        if started.get_value() {
            return;
        }
        started.set_value(true);

        // The scanner attaches to #reader by id, so wait for the frame in
        // which the element is actually in the document
        request_animation_frame(move || {
            let config = js_sys::Object::new();
            let _ = js_sys::Reflect::set(
                &config,
                &JsValue::from_str("fps"),
                &JsValue::from_f64(10.0),
            );
            let _ = js_sys::Reflect::set(
                &config,
                &JsValue::from_str("qrbox"),
                &JsValue::from_f64(250.0),
            );

            let instance = Html5QrcodeScanner::new("reader", &config, false);

            let callback = Closure::wrap(Box::new(move |text: String| {
                on_scan.call(text);
            }) as Box<dyn FnMut(String)>);
            instance.render(callback.as_ref().unchecked_ref());
            callback.forget();

            scanner.set_value(Some(instance));
        });
    });

    on_cleanup(move || {
        scanner.update_value(|s| {
            if let Some(instance) = s.take() {
                let _ = instance.clear();
            }
        });
    });

    view! {
        <div id="reader" class="overflow-hidden rounded-2xl"></div>
    }
}
