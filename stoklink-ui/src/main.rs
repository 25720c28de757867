//! StokLink Dashboard
//!
//! Multi-location clinic inventory front-end built with Leptos (WASM).
//!
//! # Features
//!
//! - Warehouse transfer cart with QR-coded transactions
//! - Clinic receive-by-scan, shelf usage and restock views
//! - Admin staff directory and stock overview
//! - History browsing with CSV export
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. All business logic lives in the spreadsheet-backed script
//! service; the app fetches JSON through the StokLink relay and renders it.

use leptos::*;

mod api;
mod app;
mod components;
mod dialogs;
mod export;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
