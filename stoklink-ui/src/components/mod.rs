//! UI Components
//!
//! Reusable Leptos components for the dashboards.

pub mod loading;
pub mod qr;
pub mod scanner;
pub mod toast;
pub mod top_bar;

pub use loading::{InlineLoading, ListSkeleton, Loading};
pub use qr::TxnQr;
pub use scanner::ScannerBox;
pub use toast::Toast;
pub use top_bar::TopBar;
