//! App Root Component
//!
//! Routing and global providers. Every route is gated on the cached session:
//! no session sends the user to the login page, a role mismatch sends them
//! back to their own dashboard.

use leptos::*;
use leptos_router::*;

use crate::components::Toast;
use crate::pages::{Admin, Clinic, Login, Warehouse};
use crate::state::global::provide_global_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state (restores the cached session) to all components
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-slate-50 text-slate-800">
                <Routes>
                    <Route path="/" view=Login />
                    <Route path="/warehouse" view=Warehouse />
                    <Route path="/clinic" view=Clinic />
                    <Route path="/admin" view=Admin />
                    <Route path="/*any" view=NotFound />
                </Routes>

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-slate-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium transition-colors"
            >
                "Back to Sign In"
            </A>
        </div>
    }
}
