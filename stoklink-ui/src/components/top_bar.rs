//! Top Bar Component
//!
//! Shared dashboard header with title, location badge and logout.

use leptos::*;

use crate::state::global::{GlobalState, User};

/// Dashboard header
#[component]
pub fn TopBar(
    #[prop(into)]
    title: String,
    user: User,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let location = user.location.replace('_', " ");

    view! {
        <header class="bg-white border-b px-6 py-4 flex justify-between items-center shadow-sm sticky top-0 z-10">
            <div class="flex items-center gap-3 min-w-0">
                <span class="text-2xl">"📦"</span>
                <div class="min-w-0">
                    <h1 class="text-xl font-bold truncate">{title}</h1>
                    <p class="text-xs text-slate-400 truncate">
                        {user.username.clone()} " • " {location}
                    </p>
                </div>
            </div>
            <button
                on:click=move |_| state.sign_out()
                class="px-3 py-2 text-sm text-slate-400 hover:text-red-500 font-medium transition-colors"
            >
                "Log out"
            </button>
        </header>
    }
}
