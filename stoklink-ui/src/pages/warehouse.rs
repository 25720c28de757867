//! Warehouse Dashboard
//!
//! Inventory grid with a transfer cart. Checkout creates a transaction
//! upstream and shows its id as a QR code for the receiving clinic.

use leptos::*;
use leptos_router::*;

use crate::api::{self, HistoryResponse};
use crate::components::{InlineLoading, ListSkeleton, Loading, TopBar, TxnQr};
use crate::dialogs;
use crate::export;
use crate::state::global::{cart_units, CartLine, GlobalState, Item, Role, User};

/// Warehouse route, gated on role
#[component]
pub fn Warehouse() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || match state.user.get() {
        Some(user) if user.role == Role::Warehouse => {
            view! { <WarehouseDashboard user=user /> }.into_view()
        }
        _ => view! { <Redirect path="/" /> }.into_view(),
    }
}

#[component]
fn WarehouseDashboard(user: User) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (inventory, set_inventory) = create_signal(Vec::<Item>::new());
    let (cart, set_cart) = create_signal(Vec::<CartLine>::new());
    let (txn_id, set_txn_id) = create_signal(None::<String>);
    let (search, set_search) = create_signal(String::new());
    let (target, set_target) = create_signal(String::new());
    let (loading, set_loading) = create_signal(true);
    let (submitting, set_submitting) = create_signal(false);
    let (show_history, set_show_history) = create_signal(false);
    let (history, set_history) = create_signal(None::<HistoryResponse>);

    let location = user.location.clone();

    // Load inventory and the clinic directory on mount
    let state_for_load = state.clone();
    create_effect(move |_| {
        let state = state_for_load.clone();
        spawn_local(async move {
            match api::fetch_inventory().await {
                Ok(items) => set_inventory.set(items),
                Err(e) => state.show_error(&e),
            }
            set_loading.set(false);

            if let Ok(data) = api::fetch_login_data().await {
                if !data.locations.is_empty() {
                    state.locations.set(data.locations);
                }
            }
        });
    });

    // Default the destination to the first known clinic
    let state_for_target = state.clone();
    create_effect(move |_| {
        let clinics = state_for_target.clinic_list();
        if target.get_untracked().is_empty() {
            if let Some(first) = clinics.first() {
                set_target.set(first.clone());
            }
        }
    });

    let on_add = move |item: Item| {
        let Some(qty) = dialogs::prompt_quantity(&format!("Quantity for {}:", item.name)) else {
            return;
        };
        set_cart.update(|c| {
            c.push(CartLine {
                code: item.code.clone(),
                name: item.name.clone(),
                qty,
            })
        });
    };

    let state_for_checkout = state.clone();
    let from_location = location.clone();
    let on_checkout = move |_| {
        let to = target.get();
        if !dialogs::confirm(&format!("Transfer to {}?", to)) {
            return;
        }

        let from = from_location.clone();
        let lines = cart.get();
        set_submitting.set(true);

        let state_clone = state_for_checkout.clone();
        spawn_local(async move {
            match api::checkout(&from, &to, &lines).await {
                Ok(id) => set_txn_id.set(Some(id)),
                Err(e) => state_clone.show_error(&e),
            }
            set_submitting.set(false);
        });
    };

    let state_for_history = state.clone();
    let history_location = location.clone();
    let on_toggle_history = move |_| {
        let show = !show_history.get();
        set_show_history.set(show);

        if show && history.get().is_none() {
            let loc = history_location.clone();
            let state_clone = state_for_history.clone();
            spawn_local(async move {
                match api::fetch_history(&loc).await {
                    Ok(h) => set_history.set(Some(h)),
                    Err(e) => state_clone.show_error(&e),
                }
            });
        }
    };

    let grid_location = location.clone();

    view! {
        <div class="flex h-screen bg-slate-50">
            <div class="flex-1 flex flex-col min-w-0">
                <TopBar title="Warehouse" user=user.clone() />

                <div class="p-6 overflow-y-auto flex-1">
                    <div class="flex gap-3 mb-6">
                        <input
                            placeholder="Search name, SKU, or category..."
                            on:input=move |ev| set_search.set(event_target_value(&ev))
                            class="flex-1 px-4 py-3 rounded-xl border outline-none focus:ring-2 focus:ring-blue-500"
                        />
                        <button
                            on:click=on_toggle_history
                            class="px-4 py-3 rounded-xl border bg-white text-sm font-bold text-slate-600 hover:bg-slate-100 transition-colors"
                        >
                            {move || if show_history.get() { "Back to Stock" } else { "Transfers" }}
                        </button>
                    </div>

                    {move || {
                        if show_history.get() {
                            view! { <OutgoingTransfers history=history /> }.into_view()
                        } else if loading.get() {
                            view! { <Loading /> }.into_view()
                        } else {
                            let term = search.get();
                            let loc = grid_location.clone();
                            view! {
                                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                                    {inventory.get()
                                        .into_iter()
                                        .filter(|i| i.matches_search(&term))
                                        .map(|item| view! {
                                            <ItemCard item=item location=loc.clone() on_add=on_add />
                                        })
                                        .collect_view()}
                                </div>
                            }.into_view()
                        }
                    }}
                </div>
            </div>

            // Cart sidebar
            <div class="w-80 bg-white border-l shadow-xl flex flex-col">
                <div class="p-4 border-b bg-slate-50 font-bold flex justify-between">
                    <span>
                        "Cart"
                        {move || {
                            let units = cart_units(&cart.get());
                            (units > 0).then(|| view! {
                                <span class="text-xs text-slate-400 font-normal pl-1">
                                    {format!("({} units)", units)}
                                </span>
                            })
                        }}
                    </span>
                    {move || (!cart.get().is_empty()).then(|| view! {
                        <button
                            on:click=move |_| set_cart.set(Vec::new())
                            class="text-red-500 text-xs"
                        >
                            "Clear"
                        </button>
                    })}
                </div>

                <div class="p-4 bg-white border-b">
                    <label class="text-[10px] font-bold text-slate-400 block mb-1 uppercase tracking-wider">
                        "Send to clinic:"
                    </label>
                    <select
                        on:change=move |ev| set_target.set(event_target_value(&ev))
                        prop:value=move || target.get()
                        class="w-full border rounded p-2 text-sm font-bold"
                    >
                        {
                            let state_for_options = state.clone();
                            move || state_for_options.clinic_list().into_iter().map(|l| view! {
                                <option value=l.clone()>{l}</option>
                            }).collect_view()
                        }
                    </select>
                </div>

                <div class="flex-1 overflow-y-auto p-4 space-y-2">
                    {move || cart.get().into_iter().enumerate().map(|(idx, line)| view! {
                        <div class="text-xs p-2 bg-slate-50 rounded border flex justify-between items-center">
                            <span class="truncate pr-2">{line.name.clone()}</span>
                            <div class="flex items-center gap-2">
                                <b>"x"{line.qty}</b>
                                <button
                                    on:click=move |_| set_cart.update(|c| { c.remove(idx); })
                                    class="text-red-400"
                                >
                                    "×"
                                </button>
                            </div>
                        </div>
                    }).collect_view()}
                </div>

                <div class="p-4 border-t">
                    {move || match txn_id.get() {
                        Some(id) => view! {
                            <div>
                                <TxnQr value=id />
                                <button
                                    on:click=move |_| {
                                        set_txn_id.set(None);
                                        set_cart.set(Vec::new());
                                    }
                                    class="block mx-auto text-xs underline mt-2 text-slate-400"
                                >
                                    "Next Transfer"
                                </button>
                            </div>
                        }.into_view(),
                        None => view! {
                            <button
                                on:click=on_checkout.clone()
                                disabled=move || cart.get().is_empty() || submitting.get()
                                class="w-full bg-green-600 text-white py-3 rounded-xl font-bold \
                                       disabled:bg-slate-300 flex items-center justify-center gap-2"
                            >
                                {move || if submitting.get() {
                                    view! { <InlineLoading /> }.into_view()
                                } else {
                                    view! { <span>{move || format!("Transfer to {}", target.get())}</span> }.into_view()
                                }}
                            </button>
                        }.into_view(),
                    }}
                </div>
            </div>
        </div>
    }
}

/// One inventory card in the grid
#[component]
fn ItemCard(
    item: Item,
    #[prop(into)]
    location: String,
    #[prop(into)]
    on_add: Callback<Item>,
) -> impl IntoView {
    let stock = item.stock_at(&location);
    let out = item.is_out_of_stock(&location);
    let low = item.is_low_stock(&location);

    let card_class = if out {
        "p-4 rounded-xl border bg-white opacity-60"
    } else if low {
        "p-4 rounded-xl border border-orange-300 bg-orange-50"
    } else {
        "p-4 rounded-xl border bg-white border-slate-100"
    };

    let badge_class = if out {
        "text-xs px-2 py-1 rounded font-bold h-fit bg-red-500 text-white"
    } else {
        "text-xs px-2 py-1 rounded font-bold h-fit bg-green-100 text-green-700"
    };

    let item_for_add = item.clone();

    view! {
        <div class=card_class>
            <div class="flex justify-between mb-2">
                <div class="truncate pr-2">
                    <div class="flex gap-2 items-center mb-1">
                        <span class="text-[9px] text-blue-500 font-bold uppercase bg-blue-50 px-1 rounded">
                            {item.category.clone()}
                        </span>
                        <span class="text-[9px] text-slate-400 font-mono font-bold">
                            "#" {item.code.clone()}
                        </span>
                    </div>
                    <h3 class="font-bold text-sm truncate">{item.name.clone()}</h3>
                </div>
                <span class=badge_class>{stock}</span>
            </div>
            <button
                on:click=move |_| on_add.call(item_for_add.clone())
                disabled=out
                class="w-full mt-2 bg-blue-50 text-blue-600 py-2 rounded-lg text-xs font-bold \
                       hover:bg-blue-600 hover:text-white disabled:hover:bg-blue-50 \
                       disabled:hover:text-blue-600 transition"
            >
                "Add to Transfer"
            </button>
        </div>
    }
}

/// Outgoing transfer list with CSV export
#[component]
fn OutgoingTransfers(history: ReadSignal<Option<HistoryResponse>>) -> impl IntoView {
    view! {
        <div class="max-w-2xl">
            <div class="flex items-center justify-between mb-4">
                <h2 class="font-bold text-lg">"Outgoing Transfers"</h2>
                <button
                    on:click=move |_| {
                        if let Some(h) = history.get() {
                            export::download_csv("transfers.csv", &export::transfers_csv(&h.transfers));
                        }
                    }
                    disabled=move || history.get().is_none()
                    class="px-4 py-2 bg-slate-200 hover:bg-slate-300 rounded-lg text-xs font-bold transition-colors"
                >
                    "Export CSV"
                </button>
            </div>

            {move || match history.get() {
                None => view! { <ListSkeleton count=4 /> }.into_view(),
                Some(h) if h.transfers.is_empty() => view! {
                    <p class="text-slate-400 text-sm py-8 text-center">"No transfers yet."</p>
                }.into_view(),
                Some(h) => h.transfers.into_iter().map(|t| view! {
                    <div class="p-4 bg-white border rounded-xl flex items-center justify-between mb-2">
                        <div class="text-xs">
                            <b class="font-mono">{t.transfer_id.clone()}</b>
                            <p class="text-[10px] text-slate-400">
                                {t.from.replace('_', " ")} " → " {t.to.replace('_', " ")}
                                " • " {export::format_timestamp(&t.created_at)}
                            </p>
                        </div>
                        <StatusChip status=t.status.clone() />
                    </div>
                }).collect_view(),
            }}
        </div>
    }
}

#[component]
fn StatusChip(#[prop(into)] status: String) -> impl IntoView {
    let class = if status == "Received" {
        "text-[10px] font-bold px-2 py-1 rounded bg-green-100 text-green-700"
    } else {
        "text-[10px] font-bold px-2 py-1 rounded bg-orange-100 text-orange-600"
    };

    view! { <span class=class>{status}</span> }
}
