//! Clinic Dashboard
//!
//! Phone-first task menu: record shelf usage, receive transfers by QR scan
//! or manual id entry, check restock needs, browse stock and history.

use leptos::*;
use leptos_router::*;

use crate::api::{self, HistoryResponse};
use crate::components::{ListSkeleton, Loading, ScannerBox, TopBar};
use crate::dialogs;
use crate::export;
use crate::state::global::{CartLine, GlobalState, Item, Role, User};

/// Clinic route, gated on role
#[component]
pub fn Clinic() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || match state.user.get() {
        Some(user) if user.role == Role::Clinic => {
            view! { <ClinicDashboard user=user /> }.into_view()
        }
        _ => view! { <Redirect path="/" /> }.into_view(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ClinicView {
    Menu,
    Receive,
    Usage,
    UsageCart,
    Stock,
    Restock,
    History,
}

#[derive(Clone, Copy, PartialEq)]
enum HistTab {
    Incoming,
    Usage,
}

/// Uppercase and trim a hand-typed or scanned transaction id
pub fn normalize_txn_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[component]
fn ClinicDashboard(user: User) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (view, set_view) = create_signal(ClinicView::Menu);
    let (inventory, set_inventory) = create_signal(Vec::<Item>::new());
    let (cart, set_cart) = create_signal(Vec::<CartLine>::new());
    let (status, set_status) = create_signal(None::<String>);
    let (search, set_search) = create_signal(String::new());
    let (loading, set_loading) = create_signal(false);
    let (submitting, set_submitting) = create_signal(false);
    let (history, set_history) = create_signal(HistoryResponse::default());
    let (hist_tab, set_hist_tab) = create_signal(HistTab::Incoming);

    let location = user.location.clone();

    // Each sub-view fetches its own snapshot when entered
    let state_for_view = state.clone();
    let loc_for_view = location.clone();
    create_effect(move |_| {
        let v = view.get();
        set_search.set(String::new());

        if matches!(
            v,
            ClinicView::Usage | ClinicView::Stock | ClinicView::Restock
        ) {
            let state = state_for_view.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api::fetch_inventory().await {
                    Ok(items) => set_inventory.set(items),
                    Err(e) => state.show_error(&e),
                }
                set_loading.set(false);
            });
        } else if v == ClinicView::History {
            let state = state_for_view.clone();
            let loc = loc_for_view.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api::fetch_history(&loc).await {
                    Ok(h) => set_history.set(h),
                    Err(e) => state.show_error(&e),
                }
                set_loading.set(false);
            });
        }
    });

    // Shared by the scanner and the manual entry form
    let state_for_receive = state.clone();
    let loc_for_receive = location.clone();
    let handle_receive = Callback::new(move |raw: String| {
        let id = normalize_txn_id(&raw);
        if id.is_empty() {
            return;
        }

        set_submitting.set(true);
        set_status.set(Some("Verifying transaction...".to_string()));

        let state = state_for_receive.clone();
        let loc = loc_for_receive.clone();
        spawn_local(async move {
            match api::confirm_receipt(&id, &loc).await {
                Ok(resp) if resp.is_success() => {
                    set_status.set(Some("Success: stock added!".to_string()));
                    gloo_timers::callback::Timeout::new(2000, move || {
                        set_view.set(ClinicView::Menu);
                        set_status.set(None);
                    })
                    .forget();
                }
                Ok(resp) => {
                    set_status.set(None);
                    state.show_error(resp.message.as_deref().unwrap_or("Invalid transaction id"));
                }
                Err(e) => {
                    set_status.set(None);
                    state.show_error(&e);
                }
            }
            set_submitting.set(false);
        });
    });

    let on_add_usage = move |item: Item| {
        let Some(qty) = dialogs::prompt_quantity(&format!("Qty used of {}:", item.name)) else {
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

    let state_for_usage = state.clone();
    let loc_for_usage = location.clone();
    let on_usage_submit = move |_| {
        if !dialogs::confirm("Deduct usage from your shelf?") {
            return;
        }

        let lines = cart.get();
        set_submitting.set(true);

        let state = state_for_usage.clone();
        let loc = loc_for_usage.clone();
        spawn_local(async move {
            match api::record_usage(&loc, &lines).await {
                Ok(resp) if resp.is_success() => {
                    set_cart.set(Vec::new());
                    set_status.set(Some("Stock deducted".to_string()));
                    gloo_timers::callback::Timeout::new(2000, move || {
                        set_view.set(ClinicView::Menu);
                        set_status.set(None);
                    })
                    .forget();
                }
                Ok(resp) => {
                    state.show_error(resp.message.as_deref().unwrap_or("Could not record usage"));
                }
                Err(e) => {
                    state.show_error(&e);
                }
            }
            set_submitting.set(false);
        });
    };

    let clinic_location = location.clone();
    let hist_location = location.clone();

    view! {
        <div class="min-h-screen bg-slate-50 flex flex-col">
            <TopBar title=user.location.replace('_', " ") user=user.clone() />

            <div class="p-4 flex-1 max-w-md mx-auto w-full">
                // Transient status banner
                {move || status.get().map(|msg| view! {
                    <div class="p-4 mb-4 bg-green-600 text-white rounded-xl text-center font-bold shadow-lg">
                        {msg}
                    </div>
                })}

                // Back control on sub-views
                {move || (view.get() != ClinicView::Menu).then(|| view! {
                    <button
                        on:click=move |_| set_view.set(ClinicView::Menu)
                        class="mb-4 px-3 py-2 bg-white border rounded-full text-xs font-bold text-slate-500"
                    >
                        "← Menu"
                    </button>
                })}

                {move || match view.get() {
                    ClinicView::Menu => view! {
                        <div class="grid gap-3">
                            <MenuButton
                                icon="➖"
                                label="Record Usage"
                                hint="Deduct items from inventory"
                                primary=true
                                on_click=move |_| set_view.set(ClinicView::Usage)
                            />
                            <MenuButton
                                icon="📷"
                                label="Receive Stock"
                                hint="Scan QR or enter TXN ID"
                                primary=false
                                on_click=move |_| set_view.set(ClinicView::Receive)
                            />
                            <MenuButton
                                icon="⚠️"
                                label="Restock List"
                                hint="Items below minimum stock"
                                primary=false
                                on_click=move |_| set_view.set(ClinicView::Restock)
                            />
                            <MenuButton
                                icon="🕘"
                                label="Activity History"
                                hint="View and export logs"
                                primary=false
                                on_click=move |_| set_view.set(ClinicView::History)
                            />
                            <MenuButton
                                icon="📦"
                                label="Full Inventory"
                                hint="Check all item levels"
                                primary=false
                                on_click=move |_| set_view.set(ClinicView::Stock)
                            />
                        </div>
                    }.into_view(),

                    ClinicView::Receive => view! {
                        <ReceiveView on_receive=handle_receive submitting=submitting />
                    }.into_view(),

                    ClinicView::Usage => {
                        let loc = clinic_location.clone();
                        view! {
                            <div class="space-y-3">
                                <input
                                    placeholder="Search name or SKU..."
                                    on:input=move |ev| set_search.set(event_target_value(&ev))
                                    class="w-full px-4 py-3 border rounded-xl outline-none focus:ring-2 focus:ring-blue-500"
                                />
                                <div class="bg-blue-50 p-3 rounded-xl flex justify-between items-center">
                                    <span class="text-xs font-bold text-blue-600">
                                        {move || format!("{} items in cart", cart.get().len())}
                                    </span>
                                    <button
                                        on:click=move |_| set_view.set(ClinicView::UsageCart)
                                        class="bg-blue-600 text-white px-4 py-1.5 rounded-lg text-xs font-bold"
                                    >
                                        "Review Usage"
                                    </button>
                                </div>

                                {move || if loading.get() {
                                    view! { <ListSkeleton count=5 /> }.into_view()
                                } else {
                                    let term = search.get();
                                    let loc = loc.clone();
                                    inventory.get()
                                        .into_iter()
                                        .filter(|i| i.matches_search(&term))
                                        .map(|item| {
                                            let stock = item.stock_at(&loc);
                                            let item_for_add = item.clone();
                                            view! {
                                                <div class="bg-white p-4 rounded-xl border flex justify-between items-center shadow-sm">
                                                    <div>
                                                        <p class="text-[9px] text-slate-400 font-mono font-bold">"#" {item.code.clone()}</p>
                                                        <h3 class="text-sm font-bold text-slate-700">{item.name.clone()}</h3>
                                                        <p class="text-xs text-blue-500">"Stock: " {stock}</p>
                                                    </div>
                                                    <button
                                                        on:click=move |_| on_add_usage(item_for_add.clone())
                                                        class="p-3 bg-blue-50 text-blue-600 rounded-xl font-bold"
                                                    >
                                                        "+"
                                                    </button>
                                                </div>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </div>
                        }.into_view()
                    }

                    ClinicView::UsageCart => view! {
                        <div class="space-y-4">
                            <h2 class="font-bold text-lg">"Confirm Usage"</h2>
                            <div class="space-y-2">
                                {move || cart.get().into_iter().enumerate().map(|(idx, line)| view! {
                                    <div class="p-3 bg-white border rounded-xl flex justify-between text-sm">
                                        <span>{line.name.clone()}</span>
                                        <div class="flex items-center gap-3">
                                            <b>"x"{line.qty}</b>
                                            <button
                                                on:click=move |_| set_cart.update(|c| { c.remove(idx); })
                                                class="text-red-500 text-xl"
                                            >
                                                "×"
                                            </button>
                                        </div>
                                    </div>
                                }).collect_view()}
                            </div>
                            <button
                                on:click=on_usage_submit.clone()
                                disabled=move || submitting.get() || cart.get().is_empty()
                                class="w-full bg-blue-600 text-white py-4 rounded-2xl font-bold shadow-lg disabled:bg-slate-300"
                            >
                                {move || if submitting.get() { "Updating..." } else { "Record Usage Now" }}
                            </button>
                        </div>
                    }.into_view(),

                    ClinicView::Stock => {
                        let loc = clinic_location.clone();
                        view! {
                            <div class="space-y-2">
                                <input
                                    placeholder="Search all items..."
                                    on:input=move |ev| set_search.set(event_target_value(&ev))
                                    class="w-full p-3 border rounded-xl mb-2 outline-none focus:ring-2 focus:ring-blue-500"
                                />
                                {move || if loading.get() {
                                    view! { <ListSkeleton count=6 /> }.into_view()
                                } else {
                                    let term = search.get();
                                    let loc = loc.clone();
                                    inventory.get()
                                        .into_iter()
                                        .filter(|i| i.matches_search(&term))
                                        .map(|item| {
                                            let stock = item.stock_at(&loc);
                                            let badge = if item.needs_restock(&loc) {
                                                "font-bold px-3 py-1 rounded-lg bg-red-100 text-red-600"
                                            } else {
                                                "font-bold px-3 py-1 rounded-lg bg-slate-100 text-slate-600"
                                            };
                                            view! {
                                                <div class="p-4 bg-white border rounded-xl flex justify-between items-center">
                                                    <div>
                                                        <p class="text-[9px] text-slate-400 font-mono">"#" {item.code.clone()}</p>
                                                        <span class="text-sm font-bold text-slate-700">{item.name.clone()}</span>
                                                    </div>
                                                    <span class=badge>{stock}</span>
                                                </div>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </div>
                        }.into_view()
                    }

                    ClinicView::Restock => {
                        let loc = clinic_location.clone();
                        view! {
                            <div>
                                {move || if loading.get() {
                                    view! { <ListSkeleton count=4 /> }.into_view()
                                } else {
                                    let loc = loc.clone();
                                    let short: Vec<Item> = inventory.get()
                                        .into_iter()
                                        .filter(|i| i.needs_restock(&loc))
                                        .collect();
                                    if short.is_empty() {
                                        view! {
                                            <p class="text-slate-400 text-sm py-8 text-center">
                                                "Nothing below minimum stock."
                                            </p>
                                        }.into_view()
                                    } else {
                                        short.into_iter().map(|item| {
                                            let stock = item.stock_at(&loc);
                                            view! {
                                                <div class="p-4 bg-orange-50 border border-orange-200 rounded-xl flex justify-between items-center mb-2">
                                                    <div>
                                                        <p class="text-[9px] text-slate-400 font-mono">"#" {item.code.clone()}</p>
                                                        <p class="text-sm font-bold">{item.name.clone()}</p>
                                                    </div>
                                                    <div class="text-right">
                                                        <p class="text-red-600 font-bold">{stock}</p>
                                                        <p class="text-[9px] text-slate-400 uppercase">"Min: " {item.min_stock}</p>
                                                    </div>
                                                </div>
                                            }
                                        }).collect_view()
                                    }
                                }}
                            </div>
                        }.into_view()
                    }

                    ClinicView::History => {
                        let loc = hist_location.clone();
                        view! {
                            <HistoryView
                                history=history
                                hist_tab=hist_tab
                                set_hist_tab=set_hist_tab
                                loading=loading
                                location=loc
                            />
                        }.into_view()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn MenuButton(
    icon: &'static str,
    label: &'static str,
    hint: &'static str,
    primary: bool,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
) -> impl IntoView {
    let class = if primary {
        "bg-blue-600 text-white p-6 rounded-2xl flex items-center gap-4 shadow-xl active:scale-95 transition"
    } else {
        "bg-white p-6 rounded-2xl border flex items-center gap-4 shadow-sm active:scale-95 transition"
    };

    let hint_class = if primary {
        "text-[10px] opacity-70 tracking-wider"
    } else {
        "text-[10px] text-slate-400"
    };

    view! {
        <button on:click=on_click class=class>
            <span class="text-2xl">{icon}</span>
            <div class="text-left">
                <h2 class="font-bold">{label}</h2>
                <p class=hint_class>{hint}</p>
            </div>
        </button>
    }
}

/// Scanner plus manual transaction entry
#[component]
fn ReceiveView(
    on_receive: Callback<String>,
    submitting: ReadSignal<bool>,
) -> impl IntoView {
    let (txn_input, set_txn_input) = create_signal(String::new());

    let on_manual_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_receive.call(txn_input.get());
    };

    view! {
        <div class="bg-white p-4 rounded-3xl shadow-xl border-2 border-blue-500 overflow-hidden">
            <ScannerBox on_scan=on_receive />

            <div class="mt-4 pt-4 border-t border-dashed">
                <p class="text-center text-[10px] text-slate-400 font-bold uppercase mb-4 tracking-widest">
                    "Or manual transaction entry"
                </p>
                <form on:submit=on_manual_submit class="flex gap-2">
                    <input
                        placeholder="TXN-XXXXXX"
                        prop:value=move || txn_input.get()
                        on:input=move |ev| set_txn_input.set(event_target_value(&ev))
                        class="flex-1 p-3 border rounded-xl font-mono text-sm outline-none \
                               focus:ring-2 focus:ring-blue-500 uppercase"
                    />
                    <button
                        type="submit"
                        disabled=move || submitting.get()
                        class="bg-blue-600 text-white px-4 rounded-xl font-bold disabled:bg-slate-300"
                    >
                        "Confirm"
                    </button>
                </form>
            </div>
        </div>
    }
}

/// Incoming / usage history with per-tab CSV export
#[component]
fn HistoryView(
    history: ReadSignal<HistoryResponse>,
    hist_tab: ReadSignal<HistTab>,
    set_hist_tab: WriteSignal<HistTab>,
    loading: ReadSignal<bool>,
    #[prop(into)]
    location: String,
) -> impl IntoView {
    let export_name = location.to_lowercase();

    view! {
        <div class="space-y-4">
            <div class="flex bg-slate-200 p-1 rounded-xl">
                <TabButton
                    label="Incoming"
                    current=hist_tab
                    target=HistTab::Incoming
                    on_click=move |_| set_hist_tab.set(HistTab::Incoming)
                />
                <TabButton
                    label="Usage"
                    current=hist_tab
                    target=HistTab::Usage
                    on_click=move |_| set_hist_tab.set(HistTab::Usage)
                />
            </div>

            <button
                on:click=move |_| {
                    let h = history.get();
                    match hist_tab.get() {
                        HistTab::Incoming => export::download_csv(
                            &format!("{}-transfers.csv", export_name),
                            &export::transfers_csv(&h.transfers),
                        ),
                        HistTab::Usage => export::download_csv(
                            &format!("{}-usage.csv", export_name),
                            &export::usage_csv(&h.usage),
                        ),
                    }
                }
                class="w-full px-4 py-2 bg-white border rounded-xl text-xs font-bold text-slate-600 hover:bg-slate-100 transition-colors"
            >
                "Export CSV"
            </button>

            {move || if loading.get() {
                view! { <Loading /> }.into_view()
            } else {
                let h = history.get();
                match hist_tab.get() {
                    HistTab::Incoming => h.transfers.into_iter().map(|t| view! {
                        <div class="p-4 bg-white border rounded-xl flex items-center gap-3 mb-2">
                            <span class="text-green-500 text-xl">"⬇"</span>
                            <div class="text-xs">
                                <b class="font-mono">{t.transfer_id.clone()}</b>
                                <p class="text-[10px] text-slate-400">
                                    "From " {t.from.replace('_', " ")} " • " {t.status.clone()}
                                </p>
                            </div>
                        </div>
                    }).collect_view(),
                    HistTab::Usage => h.usage.into_iter().map(|u| view! {
                        <div class="p-4 bg-white border rounded-xl flex items-center gap-3 mb-2">
                            <span class="text-red-500 text-xl">"⬆"</span>
                            <div class="text-xs">
                                <b>{u.item_name.clone()}</b>
                                <p class="text-[10px] text-slate-400">
                                    {export::format_timestamp(&u.timestamp)} " • Qty " {u.qty}
                                </p>
                            </div>
                        </div>
                    }).collect_view(),
                }
            }}
        </div>
    }
}

#[component]
fn TabButton(
    label: &'static str,
    current: ReadSignal<HistTab>,
    target: HistTab,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button
            on:click=on_click
            class=move || {
                let base = "flex-1 py-2 text-xs font-bold rounded-lg transition-colors";
                if current.get() == target {
                    format!("{} bg-white shadow", base)
                } else {
                    format!("{} text-slate-500", base)
                }
            }
        >
            {label}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_txn_id() {
        assert_eq!(normalize_txn_id("  txn-9f3k2a "), "TXN-9F3K2A");
        assert_eq!(normalize_txn_id("TXN-AB12"), "TXN-AB12");
        assert_eq!(normalize_txn_id("   "), "");
    }
}
