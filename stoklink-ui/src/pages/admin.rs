//! Admin Dashboard
//!
//! Staff directory with account creation, plus an all-locations inventory
//! overview with CSV export.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{Loading, TopBar};
use crate::export;
use crate::state::global::{GlobalState, Item, Role, User, DEFAULT_CLINICS};

/// Admin route, gated on role
#[component]
pub fn Admin() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || match state.user.get() {
        Some(user) if user.role == Role::Admin => {
            view! { <AdminDashboard user=user /> }.into_view()
        }
        _ => view! { <Redirect path="/" /> }.into_view(),
    }
}

/// Location columns for the overview table; directory first, fallback when
/// the directory has not loaded
fn overview_locations(known: &[String]) -> Vec<String> {
    if known.is_empty() {
        let mut all = vec!["GUDANG".to_string()];
        all.extend(DEFAULT_CLINICS.iter().map(|s| s.to_string()));
        all
    } else {
        known.to_vec()
    }
}

#[component]
fn AdminDashboard(user: User) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (directory, set_directory) = create_signal(Vec::<User>::new());
    let (inventory, set_inventory) = create_signal(Vec::<Item>::new());
    let (loading, set_loading) = create_signal(true);
    let (reload_trigger, set_reload_trigger) = create_signal(0u32);

    let state_for_load = state.clone();
    create_effect(move |_| {
        let _ = reload_trigger.get();

        let state = state_for_load.clone();
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_login_data().await {
                Ok(data) => {
                    set_directory.set(data.users);
                    if !data.locations.is_empty() {
                        state.locations.set(data.locations);
                    }
                }
                Err(e) => state.show_error(&e),
            }

            match api::fetch_inventory().await {
                Ok(items) => set_inventory.set(items),
                Err(e) => state.show_error(&e),
            }

            set_loading.set(false);
        });
    });

    let locations_signal = state.locations;
    let state_for_export = state.clone();

    view! {
        <div class="min-h-screen bg-slate-50 flex flex-col">
            <TopBar title="Administration" user=user.clone() />

            <div class="p-6 flex-1 space-y-8 max-w-5xl mx-auto w-full">
                // Staff directory
                <section class="bg-white rounded-xl border p-6">
                    <h2 class="text-lg font-bold mb-4">"Staff Directory"</h2>

                    <div class="grid md:grid-cols-2 gap-6">
                        <div class="space-y-2">
                            {move || if loading.get() {
                                view! { <Loading /> }.into_view()
                            } else if directory.get().is_empty() {
                                view! {
                                    <p class="text-slate-400 text-sm py-4">"No accounts in the directory."</p>
                                }.into_view()
                            } else {
                                directory.get().into_iter().map(|entry| view! {
                                    <div class="p-3 border rounded-xl flex justify-between items-center text-sm">
                                        <div>
                                            <b>{entry.username.clone()}</b>
                                            <p class="text-[10px] text-slate-400">
                                                {entry.location.replace('_', " ")}
                                            </p>
                                        </div>
                                        <RoleChip role=entry.role />
                                    </div>
                                }).collect_view()
                            }}
                        </div>

                        <AddUserForm on_created=move |_| set_reload_trigger.update(|n| *n += 1) />
                    </div>
                </section>

                // All-locations stock overview
                <section class="bg-white rounded-xl border p-6">
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-lg font-bold">"Stock Overview"</h2>
                        <button
                            on:click=move |_| {
                                let locations = overview_locations(&state_for_export.locations.get());
                                export::download_csv(
                                    "inventory.csv",
                                    &export::inventory_csv(&inventory.get(), &locations),
                                );
                            }
                            class="px-4 py-2 bg-slate-200 hover:bg-slate-300 rounded-lg text-xs font-bold transition-colors"
                        >
                            "Export CSV"
                        </button>
                    </div>

                    {move || if loading.get() {
                        view! { <Loading /> }.into_view()
                    } else {
                        let locations = overview_locations(&locations_signal.get());
                        let header_locations = locations.clone();
                        view! {
                            <div class="overflow-x-auto">
                                <table class="w-full text-sm">
                                    <thead>
                                        <tr class="text-left text-[10px] uppercase text-slate-400 border-b">
                                            <th class="py-2 pr-4">"Item"</th>
                                            <th class="py-2 pr-4">"Min"</th>
                                            {header_locations.into_iter().map(|l| view! {
                                                <th class="py-2 pr-4">{l.replace('_', " ")}</th>
                                            }).collect_view()}
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {inventory.get().into_iter().map(|item| {
                                            let row_locations = locations.clone();
                                            view! {
                                                <tr class="border-b last:border-0">
                                                    <td class="py-2 pr-4">
                                                        <span class="font-bold">{item.name.clone()}</span>
                                                        <span class="text-[10px] text-slate-400 font-mono pl-2">
                                                            "#" {item.code.clone()}
                                                        </span>
                                                    </td>
                                                    <td class="py-2 pr-4 text-slate-400">{item.min_stock}</td>
                                                    {row_locations.into_iter().map(|l| {
                                                        let stock = item.stock_at(&l);
                                                        let cell = if item.needs_restock(&l) {
                                                            "py-2 pr-4 font-bold text-red-600"
                                                        } else {
                                                            "py-2 pr-4"
                                                        };
                                                        view! { <td class=cell>{stock}</td> }
                                                    }).collect_view()}
                                                </tr>
                                            }
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            </div>
                        }.into_view()
                    }}
                </section>
            </div>
        </div>
    }
}

#[component]
fn RoleChip(role: Role) -> impl IntoView {
    let (label, class) = match role {
        Role::Warehouse => (
            "Warehouse",
            "text-[10px] font-bold px-2 py-1 rounded bg-blue-100 text-blue-700",
        ),
        Role::Clinic => (
            "Clinic",
            "text-[10px] font-bold px-2 py-1 rounded bg-green-100 text-green-700",
        ),
        Role::Admin => (
            "Admin",
            "text-[10px] font-bold px-2 py-1 rounded bg-purple-100 text-purple-700",
        ),
    };

    view! { <span class=class>{label}</span> }
}

/// Account creation form
#[component]
fn AddUserForm(
    #[prop(into)]
    on_created: Callback<()>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (role, set_role) = create_signal("Clinic".to_string());
    let (location, set_location) = create_signal("KPH".to_string());
    let (submitting, set_submitting) = create_signal(false);

    let location_options = {
        let state = state.clone();
        move || overview_locations(&state.locations.get())
    };

    let state_for_submit = state;
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let u = username.get();
        let p = password.get();
        let r = role.get();
        let l = location.get();

        if u.is_empty() || p.is_empty() {
            state_for_submit.show_error("Username and password are required");
            return;
        }

        set_submitting.set(true);

        let state_clone = state_for_submit.clone();
        spawn_local(async move {
            match api::add_user(&u, &p, &r, &l).await {
                Ok(resp) if resp.is_success() => {
                    state_clone.show_success("Account created");
                    set_username.set(String::new());
                    set_password.set(String::new());
                    on_created.call(());
                }
                Ok(resp) => {
                    state_clone.show_error(
                        resp.message.as_deref().unwrap_or("Could not create account"),
                    );
                }
                Err(e) => {
                    state_clone.show_error(&e);
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-3 bg-slate-50 rounded-xl p-4 h-fit">
            <h3 class="text-sm font-bold text-slate-600">"Add Account"</h3>

            <input
                placeholder="Username"
                prop:value=move || username.get()
                on:input=move |ev| set_username.set(event_target_value(&ev))
                class="w-full p-3 border rounded-lg text-sm outline-none focus:ring-2 focus:ring-blue-500"
            />
            <input
                type="password"
                placeholder="Password"
                prop:value=move || password.get()
                on:input=move |ev| set_password.set(event_target_value(&ev))
                class="w-full p-3 border rounded-lg text-sm outline-none focus:ring-2 focus:ring-blue-500"
            />

            <div class="flex gap-2">
                <select
                    on:change=move |ev| set_role.set(event_target_value(&ev))
                    prop:value=move || role.get()
                    class="flex-1 border rounded-lg p-2 text-sm font-bold"
                >
                    <option value="Warehouse">"Warehouse"</option>
                    <option value="Clinic">"Clinic"</option>
                    <option value="Admin">"Admin"</option>
                </select>

                <select
                    on:change=move |ev| set_location.set(event_target_value(&ev))
                    prop:value=move || location.get()
                    class="flex-1 border rounded-lg p-2 text-sm font-bold"
                >
                    {move || location_options().into_iter().map(|l| view! {
                        <option value=l.clone()>{l}</option>
                    }).collect_view()}
                </select>
            </div>

            <button
                type="submit"
                disabled=move || submitting.get()
                class="w-full bg-blue-600 text-white py-3 rounded-lg text-sm font-bold \
                       hover:bg-blue-700 disabled:bg-slate-300 transition"
            >
                {move || if submitting.get() { "Creating..." } else { "Create Account" }}
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_locations_fallback() {
        let fallback = overview_locations(&[]);
        assert_eq!(fallback[0], "GUDANG");
        assert!(fallback.contains(&"KPH".to_string()));
        assert_eq!(fallback.len(), 1 + DEFAULT_CLINICS.len());
    }

    #[test]
    fn test_overview_locations_prefers_directory() {
        let known = vec!["GUDANG".to_string(), "KPX".to_string()];
        assert_eq!(overview_locations(&known), known);
    }
}
