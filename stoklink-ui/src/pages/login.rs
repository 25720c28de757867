//! Login Page
//!
//! Password sign-in plus the one-time-passcode flow. A cached session skips
//! the form and lands on the role's dashboard.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::InlineLoading;
use crate::state::global::GlobalState;

/// Login route; redirects straight to the dashboard when a session exists
#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || match state.user.get() {
        Some(user) => view! { <Redirect path=user.role.home_path() /> }.into_view(),
        None => view! { <LoginCard /> }.into_view(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LoginMode {
    Password,
    Otp,
}

#[component]
fn LoginCard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (mode, set_mode) = create_signal(LoginMode::Password);
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (otp_code, set_otp_code) = create_signal(String::new());
    let (otp_sent, set_otp_sent) = create_signal(false);
    let (loading, set_loading) = create_signal(false);

    let state_for_password = state.clone();
    let on_password_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let u = username.get();
        let p = password.get();
        if u.is_empty() || p.is_empty() {
            state_for_password.show_error("Username and password are required");
            return;
        }

        set_loading.set(true);

        let state_clone = state_for_password.clone();
        spawn_local(async move {
            match api::login(&u, &p).await {
                Ok(user) => {
                    // The route closure above reacts and redirects
                    state_clone.sign_in(user);
                }
                Err(e) => {
                    state_clone.show_error(&format!("Login failed: {}", e));
                }
            }
            set_loading.set(false);
        });
    };

    let state_for_send = state.clone();
    let on_send_otp = move |_| {
        let u = username.get();
        if u.is_empty() {
            state_for_send.show_error("Enter your username first");
            return;
        }

        set_loading.set(true);

        let state_clone = state_for_send.clone();
        spawn_local(async move {
            match api::send_otp(&u).await {
                Ok(resp) if resp.is_success() => {
                    set_otp_sent.set(true);
                    state_clone.show_success("Passcode sent, check your phone");
                }
                Ok(resp) => {
                    state_clone.show_error(
                        resp.message.as_deref().unwrap_or("Could not send passcode"),
                    );
                }
                Err(e) => {
                    state_clone.show_error(&e);
                }
            }
            set_loading.set(false);
        });
    };

    let state_for_verify = state;
    let on_otp_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let u = username.get();
        let code = otp_code.get();
        if u.is_empty() || code.is_empty() {
            state_for_verify.show_error("Username and passcode are required");
            return;
        }

        set_loading.set(true);

        let state_clone = state_for_verify.clone();
        spawn_local(async move {
            match api::verify_otp(&u, &code).await {
                Ok(user) => {
                    state_clone.sign_in(user);
                }
                Err(e) => {
                    state_clone.show_error(&format!("Verification failed: {}", e));
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-slate-100 p-4">
            <div class="bg-white p-8 rounded-2xl shadow-xl w-full max-w-sm border">
                <div class="flex justify-center mb-4 text-5xl">"📦"</div>
                <h1 class="text-2xl font-bold mb-2 text-center text-slate-800">"StokLink"</h1>
                <p class="text-center text-slate-500 mb-6 text-sm">"Sign in to continue"</p>

                // Mode toggle
                <div class="flex bg-slate-100 p-1 rounded-xl mb-6">
                    <ModeTab
                        label="Password"
                        current=mode
                        target=LoginMode::Password
                        on_click=move |_| set_mode.set(LoginMode::Password)
                    />
                    <ModeTab
                        label="One-time code"
                        current=mode
                        target=LoginMode::Otp
                        on_click=move |_| set_mode.set(LoginMode::Otp)
                    />
                </div>

                {move || {
                    if mode.get() == LoginMode::Password {
                        view! {
                            <form on:submit=on_password_submit.clone() class="space-y-4">
                                <input
                                    placeholder="Username"
                                    prop:value=move || username.get()
                                    on:input=move |ev| set_username.set(event_target_value(&ev))
                                    disabled=move || loading.get()
                                    class="w-full p-3 border rounded-lg outline-none focus:ring-2 focus:ring-blue-500"
                                />
                                <input
                                    type="password"
                                    placeholder="Password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    disabled=move || loading.get()
                                    class="w-full p-3 border rounded-lg outline-none focus:ring-2 focus:ring-blue-500"
                                />
                                <SubmitButton loading=loading label="Sign In" />
                            </form>
                        }.into_view()
                    } else {
                        view! {
                            <form on:submit=on_otp_submit.clone() class="space-y-4">
                                <input
                                    placeholder="Username"
                                    prop:value=move || username.get()
                                    on:input=move |ev| set_username.set(event_target_value(&ev))
                                    disabled=move || loading.get()
                                    class="w-full p-3 border rounded-lg outline-none focus:ring-2 focus:ring-blue-500"
                                />
                                <div class="flex gap-2">
                                    <input
                                        placeholder="6-digit code"
                                        prop:value=move || otp_code.get()
                                        on:input=move |ev| set_otp_code.set(event_target_value(&ev))
                                        disabled=move || !otp_sent.get() || loading.get()
                                        class="flex-1 p-3 border rounded-lg font-mono outline-none focus:ring-2 focus:ring-blue-500"
                                    />
                                    <button
                                        type="button"
                                        on:click=on_send_otp.clone()
                                        disabled=move || loading.get()
                                        class="px-4 py-3 bg-slate-200 hover:bg-slate-300 rounded-lg text-sm font-bold transition-colors"
                                    >
                                        {move || if otp_sent.get() { "Resend" } else { "Send code" }}
                                    </button>
                                </div>
                                <SubmitButton loading=loading label="Verify" />
                            </form>
                        }.into_view()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn ModeTab(
    label: &'static str,
    current: ReadSignal<LoginMode>,
    target: LoginMode,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=on_click
            class=move || {
                let base = "flex-1 py-2 text-xs font-bold rounded-lg transition-colors";
                if current.get() == target {
                    format!("{} bg-white shadow text-slate-800", base)
                } else {
                    format!("{} text-slate-500", base)
                }
            }
        >
            {label}
        </button>
    }
}

#[component]
fn SubmitButton(loading: ReadSignal<bool>, label: &'static str) -> impl IntoView {
    view! {
        <button
            type="submit"
            disabled=move || loading.get()
            class="w-full bg-blue-600 text-white py-3 rounded-lg font-bold hover:bg-blue-700 \
                   disabled:bg-slate-400 transition flex items-center justify-center gap-2"
        >
            {move || if loading.get() {
                view! { <InlineLoading /> }.into_view()
            } else {
                view! { <span>{label}</span> }.into_view()
            }}
        </button>
    }
}
