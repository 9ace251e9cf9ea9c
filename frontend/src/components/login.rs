use crate::auth::{login, use_auth};
use crate::toast::use_toast;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::validation::is_valid_email;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_loading = move || auth.state.with(|s| s.is_loading);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get();
        let password = password.get();
        if email.trim().is_empty() || password.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }
        if !is_valid_email(&email) {
            set_error_msg.set(Some("Please enter a valid email address".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            // 成功后路由服务根据角色自动跳转
            match login(&auth, email, password).await {
                Ok(role) => toast.success(format!("Welcome back, {}", role.label())),
                Err(e) => {
                    log::warn!("[Login] {}", e);
                    let message = if e.is_unauthorized() {
                        "Invalid email or password".to_string()
                    } else {
                        e.to_string()
                    };
                    set_error_msg.set(Some(message));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <Show
            when=move || !is_loading()
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <h1 class="text-3xl font-bold">"PharmaCare"</h1>
                        <p class="text-base-content/70">"Sign in to manage your pharmacy"</p>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit>
                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="you@pharmacy.et"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"Password"</span>
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    placeholder="••••••••"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                    } else {
                                        "Sign in".into_any()
                                    }}
                                </button>
                            </div>
                            <p class="text-center text-sm mt-2">
                                "New pharmacy? "
                                <Link to=AppRoute::Signup class="link link-primary">"Register here"</Link>
                            </p>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}
