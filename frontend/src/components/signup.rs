//! 药房自助注册向导页面
//!
//! 状态全部放在 [`SignupWizard`] 中，本组件只负责渲染和转发输入。

use crate::api::use_api;
use crate::components::ui::{TextField, field_error};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::signup::{SignupError, SignupWizard, Step};
use pharmacy_shared::validation::FieldErrors;

#[component]
pub fn SignupPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let wizard = RwSignal::new(SignupWizard::new());
    let errors = RwSignal::new(FieldErrors::new());
    let submitting = RwSignal::new(false);

    let step = move || wizard.with(SignupWizard::step);

    let on_next = move |_| {
        let result = wizard.try_update(SignupWizard::next);
        match result {
            Some(Ok(_)) => errors.set(FieldErrors::new()),
            Some(Err(e)) => errors.set(e),
            None => {}
        }
    };

    let on_back = move |_| {
        errors.set(FieldErrors::new());
        wizard.update(|w| {
            w.back();
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match wizard.with_untracked(SignupWizard::to_request) {
            Ok(req) => req,
            Err(SignupError::Invalid { step, errors: e }) => {
                wizard.update(|w| w.go_to(step));
                errors.set(e);
                return;
            }
            Err(e) => {
                api.toast().error(e.to_string());
                return;
            }
        };

        submitting.set(true);
        spawn_local(async move {
            if api.send(&request, "Registration").await.is_some() {
                log::info!("[Signup] Registered {}", request.pharmacy_name);
                api.toast()
                    .success("Registration submitted. You can sign in once it is approved.");
                wizard.update(SignupWizard::reset);
                router.navigate_to(AppRoute::Login);
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-2xl">
                <div class="text-center">
                    <h1 class="text-3xl font-bold">"Register your pharmacy"</h1>
                    <p class="text-base-content/70">{move || step().title()}</p>
                </div>

                <ul class="steps w-full">
                    {Step::ALL
                        .into_iter()
                        .map(|s| {
                            view! {
                                <li class=move || {
                                    if s.number() <= step().number() { "step step-primary" } else { "step" }
                                }>{s.title()}</li>
                            }
                        })
                        .collect_view()}
                </ul>
                <progress
                    class="progress progress-primary w-full"
                    value=move || wizard.with(|w| w.progress())
                    max="100"
                ></progress>

                <div class="card w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || match step() {
                            Step::ManagerInfo => view! { <ManagerStep wizard=wizard errors=errors /> }.into_any(),
                            Step::BranchInfo => view! { <BranchStep wizard=wizard errors=errors /> }.into_any(),
                            Step::Review => view! { <ReviewStep wizard=wizard /> }.into_any(),
                        }}

                        <div class="flex justify-between mt-6">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                disabled=move || step() == Step::ManagerInfo
                                on:click=on_back
                            >
                                "Back"
                            </button>
                            <Show
                                when=move || step() == Step::Review
                                fallback=move || view! {
                                    <button type="button" class="btn btn-primary" on:click=on_next>"Next"</button>
                                }
                            >
                                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                                    {move || if submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                                    } else {
                                        "Submit registration".into_any()
                                    }}
                                </button>
                            </Show>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ManagerStep(wizard: RwSignal<SignupWizard>, errors: RwSignal<FieldErrors>) -> impl IntoView {
    view! {
        <TextField
            label="Full name"
            value=Signal::derive(move || wizard.with(|w| w.manager.full_name.clone()))
            on_input=move |v: String| wizard.update(|w| w.manager.full_name = v)
            error=field_error(errors, "full_name")
        />
        <div class="grid md:grid-cols-2 gap-4">
            <TextField
                label="Email"
                input_type="email"
                value=Signal::derive(move || wizard.with(|w| w.manager.email.clone()))
                on_input=move |v: String| wizard.update(|w| w.manager.email = v)
                error=field_error(errors, "email")
            />
            <TextField
                label="Phone"
                input_type="tel"
                placeholder="0911 234 567"
                value=Signal::derive(move || wizard.with(|w| w.manager.phone.clone()))
                on_input=move |v: String| wizard.update(|w| w.manager.phone = v)
                error=field_error(errors, "phone")
            />
            <TextField
                label="Password"
                input_type="password"
                value=Signal::derive(move || wizard.with(|w| w.manager.password.clone()))
                on_input=move |v: String| wizard.update(|w| w.manager.password = v)
                error=field_error(errors, "password")
            />
            <TextField
                label="Confirm password"
                input_type="password"
                value=Signal::derive(move || wizard.with(|w| w.manager.confirm_password.clone()))
                on_input=move |v: String| wizard.update(|w| w.manager.confirm_password = v)
                error=field_error(errors, "confirm_password")
            />
        </div>
    }
}

#[component]
fn BranchStep(wizard: RwSignal<SignupWizard>, errors: RwSignal<FieldErrors>) -> impl IntoView {
    view! {
        <div class="grid md:grid-cols-2 gap-4">
            <TextField
                label="Pharmacy name"
                value=Signal::derive(move || wizard.with(|w| w.branch.pharmacy_name.clone()))
                on_input=move |v: String| wizard.update(|w| w.branch.pharmacy_name = v)
                error=field_error(errors, "pharmacy_name")
            />
            <TextField
                label="Branch name"
                value=Signal::derive(move || wizard.with(|w| w.branch.branch_name.clone()))
                on_input=move |v: String| wizard.update(|w| w.branch.branch_name = v)
                error=field_error(errors, "branch_name")
            />
            <TextField
                label="Location"
                value=Signal::derive(move || wizard.with(|w| w.branch.location.clone()))
                on_input=move |v: String| wizard.update(|w| w.branch.location = v)
                error=field_error(errors, "location")
            />
            <TextField
                label="License number"
                value=Signal::derive(move || wizard.with(|w| w.branch.license_number.clone()))
                on_input=move |v: String| wizard.update(|w| w.branch.license_number = v)
                error=field_error(errors, "license_number")
            />
            <TextField
                label="Branch phone"
                input_type="tel"
                value=Signal::derive(move || wizard.with(|w| w.branch.phone.clone()))
                on_input=move |v: String| wizard.update(|w| w.branch.phone = v)
                error=field_error(errors, "branch_phone")
            />
        </div>
    }
}

#[component]
fn ReviewStep(wizard: RwSignal<SignupWizard>) -> impl IntoView {
    let w = wizard.get_untracked();
    let rows = [
        ("Manager", w.manager.full_name),
        ("Email", w.manager.email),
        ("Phone", w.manager.phone),
        ("Pharmacy", w.branch.pharmacy_name),
        ("Branch", w.branch.branch_name),
        ("Location", w.branch.location),
        ("License", w.branch.license_number),
        ("Branch phone", w.branch.phone),
    ];

    view! {
        <table class="table">
            <tbody>
                {rows
                    .into_iter()
                    .map(|(label, value)| view! {
                        <tr>
                            <th class="w-40">{label}</th>
                            <td>{value}</td>
                        </tr>
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}
