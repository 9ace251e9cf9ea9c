//! 收银班次：开班、交班与清点差额

use super::load_session;
use crate::api::use_api;
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, PageHeader, Spinner, TextField, field_error};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::CashSession;
use pharmacy_shared::format::{format_datetime, format_etb};
use pharmacy_shared::session::{CashSessionState, variance};
use pharmacy_shared::validation::{FieldErrors, parse_decimal_in_range};
use rust_decimal::Decimal;

const AMOUNT_FIELD: &str = "amount";

fn parse_amount(raw: &str, label: &str) -> Result<Decimal, FieldErrors> {
    let mut errors = FieldErrors::new();
    match parse_decimal_in_range(&mut errors, AMOUNT_FIELD, label, raw, Decimal::ZERO, None) {
        Some(amount) => Ok(amount),
        None => Err(errors),
    }
}

fn variance_text(amount: Decimal) -> (String, &'static str) {
    if amount.is_zero() {
        ("Balanced".to_string(), "text-success")
    } else if amount.is_sign_positive() {
        (format!("Over by {}", format_etb(amount)), "text-warning")
    } else {
        (format!("Short by {}", format_etb(-amount)), "text-error")
    }
}

#[component]
pub fn CashSessionPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(CashSessionState::default());
    let loading = RwSignal::new(true);
    let amount = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let busy = RwSignal::new(false);
    // 最近一次交班结果，用于显示差额
    let last_closed = RwSignal::new(Option::<CashSession>::None);

    load_session(api, state, loading);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let is_open = state.with_untracked(CashSessionState::is_open);
        let label = if is_open { "Counted cash" } else { "Opening balance" };
        let value = match amount.with_untracked(|raw| parse_amount(raw, label)) {
            Ok(v) => v,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(FieldErrors::new());

        if is_open {
            let req = match state.with_untracked(|s| s.close_request(value)) {
                Ok(req) => req,
                Err(e) => {
                    api.toast().error(e.to_string());
                    return;
                }
            };
            busy.set(true);
            spawn_local(async move {
                if let Some(closed) = api.send(&req, "Closing cash session").await {
                    log::info!("[CashSession] closed {}", closed.id);
                    api.toast().success("Cash session closed");
                    state.update(|s| s.apply(closed.clone()));
                    last_closed.set(Some(closed));
                    amount.set(String::new());
                }
                busy.set(false);
            });
        } else {
            let req = match state.with_untracked(|s| s.open_request(value)) {
                Ok(req) => req,
                Err(e) => {
                    api.toast().error(e.to_string());
                    return;
                }
            };
            busy.set(true);
            spawn_local(async move {
                if let Some(opened) = api.send(&req, "Opening cash session").await {
                    log::info!("[CashSession] opened {}", opened.id);
                    api.toast()
                        .success(format!("Session opened with {}", format_etb(opened.opening_balance)));
                    state.update(|s| s.apply(opened));
                    last_closed.set(None);
                    amount.set(String::new());
                }
                busy.set(false);
            });
        }
    };

    let is_open = move || state.with(CashSessionState::is_open);

    // 交班前的实时差额预估（后端提供应收金额时）
    let live_variance = move || {
        let expected = state.with(|s| s.current().and_then(|c| c.expected_balance))?;
        let counted = amount.with(|raw| raw.trim().parse::<Decimal>().ok())?;
        Some(variance(expected, counted))
    };

    view! {
        <AppShell>
            <PageHeader title="Cash session" subtitle="Open the drawer at the start of a shift and count it at the end" />

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <div class="grid gap-6 lg:grid-cols-2">
                    <Card title="Current session">
                        {move || match state.get().current().cloned() {
                            Some(s) => view! {
                                <div class="space-y-2">
                                    <Badge text="Open" tone="badge-success" />
                                    <p>"Opened " {format_datetime(&s.opened_at)}</p>
                                    <p>"Opening balance: " <span class="font-mono">{format_etb(s.opening_balance)}</span></p>
                                    {s.expected_balance.map(|e| view! {
                                        <p>"Expected in drawer: " <span class="font-mono">{format_etb(e)}</span></p>
                                    })}
                                </div>
                            }
                            .into_any(),
                            None => view! {
                                <div class="space-y-2">
                                    <Badge text="Closed" tone="badge-ghost" />
                                    <p class="opacity-70">"No session is open. Sales are blocked until you open one."</p>
                                </div>
                            }
                            .into_any(),
                        }}
                    </Card>

                    <Card title="Drawer">
                        <form on:submit=on_submit class="space-y-2">
                            <p class="text-sm opacity-70">
                                {move || if is_open() {
                                    "Count the cash in the drawer to close this session."
                                } else {
                                    "Enter the float in the drawer to open a session."
                                }}
                            </p>
                            <TextField
                                label="Amount (ETB)"
                                input_type="text"
                                placeholder="0.00"
                                value=Signal::derive(move || amount.get())
                                on_input=move |v: String| amount.set(v)
                                error=field_error(errors, AMOUNT_FIELD)
                            />
                            {move || live_variance().map(|v| {
                                let (text, tone) = variance_text(v);
                                view! { <p class=format!("font-semibold {}", tone)>{text}</p> }
                            })}
                            <button
                                type="submit"
                                class=move || { if is_open() { "btn btn-warning w-full" } else { "btn btn-primary w-full" } }
                                disabled=move || busy.get()
                            >
                                {move || match (busy.get(), is_open()) {
                                    (true, _) => "Working...",
                                    (false, true) => "Close session",
                                    (false, false) => "Open session",
                                }}
                            </button>
                        </form>
                    </Card>
                </div>

                {move || last_closed.get().map(|s| {
                    let counted = s.closing_balance.unwrap_or_default();
                    let summary = s.expected_balance.map(|expected| variance_text(variance(expected, counted)));
                    view! {
                        <Card title="Last closed session">
                            <p>"Closed " {s.closed_at.as_ref().map(format_datetime).unwrap_or_default()}</p>
                            <p>"Counted: " <span class="font-mono">{format_etb(counted)}</span></p>
                            {s.expected_balance.map(|e| view! {
                                <p>"Expected: " <span class="font-mono">{format_etb(e)}</span></p>
                            })}
                            {summary.map(|(text, tone)| view! { <p class=format!("font-semibold {}", tone)>{text}</p> })}
                        </Card>
                    }
                })}
            </Show>
        </AppShell>
    }
}
