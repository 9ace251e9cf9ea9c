//! 经理提交支持工单
//!
//! 后端没有提供经理侧的工单列表，这里只展示本次会话中提交过的工单。

use crate::api::use_api;
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, TextField, field_error};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::format::format_optional_date;
use pharmacy_shared::forms::TicketDraft;
use pharmacy_shared::protocol::CreateTicketRequest;
use pharmacy_shared::validation::FieldErrors;
use pharmacy_shared::{SupportTicket, TicketPriority};

#[component]
pub fn ManagerSupportPage() -> impl IntoView {
    let api = use_api();
    let draft = RwSignal::new(TicketDraft::default());
    let errors = RwSignal::new(FieldErrors::new());
    let sending = RwSignal::new(false);
    let submitted = RwSignal::new(Vec::<SupportTicket>::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = match draft.with_untracked(TicketDraft::validate) {
            Ok(form) => form,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(FieldErrors::new());
        sending.set(true);
        spawn_local(async move {
            if let Some(ticket) = api.send(&CreateTicketRequest(form), "Submitting ticket").await {
                api.toast()
                    .success("Ticket submitted. Our team will get back to you shortly.");
                submitted.update(|list| list.insert(0, ticket));
                draft.set(TicketDraft::default());
            }
            sending.set(false);
        });
    };

    let message_error = field_error(errors, "message");

    view! {
        <AppShell>
            <PageHeader title="Support" subtitle="Contact the platform team about billing or technical issues" />

            <div class="grid gap-6 lg:grid-cols-2">
                <Card title="New ticket">
                    <form on:submit=on_submit class="space-y-2">
                        <TextField
                            label="Subject"
                            value=Signal::derive(move || draft.with(|d| d.subject.clone()))
                            on_input=move |v: String| draft.update(|d| d.subject = v)
                            error=field_error(errors, "subject")
                        />
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Priority"</span></label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    if let Some(p) = TicketPriority::from_str_opt(&event_target_value(&ev)) {
                                        draft.update(|d| d.priority = p);
                                    }
                                }
                            >
                                {TicketPriority::ALL
                                    .into_iter()
                                    .map(|p| view! {
                                        <option value=p.as_str() selected=move || draft.with(|d| d.priority == p)>
                                            {p.label()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Message"</span></label>
                            <textarea
                                class=move || {
                                    if message_error.get().is_some() {
                                        "textarea textarea-bordered textarea-error h-32"
                                    } else {
                                        "textarea textarea-bordered h-32"
                                    }
                                }
                                prop:value=move || draft.with(|d| d.message.clone())
                                on:input=move |ev| draft.update(|d| d.message = event_target_value(&ev))
                            ></textarea>
                            <Show when=move || message_error.get().is_some()>
                                <label class="label">
                                    <span class="label-text-alt text-error">{move || message_error.get().unwrap_or_default()}</span>
                                </label>
                            </Show>
                        </div>
                        <button type="submit" class="btn btn-primary w-full" disabled=move || sending.get()>
                            {move || if sending.get() { "Submitting..." } else { "Submit ticket" }}
                        </button>
                    </form>
                </Card>

                <Card title="Submitted this session">
                    <DataTable
                        headers=&["Subject", "Priority", "Status", "Opened"]
                        loading=Signal::derive(|| false)
                        is_empty=Signal::derive(move || submitted.with(Vec::is_empty))
                        empty_message="No tickets submitted yet."
                    >
                        <For
                            each=move || submitted.get()
                            key=|t| t.id.clone()
                            children=|t| view! {
                                <tr>
                                    <td class="font-semibold">{t.subject}</td>
                                    <td><Badge text=t.priority.label() tone="badge-outline" /></td>
                                    <td><Badge text=t.status.label() tone="badge-info" /></td>
                                    <td>{format_optional_date(t.created_at.as_ref())}</td>
                                </tr>
                            }
                        />
                    </DataTable>
                </Card>
            </div>
        </AppShell>
    }
}
