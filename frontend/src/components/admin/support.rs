use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, PaginationBar, current_page};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::format::format_optional_date;
use pharmacy_shared::pagination::Paginator;
use pharmacy_shared::protocol::{ListSupportTicketsRequest, UpdateTicketStatusRequest};
use pharmacy_shared::{SupportTicket, TicketPriority, TicketStatus};

fn priority_tone(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::Low => "badge-ghost",
        TicketPriority::Medium => "badge-info",
        TicketPriority::High => "badge-error",
    }
}

#[component]
pub fn SupportTicketsPage() -> impl IntoView {
    let api = use_api();
    let list = ListState::<SupportTicket>::new();
    let paginator = RwSignal::new(Paginator::default());
    // 空串表示全部状态
    let status_filter = RwSignal::new(String::new());

    list.load(api, ListSupportTicketsRequest, "Loading tickets");

    let filtered = Signal::derive(move || {
        let wanted = TicketStatus::from_str_opt(&status_filter.get());
        list.items.with(|items| {
            items
                .iter()
                .filter(|t| wanted.is_none_or(|s| t.status == s))
                .cloned()
                .collect::<Vec<_>>()
        })
    });
    let visible = move || paginator.with(|p| filtered.with(|items| current_page(p, items)));

    let update_status = move |id: String, status: TicketStatus| {
        spawn_local(async move {
            let req = UpdateTicketStatusRequest { id, status };
            if let Some(updated) = api.send(&req, "Updating ticket").await {
                api.toast()
                    .success(format!("Ticket marked {}", updated.status.label()));
                list.items.update(|items| {
                    if let Some(slot) = items.iter_mut().find(|t| t.id == updated.id) {
                        *slot = updated;
                    }
                });
            }
        });
    };

    view! {
        <AppShell>
            <PageHeader title="Support" subtitle="Tickets raised by pharmacy managers" />

            <Card>
                <select
                    class="select select-bordered select-sm w-48"
                    on:change=move |ev| {
                        status_filter.set(event_target_value(&ev));
                        paginator.update(|p| p.page = 1);
                    }
                >
                    <option value="">"All statuses"</option>
                    {TicketStatus::ALL
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                        .collect_view()}
                </select>
                <DataTable
                    headers=&["Subject", "Pharmacy", "Priority", "Opened", "Status"]
                    loading=list.loading
                    is_empty=Signal::derive(move || filtered.with(Vec::is_empty))
                    empty_message="No tickets."
                >
                    <For
                        each=visible
                        key=|t| (t.id.clone(), t.status)
                        children=move |t| {
                            let id = t.id.clone();
                            let current = t.status;
                            view! {
                                <tr>
                                    <td>
                                        <div class="font-semibold">{t.subject}</div>
                                        <div class="text-xs opacity-70 max-w-md truncate">{t.message}</div>
                                    </td>
                                    <td>{t.pharmacy_name.unwrap_or_default()}</td>
                                    <td><Badge text=t.priority.label() tone=priority_tone(t.priority) /></td>
                                    <td>{format_optional_date(t.created_at.as_ref())}</td>
                                    <td>
                                        <select
                                            class="select select-bordered select-xs"
                                            on:change=move |ev| {
                                                if let Some(status) = TicketStatus::from_str_opt(&event_target_value(&ev)) {
                                                    update_status(id.clone(), status);
                                                }
                                            }
                                        >
                                            {TicketStatus::ALL
                                                .into_iter()
                                                .map(|s| view! {
                                                    <option value=s.as_str() selected={s == current}>{s.label()}</option>
                                                })
                                                .collect_view()}
                                        </select>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </DataTable>
                <PaginationBar paginator=paginator len=Signal::derive(move || filtered.with(Vec::len)) />
            </Card>
        </AppShell>
    }
}
