use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::sheet::ExportButton;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, PaginationBar, current_page};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::format::{format_day, format_etb};
use pharmacy_shared::pagination::Paginator;
use pharmacy_shared::protocol::{ListBillingIssuesRequest, ResolveBillingIssueRequest};
use pharmacy_shared::{BillingIssue, BillingStatus};
use rust_decimal::Decimal;

#[component]
pub fn BillingPage() -> impl IntoView {
    let api = use_api();
    let list = ListState::<BillingIssue>::new();
    let paginator = RwSignal::new(Paginator::default());
    let show_resolved = RwSignal::new(false);

    list.load(api, ListBillingIssuesRequest, "Loading billing issues");

    let filtered = Signal::derive(move || {
        let include_resolved = show_resolved.get();
        list.items.with(|items| {
            items
                .iter()
                .filter(|b| include_resolved || b.status == BillingStatus::Open)
                .cloned()
                .collect::<Vec<_>>()
        })
    });
    let visible = move || paginator.with(|p| filtered.with(|items| current_page(p, items)));

    let outstanding = move || {
        list.items.with(|items| {
            items
                .iter()
                .filter(|b| b.status == BillingStatus::Open)
                .map(|b| b.amount)
                .sum::<Decimal>()
        })
    };

    let resolve = move |id: String| {
        spawn_local(async move {
            let req = ResolveBillingIssueRequest { id };
            if let Some(updated) = api.send(&req, "Resolving billing issue").await {
                api.toast().success("Billing issue resolved");
                list.items.update(|items| {
                    if let Some(slot) = items.iter_mut().find(|b| b.id == updated.id) {
                        *slot = updated;
                    }
                });
            }
        });
    };

    view! {
        <AppShell>
            <PageHeader title="Billing" subtitle=Signal::derive(move || format!("Outstanding: {}", format_etb(outstanding())))>
                <ExportButton items=list.items name="billing" />
            </PageHeader>

            <Card>
                <label class="label cursor-pointer justify-start gap-2 w-fit">
                    <input
                        type="checkbox"
                        class="toggle toggle-sm"
                        prop:checked=show_resolved
                        on:change=move |ev| {
                            show_resolved.set(event_target_checked(&ev));
                            paginator.update(|p| p.page = 1);
                        }
                    />
                    <span class="label-text">"Show resolved"</span>
                </label>
                <DataTable
                    headers=&["Pharmacy", "Description", "Amount", "Due", "Status", ""]
                    loading=list.loading
                    is_empty=Signal::derive(move || filtered.with(Vec::is_empty))
                    empty_message="No billing issues."
                >
                    <For
                        each=visible
                        key=|b| (b.id.clone(), b.status)
                        children=move |b| {
                            let id = b.id.clone();
                            let is_open = b.status == BillingStatus::Open;
                            view! {
                                <tr>
                                    <td class="font-semibold">
                                        {b.pharmacy_name.clone().unwrap_or(b.pharmacy_id)}
                                    </td>
                                    <td>{b.description}</td>
                                    <td class="font-mono">{format_etb(b.amount)}</td>
                                    <td>{b.due_date.as_ref().map(format_day).unwrap_or_default()}</td>
                                    <td>
                                        <Badge
                                            text={if is_open { "Open" } else { "Resolved" }}
                                            tone={if is_open { "badge-error" } else { "badge-success" }}
                                        />
                                    </td>
                                    <td class="text-right">
                                        <Show when=move || is_open>
                                            {
                                                let id = id.clone();
                                                view! {
                                                    <button class="btn btn-success btn-xs" on:click=move |_| resolve(id.clone())>
                                                        "Resolve"
                                                    </button>
                                                }
                                            }
                                        </Show>
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
