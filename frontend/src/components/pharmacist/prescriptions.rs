use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, PaginationBar, current_page};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::format::format_optional_date;
use pharmacy_shared::pagination::Paginator;
use pharmacy_shared::protocol::{ListPrescriptionsRequest, UpdatePrescriptionStatusRequest};
use pharmacy_shared::{Prescription, PrescriptionStatus};

fn status_tone(status: PrescriptionStatus) -> &'static str {
    match status {
        PrescriptionStatus::Pending => "badge-warning",
        PrescriptionStatus::Dispensed => "badge-success",
        PrescriptionStatus::Rejected => "badge-error",
    }
}

#[component]
pub fn PrescriptionsPage() -> impl IntoView {
    let api = use_api();
    let list = ListState::<Prescription>::new();
    let paginator = RwSignal::new(Paginator::default());
    let pending_only = RwSignal::new(true);

    list.load(api, ListPrescriptionsRequest, "Loading prescriptions");

    let filtered = Signal::derive(move || {
        let only_pending = pending_only.get();
        list.items.with(|items| {
            items
                .iter()
                .filter(|p| !only_pending || p.status == PrescriptionStatus::Pending)
                .cloned()
                .collect::<Vec<_>>()
        })
    });
    let visible = move || paginator.with(|p| filtered.with(|items| current_page(p, items)));

    let set_status = move |id: String, status: PrescriptionStatus| {
        spawn_local(async move {
            let req = UpdatePrescriptionStatusRequest { id, status };
            if let Some(updated) = api.send(&req, "Updating prescription").await {
                api.toast().success(format!(
                    "Prescription for {} marked {}",
                    updated.patient_name,
                    updated.status.label()
                ));
                list.items.update(|items| {
                    if let Some(slot) = items.iter_mut().find(|p| p.id == updated.id) {
                        *slot = updated;
                    }
                });
            }
        });
    };

    view! {
        <AppShell>
            <PageHeader title="Prescriptions" subtitle="Review and dispense incoming prescriptions" />

            <Card>
                <div role="tablist" class="tabs tabs-boxed w-fit">
                    <a
                        role="tab"
                        class=move || { if pending_only.get() { "tab tab-active" } else { "tab" } }
                        on:click=move |_| {
                            pending_only.set(true);
                            paginator.update(|p| p.page = 1);
                        }
                    >
                        "Pending"
                    </a>
                    <a
                        role="tab"
                        class=move || { if pending_only.get() { "tab" } else { "tab tab-active" } }
                        on:click=move |_| {
                            pending_only.set(false);
                            paginator.update(|p| p.page = 1);
                        }
                    >
                        "All"
                    </a>
                </div>
                <DataTable
                    headers=&["Patient", "Doctor", "Medications", "Received", "Status", ""]
                    loading=list.loading
                    is_empty=Signal::derive(move || filtered.with(Vec::is_empty))
                    empty_message="No prescriptions to review."
                >
                    <For
                        each=visible
                        key=|p| (p.id.clone(), p.status)
                        children=move |p| {
                            let is_pending = p.status == PrescriptionStatus::Pending;
                            let dispense_id = p.id.clone();
                            let reject_id = p.id.clone();
                            view! {
                                <tr>
                                    <td>
                                        <div class="font-semibold">{p.patient_name}</div>
                                        <div class="text-xs opacity-70">{p.notes.unwrap_or_default()}</div>
                                    </td>
                                    <td>{p.doctor_name.unwrap_or_default()}</td>
                                    <td>{p.medications.join(", ")}</td>
                                    <td>{format_optional_date(p.created_at.as_ref())}</td>
                                    <td><Badge text=p.status.label() tone=status_tone(p.status) /></td>
                                    <td class="flex gap-1 justify-end">
                                        {is_pending.then(|| view! {
                                            <button
                                                class="btn btn-success btn-xs"
                                                on:click=move |_| set_status(dispense_id.clone(), PrescriptionStatus::Dispensed)
                                            >
                                                "Dispense"
                                            </button>
                                            <button
                                                class="btn btn-ghost btn-xs text-error"
                                                on:click=move |_| set_status(reject_id.clone(), PrescriptionStatus::Rejected)
                                            >
                                                "Reject"
                                            </button>
                                        })}
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
