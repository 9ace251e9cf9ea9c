//! 药房（租户）管理：列表、搜索、增删改与状态审批

use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::sheet::ExportButton;
use crate::components::ui::{
    Badge, Card, ConfirmDialog, DataTable, FormActions, Modal, PageHeader, PaginationBar,
    TextField, current_page, field_error,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::forms::PharmacyDraft;
use pharmacy_shared::pagination::Paginator;
use pharmacy_shared::protocol::{
    CreatePharmacyRequest, DeletePharmacyRequest, ListPharmaciesRequest, SetPharmacyStatusRequest,
    UpdatePharmacyRequest,
};
use pharmacy_shared::validation::FieldErrors;
use pharmacy_shared::{Pharmacy, PharmacyStatus};

fn status_tone(status: PharmacyStatus) -> &'static str {
    match status {
        PharmacyStatus::Active => "badge-success",
        PharmacyStatus::Pending => "badge-warning",
        PharmacyStatus::Suspended => "badge-error",
    }
}

fn matches_query(p: &Pharmacy, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    q.is_empty()
        || p.name.to_lowercase().contains(&q)
        || p.email.to_lowercase().contains(&q)
        || p.owner_name
            .as_deref()
            .is_some_and(|o| o.to_lowercase().contains(&q))
}

#[component]
pub fn PharmaciesPage() -> impl IntoView {
    let api = use_api();
    let list = ListState::<Pharmacy>::new();
    let paginator = RwSignal::new(Paginator::default());
    let query = RwSignal::new(String::new());

    // 编辑中的药房 id；None 表示新建
    let editing = RwSignal::new(Option::<String>::None);
    let draft = RwSignal::new(PharmacyDraft::default());
    let errors = RwSignal::new(FieldErrors::new());
    let form_open = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let pending_delete = RwSignal::new(Option::<Pharmacy>::None);
    let confirm_open = RwSignal::new(false);

    let reload = move || list.load(api, ListPharmaciesRequest, "Loading pharmacies");
    reload();

    let filtered = Signal::derive(move || {
        let q = query.get();
        list.items.with(|items| {
            items
                .iter()
                .filter(|p| matches_query(p, &q))
                .cloned()
                .collect::<Vec<_>>()
        })
    });
    let visible = move || paginator.with(|p| filtered.with(|items| current_page(p, items)));

    let open_create = move |_| {
        editing.set(None);
        draft.set(PharmacyDraft::default());
        errors.set(FieldErrors::new());
        form_open.set(true);
    };

    let open_edit = move |p: Pharmacy| {
        draft.set(PharmacyDraft::from(&p));
        editing.set(Some(p.id));
        errors.set(FieldErrors::new());
        form_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = match draft.with_untracked(PharmacyDraft::validate) {
            Ok(form) => form,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        saving.set(true);
        let id = editing.get_untracked();
        spawn_local(async move {
            let saved = match id {
                Some(id) => api.send(&UpdatePharmacyRequest { id, form }, "Updating pharmacy").await,
                None => api.send(&CreatePharmacyRequest(form), "Creating pharmacy").await,
            };
            if let Some(saved) = saved {
                api.toast().success(format!("{} saved", saved.name));
                form_open.set(false);
                reload();
            }
            saving.set(false);
        });
    };

    let set_status = move |id: String, status: PharmacyStatus| {
        spawn_local(async move {
            let req = SetPharmacyStatusRequest { id, status };
            if let Some(updated) = api.send(&req, "Changing status").await {
                api.toast()
                    .success(format!("{} is now {}", updated.name, updated.status.label()));
                list.items.update(|items| {
                    if let Some(slot) = items.iter_mut().find(|p| p.id == updated.id) {
                        *slot = updated;
                    }
                });
            }
        });
    };

    let on_confirm_delete = move |_: ()| {
        let Some(target) = pending_delete.get_untracked() else {
            return;
        };
        spawn_local(async move {
            let req = DeletePharmacyRequest {
                id: target.id.clone(),
            };
            if api.send(&req, "Deleting pharmacy").await.is_some() {
                api.toast().success(format!("{} deleted", target.name));
                list.items.update(|items| items.retain(|p| p.id != target.id));
            }
        });
    };

    let text_input = move |label: &'static str, field: &'static str, get: fn(&PharmacyDraft) -> String, set: fn(&mut PharmacyDraft, String)| {
        view! {
            <TextField
                label=label
                value=Signal::derive(move || draft.with(get))
                on_input=move |v: String| draft.update(|d| set(d, v))
                error=field_error(errors, field)
            />
        }
    };

    view! {
        <AppShell>
            <PageHeader title="Pharmacies" subtitle="Approve, suspend and edit tenants">
                <ExportButton items=list.items name="pharmacies" />
                <button class="btn btn-primary btn-sm" on:click=open_create>"Add pharmacy"</button>
            </PageHeader>

            <Card>
                <input
                    type="search"
                    class="input input-bordered w-full md:w-80"
                    placeholder="Search by name, owner or email"
                    prop:value=query
                    on:input=move |ev| {
                        query.set(event_target_value(&ev));
                        paginator.update(|p| p.page = 1);
                    }
                />
                <DataTable
                    headers=&["Name", "Owner", "Contact", "Branches", "Status", ""]
                    loading=list.loading
                    is_empty=Signal::derive(move || filtered.with(Vec::is_empty))
                    empty_message="No pharmacies match."
                >
                    <For
                        each=visible
                        key=|p| (p.id.clone(), p.status, p.name.clone())
                        children=move |p| {
                            let id = p.id.clone();
                            let status = p.status;
                            let row = p.clone();
                            let to_delete = p.clone();
                            view! {
                                <tr>
                                    <td class="font-semibold">{p.name}</td>
                                    <td>{p.owner_name.unwrap_or_default()}</td>
                                    <td>
                                        <div>{p.email}</div>
                                        <div class="text-xs opacity-60">{p.phone}</div>
                                    </td>
                                    <td>{p.branch_count}</td>
                                    <td><Badge text=status.label() tone=status_tone(status) /></td>
                                    <td class="flex gap-1 justify-end">
                                        <select
                                            class="select select-bordered select-xs"
                                            on:change=move |ev| {
                                                if let Some(status) = PharmacyStatus::from_str_opt(&event_target_value(&ev)) {
                                                    set_status(id.clone(), status);
                                                }
                                            }
                                        >
                                            {PharmacyStatus::ALL
                                                .into_iter()
                                                .map(|s| view! {
                                                    <option value=s.as_str() selected={s == status}>{s.label()}</option>
                                                })
                                                .collect_view()}
                                        </select>
                                        <button class="btn btn-ghost btn-xs" on:click=move |_| open_edit(row.clone())>
                                            "Edit"
                                        </button>
                                        <button
                                            class="btn btn-ghost btn-xs text-error"
                                            on:click=move |_| {
                                                pending_delete.set(Some(to_delete.clone()));
                                                confirm_open.set(true);
                                            }
                                        >
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </DataTable>
                <PaginationBar paginator=paginator len=Signal::derive(move || filtered.with(Vec::len)) />
            </Card>

            <Modal
                open=form_open
                title=Signal::derive(move || {
                    if editing.get().is_some() { "Edit pharmacy".to_string() } else { "Add pharmacy".to_string() }
                })
            >
                <form on:submit=on_submit class="space-y-2">
                    {text_input("Pharmacy name", "name", |d| d.name.clone(), |d, v| d.name = v)}
                    {text_input("Owner name", "owner_name", |d| d.owner_name.clone(), |d, v| d.owner_name = v)}
                    <div class="grid grid-cols-2 gap-4">
                        {text_input("Email", "email", |d| d.email.clone(), |d, v| d.email = v)}
                        {text_input("Phone", "phone", |d| d.phone.clone(), |d, v| d.phone = v)}
                    </div>
                    {text_input("Address", "address", |d| d.address.clone(), |d, v| d.address = v)}
                    {text_input("Subscription plan", "subscription_plan", |d| d.subscription_plan.clone(), |d, v| d.subscription_plan = v)}
                    <FormActions open=form_open busy=saving submit_label="Save" />
                </form>
            </Modal>

            <ConfirmDialog
                open=confirm_open
                title="Delete pharmacy"
                message=Signal::derive(move || {
                    pending_delete.with(|p| {
                        p.as_ref()
                            .map(|p| format!("Delete {} and all of its branches? This cannot be undone.", p.name))
                            .unwrap_or_default()
                    })
                })
                on_confirm=on_confirm_delete
            />
        </AppShell>
    }
}
