//! 员工管理：药剂师与收银员的创建和删除

use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::ui::{
    Badge, Card, ConfirmDialog, DataTable, FormActions, Modal, PageHeader, PaginationBar,
    TextField, current_page, field_error,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::forms::StaffDraft;
use pharmacy_shared::pagination::Paginator;
use pharmacy_shared::protocol::{
    CreateStaffRequest, DeleteStaffRequest, ListBranchesRequest, ListStaffRequest,
};
use pharmacy_shared::validation::FieldErrors;
use pharmacy_shared::{Branch, Role, User};

#[component]
pub fn StaffPage() -> impl IntoView {
    let api = use_api();
    let list = ListState::<User>::new();
    let branches = ListState::<Branch>::new();
    let paginator = RwSignal::new(Paginator::default());

    let draft = RwSignal::new(StaffDraft::default());
    let errors = RwSignal::new(FieldErrors::new());
    let form_open = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let pending_delete = RwSignal::new(Option::<User>::None);
    let confirm_open = RwSignal::new(false);

    list.load(api, ListStaffRequest, "Loading staff");
    branches.load(api, ListBranchesRequest, "Loading branches");

    let len = Signal::derive(move || list.items.with(Vec::len));
    let visible = move || paginator.with(|p| list.items.with(|items| current_page(p, items)));

    let branch_name = move |id: Option<&str>| -> String {
        id.and_then(|id| {
            branches
                .items
                .with(|bs| bs.iter().find(|b| b.id == id).map(|b| b.name.clone()))
        })
        .unwrap_or_else(|| "Unassigned".to_string())
    };

    let open_create = move |_| {
        draft.set(StaffDraft::default());
        errors.set(FieldErrors::new());
        form_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = match draft.with_untracked(StaffDraft::validate) {
            Ok(form) => form,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        saving.set(true);
        spawn_local(async move {
            if let Some(user) = api.send(&CreateStaffRequest(form), "Adding staff").await {
                api.toast()
                    .success(format!("{} added as {}", user.name, user.role.label()));
                list.items.update(|items| items.push(user));
                form_open.set(false);
            }
            saving.set(false);
        });
    };

    let on_confirm_delete = move |_: ()| {
        let Some(target) = pending_delete.get_untracked() else {
            return;
        };
        spawn_local(async move {
            let req = DeleteStaffRequest {
                id: target.id.clone(),
            };
            if api.send(&req, "Removing staff").await.is_some() {
                api.toast().success(format!("{} removed", target.name));
                list.items.update(|items| items.retain(|u| u.id != target.id));
            }
        });
    };

    let text_input = move |label: &'static str, field: &'static str, input_type: &'static str, get: fn(&StaffDraft) -> String, set: fn(&mut StaffDraft, String)| {
        view! {
            <TextField
                label=label
                input_type=input_type
                value=Signal::derive(move || draft.with(get))
                on_input=move |v: String| draft.update(|d| set(d, v))
                error=field_error(errors, field)
            />
        }
    };

    view! {
        <AppShell>
            <PageHeader title="Staff" subtitle="Pharmacists and cashiers in your pharmacy">
                <button class="btn btn-primary btn-sm" on:click=open_create>"Add staff"</button>
            </PageHeader>

            <Card>
                <DataTable
                    headers=&["Name", "Email", "Phone", "Role", "Branch", ""]
                    loading=list.loading
                    is_empty=Signal::derive(move || len.get() == 0)
                    empty_message="No staff members yet."
                >
                    <For
                        each=visible
                        key=|u| u.id.clone()
                        children=move |u| {
                            let to_delete = u.clone();
                            let branch = branch_name(u.branch_id.as_deref());
                            view! {
                                <tr>
                                    <td class="font-semibold">{u.name}</td>
                                    <td>{u.email}</td>
                                    <td>{u.phone.unwrap_or_default()}</td>
                                    <td><Badge text=u.role.label() tone="badge-outline" /></td>
                                    <td>{branch}</td>
                                    <td class="text-right">
                                        <button
                                            class="btn btn-ghost btn-xs text-error"
                                            on:click=move |_| {
                                                pending_delete.set(Some(to_delete.clone()));
                                                confirm_open.set(true);
                                            }
                                        >
                                            "Remove"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </DataTable>
                <PaginationBar paginator=paginator len=len />
            </Card>

            <Modal open=form_open title="Add staff member">
                <form on:submit=on_submit class="space-y-2">
                    {text_input("Full name", "name", "text", |d| d.name.clone(), |d, v| d.name = v)}
                    <div class="grid grid-cols-2 gap-4">
                        {text_input("Email", "email", "email", |d| d.email.clone(), |d, v| d.email = v)}
                        {text_input("Phone", "phone", "tel", |d| d.phone.clone(), |d, v| d.phone = v)}
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Role"</span></label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    if let Some(role) = StaffDraft::ASSIGNABLE_ROLES.into_iter().find(|r| r.as_str() == value) {
                                        draft.update(|d| d.role = role);
                                    }
                                }
                            >
                                {StaffDraft::ASSIGNABLE_ROLES
                                    .into_iter()
                                    .map(|r: Role| view! {
                                        <option value=r.as_str() selected=move || draft.with(|d| d.role == r)>{r.label()}</option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Branch"</span></label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| draft.update(|d| d.branch_id = event_target_value(&ev))
                            >
                                <option value="">"Unassigned"</option>
                                <For
                                    each=move || branches.items.get()
                                    key=|b| b.id.clone()
                                    children=move |b| {
                                        let id = b.id.clone();
                                        view! {
                                            <option value=b.id selected=move || draft.with(|d| d.branch_id == id)>{b.name}</option>
                                        }
                                    }
                                />
                            </select>
                        </div>
                    </div>
                    {text_input("Temporary password", "password", "password", |d| d.password.clone(), |d, v| d.password = v)}
                    <FormActions open=form_open busy=saving submit_label="Add" />
                </form>
            </Modal>

            <ConfirmDialog
                open=confirm_open
                title="Remove staff member"
                confirm_label="Remove"
                message=Signal::derive(move || {
                    pending_delete.with(|u| {
                        u.as_ref()
                            .map(|u| format!("Remove {} from your pharmacy? They will no longer be able to sign in.", u.name))
                            .unwrap_or_default()
                    })
                })
                on_confirm=on_confirm_delete
            />
        </AppShell>
    }
}
