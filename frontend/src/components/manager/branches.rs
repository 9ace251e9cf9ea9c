//! 分店管理：列表与增删改

use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::sheet::ExportButton;
use crate::components::ui::{
    Badge, Card, ConfirmDialog, DataTable, FormActions, Modal, PageHeader, PaginationBar,
    TextField, current_page, field_error,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::forms::BranchDraft;
use pharmacy_shared::pagination::Paginator;
use pharmacy_shared::protocol::{
    CreateBranchRequest, DeleteBranchRequest, ListBranchesRequest, UpdateBranchRequest,
};
use pharmacy_shared::validation::FieldErrors;
use pharmacy_shared::Branch;

#[component]
pub fn BranchesPage() -> impl IntoView {
    let api = use_api();
    let list = ListState::<Branch>::new();
    let paginator = RwSignal::new(Paginator::default());

    let editing = RwSignal::new(Option::<String>::None);
    let draft = RwSignal::new(BranchDraft::default());
    let errors = RwSignal::new(FieldErrors::new());
    let form_open = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let pending_delete = RwSignal::new(Option::<Branch>::None);
    let confirm_open = RwSignal::new(false);

    let reload = move || list.load(api, ListBranchesRequest, "Loading branches");
    reload();

    let len = Signal::derive(move || list.items.with(Vec::len));
    let visible = move || paginator.with(|p| list.items.with(|items| current_page(p, items)));

    let open_form = move |branch: Option<Branch>| {
        draft.set(branch.as_ref().map(BranchDraft::from).unwrap_or_default());
        editing.set(branch.map(|b| b.id));
        errors.set(FieldErrors::new());
        form_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = match draft.with_untracked(BranchDraft::validate) {
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
                Some(id) => api.send(&UpdateBranchRequest { id, form }, "Updating branch").await,
                None => api.send(&CreateBranchRequest(form), "Creating branch").await,
            };
            if let Some(saved) = saved {
                api.toast().success(format!("Branch {} saved", saved.name));
                form_open.set(false);
                reload();
            }
            saving.set(false);
        });
    };

    let on_confirm_delete = move |_: ()| {
        let Some(target) = pending_delete.get_untracked() else {
            return;
        };
        spawn_local(async move {
            let req = DeleteBranchRequest {
                id: target.id.clone(),
            };
            if api.send(&req, "Deleting branch").await.is_some() {
                api.toast().success(format!("Branch {} deleted", target.name));
                list.items.update(|items| items.retain(|b| b.id != target.id));
            }
        });
    };

    let text_input = move |label: &'static str, field: &'static str, get: fn(&BranchDraft) -> String, set: fn(&mut BranchDraft, String)| {
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
            <PageHeader title="Branches" subtitle="Locations operated by your pharmacy">
                <ExportButton items=list.items name="branches" />
                <button class="btn btn-primary btn-sm" on:click=move |_| open_form(None)>"Add branch"</button>
            </PageHeader>

            <Card>
                <DataTable
                    headers=&["Branch", "Location", "Phone", "Manager", "Status", ""]
                    loading=list.loading
                    is_empty=Signal::derive(move || len.get() == 0)
                    empty_message="No branches yet. Add your first branch."
                >
                    <For
                        each=visible
                        key=|b| (b.id.clone(), b.name.clone(), b.location.clone())
                        children=move |b| {
                            let row = b.clone();
                            let to_delete = b.clone();
                            view! {
                                <tr>
                                    <td class="font-semibold">{b.name}</td>
                                    <td>{b.location}</td>
                                    <td>{b.phone.unwrap_or_default()}</td>
                                    <td>{b.manager_name.unwrap_or_default()}</td>
                                    <td>
                                        <Badge
                                            text={if b.is_active { "Active" } else { "Inactive" }}
                                            tone={if b.is_active { "badge-success" } else { "badge-ghost" }}
                                        />
                                    </td>
                                    <td class="flex gap-1 justify-end">
                                        <button class="btn btn-ghost btn-xs" on:click=move |_| open_form(Some(row.clone()))>
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
                <PaginationBar paginator=paginator len=len />
            </Card>

            <Modal
                open=form_open
                title=Signal::derive(move || {
                    if editing.get().is_some() { "Edit branch".to_string() } else { "Add branch".to_string() }
                })
            >
                <form on:submit=on_submit class="space-y-2">
                    {text_input("Branch name", "name", |d| d.name.clone(), |d, v| d.name = v)}
                    {text_input("Location", "location", |d| d.location.clone(), |d, v| d.location = v)}
                    <div class="grid grid-cols-2 gap-4">
                        {text_input("Phone", "phone", |d| d.phone.clone(), |d, v| d.phone = v)}
                        {text_input("Branch manager", "manager_name", |d| d.manager_name.clone(), |d, v| d.manager_name = v)}
                    </div>
                    <FormActions open=form_open busy=saving submit_label="Save" />
                </form>
            </Modal>

            <ConfirmDialog
                open=confirm_open
                title="Delete branch"
                message=Signal::derive(move || {
                    pending_delete.with(|b| {
                        b.as_ref()
                            .map(|b| format!("Delete branch {}? Staff assigned to it must be moved first.", b.name))
                            .unwrap_or_default()
                    })
                })
                on_confirm=on_confirm_delete
            />
        </AppShell>
    }
}
