//! 库存管理：搜索、增改、Excel 导入导出

use super::stock_badges;
use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::sheet::{ExportButton, ImportButton};
use crate::components::ui::{
    Badge, Card, DataTable, FormActions, Modal, PageHeader, PaginationBar, TextField,
    current_page, field_error,
};
use crate::web::today;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::Product;
use pharmacy_shared::format::format_etb;
use pharmacy_shared::forms::ProductDraft;
use pharmacy_shared::inventory::search;
use pharmacy_shared::pagination::Paginator;
use pharmacy_shared::protocol::{CreateProductRequest, ListProductsRequest, UpdateProductRequest};
use pharmacy_shared::sheet::Record;
use pharmacy_shared::validation::FieldErrors;

#[component]
pub fn InventoryPage() -> impl IntoView {
    let api = use_api();
    let list = ListState::<Product>::new();
    let paginator = RwSignal::new(Paginator::default());
    let query = RwSignal::new(String::new());
    let today = today();

    let editing = RwSignal::new(Option::<String>::None);
    let draft = RwSignal::new(ProductDraft::default());
    let errors = RwSignal::new(FieldErrors::new());
    let form_open = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let importing = RwSignal::new(false);

    let reload = move || list.load(api, ListProductsRequest, "Loading inventory");
    reload();

    let filtered = Signal::derive(move || {
        let q = query.get();
        list.items
            .with(|items| search(items, &q).into_iter().cloned().collect::<Vec<_>>())
    });
    let visible = move || paginator.with(|p| filtered.with(|items| current_page(p, items)));

    let open_form = move |product: Option<Product>| {
        draft.set(product.as_ref().map(ProductDraft::from).unwrap_or_default());
        editing.set(product.map(|p| p.id));
        errors.set(FieldErrors::new());
        form_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = match draft.with_untracked(ProductDraft::validate) {
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
                Some(id) => api.send(&UpdateProductRequest { id, form }, "Updating product").await,
                None => api.send(&CreateProductRequest(form), "Creating product").await,
            };
            if let Some(saved) = saved {
                api.toast().success(format!("{} saved", saved.name));
                form_open.set(false);
                reload();
            }
            saving.set(false);
        });
    };

    // 逐行校验并创建；失败行只计数，不逐条弹窗
    let on_import = move |records: Vec<Record>| {
        importing.set(true);
        spawn_local(async move {
            let client = api.auth().client();
            let mut created = 0usize;
            let mut failed = 0usize;
            for (row, record) in records.iter().enumerate() {
                let form = match ProductDraft::from_record(record).validate() {
                    Ok(form) => form,
                    Err(e) => {
                        log::warn!(
                            "[Import] row {} invalid: {}",
                            row + 2,
                            e.first_message().unwrap_or("invalid value")
                        );
                        failed += 1;
                        continue;
                    }
                };
                match client.send(&CreateProductRequest(form)).await {
                    Ok(_) => created += 1,
                    Err(e) => {
                        log::warn!("[Import] row {} rejected: {}", row + 2, e);
                        api.auth().on_api_error(&e);
                        if e.is_unauthorized() {
                            break;
                        }
                        failed += 1;
                    }
                }
            }
            log::info!("[Import] {} created, {} failed", created, failed);
            if failed == 0 {
                api.toast().success(format!("Imported {} product(s)", created));
            } else {
                api.toast().error(format!(
                    "Imported {} product(s); {} row(s) could not be imported",
                    created, failed
                ));
            }
            importing.set(false);
            reload();
        });
    };

    let text_input = move |label: &'static str, field: &'static str, input_type: &'static str, get: fn(&ProductDraft) -> String, set: fn(&mut ProductDraft, String)| {
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
            <PageHeader
                title="Inventory"
                subtitle=Signal::derive(move || format!("{} product(s)", list.items.with(Vec::len)))
            >
                <Show when=move || importing.get()>
                    <span class="loading loading-spinner loading-sm self-center"></span>
                </Show>
                <ImportButton on_records=on_import />
                <ExportButton items=list.items name="inventory" />
                <button class="btn btn-primary btn-sm" on:click=move |_| open_form(None)>"Add product"</button>
            </PageHeader>

            <Card>
                <input
                    type="search"
                    class="input input-bordered input-sm w-full max-w-sm"
                    placeholder="Search by name, category or barcode"
                    prop:value=move || query.get()
                    on:input=move |ev| {
                        query.set(event_target_value(&ev));
                        paginator.update(|p| p.page = 1);
                    }
                />
                <DataTable
                    headers=&["Product", "Category", "Price", "Stock", "Expiry", "Rx", ""]
                    loading=list.loading
                    is_empty=Signal::derive(move || filtered.with(Vec::is_empty))
                    empty_message="No products match."
                >
                    <For
                        each=visible
                        key=|p| (p.id.clone(), p.name.clone(), p.price, p.stock_quantity, p.expiry_date)
                        children=move |p| {
                            let badges = stock_badges(&p, today);
                            let row = p.clone();
                            view! {
                                <tr>
                                    <td>
                                        <div class="font-semibold">{p.name}</div>
                                        <div class="flex gap-1">
                                            {badges
                                                .into_iter()
                                                .map(|(text, tone)| view! { <Badge text=text tone=tone /> })
                                                .collect_view()}
                                        </div>
                                    </td>
                                    <td>{p.category.unwrap_or_default()}</td>
                                    <td class="font-mono">{format_etb(p.price)}</td>
                                    <td>{p.stock_quantity}</td>
                                    <td>{p.expiry_date.map(|d| d.to_string()).unwrap_or_default()}</td>
                                    <td>
                                        {p.requires_prescription.then(|| view! { <Badge text="Rx" tone="badge-secondary" /> })}
                                    </td>
                                    <td class="text-right">
                                        <button class="btn btn-ghost btn-xs" on:click=move |_| open_form(Some(row.clone()))>
                                            "Edit"
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
                    if editing.get().is_some() { "Edit product".to_string() } else { "Add product".to_string() }
                })
            >
                <form on:submit=on_submit class="space-y-2">
                    {text_input("Name", "name", "text", |d| d.name.clone(), |d, v| d.name = v)}
                    <div class="grid grid-cols-2 gap-4">
                        {text_input("Category", "category", "text", |d| d.category.clone(), |d, v| d.category = v)}
                        {text_input("Barcode", "barcode", "text", |d| d.barcode.clone(), |d, v| d.barcode = v)}
                    </div>
                    <div class="grid grid-cols-3 gap-4">
                        {text_input("Price (ETB)", "price", "text", |d| d.price.clone(), |d, v| d.price = v)}
                        {text_input("Stock", "stock_quantity", "number", |d| d.stock_quantity.clone(), |d, v| d.stock_quantity = v)}
                        {text_input("Reorder level", "reorder_level", "number", |d| d.reorder_level.clone(), |d, v| d.reorder_level = v)}
                    </div>
                    {text_input("Expiry date", "expiry_date", "date", |d| d.expiry_date.clone(), |d, v| d.expiry_date = v)}
                    <label class="label cursor-pointer justify-start gap-2">
                        <input
                            type="checkbox"
                            class="checkbox checkbox-sm"
                            prop:checked=move || draft.with(|d| d.requires_prescription)
                            on:change=move |ev| draft.update(|d| d.requires_prescription = event_target_checked(&ev))
                        />
                        <span class="label-text">"Requires prescription"</span>
                    </label>
                    <FormActions open=form_open busy=saving submit_label="Save" />
                </form>
            </Modal>
        </AppShell>
    }
}

