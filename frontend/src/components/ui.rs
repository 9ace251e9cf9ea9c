//! 通用 UI 组件
//!
//! 所有页面共用的 daisyUI 外壳：卡片、统计卡、表格、模态框、分页条等。

use leptos::prelude::*;
use pharmacy_shared::pagination::{PageItem, Paginator, page_numbers};
use pharmacy_shared::validation::FieldErrors;

// ============================================================================
// 布局
// ============================================================================

#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(into, optional)] subtitle: MaybeProp<String>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="flex flex-wrap items-center justify-between gap-4">
            <div>
                <h1 class="text-2xl font-bold">{title}</h1>
                <p class="text-base-content/70 text-sm">{move || subtitle.get()}</p>
            </div>
            <div class="flex gap-2">{children.map(|c| c())}</div>
        </div>
    }
}

#[component]
pub fn Card(
    #[prop(into, optional)] title: String,
    #[prop(optional)] actions: Option<Children>,
    children: Children,
) -> impl IntoView {
    let has_header = !title.is_empty() || actions.is_some();
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                {has_header.then(|| view! {
                    <div class="flex items-center justify-between">
                        <h3 class="card-title">{title}</h3>
                        <div class="flex gap-2">{actions.map(|a| a())}</div>
                    </div>
                })}
                {children()}
            </div>
        </div>
    }
}

/// 统计卡片
#[component]
pub fn StatCard(
    #[prop(into)] title: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into, optional)] hint: String,
    /// daisyUI 文字色，如 `text-primary`
    #[prop(optional)]
    tone: &'static str,
) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value text-2xl {}", tone)>{move || value.get()}</div>
            <div class="stat-desc">{hint}</div>
        </div>
    }
}

#[component]
pub fn StatGrid(children: Children) -> impl IntoView {
    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            {children()}
        </div>
    }
}

#[component]
pub fn Badge(#[prop(into)] text: String, #[prop(optional)] tone: &'static str) -> impl IntoView {
    view! { <span class=format!("badge {}", tone)>{text}</span> }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-8">
            <span class="loading loading-spinner loading-md text-primary"></span>
        </div>
    }
}

// ============================================================================
// 表格
// ============================================================================

/// 表格外壳：表头 + 加载中/空状态 + 行
#[component]
pub fn DataTable(
    headers: &'static [&'static str],
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] is_empty: Signal<bool>,
    #[prop(into, optional)] empty_message: String,
    children: Children,
) -> impl IntoView {
    let colspan = headers.len().to_string();
    let empty_message = if empty_message.is_empty() {
        "Nothing here yet.".to_string()
    } else {
        empty_message
    };
    let colspan_loading = colspan.clone();

    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        {headers.iter().map(|h| view! { <th>{*h}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || loading.get() && is_empty.get()>
                        <tr>
                            <td colspan=colspan_loading.clone() class="text-center py-8 text-base-content/50">
                                <span class="loading loading-spinner loading-md"></span>
                                " Loading..."
                            </td>
                        </tr>
                    </Show>
                    <Show when=move || !loading.get() && is_empty.get()>
                        <tr>
                            <td colspan=colspan.clone() class="text-center py-8 text-base-content/50">
                                {empty_message.clone()}
                            </td>
                        </tr>
                    </Show>
                    {children()}
                </tbody>
            </table>
        </div>
    }
}

/// 分页条
///
/// 只负责修改 `paginator`，切片由调用方按 [`Paginator::slice`] 完成。
#[component]
pub fn PaginationBar(paginator: RwSignal<Paginator>, #[prop(into)] len: Signal<usize>) -> impl IntoView {
    let total = move || paginator.with(|p| p.total_pages(len.get()));
    let current = move || paginator.with(|p| p.effective_page(len.get()));
    let go = move |page: usize| paginator.update(|p| p.go_to(page, len.get_untracked()));

    view! {
        <div class="flex flex-wrap items-center justify-between gap-2 pt-4">
            <span class="text-sm text-base-content/70">
                {move || paginator.with(|p| p.range_label(len.get()))}
            </span>
            <Show when=move || { total() > 1 }>
                <div class="join">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || !paginator.with(|p| p.has_prev(len.get()))
                        on:click=move |_| go(current() - 1)
                    >
                        "«"
                    </button>
                    {move || {
                        let current = current();
                        page_numbers(current, total())
                            .into_iter()
                            .map(|item| match item {
                                PageItem::Page(n) => {
                                    let class = if n == current {
                                        "join-item btn btn-sm btn-active"
                                    } else {
                                        "join-item btn btn-sm"
                                    };
                                    view! { <button class=class on:click=move |_| go(n)>{n}</button> }
                                        .into_any()
                                }
                                PageItem::Ellipsis => {
                                    view! { <button class="join-item btn btn-sm btn-disabled">"…"</button> }
                                        .into_any()
                                }
                            })
                            .collect_view()
                    }}
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || !paginator.with(|p| p.has_next(len.get()))
                        on:click=move |_| go(current() + 1)
                    >
                        "»"
                    </button>
                </div>
            </Show>
        </div>
    }
}

/// 当前页的数据副本
pub fn current_page<T: Clone>(paginator: &Paginator, items: &[T]) -> Vec<T> {
    paginator.slice(items).to_vec()
}

// ============================================================================
// 表单与对话框
// ============================================================================

/// 从校验结果中取某个字段的错误信息
pub fn field_error(errors: RwSignal<FieldErrors>, field: &'static str) -> Signal<Option<String>> {
    Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
}

#[component]
pub fn TextField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(optional)] error: Option<Signal<Option<String>>>,
    /// 默认 `text`
    #[prop(optional)]
    input_type: &'static str,
    #[prop(into, optional)] placeholder: String,
) -> impl IntoView {
    let input_type = if input_type.is_empty() { "text" } else { input_type };
    let error = move || error.and_then(|e| e.get());

    view! {
        <div class="form-control w-full">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type=input_type
                placeholder=placeholder
                class=move || {
                    if error().is_some() {
                        "input input-bordered input-error w-full"
                    } else {
                        "input input-bordered w-full"
                    }
                }
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
            <Show when=move || error().is_some()>
                <label class="label">
                    <span class="label-text-alt text-error">{move || error().unwrap_or_default()}</span>
                </label>
            </Show>
        </div>
    }
}

/// 模态框
///
/// 由 `open` 信号控制 `<dialog>` 的 `showModal()` / `close()`。
#[component]
pub fn Modal(
    open: RwSignal<bool>,
    #[prop(into)] title: Signal<String>,
    children: Children,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg mb-4">{move || title.get()}</h3>
                {children()}
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

/// 确认对话框，用于删除等不可撤销的操作
#[component]
pub fn ConfirmDialog(
    open: RwSignal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] message: Signal<String>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into, optional)] confirm_label: String,
) -> impl IntoView {
    let confirm_label = if confirm_label.is_empty() {
        "Delete".to_string()
    } else {
        confirm_label
    };

    view! {
        <Modal open=open title=title>
            <p class="py-2">{move || message.get()}</p>
            <div class="modal-action">
                <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>
                    "Cancel"
                </button>
                <button
                    type="button"
                    class="btn btn-error"
                    on:click=move |_| {
                        open.set(false);
                        on_confirm.run(());
                    }
                >
                    {confirm_label}
                </button>
            </div>
        </Modal>
    }
}

/// 表单底部的取消/提交按钮
#[component]
pub fn FormActions(
    open: RwSignal<bool>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] submit_label: Signal<String>,
) -> impl IntoView {
    view! {
        <div class="modal-action">
            <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>
                "Cancel"
            </button>
            <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                {move || if busy.get() {
                    view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                } else {
                    submit_label.get().into_any()
                }}
            </button>
        </div>
    }
}
