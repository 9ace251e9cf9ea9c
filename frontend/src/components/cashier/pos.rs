//! 收银台 (POS)
//!
//! 左侧商品检索，右侧购物车与结算；底部为最近交易，按固定间隔轮询刷新。

use super::load_session;
use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, StatCard, StatGrid};
use crate::config::POLL_INTERVAL_MS;
use crate::web::Interval;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::cart::{Cart, Discount};
use pharmacy_shared::format::{format_datetime, format_etb};
use pharmacy_shared::inventory::search;
use pharmacy_shared::protocol::{
    CashierDashboardRequest, CreateSaleRequest, ListSalesRequest, PosProductsRequest,
};
use pharmacy_shared::session::CashSessionState;
use pharmacy_shared::{CashierStats, PaymentMethod, Product, Sale};

/// 商品检索结果最多显示条数
const SEARCH_LIMIT: usize = 12;
/// 最近交易显示条数
const RECENT_SALES: usize = 10;

#[component]
pub fn PosPage() -> impl IntoView {
    let api = use_api();
    let toast = api.toast();

    let products = ListState::<Product>::new();
    let sales = ListState::<Sale>::new();
    let stats = RwSignal::new(CashierStats::default());
    let session = RwSignal::new(CashSessionState::default());
    let session_loading = RwSignal::new(true);

    let query = RwSignal::new(String::new());
    let cart = RwSignal::new(Cart::new());
    let discount_raw = RwSignal::new(String::new());
    let payment = RwSignal::new(PaymentMethod::default());
    let processing = RwSignal::new(false);

    let reload_products = move || products.load(api, PosProductsRequest, "Loading products");
    reload_products();
    sales.load(api, ListSalesRequest, "Loading sales");
    load_session(api, session, session_loading);

    // 轮询：静默刷新交易与汇总，失败只记日志
    let poll = move || {
        spawn_local(async move {
            let client = api.auth().client();
            match client.send(&ListSalesRequest).await {
                Ok(list) => sales.items.set(list),
                Err(e) => {
                    log::warn!("[Pos] refreshing sales failed: {}", e);
                    api.auth().on_api_error(&e);
                }
            }
            match client.send(&CashierDashboardRequest).await {
                Ok(s) => stats.set(s),
                Err(e) => log::warn!("[Pos] refreshing stats failed: {}", e),
            }
        });
    };
    poll();
    let _poller = StoredValue::new_local(Interval::new(POLL_INTERVAL_MS, poll));

    let discount = Memo::new(move |_| discount_raw.with(|raw| Discount::parse(raw)));
    let effective_discount = move || discount.get().unwrap_or(Discount::NONE);

    let results = move || {
        let q = query.get();
        products.items.with(|items| {
            search(items, &q)
                .into_iter()
                .take(SEARCH_LIMIT)
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let add = move |product: Product| {
        if let Some(Err(e)) = cart.try_update(|c| c.add_to_cart(&product)) {
            toast.error(e.to_string());
        }
    };

    // 无效或超出库存的数量被拒绝时，输入框恢复为购物车中的数量
    let set_quantity = move |product_id: String, input: web_sys::HtmlInputElement| {
        let outcome = input
            .value()
            .trim()
            .parse::<i64>()
            .map_err(|_| "Quantity must be a whole number".to_string())
            .and_then(|quantity| {
                match cart.try_update(|c| c.update_quantity(&product_id, quantity)) {
                    Some(Err(e)) => Err(e.to_string()),
                    _ => Ok(()),
                }
            });
        if let Err(message) = outcome {
            toast.error(message);
            let current = cart.with_untracked(|c| c.quantity_of(&product_id));
            input.set_value(&current.to_string());
        }
    };

    let process_sale = move |_| {
        if !session.with_untracked(CashSessionState::is_open) {
            toast.error("Open a cash session before processing sales");
            return;
        }
        let discount = match discount.get_untracked() {
            Ok(d) => d,
            Err(e) => {
                toast.error(e.to_string());
                return;
            }
        };
        let req: CreateSaleRequest =
            match cart.with_untracked(|c| c.to_sale_request(discount, payment.get_untracked())) {
                Ok(req) => req,
                Err(e) => {
                    toast.error(e.to_string());
                    return;
                }
            };

        processing.set(true);
        spawn_local(async move {
            if let Some(sale) = api.send(&req, "Processing sale").await {
                log::info!("[Pos] sale {} completed: {}", sale.id, sale.total);
                toast.success(format!("Sale completed: {}", format_etb(sale.total)));
                cart.update(Cart::clear);
                discount_raw.set(String::new());
                sales.items.update(|list| list.insert(0, sale));
                reload_products();
                poll();
            }
            processing.set(false);
        });
    };

    let recent = move || {
        sales
            .items
            .with(|list| list.iter().take(RECENT_SALES).cloned().collect::<Vec<_>>())
    };

    view! {
        <AppShell>
            <PageHeader title="Point of sale" subtitle="Search products, build the cart and take payment">
                <Show when=move || !session_loading.get()>
                    {move || if session.with(CashSessionState::is_open) {
                        view! { <Badge text="Session open" tone="badge-success badge-lg" /> }.into_any()
                    } else {
                        view! {
                            <Link to=AppRoute::CashierSession class="btn btn-warning btn-sm">
                                "Open cash session"
                            </Link>
                        }
                        .into_any()
                    }}
                </Show>
            </PageHeader>

            <StatGrid>
                <StatCard
                    title="Today's sales"
                    value=Signal::derive(move || stats.with(|s| format_etb(s.today_sales)))
                    tone="text-primary"
                />
                <StatCard
                    title="Transactions"
                    value=Signal::derive(move || stats.with(|s| s.today_transactions.to_string()))
                />
                <StatCard
                    title="Average ticket"
                    value=Signal::derive(move || stats.with(|s| format_etb(s.average_ticket)))
                />
            </StatGrid>

            <div class="grid gap-6 lg:grid-cols-5">
                <div class="lg:col-span-3">
                    <Card title="Products">
                        <input
                            type="search"
                            class="input input-bordered w-full"
                            placeholder="Search by name, category or scan a barcode"
                            prop:value=move || query.get()
                            on:input=move |ev| query.set(event_target_value(&ev))
                        />
                        <Show
                            when=move || !products.loading.get()
                            fallback=|| view! { <span class="loading loading-spinner loading-md text-primary mx-auto my-6"></span> }
                        >
                            <div class="grid grid-cols-2 md:grid-cols-3 gap-3">
                                <For
                                    each=results
                                    key=|p| (p.id.clone(), p.stock_quantity)
                                    children=move |p| {
                                        let in_stock = p.stock_quantity > 0;
                                        let product = p.clone();
                                        view! {
                                            <button
                                                class="btn btn-outline h-auto py-3 flex-col items-start text-left normal-case"
                                                disabled=!in_stock
                                                on:click=move |_| add(product.clone())
                                            >
                                                <span class="font-semibold">{p.name}</span>
                                                <span class="font-mono text-sm">{format_etb(p.price)}</span>
                                                <span class="text-xs opacity-70">
                                                    {if in_stock { format!("{} in stock", p.stock_quantity) } else { "Out of stock".to_string() }}
                                                </span>
                                                {p.requires_prescription.then(|| view! { <Badge text="Rx" tone="badge-secondary badge-sm" /> })}
                                            </button>
                                        }
                                    }
                                />
                            </div>
                        </Show>
                    </Card>
                </div>

                <div class="lg:col-span-2">
                    <Card title="Cart">
                        <Show
                            when=move || !cart.with(Cart::is_empty)
                            fallback=|| view! { <p class="text-center opacity-60 py-6">"Cart is empty"</p> }
                        >
                            <ul class="divide-y divide-base-200">
                                <For
                                    each=move || cart.with(|c| c.lines().to_vec())
                                    key=|line| (line.product.id.clone(), line.quantity)
                                    children=move |line| {
                                        let id = line.product.id.clone();
                                        let remove_id = line.product.id.clone();
                                        view! {
                                            <li class="flex items-center gap-2 py-2">
                                                <div class="flex-1">
                                                    <div class="font-semibold">{line.product.name.clone()}</div>
                                                    <div class="text-xs opacity-70">{format_etb(line.product.price)}" each"</div>
                                                </div>
                                                <input
                                                    type="number"
                                                    min="0"
                                                    class="input input-bordered input-sm w-20"
                                                    prop:value=line.quantity.to_string()
                                                    on:change=move |ev| set_quantity(id.clone(), event_target::<web_sys::HtmlInputElement>(&ev))
                                                />
                                                <span class="font-mono w-28 text-right">{format_etb(line.line_total())}</span>
                                                <button
                                                    class="btn btn-ghost btn-xs text-error"
                                                    on:click=move |_| cart.update(|c| c.remove(&remove_id))
                                                >
                                                    "✕"
                                                </button>
                                            </li>
                                        }
                                    }
                                />
                            </ul>
                        </Show>

                        <div class="grid grid-cols-2 gap-3 mt-2">
                            <div class="form-control">
                                <label class="label"><span class="label-text">"Discount (%)"</span></label>
                                <input
                                    type="text"
                                    inputmode="decimal"
                                    placeholder="0"
                                    class=move || {
                                        if discount.with(Result::is_err) {
                                            "input input-bordered input-sm input-error"
                                        } else {
                                            "input input-bordered input-sm"
                                        }
                                    }
                                    prop:value=move || discount_raw.get()
                                    on:input=move |ev| discount_raw.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"Payment"</span></label>
                                <select
                                    class="select select-bordered select-sm"
                                    on:change=move |ev| {
                                        if let Some(m) = PaymentMethod::from_str_opt(&event_target_value(&ev)) {
                                            payment.set(m);
                                        }
                                    }
                                >
                                    {PaymentMethod::ALL
                                        .into_iter()
                                        .map(|m| view! {
                                            <option value=m.as_str() selected=move || payment.get() == m>{m.label()}</option>
                                        })
                                        .collect_view()}
                                </select>
                            </div>
                        </div>

                        <div class="space-y-1 mt-4 font-mono">
                            <div class="flex justify-between">
                                <span>"Subtotal"</span>
                                <span>{move || cart.with(|c| format_etb(c.subtotal()))}</span>
                            </div>
                            <div class="flex justify-between text-success">
                                <span>"Discount"</span>
                                <span>{move || cart.with(|c| format!("-{}", format_etb(c.discount_amount(effective_discount()))))}</span>
                            </div>
                            <div class="flex justify-between text-lg font-bold">
                                <span>"Total"</span>
                                <span>{move || cart.with(|c| format_etb(c.total(effective_discount())))}</span>
                            </div>
                        </div>

                        <div class="card-actions mt-4">
                            <button
                                class="btn btn-ghost"
                                disabled=move || cart.with(Cart::is_empty)
                                on:click=move |_| cart.update(Cart::clear)
                            >
                                "Clear"
                            </button>
                            <button
                                class="btn btn-primary flex-1"
                                disabled=move || processing.get() || cart.with(Cart::is_empty)
                                on:click=process_sale
                            >
                                {move || if processing.get() {
                                    "Processing...".to_string()
                                } else {
                                    format!("Charge {} item(s)", cart.with(Cart::item_count))
                                }}
                            </button>
                        </div>
                    </Card>
                </div>
            </div>

            <Card title="Recent transactions">
                <DataTable
                    headers=&["Time", "Items", "Payment", "Discount", "Total"]
                    loading=sales.loading
                    is_empty=Signal::derive(move || sales.items.with(Vec::is_empty))
                    empty_message="No sales yet today."
                >
                    <For
                        each=recent
                        key=|s| s.id.clone()
                        children=|s| {
                            let items = s
                                .items
                                .iter()
                                .map(|i| format!("{} × {}", i.product_name, i.quantity))
                                .collect::<Vec<_>>()
                                .join(", ");
                            view! {
                                <tr>
                                    <td>{format_datetime(&s.created_at)}</td>
                                    <td class="max-w-md truncate">{items}</td>
                                    <td>{s.payment_method.label()}</td>
                                    <td>{format!("{}%", s.discount_percent)}</td>
                                    <td class="font-mono font-semibold">{format_etb(s.total)}</td>
                                </tr>
                            }
                        }
                    />
                </DataTable>
            </Card>
        </AppShell>
    }
}
