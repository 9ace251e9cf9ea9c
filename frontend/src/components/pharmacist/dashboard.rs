use super::stock_badges;
use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, StatCard, StatGrid};
use crate::web::today;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::inventory::summarize;
use pharmacy_shared::protocol::{ListProductsRequest, PharmacistDashboardRequest};
use pharmacy_shared::{PharmacistStats, Product};

/// 需要关注的商品最多显示条数
const ATTENTION_LIMIT: usize = 8;

#[component]
pub fn PharmacistDashboardPage() -> impl IntoView {
    let api = use_api();
    let stats = RwSignal::new(PharmacistStats::default());
    let products = ListState::<Product>::new();
    let today = today();

    spawn_local(async move {
        if let Some(s) = api.send(&PharmacistDashboardRequest, "Loading dashboard").await {
            stats.set(s);
        }
    });
    products.load(api, ListProductsRequest, "Loading inventory");

    // 本地按商品列表重新统计；列表为空时退回后端汇总
    let summary = Memo::new(move |_| {
        let day = today?;
        let s = products.items.with(|items| summarize(items, day));
        (s.total > 0).then_some(s)
    });

    let attention = move || {
        products.items.with(|items| {
            items
                .iter()
                .filter(|p| !stock_badges(p, today).is_empty())
                .take(ATTENTION_LIMIT)
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let total = Signal::derive(move || match summary.get() {
        Some(s) => s.total.to_string(),
        None => stats.with(|s| s.total_products.to_string()),
    });
    let low = Signal::derive(move || match summary.get() {
        Some(s) => (s.low_stock + s.out_of_stock).to_string(),
        None => stats.with(|s| s.low_stock_items.to_string()),
    });
    let expiring = Signal::derive(move || match summary.get() {
        Some(s) => (s.expiring + s.expired).to_string(),
        None => stats.with(|s| s.expiring_soon.to_string()),
    });

    view! {
        <AppShell>
            <PageHeader title="Pharmacy floor" subtitle="Stock health and prescriptions waiting for you" />
            <StatGrid>
                <StatCard title="Products" value=total />
                <StatCard title="Low or out of stock" value=low tone="text-warning" />
                <StatCard title="Expiring or expired" value=expiring tone="text-error" hint="Within 30 days" />
                <StatCard
                    title="Pending prescriptions"
                    value=Signal::derive(move || stats.with(|s| s.pending_prescriptions.to_string()))
                    tone="text-primary"
                />
            </StatGrid>

            <Card title="Needs attention">
                <DataTable
                    headers=&["Product", "Stock", "Expiry", "Flags"]
                    loading=products.loading
                    is_empty=Signal::derive(move || attention().is_empty())
                    empty_message="All stock levels and expiry dates look healthy."
                >
                    <For
                        each=attention
                        key=|p| (p.id.clone(), p.stock_quantity)
                        children=move |p| {
                            let badges = stock_badges(&p, today);
                            view! {
                                <tr>
                                    <td class="font-semibold">{p.name}</td>
                                    <td>{p.stock_quantity}</td>
                                    <td>{p.expiry_date.map(|d| d.to_string()).unwrap_or_default()}</td>
                                    <td class="flex gap-1">
                                        {badges
                                            .into_iter()
                                            .map(|(text, tone)| view! { <Badge text=text tone=tone /> })
                                            .collect_view()}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </DataTable>
            </Card>
        </AppShell>
    }
}
