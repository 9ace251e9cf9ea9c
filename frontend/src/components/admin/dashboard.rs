use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, StatCard, StatGrid};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::format::{format_etb, format_optional_date};
use pharmacy_shared::protocol::{AdminDashboardRequest, ListPharmaciesRequest};
use pharmacy_shared::{AdminStats, Pharmacy, PharmacyStatus};

/// 最近注册的药房显示条数
const RECENT_LIMIT: usize = 5;

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let api = use_api();
    let stats = RwSignal::new(AdminStats::default());
    let pharmacies = ListState::<Pharmacy>::new();

    spawn_local(async move {
        if let Some(s) = api.send(&AdminDashboardRequest, "Loading dashboard").await {
            stats.set(s);
        }
    });
    pharmacies.load(api, ListPharmaciesRequest, "Loading pharmacies");

    let count = move |f: fn(&AdminStats) -> u32| Signal::derive(move || stats.with(f).to_string());

    let pending = move || {
        pharmacies.items.with(|list| {
            list.iter()
                .filter(|p| p.status == PharmacyStatus::Pending)
                .take(RECENT_LIMIT)
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <AppShell>
            <PageHeader title="Platform overview" subtitle="All tenants at a glance" />
            <StatGrid>
                <StatCard title="Pharmacies" value=count(|s| s.total_pharmacies) tone="text-primary" />
                <StatCard title="Active" value=count(|s| s.active_pharmacies) tone="text-success" />
                <StatCard title="Pending approval" value=count(|s| s.pending_pharmacies) tone="text-warning" />
                <StatCard title="Branches" value=count(|s| s.total_branches) />
            </StatGrid>
            <StatGrid>
                <StatCard title="Open tickets" value=count(|s| s.open_tickets) />
                <StatCard title="Open billing issues" value=count(|s| s.open_billing_issues) tone="text-error" />
                <StatCard
                    title="Monthly revenue"
                    value=Signal::derive(move || stats.with(|s| format_etb(s.monthly_revenue)))
                    tone="text-secondary"
                />
            </StatGrid>

            <Card title="Awaiting approval">
                <DataTable
                    headers=&["Pharmacy", "Email", "Phone", "Registered", "Status"]
                    loading=pharmacies.loading
                    is_empty=Signal::derive(move || pending().is_empty())
                    empty_message="No pharmacies are waiting for approval."
                >
                    <For
                        each=pending
                        key=|p| p.id.clone()
                        children=|p| view! {
                            <tr>
                                <td class="font-semibold">{p.name}</td>
                                <td>{p.email}</td>
                                <td>{p.phone}</td>
                                <td>{format_optional_date(p.created_at.as_ref())}</td>
                                <td><Badge text=p.status.label() tone="badge-warning" /></td>
                            </tr>
                        }
                    />
                </DataTable>
            </Card>
        </AppShell>
    }
}
