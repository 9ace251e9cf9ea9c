use crate::api::{ListState, use_api};
use crate::components::layout::AppShell;
use crate::components::ui::{Badge, Card, DataTable, PageHeader, StatCard, StatGrid};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::format::format_etb;
use pharmacy_shared::protocol::{ListBranchesRequest, ManagerDashboardRequest};
use pharmacy_shared::{Branch, ManagerStats};

#[component]
pub fn ManagerDashboardPage() -> impl IntoView {
    let api = use_api();
    let stats = RwSignal::new(ManagerStats::default());
    let branches = ListState::<Branch>::new();

    spawn_local(async move {
        if let Some(s) = api.send(&ManagerDashboardRequest, "Loading dashboard").await {
            stats.set(s);
        }
    });
    branches.load(api, ListBranchesRequest, "Loading branches");

    view! {
        <AppShell>
            <PageHeader title="Pharmacy overview" subtitle="Sales and staffing across your branches" />
            <StatGrid>
                <StatCard
                    title="Today's sales"
                    value=Signal::derive(move || stats.with(|s| format_etb(s.today_sales)))
                    tone="text-primary"
                />
                <StatCard
                    title="This month"
                    value=Signal::derive(move || stats.with(|s| format_etb(s.monthly_sales)))
                    tone="text-secondary"
                />
                <StatCard title="Branches" value=Signal::derive(move || stats.with(|s| s.total_branches.to_string())) />
                <StatCard title="Staff" value=Signal::derive(move || stats.with(|s| s.total_staff.to_string())) />
                <StatCard
                    title="Low stock items"
                    value=Signal::derive(move || stats.with(|s| s.low_stock_items.to_string()))
                    tone="text-warning"
                    hint="At or below reorder level"
                />
            </StatGrid>

            <Card title="Branches">
                <DataTable
                    headers=&["Branch", "Location", "Manager", "Status"]
                    loading=branches.loading
                    is_empty=Signal::derive(move || branches.items.with(Vec::is_empty))
                    empty_message="No branches yet."
                >
                    <For
                        each=move || branches.items.get()
                        key=|b| b.id.clone()
                        children=|b| view! {
                            <tr>
                                <td class="font-semibold">{b.name}</td>
                                <td>{b.location}</td>
                                <td>{b.manager_name.unwrap_or_default()}</td>
                                <td>
                                    <Badge
                                        text={if b.is_active { "Active" } else { "Inactive" }}
                                        tone={if b.is_active { "badge-success" } else { "badge-ghost" }}
                                    />
                                </td>
                            </tr>
                        }
                    />
                </DataTable>
            </Card>
        </AppShell>
    }
}
