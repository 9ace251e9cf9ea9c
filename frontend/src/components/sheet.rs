//! 表格导入/导出按钮

use crate::toast::use_toast;
use crate::web::{download_bytes, download_text, read_file_bytes};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::sheet::{
    CSV_MIME, Record, XLSX_MIME, csv_from_records, records_from_rows, rows_from_upload,
    xlsx_from_records,
};
use serde::Serialize;
use wasm_bindgen::JsCast;

/// 把当前列表导出为 Excel 工作簿（附带 CSV 选项）
///
/// `name` 为不含扩展名的文件名。
#[component]
pub fn ExportButton<T>(items: RwSignal<Vec<T>>, name: &'static str) -> impl IntoView
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    let toast = use_toast();

    let export_xlsx = move |_| {
        let filename = format!("{}.xlsx", name);
        let result = items
            .with_untracked(|list| xlsx_from_records(list))
            .map_err(|e| e.to_string())
            .and_then(|bytes| download_bytes(&filename, XLSX_MIME, &bytes));
        if let Err(e) = result {
            log::error!("[Export] {}: {}", filename, e);
            toast.error(format!("Export failed: {}", e));
        }
    };

    let export_csv = move |_| {
        let filename = format!("{}.csv", name);
        let result = items
            .with_untracked(|list| csv_from_records(list))
            .map_err(|e| e.to_string())
            .and_then(|csv| download_text(&filename, CSV_MIME, &csv));
        if let Err(e) = result {
            log::error!("[Export] {}: {}", filename, e);
            toast.error(format!("Export failed: {}", e));
        }
    };

    view! {
        <div class="join">
            <button class="btn btn-outline btn-sm join-item" on:click=export_xlsx>"Export Excel"</button>
            <button class="btn btn-outline btn-sm join-item" on:click=export_csv>"CSV"</button>
        </div>
    }
}

/// 选择 Excel（或 CSV）文件，读取第一张工作表并解析为记录（首行为表头）
#[component]
pub fn ImportButton(#[prop(into)] on_records: Callback<Vec<Record>>) -> impl IntoView {
    let toast = use_toast();

    let on_change = move |ev: leptos::web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // 允许再次选择同一个文件
        input.set_value("");

        spawn_local(async move {
            let filename = file.name();
            let rows = read_file_bytes(&file)
                .await
                .and_then(|bytes| rows_from_upload(&filename, &bytes).map_err(|e| e.to_string()));
            match rows {
                Ok(rows) => {
                    let records = records_from_rows(&rows);
                    log::info!("[Import] {}: {} record(s)", filename, records.len());
                    if records.is_empty() {
                        toast.error("The file has no data rows");
                    } else {
                        on_records.run(records);
                    }
                }
                Err(e) => {
                    log::error!("[Import] {}: {}", filename, e);
                    toast.error(format!("Import failed: {}", e));
                }
            }
        });
    };

    view! {
        <label class="btn btn-outline btn-sm">
            "Import Excel"
            <input
                type="file"
                accept=".xlsx,.xls,.ods,.csv,application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,application/vnd.ms-excel,text/csv"
                class="hidden"
                on:change=on_change
            />
        </label>
    }
}
