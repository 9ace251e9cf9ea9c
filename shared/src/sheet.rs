//! 表格导入/导出
//!
//! 导入：读取工作簿的第一张工作表（或 CSV），第一行为表头，其余每行按表头映射为一条记录。
//! 导出：对象数组 -> 表头行（按首次出现顺序合并所有键）+ 数据行 -> Excel 工作簿或 CSV。

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Cursor;
use thiserror::Error;

pub type Record = Map<String, Value>;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("could not read workbook: {0}")]
    Read(#[from] calamine::Error),

    #[error("the workbook has no worksheet")]
    NoWorksheet,

    #[error("could not write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("could not encode rows: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 行数据 -> 记录；缺失单元格为空串，整行为空的行跳过
pub fn records_from_rows(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    body.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            header
                .iter()
                .enumerate()
                .filter(|(_, key)| !key.is_empty())
                .map(|(i, key)| {
                    let cell = row.get(i).map(|c| c.trim()).unwrap_or_default();
                    (key.clone(), Value::String(cell.to_string()))
                })
                .collect()
        })
        .collect()
}

/// 读取记录中的文本单元格（不区分表头大小写）
pub fn cell<'a>(record: &'a Record, key: &str) -> &'a str {
    record
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.as_str())
        .unwrap_or_default()
}

/// 任意可序列化列表 -> 表头 + 对象；非对象元素被忽略
fn table_from_records<T: Serialize>(items: &[T]) -> serde_json::Result<(Vec<String>, Vec<Record>)> {
    let mut header: Vec<String> = Vec::new();
    let mut objects: Vec<Record> = Vec::with_capacity(items.len());

    for item in items {
        if let Value::Object(obj) = serde_json::to_value(item)? {
            for key in obj.keys() {
                if !header.contains(key) {
                    header.push(key.clone());
                }
            }
            objects.push(obj);
        }
    }
    Ok((header, objects))
}

/// 任意可序列化列表 -> 行数据
pub fn rows_from_records<T: Serialize>(items: &[T]) -> serde_json::Result<Vec<Vec<String>>> {
    let (header, objects) = table_from_records(items)?;
    if header.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::with_capacity(objects.len() + 1);
    rows.push(header.clone());
    for obj in &objects {
        rows.push(
            header
                .iter()
                .map(|key| obj.get(key).map(display_value).unwrap_or_default())
                .collect(),
        );
    }
    Ok(rows)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// 列表导出为 `.xlsx` 工作簿字节
///
/// 数字与布尔值保留单元格类型，其余按文本写入；表头加粗。
pub fn xlsx_from_records<T: Serialize>(items: &[T]) -> Result<Vec<u8>, SheetError> {
    let (header, objects) = table_from_records(items)?;
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, key) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, key, &bold)?;
    }
    for (i, obj) in objects.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, key) in header.iter().enumerate() {
            let col = col as u16;
            match obj.get(key) {
                None | Some(Value::Null) => {}
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        sheet.write_number(row, col, f)?;
                    }
                    None => {
                        sheet.write_string(row, col, n.to_string())?;
                    }
                },
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Some(other) => {
                    sheet.write_string(row, col, display_value(other))?;
                }
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

/// 读取工作簿（xlsx/xls/ods）第一张工作表的全部行
pub fn rows_from_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// 按文件扩展名选择解析方式：`.csv` 按文本，其余按工作簿
pub fn rows_from_upload(filename: &str, bytes: &[u8]) -> Result<Vec<Vec<String>>, SheetError> {
    let is_csv = filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(parse_csv(&String::from_utf8_lossy(bytes)))
    } else {
        rows_from_workbook(bytes)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) => s.clone(),
        // 日期单元格 -> YYYY-MM-DD（有时间部分时附带时间）
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(at) if at.time() == chrono::NaiveTime::MIN => at.date().to_string(),
            Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
            None => dt.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}

/// 列表直接导出为 CSV 文本
pub fn csv_from_records<T: Serialize>(items: &[T]) -> serde_json::Result<String> {
    Ok(to_csv(&rows_from_records(items)?))
}

/// RFC 4180 编码
pub fn to_csv(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row.iter().map(|c| quote(c)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

fn quote(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// RFC 4180 解析（支持引号内的逗号、换行与转义引号）
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                cell.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if cell.is_empty() => in_quotes = true,
            (',', false) => row.push(std::mem::take(&mut cell)),
            ('\r', false) => {}
            ('\n', false) => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            (c, _) => cell.push(c),
        }
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn first_row_is_header() {
        let rows = vec![
            strings(&["name", " price ", "stock"]),
            strings(&["Paracetamol", "12.5", "40"]),
            strings(&["", "", ""]),
            strings(&["ORS", "3"]),
        ];
        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(cell(&records[0], "Price"), "12.5");
        assert_eq!(cell(&records[1], "stock"), "");
        assert_eq!(cell(&records[1], "missing"), "");
    }

    #[test]
    fn export_unions_keys_in_order() {
        let items = vec![
            json!({ "id": "1", "name": "A" }),
            json!({ "id": "2", "tags": ["x", "y"], "total": 9.5 }),
        ];
        let rows = rows_from_records(&items).unwrap();
        assert_eq!(rows[0], strings(&["id", "name", "tags", "total"]));
        assert_eq!(rows[1], strings(&["1", "A", "", ""]));
        assert_eq!(rows[2], strings(&["2", "", "x; y", "9.5"]));
    }

    #[test]
    fn csv_quotes_and_parses_back() {
        let rows = vec![
            strings(&["name", "note"]),
            strings(&["Cough syrup, 100ml", "say \"shake well\""]),
            strings(&["Line\nbreak", ""]),
        ];
        let csv = to_csv(&rows);
        assert!(csv.starts_with("name,note\r\n\"Cough syrup, 100ml\","));
        assert_eq!(parse_csv(&csv), rows);
    }

    #[test]
    fn workbook_export_reads_back_through_first_sheet() {
        let items = vec![
            json!({ "name": "Paracetamol 500mg", "price": 12.5, "stock_quantity": 40, "requires_prescription": false }),
            json!({ "name": "Amoxicillin", "price": 80, "barcode": "AMX-500", "requires_prescription": true }),
        ];
        let bytes = xlsx_from_records(&items).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let rows = rows_from_workbook(&bytes).unwrap();
        assert_eq!(
            rows[0],
            strings(&["name", "price", "requires_prescription", "stock_quantity", "barcode"])
        );
        assert_eq!(rows[1], strings(&["Paracetamol 500mg", "12.5", "false", "40", ""]));
        assert_eq!(rows[2], strings(&["Amoxicillin", "80", "true", "", "AMX-500"]));

        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(cell(&records[1], "barcode"), "AMX-500");
    }

    #[test]
    fn upload_dispatches_on_extension() {
        let csv = b"name,stock\nORS,12\n";
        let rows = rows_from_upload("Stock.CSV", csv).unwrap();
        assert_eq!(rows, vec![strings(&["name", "stock"]), strings(&["ORS", "12"])]);

        let bytes = xlsx_from_records(&[json!({ "name": "ORS", "stock": 12 })]).unwrap();
        let rows = rows_from_upload("stock.xlsx", &bytes).unwrap();
        assert_eq!(rows[1], strings(&["ORS", "12"]));

        assert!(matches!(
            rows_from_upload("notes.xlsx", b"name,stock"),
            Err(SheetError::Read(_))
        ));
    }

    #[test]
    fn parse_strips_bom_and_handles_missing_trailing_newline() {
        let parsed = parse_csv("\u{feff}a,b\n1,2");
        assert_eq!(parsed, vec![strings(&["a", "b"]), strings(&["1", "2"])]);
    }
}
