use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::Timelike;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Observation, Response, StudentDataset, StudentRecord, SLOTS};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Workbook schema
// ---------------------------------------------------------------------------

pub const COL_PROGRAM: &str = "Prog";
pub const COL_KEY: &str = "Clave";
pub const COL_NAME_EMAIL: &str = "Nombre y Email";
pub const COL_RESPONSES: [&str; SLOTS] = ["Res1", "Res2", "Res3"];
pub const COL_OBSERVATIONS: [&str; SLOTS] = ["Observ1", "Observ2", "Observ3"];

/// Label used for records whose `Prog` cell is blank.
pub const NO_PROGRAM: &str = "(sin programa)";

/// Every column the dashboard needs, in canonical order.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![COL_PROGRAM, COL_KEY, COL_NAME_EMAIL];
    cols.extend(COL_RESPONSES);
    cols.extend(COL_OBSERVATIONS);
    cols
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the student dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first sheet, or `sheet` if given
/// * `.csv`  – header row plus one student per line
/// * `.json` – `[{ "Prog": "...", "Clave": ..., ... }, ...]`
pub fn load_file(path: &Path, sheet: Option<&str>) -> Result<StudentDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path, sheet)?,
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dataset = build_dataset(table, path)?;
    log::info!(
        "Loaded {} students in {} programs from {}",
        dataset.len(),
        dataset.programs.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw table → StudentDataset
// ---------------------------------------------------------------------------

/// Header plus rows of cells, independent of the source format.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

fn build_dataset(table: RawTable, source: &Path) -> Result<StudentDataset, LoadError> {
    let column_index = |name: &str| table.headers.iter().position(|h| h == name);

    let missing: Vec<String> = required_columns()
        .into_iter()
        .filter(|col| column_index(col).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    // Presence was checked above.
    let idx = |name: &str| column_index(name).unwrap_or_default();
    let program_idx = idx(COL_PROGRAM);
    let key_idx = idx(COL_KEY);
    let name_idx = idx(COL_NAME_EMAIL);
    let response_idx = COL_RESPONSES.map(idx);
    let observation_idx = COL_OBSERVATIONS.map(idx);

    let known = required_columns();
    let extra_columns: Vec<(usize, String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty() && !known.iter().any(|k| k == h))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;

    for row in &table.rows {
        if row.iter().all(CellValue::is_empty) {
            skipped += 1;
            continue;
        }
        let cell = |i: usize| row.get(i).unwrap_or(&CellValue::Empty);

        let extra: BTreeMap<String, CellValue> = extra_columns
            .iter()
            .map(|(i, name)| (name.clone(), cell(*i).clone()))
            .collect();

        records.push(StudentRecord {
            program: cell(program_idx)
                .as_text()
                .unwrap_or_else(|| NO_PROGRAM.to_string()),
            key: cell(key_idx).as_text().unwrap_or_default(),
            name_email: cell(name_idx).as_text().unwrap_or_default(),
            responses: response_idx.map(|i| Response::from_cell(cell(i))),
            observations: observation_idx.map(|i| Observation::from_cell(cell(i))),
            extra,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} empty rows in {}", source.display());
    }

    let extra_names = extra_columns.into_iter().map(|(_, name)| name).collect();
    Ok(StudentDataset::from_records(
        records,
        extra_names,
        source.to_path_buf(),
    ))
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(LoadError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(LoadError::EmptySheet)?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or(LoadError::EmptySheet)?
        .iter()
        .map(|c| data_to_cell(c).to_string().trim().to_string())
        .collect();

    let rows = rows
        .map(|r| r.iter().map(data_to_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::from_f64(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.num_seconds_from_midnight() == 0 => {
                CellValue::Date(datetime.date().to_string())
            }
            Some(datetime) => CellValue::Date(datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::from_f64(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::Date(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawTable { headers, rows })
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON: an array of objects keyed by column name.
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Empty))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.trim().is_empty() => CellValue::Empty,
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::from_f64(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    use super::*;
    use crate::data::clean::Sentiment;
    use crate::data::model::Rating;

    fn write_workbook(dir: &Path, headers: &[&str], rows: &[Vec<&str>]) -> PathBuf {
        let path = dir.join("datos.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (c, h) in headers.iter().enumerate() {
            sheet.write_string(0, c as u16, *h).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                if v.is_empty() {
                    continue;
                }
                let (r, c) = (r as u32 + 1, c as u16);
                match v.parse::<f64>() {
                    Ok(n) => sheet.write_number(r, c, n).unwrap(),
                    Err(_) => sheet.write_string(r, c, *v).unwrap(),
                };
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    const HEADERS: [&str; 10] = [
        "Prog", "Clave", "Nombre y Email", "Res1", "Res2", "Res3", "Observ1", "Observ2",
        "Observ3", "Grupo",
    ];

    #[test]
    fn loads_workbook_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(
            dir.path(),
            &HEADERS,
            &[
                vec![
                    "ING", "1024", "Ana Pérez - ana@uni.edu", "BUENO", "muy bueno",
                    "No disponible", "Participa (p)", "Falta tarea (n)", "", "A",
                ],
                vec!["", "", "", "", "", "", "", "", "", ""],
                vec![
                    "MED", "2048", "Luis Gómez - luis@uni.edu", "SOBRESALIENTE",
                    "INSUFICIENTE", "Regular", "", "Sin marca", "Excelente (p)", "B",
                ],
            ],
        );

        let ds = load_file(&path, None).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.extra_columns, vec!["Grupo".to_string()]);
        assert_eq!(
            ds.programs.iter().cloned().collect::<Vec<_>>(),
            vec!["ING".to_string(), "MED".to_string()]
        );

        let ana = &ds.records[0];
        assert_eq!(ana.key, "1024");
        assert_eq!(ana.display_name(), "Ana Pérez");
        assert_eq!(ana.responses[0].rating, Some(Rating::Good));
        assert_eq!(ana.responses[1].rating, Some(Rating::VeryGood));
        assert_eq!(ana.responses[2].score(), None);
        assert_eq!(ana.observations[0].sentiment, Sentiment::Positive);
        assert_eq!(ana.observations[1].text, "Falta tarea");
        assert_eq!(ana.extra.get("Grupo"), Some(&CellValue::Text("A".into())));

        let luis = &ds.records[1];
        assert_eq!(luis.responses[2].rating, None);
        assert_eq!(luis.responses[2].raw.as_deref(), Some("Regular"));
        assert_eq!(luis.observations[0].sentiment, Sentiment::Neutral);
    }

    #[test]
    fn reports_every_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(
            dir.path(),
            &["Prog", "Clave", "Nombre y Email", "Res1", "Observ1", "Observ2", "Observ3"],
            &[],
        );

        match load_file(&path, None) {
            Err(LoadError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["Res2".to_string(), "Res3".to_string()])
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        assert!(matches!(load_file(&path, None), Err(LoadError::NotFound(p)) if p == path));
    }

    #[test]
    fn unknown_sheet_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(dir.path(), &HEADERS, &[]);
        assert!(matches!(
            load_file(&path, Some("Hoja9")),
            Err(LoadError::SheetNotFound(name)) if name == "Hoja9"
        ));
    }

    #[test]
    fn loads_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{}", HEADERS[..9].join(",")).unwrap();
        writeln!(f, "ING,7,Eva - eva@uni.edu,BUENO,BUENO,ACEPTABLE,Bien (p),,").unwrap();
        drop(f);

        let ds = load_file(&path, None).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].key, "7");
        assert!(ds.extra_columns.is_empty());
        assert_eq!(ds.records[0].observations[1].sentiment, Sentiment::Neutral);
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.json");
        let json = serde_json::json!([{
            "Prog": "ING", "Clave": 12.0, "Nombre y Email": "Eva - eva@uni.edu",
            "Res1": "BUENO", "Res2": null, "Res3": "ACEPTABLE",
            "Observ1": "Bien (p)", "Observ2": null, "Observ3": "Mal (n)"
        }]);
        std::fs::write(&path, json.to_string()).unwrap();

        let ds = load_file(&path, None).unwrap();
        assert_eq!(ds.records[0].key, "12");
        assert_eq!(ds.records[0].responses[1].label(), None);
        assert_eq!(ds.records[0].observations[2].sentiment, Sentiment::Negative);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(matches!(
            load_file(&path, None),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn excel_dates_load_as_iso_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let mut headers = HEADERS[..9].to_vec();
        headers.extend(["Fecha", "Entrega"]);
        for (c, h) in headers.iter().enumerate() {
            sheet.write_string(0, c as u16, *h).unwrap();
        }
        let row = ["ING", "1", "Ana - ana@uni.edu", "BUENO", "BUENO", "BUENO", "", "", ""];
        for (c, v) in row.iter().enumerate() {
            sheet.write_string(1, c as u16, *v).unwrap();
        }
        let date_only = Format::new().set_num_format("yyyy-mm-dd");
        let with_time = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let day = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
        let moment = ExcelDateTime::from_ymd(2024, 3, 15)
            .unwrap()
            .and_hms(10, 30, 0)
            .unwrap();
        sheet.write_datetime_with_format(1, 9, &day, &date_only).unwrap();
        sheet.write_datetime_with_format(1, 10, &moment, &with_time).unwrap();
        workbook.save(&path).unwrap();

        let ds = load_file(&path, None).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.extra.get("Fecha"), Some(&CellValue::Date("2024-03-15".into())));
        assert_eq!(
            rec.extra.get("Entrega"),
            Some(&CellValue::Date("2024-03-15T10:30:00".into()))
        );
    }

    #[test]
    fn blank_sheet_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vacio.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        workbook.save(&path).unwrap();

        assert!(matches!(load_file(&path, None), Err(LoadError::EmptySheet)));
    }
}
