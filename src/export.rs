use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::stats::visible;
use crate::data::loader::{COL_KEY, COL_NAME_EMAIL, COL_OBSERVATIONS, COL_PROGRAM, COL_RESPONSES};
use crate::data::model::{StudentDataset, StudentRecord};

/// Header of the exported table: schema columns, numeric scores, coded
/// observations, then any extra sheet columns.
pub fn export_headers(dataset: &StudentDataset) -> Vec<String> {
    let mut headers: Vec<String> = vec![COL_PROGRAM.into(), COL_KEY.into(), COL_NAME_EMAIL.into()];
    headers.extend(COL_RESPONSES.iter().map(|c| c.to_string()));
    headers.extend(COL_RESPONSES.iter().map(|c| format!("{c}_Num")));
    headers.extend(COL_OBSERVATIONS.iter().map(|c| c.to_string()));
    headers.extend(COL_OBSERVATIONS.iter().map(|c| format!("{c}_Tipo")));
    headers.extend(dataset.extra_columns.iter().cloned());
    headers
}

/// One record as text cells, aligned with [`export_headers`].
pub fn export_row(dataset: &StudentDataset, rec: &StudentRecord) -> Vec<String> {
    let mut row: Vec<String> = vec![rec.program.clone(), rec.key.clone(), rec.name_email.clone()];
    row.extend(rec.responses.iter().map(|r| r.label().unwrap_or_default()));
    row.extend(
        rec.responses
            .iter()
            .map(|r| r.score().map(|s| s.to_string()).unwrap_or_default()),
    );
    row.extend(rec.observations.iter().map(|o| o.text.clone()));
    row.extend(rec.observations.iter().map(|o| o.sentiment.to_string()));
    row.extend(
        dataset
            .extra_columns
            .iter()
            .map(|col| rec.extra.get(col).map(|v| v.to_string()).unwrap_or_default()),
    );
    row
}

/// Write the visible rows as CSV.
pub fn write_csv<W: io::Write>(dataset: &StudentDataset, indices: &[usize], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(export_headers(dataset))
        .context("writing CSV header")?;

    for rec in visible(dataset, indices) {
        writer
            .write_record(export_row(dataset, rec))
            .with_context(|| format!("writing row for '{}'", rec.name_email))?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write the visible rows to a CSV file at `path`.
pub fn export_csv_file(dataset: &StudentDataset, indices: &[usize], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, indices, file)?;
    log::info!("Exported {} rows to {}", indices.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::tests::{dataset, record};

    #[test]
    fn exports_only_visible_rows_with_coded_columns() -> Result<()> {
        let ds = dataset(vec![
            record("ING", "Ana", ["BUENO", "No disponible", ""], ["Bien (p)", "", "Mal (n)"]),
            record("MED", "Luis", ["ACEPTABLE", "", ""], ["", "", ""]),
        ]);
        let mut buf = Vec::new();
        write_csv(&ds, &[0], &mut buf)?;

        let text = String::from_utf8(buf)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Prog,Clave,Nombre y Email,Res1,Res2,Res3,Res1_Num,Res2_Num,Res3_Num,\
             Observ1,Observ2,Observ3,Observ1_Tipo,Observ2_Tipo,Observ3_Tipo"
        );
        assert_eq!(
            lines[1],
            "ING,3,Ana - ana@uni.edu,BUENO,No disponible,,3,,,Bien,,Mal,Positiva,Neutra,Negativa"
        );
        Ok(())
    }
}
