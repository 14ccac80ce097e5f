//! Export aligned rows to CSV or JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets: one row per
//! period, raw (unformatted) numbers, empty cells for missing values.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{AlignedRow, NamedSeries};
use crate::error::AppError;

/// Write aligned rows to a CSV file.
pub fn write_rows_csv(path: &Path, rows: &[AlignedRow], series: &[NamedSeries]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    write_rows_csv_to(&mut out, rows, series)
        .and_then(|()| out.flush())
        .map_err(|e| AppError::output(format!("Failed to write export CSV: {e}")))
}

/// Write aligned rows as pretty-printed JSON.
pub fn write_rows_json(path: &Path, rows: &[AlignedRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), rows)
        .map_err(|e| AppError::output(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

fn write_rows_csv_to<W: Write>(out: &mut W, rows: &[AlignedRow], series: &[NamedSeries]) -> std::io::Result<()> {
    // Header
    let mut header = vec!["period_key".to_string(), "label".to_string()];
    for s in series {
        header.push(csv_field(&s.id));
        for suffix in ["prior_delta", "prior_pct", "year_delta", "year_pct"] {
            header.push(csv_field(&format!("{}_{suffix}", s.id)));
        }
    }
    writeln!(out, "{}", header.join(","))?;

    for row in rows {
        let mut cells = vec![csv_field(&row.key.to_string()), csv_field(&row.label)];
        for s in series {
            let change = row.changes.get(&s.id).copied().unwrap_or_default();
            cells.push(fmt_cell(row.values.get(&s.id).copied().flatten()));
            cells.push(fmt_cell(change.prior_delta));
            cells.push(fmt_cell(change.prior_pct));
            cells.push(fmt_cell(change.year_delta));
            cells.push(fmt_cell(change.year_pct));
        }
        writeln!(out, "{}", cells.join(","))?;
    }

    Ok(())
}

fn fmt_cell(v: Option<f64>) -> String {
    v.map(|v| format!("{v}")).unwrap_or_default()
}

/// Quote a field if it contains a delimiter, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::align;
    use crate::domain::{Frequency, SeriesPoint, SortOrder};
    use crate::period::PeriodKey;

    fn series(id: &str, values: &[Option<f64>]) -> NamedSeries {
        NamedSeries {
            id: id.to_string(),
            display_name: id.to_string(),
            unit: None,
            unit_scale: None,
            is_percent_type: false,
            frequency: Frequency::Annual,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| SeriesPoint {
                    key: PeriodKey::annual(2020 + i as i32),
                    label: format!("Annual {}", 2020 + i),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn csv_golden_snapshot() {
        let input = vec![series("gdp", &[Some(100.0), Some(105.0)]), series("a,b", &[None])];
        let rows = align(&input, None, SortOrder::Asc);

        let mut buf = Vec::new();
        write_rows_csv_to(&mut buf, &rows, &input).unwrap();
        let txt = String::from_utf8(buf).unwrap();

        let expected = concat!(
            "period_key,label,gdp,gdp_prior_delta,gdp_prior_pct,gdp_year_delta,gdp_year_pct,",
            "\"a,b\",\"a,b_prior_delta\",\"a,b_prior_pct\",\"a,b_year_delta\",\"a,b_year_pct\"\n",
            "2020,Annual 2020,100,,,,,,,,,\n",
            "2021,Annual 2021,105,5,5,5,5,,,,,\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn unparsed_period_keys_are_quoted() {
        let input = vec![crate::io::ingest::parse_series_json(
            r#"{"id": "x", "frequency": "monthly",
                "observations": [{"date": "Jul 1, 2024", "value": 1}]}"#,
        )
        .unwrap()];
        let rows = align(&input, None, SortOrder::Asc);

        let mut buf = Vec::new();
        write_rows_csv_to(&mut buf, &rows, &input).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\""), "key must be quoted: {}", lines[1]);
        assert!(lines[1].contains(",\"Jul 1, 2024\",1,"));
        // Same number of fields as the header once quoted commas are ignored.
        let fields = |line: &str| {
            let mut quoted = false;
            let mut n = 1;
            for c in line.chars() {
                match c {
                    '"' => quoted = !quoted,
                    ',' if !quoted => n += 1,
                    _ => {}
                }
            }
            n
        };
        assert_eq!(fields(lines[1]), fields(lines[0]));
    }

    #[test]
    fn json_export_round_trips_through_serde_value() {
        let input = vec![series("gdp", &[Some(1.0)])];
        let rows = align(&input, None, SortOrder::Asc);

        let path = std::env::temp_dir().join(format!("sx-export-{}.json", std::process::id()));
        write_rows_json(&path, &rows).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v[0]["label"], "Annual 2020");
        assert_eq!(v[0]["values"]["gdp"], 1.0);
        assert!(v[0]["changes"]["gdp"]["prior_delta"].is_null());
        std::fs::remove_file(&path).ok();
    }
}
