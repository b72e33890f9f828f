//! CSV import and export of box entries.
//!
//! The file format mirrors the dashboard table: a fixed eight-column header,
//! dates rendered `dd/mm/yyyy`, the computed per-unit cost under "Unit Cost"
//! and the reference price under "Unit Price". Import reads only the four raw
//! columns; derived columns are recomputed at write time. The first malformed
//! row aborts the whole import before anything is submitted.

use std::io::{Read, Write};

use api_types::BoxType;
use api_types::box_entry::BoxEntry;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Writer};
use serde::Serialize;

use crate::entry::RawEntry;
use crate::error::{LedgerError, Result};

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Serialize)]
struct ExportRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Box Type")]
    box_type: &'static str,
    #[serde(rename = "Number of Boxes")]
    number_of_boxes: i64,
    #[serde(rename = "Total Cost")]
    total_cost: f64,
    #[serde(rename = "Unit Cost")]
    unit_cost: f64,
    #[serde(rename = "Unit Price")]
    unit_price: f64,
    #[serde(rename = "Unit Margin")]
    unit_margin: f64,
    #[serde(rename = "Total Margin")]
    total_margin: f64,
}

pub fn write_csv<W: Write>(writer: W, entries: &[BoxEntry]) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    for entry in entries {
        writer.serialize(ExportRow {
            date: entry.date.format(DATE_FORMAT).to_string(),
            box_type: entry.box_type.label(),
            number_of_boxes: entry.number_of_boxes,
            total_cost: entry.total_cost,
            unit_cost: entry.total_cost / entry.number_of_boxes as f64,
            unit_price: entry.unit_cost,
            unit_margin: entry.unit_margin,
            total_margin: entry.total_margin,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawEntry>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // The header is line 1; data starts at line 2.
        rows.push(parse_row(&record, index + 2)?);
    }
    Ok(rows)
}

fn field<'a>(record: &'a StringRecord, row: usize, index: usize, name: &str) -> Result<&'a str> {
    record.get(index).map(str::trim).ok_or_else(|| LedgerError::CsvRow {
        row,
        reason: format!("missing column: {name}"),
    })
}

fn parse_row(record: &StringRecord, row: usize) -> Result<RawEntry> {
    let bad_row = |reason: String| LedgerError::CsvRow { row, reason };

    let date = NaiveDate::parse_from_str(field(record, row, 0, "Date")?, DATE_FORMAT)
        .map_err(|err| bad_row(format!("bad date: {err}")))?;

    let label = field(record, row, 1, "Box Type")?;
    let box_type =
        BoxType::from_label(label).ok_or_else(|| bad_row(format!("unknown box type: {label}")))?;

    let number_of_boxes = field(record, row, 2, "Number of Boxes")?
        .parse::<i64>()
        .map_err(|err| bad_row(format!("bad count: {err}")))?;

    let total_cost = field(record, row, 3, "Total Cost")?
        .parse::<f64>()
        .map_err(|err| bad_row(format!("bad cost: {err}")))?;

    let raw = RawEntry {
        date,
        box_type,
        number_of_boxes,
        total_cost,
    };
    raw.validate().map_err(|err| bad_row(err.to_string()))?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::entry::UNIT_COST;

    fn entry(box_type: BoxType, number_of_boxes: i64, total_cost: f64) -> BoxEntry {
        let count = number_of_boxes as f64;
        BoxEntry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            box_type,
            number_of_boxes,
            total_cost,
            unit_cost: UNIT_COST,
            unit_margin: UNIT_COST - total_cost / count,
            total_margin: UNIT_COST * count - total_cost,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn export_writes_the_dashboard_header_and_dates() {
        let mut out = Vec::new();
        write_csv(&mut out, &[entry(BoxType::NormalBox, 10, 5000.0)]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,Box Type,Number of Boxes,Total Cost,Unit Cost,Unit Price,Unit Margin,Total Margin"
        );
        assert_eq!(
            lines.next().unwrap(),
            "14/03/2026,Normal box,10,5000.0,500.0,640.0,140.0,1400.0"
        );
    }

    #[test]
    fn round_trip_reproduces_the_raw_fields() {
        let entries = vec![
            entry(BoxType::NormalBox, 10, 5000.0),
            entry(BoxType::DoubleBox, 3, 1000.0),
            entry(BoxType::FlushBox, 7, 2149.5),
        ];

        let mut out = Vec::new();
        write_csv(&mut out, &entries).unwrap();
        let raws = read_csv(out.as_slice()).unwrap();

        assert_eq!(raws.len(), entries.len());
        for (raw, original) in raws.iter().zip(&entries) {
            assert_eq!(raw.date, original.date);
            assert_eq!(raw.box_type, original.box_type);
            assert_eq!(raw.number_of_boxes, original.number_of_boxes);
            assert_eq!(raw.total_cost, original.total_cost);
        }
    }

    #[test]
    fn import_reads_only_the_raw_columns() {
        // Derived columns deliberately inconsistent; they must be ignored.
        let data = "Date,Box Type,Number of Boxes,Total Cost,Unit Cost,Unit Price,Unit Margin,Total Margin\n\
                    14/03/2026,Double box,4,1200.0,999.0,999.0,999.0,999.0\n";
        let raws = read_csv(data.as_bytes()).unwrap();

        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].box_type, BoxType::DoubleBox);
        assert_eq!(raws[0].number_of_boxes, 4);
        assert_eq!(raws[0].total_cost, 1200.0);
    }

    #[test]
    fn import_accepts_bare_raw_rows() {
        let data = "Date,Box Type,Number of Boxes,Total Cost\n21/12/2025,Flush box,2,300.5\n";
        let raws = read_csv(data.as_bytes()).unwrap();

        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].date, NaiveDate::from_ymd_opt(2025, 12, 21).unwrap());
    }

    #[test]
    fn malformed_row_fails_the_whole_file_with_its_line_number() {
        let data = "Date,Box Type,Number of Boxes,Total Cost\n\
                    14/03/2026,Normal box,10,5000.0\n\
                    15/03/2026,Normal box,many,100.0\n";
        let err = read_csv(data.as_bytes()).unwrap_err();

        match err {
            LedgerError::CsvRow { row, reason } => {
                assert_eq!(row, 3);
                assert!(reason.contains("bad count"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_box_type_is_rejected() {
        let data = "Date,Box Type,Number of Boxes,Total Cost\n14/03/2026,Crate,1,10.0\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::CsvRow { row: 2, .. }));
    }

    #[test]
    fn zero_count_row_is_rejected_at_parse_time() {
        let data = "Date,Box Type,Number of Boxes,Total Cost\n14/03/2026,Normal box,0,10.0\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::CsvRow { row: 2, .. }));
    }
}
