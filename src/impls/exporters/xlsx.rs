use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::EXPIRY_FORMAT;
use crate::core::exporter::Exporter;
use crate::core::models::{code::VotingCode, tally::Tally};
use crate::error::Error;

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
}

/// One worksheet: a bold header row followed by the data rows.
#[derive(Debug)]
struct Table {
    name: &'static str,
    columns: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

fn results_table(tally: &Tally) -> Table {
    let rows = tally
        .categories
        .iter()
        .flat_map(|category| {
            category.candidates.iter().map(move |c| {
                vec![
                    Cell::Text(category.name.clone()),
                    Cell::Text(c.name.clone()),
                    Cell::Number(c.votes as f64),
                ]
            })
        })
        .collect();
    Table {
        name: "Voting Results",
        columns: &["Category", "Candidate", "Votes"],
        rows,
    }
}

fn codes_table(codes: &[VotingCode]) -> Table {
    let rows = codes
        .iter()
        .map(|c| vec![Cell::Text(c.code.clone()), Cell::Text(c.expires_at.format(EXPIRY_FORMAT).to_string())])
        .collect();
    Table {
        name: "Generated Codes",
        columns: &["Code", "Expiry Time"],
        rows,
    }
}

fn workbook(table: &Table) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();
    sheet.set_name(table.name)?;
    for (col, title) in (0u16..).zip(table.columns) {
        sheet.write_string_with_format(0, col, *title, &bold)?;
        sheet.set_column_width(col, 24)?;
    }
    for (row, cells) in (1u32..).zip(&table.rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Text(text) => sheet.write_string(row, col, text)?,
                Cell::Number(n) => sheet.write_number(row, col, *n)?,
            };
        }
    }
    Ok(workbook)
}

impl Exporter for XlsxExporter {
    const CONTENT_TYPE: &'static str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    const EXTENSION: &'static str = "xlsx";

    fn results(&self, tally: &Tally) -> Result<Vec<u8>, Error> {
        Ok(workbook(&results_table(tally))?.save_to_buffer()?)
    }

    fn codes(&self, codes: &[VotingCode]) -> Result<Vec<u8>, Error> {
        Ok(workbook(&codes_table(codes))?.save_to_buffer()?)
    }
}
