//! Excel table extraction from an `.xlsx` package.
//!
//! Walks workbook -> sheet -> table parts through the relationship files,
//! bounds rows and columns by the table's `ref` range and dereferences shared
//! and inline strings.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::PathBuf;

use super::cell_ref::{column_of, parse_cell, CellRange};
use super::xml::{elements, first, text_runs, unescape};
use super::{Row, TableSource, WorkbookError};

/// A named table on a named sheet of an `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct XlsxTable {
    pub path: PathBuf,
    pub sheet: String,
    pub table: String,
}

impl XlsxTable {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
            table: table.into(),
        }
    }
}

impl TableSource for XlsxTable {
    fn rows(&self) -> Result<Vec<Row>, WorkbookError> {
        let file = File::open(&self.path).map_err(|source| WorkbookError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut package = Package::open(file)?;
        let rows = read_table(&mut package, &self.sheet, &self.table)?;
        tracing::debug!(
            path = %self.path.display(),
            sheet = %self.sheet,
            table = %self.table,
            rows = rows.len(),
            "extracted workbook table"
        );
        Ok(rows)
    }
}

struct Package<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    fn open(reader: R) -> Result<Self, WorkbookError> {
        Ok(Self {
            archive: zip::ZipArchive::new(reader)?,
        })
    }

    fn read(&mut self, name: &str) -> Result<String, WorkbookError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(e) => e,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(WorkbookError::MissingPart(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut s = String::new();
        entry
            .read_to_string(&mut s)
            .map_err(|source| WorkbookError::Io {
                path: PathBuf::from(name),
                source,
            })?;
        Ok(s)
    }

    fn read_optional(&mut self, name: &str) -> Result<Option<String>, WorkbookError> {
        match self.read(name) {
            Ok(s) => Ok(Some(s)),
            Err(WorkbookError::MissingPart(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Relationships of `part` as (id, type, resolved target part name).
    fn relationships(&mut self, part: &str) -> Result<Vec<Relationship>, WorkbookError> {
        let rels_name = rels_path(part);
        let xml = match self.read_optional(&rels_name)? {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };
        let base = parent_dir(part);
        Ok(elements(&xml, "Relationship")?
            .iter()
            .filter_map(|rel| {
                Some(Relationship {
                    id: rel.attr("Id")?,
                    kind: rel.attr("Type").unwrap_or_default(),
                    target: resolve_part(base, &rel.attr("Target")?),
                })
            })
            .collect())
    }
}

#[derive(Debug)]
struct Relationship {
    id: String,
    kind: String,
    target: String,
}

const WORKBOOK_PART: &str = "xl/workbook.xml";

fn read_table<R: Read + Seek>(
    package: &mut Package<R>,
    sheet_name: &str,
    table_name: &str,
) -> Result<Vec<Row>, WorkbookError> {
    let workbook_xml = package.read(WORKBOOK_PART)?;
    let sheet_rid = elements(&workbook_xml, "sheet")?
        .iter()
        .find(|s| s.attr("name").as_deref() == Some(sheet_name))
        .and_then(|s| s.attr("r:id"))
        .ok_or_else(|| WorkbookError::SheetNotFound(sheet_name.to_string()))?;

    let workbook_rels = package.relationships(WORKBOOK_PART)?;
    let sheet_part = workbook_rels
        .iter()
        .find(|r| r.id == sheet_rid)
        .map(|r| r.target.clone())
        .ok_or_else(|| WorkbookError::MissingPart(format!("{} ({})", sheet_name, sheet_rid)))?;
    let shared_part = workbook_rels
        .iter()
        .find(|r| r.kind.ends_with("/sharedStrings"))
        .map(|r| r.target.clone())
        .unwrap_or_else(|| "xl/sharedStrings.xml".to_string());

    let mut table_xml = None;
    for rel in package.relationships(&sheet_part)? {
        if !rel.kind.ends_with("/table") {
            continue;
        }
        let xml = package.read(&rel.target)?;
        let matches = first(&xml, "table")?.map_or(false, |t| {
            t.attr("displayName").as_deref() == Some(table_name)
                || t.attr("name").as_deref() == Some(table_name)
        });
        if matches {
            table_xml = Some(xml);
            break;
        }
    }
    let table_xml = table_xml.ok_or_else(|| WorkbookError::TableNotFound {
        sheet: sheet_name.to_string(),
        table: table_name.to_string(),
    })?;

    let shared = match package.read_optional(&shared_part)? {
        Some(xml) => shared_strings(&xml)?,
        None => Vec::new(),
    };
    let sheet_xml = package.read(&sheet_part)?;
    table_rows(&table_xml, &sheet_xml, &shared)
}

fn shared_strings(xml: &str) -> Result<Vec<String>, WorkbookError> {
    elements(xml, "si")?
        .iter()
        .map(|si| text_runs(si.inner()))
        .collect()
}

/// Rows of the table described by `table_xml`, read from `sheet_xml`.
fn table_rows(table_xml: &str, sheet_xml: &str, shared: &[String]) -> Result<Vec<Row>, WorkbookError> {
    let table = first(table_xml, "table")?
        .ok_or_else(|| WorkbookError::Xml("table part has no <table> element".to_string()))?;
    let reference = table
        .attr("ref")
        .ok_or_else(|| WorkbookError::Xml("table has no ref".to_string()))?;
    let range = CellRange::parse(&reference)?;
    let header_rows = attr_u32(&table.attr("headerRowCount"), 1);
    let totals_rows = attr_u32(&table.attr("totalsRowCount"), 0);
    let first_data = range.start_row + header_rows;
    let last_data = range.end_row.saturating_sub(totals_rows);

    let columns: Vec<String> = elements(table_xml, "tableColumn")?
        .iter()
        .map(|c| c.attr("name").unwrap_or_default())
        .collect();
    if columns.len() != range.width() {
        return Err(WorkbookError::Xml(format!(
            "table declares {} columns but range {} spans {}",
            columns.len(),
            reference,
            range.width()
        )));
    }

    let mut rows = Vec::new();
    let mut prev_row = 0u32;
    for row in elements(sheet_xml, "row")? {
        let row_index = row
            .attr("r")
            .and_then(|r| r.parse::<u32>().ok())
            .unwrap_or(prev_row + 1);
        prev_row = row_index;
        if row_index < first_data || row_index > last_data {
            continue;
        }

        let mut values = vec![String::new(); columns.len()];
        let mut prev_col = 0u32;
        for cell in elements(row.inner(), "c")? {
            let col = match cell.attr("r") {
                Some(r) => match parse_cell(&r) {
                    Ok((c, _)) => c,
                    Err(_) => column_of(&r).ok_or(WorkbookError::InvalidReference(r))?,
                },
                None => prev_col + 1,
            };
            prev_col = col;
            if !range.contains_col(col) {
                continue;
            }
            values[(col - range.start_col) as usize] = cell_value(&cell, shared)?;
        }

        if values.iter().all(String::is_empty) {
            tracing::debug!(row = row_index, "skipping empty table row");
            continue;
        }
        rows.push(Row::new(columns.iter().cloned().zip(values).collect()));
    }
    Ok(rows)
}

fn cell_value(cell: &super::xml::Element<'_>, shared: &[String]) -> Result<String, WorkbookError> {
    let kind = cell.attr("t").unwrap_or_default();
    if kind == "inlineStr" {
        return text_runs(cell.inner());
    }
    let raw = match first(cell.inner(), "v")? {
        Some(v) => unescape(v.inner()),
        None => return Ok(String::new()),
    };
    if kind == "s" {
        let idx = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| WorkbookError::Xml(format!("bad shared string index {:?}", raw)))?;
        return shared
            .get(idx)
            .cloned()
            .ok_or(WorkbookError::SharedString(idx));
    }
    Ok(raw)
}

fn attr_u32(value: &Option<String>, default: u32) -> u32 {
    value
        .as_deref()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

/// `xl/worksheets/sheet1.xml` -> `xl/worksheets/_rels/sheet1.xml.rels`.
fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

fn parent_dir(part: &str) -> &str {
    part.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_part(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for seg in target.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
