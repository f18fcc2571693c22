//! Writes a one-sheet xlsx package whose table uses inline strings.

use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Sheet `sheet` with table `table` spanning `header` plus `rows`, starting at A1.
pub fn write_table(path: &Path, sheet: &str, table: &str, header: &[&str], rows: &[&[&str]]) {
    let last_col = (b'A' + header.len() as u8 - 1) as char;
    let table_ref = format!("A1:{}{}", last_col, rows.len() + 1);

    let mut sheet_rows = String::new();
    for (r, cells) in std::iter::once(header).chain(rows.iter().copied()).enumerate() {
        sheet_rows.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in cells.iter().enumerate() {
            sheet_rows.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                (b'A' + c as u8) as char,
                r + 1,
                value
            ));
        }
        sheet_rows.push_str("</row>");
    }
    let columns: String = header
        .iter()
        .enumerate()
        .map(|(i, c)| format!(r#"<tableColumn id="{}" name="{}"/>"#, i + 1, c))
        .collect();

    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#.to_string(),
        ),
        (
            "xl/workbook.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
                sheet
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData>{}</sheetData><tableParts count="1"><tablePart r:id="rId1"/></tableParts></worksheet>"#,
                sheet_rows
            ),
        ),
        (
            "xl/worksheets/_rels/sheet1.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/table" Target="../tables/table1.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/tables/table1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><table xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" id="1" name="{t}" displayName="{t}" ref="{r}"><tableColumns count="{n}">{c}</tableColumns></table>"#,
                t = table,
                r = table_ref,
                n = header.len(),
                c = columns
            ),
        ),
    ];

    let file = std::fs::File::create(path).expect("create xlsx");
    let mut zip = zip::ZipWriter::new(file);
    for (name, body) in parts {
        zip.start_file(name, SimpleFileOptions::default()).expect("start entry");
        zip.write_all(body.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish xlsx");
}
