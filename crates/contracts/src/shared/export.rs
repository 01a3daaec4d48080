//! Encoding of table rows as CSV or XLSX bytes.
//!
//! The browser side only has to wrap the bytes in a Blob and trigger the
//! download; everything here is testable natively.

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Types that can be written as one export row.
pub trait Exportable {
    /// Column titles, in row order.
    fn headers() -> Vec<&'static str>;

    fn to_row(&self) -> Vec<String>;
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("XLSX encoding failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8;",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn encode<T: Exportable>(&self, sheet_name: &str, rows: &[T]) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Csv => to_csv(rows),
            ExportFormat::Xlsx => to_xlsx(sheet_name, rows),
        }
    }
}

/// `bookings_export_2024-03-05.csv`
pub fn export_file_name(prefix: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{}_export_{}.{}",
        prefix,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// CSV with a UTF-8 BOM so spreadsheet apps detect the encoding.
pub fn to_csv<T: Exportable>(rows: &[T]) -> Result<Vec<u8>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut buffer = Vec::from("\u{FEFF}".as_bytes());
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .from_writer(&mut buffer);
        writer.write_record(T::headers())?;
        for row in rows {
            writer.write_record(row.to_row())?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// Style 1 is the bold header font
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs></styleSheet>"#;

/// Single-sheet workbook with inline strings and a bold header row.
pub fn to_xlsx<T: Exportable>(sheet_name: &str, rows: &[T]) -> Result<Vec<u8>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape_xml(&sheet_title(sheet_name))
    );

    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    let headers: Vec<String> = T::headers().into_iter().map(String::from).collect();
    push_row(&mut sheet, 1, &headers, true);
    for (i, row) in rows.iter().enumerate() {
        push_row(&mut sheet, i + 2, &row.to_row(), false);
    }
    sheet.push_str("</sheetData></worksheet>");

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let parts: [(&str, &str); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/styles.xml", STYLES),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn push_row(sheet: &mut String, row_number: usize, cells: &[String], bold: bool) {
    sheet.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (col, value) in cells.iter().enumerate() {
        let style = if bold { r#" s="1""# } else { "" };
        sheet.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"{}><is><t xml:space="preserve">{}</t></is></c>"#,
            column_letter(col),
            row_number,
            style,
            escape_xml(value)
        ));
    }
    sheet.push_str("</row>");
}

/// Zero-based column index to spreadsheet letters: 0 -> A, 26 -> AA.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

// Sheet names are limited to 31 chars and may not contain []:*?/\
fn sheet_title(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    struct Row {
        name: &'static str,
        note: &'static str,
    }

    impl Exportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Name", "Note"]
        }

        fn to_row(&self) -> Vec<String> {
            vec![self.name.to_string(), self.note.to_string()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Nguyễn Văn A", note: "late, arrival" },
            Row { name: "B", note: "says \"hi\"" },
        ]
    }

    #[test]
    fn test_csv_has_bom_and_quoting() {
        let bytes = to_csv(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{FEFF}'));
        let body = text.trim_start_matches('\u{FEFF}');
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "Name,Note");
        assert_eq!(lines[1], "Nguyễn Văn A,\"late, arrival\"");
        assert_eq!(lines[2], "B,\"says \"\"hi\"\"\"");
    }

    #[test]
    fn test_empty_export_is_error() {
        let empty: Vec<Row> = Vec::new();
        assert!(matches!(to_csv(&empty), Err(ExportError::Empty)));
        assert!(matches!(to_xlsx("x", &empty), Err(ExportError::Empty)));
    }

    #[test]
    fn test_xlsx_archive_contents() {
        let bytes = to_xlsx("Bookings", &rows()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("xl/workbook.xml").is_ok());

        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();
        assert!(sheet.contains(r#"<c r="A1" t="inlineStr" s="1">"#));
        assert!(sheet.contains("Nguyễn Văn A"));
        assert!(sheet.contains("says &quot;hi&quot;"));
        assert!(sheet.contains(r#"<row r="3">"#));
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            export_file_name("bookings", date, ExportFormat::Xlsx),
            "bookings_export_2024-03-05.xlsx"
        );
    }

    #[test]
    fn test_sheet_title_sanitized() {
        assert_eq!(sheet_title("a/b"), "ab");
        assert_eq!(sheet_title(""), "Sheet1");
    }
}
