//! Minimal `.xlsx` workbooks written on the fly for loader tests.

use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

/// Style 0 is general, style 1 is the built-in `m/d/yyyy` date format.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#;

/// One worksheet cell.
pub enum XlsxCell<'a> {
    Text(&'a str),
    Number(f64),
    /// Excel serial day number rendered with the date style.
    Date(f64),
    Blank,
}

fn column_letter(col: usize) -> char {
    char::from(b'A' + u8::try_from(col).unwrap())
}

fn sheet_xml(rows: &[Vec<XlsxCell<'_>>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let pos = format!("{}{}", column_letter(c), r + 1);
            match cell {
                XlsxCell::Text(s) => xml.push_str(&format!(
                    r#"<c r="{pos}" t="inlineStr"><is><t>{s}</t></is></c>"#
                )),
                XlsxCell::Number(n) => xml.push_str(&format!(r#"<c r="{pos}"><v>{n}</v></c>"#)),
                XlsxCell::Date(n) => {
                    xml.push_str(&format!(r#"<c r="{pos}" s="1"><v>{n}</v></c>"#));
                }
                XlsxCell::Blank => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Writes a workbook to the temp directory and returns its path.
///
/// With `rows` of `None` the workbook declares no worksheets at all.
pub fn write_xlsx(name: &str, rows: Option<&[Vec<XlsxCell<'_>>]>) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "crime_dash_xlsx_{}_{name}.xlsx",
        std::process::id()
    ));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());

    let sheets = if rows.is_some() {
        r#"<sheet name="Sheet1" sheetId="1" r:id="rId1"/>"#
    } else {
        ""
    };
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets}</sheets></workbook>"#
    );

    let mut parts = vec![
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/workbook.xml", workbook),
        ("xl/styles.xml", STYLES.to_string()),
    ];
    if let Some(rows) = rows {
        parts.push(("xl/worksheets/sheet1.xml", sheet_xml(rows)));
    }

    for (part, contents) in parts {
        zip.start_file(part, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();

    path
}
