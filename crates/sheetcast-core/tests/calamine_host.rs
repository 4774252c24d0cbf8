use sheetcast_core::{
    CalamineLauncher, ExtractError, ExtractionRequest, Extractor, MemoryImageBuffer, SheetKind,
};
use sheetcast_engine::table::read_table;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::FileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet3.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Overview" sheetId="1" r:id="rId1"/>
<sheet name="Chart" sheetId="2" r:id="rId2"/>
<sheet name="Dates" sheetId="3" r:id="rId3"/>
</sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet3.xml"/>
<Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const OVERVIEW: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>Name</t></is></c><c r="B1" t="inlineStr"><is><t>Qty</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>Widget</t></is></c><c r="B2"><v>5</v></c></row>
</sheetData>
</worksheet>"#;

const CHART: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="2"><c r="B2" t="inlineStr"><is><t>Q1</t></is></c><c r="C2"><v>10.5</v></c></row>
</sheetData>
</worksheet>"#;

// Style 1 is the built-in short date format.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cellXfs count="2">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
</styleSheet>"#;

const DATES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>When</t></is></c><c r="B1" s="1"><v>45306</v></c></row>
</sheetData>
</worksheet>"#;

/// Write a three-sheet workbook to `path`.
fn write_workbook(path: &Path) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", OVERVIEW),
        ("xl/worksheets/sheet2.xml", CHART),
        ("xl/worksheets/sheet3.xml", DATES),
        ("xl/styles.xml", STYLES),
    ];
    for (name, body) in parts {
        zip.start_file(name, FileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn test_lists_sheets_in_workbook_order() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("report.xlsx");
    write_workbook(&document);

    let extractor = Extractor::new(CalamineLauncher);
    assert_eq!(
        extractor.list_sheets(&document).unwrap(),
        vec!["Overview", "Chart", "Dates"]
    );
}

#[test]
fn test_extracts_table_and_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("report.xlsx");
    let output = dir.path().join("out");
    write_workbook(&document);

    let extractor = Extractor::new(CalamineLauncher);
    let request = ExtractionRequest::new()
        .with("Overview", "table")
        .with("Chart", "ui");
    let report = extractor
        .extract(MemoryImageBuffer::new(), &document, &output, &request)
        .unwrap();

    let table = report.get("Overview").unwrap().output_path().unwrap();
    assert_eq!(table, output.join("report_Overview.csv"));
    assert_eq!(
        read_table(table).unwrap(),
        vec![vec!["Name", "Qty"], vec!["Widget", "5"]]
    );

    let chart = report.get("Chart").unwrap();
    assert!(matches!(
        chart,
        sheetcast_core::ExtractionOutcome::Success {
            kind: SheetKind::Ui,
            ..
        }
    ));
    let png = image::open(chart.output_path().unwrap()).unwrap();
    assert!(png.width() > 0 && png.height() > 0);
}

#[test]
fn test_date_cells_are_written_as_dates() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("report.xlsx");
    let output = dir.path().join("out");
    write_workbook(&document);

    let report = Extractor::new(CalamineLauncher)
        .extract(
            MemoryImageBuffer::new(),
            &document,
            &output,
            &ExtractionRequest::new().with("Dates", "table"),
        )
        .unwrap();

    let table = report.get("Dates").unwrap().output_path().unwrap();
    assert_eq!(
        read_table(table).unwrap(),
        vec![vec!["When", "2024-01-15 00:00:00"]]
    );
}

#[test]
fn test_corrupt_document_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("broken.xlsx");
    std::fs::write(&document, b"not a zip archive").unwrap();

    let err = Extractor::new(CalamineLauncher)
        .extract(
            MemoryImageBuffer::new(),
            &document,
            &dir.path().join("out"),
            &ExtractionRequest::new().with("Overview", "table"),
        )
        .unwrap_err();
    assert!(matches!(err, ExtractError::Open(_)));
}
