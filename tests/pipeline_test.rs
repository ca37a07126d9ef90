//! End-to-end tests for the format pipelines using mock readers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use unoffice::detect::FileFormat;
use unoffice::error::{Error, Result};
use unoffice::model::{
    Alignment, BBox, CellValue, FlowElement, FlowParagraph, LayoutBlock, NativeTable, PageLayout,
    RawImage, Sheet, Slide, SlideShape, TextLine,
};
use unoffice::render::EMPTY_DOCUMENT_PLACEHOLDER;
use unoffice::source::{
    DocumentReader, FlowSource, MemoryFlow, MemoryPaged, MemorySlides, MemoryWorkbook,
    OpenedDocument, PagedSource, ReaderRegistry, SlideSource, SourceDocument,
};
use unoffice::{OfficeParser, ParserOptions};

type Factory = Box<dyn Fn() -> SourceDocument + Send + Sync>;

/// Reader returning a fresh in-memory source for every file.
struct MockReader {
    format: FileFormat,
    extensions: Vec<&'static str>,
    make: Factory,
}

impl DocumentReader for MockReader {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn open(&self, _path: &Path) -> Result<OpenedDocument> {
        Ok(OpenedDocument::new(self.format, (self.make)()))
    }
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn options(&self) -> ParserOptions {
        ParserOptions::new()
            .with_image_dir(self.dir.path().join("images"))
            .with_image_base_url("http://test.local")
    }

    fn parser(&self, format: FileFormat, make: Factory) -> OfficeParser {
        self.parser_with(self.options(), format, make)
    }

    fn parser_with(&self, options: ParserOptions, format: FileFormat, make: Factory) -> OfficeParser {
        let mut registry = ReaderRegistry::new();
        registry.register(Arc::new(MockReader {
            format,
            extensions: vec![format.as_str()],
            make,
        }));
        OfficeParser::new(options).with_registry(registry)
    }

    fn input(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let bytes: &[u8] = if name.ends_with(".pdf") {
            b"%PDF-1.7\n"
        } else {
            b"PK\x03\x04\x14\x00"
        };
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

fn png(width: u32, height: u32) -> RawImage {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.resize(256, 7);
    RawImage::new(data).with_dimensions(width, height)
}

fn text_block(text: &str, x: f32, y: f32) -> LayoutBlock {
    let bbox = BBox::new(x, y, x + 40.0, y + 8.0);
    LayoutBlock::text(bbox, vec![TextLine::new(text, bbox)])
}

fn paged(pages: Vec<PageLayout>) -> Factory {
    Box::new(move || SourceDocument::Paged(Box::new(MemoryPaged::new(pages.clone()))))
}

#[test]
fn test_paged_detected_table() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    for (text, x, y) in [
        ("A", 0.0, 0.0),
        ("B", 50.0, 0.0),
        ("C", 0.0, 10.0),
        ("D", 50.0, 10.0),
        ("E", 0.0, 20.0),
    ] {
        page.add_block(text_block(text, x, y));
    }

    let result = fx
        .parser(FileFormat::Pdf, paged(vec![page]))
        .parse(fx.input("grid.pdf"));

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.file_type, "pdf");
    assert_eq!(
        result.markdown,
        "**Table 1** (page 1):\n\n| A | B |\n| --- | --- |\n| C | D |\n\nE"
    );
    assert_eq!(result.file_info["pages"], 1);
    assert_eq!(result.file_info["name"], "grid.pdf");
}

#[test]
fn test_paged_two_lines_stay_text() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    page.add_block(text_block("second", 0.0, 50.0));
    page.add_block(text_block("first", 0.0, 10.0));

    let result = fx
        .parser(FileFormat::Pdf, paged(vec![page]))
        .parse(fx.input("short.pdf"));

    assert_eq!(result.markdown, "first\n\nsecond");
}

#[test]
fn test_paged_native_table_and_image() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    page.add_block(text_block("Heading", 0.0, 0.0));
    page.add_block(text_block("Bolt", 10.0, 30.0));
    page.add_block(LayoutBlock::picture(BBox::new(0.0, 80.0, 100.0, 140.0)));
    page.add_block(text_block("After", 0.0, 150.0));
    page.tables.push(NativeTable::new(
        BBox::new(0.0, 20.0, 200.0, 60.0),
        vec![
            vec!["Name".into(), "Qty".into()],
            vec!["Bolt".into(), "4".into()],
        ],
    ));
    page.images.push(png(60, 60));

    let result = fx
        .parser(FileFormat::Pdf, paged(vec![page]))
        .parse(fx.input("native.pdf"));

    assert!(result.success);
    assert_eq!(result.images_count(), 1);
    let url = &result.images[0].url;
    assert!(url.starts_with("http://test.local/static/images/"));
    assert_eq!(
        result.markdown,
        format!(
            "Heading\n\n**Table 1** (page 1):\n\n| Name | Qty |\n| --- | --- |\n| Bolt | 4 |\n\n![Image]({})\n\nAfter",
            url
        )
    );
    assert!(fx
        .dir
        .path()
        .join("images")
        .join(&result.images[0].filename)
        .exists());
}

#[test]
fn test_paged_blank_native_table_keeps_text() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    page.add_block(text_block("Intro", 0.0, 0.0));
    page.add_block(text_block("Important figures", 0.0, 110.0));
    page.tables.push(NativeTable::new(
        BBox::new(0.0, 100.0, 500.0, 200.0),
        vec![vec!["".into(), "".into()], vec!["".into(), " ".into()]],
    ));

    let result = fx
        .parser(FileFormat::Pdf, paged(vec![page]))
        .parse(fx.input("blank.pdf"));

    assert_eq!(result.markdown, "Intro\n\nImportant figures");
}

#[test]
fn test_paged_blank_native_table_falls_back_to_detection() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    for (text, x, y) in [
        ("Name", 0.0, 0.0),
        ("Qty", 50.0, 0.0),
        ("Bolt", 0.0, 10.0),
        ("4", 50.0, 10.0),
    ] {
        page.add_block(text_block(text, x, y));
    }
    page.tables.push(NativeTable::new(
        BBox::new(0.0, 300.0, 100.0, 400.0),
        vec![vec!["".into()]],
    ));

    let result = fx
        .parser(FileFormat::Pdf, paged(vec![page]))
        .parse(fx.input("grid.pdf"));

    assert_eq!(
        result.markdown,
        "**Table 1** (page 1):\n\n| Name | Qty |\n| --- | --- |\n| Bolt | 4 |"
    );
}

#[test]
fn test_paged_caption_skips_blank_tables() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    page.tables.push(NativeTable::new(
        BBox::new(0.0, 0.0, 100.0, 40.0),
        vec![vec!["".into(), "".into()]],
    ));
    page.tables.push(NativeTable::new(
        BBox::new(0.0, 50.0, 100.0, 90.0),
        vec![
            vec!["Key".into(), "Value".into()],
            vec!["a".into(), "1".into()],
        ],
    ));

    let result = fx
        .parser(FileFormat::Pdf, paged(vec![page]))
        .parse(fx.input("tables.pdf"));

    assert_eq!(
        result.markdown,
        "**Table 1** (page 1):\n\n| Key | Value |\n| --- | --- |\n| a | 1 |"
    );
}

#[test]
fn test_paged_small_image_rejected() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    page.add_block(LayoutBlock::picture(BBox::new(0.0, 0.0, 10.0, 10.0)));
    page.add_block(text_block("Caption", 0.0, 20.0));
    page.images.push(png(20, 20));

    let result = fx
        .parser(FileFormat::Pdf, paged(vec![page]))
        .parse(fx.input("icon.pdf"));

    assert_eq!(result.images_count(), 0);
    assert_eq!(result.markdown, "Caption");
}

struct FlakyPages;

impl PagedSource for FlakyPages {
    fn page_count(&self) -> usize {
        3
    }

    fn load_page(&mut self, index: usize) -> Result<PageLayout> {
        if index == 1 {
            return Err(Error::unit("page 2", "broken content stream"));
        }
        let mut page = PageLayout::new(index + 1);
        page.add_block(text_block(&format!("Page {} body", index + 1), 0.0, 0.0));
        Ok(page)
    }
}

#[test]
fn test_paged_unit_failure_placeholder() {
    let fx = Fixture::new();
    let parser = fx.parser(
        FileFormat::Pdf,
        Box::new(|| SourceDocument::Paged(Box::new(FlakyPages))),
    );
    let result = parser.parse(fx.input("flaky.pdf"));

    assert!(result.success);
    assert_eq!(
        result.markdown,
        "Page 1 body\n\n*[Page 2 parsing failed]*\n\nPage 3 body"
    );
    assert_eq!(result.file_info["pages"], 3);
}

struct BrokenDocument;

impl PagedSource for BrokenDocument {
    fn page_count(&self) -> usize {
        1
    }

    fn load_page(&mut self, _index: usize) -> Result<PageLayout> {
        Err(Error::DocumentParse("xref table is corrupt".into()))
    }
}

#[test]
fn test_document_failure_shape() {
    let fx = Fixture::new();
    let parser = fx.parser(
        FileFormat::Pdf,
        Box::new(|| SourceDocument::Paged(Box::new(BrokenDocument))),
    );
    let input = fx.input("broken.pdf");

    assert!(matches!(parser.try_parse(&input), Err(Error::DocumentParse(_))));

    let result = parser.parse(&input);
    assert!(!result.success);
    assert!(result.markdown.is_empty());
    assert!(result.images.is_empty());
    assert_eq!(
        result.error.as_deref(),
        Some("Document parsing failed: xref table is corrupt")
    );
    assert_eq!(result.file_info["name"], "broken.pdf");
    assert_eq!(result.file_info["format"], "pdf");
}

fn report_body() -> (Vec<FlowElement>, Vec<Vec<Vec<String>>>) {
    let mut body = vec![FlowElement::Paragraph(FlowParagraph::new("ACME Corp"))];
    body.push(FlowElement::Paragraph(
        FlowParagraph::new("Annual Report").with_style("Title"),
    ));
    body.push(FlowElement::Paragraph(
        FlowParagraph::new("Overview").with_alignment(Alignment::Center),
    ));
    body.push(FlowElement::Paragraph(FlowParagraph::new("2. Second item")));
    body.push(FlowElement::Paragraph(FlowParagraph::new("• Bullet point")));
    body.push(FlowElement::Paragraph(FlowParagraph::new("ACME Corp")));
    body.push(FlowElement::Paragraph(FlowParagraph::new("3")));
    body.push(FlowElement::Table(0));
    body.push(FlowElement::Paragraph(FlowParagraph::new("ACME Corp")));
    body.push(FlowElement::Table(1));
    body.push(FlowElement::Paragraph(
        FlowParagraph::new("See figure").with_image("rId7"),
    ));
    body.push(FlowElement::Paragraph(FlowParagraph::new("ACME Corp")));
    body.push(FlowElement::Paragraph(FlowParagraph::new(
        "Copyright 2024 Example Inc.",
    )));

    let tables = vec![
        vec![
            vec!["Region".into(), "Sales".into()],
            vec!["North".into(), "".into()],
        ],
        vec![vec!["".into(), " ".into()]],
    ];
    (body, tables)
}

fn flow(images: Vec<RawImage>) -> Factory {
    let (body, tables) = report_body();
    Box::new(move || {
        SourceDocument::Flow(Box::new(
            MemoryFlow::new(body.clone(), tables.clone()).with_images(images.clone()),
        ))
    })
}

#[test]
fn test_flow_document() {
    let fx = Fixture::new();
    let parser = fx.parser(FileFormat::Docx, flow(vec![png(10, 10).with_rel_id("rId7")]));
    let result = parser.parse(fx.input("report.docx"));

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.file_type, "docx");
    assert_eq!(result.images_count(), 1);
    let expected = format!(
        "# Annual Report\n\n\
         ## Overview\n\n\
         1. Second item\n\n\
         - Bullet point\n\n\
         **Table 1:**\n\n\
         | Region | Sales |\n\
         | --- | --- |\n\
         | North | - |\n\n\
         **Table 2:**\n\n\
         *[Empty table]*\n\n\
         See figure\n\n\
         ![Image]({})",
        result.images[0].url
    );
    assert_eq!(result.markdown, expected);
    assert_eq!(result.file_info["paragraphs"], 11);
    assert_eq!(result.file_info["tables"], 2);
}

#[test]
fn test_flow_without_filter_keeps_noise() {
    let fx = Fixture::new();
    let options = fx.options().with_header_footer_filter(false);
    let parser = fx.parser_with(options, FileFormat::Docx, flow(Vec::new()));
    let result = parser.parse(fx.input("report.docx"));

    assert!(result.markdown.starts_with("ACME Corp\n\n# Annual Report"));
    assert!(result.markdown.contains("\n\n3\n\n"));
    assert!(result.markdown.ends_with("Copyright 2024 Example Inc."));
    // Image reference without a stored image is skipped
    assert!(!result.markdown.contains("![Image]"));
}

struct BadTables;

impl FlowSource for BadTables {
    fn body(&mut self) -> Result<Vec<FlowElement>> {
        Ok(vec![
            FlowElement::Paragraph(FlowParagraph::new("Before")),
            FlowElement::Table(0),
            FlowElement::Paragraph(FlowParagraph::new("")),
            FlowElement::Paragraph(FlowParagraph::new("After")),
        ])
    }

    fn table(&mut self, _index: usize) -> Result<Vec<Vec<String>>> {
        Err(Error::unit("table 1", "merged cells out of range"))
    }

    fn images(&mut self) -> Result<Vec<RawImage>> {
        Err(Error::Image("media part missing".into()))
    }
}

#[test]
fn test_flow_table_failure_placeholder() {
    let fx = Fixture::new();
    let parser = fx.parser(
        FileFormat::Docx,
        Box::new(|| SourceDocument::Flow(Box::new(BadTables))),
    );
    let result = parser.parse(fx.input("bad.docx"));

    assert!(result.success);
    assert_eq!(
        result.markdown,
        "Before\n\n*[Table 1 parsing failed]*\n\nAfter"
    );
}

#[test]
fn test_workbook() {
    let fx = Fixture::new();
    let sheets = vec![
        Sheet::new("Data")
            .with_row(vec!["Date".into(), "Amount".into()])
            .with_row(vec![CellValue::Empty, CellValue::Empty])
            .with_row(vec![
                CellValue::formatted(45292.0, "yyyy-mm-dd"),
                CellValue::number(12.5),
            ]),
        Sheet::new("Blank"),
    ];
    let images = vec![png(10, 10).with_sheet("Data"), png(10, 10)];
    let parser = fx.parser(
        FileFormat::Xlsx,
        Box::new(move || {
            SourceDocument::Workbook(Box::new(
                MemoryWorkbook::new(sheets.clone()).with_images(images.clone()),
            ))
        }),
    );
    let result = parser.parse(fx.input("book.xlsx"));

    assert!(result.success);
    assert_eq!(result.images_count(), 2);
    let anchored = &result.images[0];
    assert_eq!(
        result.markdown,
        format!(
            "| Date | Amount |\n| --- | --- |\n| 2024-01-01 | 12.5 |\n\n![{}]({})",
            anchored.filename, anchored.url
        )
    );
    assert_eq!(result.file_info["sheets"], 2);
}

#[test]
fn test_workbook_single_row_gets_labels() {
    let fx = Fixture::new();
    let sheets = vec![Sheet::new("S").with_row(vec!["a".into(), CellValue::Empty, "c".into()])];
    let parser = fx.parser(
        FileFormat::Xlsx,
        Box::new(move || SourceDocument::Workbook(Box::new(MemoryWorkbook::new(sheets.clone())))),
    );
    let result = parser.parse(fx.input("one.xlsx"));

    assert_eq!(
        result.markdown,
        "| Column1 | Column2 | Column3 |\n| --- | --- | --- |\n| a |  | c |"
    );
}

struct Deck;

impl SlideSource for Deck {
    fn slide_count(&self) -> usize {
        3
    }

    fn load_slide(&mut self, index: usize) -> Result<unoffice::model::Slide> {
        match index {
            0 => Ok(Slide::new(vec![
                SlideShape::Text("  Welcome  ".into()),
                SlideShape::Picture(png(10, 10)),
                SlideShape::BrokenPicture("linked image".into()),
            ])),
            1 => Err(Error::unit("slide 2", "bad xml")),
            _ => Ok(Slide::default()),
        }
    }
}

#[test]
fn test_slides() {
    let fx = Fixture::new();
    let parser = fx.parser(
        FileFormat::Pptx,
        Box::new(|| SourceDocument::Slides(Box::new(Deck))),
    );
    let result = parser.parse(fx.input("deck.pptx"));

    assert!(result.success);
    assert_eq!(result.images_count(), 1);
    assert_eq!(
        result.markdown,
        format!(
            "Welcome\n![Image]({})\n\n*[Slide 2 parsing failed]*\n\n*Slide has no text content*",
            result.images[0].url
        )
    );
    assert_eq!(result.file_info["slides"], 3);
}

#[test]
fn test_empty_document_placeholder() {
    let fx = Fixture::new();
    let parser = fx.parser(
        FileFormat::Pptx,
        Box::new(|| SourceDocument::Slides(Box::new(MemorySlides::new(Vec::new())))),
    );
    let result = parser.parse(fx.input("empty.pptx"));

    assert!(result.success);
    assert_eq!(result.markdown, EMPTY_DOCUMENT_PLACEHOLDER);
    assert_eq!(result.file_info["slides"], 0);
}

#[test]
fn test_parser_is_reusable() {
    let fx = Fixture::new();
    let mut page = PageLayout::new(1);
    page.add_block(text_block("only", 0.0, 0.0));
    let parser = fx.parser(FileFormat::Pdf, paged(vec![page]));

    let first = parser.parse(fx.input("a.pdf"));
    let second = parser.parse(fx.input("b.pdf"));
    assert_eq!(first.markdown, second.markdown);
    assert_eq!(second.file_info["name"], "b.pdf");
}

#[test]
fn test_legacy_conversion_failure() {
    let fx = Fixture::new();
    let options = fx
        .options()
        .with_libreoffice_path(fx.dir.path().join("missing-soffice"))
        .with_conversion_timeout(std::time::Duration::from_secs(5));
    let parser = fx.parser_with(options, FileFormat::Docx, flow(Vec::new()));
    let path = fx.dir.path().join("old.doc");
    std::fs::write(&path, [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]).unwrap();

    let result = parser.parse(&path);
    assert!(!result.success);
    assert_eq!(result.file_type, "doc");
    assert!(result.error.unwrap().starts_with("DOC conversion failed"));
}
