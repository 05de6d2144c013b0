//! End-to-end tests: load the sample book from disk and export every format.

use std::fs;

use quire::export::{ChapterExporter, Exporter, HtmlExporter, TextExporter};
use quire::{Document, HtmlConfig, IdentifierMap, Section, TextConfig};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{}/{}", FIXTURES_DIR, name)
}

fn sample() -> Document {
    Document::open(fixture_path("sample.xml")).expect("Failed to open sample")
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_open_reads_metadata() {
    let doc = sample();
    assert_eq!(doc.title(), "The Lantern Keeper");
    assert_eq!(doc.author().as_deref(), Some("Margaret Holloway"));
    assert_eq!(doc.language(), "en");
    assert!(doc.section(Section::Front).is_some());
    assert!(doc.section(Section::Back).is_some());
}

#[test]
fn test_open_missing_file_is_io_error() {
    let err = Document::open(fixture_path("does-not-exist.xml")).unwrap_err();
    assert!(matches!(err, quire::Error::Io(_)));
}

#[test]
fn test_declared_encoding_is_honored() {
    let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<TEI><text><body><p>caf".to_vec();
    bytes.push(0xe9);
    bytes.extend_from_slice(b"</p></body></text></TEI>");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.xml");
    fs::write(&path, &bytes).unwrap();

    let doc = Document::open(&path).unwrap();
    let text = TextExporter::new().render(&doc).unwrap();
    assert!(text.contains("caf\u{e9}"));
}

#[test]
fn test_malformed_source_rejected() {
    assert!(matches!(
        Document::parse("<TEI><text><body></text></TEI>"),
        Err(quire::Error::Malformed(_))
    ));
}

// ============================================================================
// Identifier map
// ============================================================================

#[test]
fn test_sample_divisions() {
    let map = IdentifierMap::build(&sample()).unwrap();
    let files: Vec<_> = map.divisions().iter().map(|d| d.file.as_str()).collect();
    assert_eq!(
        files,
        ["front-0001.xhtml", "chapter-0001.xhtml", "chapter-0002.xhtml", "back-0001.xhtml"]
    );
    assert_eq!(map.get("n1"), Some("chapter-0001.xhtml"));
    assert_eq!(map.get("glossary"), Some("back-0001.xhtml"));
    assert_eq!(map.get("missing"), None);
}

// ============================================================================
// HTML
// ============================================================================

#[test]
fn test_html_export_writes_document() {
    let mut out = Vec::new();
    HtmlExporter::new().export(&sample(), &mut out).unwrap();
    let html = String::from_utf8(out).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
    assert!(html.contains("<meta name=\"author\" content=\"Margaret Holloway\">"));
    assert!(html.contains("<p class=\"byline\">Margaret Holloway</p>"));
    assert!(html.contains("<div class=\"milestone stars\"></div>"));
    assert!(html.contains("<span class=\"pagebreak\" title=\"12\"></span>"));
    assert!(html.ends_with("</body>\n</html>\n"));
}

#[test]
fn test_strict_html_self_closes() {
    let exporter = HtmlExporter::with_config(HtmlConfig {
        strict: true,
        ..HtmlConfig::default()
    });
    let html = exporter.render(&sample()).unwrap();

    assert!(html.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(html.contains("<img src=\"images/lighthouse.png\" alt=\"A tall white tower on a rocky point.\"/>"));
    assert!(html.contains("<div class=\"milestone stars\"/>"));
    assert!(!html.contains("<br>"));
}

// ============================================================================
// Plain text
// ============================================================================

#[test]
fn test_text_export_fits_width() {
    for width in [60, 66, 72] {
        let exporter = TextExporter::with_config(TextConfig {
            line_width: width,
            ..TextConfig::default()
        });
        let text = exporter.render(&sample()).unwrap();
        for line in text.lines() {
            // Single words longer than the width are allowed to overflow.
            if line.split_whitespace().count() > 1 {
                assert!(
                    line.chars().count() <= width,
                    "line exceeds {width} columns: {line:?}"
                );
            }
        }
    }
}

#[test]
fn test_text_export_layout() {
    let text = TextExporter::new().render(&sample()).unwrap();
    let first = text.lines().next().unwrap();
    assert_eq!(first.trim(), "The Lantern Keeper");
    assert!(text.contains("by Margaret Holloway"));
    assert!(text.contains("\nPREFACE\n"));
    assert!(text.contains("\nGLOSSARY\n"));
    assert!(!text.contains("\n\n\n\n\n"));
    assert!(text.ends_with("What burns.\n"));
}

// ============================================================================
// Packaged chapters
// ============================================================================

#[test]
fn test_chapter_export_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("lantern");
    let written = ChapterExporter::new().export_dir(&sample(), &out).unwrap();

    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "front-0001.xhtml",
            "chapter-0001.xhtml",
            "chapter-0002.xhtml",
            "back-0001.xhtml",
            "stylesheet.css",
        ]
    );

    let ch1 = fs::read_to_string(out.join("chapter-0001.xhtml")).unwrap();
    assert!(ch1.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(ch1.contains("xmlns:epub=\"http://www.idpf.org/2007/ops\""));
    assert!(ch1.contains("<title>The Light on the Point</title>"));
    assert!(ch1.contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"stylesheet.css\"/>"));
    assert!(ch1.contains("<h2>The Light on the Point</h2>"));
    assert!(ch1.contains("So it was in my father\u{2019}s time."));
    assert!(!ch1.contains("milestone"));
    assert!(!ch1.contains("pagebreak"));

    let ch2 = fs::read_to_string(out.join("chapter-0002.xhtml")).unwrap();
    assert!(ch2.contains("<img src=\"images/lighthouse.png\" alt=\"A tall white tower on a rocky point.\"/>"));
    assert!(ch2.contains("href=\"https://example.org/lights?coast=north&amp;year=1911\""));

    let css = fs::read_to_string(out.join("stylesheet.css")).unwrap();
    assert!(css.contains("blockquote"));
}
