use std::io::{Cursor, Read};

use slidechat_core::models::slide::{Layout, Slide};
use slidechat_export::error::ExportError;
use slidechat_export::layout::plan_deck;
use slidechat_export::pdf::PdfRenderer;
use slidechat_export::pptx::PptxRenderer;
use slidechat_export::render::DeckRenderer;
use slidechat_export::styles::DeckStyles;

fn deck() -> Vec<Slide> {
    vec![
        Slide::new("Bees & <Hives>", vec!["A short tour".to_string()], Layout::Title),
        Slide::new("Anatomy", vec!["Head".to_string(), "Thorax".to_string()], Layout::TitleContent),
        Slide::new("Threats", vec![], Layout::SectionHeader),
    ]
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut body = String::new();
    part.read_to_string(&mut body).unwrap();
    body
}

#[test]
fn pptx_package_has_every_part() {
    let styles = DeckStyles::default();
    let bytes = PptxRenderer.render(&plan_deck(&deck(), &styles), &styles).unwrap();

    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    for expected in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/slide2.xml",
        "ppt/slides/slide3.xml",
        "ppt/slides/_rels/slide3.xml.rels",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    assert!(!names.contains(&"ppt/slides/slide4.xml"));
}

#[test]
fn pptx_text_with_control_characters_stays_well_formed() {
    let styles = DeckStyles::default();
    let slides = vec![Slide::new(
        "Bell\u{7}s",
        vec!["ring\u{1}ing".to_string()],
        Layout::TitleContent,
    )];
    let bytes = PptxRenderer.render(&plan_deck(&slides, &styles), &styles).unwrap();

    let xml = read_part(&bytes, "ppt/slides/slide1.xml");
    assert!(!xml.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
    assert!(xml.contains("<a:t>Bells</a:t>"));
    assert!(xml.contains("<a:t>ringing</a:t>"));
}

#[test]
fn pptx_slides_carry_escaped_text_and_background() {
    let styles = DeckStyles::default();
    let bytes = PptxRenderer.render(&plan_deck(&deck(), &styles), &styles).unwrap();

    let first = read_part(&bytes, "ppt/slides/slide1.xml");
    assert!(first.contains("<a:t>Bees &amp; &lt;Hives&gt;</a:t>"));
    assert!(first.contains("<a:t>A short tour</a:t>"));
    assert!(!first.contains("<p:bg>"));

    let second = read_part(&bytes, "ppt/slides/slide2.xml");
    assert!(second.contains("<a:buChar"));
    assert!(second.contains("<a:t>2 / 3</a:t>"));

    let third = read_part(&bytes, "ppt/slides/slide3.xml");
    assert!(third.contains(&format!(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/>"#, styles.accent_color)));

    let types = read_part(&bytes, "[Content_Types].xml");
    assert_eq!(types.matches("presentationml.slide+xml").count(), 3);
}

#[test]
fn pdf_renderer_produces_a_pdf() {
    let styles = DeckStyles::default();
    let bytes = PdfRenderer.render(&plan_deck(&deck(), &styles), &styles).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn renderers_reject_empty_decks() {
    let styles = DeckStyles::default();
    assert!(matches!(PptxRenderer.render(&[], &styles), Err(ExportError::EmptyDocument)));
    assert!(matches!(PdfRenderer.render(&[], &styles), Err(ExportError::EmptyDocument)));
}
