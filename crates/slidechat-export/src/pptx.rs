//! PPTX (PresentationML) writer.
//!
//! Produces the smallest package PowerPoint and LibreOffice open without
//! repair: one master, one blank layout, one theme, and one slide part per
//! slide. Every text box is a plain `p:sp` with absolute geometry; no
//! placeholders are used, so the layout part carries no shapes.

use std::io::{Cursor, Write};

use tracing::debug;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::layout::{Align, SlidePlan, TextBox};
use crate::render::DeckRenderer;
use crate::styles::DeckStyles;

const EMU_PER_INCH: f64 = 914_400.0;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

#[derive(Debug, Default, Clone, Copy)]
pub struct PptxRenderer;

impl DeckRenderer for PptxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pptx
    }

    fn render(&self, slides: &[SlidePlan], styles: &DeckStyles) -> Result<Vec<u8>, ExportError> {
        if slides.is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let mut put = |path: &str, body: String| -> Result<(), ExportError> {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(path, options)?;
            zip.write_all(body.as_bytes())?;
            Ok(())
        };

        put("[Content_Types].xml", content_types_xml(slides.len()))?;
        put("_rels/.rels", root_rels_xml())?;
        put("ppt/presentation.xml", presentation_xml(slides.len(), styles))?;
        put(
            "ppt/_rels/presentation.xml.rels",
            presentation_rels_xml(slides.len()),
        )?;
        put("ppt/slideMasters/slideMaster1.xml", slide_master_xml())?;
        put(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            slide_master_rels_xml(),
        )?;
        put("ppt/slideLayouts/slideLayout1.xml", slide_layout_xml())?;
        put(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            slide_layout_rels_xml(),
        )?;
        put("ppt/theme/theme1.xml", theme_xml(styles))?;

        for plan in slides {
            let n = plan.number;
            put(&format!("ppt/slides/slide{n}.xml"), slide_xml(plan))?;
            put(
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                slide_rels_xml(),
            )?;
        }

        let bytes = zip.finish()?.into_inner();
        debug!(slides = slides.len(), bytes = bytes.len(), "pptx package written");
        Ok(bytes)
    }
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Escape markup and drop characters XML 1.0 does not allow at all.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < ' ' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

// ── Package parts ────────────────────────────────────────────────────────────

fn content_types_xml(slide_count: usize) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PKG_RELS}"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
    )
}

/// Relationship ids: `rId1` master, `rId2` theme, `rId3..` slides.
fn presentation_xml(slide_count: usize, styles: &DeckStyles) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1">"#
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    xml.push_str("<p:sldIdLst>");
    for i in 0..slide_count {
        xml.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            3 + i
        ));
    }
    xml.push_str("</p:sldIdLst>");
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/>"#,
        emu(styles.page_width_in),
        emu(styles.page_height_in)
    ));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut xml = format!(r#"{XML_DECL}<Relationships xmlns="{NS_PKG_RELS}">"#);
    xml.push_str(&format!(
        r#"<Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#
    ));
    xml.push_str(&format!(
        r#"<Relationship Id="rId2" Type="{REL_BASE}/theme" Target="theme/theme1.xml"/>"#
    ));
    for i in 0..slide_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{REL_BASE}/slide" Target="slides/slide{}.xml"/>"#,
            3 + i,
            1 + i
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

const EMPTY_SP_TREE: &str = r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree>"#;

fn slide_master_xml() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{EMPTY_SP_TREE}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_master_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PKG_RELS}"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/theme" Target="../theme/theme1.xml"/></Relationships>"#
    )
}

fn slide_layout_xml() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1"><p:cSld name="Blank">{EMPTY_SP_TREE}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn slide_layout_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PKG_RELS}"><Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#
    )
}

fn slide_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PKG_RELS}"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#
    )
}

fn theme_xml(styles: &DeckStyles) -> String {
    let heading = escape_xml(&styles.heading_font);
    let body = escape_xml(&styles.body_font);
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        concat!(
            r#"{decl}<a:theme xmlns:a="{ns_a}" name="Slidechat">"#,
            "<a:themeElements>",
            r#"<a:clrScheme name="Slidechat">"#,
            r#"<a:dk1><a:srgbClr val="000000"/></a:dk1>"#,
            r#"<a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>"#,
            r#"<a:dk2><a:srgbClr val="{text}"/></a:dk2>"#,
            r#"<a:lt2><a:srgbClr val="F3F4F6"/></a:lt2>"#,
            r#"<a:accent1><a:srgbClr val="{accent}"/></a:accent1>"#,
            r#"<a:accent2><a:srgbClr val="F59E0B"/></a:accent2>"#,
            r#"<a:accent3><a:srgbClr val="10B981"/></a:accent3>"#,
            r#"<a:accent4><a:srgbClr val="EF4444"/></a:accent4>"#,
            r#"<a:accent5><a:srgbClr val="8B5CF6"/></a:accent5>"#,
            r#"<a:accent6><a:srgbClr val="{muted}"/></a:accent6>"#,
            r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#,
            r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#,
            "</a:clrScheme>",
            r#"<a:fontScheme name="Slidechat">"#,
            r#"<a:majorFont><a:latin typeface="{heading}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="{body}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            "</a:fontScheme>",
            r#"<a:fmtScheme name="Slidechat">"#,
            "<a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst>",
            "<a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>",
            "<a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>",
            "<a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst>",
            "</a:fmtScheme>",
            "</a:themeElements>",
            "</a:theme>"
        ),
        decl = XML_DECL,
        ns_a = NS_A,
        text = styles.text_color,
        accent = styles.accent_color,
        muted = styles.muted_color,
        heading = heading,
        body = body,
        solid = solid,
        line = line,
        effect = effect,
    )
}

// ── Slides ───────────────────────────────────────────────────────────────────

fn slide_xml(plan: &SlidePlan) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld>"#
    );

    if let Some(fill) = &plan.background {
        xml.push_str(&format!(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{fill}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#
        ));
    }

    xml.push_str("<p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    // Shape id 1 is the group itself.
    for (i, text_box) in plan.boxes.iter().enumerate() {
        push_text_box(&mut xml, text_box, i as u32 + 2);
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

fn push_text_box(xml: &mut String, tb: &TextBox, shape_id: u32) {
    xml.push_str("<p:sp>");
    xml.push_str(&format!(
        r#"<p:nvSpPr><p:cNvPr id="{shape_id}" name="Text Box {shape_id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#
    ));

    xml.push_str("<p:spPr><a:xfrm>");
    xml.push_str(&format!(
        r#"<a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/>"#,
        emu(tb.x),
        emu(tb.y),
        emu(tb.w),
        emu(tb.h)
    ));
    xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

    let anchor = if tb.bullet { "t" } else { "ctr" };
    xml.push_str(&format!(
        r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="{anchor}"><a:normAutofit/></a:bodyPr><a:lstStyle/><a:p>"#
    ));

    let algn = match tb.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    if tb.bullet {
        xml.push_str(&format!(
            r#"<a:pPr marL="285750" indent="-285750" algn="{algn}"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr>"#
        ));
    } else {
        xml.push_str(&format!(r#"<a:pPr algn="{algn}"><a:buNone/></a:pPr>"#));
    }

    xml.push_str(&format!(
        r#"<a:r><a:rPr lang="en-US" sz="{}" b="{}" dirty="0">"#,
        (tb.size * 100.0).round() as u32,
        if tb.bold { 1 } else { 0 }
    ));
    xml.push_str(&format!(
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{}"/>"#,
        escape_xml(&tb.color),
        escape_xml(&tb.font)
    ));
    xml.push_str("</a:rPr>");
    xml.push_str(&format!("<a:t>{}</a:t></a:r>", escape_xml(&tb.text)));

    xml.push_str("</a:p></p:txBody></p:sp>");
}
