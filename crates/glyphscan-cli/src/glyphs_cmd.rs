use std::path::Path;

use glyphscan::glyphscan_core::Glyph;
use glyphscan::glyphscan_parse::GlyphDocument;

use crate::cli::OutputFormat;
use crate::page_range::parse_page_range;
use crate::shared::{csv_escape, open_pdf};

pub fn run(file: &Path, pages: Option<&str>, format: &OutputFormat) -> Result<(), i32> {
    let doc = open_pdf(file)?;
    let pages = match pages {
        Some(range) => parse_page_range(range, doc.page_count()).map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?,
        None => (1..=doc.page_count() as u32).collect(),
    };
    let glyphs = extract(&doc, &pages)?;

    match format {
        OutputFormat::Text => write_text(&glyphs),
        OutputFormat::Json => write_json(&glyphs)?,
        OutputFormat::Csv => write_csv(&glyphs),
    }
    Ok(())
}

fn extract(doc: &GlyphDocument, pages: &[u32]) -> Result<Vec<Glyph>, i32> {
    let mut glyphs = Vec::new();
    for &page in pages {
        let page_glyphs = doc.extract_page_glyphs(page).map_err(|e| {
            eprintln!("Error reading page {page}: {e}");
            1
        })?;
        glyphs.extend(page_glyphs);
    }
    Ok(glyphs)
}

fn write_text(glyphs: &[Glyph]) {
    println!("page\tchar\tx\ty\twidth\theight\tsize");
    for g in glyphs {
        println!(
            "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            g.page.unwrap_or_default(),
            g.text,
            g.bbox.x,
            g.bbox.y,
            g.bbox.width,
            g.bbox.height,
            g.font_size,
        );
    }
}

fn write_json(glyphs: &[Glyph]) -> Result<(), i32> {
    let json = serde_json::to_string(glyphs).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}

fn write_csv(glyphs: &[Glyph]) {
    println!("page,char,x,y,width,height,size");
    for g in glyphs {
        println!(
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2}",
            g.page.unwrap_or_default(),
            csv_escape(&g.text),
            g.bbox.x,
            g.bbox.y,
            g.bbox.width,
            g.bbox.height,
            g.font_size,
        );
    }
}
