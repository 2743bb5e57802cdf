use crate::document::{Block, EmbeddedImage, Newsletter, Paragraph as DocParagraph, Run as DocRun};
use anyhow::{Context, Result};
use docx_rs::{AlignmentType, Docx, Paragraph, Pic, Run, Style, StyleType};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

const TITLE_STYLE: &str = "Title";

fn heading_style(level: u8) -> String {
    format!("Heading{}", level)
}

fn styles() -> Vec<Style> {
    vec![
        Style::new(TITLE_STYLE, StyleType::Paragraph)
            .name("Title")
            .size(56)
            .color("17365D"),
        Style::new(heading_style(2), StyleType::Paragraph)
            .name("heading 2")
            .size(26)
            .bold()
            .color("4F81BD"),
        Style::new(heading_style(3), StyleType::Paragraph)
            .name("heading 3")
            .size(22)
            .bold()
            .color("4F81BD"),
    ]
}

/// Write `newsletter` as a `.docx` package to `path`.
pub fn save(newsletter: &Newsletter, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context("Failed to create output directory")?;
    }
    let file = File::create(path)
        .context(format!("Failed to create {}", path.display()))?;
    write_docx(newsletter, file)
}

pub fn write_docx<W: Write + Seek>(newsletter: &Newsletter, writer: W) -> Result<()> {
    let mut docx = Docx::new();
    for style in styles() {
        docx = docx.add_style(style);
    }

    for block in &newsletter.blocks {
        docx = docx.add_paragraph(render_block(block));
    }

    docx.build()
        .pack(writer)
        .context("Failed to save newsletter document")?;
    Ok(())
}

fn render_block(block: &Block) -> Paragraph {
    match block {
        Block::Title(text) => Paragraph::new()
            .style(TITLE_STYLE)
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(text)),
        Block::Heading { level, text } => Paragraph::new()
            .style(&heading_style(*level))
            .add_run(Run::new().add_text(text)),
        Block::Paragraph(paragraph) => render_paragraph(paragraph),
        Block::Image(image) => render_image(image),
        Block::Rule => Paragraph::new().add_run(Run::new().add_text("---")),
        Block::Blank => Paragraph::new(),
    }
}

fn render_paragraph(paragraph: &DocParagraph) -> Paragraph {
    let mut out = Paragraph::new();
    if paragraph.centered {
        out = out.align(AlignmentType::Center);
    }
    if paragraph.indented {
        out = out.add_run(Run::new().add_tab());
    }
    for run in &paragraph.runs {
        out = out.add_run(render_run(run));
    }
    out
}

fn render_run(run: &DocRun) -> Run {
    let mut out = Run::new().add_text(&run.text);
    if run.bold {
        out = out.bold();
    }
    if run.italic {
        out = out.italic();
    }
    out
}

fn render_image(image: &EmbeddedImage) -> Paragraph {
    let pic = Pic::new_with_dimensions(image.png.clone(), image.width_px, image.height_px)
        .size(image.width_emu, image.height_emu);
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(Run::new().add_image(pic))
}
