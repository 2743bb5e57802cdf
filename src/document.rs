use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub centered: bool,
    /// Rendered with a leading tab stop.
    pub indented: bool,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Self::default()
        }
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn indented(mut self) -> Self {
        self.indented = true;
        self
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A decoded screenshot ready to be placed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub source: PathBuf,
    /// Re-encoded PNG bytes.
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub width_emu: u32,
    pub height_emu: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Heading { level: u8, text: String },
    Paragraph(Paragraph),
    Image(EmbeddedImage),
    /// The `---` separator line.
    Rule,
    Blank,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Newsletter {
    pub blocks: Vec<Block>,
}

impl Newsletter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn title(&mut self, text: impl Into<String>) {
        self.push(Block::Title(text.into()));
    }

    pub fn heading(&mut self, level: u8, text: impl Into<String>) {
        self.push(Block::Heading {
            level,
            text: text.into(),
        });
    }

    pub fn paragraph(&mut self, paragraph: Paragraph) {
        self.push(Block::Paragraph(paragraph));
    }

    /// A paragraph made of a bold label followed by plain text.
    pub fn labelled(&mut self, label: &str, text: &str) {
        self.paragraph(Paragraph::new(vec![Run::bold(label), Run::plain(text)]));
    }

    pub fn image(&mut self, image: EmbeddedImage) {
        self.push(Block::Image(image));
    }

    pub fn rule(&mut self) {
        self.push(Block::Rule);
    }

    pub fn blank(&mut self) {
        self.push(Block::Blank);
    }

    #[cfg(test)]
    pub fn headings(&self, level: u8) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { level: l, text } if *l == level => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<&EmbeddedImage> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Image(image) => Some(image),
                _ => None,
            })
            .collect()
    }

    /// Plain text of every block, one line per block. Images appear as
    /// their source file name.
    pub fn text_lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Title(text) => text.clone(),
                Block::Heading { text, .. } => text.clone(),
                Block::Paragraph(p) if p.indented => format!("\t{}", p.text()),
                Block::Paragraph(p) => p.text(),
                Block::Image(image) => format!(
                    "[image: {}]",
                    image
                        .source
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ),
                Block::Rule => "---".to_string(),
                Block::Blank => String::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_paragraph_has_bold_label() {
        let mut doc = Newsletter::new();
        doc.labelled("Impact: ", "Big");

        match &doc.blocks[0] {
            Block::Paragraph(p) => {
                assert!(p.runs[0].bold);
                assert!(!p.runs[1].bold);
                assert_eq!(p.text(), "Impact: Big");
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn text_lines_cover_every_block() {
        let mut doc = Newsletter::new();
        doc.title("T");
        doc.heading(2, "H");
        doc.paragraph(Paragraph::new(vec![Run::plain("1. step")]).indented());
        doc.rule();
        doc.blank();

        assert_eq!(doc.text_lines(), vec!["T", "H", "\t1. step", "---", ""]);
        assert_eq!(doc.headings(2), vec!["H"]);
        assert!(doc.images().is_empty());
    }
}
