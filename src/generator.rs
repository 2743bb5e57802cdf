use crate::config::Config;
use crate::content::{Content, FeatureRecord};
use crate::document::{EmbeddedImage, Newsletter, Paragraph, Run};
use crate::locator::ImageLocator;
use crate::reference::{self, AttachmentRef};
use crate::render;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::*;
use image::ImageFormat;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

const EMU_PER_INCH: f64 = 914_400.0;
const PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_path: PathBuf,
    pub features: usize,
    pub images_embedded: usize,
}

#[derive(Debug)]
pub struct NewsletterGenerator {
    config: Config,
    content: Content,
    locator: ImageLocator,
}

impl NewsletterGenerator {
    pub fn new(config: Config, content: Content) -> Self {
        let locator = ImageLocator::new(&config.snapshot_dir);
        Self {
            config,
            content,
            locator,
        }
    }

    /// Print the document outline without touching the output file.
    pub fn outline(&self) {
        let newsletter = self.assemble(Local::now().date_naive());
        println!();
        println!("{}", "Newsletter outline:".white().bold());
        for line in newsletter.text_lines() {
            println!("  {}", line);
        }
        println!();
        println!("{} images would be embedded", newsletter.images().len());
    }

    pub fn generate(&self) -> Result<GenerationReport> {
        self.locator.preview(PREVIEW_LIMIT);
        println!(
            "{}",
            format!(
                "Creating newsletter with images from: {}",
                self.locator.snapshot_dir().display()
            )
            .cyan()
        );

        let newsletter = self.assemble(Local::now().date_naive());

        let output_path = PathBuf::from(&self.config.output_path);
        render::save(&newsletter, &output_path)?;

        let report = GenerationReport {
            output_path,
            features: self.content.features.len(),
            images_embedded: newsletter.images().len(),
        };

        println!();
        println!("{}", "Newsletter created successfully!".green().bold());
        println!("Saved as: {}", report.output_path.display().to_string().cyan());
        println!(
            "Embedded {} images from local snapshot folder",
            report.images_embedded
        );

        if report.images_embedded == 0 {
            println!("{}", "No images were found in the snapshot folder".yellow());
            println!("Expected filenames:");
            for filename in expected_filenames(&self.content) {
                println!("   - {}", filename);
            }
        }

        Ok(report)
    }

    /// Build the whole newsletter in memory, dated `date`.
    pub fn assemble(&self, date: NaiveDate) -> Newsletter {
        let mut doc = Newsletter::new();

        doc.title(&self.content.title);
        doc.paragraph(
            Paragraph::new(vec![Run::bold(date.format("%B %d, %Y").to_string())]).centered(),
        );
        doc.rule();

        doc.heading(2, "1-Minute Summary");
        for item in &self.content.summary {
            doc.paragraph(Paragraph::new(vec![Run::plain(format!("- {}", item))]));
        }
        doc.rule();

        doc.heading(2, "Feature Updates");
        for feature in &self.content.features {
            self.add_feature(&mut doc, feature);
        }
        doc.rule();

        doc.heading(2, "Behind the Scenes");
        for section in &self.content.behind_the_scenes {
            doc.heading(3, &section.title);
            doc.labelled("Impact: ", &section.impact);
            doc.paragraph(Paragraph::new(vec![Run::bold("Changes:")]));
            for change in &section.changes {
                doc.paragraph(Paragraph::new(vec![Run::plain(format!("- {}", change))]).indented());
            }
        }
        doc.rule();

        let feedback = &self.content.feedback;
        doc.heading(2, "Feedback & Support");
        doc.paragraph(Paragraph::new(vec![Run::plain(&feedback.intro)]));
        doc.labelled("Feedback: ", &feedback.contact);
        doc.blank();
        doc.paragraph(Paragraph::new(vec![Run::bold(&feedback.sign_off)]));
        doc.paragraph(Paragraph::new(vec![Run::italic(&feedback.team)]));

        doc
    }

    fn add_feature(&self, doc: &mut Newsletter, feature: &FeatureRecord) {
        doc.heading(3, &feature.title);

        let mut embedded = 0;
        for path in self.resolve_images(feature) {
            match load_image(&path, self.config.image_width_inches) {
                Ok(image) => {
                    doc.image(image);
                    embedded += 1;
                }
                Err(e) => {
                    println!(
                        "{}",
                        format!("Skipping image {}: {:#}", path.display(), e).yellow()
                    );
                }
            }
        }
        if embedded > 0 {
            let noun = if embedded == 1 { "image" } else { "images" };
            println!(
                "{} Embedded {} {} for {}",
                "✓".green(),
                embedded,
                noun,
                feature.title
            );
        }

        doc.labelled("What's new: ", &feature.new);
        doc.labelled("Impact: ", &feature.impact);
        doc.paragraph(Paragraph::new(vec![Run::bold("How it works:")]));
        for (i, step) in feature.steps.iter().enumerate() {
            doc.paragraph(Paragraph::new(vec![Run::plain(format!("{}. {}", i + 1, step))]).indented());
        }
    }

    fn resolve_images(&self, feature: &FeatureRecord) -> Vec<PathBuf> {
        feature
            .file_urls
            .iter()
            .filter_map(|url| reference::extract_filename(url))
            .filter_map(|filename| self.locator.locate(&filename))
            .collect()
    }
}

/// Attachments every reference in `content` points at, in record order.
pub fn expected_references(content: &Content) -> Vec<AttachmentRef> {
    content
        .features
        .iter()
        .flat_map(|feature| feature.file_urls.iter())
        .filter_map(|url| reference::parse_reference(url))
        .collect()
}

pub fn expected_filenames(content: &Content) -> Vec<String> {
    expected_references(content)
        .into_iter()
        .map(|reference| reference.filename)
        .collect()
}

/// Display size in EMU for an image `width_inches` wide, keeping aspect ratio.
fn scaled_size(width_inches: f64, width_px: u32, height_px: u32) -> Result<(u32, u32)> {
    let width = (width_inches * EMU_PER_INCH).round();
    if !width.is_finite() || width < 1.0 || width > f64::from(u32::MAX) {
        anyhow::bail!("image width of {} inches is out of range", width_inches);
    }
    let width_emu = width as u32;
    let height = u64::from(width_emu) * u64::from(height_px) / u64::from(width_px);
    let height_emu = u32::try_from(height).map_err(|_| {
        anyhow::anyhow!(
            "{}x{} px is too tall to place at {} inches wide",
            width_px,
            height_px,
            width_inches
        )
    })?;
    Ok((width_emu, height_emu))
}

/// Read and decode a screenshot, scaled to `width_inches` keeping aspect ratio.
pub fn load_image(path: &Path, width_inches: f64) -> Result<EmbeddedImage> {
    let bytes = fs::read(path).context(format!("Failed to read {}", path.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .context(format!("Failed to decode {}", path.display()))?;

    let (width_px, height_px) = (decoded.width(), decoded.height());
    if width_px == 0 || height_px == 0 {
        anyhow::bail!("{} has no pixels", path.display());
    }

    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Failed to encode image as PNG")?;

    let (width_emu, height_emu) = scaled_size(width_inches, width_px, height_px)
        .context(format!("Cannot size {}", path.display()))?;

    Ok(EmbeddedImage {
        source: path.to_path_buf(),
        png,
        width_px,
        height_px,
        width_emu,
        height_emu,
    })
}
