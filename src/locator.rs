use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Only entries starting with this are considered by the fuzzy fallback.
const SCREENSHOT_PREFIX: &str = "Screenshot";
/// macOS puts U+202F before AM/PM in screenshot names.
const NARROW_NO_BREAK_SPACE: char = '\u{202f}';
const STRIPPED_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

#[derive(Debug, Clone)]
pub struct ImageLocator {
    snapshot_dir: PathBuf,
}

impl ImageLocator {
    pub fn new<P: AsRef<Path>>(snapshot_dir: P) -> Self {
        Self {
            snapshot_dir: snapshot_dir.as_ref().to_path_buf(),
        }
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    /// Entry names of the snapshot folder, in directory enumeration order.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.snapshot_dir).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read snapshot folder")?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    /// Resolve `filename` to a file in the snapshot folder.
    ///
    /// Tries, in order: the exact name, the name with underscores turned into
    /// spaces, then the first `Screenshot*` entry whose name contains the
    /// extension-less spaced name. Misses are reported and yield `None`.
    pub fn locate(&self, filename: &str) -> Option<PathBuf> {
        if !self.snapshot_dir.exists() {
            println!(
                "{} Snapshot folder not found: {}",
                "✗".red(),
                self.snapshot_dir.display()
            );
            return None;
        }

        let files = match self.list() {
            Ok(files) => files,
            Err(e) => {
                println!("{} Error reading snapshot folder: {:#}", "✗".red(), e);
                return None;
            }
        };

        if files.iter().any(|f| f == filename) {
            println!("  {} Found exact match: {}", "✓".green(), filename);
            return Some(self.snapshot_dir.join(filename));
        }

        let spaced_filename = filename.replace('_', " ");
        if files.iter().any(|f| *f == spaced_filename) {
            println!("  {} Found match with spaces: {}", "✓".green(), spaced_filename);
            return Some(self.snapshot_dir.join(&spaced_filename));
        }

        let expected_pattern = STRIPPED_EXTENSIONS
            .iter()
            .fold(spaced_filename, |name, ext| name.replace(*ext, ""));
        let fuzzy = files.iter().find(|file| {
            file.starts_with(SCREENSHOT_PREFIX)
                && file
                    .replace(NARROW_NO_BREAK_SPACE, " ")
                    .contains(&expected_pattern)
        });
        if let Some(file) = fuzzy {
            println!("  {} Found fuzzy match: {}", "✓".green(), file);
            return Some(self.snapshot_dir.join(file));
        }

        println!("  {} No match found for: {}", "✗".red(), filename);
        None
    }

    /// Print a short listing of the snapshot folder, or how to create it.
    pub fn preview(&self, limit: usize) {
        println!(
            "{}",
            format!("Looking for images in: {}", self.snapshot_dir.display()).blue()
        );

        if !self.snapshot_dir.exists() {
            println!(
                "{}",
                format!("Snapshot folder not found: {}", self.snapshot_dir.display()).red()
            );
            println!("Create the folder and add your screenshot files:");
            println!("   {}", format!("mkdir -p {}", self.snapshot_dir.display()).cyan());
            return;
        }

        match self.list() {
            Ok(files) => {
                println!("Found {} files in snapshot folder", files.len());
                for file in files.iter().take(limit) {
                    println!("   - {}", file);
                }
                if files.len() > limit {
                    println!("   ... and {} more", files.len() - limit);
                }
            }
            Err(e) => {
                println!("{}", format!("Error reading snapshot folder: {:#}", e).red());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ImageLocator::new(dir.path().join("nope"));
        assert_eq!(locator.locate("a.png"), None);
    }

    #[test]
    fn exact_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Screenshot_1.png");
        touch(dir.path(), "Screenshot 1.png");

        let locator = ImageLocator::new(dir.path());
        assert_eq!(
            locator.locate("Screenshot_1.png"),
            Some(dir.path().join("Screenshot_1.png"))
        );
    }

    #[test]
    fn space_substituted_variant_is_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Screenshot 2025-10-01 at 1.52.48 PM.png");

        let locator = ImageLocator::new(dir.path());
        assert_eq!(
            locator.locate("Screenshot_2025-10-01_at_1.52.48_PM.png"),
            Some(dir.path().join("Screenshot 2025-10-01 at 1.52.48 PM.png"))
        );
    }

    #[test]
    fn fuzzy_match_normalizes_narrow_space() {
        let dir = tempfile::tempdir().unwrap();
        let on_disk = "Screenshot 2025-10-01 at 5.19.21\u{202f}PM.png";
        touch(dir.path(), on_disk);

        let locator = ImageLocator::new(dir.path());
        assert_eq!(
            locator.locate("Screenshot_2025-10-01_at_5.19.21_PM.png"),
            Some(dir.path().join(on_disk))
        );
    }

    #[test]
    fn fuzzy_match_accepts_other_extension_and_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let on_disk = "Screenshot 2025-10-01 at 5.38.06 PM (2).jpeg";
        touch(dir.path(), on_disk);

        let locator = ImageLocator::new(dir.path());
        assert_eq!(
            locator.locate("Screenshot_2025-10-01_at_5.38.06_PM.png"),
            Some(dir.path().join(on_disk))
        );
    }

    #[test]
    fn fuzzy_match_requires_screenshot_prefix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Copy of Screenshot 2025-10-01 at 5.39.14 PM.png");

        let locator = ImageLocator::new(dir.path());
        assert_eq!(locator.locate("Screenshot_2025-10-01_at_5.39.14_PM.png"), None);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "screenshot.png");

        let locator = ImageLocator::new(dir.path());
        assert_eq!(locator.locate("Screenshot.png"), None);
    }

    #[test]
    fn nothing_matching_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Screenshot 2025-10-02 at 9.00.00 AM.png");
        touch(dir.path(), "notes.txt");

        let locator = ImageLocator::new(dir.path());
        assert_eq!(locator.locate("Screenshot_2025-10-01_at_12.52.41_PM.png"), None);
    }

    #[test]
    fn list_returns_direct_children_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png");
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "b.png");

        let mut names = ImageLocator::new(dir.path()).list().unwrap();
        names.sort();
        assert_eq!(names, vec!["a.png".to_string(), "nested".to_string()]);
    }
}
