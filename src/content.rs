use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One product change and the screenshots that illustrate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub title: String,
    pub new: String,
    pub impact: String,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Raw `{{file://...}}` placeholders, in display order.
    #[serde(default)]
    pub file_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehindTheScenes {
    pub title: String,
    pub impact: String,
    #[serde(default)]
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub intro: String,
    pub contact: String,
    pub sign_off: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub title: String,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
    #[serde(default)]
    pub behind_the_scenes: Vec<BehindTheScenes>,
    pub feedback: Feedback,
}

impl Content {
    /// Load content from a `.json`, `.yaml` or `.yml` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read content file {}", path.display()))?;

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                .context(format!("Failed to parse content file {}", path.display()))?,
            _ => serde_json::from_str(&raw)
                .context(format!("Failed to parse content file {}", path.display()))?,
        };

        Ok(content)
    }

    /// Built-in content unless a content file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize content")
    }
}

const SPACE_ID: &str = "56486d48-de86-417a-ae69-1b2a5c1515db";

fn file_ref(attachment_id: &str, filename: &str, block_id: &str) -> String {
    let payload = serde_json::json!({
        "source": format!("attachment:{}:{}", attachment_id, filename),
        "permissionRecord": {
            "table": "block",
            "id": block_id,
            "spaceId": SPACE_ID,
        }
    });
    format!("{{{{file://{}}}}}", urlencoding::encode(&payload.to_string()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Content {
    fn default() -> Self {
        Self {
            title: "Routine Editor Newsletter".to_string(),
            summary: strings(&[
                "Enhanced cross-system search with @ functionality makes finding content faster and more intuitive",
                "New evaluation workflow improvements streamline testing with direct eval-to-proposal linking",
                "Improved UI components and navigation across the platform create a more polished user experience",
            ]),
            features: vec![
                FeatureRecord {
                    title: "🔍 @ Functionality for Cross-System Search".to_string(),
                    new: "Added @ functionality for cross-system search capabilities".to_string(),
                    impact: "Improves performance by enabling a wider range of available contexts for Distillery Chat".to_string(),
                    steps: strings(&[
                        "Type @ in search to access cross-system functionality",
                        "Search across different system components seamlessly",
                        "Get broader context for your Distillery Chat interactions",
                    ]),
                    file_urls: vec![
                        file_ref("acdc2011-73f7-4e4c-971a-34c6eefe89bb", "Screenshot_2025-10-01_at_12.52.41_PM.png", "2732c038-ca37-8080-8832-f1a97980a4c2"),
                        file_ref("e4725358-40f2-45ff-a0b0-b94b199e5666", "Screenshot_2025-10-01_at_12.53.46_PM.png", "2732c038-ca37-8080-8832-f1a97980a4c2"),
                    ],
                },
                FeatureRecord {
                    title: "👁️ Enhanced GenEdit Navigation".to_string(),
                    new: "Added navigation eye icon to GenEdit tool cards to see where edits were made".to_string(),
                    impact: "Improves UI/UX of GenEdit by enabling users to focus on edited system components".to_string(),
                    steps: strings(&[
                        "Look for the eye icon on GenEdit tool cards",
                        "Click to navigate directly to specific system components",
                        "Focus on exactly what you're editing without distraction",
                    ]),
                    file_urls: vec![
                        file_ref("6f4ec752-bbbc-40e2-acf5-91c89b2635bf", "Screenshot_2025-10-01_at_12.56.01_PM.png", "2732c038-ca37-8029-8e66-ce9bb15e5122"),
                    ],
                },
                FeatureRecord {
                    title: "🧪 Improvements to Regression Testing".to_string(),
                    new: "Enhanced regression testing processes for system changes".to_string(),
                    impact: "Promotes regression testing by surfacing eval test runs on the proposal page for routine edits".to_string(),
                    steps: strings(&[
                        "Create or edit a proposal",
                        "View eval test runs directly on the proposal page",
                        "Ensure comprehensive testing before implementation",
                    ]),
                    file_urls: vec![
                        file_ref("63b1af6e-0191-4a65-8ca0-42eb54b9548b", "Screenshot_2025-10-01_at_1.52.48_PM.png", "2722c038-ca37-80e3-9c5e-decca09533a6"),
                        file_ref("f144afb9-18ae-47ea-a9c1-b419b34aa6d6", "Screenshot_2025-10-01_at_1.53.03_PM.png", "2722c038-ca37-80e3-9c5e-decca09533a6"),
                    ],
                },
                FeatureRecord {
                    title: "✏️ Improved UX of Eval Editing".to_string(),
                    new: "Enhanced user experience for editing and managing evaluations".to_string(),
                    impact: "Improves the UX of editing evals by enabling deletion and providing state indicators (edited, deleted, new)".to_string(),
                    steps: strings(&[
                        "Navigate to evaluation settings",
                        "Use improved interface with state indicators",
                        "Edit or delete evaluations more efficiently",
                    ]),
                    file_urls: vec![
                        file_ref("e1e95d54-9d7c-48b9-ad73-ddaca41da02c", "Screenshot_2025-10-01_at_5.19.21_PM.png", "2702c038-ca37-8009-b31d-c49ccc29083f"),
                        file_ref("69dcba06-8323-4b56-96e2-7fe3b3bb6997", "Screenshot_2025-10-01_at_5.14.50_PM.png", "2702c038-ca37-8009-b31d-c49ccc29083f"),
                    ],
                },
                FeatureRecord {
                    title: "📊 Sidebar for Eval Metadata".to_string(),
                    new: "New sidebar configuration for evaluation metadata management".to_string(),
                    impact: "Improves usability by providing a convenient in-context configuration layout for evals".to_string(),
                    steps: strings(&[
                        "Open evaluation settings",
                        "Use the sidebar for metadata configuration",
                        "Manage eval parameters without leaving your workflow",
                    ]),
                    file_urls: vec![
                        file_ref("39922d1b-b610-4598-bf13-31e33cc28394", "Screenshot_2025-10-01_at_5.38.06_PM.png", "2762c038-ca37-80ed-aefe-ce2183a9c641"),
                    ],
                },
                FeatureRecord {
                    title: "🎨 Improved UI of Components View".to_string(),
                    new: "Enhanced the UI of the components view within the routine editor".to_string(),
                    impact: "Changed design of background, selected step, and step cards to increase usability by creating a more intuitive and aesthetic interface".to_string(),
                    steps: strings(&[
                        "Access the routine editor components view",
                        "Experience improved visual design and layout",
                        "Navigate components with enhanced usability",
                    ]),
                    file_urls: vec![
                        file_ref("1c2d8fb9-ff2b-4529-bb5e-4282309fd6ac", "Screenshot_2025-10-01_at_5.39.14_PM.png", "2772c038-ca37-802e-9350-f92e26765778"),
                    ],
                },
                FeatureRecord {
                    title: "🔧 Consolidated Workflow Actions".to_string(),
                    new: "Consolidated workflow actions and zoom controls into a single floating pill on the left side of the screen".to_string(),
                    impact: "Improves the usability of the systems by combining platform related actions into a single area".to_string(),
                    steps: strings(&[
                        "Look for the floating pill on the left side of the screen",
                        "Access workflow actions and zoom controls in one place",
                        "Navigate platform features more efficiently",
                    ]),
                    file_urls: vec![
                        file_ref("6737f7d4-1d6e-4cc1-b382-2c45e07ebeec", "Screenshot_2025-10-01_at_5.53.13_PM.png", "2782c038-ca37-80dc-aabd-ed46dab4b62c"),
                    ],
                },
            ],
            behind_the_scenes: vec![
                BehindTheScenes {
                    title: "Evaluation System Improvements".to_string(),
                    impact: "Faster evaluation creation and more consistent testing workflows".to_string(),
                    changes: strings(&[
                        "Evals from Simulations: Quickly create new eval cases and load existing eval cases as simulations",
                        "Adding caching to simulations: Faster, cheaper, and more consistent LLMJ output",
                    ]),
                },
                BehindTheScenes {
                    title: "Cross-Page Workflow Enhancement".to_string(),
                    impact: "Improved context visibility and workflow continuity".to_string(),
                    changes: strings(&[
                        "Enables cross-page workflow editing: Improves UI/UX by displaying active context as pills in Distillery Chat",
                    ]),
                },
                BehindTheScenes {
                    title: "User Experience Infrastructure".to_string(),
                    impact: "Better feedback collection and streamlined development processes".to_string(),
                    changes: strings(&[
                        "In-app feedback mechanisms (BE): Identifies opportunities to improve UI/UX of Distillery",
                        "Migrates Tower Chat UI components to shadcn/ui: Standardizes design system components",
                    ]),
                },
            ],
            feedback: Feedback {
                intro: "We'd love your input!".to_string(),
                contact: "Juan@distyl.ai".to_string(),
                sign_off: "Best regards,".to_string(),
                team: "The Distyl Team".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;

    #[test]
    fn builtin_content_has_seven_features() {
        let content = Content::default();
        assert_eq!(content.features.len(), 7);
        assert_eq!(content.summary.len(), 3);
        assert_eq!(content.behind_the_scenes.len(), 3);

        let image_refs: usize = content.features.iter().map(|f| f.file_urls.len()).sum();
        assert_eq!(image_refs, 10);
    }

    #[test]
    fn builtin_references_decode_to_screenshot_names() {
        let content = Content::default();
        let first = &content.features[0].file_urls[0];
        assert_eq!(
            reference::extract_filename(first).as_deref(),
            Some("Screenshot_2025-10-01_at_12.52.41_PM.png")
        );

        let decoded = reference::parse_reference(first).unwrap();
        assert_eq!(decoded.attachment_id, "acdc2011-73f7-4e4c-971a-34c6eefe89bb");
        assert_eq!(decoded.permission.unwrap().space_id, SPACE_ID);

        for feature in &content.features {
            for url in &feature.file_urls {
                assert!(reference::extract_filename(url).is_some(), "{}", url);
            }
        }
    }

    #[test]
    fn yaml_content_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.yaml");
        fs::write(
            &path,
            r#"
title: Weekly Digest
summary:
  - One thing
features:
  - title: Faster builds
    new: Builds are faster
    impact: Less waiting
    steps:
      - Run the build
feedback:
  intro: Tell us
  contact: team@example.com
  sign_off: Cheers,
  team: The Team
"#,
        )
        .unwrap();

        let content = Content::load(&path).unwrap();
        assert_eq!(content.title, "Weekly Digest");
        assert_eq!(content.features.len(), 1);
        assert!(content.features[0].file_urls.is_empty());
        assert!(content.behind_the_scenes.is_empty());
    }

    #[test]
    fn json_content_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let original = Content::default();
        fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();

        assert_eq!(Content::load(&path).unwrap(), original);
    }

    #[test]
    fn missing_content_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Content::load(dir.path().join("missing.yaml")).is_err());
    }
}
