use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::models::{Snippet, SnippetStore};

/// Version string written into JSON exports
pub const EXPORT_VERSION: &str = "1.0";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => ".json",
            ExportFormat::Markdown => ".md",
            ExportFormat::Text => ".txt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Markdown => "MARKDOWN",
            ExportFormat::Text => "TEXT",
        }
    }

    /// Renders the snippets in this format
    pub fn render(&self, snippets: &[Snippet]) -> Result<String> {
        match self {
            ExportFormat::Json => ExportData::new(snippets.to_vec()).to_json(),
            ExportFormat::Markdown => Ok(render_markdown(snippets, Local::now())),
            ExportFormat::Text => Ok(render_text(snippets, Local::now())),
        }
    }

    /// `snip_export_<timestamp><ext>` in the working directory
    pub fn default_file_name(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("snip_export_{}{}", timestamp, self.extension()))
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => bail!("Unsupported format '{}'. Use: json, markdown, or text", other),
        }
    }
}

/// Export file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub exported_at: DateTime<Utc>,
    pub version: String,
    pub count: usize,
    pub snippets: Vec<Snippet>,
}

impl ExportData {
    pub fn new(snippets: Vec<Snippet>) -> Self {
        Self {
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
            count: snippets.len(),
            snippets,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize snippets to JSON")
    }
}

/// One record of an import file. Only `title` is required; `id` and
/// `created_at` are ignored since the store assigns both on import.
///
/// Capitalized keys are accepted as well, along with `null` tags, which is
/// how older snip releases wrote their backups.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedSnippet {
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Tags", deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, alias = "Content", deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parsed import file
#[derive(Debug, Clone, Deserialize)]
pub struct ImportData {
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub snippets: Vec<ImportedSnippet>,
}

impl ImportData {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse JSON import file")
    }
}

/// Outcome of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
}

/// Writes rendered snippets to `path`
pub fn export_to_file(snippets: &[Snippet], format: ExportFormat, path: &Path) -> Result<()> {
    let content = format.render(snippets)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write export file {}", path.display()))
}

/// Reads and parses a JSON export file
pub fn import_from_file(path: &Path) -> Result<ImportData> {
    if path.as_os_str().is_empty() {
        bail!("Please specify a file to import using --file or as an argument");
    }
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file {}", path.display()))?;
    ImportData::from_json(&contents)
}

/// Saves every imported record as a brand new snippet.
///
/// Ids are regenerated by the store and `created_at` is set to the time of
/// import. A failing record is counted and skipped. `on_record` sees each
/// record with the outcome of its save.
pub fn import_into_store<F>(store: &SnippetStore, data: &ImportData, mut on_record: F) -> ImportSummary
where
    F: FnMut(&ImportedSnippet, bool),
{
    let mut summary = ImportSummary::default();

    for record in &data.snippets {
        let snippet = Snippet::new(
            record.title.clone(),
            record.tags.clone(),
            record.content.clone(),
        );

        match store.save(&snippet) {
            Ok(_) => {
                summary.imported += 1;
                on_record(record, true);
            }
            Err(e) => {
                warn!(title = %record.title, error = %e, "failed to import snippet");
                summary.failed += 1;
                on_record(record, false);
            }
        }
    }

    summary
}

fn render_markdown(snippets: &[Snippet], now: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str("# Code Snippets Export\n\n");
    out.push_str(&format!(
        "Exported on: {}\n",
        now.format("%B %-d, %Y at %-I:%M %p")
    ));
    out.push_str(&format!("Total snippets: {}\n\n", snippets.len()));
    out.push_str("---\n\n");

    for (idx, snippet) in snippets.iter().enumerate() {
        out.push_str(&format!("## {}. {}\n\n", snippet.id, snippet.title));

        if !snippet.tags.is_empty() {
            let tags: Vec<String> = snippet.tags.iter().map(|t| format!("`{}`", t)).collect();
            out.push_str(&format!("**Tags:** {}\n\n", tags.join(", ")));
        }

        out.push_str(&format!(
            "**Created:** {}\n\n",
            snippet.created_at.with_timezone(&Local).format("%B %-d, %Y")
        ));

        out.push_str("```\n");
        out.push_str(&snippet.content);
        out.push_str("\n```\n\n");

        if idx < snippets.len() - 1 {
            out.push_str("---\n\n");
        }
    }

    out
}

fn render_text(snippets: &[Snippet], now: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str("CODE SNIPPETS EXPORT\n");
    out.push_str("===================\n\n");
    out.push_str(&format!(
        "Exported on: {}\n",
        now.format("%B %-d, %Y at %-I:%M %p")
    ));
    out.push_str(&format!("Total snippets: {}\n\n", snippets.len()));

    for (idx, snippet) in snippets.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", snippet.id, snippet.title));
        out.push_str(&"-".repeat(snippet.title.len() + 10));
        out.push('\n');

        if !snippet.tags.is_empty() {
            out.push_str(&format!("Tags: {}\n", snippet.tags.join(", ")));
        }

        out.push_str(&format!(
            "Created: {}\n\n",
            snippet.created_at.with_timezone(&Local).format("%B %-d, %Y")
        ));
        out.push_str(&snippet.content);
        out.push_str("\n\n");

        if idx < snippets.len() - 1 {
            out.push_str(&"=".repeat(50));
            out.push_str("\n\n");
        }
    }

    out
}
