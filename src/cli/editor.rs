use anyhow::{Context, Result, bail};
use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// Editors tried, in order, when `$EDITOR` is not set
const FALLBACK_EDITORS: [&str; 4] = ["code", "nano", "vim", "notepad"];

/// `$EDITOR` if set, otherwise the first fallback editor found on PATH
pub fn resolve_editor() -> Option<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.trim().is_empty() {
            return Some(editor);
        }
    }

    FALLBACK_EDITORS
        .iter()
        .find(|candidate| which::which(candidate).is_ok())
        .map(|candidate| candidate.to_string())
}

/// Arguments passed to `editor` before the file path
fn editor_args(editor: &str) -> &'static [&'static str] {
    if editor == "code" { &["--wait"] } else { &[] }
}

/// Opens `initial` in `editor` through a temp file and returns what was saved.
///
/// The temp file is removed when this returns.
pub fn edit_text(editor: &str, initial: &str, snippet_id: i64) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("snip_{}_", snippet_id))
        .suffix(".txt")
        .tempfile()
        .context("Error creating temporary file")?;

    file.write_all(initial.as_bytes())
        .context("Error writing to temporary file")?;
    file.flush()?;

    debug!(editor, path = %file.path().display(), "launching editor");

    let status = Command::new(editor)
        .args(editor_args(editor))
        .arg(file.path())
        .status()
        .with_context(|| format!("Error running editor '{}'", editor))?;

    if !status.success() {
        bail!("Editor '{}' exited with {}", editor, status);
    }

    fs::read_to_string(file.path()).context("Error reading modified file")
}
