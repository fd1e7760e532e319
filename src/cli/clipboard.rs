use anyhow::{Result, anyhow};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Clipboard tools for this platform, tried in order
#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    // stdin is closed by now, so the child can exit and be reaped
    let status = child.wait()?;
    written?;
    Ok(status.success())
}

/// Copies `text` to the system clipboard using the first tool that works
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    for (program, args) in CLIPBOARD_TOOLS {
        match pipe_into(program, args, text) {
            Ok(true) => {
                debug!(program, "copied to clipboard");
                return Ok(());
            }
            Ok(false) => debug!(program, "clipboard tool exited with failure"),
            Err(e) => debug!(program, error = %e, "clipboard tool unavailable"),
        }
    }

    let tried: Vec<&str> = CLIPBOARD_TOOLS.iter().map(|(p, _)| *p).collect();
    Err(anyhow!(
        "Clipboard tools not available ({})",
        tried.join(", ")
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn pipe_into_reports_tool_exit_status() {
        assert!(pipe_into("cat", &[], "hello").unwrap());
        assert!(!pipe_into("false", &[], "").unwrap());
    }

    #[test]
    fn pipe_into_reaps_child_when_write_fails() {
        // `true` exits without reading, so a large write hits a closed pipe
        let text = "x".repeat(4 * 1024 * 1024);
        assert!(pipe_into("true", &[], &text).is_err());
    }

    #[test]
    fn missing_tool_is_an_error() {
        assert!(pipe_into("snip-no-such-clipboard-tool", &[], "x").is_err());
    }
}
