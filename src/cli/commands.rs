use crate::cli::{clipboard, editor, render};
use crate::config::{Config, DB_PATH_ENV};
use crate::models::{
    ExportFormat, ImportSummary, Snippet, SnippetStats, SnippetStore, export_to_file,
    import_from_file, import_into_store,
};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

/// Languages offered by `save-interactive`; the choice becomes the first tag
const LANGUAGES: [&str; 15] = [
    "go",
    "javascript",
    "typescript",
    "python",
    "rust",
    "java",
    "cpp",
    "csharp",
    "php",
    "ruby",
    "bash",
    "sql",
    "html",
    "css",
    "other",
];

const IMPORT_PREVIEW_COUNT: usize = 3;
const TOP_TAG_COUNT: usize = 10;
const RECENT_COUNT: usize = 5;

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .context("Invalid snippet ID. Please provide a valid number.")
}

/// Saves stdin as a new snippet
pub fn save(store: &SnippetStore, title: &str, tags: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Title cannot be empty");
    }

    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Error reading snippet content from stdin")?;

    let snippet = Snippet::new(title.to_string(), Snippet::parse_tags(tags), content);
    let id = store.save(&snippet).context("Error saving snippet")?;

    render::success(&format!("Snippet saved with ID: {}", id));
    Ok(())
}

pub fn save_interactive(store: &SnippetStore) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let title = prompt(&mut input, "What's the title of your snippet?")?;
    if title.is_empty() {
        bail!("Title cannot be empty");
    }

    let language = prompt(
        &mut input,
        &format!("What programming language is this? ({})", LANGUAGES.join(", ")),
    )?
    .to_lowercase();

    render::line(&"Enter your code snippet (finish with a line containing only '.'):".bold().to_string());
    let content = read_block(&mut input)?;
    if content.trim().is_empty() {
        bail!("Content cannot be empty");
    }

    let description = prompt(&mut input, "Description (optional):")?;
    let tags_input = prompt(&mut input, "Tags (optional, comma-separated):")?;

    let snippet = build_interactive_snippet(title, &language, content, &description, &tags_input);
    let id = store.save(&snippet).context("Error saving snippet")?;

    println!();
    render::success(&format!("Snippet saved with ID: {}", id));
    println!();

    let saved = store.get_by_id(id)?;
    render::snippet_card(&saved, true);
    Ok(())
}

/// Assembles the answers of `save-interactive` into a snippet
fn build_interactive_snippet(
    title: String,
    language: &str,
    content: String,
    description: &str,
    tags_input: &str,
) -> Snippet {
    let mut tags = Snippet::parse_tags(tags_input);
    if !language.is_empty() && language != "other" {
        tags.insert(0, language.to_string());
    }

    let content = if description.is_empty() {
        content
    } else {
        format!("// {}\n{}", description, content)
    };

    Snippet::new(title, tags, content)
}

pub fn list(store: &SnippetStore) -> Result<()> {
    let snippets = store.list_all().context("Error listing snippets")?;

    if snippets.is_empty() {
        render::info("No snippets found. Use 'snip save' to create your first snippet!");
        return Ok(());
    }

    render::heading(&format!("Found {} snippet(s):", snippets.len()));
    render::rule();
    for snippet in &snippets {
        render::snippet_row(snippet);
    }
    Ok(())
}

pub fn search(store: &SnippetStore, query: &str, tag: &str) -> Result<()> {
    let snippets = store
        .search(query, tag)
        .context("Error searching snippets")?;
    render::search_results(&snippets, query, tag);
    Ok(())
}

/// Prints raw content, undecorated so it can be piped
pub fn cat(store: &SnippetStore, id: &str) -> Result<()> {
    let snippet = store.get_by_id(parse_id(id)?)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(snippet.content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

pub fn copy(store: &SnippetStore, id: &str) -> Result<()> {
    let snippet = store.get_by_id(parse_id(id)?)?;

    clipboard::copy_to_clipboard(&snippet.content).context("Error copying to clipboard")?;
    render::success(&format!("Copied snippet '{}' to clipboard!", snippet.title));
    Ok(())
}

pub fn edit(store: &SnippetStore, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let mut snippet = store.get_by_id(id)?;

    let editor = editor::resolve_editor()
        .context("No editor found. Please set the EDITOR environment variable.")?;

    render::info(&format!("Opening snippet '{}' in {}...", snippet.title, editor));
    println!();
    render::snippet_card(&snippet, false);

    let edited = editor::edit_text(&editor, &snippet.content, id)?;
    if edited == snippet.content {
        render::info("No changes made.");
        return Ok(());
    }

    snippet.content = edited.trim_end_matches(['\n', '\r']).to_string();
    store.update(&snippet).context("Error saving changes")?;

    render::success(&format!("Updated snippet '{}'", snippet.title));
    Ok(())
}

pub fn delete(store: &SnippetStore, id: &str, force: bool) -> Result<()> {
    let id = parse_id(id)?;
    let snippet = store.get_by_id(id)?;

    if !force {
        render::warning("You are about to delete this snippet:");
        println!();
        render::snippet_card(&snippet, false);
        println!();

        if !confirm("Are you sure you want to delete this snippet?")? {
            render::info("Deletion cancelled.");
            return Ok(());
        }
    }

    store.delete(id).context("Error deleting snippet")?;
    render::success(&format!("Deleted snippet '{}' (ID: {})", snippet.title, id));
    Ok(())
}

pub fn export(store: &SnippetStore, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse()?;

    let snippets = store.list_all().context("Error loading snippets")?;
    if snippets.is_empty() {
        render::info("No snippets found to export.");
        return Ok(());
    }

    let path = output
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| format.default_file_name());
    export_to_file(&snippets, format, &path)?;

    let absolute = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    render::success(&format!(
        "Exported {} snippets to: {}",
        snippets.len(),
        absolute.display()
    ));

    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or_default();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    println!();
    render::boxed(
        "Export Details:",
        &[
            format!("Format: {}", format.display_name()),
            format!("File: {}", file_name),
            format!("Size: {} bytes", size),
            format!("Snippets: {}", snippets.len()),
        ],
    );
    Ok(())
}

pub fn import(store: &SnippetStore, path: PathBuf, yes: bool) -> Result<()> {
    let data = import_from_file(&path)?;

    if data.snippets.is_empty() {
        render::info("No snippets found in the import file.");
        return Ok(());
    }

    render::heading("Import Preview");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let exported = data
        .exported_at
        .map(|at| at.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    render::boxed(
        "Import Details:",
        &[
            format!("File: {}", file_name),
            format!("Exported: {}", exported),
            format!("Version: {}", data.version.as_deref().unwrap_or("unknown")),
            format!("Snippets to import: {}", data.snippets.len()),
        ],
    );

    render::line(&"Preview of snippets:".italic().to_string());
    for record in data.snippets.iter().take(IMPORT_PREVIEW_COUNT) {
        let chips = if record.tags.is_empty() {
            String::new()
        } else {
            format!(" {}", render::tag_chips(&record.tags))
        };
        render::line(&format!("  {}{}", record.title, chips));
    }
    if data.snippets.len() > IMPORT_PREVIEW_COUNT {
        render::line(&format!(
            "  ... and {} more snippets",
            data.snippets.len() - IMPORT_PREVIEW_COUNT
        ));
    }
    println!();

    if !yes && !confirm(&format!("Import {} snippets?", data.snippets.len()))? {
        render::info("Import cancelled.");
        return Ok(());
    }

    render::info("Importing snippets...");
    let summary = import_into_store(store, &data, |record, ok| {
        if ok {
            render::line(&format!("  {} Imported: {}", "✔".bright_green(), record.title));
        } else {
            render::line(&format!("  {} Failed to import: {}", "✘".bright_red(), record.title));
        }
    });
    println!();

    report_import(summary);
    Ok(())
}

fn report_import(summary: ImportSummary) {
    if summary.failed == 0 {
        render::success(&format!(
            "Successfully imported all {} snippets!",
            summary.imported
        ));
    } else {
        render::warning(&format!(
            "Imported {} snippets, {} failed",
            summary.imported, summary.failed
        ));
    }

    if summary.imported > 0 {
        println!();
        render::boxed(
            "Import completed!",
            &[
                "Use 'snip list' to see all your snippets".to_string(),
                "Use 'snip stats' to see updated statistics".to_string(),
                "Use 'snip search' to find specific snippets".to_string(),
            ],
        );
    }
}

pub fn stats(store: &SnippetStore) -> Result<()> {
    let snippets = store.list_all().context("Error loading snippets")?;

    if snippets.is_empty() {
        render::info("No snippets found. Use 'snip save' to create your first snippet!");
        return Ok(());
    }

    let stats = SnippetStats::from_snippets(&snippets);

    render::heading("Snippet Statistics");
    render::boxed(
        "Overview:",
        &[
            format!("Total Snippets: {}", stats.total_snippets),
            format!("Total Tags: {}", stats.total_tags),
            format!("Unique Tags: {}", stats.unique_tags()),
            format!("Average Tags per Snippet: {:.1}", stats.average_tags()),
        ],
    );

    if stats.unique_tags() > 0 {
        println!();
        render::heading("Most Popular Tags");
        render::line(&format!(
            "{:<20} {:>6} {:>9}",
            "Tag".bright_magenta().bold(),
            "Count".bright_magenta().bold(),
            "Usage %".bright_magenta().bold()
        ));
        for usage in stats.top_tags(TOP_TAG_COUNT) {
            render::line(&format!(
                "{:<20} {:>6} {:>8.1}%",
                usage.tag.bright_cyan(),
                usage.count,
                usage.percentage
            ));
        }
    }

    println!();
    render::heading("Recent Activity");
    render::rule();
    for snippet in snippets.iter().take(RECENT_COUNT) {
        render::snippet_row(snippet);
    }

    println!();
    render::boxed(
        "Pro Tips:",
        &[
            "Use 'snip search <query> --tag <tag>' to find snippets by tag".to_string(),
            "Use 'snip save-interactive' for a guided snippet creation".to_string(),
            "Use 'snip copy <id>' to quickly copy snippets to clipboard".to_string(),
        ],
    );
    Ok(())
}

pub fn init(config: &Config, store: &SnippetStore, existed: bool) -> Result<()> {
    render::heading("Initializing snip");

    let dir = config.data_dir().display().to_string();
    if existed {
        render::info(&format!("Configuration directory already exists: {}", dir));
    } else {
        render::success(&format!("Created configuration directory: {}", dir));
    }

    let db_path = store.path().unwrap_or(config.db_path.as_path());
    render::info(&format!("Database is stored at: {}", db_path.display()));
    render::info(&format!(
        "Snippets stored: {} (set {} to use another database)",
        store.count()?,
        DB_PATH_ENV
    ));
    println!();
    render::success("snip is ready to use!");
    println!();

    render::boxed(
        "Next steps:",
        &[
            "Save your first snippet: echo 'Hello World' | snip save 'My first snippet'".to_string(),
            "List all snippets: snip list".to_string(),
            "Search snippets: snip search 'hello'".to_string(),
            "View help: snip --help".to_string(),
        ],
    );
    Ok(())
}

pub fn version(config: &Config) {
    render::heading("snip - Terminal Code Snippet Manager");
    render::boxed(
        "Version Information:",
        &[
            format!("Version: {}", env!("CARGO_PKG_VERSION")),
            format!("SQLite: {}", rusqlite::version()),
            format!(
                "Platform: {}/{}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            format!("Database: {}", config.db_path.display()),
        ],
    );
}

fn prompt<R: BufRead>(input: &mut R, question: &str) -> Result<String> {
    print!("{}  {} ", "┃".bright_magenta(), question.bold());
    io::stdout().flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Error reading input")?;
    Ok(answer.trim().to_string())
}

/// Reads lines until one holding only `.` or end of input
fn read_block<R: BufRead>(input: &mut R) -> Result<String> {
    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line.context("Error reading input")?;
        if line.trim_end() == "." {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let answer = prompt(&mut stdin.lock(), &format!("{} [y/N]:", question))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_id_rejects_non_numbers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes("YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn read_block_stops_at_dot_line() {
        let mut input = Cursor::new("fn main() {\n    todo!()\n}\n.\nleftover\n");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block, "fn main() {\n    todo!()\n}");

        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "leftover\n");
    }

    #[test]
    fn read_block_accepts_eof() {
        let mut input = Cursor::new("one\ntwo");
        assert_eq!(read_block(&mut input).unwrap(), "one\ntwo");
    }

    #[test]
    fn interactive_snippet_prepends_language_and_description() {
        let snippet = build_interactive_snippet(
            "server".to_string(),
            "go",
            "http.ListenAndServe()".to_string(),
            "starts a server",
            "web, api",
        );
        assert_eq!(snippet.tags, vec!["go", "web", "api"]);
        assert_eq!(snippet.content, "// starts a server\nhttp.ListenAndServe()");
    }

    #[test]
    fn interactive_snippet_skips_other_language() {
        let snippet =
            build_interactive_snippet("t".to_string(), "other", "x".to_string(), "", "");
        assert!(snippet.tags.is_empty());
        assert_eq!(snippet.content, "x");
    }

    #[test]
    fn delete_with_force_removes_snippet() {
        let store = SnippetStore::open_in_memory().unwrap();
        let id = store
            .save(&Snippet::new("gone".into(), vec![], String::new()))
            .unwrap();

        delete(&store, &id.to_string(), true).unwrap();
        assert!(store.get_by_id(id).is_err());
        assert!(delete(&store, &id.to_string(), true).is_err());
    }

    #[test]
    fn export_writes_requested_file() {
        let store = SnippetStore::open_in_memory().unwrap();
        store
            .save(&Snippet::new("one".into(), vec!["a".into()], "body".into()))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        export(&store, "markdown", Some(path.clone())).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("## 1. one"));
        assert!(export(&store, "yaml", Some(path)).is_err());
    }

    #[test]
    fn import_with_yes_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        fs::write(
            &path,
            r#"{"version": "1.0", "snippets": [{"title": "a", "tags": ["x"], "content": "1"}]}"#,
        )
        .unwrap();

        let store = SnippetStore::open_in_memory().unwrap();
        import(&store, path, true).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].tags, vec!["x"]);
    }
}
