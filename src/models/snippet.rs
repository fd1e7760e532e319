use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A titled, tagged block of text stored in the snippet database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Assigned by the store on save; `0` until then
    pub id: i64,
    pub title: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

impl Snippet {
    pub fn new(title: String, tags: Vec<String>, content: String) -> Self {
        Self {
            id: 0,
            title,
            tags,
            created_at: Utc::now().trunc_subsecs(0),
            content,
        }
    }

    /// Splits a user supplied comma list into tags, dropping blank entries
    pub fn parse_tags(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    }

    /// Single line preview of the content, truncated to `max_chars` characters
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.content.replace('\n', " ");
        if flat.chars().count() <= max_chars {
            return flat;
        }

        let keep = max_chars.saturating_sub(3);
        let mut preview: String = flat.chars().take(keep).collect();
        preview.push_str("...");
        preview
    }

    pub fn get_line_count(&self) -> usize {
        self.content.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snippet_has_whole_second_timestamp() {
        let snippet = Snippet::new("t".into(), vec![], "c".into());
        assert_eq!(snippet.id, 0);
        assert_eq!(snippet.created_at.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn parse_tags_trims_and_drops_blanks() {
        assert_eq!(
            Snippet::parse_tags(" rust, cli ,,  "),
            vec!["rust".to_string(), "cli".to_string()]
        );
        assert!(Snippet::parse_tags("").is_empty());
    }

    #[test]
    fn preview_flattens_and_truncates() {
        let snippet = Snippet::new("t".into(), vec![], "line one\nline two".into());
        assert_eq!(snippet.preview(100), "line one line two");
        assert_eq!(snippet.preview(10), "line on...");
        assert_eq!(snippet.get_line_count(), 2);
    }
}
