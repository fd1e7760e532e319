use std::collections::HashMap;

use crate::models::Snippet;

/// How often a single tag is used across the collection
#[derive(Debug, Clone, PartialEq)]
pub struct TagUsage {
    pub tag: String,
    pub count: usize,
    /// Share of snippets carrying the tag, 0-100
    pub percentage: f64,
}

/// Aggregate numbers shown by `snip stats`
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetStats {
    pub total_snippets: usize,
    pub total_tags: usize,
    pub tags: Vec<TagUsage>,
}

impl SnippetStats {
    pub fn from_snippets(snippets: &[Snippet]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut total_tags = 0;

        for snippet in snippets {
            for tag in &snippet.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
                total_tags += 1;
            }
        }

        let total_snippets = snippets.len();
        let mut tags: Vec<TagUsage> = counts
            .into_iter()
            .map(|(tag, count)| TagUsage {
                tag: tag.to_string(),
                count,
                percentage: if total_snippets == 0 {
                    0.0
                } else {
                    count as f64 / total_snippets as f64 * 100.0
                },
            })
            .collect();

        // Most used first, alphabetical among equals
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));

        Self {
            total_snippets,
            total_tags,
            tags,
        }
    }

    pub fn unique_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn average_tags(&self) -> f64 {
        if self.total_snippets == 0 {
            return 0.0;
        }
        self.total_tags as f64 / self.total_snippets as f64
    }

    pub fn top_tags(&self, limit: usize) -> &[TagUsage] {
        &self.tags[..self.tags.len().min(limit)]
    }
}
