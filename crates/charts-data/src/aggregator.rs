//! Frequency counts over the list-valued video columns.
//!
//! `categories` is counted label by label; `tags` is split into words first,
//! the way a word cloud would see it.

use std::collections::HashMap;
use std::sync::OnceLock;

use charts_core::error::Result;
use charts_core::models::{parse_list_cell, CategoryCount, VideoTable};
use regex::Regex;
use tracing::debug;

/// Common English words left out of the tag frequency chart.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
    "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "just", "me", "more", "my", "no", "not", "of", "on", "or", "our", "out", "she", "so",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "to", "too", "up", "us", "very", "was", "we", "were", "what", "when", "where", "which",
    "who", "why", "will", "with", "would", "you", "your",
];

/// Words of two or more characters; single letters are dropped.
fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w[\w']+").expect("valid word regex"))
}

// ── FrequencyCounter ──────────────────────────────────────────────────────────

/// Counts labels while remembering the order in which each was first seen.
#[derive(Debug, Default)]
pub struct FrequencyCounter {
    counts: Vec<CategoryCount>,
    index: HashMap<String, usize>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`.
    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.counts[i].count += 1,
            None => {
                self.index.insert(label.to_string(), self.counts.len());
                self.counts.push(CategoryCount::new(label, 1));
            }
        }
    }

    /// Sum of all counted occurrences.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// The `k` most frequent labels, highest count first.
    ///
    /// Equal counts keep first-encounter order.
    pub fn top(mut self, k: usize) -> Vec<CategoryCount> {
        self.counts.sort_by(|a, b| b.count.cmp(&a.count));
        self.counts.truncate(k);
        self.counts
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// The `k` most common video categories.
pub fn top_categories(table: &VideoTable, k: usize) -> Result<Vec<CategoryCount>> {
    table.require("categories")?;

    let mut counter = FrequencyCounter::new();
    for video in table {
        for label in video.categories() {
            counter.add(&label);
        }
    }

    debug!(
        "Counted {} category labels across {} videos",
        counter.total(),
        table.len()
    );
    Ok(counter.top(k))
}

/// The `k` most frequent words across all video tags.
///
/// Words are lower-cased; numbers and [`STOP_WORDS`] are skipped.
pub fn top_tags(table: &VideoTable, k: usize) -> Result<Vec<CategoryCount>> {
    table.require("tags")?;

    let mut counter = FrequencyCounter::new();
    for video in table {
        for tag in parse_list_cell(&video.tags) {
            for word in tag_words(&tag) {
                counter.add(&word);
            }
        }
    }

    debug!("Counted {} tag words", counter.total());
    Ok(counter.top(k))
}

/// Split one tag into countable words.
fn tag_words(tag: &str) -> Vec<String> {
    word_re()
        .find_iter(tag)
        .map(|m| m.as_str().trim_end_matches('\'').to_lowercase())
        .filter(|word| !word.is_empty())
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use charts_core::error::ChartsError;
    use charts_core::models::{Table, VideoRecord};

    fn videos(cells: &[(&str, &str)]) -> VideoTable {
        let rows = cells
            .iter()
            .map(|&(categories, tags)| VideoRecord {
                categories: categories.to_string(),
                tags: tags.to_string(),
                ..Default::default()
            })
            .collect();
        Table::new(
            "videos",
            vec!["categories".to_string(), "tags".to_string()],
            rows,
        )
    }

    // ── FrequencyCounter ──────────────────────────────────────────────────────

    #[test]
    fn test_counter_ties_keep_first_seen_order() {
        let mut counter = FrequencyCounter::new();
        for label in ["b", "a", "c", "a", "b"] {
            counter.add(label);
        }
        assert_eq!(counter.total(), 5);
        let top = counter.top(10);
        assert_eq!(
            top,
            vec![
                CategoryCount::new("b", 2),
                CategoryCount::new("a", 2),
                CategoryCount::new("c", 1),
            ]
        );
    }

    // ── top_categories ────────────────────────────────────────────────────────

    #[test]
    fn test_top_categories_example() {
        let t = videos(&[
            ("['Pop']", ""),
            ("['Pop', 'HipHop']", ""),
            ("['HipHop']", ""),
        ]);
        assert_eq!(
            top_categories(&t, 2).unwrap(),
            vec![CategoryCount::new("Pop", 2), CategoryCount::new("HipHop", 2)]
        );
    }

    #[test]
    fn test_top_categories_truncates_and_sorts() {
        let t = videos(&[
            ("['Afrobeats']", ""),
            ("['Gospel', 'Pop']", ""),
            ("['Pop', 'Afrobeats']", ""),
            ("['Pop']", ""),
        ]);
        let top = top_categories(&t, 2).unwrap();
        assert_eq!(
            top,
            vec![
                CategoryCount::new("Pop", 3),
                CategoryCount::new("Afrobeats", 2)
            ]
        );
    }

    #[test]
    fn test_top_categories_skips_empty_rows() {
        let t = videos(&[("", ""), ("[]", ""), ("Gospel", "")]);
        assert_eq!(
            top_categories(&t, 5).unwrap(),
            vec![CategoryCount::new("Gospel", 1)]
        );
    }

    #[test]
    fn test_top_categories_fewer_than_k() {
        let t = videos(&[("['Pop']", "")]);
        assert_eq!(top_categories(&t, 5).unwrap().len(), 1);
        assert!(top_categories(&videos(&[]), 5).unwrap().is_empty());
    }

    #[test]
    fn test_top_categories_counts_bounded_by_occurrences() {
        let t = videos(&[
            ("['a', 'b', 'c']", ""),
            ("['c', 'd']", ""),
            ("['e']", ""),
        ]);
        let top = top_categories(&t, 3).unwrap();
        let sum: u64 = top.iter().map(|c| c.count).sum();
        assert!(top.len() <= 3);
        assert!(sum <= 6);
        for pair in top.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_top_categories_wikipedia_labels() {
        let t = videos(&[
            ("['https://en.wikipedia.org/wiki/Pop_music']", ""),
            ("['https://en.wikipedia.org/wiki/Pop_music', 'https://en.wikipedia.org/wiki/Music']", ""),
        ]);
        assert_eq!(
            top_categories(&t, 5).unwrap(),
            vec![
                CategoryCount::new("Pop music", 2),
                CategoryCount::new("Music", 1)
            ]
        );
    }

    #[test]
    fn test_top_categories_missing_column() {
        let t: VideoTable = Table::new("videos", vec!["title".to_string()], vec![]);
        assert!(matches!(
            top_categories(&t, 5),
            Err(ChartsError::Schema { .. })
        ));
    }

    // ── top_tags ──────────────────────────────────────────────────────────────

    #[test]
    fn test_top_tags_counts_words() {
        let t = videos(&[
            ("", "['Drama T', 'Burundi music']"),
            ("", "['burundi', 'the best of 2023']"),
        ]);
        let top = top_tags(&t, 20).unwrap();
        assert_eq!(top[0], CategoryCount::new("burundi", 2));
        let labels: Vec<&str> = top.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["burundi", "drama", "music", "best"]);
    }

    #[test]
    fn test_top_tags_keeps_inner_apostrophes() {
        let t = videos(&[("", "[\"n'amahoro\", \"kirundi\"]")]);
        let labels: Vec<String> = top_tags(&t, 5)
            .unwrap()
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["n'amahoro", "kirundi"]);
    }

    #[test]
    fn test_top_tags_limit() {
        let t = videos(&[("", "['one two three four five']")]);
        assert_eq!(top_tags(&t, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_tag_words_filters_noise() {
        assert_eq!(tag_words("Hits of 2023"), vec!["hits"]);
        assert!(tag_words("   ").is_empty());
    }

    #[test]
    fn test_tag_words_drops_single_letters() {
        assert_eq!(tag_words("Drama T x 2 Ok"), vec!["drama", "ok"]);
    }
}
