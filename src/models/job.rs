//! Job links, keyword sets, match results and the pending queue.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Absolute URL identifying one job posting.
pub type JobLink = String;

/// Lower-cased keywords, in the order the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Build a keyword set, lower-casing each entry.
    ///
    /// Entries are otherwise kept as given, so surrounding spaces take part
    /// in matching. Empty entries and repeats are dropped; first occurrence
    /// wins.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .filter(|k| seen.insert(k.clone()))
            .collect();
        Self(keywords)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Keywords contained in `text`, which must already be lower-cased.
    pub fn found_in(&self, text: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .cloned()
            .collect()
    }
}

/// A job posting whose description mentions at least one keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    /// Page title, or the link when the page has none
    pub title: String,

    /// Full URL to the posting
    pub link: JobLink,

    /// Matched keywords in caller order
    pub found_keywords: Vec<String>,
}

/// Links waiting to be scanned, persisted as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingQueue(Vec<JobLink>);

impl PendingQueue {
    pub fn new(links: Vec<JobLink>) -> Self {
        Self(links)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn links(&self) -> &[JobLink] {
        &self.0
    }

    /// Split off the first `batch_size` links; the rest stay queued.
    pub fn split_batch(mut self, batch_size: usize) -> (Vec<JobLink>, PendingQueue) {
        let remainder = self.0.split_off(batch_size.min(self.0.len()));
        (self.0, PendingQueue(remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_set_normalizes_and_keeps_order() {
        let set = KeywordSet::new(["Python", " AWS ", "", "python", "remote"]);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["python", " aws ", "remote"]
        );
    }

    #[test]
    fn padded_keyword_matches_only_with_its_padding() {
        let set = KeywordSet::new([" go "]);
        assert!(set.found_in("we use google docs").is_empty());
        assert_eq!(set.found_in("we write go daily"), vec![" go "]);
    }

    #[test]
    fn found_in_preserves_caller_order() {
        let set = KeywordSet::new(["remote", "django", "python"]);
        let found = set.found_in("we use python and django, fully remote");
        assert_eq!(found, vec!["remote", "django", "python"]);
        assert!(set.found_in("java shop").is_empty());
    }

    #[test]
    fn split_batch_takes_prefix() {
        let queue = PendingQueue::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        let (batch, rest) = queue.split_batch(2);
        assert_eq!(batch, vec!["a", "b"]);
        assert_eq!(rest.links(), ["c", "d"]);
    }

    #[test]
    fn split_batch_larger_than_queue_empties_it() {
        let queue = PendingQueue::new(vec!["a".into()]);
        let (batch, rest) = queue.split_batch(5);
        assert_eq!(batch, vec!["a"]);
        assert!(rest.is_empty());
    }

    #[test]
    fn pending_queue_is_a_json_array() {
        let queue = PendingQueue::new(vec!["https://example.com/job/1".into()]);
        let json = serde_json::to_string(&queue).unwrap();
        assert_eq!(json, r#"["https://example.com/job/1"]"#);
        let back: PendingQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, queue);
    }
}
