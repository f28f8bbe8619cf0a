//! Case-insensitive keyword sets backed by Aho-Corasick

use aho_corasick::{AhoCorasick, MatchKind};
use log::warn;
use std::collections::HashSet;

/// A fixed list of keywords matched as plain substrings, ignoring case.
///
/// Every keyword counts once per text no matter how often it occurs, and
/// overlapping keywords ("rag" inside "leverage") are each reported.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let matcher = if keywords.is_empty() {
            None
        } else {
            match AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&keywords)
            {
                Ok(ac) => Some(ac),
                Err(e) => {
                    warn!("Keyword automaton unavailable, scanning linearly: {}", e);
                    None
                }
            }
        };

        Self { keywords, matcher }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Indexes of the keywords present in `text`
    fn present(&self, text: &str) -> HashSet<usize> {
        let text = text.to_lowercase();
        match &self.matcher {
            Some(ac) => ac
                .find_overlapping_iter(&text)
                .map(|m| m.pattern().as_usize())
                .collect(),
            None => self
                .keywords
                .iter()
                .enumerate()
                .filter(|(_, k)| text.contains(k.as_str()))
                .map(|(i, _)| i)
                .collect(),
        }
    }

    pub fn matches_any(&self, text: &str) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        match &self.matcher {
            Some(ac) => ac.is_match(&text.to_lowercase()),
            None => !self.present(text).is_empty(),
        }
    }

    /// Number of distinct keywords present in `text`
    pub fn count_present(&self, text: &str) -> usize {
        self.present(text).len()
    }

    /// Keywords present in `text`, in list order
    pub fn found(&self, text: &str) -> Vec<&str> {
        let present = self.present(text);
        self.keywords
            .iter()
            .enumerate()
            .filter(|(i, _)| present.contains(i))
            .map(|(_, k)| k.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_substring_match() {
        let set = KeywordSet::new(["Senior", "5+ years"]);
        assert!(set.matches_any("SENIOR ML Engineer"));
        assert!(set.matches_any("requires 5+ YEARS of experience"));
        assert!(!set.matches_any("ML Intern"));
    }

    #[test]
    fn test_counts_each_keyword_once() {
        let set = KeywordSet::new(["llm", "rag", "agent"]);
        assert_eq!(set.count_present("LLM LLM llm and more LLMs"), 1);
        assert_eq!(set.count_present("RAG agents built on LLMs"), 3);
    }

    #[test]
    fn test_overlapping_keywords_all_count() {
        let set = KeywordSet::new(["lang", "langchain", "chain"]);
        assert_eq!(set.count_present("LangChain"), 3);
        assert_eq!(set.found("langchain"), vec!["lang", "langchain", "chain"]);
    }

    #[test]
    fn test_substring_inside_longer_word() {
        let set = KeywordSet::new(["rag"]);
        assert!(set.matches_any("We leverage data"));
    }

    #[test]
    fn test_blank_keywords_are_ignored() {
        let set = KeywordSet::new(["", "  ", "ai"]);
        assert_eq!(set.len(), 1);
        assert!(!KeywordSet::new(Vec::<String>::new()).matches_any("anything"));
    }

    #[test]
    fn test_unicode_case_folding() {
        let set = KeywordSet::new(["ÉQUIPE"]);
        assert!(set.matches_any("notre équipe IA"));
    }
}
