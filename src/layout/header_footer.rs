//! Running header, footer and page-number removal for flow documents.
//!
//! Detection needs document-wide repetition counts, so it runs in two
//! stages: [`HeaderFooterFilter::collect`] over every paragraph first, then
//! [`ParagraphCorpus::is_noise`] per paragraph.

use std::collections::HashMap;

use regex::Regex;

/// Paragraphs shorter than this may be dropped for repetition.
const REPEAT_MAX_CHARS: usize = 100;
/// A paragraph repeated more often than this is a running header.
const REPEAT_THRESHOLD: usize = 3;
/// Paragraphs shorter than this may be dropped for legal keywords.
const KEYWORD_MAX_CHARS: usize = 150;
/// Bare numbers up to this length are page numbers.
const PAGE_NUMBER_MAX_DIGITS: usize = 4;

const FOOTER_KEYWORDS: &[&str] = &[
    "版权所有",
    "保留所有权利",
    "all rights reserved",
    "copyright",
    "机密",
    "confidential",
    "内部资料",
];

/// Classifies paragraphs as header/footer noise.
#[derive(Debug, Clone)]
pub struct HeaderFooterFilter {
    page_patterns: Vec<Regex>,
}

impl Default for HeaderFooterFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderFooterFilter {
    /// Create a filter with the built-in page-number patterns.
    pub fn new() -> Self {
        let page_patterns = [
            r"^第\s*\d+\s*页$",
            r"^-\s*\d+\s*-$",
            r"^\d+\s*/\s*\d+$",
            r"(?i)^Page\s+\d+$",
            r"(?i)^\d+\s+of\s+\d+$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect();

        Self { page_patterns }
    }

    /// First stage: count the trimmed text of every non-empty paragraph.
    pub fn collect<'a, I>(&'a self, paragraphs: I) -> ParagraphCorpus<'a>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for p in paragraphs {
            let text = p.as_ref().trim();
            if !text.is_empty() {
                *counts.entry(text.to_string()).or_insert(0) += 1;
            }
        }
        log::debug!(
            "HeaderFooterFilter: collected {} distinct paragraphs",
            counts.len()
        );
        ParagraphCorpus {
            filter: self,
            counts,
        }
    }

    /// Whether `text` looks like a page number on its own.
    pub fn is_page_number(&self, text: &str) -> bool {
        let text = text.trim();
        if !text.is_empty()
            && text.chars().count() <= PAGE_NUMBER_MAX_DIGITS
            && text.chars().all(|c| c.is_ascii_digit())
        {
            return true;
        }
        self.page_patterns.iter().any(|re| re.is_match(text))
    }
}

/// Second stage: document-wide counts ready for classification.
#[derive(Debug, Clone)]
pub struct ParagraphCorpus<'a> {
    filter: &'a HeaderFooterFilter,
    counts: HashMap<String, usize>,
}

impl ParagraphCorpus<'_> {
    /// Number of times `text` occurs (trimmed) in the document.
    pub fn occurrences(&self, text: &str) -> usize {
        self.counts.get(text.trim()).copied().unwrap_or(0)
    }

    /// Whether the paragraph is a running header, footer or page number.
    pub fn is_noise(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        if self.filter.is_page_number(text) {
            return true;
        }

        let len = text.chars().count();
        if len < REPEAT_MAX_CHARS {
            let count = self.occurrences(text);
            if count > REPEAT_THRESHOLD {
                log::debug!("HeaderFooterFilter: repeated {} times: {:.30}", count, text);
                return true;
            }
        }

        if len < KEYWORD_MAX_CHARS {
            let lower = text.to_lowercase();
            if FOOTER_KEYWORDS.iter().any(|k| lower.contains(k)) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_numbers() {
        let filter = HeaderFooterFilter::new();
        assert!(filter.is_page_number("3"));
        assert!(filter.is_page_number("1234"));
        assert!(!filter.is_page_number("12345"));
        assert!(filter.is_page_number("第 12 页"));
        assert!(filter.is_page_number("- 4 -"));
        assert!(filter.is_page_number("3 / 10"));
        assert!(filter.is_page_number("page 7"));
        assert!(filter.is_page_number("PAGE 7"));
        assert!(filter.is_page_number("3 of 10"));
        assert!(!filter.is_page_number("Page seven"));
        assert!(!filter.is_page_number(""));
    }

    #[test]
    fn test_keywords() {
        let filter = HeaderFooterFilter::new();
        let corpus = filter.collect(["Copyright 2024 Example Inc."]);
        assert!(corpus.is_noise("Copyright 2024 Example Inc."));
        assert!(corpus.is_noise("内部资料 请勿外传"));
        assert!(corpus.is_noise("CONFIDENTIAL"));

        let long = format!("{} copyright", "word ".repeat(40));
        assert!(!corpus.is_noise(&long));
    }

    #[test]
    fn test_repetition_threshold() {
        let filter = HeaderFooterFilter::new();
        let mut paragraphs = vec!["ACME Quarterly"; 4];
        paragraphs.extend(["Three times"; 3]);
        paragraphs.push("Body text");
        let corpus = filter.collect(paragraphs);

        assert_eq!(corpus.occurrences("ACME Quarterly"), 4);
        assert!(corpus.is_noise("ACME Quarterly"));
        assert!(!corpus.is_noise("Three times"));
        assert!(!corpus.is_noise("Body text"));
    }

    #[test]
    fn test_long_repeated_text_is_kept() {
        let filter = HeaderFooterFilter::new();
        let long = "a".repeat(120);
        let corpus = filter.collect(vec![long.as_str(); 5]);
        assert!(!corpus.is_noise(&long));
    }

    #[test]
    fn test_blank_is_not_noise() {
        let filter = HeaderFooterFilter::new();
        let corpus = filter.collect(["", "  "]);
        assert!(!corpus.is_noise("   "));
        assert_eq!(corpus.occurrences(""), 0);
    }
}
