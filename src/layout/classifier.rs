//! Semantic roles for flow-layout paragraphs.

use regex::Regex;

use crate::model::{Alignment, FlowParagraph, ParagraphRole};

/// Centered text shorter than this (in characters) may be a heading.
const CENTERED_HEADING_MAX_CHARS: usize = 50;

/// A paragraph with its role and the text left after marker stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedParagraph {
    /// Assigned role
    pub role: ParagraphRole,
    /// Display text
    pub text: String,
}

impl ClassifiedParagraph {
    /// Render as a single Markdown line.
    pub fn to_markdown(&self) -> String {
        match self.role {
            ParagraphRole::Heading(level) => {
                format!("{} {}", "#".repeat(level as usize), self.text)
            }
            ParagraphRole::Emphasis => format!("**{}**", self.text),
            ParagraphRole::OrderedItem => format!("1. {}", self.text),
            ParagraphRole::BulletItem => format!("- {}", self.text),
            ParagraphRole::Plain => self.text.clone(),
        }
    }
}

/// Maps paragraphs to roles using the style name, alignment and text shape.
///
/// Rules are tried in order and the first match wins. Ordered items are
/// always renumbered to `1.`, which Markdown renders as a running sequence.
#[derive(Debug, Clone)]
pub struct ParagraphClassifier {
    ordered: Regex,
    lettered: Regex,
    bullet: Regex,
}

impl Default for ParagraphClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ParagraphClassifier {
    /// Create a classifier.
    pub fn new() -> Self {
        Self {
            ordered: Regex::new(r"^\s*\d+[.)]\s+(.+)").expect("static pattern"),
            lettered: Regex::new(r"^\s*[A-Za-z][.)]\s+").expect("static pattern"),
            bullet: Regex::new(r"^\s*[•\-*]\s+").expect("static pattern"),
        }
    }

    /// Classify a paragraph. Returns `None` for blank paragraphs.
    pub fn classify(&self, paragraph: &FlowParagraph) -> Option<ClassifiedParagraph> {
        let text = paragraph.trimmed();
        if text.is_empty() {
            return None;
        }
        let style = paragraph.style_name.as_deref().unwrap_or("");
        Some(self.classify_text(text, style, paragraph.alignment))
    }

    /// Classify already-trimmed, non-empty text.
    pub fn classify_text(&self, text: &str, style: &str, alignment: Alignment) -> ClassifiedParagraph {
        let role_only = |role| ClassifiedParagraph {
            role,
            text: text.to_string(),
        };

        if let Some(level) = heading_level(style) {
            return role_only(ParagraphRole::Heading(level));
        }

        match style.to_lowercase().as_str() {
            "title" => return role_only(ParagraphRole::Heading(1)),
            "subtitle" => return role_only(ParagraphRole::Heading(2)),
            _ => {}
        }

        if alignment == Alignment::Center {
            let short = text.chars().count() < CENTERED_HEADING_MAX_CHARS;
            if short && !text.contains('.') && !text.contains('。') {
                return role_only(ParagraphRole::Heading(2));
            }
            return role_only(ParagraphRole::Emphasis);
        }

        if let Some(caps) = self.ordered.captures(text) {
            return ClassifiedParagraph {
                role: ParagraphRole::OrderedItem,
                text: caps[1].to_string(),
            };
        }

        // Lettered items keep their marker under a bullet
        if self.lettered.is_match(text) {
            return role_only(ParagraphRole::BulletItem);
        }

        if self.bullet.is_match(text) {
            return ClassifiedParagraph {
                role: ParagraphRole::BulletItem,
                text: self.bullet.replace(text, "").into_owned(),
            };
        }

        if let Some(rest) = text.strip_prefix('•') {
            return ClassifiedParagraph {
                role: ParagraphRole::BulletItem,
                text: rest.trim_start().to_string(),
            };
        }

        role_only(ParagraphRole::Plain)
    }
}

/// Level for "Heading N" style names; other heading styles default to 1.
fn heading_level(style: &str) -> Option<u8> {
    let rest = style.strip_prefix("Heading")?;
    match rest.trim().parse::<u8>() {
        Ok(level @ 1..=6) => Some(level),
        _ => Some(1),
    }
}
