//! Mention Analyzer
//!
//! Scans an AI Overview for a company name and produces a [`MentionReport`].
//!
//! Matching is a case-insensitive substring check with no word boundaries,
//! so `"Acme"` matches `"acme-powered"`. Counting is per block: a heading,
//! snippet or reference counts once no matter how many times the name
//! appears inside it.
//!
//! Only headings and references decide `mentioned`. Snippet matches are
//! reported as an extra category.

use serde::Serialize;
use tracing::debug;

use crate::overview::{OverviewBlock, Reference, TextBlock};

/// Which reference field carried the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceField {
    Title,
    Snippet,
}

impl std::fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceField::Title => write!(f, "title"),
            ReferenceField::Snippet => write!(f, "snippet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedHeading {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedReference {
    pub title: String,
    pub link: String,
    pub field: ReferenceField,
}

/// Where and how often a company shows up in an overview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MentionReport {
    pub company: String,
    pub mentioned: bool,
    pub mentioned_in_heading: bool,
    pub mentioned_in_snippet: bool,
    pub mentioned_in_reference: bool,
    pub heading_matches: usize,
    pub snippet_matches: usize,
    pub reference_matches: usize,
    /// Matched headings in document order
    pub headings: Vec<MatchedHeading>,
    /// Matched references in document order
    pub references: Vec<MatchedReference>,
}

pub struct MentionAnalyzer {
    company: String,
    needle: String,
}

impl MentionAnalyzer {
    pub fn new(company: &str) -> Self {
        Self {
            company: company.to_string(),
            needle: company.to_lowercase(),
        }
    }

    /// Analyze an overview. An absent overview yields an all-zero report.
    pub fn analyze(&self, overview: Option<&OverviewBlock>) -> MentionReport {
        let mut report = MentionReport {
            company: self.company.clone(),
            ..Default::default()
        };

        if let Some(overview) = overview {
            for block in &overview.text_blocks {
                self.scan_block(block, &mut report);
            }
            for reference in &overview.references {
                self.scan_reference(reference, &mut report);
            }
        }

        report.mentioned_in_heading = report.heading_matches > 0;
        report.mentioned_in_snippet = report.snippet_matches > 0;
        report.mentioned_in_reference = report.reference_matches > 0;
        // Snippet matches are reported but do not count as a mention
        report.mentioned = report.mentioned_in_heading || report.mentioned_in_reference;

        debug!(
            company = %self.company,
            headings = report.heading_matches,
            snippets = report.snippet_matches,
            references = report.reference_matches,
            "Overview analyzed"
        );

        report
    }

    fn contains(&self, text: &str) -> bool {
        // An empty needle would match everything
        !self.needle.is_empty() && text.to_lowercase().contains(&self.needle)
    }

    fn scan_block(&self, block: &TextBlock, report: &mut MentionReport) {
        let heading_text = if self.contains(&block.title) {
            Some(&block.title)
        } else if block.is_heading() && self.contains(&block.snippet) {
            Some(&block.snippet)
        } else {
            None
        };

        if let Some(text) = heading_text {
            report.heading_matches += 1;
            report.headings.push(MatchedHeading { text: text.clone() });
        }

        if !block.is_heading() && self.contains(&block.snippet) {
            report.snippet_matches += 1;
        }

        for child in &block.children {
            self.scan_block(child, report);
        }
    }

    fn scan_reference(&self, reference: &Reference, report: &mut MentionReport) {
        let field = if self.contains(&reference.title) {
            ReferenceField::Title
        } else if self.contains(&reference.snippet) {
            ReferenceField::Snippet
        } else {
            return;
        };

        report.reference_matches += 1;
        report.references.push(MatchedReference {
            title: reference.title.clone(),
            link: reference.link.clone(),
            field,
        });
    }
}

/// Convenience wrapper around [`MentionAnalyzer`].
pub fn analyze(overview: Option<&OverviewBlock>, company: &str) -> MentionReport {
    MentionAnalyzer::new(company).analyze(overview)
}
