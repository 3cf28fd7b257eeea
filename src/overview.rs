//! AI Overview Model
//!
//! Typed view over the `ai_overview` block of a SerpAPI response.
//!
//! SerpAPI documents are loosely shaped: fields go missing, lists come back
//! as `null`, and blocks nest (`list` items, `expandable` sections). Parsing
//! here never fails. Missing or mistyped strings become `""`, missing or
//! mistyped lists become empty, and non-object list entries are skipped.

use serde_json::Value;

/// Key of the AI Overview block in a search response
pub const AI_OVERVIEW: &str = "ai_overview";

/// Kind tag of a text block (`type` in the response)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    List,
    Expandable,
    Other(String),
}

impl BlockKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "heading" => BlockKind::Heading,
            "paragraph" => BlockKind::Paragraph,
            "list" => BlockKind::List,
            "expandable" => BlockKind::Expandable,
            other => BlockKind::Other(other.to_string()),
        }
    }
}

/// A single text block of the overview
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub kind: BlockKind,
    /// Inline heading carried by list items and expandable sections
    pub title: String,
    pub snippet: String,
    /// Nested `list` items followed by nested `text_blocks`
    pub children: Vec<TextBlock>,
}

impl TextBlock {
    pub fn new(kind: BlockKind, snippet: impl Into<String>) -> Self {
        Self {
            kind,
            title: String::new(),
            snippet: snippet.into(),
            children: Vec::new(),
        }
    }

    pub fn heading(snippet: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading, snippet)
    }

    pub fn paragraph(snippet: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, snippet)
    }

    /// A list block whose items are the given children
    pub fn list(items: Vec<TextBlock>) -> Self {
        Self {
            children: items,
            ..Self::new(BlockKind::List, "")
        }
    }

    /// A list item with an inline title
    pub fn item(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::new(BlockKind::Other(String::new()), snippet)
        }
    }

    pub fn is_heading(&self) -> bool {
        self.kind == BlockKind::Heading
    }

    fn from_value(value: &Value) -> Self {
        let mut children: Vec<TextBlock> = objects(value, "list").map(Self::from_value).collect();
        children.extend(objects(value, "text_blocks").map(Self::from_value));

        Self {
            kind: BlockKind::from_tag(&str_field(value, "type")),
            title: str_field(value, "title"),
            snippet: str_field(value, "snippet"),
            children,
        }
    }
}

/// A cited source of the overview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub source: String,
}

impl Reference {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            ..Default::default()
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    fn from_value(value: &Value) -> Self {
        Self {
            title: str_field(value, "title"),
            snippet: str_field(value, "snippet"),
            link: str_field(value, "link"),
            source: str_field(value, "source"),
        }
    }
}

/// The AI Overview block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewBlock {
    pub text_blocks: Vec<TextBlock>,
    pub references: Vec<Reference>,
}

impl OverviewBlock {
    pub fn new(text_blocks: Vec<TextBlock>, references: Vec<Reference>) -> Self {
        Self {
            text_blocks,
            references,
        }
    }

    /// Build an overview from the `ai_overview` object itself
    pub fn from_value(value: &Value) -> Self {
        Self {
            text_blocks: objects(value, "text_blocks").map(TextBlock::from_value).collect(),
            references: objects(value, "references").map(Reference::from_value).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text_blocks.is_empty() && self.references.is_empty()
    }
}

/// Pull the AI Overview out of a full search response, if it has one.
pub fn extract_overview(response: &Value) -> Option<OverviewBlock> {
    response
        .get(AI_OVERVIEW)
        .filter(|v| v.is_object())
        .map(OverviewBlock::from_value)
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn objects<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter(|v| v.is_object())
}
