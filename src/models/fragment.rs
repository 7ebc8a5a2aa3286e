// file: src/models/fragment.rs
// description: raw and classified text fragments flowing through ingestion
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// One unit of extracted text with its font metadata, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    pub text: String,
    pub font_size: f32,
    #[serde(default)]
    pub font_name: Option<String>,
}

impl RawFragment {
    pub fn new(text: impl Into<String>, font_size: f32, font_name: Option<&str>) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_name: font_name.map(str::to_string),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Heading { level: u8 },
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFragment {
    pub text: String,
    pub kind: FragmentKind,
}

impl ClassifiedFragment {
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            kind: FragmentKind::Heading { level },
        }
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FragmentKind::Body,
        }
    }
}

/// A heading and the body text gathered beneath it, before nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSection {
    pub title: String,
    pub content: String,
    pub level: u8,
}
