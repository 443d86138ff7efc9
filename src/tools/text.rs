//! Small text helpers for drafting titles, slugs and meta descriptions.

use super::{Tool, ToolError, ToolParam, ToolValue};

const TEXT: &[ToolParam] = &[ToolParam {
    name: "text",
    kind: "string",
    variadic: true,
}];

fn joined(args: &[ToolValue]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct WordCount;

impl Tool for WordCount {
    fn name(&self) -> &'static str {
        "word_count"
    }

    fn description(&self) -> &'static str {
        "Count the words in a piece of text."
    }

    fn params(&self) -> &'static [ToolParam] {
        TEXT
    }

    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError> {
        Ok(ToolValue::Int(joined(args).split_whitespace().count() as i64))
    }
}

pub struct CharCount;

impl Tool for CharCount {
    fn name(&self) -> &'static str {
        "char_count"
    }

    fn description(&self) -> &'static str {
        "Count characters in a text, e.g. to keep a meta description under 160."
    }

    fn params(&self) -> &'static [ToolParam] {
        TEXT
    }

    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError> {
        Ok(ToolValue::Int(joined(args).chars().count() as i64))
    }
}

pub struct Slugify;

impl Tool for Slugify {
    fn name(&self) -> &'static str {
        "slugify"
    }

    fn description(&self) -> &'static str {
        "Turn a title into a lowercase URL slug."
    }

    fn params(&self) -> &'static [ToolParam] {
        TEXT
    }

    fn call(&self, args: &[ToolValue]) -> Result<ToolValue, ToolError> {
        let mut slug = String::new();
        let mut pending_dash = false;
        for c in joined(args).chars() {
            if c.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        Ok(ToolValue::Str(slug))
    }
}
