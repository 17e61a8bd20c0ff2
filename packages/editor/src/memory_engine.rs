//! # Headless Engine
//!
//! In-memory stand-in for the browser editing engine, used by tooling and
//! tests. The document is a flat list of plain-text paragraphs; incoming HTML
//! is reduced to block text, and output is rendered back as `<p>` blocks.

use crate::{ContentSnapshot, EditorEngine, EngineError, EngineEvent, EngineOptions};
use serde_json::{json, Value};
use std::collections::VecDeque;

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "div",
];

/// Paragraph-list engine with a cursor pinned to the end of the document
#[derive(Debug)]
pub struct MemoryEngine {
    blocks: Vec<String>,
    editable: bool,
    focused: bool,
    events: VecDeque<EngineEvent>,
}

impl MemoryEngine {
    /// Construct the engine; `Created` is queued immediately
    pub fn new(options: &EngineOptions) -> Self {
        let mut events = VecDeque::new();
        events.push_back(EngineEvent::Created);

        Self {
            blocks: parse_blocks(&options.content),
            editable: options.editable,
            focused: false,
            events,
        }
    }

    /// Simulate the user typing at the cursor. Ignored when read-only.
    pub fn type_text(&mut self, text: &str) -> bool {
        if !self.editable || text.is_empty() {
            return false;
        }
        self.append_plain(text);
        self.events.push_back(EngineEvent::Updated);
        true
    }

    /// Simulate the user moving focus elsewhere
    pub fn blur(&mut self) {
        if self.focused {
            self.focused = false;
            self.events.push_back(EngineEvent::Blurred);
        }
    }

    /// Plain-text paragraphs of the document
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    fn append_plain(&mut self, text: &str) {
        match self.blocks.last_mut() {
            Some(last) => last.push_str(text),
            None => self.blocks.push(text.to_string()),
        }
    }

    fn render_html(&self) -> String {
        self.blocks
            .iter()
            .map(|block| format!("<p>{}</p>", escape_html(block).replace('\n', "<br>")))
            .collect()
    }

    fn render_json(&self) -> Value {
        let content: Vec<Value> = self
            .blocks
            .iter()
            .map(|block| {
                if block.is_empty() {
                    return json!({ "type": "paragraph" });
                }

                let mut inline = Vec::new();
                for (i, line) in block.split('\n').enumerate() {
                    if i > 0 {
                        inline.push(json!({ "type": "hardBreak" }));
                    }
                    if !line.is_empty() {
                        inline.push(json!({ "type": "text", "text": line }));
                    }
                }
                json!({ "type": "paragraph", "content": inline })
            })
            .collect();

        json!({ "type": "doc", "content": content })
    }
}

impl EditorEngine for MemoryEngine {
    fn set_content(&mut self, content: &str) -> Result<(), EngineError> {
        self.blocks = parse_blocks(content);
        self.events.push_back(EngineEvent::Updated);
        Ok(())
    }

    fn insert_content(&mut self, text: &str) -> Result<(), EngineError> {
        if is_markup(text) {
            let mut incoming = parse_blocks(text).into_iter();
            if let Some(first) = incoming.next() {
                self.append_plain(&first);
            }
            self.blocks.extend(incoming);
        } else {
            self.append_plain(&decode_entities(text));
        }
        self.events.push_back(EngineEvent::Updated);
        Ok(())
    }

    fn clear_content(&mut self) -> Result<(), EngineError> {
        self.blocks = vec![String::new()];
        self.events.push_back(EngineEvent::Updated);
        Ok(())
    }

    fn set_editable(&mut self, editable: bool) -> Result<(), EngineError> {
        self.editable = editable;
        Ok(())
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn focus(&mut self) -> Result<(), EngineError> {
        if !self.focused {
            self.focused = true;
            self.events.push_back(EngineEvent::Focused);
        }
        Ok(())
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn snapshot(&self) -> ContentSnapshot {
        ContentSnapshot {
            html: self.render_html(),
            text: self.blocks.join("\n\n"),
            json: self.render_json(),
            is_empty: self.blocks.len() == 1 && self.blocks[0].is_empty(),
        }
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }
}

/// Reduce HTML (or plain text) to paragraph text
fn parse_blocks(source: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    let mut chars = source.chars().peekable();
    let markup = is_markup(source);

    while let Some(c) = chars.next() {
        if c != '<' || !chars.peek().copied().is_some_and(opens_tag) {
            if current.is_none() && c.is_whitespace() && markup {
                continue;
            }
            current.get_or_insert_with(String::new).push(c);
            continue;
        }

        let tag: String = chars.by_ref().take_while(|&c| c != '>').collect();
        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if name == "br" {
            current.get_or_insert_with(String::new).push('\n');
        } else if BLOCK_TAGS.contains(&name.as_str()) {
            if closing {
                if let Some(text) = current.take() {
                    blocks.push(text);
                }
            } else {
                if let Some(text) = current.take().filter(|t| !t.is_empty()) {
                    blocks.push(text);
                }
                current = Some(String::new());
            }
        }
    }

    if let Some(text) = current.filter(|t| !t.trim().is_empty()) {
        blocks.push(text);
    }
    if blocks.is_empty() {
        blocks.push(String::new());
    }

    blocks.iter().map(|b| decode_entities(b)).collect()
}

/// A `<` starts a tag only when followed by a letter, `/` or `!`
fn opens_tag(next: char) -> bool {
    next.is_ascii_alphabetic() || next == '/' || next == '!'
}

fn is_markup(source: &str) -> bool {
    source
        .char_indices()
        .any(|(i, c)| c == '<' && source[i + 1..].chars().next().is_some_and(opens_tag))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
