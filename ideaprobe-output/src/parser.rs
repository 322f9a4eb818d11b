//! Response extraction.
//!
//! Pulls JSON documents out of free-form model text. Two phases run in
//! order:
//!
//! 1. **Fenced block**: the first ```` ```json ```` fence is parsed and, if it
//!    holds an object or an array, returned on its own.
//! 2. **Brace scan**: collects every balanced `{...}` span that parses as a
//!    JSON object, in order of appearance. A span left open at end of text
//!    is dropped and the scan resumes after its opening brace.
//!
//! Malformed or truncated JSON never raises. It is simply left out.

use serde_json::Value as JsonValue;
use tracing::debug;

const FENCE: &str = "```";
const JSON_TAG: &[u8] = b"json";

/// Extract JSON documents from model text.
///
/// Returns `None` when nothing parseable was found, which is distinct from a
/// fenced empty array (`Some(vec![])`).
///
/// # Example
///
/// ```rust
/// use ideaprobe_output::extract;
/// use serde_json::json;
///
/// let text = r#"noise {"a": {"b": 1}} trailing { unrelated"#;
/// assert_eq!(extract(text), Some(vec![json!({"a": {"b": 1}})]));
/// assert_eq!(extract("no json here"), None);
/// ```
pub fn extract(text: &str) -> Option<Vec<JsonValue>> {
    if let Some(documents) = extract_fenced(text) {
        return Some(documents);
    }

    let documents = scan_objects(text);
    if documents.is_empty() {
        None
    } else {
        Some(documents)
    }
}

/// Extract only the first document.
pub fn extract_first(text: &str) -> Option<JsonValue> {
    extract(text).and_then(|documents| documents.into_iter().next())
}

/// Parse the first ```` ```json ```` block.
///
/// An object yields one document, an array yields its elements. Anything
/// else, including a parse failure, defers to the brace scan.
fn extract_fenced(text: &str) -> Option<Vec<JsonValue>> {
    let body = find_json_fence(text)?;

    match serde_json::from_str::<JsonValue>(body) {
        Ok(JsonValue::Array(items)) => Some(items),
        Ok(value @ JsonValue::Object(_)) => Some(vec![value]),
        Ok(_) => {
            debug!("Fenced JSON block holds a scalar, falling back to brace scan");
            None
        }
        Err(e) => {
            debug!(error = %e, "Fenced JSON block failed to parse, falling back to brace scan");
            None
        }
    }
}

/// Locate the interior of the first ```` ```json ```` fence (tag matched
/// ASCII-case-insensitively).
fn find_json_fence(text: &str) -> Option<&str> {
    let mut from = 0;

    while let Some(pos) = text[from..].find(FENCE) {
        let after = from + pos + FENCE.len();
        let rest = &text[after..];

        if rest.len() >= JSON_TAG.len()
            && rest.as_bytes()[..JSON_TAG.len()].eq_ignore_ascii_case(JSON_TAG)
        {
            let body = &rest[JSON_TAG.len()..];
            let end = body.find(FENCE)?;
            return Some(body[..end].trim());
        }

        from = after;
    }

    None
}

/// An open `{` whose matching `}` has not been seen yet.
#[derive(Debug)]
struct Frame {
    start: usize,
    /// Valid objects nested inside this span, kept in case the span itself
    /// turns out not to be valid JSON.
    nested: Vec<JsonValue>,
}

/// Brace-matching state machine.
///
/// String and escape state is only tracked inside braces; quotes in the
/// surrounding prose are ignored.
#[derive(Debug, Default)]
struct BraceScanner {
    stack: Vec<Frame>,
    in_string: bool,
    escaped: bool,
    found: Vec<JsonValue>,
}

impl BraceScanner {
    fn feed(&mut self, text: &str, index: usize, c: char) {
        if self.stack.is_empty() {
            if c == '{' {
                self.open(index);
            }
            return;
        }

        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            return;
        }

        match c {
            '"' => self.in_string = true,
            '{' => self.open(index),
            '}' => self.close(text, index),
            _ => {}
        }
    }

    fn open(&mut self, start: usize) {
        self.stack.push(Frame {
            start,
            nested: Vec::new(),
        });
    }

    fn close(&mut self, text: &str, end: usize) {
        let Some(frame) = self.stack.pop() else {
            return;
        };

        let span = &text[frame.start..=end];
        let resolved = match serde_json::from_str::<JsonValue>(span) {
            Ok(value @ JsonValue::Object(_)) => vec![value],
            _ => frame.nested,
        };
        self.release(resolved);
    }

    /// Hand resolved documents to the enclosing frame, or to the output once
    /// back at the top level.
    fn release(&mut self, documents: Vec<JsonValue>) {
        match self.stack.last_mut() {
            Some(parent) => parent.nested.extend(documents),
            None => self.found.extend(documents),
        }
    }

    /// Objects found so far, plus the start of the outermost span still open
    /// at end of text.
    fn finish(self) -> (Vec<JsonValue>, Option<usize>) {
        let unterminated = self.stack.first().map(|frame| frame.start);
        (self.found, unterminated)
    }
}

/// Collect every balanced `{...}` span that parses as a JSON object.
///
/// A span still open at end of text is either truncated output or a
/// malformed candidate whose stray quote swallowed the rest of the text.
/// Either way it is dropped and the scan resumes just after its opening
/// brace with fresh string state.
fn scan_objects(text: &str) -> Vec<JsonValue> {
    let mut found = Vec::new();
    let mut from = 0;

    loop {
        let mut scanner = BraceScanner::default();
        for (offset, c) in text[from..].char_indices() {
            scanner.feed(text, from + offset, c);
        }

        let (documents, unterminated) = scanner.finish();
        found.extend(documents);
        match unterminated {
            Some(start) => from = start + 1,
            None => return found,
        }
    }
}
