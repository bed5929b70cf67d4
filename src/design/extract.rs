// Pulling a JSON object out of free-form model output
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Ways of locating a JSON object in model text, tried in the order of [`Extraction::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// A ```` ```json ```` fenced block.
    FencedJson,
    /// A plain ```` ``` ```` fenced block.
    FencedPlain,
    /// The first `{` through its balanced closing `}`.
    BraceSpan,
}

impl Extraction {
    pub const ORDER: [Extraction; 3] = [
        Extraction::FencedJson,
        Extraction::FencedPlain,
        Extraction::BraceSpan,
    ];

    pub fn candidate<'a>(&self, text: &'a str) -> Option<&'a str> {
        match self {
            Extraction::FencedJson => capture(fenced_json(), text),
            Extraction::FencedPlain => capture(fenced_plain(), text),
            Extraction::BraceSpan => balanced_object(text),
        }
    }
}

/// First strategy that yields a parseable JSON object wins.
pub fn extract_json_object(text: &str) -> Option<(Extraction, Value)> {
    Extraction::ORDER.iter().find_map(|strategy| {
        let candidate = strategy.candidate(text)?;
        match serde_json::from_str::<Value>(candidate.trim()) {
            Ok(value) if value.is_object() => Some((*strategy, value)),
            _ => None,
        }
    })
}

/// Substring from the first `{` to the `}` that closes it. Braces inside JSON strings
/// do not count.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").expect("valid regex"))
}

fn fenced_plain() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```[ \t]*\r?\n(.*?)\r?\n[ \t]*```").expect("valid regex"))
}
