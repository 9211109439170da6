//! Action parser — turns raw model output into a [`ParsedOutput`].
//!
//! Expected shape:
//!
//! ```text
//! Thought: <free text>
//! Action: name(key='value', key2="value2")
//! ```
//!
//! Parsing never fails. Anything that does not fit the grammar degrades to an
//! empty thought and/or a `None` action.

use crate::action::{Action, ActionKind, ParsedOutput};

const THOUGHT_MARKER: &str = "Thought:";
const ACTION_MARKER: &str = "Action:";

/// Split model output into its thought and action parts.
pub fn parse(model_output: &str) -> ParsedOutput {
    let thought = extract_thought(model_output);
    let action = model_output
        .find(ACTION_MARKER)
        .map(|at| model_output[at + ACTION_MARKER.len()..].trim())
        .filter(|decl| !decl.is_empty())
        .and_then(parse_action);

    log::debug!(
        "Parser: thought={} chars, action={}",
        thought.chars().count(),
        action.as_ref().map_or_else(|| "none".to_string(), |a| a.to_string())
    );

    ParsedOutput { thought, action }
}

/// Text between `Thought:` and the first following `Action:`.
///
/// Output with neither marker is treated as all thought.
fn extract_thought(text: &str) -> String {
    match text.find(THOUGHT_MARKER) {
        Some(at) => {
            let rest = &text[at + THOUGHT_MARKER.len()..];
            let end = rest.find(ACTION_MARKER).unwrap_or(rest.len());
            rest[..end].trim().to_string()
        }
        None if text.contains(ACTION_MARKER) => String::new(),
        None => text.trim().to_string(),
    }
}

/// Parse a single declaration such as `click(start_box='[10, 20, 30, 40]')`.
///
/// Returns `None` when the text is not of the form `name(...)`. Names outside
/// the vocabulary produce an [`ActionKind::Unknown`] action carrying the raw
/// text. For known kinds only the parameters in the kind's schema are kept.
pub fn parse_action(decl: &str) -> Option<Action> {
    let decl = decl.trim();

    let name_len = decl
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(decl.len(), |(i, _)| i);
    if name_len == 0 {
        return None;
    }
    let name = &decl[..name_len];
    let after_name = &decl[name_len..];
    if !after_name.starts_with('(') {
        return None;
    }
    // Arguments run to the last closing paren; trailing chatter after it is ignored.
    let close = after_name.rfind(')')?;
    let args = &after_name[1..close];

    let kind = ActionKind::from_name(name);
    if kind == ActionKind::Unknown {
        log::warn!("Parser: unknown action '{name}'");
        return Some(Action::unknown(decl));
    }

    let mut action = Action::new(kind);
    for (key, value) in ArgScanner::new(args) {
        if kind.accepts(&key) && !action.params.contains_key(&key) {
            action.params.insert(key, value);
        }
    }
    Some(action)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Iterates `key=value` pairs of an argument list.
///
/// Values are either quoted with `'` or `"` (the quote may appear inside the
/// value when backslash-escaped) or bare, running to the next comma. Scanning
/// stops at the first token that does not fit.
struct ArgScanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> ArgScanner<'a> {
    fn new(args: &'a str) -> Self {
        Self { chars: args.chars().peekable() }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn skip_separators(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}
    }

    fn key(&mut self) -> Option<String> {
        let mut key = String::new();
        while let Some(c) = self.chars.next_if(|c| is_ident_char(*c)) {
            key.push(c);
        }
        (!key.is_empty()).then_some(key)
    }

    fn quoted(&mut self, quote: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.chars.next()? {
                c if c == quote => return Some(value),
                '\\' => match self.chars.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c @ ('\\' | '\'' | '"')) => value.push(c),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => {
                        value.push('\\');
                    }
                },
                c => value.push(c),
            }
        }
    }

    fn bare(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.chars.next_if(|c| *c != ',') {
            value.push(c);
        }
        value.trim_end().to_string()
    }
}

impl Iterator for ArgScanner<'_> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_separators();
        let key = self.key()?;
        self.skip_whitespace();
        self.chars.next_if_eq(&'=')?;
        self.skip_whitespace();
        let value = match self.chars.next_if(|c| *c == '\'' || *c == '"') {
            Some(quote) => self.quoted(quote)?,
            None => self.bare(),
        };
        Some((key, value))
    }
}
