//! Action vocabulary — the closed set of UI actions a model may declare, and
//! the per-kind parameter schema shared by the parser and the executor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const START_BOX: &str = "start_box";
pub const END_BOX: &str = "end_box";
pub const KEY: &str = "key";
pub const CONTENT: &str = "content";
pub const DIRECTION: &str = "direction";

/// One declared parameter of an action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
}

const fn required(name: &'static str) -> ParamSpec {
    ParamSpec { name, required: true }
}

const fn optional(name: &'static str) -> ParamSpec {
    ParamSpec { name, required: false }
}

/// Action kinds understood by the executor.
///
/// `Unknown` is synthetic: the parser produces it for any declaration whose
/// name is outside the vocabulary, so the caller can still see what the model
/// asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Click,
    LeftDouble,
    RightSingle,
    Drag,
    Hotkey,
    Type,
    Scroll,
    Wait,
    Finished,
    Unknown,
}

impl ActionKind {
    /// Every kind a model may declare, in prompt order. Excludes `Unknown`.
    pub const ALL: [ActionKind; 9] = [
        ActionKind::Click,
        ActionKind::LeftDouble,
        ActionKind::RightSingle,
        ActionKind::Drag,
        ActionKind::Hotkey,
        ActionKind::Type,
        ActionKind::Scroll,
        ActionKind::Wait,
        ActionKind::Finished,
    ];

    /// Look up a kind by its declaration name. Unrecognised names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .unwrap_or(ActionKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Click => "click",
            ActionKind::LeftDouble => "left_double",
            ActionKind::RightSingle => "right_single",
            ActionKind::Drag => "drag",
            ActionKind::Hotkey => "hotkey",
            ActionKind::Type => "type",
            ActionKind::Scroll => "scroll",
            ActionKind::Wait => "wait",
            ActionKind::Finished => "finished",
            ActionKind::Unknown => "unknown",
        }
    }

    /// Parameters this kind accepts. Anything else in a declaration is ignored.
    pub fn params(&self) -> &'static [ParamSpec] {
        const POINT: &[ParamSpec] = &[required(START_BOX)];
        const DRAG: &[ParamSpec] = &[required(START_BOX), required(END_BOX)];
        const HOTKEY: &[ParamSpec] = &[required(KEY)];
        const TYPE: &[ParamSpec] = &[required(CONTENT)];
        const SCROLL: &[ParamSpec] = &[required(START_BOX), required(DIRECTION)];
        const FINISHED: &[ParamSpec] = &[optional(CONTENT)];
        match self {
            ActionKind::Click | ActionKind::LeftDouble | ActionKind::RightSingle => POINT,
            ActionKind::Drag => DRAG,
            ActionKind::Hotkey => HOTKEY,
            ActionKind::Type => TYPE,
            ActionKind::Scroll => SCROLL,
            ActionKind::Finished => FINISHED,
            ActionKind::Wait | ActionKind::Unknown => &[],
        }
    }

    pub fn accepts(&self, param: &str) -> bool {
        self.params().iter().any(|p| p.name == param)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scroll direction accepted by `scroll(direction=...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        }
    }
}

impl std::str::FromStr for ScrollDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            "left" => Ok(ScrollDirection::Left),
            "right" => Ok(ScrollDirection::Right),
            other => anyhow::bail!("unknown scroll direction: {other}"),
        }
    }
}

/// A single parsed action declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Declaration text as the model wrote it, kept for `Unknown` actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self { kind, params: BTreeMap::new(), raw: None }
    }

    /// An action outside the vocabulary, with the declaration kept verbatim.
    pub fn unknown(raw: impl Into<String>) -> Self {
        Self { kind: ActionKind::Unknown, params: BTreeMap::new(), raw: Some(raw.into()) }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// First required parameter of this kind that is absent, if any.
    pub fn missing_param(&self) -> Option<&'static str> {
        self.kind
            .params()
            .iter()
            .find(|p| p.required && !self.params.contains_key(p.name))
            .map(|p| p.name)
    }
}

/// Renders the canonical declaration form, e.g. `click(start_box='[1, 2]')`.
impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == ActionKind::Unknown {
            return match &self.raw {
                Some(raw) => f.write_str(raw),
                None => f.write_str("unknown()"),
            };
        }
        write!(f, "{}(", self.kind)?;
        let mut first = true;
        for p in self.kind.params() {
            let Some(value) = self.param(p.name) else { continue };
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}='{}'", p.name, escape_value(value))?;
        }
        f.write_str(")")
    }
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Result of parsing one model turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOutput {
    pub thought: String,
    pub action: Option<Action>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_covers_vocabulary() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_name(kind.as_str()), kind);
        }
        assert_eq!(ActionKind::from_name("fly_to_moon"), ActionKind::Unknown);
        assert_eq!(ActionKind::from_name("Click"), ActionKind::Unknown);
    }

    #[test]
    fn serde_names_match_declaration_names() {
        for kind in ActionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.as_str());
        }
    }

    #[test]
    fn missing_param_reports_first_required() {
        let drag = Action::new(ActionKind::Drag).with_param(START_BOX, "[1, 2]");
        assert_eq!(drag.missing_param(), Some(END_BOX));

        let finished = Action::new(ActionKind::Finished);
        assert_eq!(finished.missing_param(), None);

        let wait = Action::new(ActionKind::Wait);
        assert_eq!(wait.missing_param(), None);
    }

    #[test]
    fn display_renders_schema_order_and_escapes() {
        let action = Action::new(ActionKind::Drag)
            .with_param(END_BOX, "[3, 4]")
            .with_param(START_BOX, "[1, 2]");
        assert_eq!(action.to_string(), "drag(start_box='[1, 2]', end_box='[3, 4]')");

        let typed = Action::new(ActionKind::Type).with_param(CONTENT, "it's\n");
        assert_eq!(typed.to_string(), r"type(content='it\'s\n')");

        assert_eq!(Action::new(ActionKind::Wait).to_string(), "wait()");
    }

    #[test]
    fn display_unknown_uses_raw_text() {
        let action = Action::unknown("teleport(to='mars')");
        assert_eq!(action.to_string(), "teleport(to='mars')");
    }

    #[test]
    fn scroll_direction_parses_case_insensitively() {
        assert_eq!("Down".parse::<ScrollDirection>().unwrap(), ScrollDirection::Down);
        assert_eq!(" left ".parse::<ScrollDirection>().unwrap(), ScrollDirection::Left);
        let err = "sideways".parse::<ScrollDirection>().unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }
}
