//! System prompt and action space for a UI-TARS style GUI agent.

use crate::action::{ActionKind, CONTENT, DIRECTION, END_BOX, START_BOX};

/// One usage line per action kind, in the grammar `parser::parse_action` accepts.
pub fn action_space() -> String {
    ActionKind::ALL
        .iter()
        .map(|kind| usage(*kind))
        .collect::<Vec<_>>()
        .join("\n")
}

fn usage(kind: ActionKind) -> String {
    let placeholder = |name: &str| -> &'static str {
        match name {
            START_BOX => "[x1, y1, x2, y2]",
            END_BOX => "[x3, y3, x4, y4]",
            DIRECTION => "down or up or right or left",
            CONTENT if kind == ActionKind::Finished => "xxx",
            _ => "",
        }
    };
    let args = kind
        .params()
        .iter()
        .map(|p| format!("{}='{}'", p.name, placeholder(p.name)))
        .collect::<Vec<_>>()
        .join(", ");
    let note = match kind {
        ActionKind::Type => r#" #If you want to submit your input, use "\n" at the end of `content`."#,
        ActionKind::Wait => " #Sleep for 5s and take a screenshot to check for any changes.",
        ActionKind::Finished => {
            r#" # Use escape characters \', \", and \n in content part to ensure we can parse the content in normal python string format."#
        }
        _ => "",
    };
    format!("{kind}({args}){note}")
}

/// Instruction block for the model. The user's task is appended after it.
pub fn system_prompt() -> String {
    format!(
        r#"You are a GUI agent. You are given a task and your action history, with screenshots. You need to perform the next action to complete the task.

## Output Format
```
Thought: ...
Action: ...
```

## Action Space
{}

## Note
- Coordinates are on a 0-1000 scale relative to the screenshot width and height.
- Write a small plan and finally summarize your next action (with its target element) in one sentence in `Thought` part.

## User Instruction
"#,
        action_space()
    )
}
