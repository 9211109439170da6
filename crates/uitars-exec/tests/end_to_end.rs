use uitars_core::{parse, ExecutorConfig};
use uitars_exec::mock_backend::InputEvent;
use uitars_exec::{Executor, MockBackend, MockClipboard, Status};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn executor(input: &MockBackend, clipboard: &MockClipboard) -> Executor {
    Executor::new(
        &ExecutorConfig::instant(),
        Box::new(input.clone()),
        Box::new(clipboard.clone()),
    )
    .unwrap()
}

#[test]
fn click_round_trip_at_full_hd() {
    init_logging();
    let input = MockBackend::new(1920, 1080);
    let clipboard = MockClipboard::default();
    let mut exec = executor(&input, &clipboard);

    let parsed = parse("Thought: press the start button\nAction: click(start_box='[17,980,50,990]')");
    let result = exec.execute(parsed.action.as_ref());

    assert_eq!(result.status, Status::Success);
    assert_eq!(input.events(), vec![InputEvent::Click { x: 64, y: 1064 }]);
}

#[test]
fn hotkey_scenario() {
    init_logging();
    let input = MockBackend::new(1920, 1080);
    let clipboard = MockClipboard::default();
    let mut exec = executor(&input, &clipboard);

    let parsed = parse("Thought: 打开菜单\nAction: hotkey(key='ctrl alt t')");
    assert_eq!(parsed.thought, "打开菜单");
    let result = exec.execute(parsed.action.as_ref());

    assert!(result.is_success());
    assert!(result.message.contains("ctrl alt t"));
    assert_eq!(
        input.events(),
        vec![InputEvent::KeyCombo(vec!["ctrl".into(), "alt".into(), "t".into()])]
    );
}

#[test]
fn type_scenario_keeps_clipboard() {
    init_logging();
    let input = MockBackend::new(1920, 1080);
    let clipboard = MockClipboard::with_text("user's clipboard");
    let mut exec = executor(&input, &clipboard);

    let parsed = parse("Thought: submit the greeting\nAction: type(content='hello\\n')");
    let result = exec.execute(parsed.action.as_ref());

    assert!(result.is_success());
    assert_eq!(result.get("enter_pressed"), Some(&serde_json::json!(true)));
    assert_eq!(clipboard.text(), "user's clipboard");
    assert_eq!(input.events().last(), Some(&InputEvent::PressKey("enter".into())));
}

#[test]
fn no_action_is_an_error_result() {
    init_logging();
    let input = MockBackend::default();
    let clipboard = MockClipboard::default();
    let mut exec = executor(&input, &clipboard);

    let parsed = parse("I cannot see the screen clearly.");
    assert!(parsed.action.is_none());
    let result = exec.execute(parsed.action.as_ref());
    assert_eq!(result.status, Status::Error);
    assert!(input.events().is_empty());
}

#[test]
fn malformed_actions_never_touch_the_device() {
    init_logging();
    let input = MockBackend::default();
    let clipboard = MockClipboard::with_text("untouched");
    let mut exec = executor(&input, &clipboard);

    for turn in [
        "Action: click(start_box='nowhere')",
        "Action: drag(start_box='[1, 2]')",
        "Action: scroll(start_box='[1, 2]', direction='sideways')",
        "Action: type()",
        "Action: hotkey()",
        "Action: launch_rocket(target='moon')",
    ] {
        let result = exec.execute(parse(turn).action.as_ref());
        assert_eq!(result.status, Status::Error, "{turn}");
    }
    assert!(input.events().is_empty());
    assert!(clipboard.writes().is_empty());
}

#[test]
fn results_serialize_for_the_host() {
    init_logging();
    let mut exec = uitars_exec::dry_run_executor(&ExecutorConfig::instant(), 1000, 1000).unwrap();
    let parsed = parse("Thought: done\nAction: finished(content='report saved')");
    let result = exec.execute(parsed.action.as_ref());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["content"], "report saved");
}
