use super::*;
use crate::model::AppConfig;
use crate::services::loader::ConfigSource;
use crate::ui::{compute_scroll_window, parse_key_script, run_effects, smoke_summary};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn demo_state() -> AppState {
    AppState::from_config(&AppConfig::default(), ConfigSource::BuiltIn)
}

fn press(st: &mut AppState, key: KeyCode) -> Vec<Effect> {
    let effects = update(st, AppMsg::Key(key));
    drain_value_changes(st);
    effects
}

#[test]
fn step_notifies_observer_and_updates_bound_value() {
    let mut st = demo_state();
    assert_eq!(st.values.get("volume"), Some(&Some(50.0)));
    press(&mut st, KeyCode::Up);
    assert_eq!(st.values.get("volume"), Some(&Some(55.0)));
    assert_eq!(st.changes, 1);
    assert!(st.debug_log.back().unwrap().contains("volume -> 55"));
    // At the bound nothing is committed, so no notification
    for _ in 0..20 {
        press(&mut st, KeyCode::Up);
    }
    assert_eq!(st.values.get("volume"), Some(&Some(100.0)));
    assert_eq!(st.changes, 10);
}

#[test]
fn tab_cycles_selection_unless_editing() {
    let mut st = demo_state();
    press(&mut st, KeyCode::Tab);
    assert_eq!(st.selected, 1);
    press(&mut st, KeyCode::BackTab);
    press(&mut st, KeyCode::BackTab);
    assert_eq!(st.selected, 2);

    // Tab while editing commits instead of moving
    press(&mut st, KeyCode::Enter);
    assert!(st.is_editing());
    for ch in "250".chars() {
        press(&mut st, KeyCode::Char(ch));
    }
    press(&mut st, KeyCode::Tab);
    assert_eq!(st.selected, 2);
    assert!(!st.is_editing());
    assert_eq!(st.values.get("limit"), Some(&Some(250.0)));
}

#[test]
fn q_quits_only_when_idle() {
    let mut st = demo_state();
    press(&mut st, KeyCode::Enter);
    let effects = press(&mut st, KeyCode::Char('q'));
    assert!(effects.is_empty());
    assert_eq!(st.selected_widget().unwrap().edit_text().as_deref(), Some("50q"));
    press(&mut st, KeyCode::Esc);
    let effects = press(&mut st, KeyCode::Char('q'));
    assert!(matches!(effects.as_slice(), [Effect::Quit]));
    run_effects(&mut st, effects);
    assert!(st.should_quit);
}

#[test]
fn disable_toggle_blocks_stepping() {
    let mut st = demo_state();
    let effects = press(&mut st, KeyCode::Char('d'));
    assert!(matches!(
        effects.as_slice(),
        [Effect::ShowToast {
            level: ToastLevel::Info,
            ..
        }]
    ));
    press(&mut st, KeyCode::Up);
    assert_eq!(st.steppers[0].state.value(), Some(50.0));
    assert_eq!(st.changes, 0);
    press(&mut st, KeyCode::Char('d'));
    press(&mut st, KeyCode::Down);
    assert_eq!(st.steppers[0].state.value(), Some(45.0));
}

#[test]
fn clearing_empty_capable_stepper_reports_empty() {
    let mut st = demo_state();
    st.selected = 2;
    assert_eq!(st.values.get("limit"), Some(&None));
    press(&mut st, KeyCode::Up);
    assert_eq!(st.values.get("limit"), Some(&Some(100.0)));
    press(&mut st, KeyCode::Enter);
    for _ in 0..3 {
        press(&mut st, KeyCode::Backspace);
    }
    press(&mut st, KeyCode::Enter);
    assert_eq!(st.values.get("limit"), Some(&None));
    assert!(st.debug_log.back().unwrap().contains("limit -> empty"));
}

#[test]
fn toast_expires_after_its_ticks() {
    let mut st = demo_state();
    run_effects(
        &mut st,
        vec![Effect::ShowToast {
            text: "hi".into(),
            level: ToastLevel::Info,
            seconds: 1,
        }],
    );
    for _ in 0..4 {
        update(&mut st, AppMsg::Tick);
    }
    assert!(st.toast.is_some());
    update(&mut st, AppMsg::Tick);
    assert!(st.toast.is_none());
}

#[test]
fn key_script_parses_names_and_characters() {
    let keys = parse_key_script("up, Down ,enter,bs,7,+,space,bogus,,esc");
    assert_eq!(
        keys,
        vec![
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Enter,
            KeyCode::Backspace,
            KeyCode::Char('7'),
            KeyCode::Char('+'),
            KeyCode::Char(' '),
            KeyCode::Esc,
        ]
    );
}

#[test]
fn scroll_window_keeps_selection_visible() {
    assert_eq!(compute_scroll_window(0, 0, 20), (0, 0));
    assert_eq!(compute_scroll_window(3, 0, 20), (0, 3));
    assert_eq!(compute_scroll_window(6, 5, 10), (4, 6));
    assert_eq!(compute_scroll_window(6, 1, 10), (0, 2));
    assert_eq!(compute_scroll_window(6, 2, 3), (2, 3));
}

#[test]
fn smoke_summary_lists_every_stepper() {
    let mut st = demo_state();
    press(&mut st, KeyCode::Down);
    let v = smoke_summary(&st);
    assert_eq!(v["title"], serde_json::json!("Steppers"));
    assert_eq!(v["selected"], serde_json::json!("volume"));
    assert_eq!(v["changes"], serde_json::json!(1));
    assert_eq!(v["steppers"][0]["value"], serde_json::json!(45.0));
    assert_eq!(v["steppers"][1]["display"], serde_json::json!("0.0"));
    assert_eq!(v["steppers"][2]["value"], serde_json::Value::Null);
}

#[test]
fn full_frame_renders_header_steppers_and_footer() {
    let mut st = demo_state();
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| crate::ui::ui(f, &mut st)).unwrap();
    let buf = terminal.backend().buffer().clone();
    let text: Vec<String> = (0..buf.area.height)
        .map(|y| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect();
    let all = text.join("\n");
    assert!(text[0].contains("Steppers"));
    assert!(all.contains("Volume"));
    assert!(all.contains("Gain (dB)"));
    assert!(all.contains("Rate limit"));
    assert!(text[23].contains("Volume: 50"));
}
