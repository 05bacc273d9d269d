use crate::ui::{AppState, ToastLevel, ValueChange};
use crate::widgets::Widget;
use crossterm::event::KeyCode;
use tracing::info;

pub enum AppMsg {
    Key(KeyCode),
    ValueChanged { id: String, value: Option<f64> },
    Tick,
}

#[derive(Debug)]
pub enum Effect {
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
    CopyToClipboard(String),
    Quit,
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        Key(code) => {
            // An open edit session owns every key
            if state.is_editing() {
                if let Some(w) = state.selected_mut() {
                    effects.extend(w.on_key(code));
                }
                return effects;
            }
            match code {
                KeyCode::Char('q') => effects.push(Effect::Quit),
                KeyCode::Tab => state.select_next(),
                KeyCode::BackTab => state.select_prev(),
                KeyCode::Char('?') => state.show_debug = !state.show_debug,
                KeyCode::Char('t') => state.theme = state.theme.toggled(),
                KeyCode::Char('d') => {
                    if let Some(w) = state.selected_mut() {
                        let enabled = !w.state.enabled();
                        w.state.set_enabled(enabled);
                        let text = format!(
                            "{} {}",
                            w.label,
                            if enabled { "enabled" } else { "disabled" }
                        );
                        state.dbg(&text);
                        effects.push(Effect::ShowToast {
                            text,
                            level: ToastLevel::Info,
                            seconds: 2,
                        });
                    }
                }
                other => {
                    if let Some(w) = state.selected_mut() {
                        effects.extend(w.on_key(other));
                    }
                }
            }
        }
        ValueChanged { id, value } => {
            info!(id = %id, value = ?value, "stepper value changed");
            let shown = value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "empty".to_string());
            state.dbg(format!("{id} -> {shown}"));
            state.changes += 1;
            state.values.insert(id, value);
        }
        Tick => state.advance_tick(),
    }
    effects
}

/// Feeds pending observer notifications through `update`. Returns how many
/// were processed.
pub fn drain_value_changes(state: &mut AppState) -> usize {
    let pending: Vec<ValueChange> = match &state.rx {
        Some(rx) => rx.try_iter().collect(),
        None => Vec::new(),
    };
    let n = pending.len();
    for change in pending {
        let _ = update(
            state,
            AppMsg::ValueChanged {
                id: change.id,
                value: change.value,
            },
        );
    }
    n
}

// Keep test module at the very end to satisfy clippy::items-after-test-module
#[cfg(test)]
mod tests;
