use crate::app::Effect;
use crate::model::StepperConfig;
use crate::stepper_core::{StepperState, ValueObserver};
use crate::theme::{FrameKind, Theme};
use crate::ui::ToastLevel;
use crate::widgets::chrome::panel;
use crossterm::event::KeyCode;
use ratatui::crossterm::event as rt_event;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing::debug;
use tui_textarea::TextArea;

const BUTTON_W: u16 = 3;
const EMPTY_PLACEHOLDER: &str = "—";
const FILL_GLYPH: &str = "━";

/// Bordered stepper: `[-]  value  [+]` over an optional fill bar.
pub struct StepperWidget {
    pub id: String,
    pub label: String,
    pub state: StepperState,
    pub indicator: Option<Color>,
    pub foreground: Option<Color>,
    pub error: Option<String>,
    editor: Option<TextArea<'static>>,
}

impl StepperWidget {
    pub fn new(id: impl Into<String>, label: impl Into<String>, state: StepperState) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            state,
            indicator: None,
            foreground: None,
            error: None,
            editor: None,
        }
    }

    pub fn from_config(cfg: &StepperConfig, observer: Option<ValueObserver>) -> Self {
        let mut state = cfg.build_state();
        state.set_observer(observer);
        let mut w = Self::new(cfg.id.clone(), cfg.label.clone(), state);
        w.indicator = cfg.indicator_color();
        w.foreground = cfg.foreground_color();
        w
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Current contents of the edit buffer, if editing.
    pub fn edit_text(&self) -> Option<String> {
        self.editor.as_ref().map(|ta| ta.lines().join(""))
    }

    pub fn begin_edit(&mut self) -> bool {
        if !self.state.enabled() || self.is_editing() {
            return false;
        }
        self.state.begin_edit();
        let mut ta = TextArea::default();
        let text = self.state.display_text();
        if !text.is_empty() {
            ta.insert_str(&text);
        }
        self.editor = Some(ta);
        self.error = None;
        true
    }

    /// Gated by `is_valid`; an invalid buffer stays open with an error.
    pub fn commit_edit(&mut self) -> Result<(), String> {
        let Some(text) = self.edit_text() else {
            return Ok(());
        };
        let text = text.trim().to_string();
        if !self.state.is_valid(&text) {
            let msg = if text.is_empty() {
                format!("{} cannot be empty", self.label)
            } else {
                format!("Not a valid number: {text}")
            };
            debug!(id = %self.id, text = %text, "stepper commit rejected");
            self.error = Some(msg.clone());
            return Err(msg);
        }
        if !self.state.commit_text(&text) {
            let msg = format!("Could not apply {text:?}");
            self.error = Some(msg.clone());
            return Err(msg);
        }
        self.editor = None;
        self.error = None;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
        self.editor = None;
        self.error = None;
    }

    pub fn step_up(&mut self) -> bool {
        self.state.increment_enabled() && self.state.increment()
    }

    pub fn step_down(&mut self) -> bool {
        self.state.decrement_enabled() && self.state.decrement()
    }

    fn jump_to(&mut self, bound: f64) -> bool {
        if !self.state.enabled() || !bound.is_finite() {
            return false;
        }
        self.state.set_value(Some(bound))
    }

    fn on_edit_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let mut effects: Vec<Effect> = Vec::new();
        match key {
            KeyCode::Enter | KeyCode::Tab => {
                if let Err(msg) = self.commit_edit() {
                    effects.push(Effect::ShowToast {
                        text: msg,
                        level: ToastLevel::Error,
                        seconds: 3,
                    });
                }
            }
            KeyCode::Esc => self.cancel_edit(),
            other => {
                if let Some(ta) = self.editor.as_mut() {
                    let _ = ta.input(rt_event::KeyEvent::new(
                        other,
                        rt_event::KeyModifiers::NONE,
                    ));
                }
                // Typing clears a stale rejection message
                self.error = None;
            }
        }
        effects
    }

    fn draw_value_row(&mut self, f: &mut Frame, row: Rect, focused: bool, theme: &Theme) {
        let snap = self.state.snapshot();
        let dec = Paragraph::new(Span::styled(
            "[-]",
            theme.button(snap.decrement_enabled, self.foreground),
        ));
        let inc = Paragraph::new(Span::styled(
            "[+]",
            theme.button(snap.increment_enabled, self.foreground),
        ));
        f.render_widget(
            dec,
            Rect {
                width: BUTTON_W,
                ..row
            },
        );
        f.render_widget(
            inc,
            Rect {
                x: row.x + row.width - BUTTON_W,
                width: BUTTON_W,
                ..row
            },
        );

        let middle = Rect {
            x: row.x + BUTTON_W + 1,
            width: row.width.saturating_sub(2 * BUTTON_W + 2),
            ..row
        };
        if middle.width == 0 {
            return;
        }
        if let Some(ta) = self.editor.as_mut() {
            ta.set_style(theme.editing_text());
            ta.set_cursor_line_style(Style::default());
            f.render_widget(&*ta, middle);
            return;
        }
        let (text, style) = if snap.display_text.is_empty() {
            (EMPTY_PLACEHOLDER.to_string(), theme.muted())
        } else {
            (
                snap.display_text,
                theme.value(focused, self.state.enabled(), self.foreground),
            )
        };
        f.render_widget(
            Paragraph::new(Span::styled(text, style)).alignment(Alignment::Center),
            middle,
        );
    }

    fn draw_indicator_row(&self, f: &mut Frame, row: Rect, theme: &Theme) {
        let (Some(color), Some(fill)) = (self.indicator, self.state.fractional_fill()) else {
            return;
        };
        let filled = ((row.width as f64) * fill).round() as u16;
        if filled == 0 {
            return;
        }
        let bar = FILL_GLYPH.repeat(filled.min(row.width) as usize);
        f.render_widget(
            Paragraph::new(Span::styled(
                bar,
                theme.indicator(color, self.state.enabled()),
            )),
            row,
        );
    }
}

impl crate::widgets::Widget for StepperWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let title = if self.is_editing() {
            format!(" {} (editing) ", self.label)
        } else if !self.state.enabled() {
            format!(" {} (disabled) ", self.label)
        } else {
            format!(" {} ", self.label)
        };
        let kind = if self.is_editing() {
            FrameKind::Editing
        } else if !self.state.enabled() {
            FrameKind::Disabled
        } else if focused {
            FrameKind::Focused
        } else {
            FrameKind::Idle
        };
        let block = panel(&title, kind, theme);
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.height == 0 || inner.width < 2 * BUTTON_W + 1 {
            return;
        }
        let value_row = Rect { height: 1, ..inner };
        self.draw_value_row(f, value_row, focused, theme);
        if inner.height >= 2 {
            let bar_row = Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            };
            self.draw_indicator_row(f, bar_row, theme);
        }
        if inner.height >= 3 {
            if let Some(err) = &self.error {
                let err_row = Rect {
                    y: inner.y + 2,
                    height: 1,
                    ..inner
                };
                f.render_widget(
                    Paragraph::new(Span::styled(err.clone(), theme.error_text())),
                    err_row,
                );
            }
        }
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        if self.is_editing() {
            return self.on_edit_key(key);
        }
        let mut effects: Vec<Effect> = Vec::new();
        match key {
            KeyCode::Char('+') | KeyCode::Up | KeyCode::Right => {
                self.step_up();
            }
            KeyCode::Char('-') | KeyCode::Down | KeyCode::Left => {
                self.step_down();
            }
            KeyCode::Home => {
                self.jump_to(self.state.minimum());
            }
            KeyCode::End => {
                self.jump_to(self.state.maximum());
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if !self.begin_edit() && !self.state.enabled() {
                    effects.push(Effect::ShowToast {
                        text: format!("{} is disabled", self.label),
                        level: ToastLevel::Info,
                        seconds: 2,
                    });
                }
            }
            KeyCode::Char('y') => {
                let text = self.state.display_text();
                if text.is_empty() {
                    effects.push(Effect::ShowToast {
                        text: "Nothing to copy".into(),
                        level: ToastLevel::Info,
                        seconds: 2,
                    });
                } else {
                    effects.push(Effect::CopyToClipboard(text));
                }
            }
            _ => {}
        }
        effects
    }
}
