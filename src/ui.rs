use crate::app::{drain_value_changes, update, AppMsg, Effect};
use crate::model::AppConfig;
use crate::services::loader::{load_config, ConfigSource};
use crate::stepper_core::{StepperState, ValueObserver};
use crate::theme::FrameKind;
use crate::widgets::header::draw_header;
use crate::widgets::status_bar::draw_footer;
use crate::widgets::stepper::StepperWidget;
use crate::widgets::Widget;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::{BTreeMap, VecDeque};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const HELP_TEXT: &str =
    "Tab/S-Tab select • +/- step • Enter edit • Esc cancel • y copy • d enable • t theme • ? debug • q quit";

// Rows per stepper: border, value, fill bar, error line, border
const STEPPER_H: u16 = 5;
const DEBUG_H: u16 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

/// Message sent by a stepper's host observer.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueChange {
    pub id: String,
    pub value: Option<f64>,
}

pub struct AppState {
    pub title: String,
    pub source: ConfigSource,
    pub steppers: Vec<StepperWidget>,
    pub selected: usize,
    pub theme: crate::theme::Theme,
    pub toast: Option<Toast>,
    pub tick: u64,
    pub show_debug: bool,
    // Last value reported by each stepper's observer
    pub values: BTreeMap<String, Option<f64>>,
    pub changes: u64,
    pub should_quit: bool,
    pub(crate) debug_log: VecDeque<String>,
    pub(crate) rx: Option<Receiver<ValueChange>>,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig, source: ConfigSource) -> Self {
        let (tx, rx) = mpsc::channel::<ValueChange>();
        let steppers: Vec<StepperWidget> = cfg
            .steppers
            .iter()
            .map(|sc| {
                let tx = tx.clone();
                let id = sc.id.clone();
                let observer: ValueObserver =
                    Box::new(move |_state: &mut StepperState, value: Option<f64>| {
                        let _ = tx.send(ValueChange {
                            id: id.clone(),
                            value,
                        });
                    });
                StepperWidget::from_config(sc, Some(observer))
            })
            .collect();
        let values = steppers
            .iter()
            .map(|w| (w.id.clone(), w.state.value()))
            .collect();
        let mut state = Self {
            title: cfg.title.clone(),
            source,
            steppers,
            selected: 0,
            theme: crate::theme::Theme::dark(),
            toast: None,
            tick: 0,
            show_debug: false,
            values,
            changes: 0,
            should_quit: false,
            debug_log: VecDeque::new(),
            rx: Some(rx),
        };
        let origin = match &state.source {
            ConfigSource::File(p) => format!("config: {}", p.display()),
            ConfigSource::BuiltIn => "config: built-in demo".to_string(),
        };
        state.dbg(origin);
        state
    }

    pub fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        let msg = msg.into();
        tracing::debug!(target: "stepper_tui::ui", "{msg}");
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg);
    }

    pub fn selected_widget(&self) -> Option<&StepperWidget> {
        self.steppers.get(self.selected)
    }

    pub fn selected_mut(&mut self) -> Option<&mut StepperWidget> {
        self.steppers.get_mut(self.selected)
    }

    pub fn is_editing(&self) -> bool {
        self.selected_widget()
            .map(|w| w.is_editing())
            .unwrap_or(false)
    }

    pub fn select_next(&mut self) {
        if !self.steppers.is_empty() {
            self.selected = (self.selected + 1) % self.steppers.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.steppers.is_empty() {
            self.selected = if self.selected == 0 {
                self.steppers.len() - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Advances the frame counter and expires the toast.
    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(t) = &self.toast {
            if self.tick >= t.expires_at_tick {
                self.toast = None;
            }
        }
    }
}

/// First and one-past-last stepper index visible in a body of `inner_h` rows.
pub(crate) fn compute_scroll_window(total: usize, selected: usize, inner_h: u16) -> (usize, usize) {
    if inner_h == 0 || total == 0 {
        return (0, 0);
    }
    let fit = ((inner_h / STEPPER_H) as usize).max(1);
    let sel = selected.min(total.saturating_sub(1));
    let start = if sel >= fit { sel + 1 - fit } else { 0 };
    let end = (start + fit).min(total);
    (start, end)
}

pub(crate) fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: state.tick.saturating_add(ticks),
                });
            }
            Effect::CopyToClipboard(text) => {
                let (msg, level) = match crate::services::clipboard::copy_text(&text) {
                    Ok(()) => (format!("Copied {text}"), ToastLevel::Success),
                    Err(e) => {
                        let detail = format!("{e:#}");
                        warn!(error = %detail, "clipboard copy failed");
                        (format!("Clipboard unavailable: {e}"), ToastLevel::Error)
                    }
                };
                state.dbg(&msg);
                run_effects(
                    state,
                    vec![Effect::ShowToast {
                        text: msg,
                        level,
                        seconds: 2,
                    }],
                );
            }
            Effect::Quit => state.should_quit = true,
        }
    }
}

/// Parses a comma separated key script such as `up,up,enter,bs,7,enter`.
pub fn parse_key_script(script: &str) -> Vec<KeyCode> {
    let mut out: Vec<KeyCode> = Vec::new();
    for token in script.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            out.push(KeyCode::Char(c));
            continue;
        }
        let key = match token.to_ascii_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "bs" | "backspace" => KeyCode::Backspace,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            other => {
                warn!(token = other, "unknown key in script");
                continue;
            }
        };
        out.push(key);
    }
    out
}

pub fn smoke_summary(state: &AppState) -> serde_json::Value {
    let steppers: Vec<serde_json::Value> = state
        .steppers
        .iter()
        .map(|w| {
            serde_json::json!({
                "id": w.id,
                "value": w.state.value(),
                "display": w.state.display_text(),
                "editing": w.is_editing(),
                "enabled": w.state.enabled(),
            })
        })
        .collect();
    serde_json::json!({
        "title": state.title,
        "ticks": state.tick,
        "selected": state.selected_widget().map(|w| w.id.clone()),
        "changes": state.changes,
        "steppers": steppers,
    })
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    let (cfg, source) = load_config()?;
    info!(steppers = cfg.steppers.len(), "starting stepper-tui");
    let mut state = AppState::from_config(&cfg, source);

    // Headless smoke mode
    if env_flag("STEPPER_TUI_HEADLESS") {
        return run_headless(&mut state);
    }

    // Setup terminal (interactive)
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let res = event_loop(&mut terminal, &mut state);
    // Restore
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut AppState) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    while !state.should_quit {
        terminal.draw(|f| ui(f, state))?;
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let effects = update(state, AppMsg::Key(key.code));
                    run_effects(state, effects);
                }
            }
        }
        drain_value_changes(state);
        if last_tick.elapsed() >= tick_rate {
            let _ = update(state, AppMsg::Tick);
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn run_headless(state: &mut AppState) -> Result<()> {
    let ticks: u64 = std::env::var("STEPPER_TUI_TICKS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);
    let script = parse_key_script(&std::env::var("STEPPER_TUI_KEYS").unwrap_or_default());
    let backend = ratatui::backend::TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend)?;
    let mut keys = script.into_iter();
    for _ in 0..ticks {
        terminal.draw(|f| ui(f, state))?;
        if let Some(code) = keys.next() {
            let effects = update(state, AppMsg::Key(code));
            run_effects(state, effects);
        }
        drain_value_changes(state);
        let _ = update(state, AppMsg::Tick);
        if state.should_quit {
            break;
        }
    }
    if env_flag("STEPPER_TUI_SMOKE_SUMMARY") {
        println!("{}", smoke_summary(state));
    }
    Ok(())
}

pub fn ui(f: &mut Frame, state: &mut AppState) {
    let area = f.area();
    f.render_widget(Block::default().style(state.theme.surface()), area);
    let debug_h = if state.show_debug { DEBUG_H } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(STEPPER_H),
        Constraint::Length(debug_h),
        Constraint::Length(1),
    ])
    .split(area);
    draw_header(f, chunks[0], state);
    draw_steppers(f, chunks[1], state);
    if state.show_debug {
        draw_debug(f, chunks[2], state);
    }
    draw_footer(f, chunks[3], state, HELP_TEXT);
}

fn draw_steppers(f: &mut Frame, area: Rect, state: &mut AppState) {
    let (start, end) = compute_scroll_window(state.steppers.len(), state.selected, area.height);
    let theme = state.theme.clone();
    let selected = state.selected;
    let mut y = area.y;
    for (i, w) in state.steppers.iter_mut().enumerate().take(end).skip(start) {
        let h = STEPPER_H.min(area.y + area.height - y);
        if h == 0 {
            break;
        }
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height: h,
        };
        w.render(f, rect, i == selected, &theme);
        y += h;
    }
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let inner_h = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(state.debug_log.len().saturating_sub(inner_h))
        .map(|s| Line::from(Span::styled(s.clone(), state.theme.muted())))
        .collect();
    let block = crate::widgets::chrome::panel(" Debug ", FrameKind::Idle, &state.theme);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
