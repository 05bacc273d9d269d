use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::ui::{AppState, ToastLevel};

pub fn draw_footer(f: &mut Frame, area: Rect, state: &AppState, help_text: &str) {
    let mut spans: Vec<Span> = Vec::new();
    if let Some(w) = state.selected_widget() {
        let shown = w.state.display_text();
        let shown = if shown.is_empty() {
            "(empty)".to_string()
        } else {
            shown
        };
        spans.push(Span::styled(
            format!(" {}: {shown}", w.label),
            state.theme.title(),
        ));
        if let Some(fill) = w.state.fractional_fill() {
            spans.push(Span::raw(format!(" ({:.0}%)", fill * 100.0)));
        }
        if w.is_editing() {
            spans.push(Span::styled("  |  editing", state.theme.editing_text()));
        }
        spans.push(Span::raw("  |  "));
    }
    if let Some(t) = &state.toast {
        let color = state.theme.toast(t.level);
        let tag = match t.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Error => "[ERROR]",
            ToastLevel::Info => "[INFO]",
        };
        spans.push(Span::styled(
            format!("{tag} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{}  |  ", t.text),
            Style::default().fg(color),
        ));
    }
    spans.push(Span::styled(help_text.to_string(), state.theme.muted()));
    let p = Paragraph::new(Line::from(spans));
    f.render_widget(p, area);
}
