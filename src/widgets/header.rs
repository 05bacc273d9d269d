use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::services::loader::ConfigSource;
use crate::theme::FrameKind;
use crate::ui::AppState;

pub fn draw_header(f: &mut Frame, area: Rect, state: &AppState) {
    let border = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(state.theme.frame(FrameKind::Idle));
    let source = match &state.source {
        ConfigSource::File(p) => p.display().to_string(),
        ConfigSource::BuiltIn => "built-in demo".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", state.title), state.theme.title()),
        Span::styled(format!(" {source}"), state.theme.muted()),
    ]);
    f.render_widget(Paragraph::new(line).block(border), area);
}
