use crate::theme::{FrameKind, Theme};
use ratatui::widgets::{Block, BorderType, Borders};

/// Bordered panel; editing gets a thick border so the mode is visible
/// without color.
pub fn panel<'a>(title: &'a str, kind: FrameKind, theme: &Theme) -> Block<'a> {
    let border_type = match kind {
        FrameKind::Editing => BorderType::Thick,
        _ => BorderType::Plain,
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(theme.frame(kind))
        .title(title)
}
