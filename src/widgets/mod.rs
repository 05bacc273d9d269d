pub mod chrome;
pub mod header;
pub mod status_bar;
pub mod stepper;

use crate::app::Effect;
use crate::theme::Theme;
use crossterm::event::KeyCode;
use ratatui::prelude::*;

pub trait Widget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme);
    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let _ = key;
        Vec::new()
    }
}
