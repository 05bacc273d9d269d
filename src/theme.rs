use crate::ui::ToastLevel;
use ratatui::style::{Color, Modifier, Style};

/// Border treatment for a stepper panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameKind {
    Idle,
    Focused,
    Editing,
    Disabled,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub dark: bool,
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub border: Color,
    pub focus: Color,
    pub editing: Color,
    pub success: Color,
    pub error: Color,
    pub dim: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            dark: true,
            background: Color::Rgb(18, 20, 28),
            text: Color::Rgb(225, 228, 235),
            accent: Color::Rgb(92, 200, 220),
            border: Color::Rgb(70, 76, 96),
            focus: Color::Rgb(240, 190, 80),
            editing: Color::Rgb(250, 130, 110),
            success: Color::Rgb(120, 210, 120),
            error: Color::Rgb(240, 80, 80),
            dim: Color::Rgb(110, 116, 134),
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            background: Color::Rgb(250, 249, 245),
            text: Color::Rgb(30, 32, 40),
            accent: Color::Rgb(20, 110, 150),
            border: Color::Rgb(190, 192, 200),
            focus: Color::Rgb(190, 120, 0),
            editing: Color::Rgb(200, 70, 50),
            success: Color::Rgb(30, 140, 50),
            error: Color::Rgb(190, 20, 20),
            dim: Color::Rgb(130, 134, 146),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.dark {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn surface(&self) -> Style {
        Style::default().bg(self.background).fg(self.text)
    }

    pub fn frame(&self, kind: FrameKind) -> Style {
        let color = match kind {
            FrameKind::Idle => self.border,
            FrameKind::Focused => self.focus,
            FrameKind::Editing => self.editing,
            FrameKind::Disabled => self.dim,
        };
        Style::default().fg(color)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn editing_text(&self) -> Style {
        Style::default().fg(self.editing).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn error_text(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Display text style. `fg` is the per-stepper foreground override.
    pub fn value(&self, focused: bool, enabled: bool, fg: Option<Color>) -> Style {
        if !enabled {
            return self.muted();
        }
        let style = Style::default().fg(fg.unwrap_or(self.text));
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn button(&self, enabled: bool, fg: Option<Color>) -> Style {
        if enabled {
            Style::default()
                .fg(fg.unwrap_or(self.text))
                .add_modifier(Modifier::BOLD)
        } else {
            self.muted()
        }
    }

    // Disabled fields keep their indicator color, dimmed
    pub fn indicator(&self, color: Color, enabled: bool) -> Style {
        let style = Style::default().fg(color);
        if enabled {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        }
    }

    pub fn toast(&self, level: ToastLevel) -> Color {
        match level {
            ToastLevel::Info => self.accent,
            ToastLevel::Success => self.success,
            ToastLevel::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
