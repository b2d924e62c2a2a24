use ratatui::style::Color;

use crate::config::ThemeName;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            border: Color::Rgb(60, 68, 76),
            border_focused: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(110, 190, 120),
            warning: Color::Rgb(220, 170, 70),
            error: Color::Rgb(200, 80, 80),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(248, 248, 246),
            surface: Color::Rgb(236, 238, 240),
            text: Color::Rgb(30, 34, 38),
            text_muted: Color::Rgb(110, 114, 120),
            accent: Color::Rgb(20, 120, 120),
            border: Color::Rgb(190, 194, 200),
            border_focused: Color::Rgb(20, 120, 120),
            positive: Color::Rgb(30, 130, 60),
            warning: Color::Rgb(170, 110, 0),
            error: Color::Rgb(180, 40, 40),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
