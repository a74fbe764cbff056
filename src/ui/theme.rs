use ratatui::style::Color;

/// Colours for one display mode
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    /// To Do accents, selection, focused input
    pub accent: Color,
    /// Completed accents
    pub done: Color,
    pub danger: Color,
    pub selection_bg: Color,
}

impl Palette {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }

    /// Nord
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),
            surface: Color::Rgb(59, 66, 82),
            text: Color::Rgb(236, 239, 244),
            muted: Color::Rgb(129, 161, 193),
            border: Color::Rgb(76, 86, 106),
            accent: Color::Rgb(180, 142, 173),
            done: Color::Rgb(163, 190, 140),
            danger: Color::Rgb(191, 97, 106),
            selection_bg: Color::Rgb(67, 76, 94),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(243, 244, 246),
            surface: Color::Rgb(255, 255, 255),
            text: Color::Rgb(31, 41, 55),
            muted: Color::Rgb(107, 114, 128),
            border: Color::Rgb(209, 213, 219),
            accent: Color::Rgb(147, 51, 234),
            done: Color::Rgb(22, 163, 74),
            danger: Color::Rgb(220, 38, 38),
            selection_bg: Color::Rgb(237, 233, 254),
        }
    }
}
