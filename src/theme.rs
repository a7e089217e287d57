use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn palette(self) -> Theme {
        match self {
            ThemeMode::Dark => Theme::dark(),
            ThemeMode::Light => Theme::light(),
        }
    }
}

pub struct Theme {
    pub root_bg: Color,
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub selection_fg: Color,

    // Specific components
    pub title: Style,
    pub category: Style,
    pub category_unchecked: Style,
    pub hashtag: Style,
    pub copied: Style,
    pub error: Style,
    pub footer: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            root_bg: Color::Black,
            focus_border: Color::Magenta,
            blurred_border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,
            accent: Color::LightMagenta,
            selection_fg: Color::Yellow,

            title: Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
            category: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            category_unchecked: Style::default().fg(Color::DarkGray),
            hashtag: Style::default().fg(Color::Cyan),
            copied: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        }
    }

    pub fn light() -> Self {
        Self {
            root_bg: Color::White,
            focus_border: Color::Magenta,
            blurred_border: Color::Gray,
            text: Color::Black,
            text_secondary: Color::DarkGray,
            accent: Color::Magenta,
            selection_fg: Color::Blue,

            title: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            category: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            category_unchecked: Style::default().fg(Color::Gray),
            hashtag: Style::default().fg(Color::Blue),
            copied: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::DarkGray),
        }
    }
}
