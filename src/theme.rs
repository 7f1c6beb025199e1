use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use tracing::warn;

use crate::config::ThemeSpec;
use crate::model::StateClass;

/// Styles used by the renderer. Built once at startup and passed by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub title: Style,
    pub header: Style,
    pub row: Style,
    pub selected: Style,
    pub running: Style,
    pub exited: Style,
    pub other: Style,
    pub status: Style,
    pub error: Style,
    pub help: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_spec(&ThemeSpec::default())
    }
}

impl Theme {
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let title = color_or(spec.title.as_deref(), "title", Color::Indexed(205));
        let header = color_or(spec.header.as_deref(), "header", Color::Indexed(205));
        let selected_fg = color_or(spec.selected_fg.as_deref(), "selected_fg", Color::Indexed(229));
        let selected_bg = color_or(spec.selected_bg.as_deref(), "selected_bg", Color::Indexed(63));
        let running = color_or(spec.running.as_deref(), "running", Color::Indexed(42));
        let exited = color_or(spec.exited.as_deref(), "exited", Color::Indexed(196));
        let other = color_or(spec.other.as_deref(), "other", Color::Indexed(220));
        let help = color_or(spec.help.as_deref(), "help", Color::Indexed(241));
        let error = color_or(spec.error.as_deref(), "error", Color::Indexed(196));

        Self {
            title: Style::default().fg(title).add_modifier(Modifier::BOLD),
            header: Style::default().fg(header).add_modifier(Modifier::BOLD),
            row: Style::default(),
            selected: Style::default()
                .fg(selected_fg)
                .bg(selected_bg)
                .add_modifier(Modifier::BOLD),
            running: Style::default().fg(running).add_modifier(Modifier::BOLD),
            exited: Style::default().fg(exited).add_modifier(Modifier::BOLD),
            other: Style::default().fg(other).add_modifier(Modifier::BOLD),
            status: Style::default(),
            error: Style::default().fg(error),
            help: Style::default().fg(help),
        }
    }

    pub fn state(&self, class: StateClass) -> Style {
        match class {
            StateClass::Running => self.running,
            StateClass::Exited => self.exited,
            StateClass::Other => self.other,
        }
    }
}

fn color_or(value: Option<&str>, slot: &str, fallback: Color) -> Color {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return fallback;
    };

    match Color::from_str(value) {
        Ok(color) => color,
        Err(_) => {
            warn!("ignoring invalid colour {value:?} for theme.{slot}");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;
    use crate::config::ThemeSpec;
    use crate::model::StateClass;
    use ratatui::style::Color;

    #[test]
    fn default_theme_uses_indexed_palette() {
        let theme = Theme::default();
        assert_eq!(theme.state(StateClass::Running).fg, Some(Color::Indexed(42)));
        assert_eq!(theme.state(StateClass::Exited).fg, Some(Color::Indexed(196)));
        assert_eq!(theme.state(StateClass::Other).fg, Some(Color::Indexed(220)));
        assert_eq!(theme.selected.bg, Some(Color::Indexed(63)));
    }

    #[test]
    fn overrides_accept_names_hex_and_indices() {
        let spec = ThemeSpec {
            running: Some("green".to_string()),
            exited: Some("#ff0000".to_string()),
            help: Some("244".to_string()),
            ..ThemeSpec::default()
        };
        let theme = Theme::from_spec(&spec);
        assert_eq!(theme.running.fg, Some(Color::Green));
        assert_eq!(theme.exited.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(theme.help.fg, Some(Color::Indexed(244)));
    }

    #[test]
    fn invalid_colours_fall_back_to_defaults() {
        let spec = ThemeSpec {
            other: Some("not-a-colour".to_string()),
            ..ThemeSpec::default()
        };
        let theme = Theme::from_spec(&spec);
        assert_eq!(theme.other.fg, Some(Color::Indexed(220)));
    }
}
