use crate::storage::ThemePreference;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub dim: Style,
    pub muted: Style,
    /// Highlight for money amounts
    pub accent: Style,
}

impl Theme {
    /// Colored palette for the stored preference, plain when stdout is not
    /// a terminal.
    pub fn detect(preference: ThemePreference) -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        match preference {
            ThemePreference::Light => Self::light(),
            ThemePreference::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            header: Style::new().blue().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            dim: Style::new().black().dimmed(),
            muted: Style::new().bright_black(),
            accent: Style::new().green(),
        }
    }

    pub fn dark() -> Self {
        Self {
            header: Style::new().bright_cyan().bold(),
            success: Style::new().bright_green().bold(),
            error: Style::new().bright_red().bold(),
            warn: Style::new().bright_yellow().bold(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            accent: Style::new().bright_green(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            accent: Style::new(),
        }
    }
}

/// Pick the palette once per process. Later calls are ignored.
pub fn init_theme(preference: ThemePreference) {
    let _ = THEME.set(Theme::detect(preference));
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::detect(ThemePreference::default()))
}
