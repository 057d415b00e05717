//! Color themes for Lumen

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (titles, active elements)
    pub highlight: Color,
    /// Accent color (status values)
    pub accent: Color,
    /// Error/danger color
    pub danger: Color,
    /// Bar color at zero magnitude
    pub bar_low: [u8; 3],
    /// Bar color at full magnitude
    pub bar_high: [u8; 3],
    /// Exponent applied to magnitude before blending bar colors
    pub color_gamma: f32,
}

impl Theme {
    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn danger(&self) -> Style {
        Style::default().fg(self.danger)
    }

    /// Bar color for a display magnitude (0.0 - 1.0)
    ///
    /// Quiet bars stay close to `bar_low`; only loud bars shift toward
    /// `bar_high`.
    pub fn bar_color(&self, magnitude: f32) -> Color {
        let c = magnitude.clamp(0.0, 1.0).powf(self.color_gamma);
        let mix = |low: u8, high: u8| (low as f32 * (1.0 - c) + high as f32 * c) as u8;
        Color::Rgb(
            mix(self.bar_low[0], self.bar_high[0]),
            mix(self.bar_low[1], self.bar_high[1]),
            mix(self.bar_low[2], self.bar_high[2]),
        )
    }

    /// Get style for a spectrum bar based on its magnitude
    pub fn bar_style(&self, magnitude: f32) -> Style {
        Style::default().fg(self.bar_color(magnitude))
    }

    /// Look up a built-in theme by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Theme> {
        ALL_THEMES
            .iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
    }

    /// Next built-in theme after this one
    pub fn next(&self) -> Theme {
        let idx = ALL_THEMES
            .iter()
            .position(|theme| theme.name == self.name)
            .map(|i| (i + 1) % ALL_THEMES.len())
            .unwrap_or(0);
        ALL_THEMES[idx].clone()
    }
}

/// Light blue to pink bars on black
pub const PASTEL: Theme = Theme {
    name: "pastel",
    fg: Color::Rgb(173, 216, 230),       // light blue
    fg_dim: Color::Rgb(90, 112, 120),    // dimmed blue-grey
    bg: Color::Rgb(0, 0, 0),
    highlight: Color::Rgb(255, 140, 160), // pink
    accent: Color::Rgb(173, 216, 230),
    danger: Color::Rgb(255, 100, 100),
    bar_low: [173, 216, 230],
    bar_high: [255, 140, 160],
    color_gamma: 3.0,
};

/// Classic phosphor green CRT theme
pub const CRT_GREEN: Theme = Theme {
    name: "phosphor-green",
    fg: Color::Rgb(51, 255, 51),          // #33ff33 - phosphor green
    fg_dim: Color::Rgb(25, 128, 25),      // dimmed green
    bg: Color::Rgb(0, 10, 0),             // near black with green tint
    highlight: Color::Rgb(180, 255, 180), // bright green
    accent: Color::Rgb(100, 255, 100),    // medium green
    danger: Color::Rgb(255, 100, 100),    // red warning
    bar_low: [25, 160, 25],
    bar_high: [200, 255, 200],
    color_gamma: 2.0,
};

/// Amber CRT theme (1980s monochrome)
pub const CRT_AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(255, 176, 0),          // #ffb000 - amber
    fg_dim: Color::Rgb(128, 88, 0),       // dimmed amber
    bg: Color::Rgb(10, 5, 0),             // near black with amber tint
    highlight: Color::Rgb(255, 220, 128), // bright amber
    accent: Color::Rgb(255, 200, 64),     // medium amber
    danger: Color::Rgb(255, 100, 100),    // red warning
    bar_low: [160, 100, 0],
    bar_high: [255, 230, 150],
    color_gamma: 2.0,
};

/// Cyberpunk neon theme
pub const CYBERPUNK: Theme = Theme {
    name: "cyberpunk",
    fg: Color::Rgb(0, 255, 255),        // cyan
    fg_dim: Color::Rgb(0, 128, 128),    // dim cyan
    bg: Color::Rgb(5, 0, 10),           // dark purple-black
    highlight: Color::Rgb(255, 0, 255), // magenta
    accent: Color::Rgb(0, 255, 128),    // neon green
    danger: Color::Rgb(255, 50, 50),    // red
    bar_low: [0, 200, 255],
    bar_high: [255, 0, 255],
    color_gamma: 1.5,
};

/// Built-in themes in cycling order
pub const ALL_THEMES: [Theme; 4] = [PASTEL, CRT_GREEN, CRT_AMBER, CYBERPUNK];

impl Default for Theme {
    fn default() -> Self {
        PASTEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_color_endpoints() {
        let theme = PASTEL;
        assert_eq!(theme.bar_color(0.0), Color::Rgb(173, 216, 230));
        assert_eq!(theme.bar_color(1.0), Color::Rgb(255, 140, 160));
        assert_eq!(theme.bar_color(7.0), theme.bar_color(1.0));
    }

    #[test]
    fn test_gamma_keeps_mid_bars_cool() {
        // 0.5^3 = 0.125 of the way to pink
        let Color::Rgb(r, _, _) = PASTEL.bar_color(0.5) else {
            panic!("expected rgb");
        };
        assert_eq!(r, 183);
    }

    #[test]
    fn test_by_name_and_cycle() {
        assert_eq!(Theme::by_name("AMBER"), Some(CRT_AMBER));
        assert_eq!(Theme::by_name("sepia"), None);

        let mut theme = Theme::default();
        for _ in 0..ALL_THEMES.len() {
            theme = theme.next();
        }
        assert_eq!(theme, PASTEL);
    }
}
