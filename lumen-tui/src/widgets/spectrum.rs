//! Spectrum bar widget

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Widget},
};

/// Characters for vertical bar rendering (8 levels)
const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Widget for displaying normalized bar magnitudes (0.0 - 1.0)
pub struct SpectrumWidget<'a> {
    magnitudes: &'a [f32],
    theme: &'a Theme,
    title: &'a str,
    borders: bool,
}

impl<'a> SpectrumWidget<'a> {
    pub fn new(magnitudes: &'a [f32], theme: &'a Theme) -> Self {
        Self {
            magnitudes,
            theme,
            title: " SPECTRUM ",
            borders: true,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn borders(mut self, borders: bool) -> Self {
        self.borders = borders;
        self
    }

    /// Get full height bar representation, bottom row first
    ///
    /// Every bar is at least one eighth of a cell tall so silent bars stay
    /// visible as a baseline.
    fn render_bar(magnitude: f32, height: u16) -> Vec<char> {
        let total_levels = ((magnitude.clamp(0.0, 1.0) * 8.0 * height as f32) as usize).max(1);
        let full_blocks = total_levels / 8;
        let partial = total_levels % 8;

        let mut bar = Vec::with_capacity(height as usize);

        for row in 0..height as usize {
            let char = if row < full_blocks {
                '█'
            } else if row == full_blocks && partial > 0 {
                BAR_CHARS[partial]
            } else {
                ' '
            };
            bar.push(char);
        }

        bar
    }

    /// Columns to draw as `(x offset, magnitude)` pairs
    ///
    /// With room to spare each bar gets an equal group of columns (with a one
    /// column gap once groups are 3 wide). Otherwise several bars share a
    /// column and the loudest of them is shown.
    fn columns(&self, width: usize) -> Vec<(usize, f32)> {
        let n = self.magnitudes.len();
        if n == 0 || width == 0 {
            return Vec::new();
        }

        if width >= n {
            let bar_width = width / n;
            let gap = usize::from(bar_width >= 3);
            let start_x = (width - bar_width * n) / 2;
            self.magnitudes
                .iter()
                .enumerate()
                .flat_map(|(i, &mag)| {
                    let x0 = start_x + i * bar_width;
                    (x0..x0 + bar_width - gap).map(move |x| (x, mag))
                })
                .collect()
        } else {
            (0..width)
                .map(|col| {
                    let start = col * n / width;
                    let end = ((col + 1) * n / width).max(start + 1);
                    let mag = self.magnitudes[start..end]
                        .iter()
                        .cloned()
                        .fold(0.0f32, f32::max);
                    (col, mag)
                })
                .collect()
        }
    }
}

impl Widget for SpectrumWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if self.borders {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border())
                .title(Span::styled(self.title, self.theme.title()));
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let height = inner.height;
        for (offset, magnitude) in self.columns(inner.width as usize) {
            let x = inner.x + offset as u16;
            let style = self.theme.bar_style(magnitude);
            let bar = Self::render_bar(magnitude, height);

            // Render from bottom to top
            for (row, &ch) in bar.iter().enumerate() {
                if ch == ' ' {
                    break;
                }
                let y = inner.y + height - 1 - row as u16;
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf[(x, y)].symbol()
    }

    #[test]
    fn test_render_bar_levels() {
        assert_eq!(SpectrumWidget::render_bar(0.0, 2), vec!['▁', ' ']);
        assert_eq!(SpectrumWidget::render_bar(0.5, 2), vec!['█', ' ']);
        assert_eq!(SpectrumWidget::render_bar(1.0, 2), vec!['█', '█']);
        assert_eq!(SpectrumWidget::render_bar(0.75, 2), vec!['█', '▄']);
    }

    #[test]
    fn test_wide_area_groups_columns() {
        let theme = Theme::default();
        let mags = [0.0, 1.0];
        let area = Rect::new(0, 0, 10, 6);
        let mut buf = Buffer::empty(area);
        SpectrumWidget::new(&mags, &theme).render(area, &mut buf);

        // Inner area is x 1..9, y 1..5; each bar gets 3 columns plus a gap
        assert_eq!(symbol(&buf, 1, 4), "▁");
        assert_eq!(symbol(&buf, 3, 4), "▁");
        assert_eq!(symbol(&buf, 1, 3), " ");
        assert_eq!(symbol(&buf, 4, 4), " ");
        for y in 1..5 {
            assert_eq!(symbol(&buf, 5, y), "█");
            assert_eq!(symbol(&buf, 7, y), "█");
        }
        assert_eq!(symbol(&buf, 8, 4), " ");
        assert_eq!(buf[(5, 1)].fg, theme.bar_color(1.0));
    }

    #[test]
    fn test_narrow_area_takes_loudest_bar() {
        let theme = Theme::default();
        let mut mags = [0.0f32; 16];
        mags[5] = 1.0;
        let area = Rect::new(0, 0, 4, 3);
        let mut buf = Buffer::empty(area);
        SpectrumWidget::new(&mags, &theme)
            .borders(false)
            .render(area, &mut buf);

        // Column 1 covers bars 4..8
        for y in 0..3 {
            assert_eq!(symbol(&buf, 1, y), "█");
        }
        assert_eq!(symbol(&buf, 0, 2), "▁");
        assert_eq!(symbol(&buf, 0, 1), " ");
    }

    #[test]
    fn test_empty_input_draws_nothing() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(area);
        SpectrumWidget::new(&[], &theme)
            .borders(false)
            .render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
