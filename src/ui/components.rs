//! Slider bar and toggle switches

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::{Palette, ThemeMode};

/// Width of the billing switch, in cells
pub const SWITCH_WIDTH: u16 = 5;

/// One-row slider: filled track, thumb, empty track.
///
/// The thumb sits at `fill * (width - 1)`, the inverse of `Track::from_rect`,
/// so clicking a cell and drawing the resulting tier land on the same column.
pub struct SliderBar<'a> {
    pub fill: f64,
    pub palette: &'a Palette,
    pub focused: bool,
    pub dragging: bool,
}

impl SliderBar<'_> {
    pub fn thumb_offset(fill: f64, width: u16) -> u16 {
        if width == 0 {
            return 0;
        }
        let last = (width - 1) as f64;
        (fill.clamp(0.0, 1.0) * last).round() as u16
    }
}

impl Widget for SliderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let thumb = Self::thumb_offset(self.fill, area.width);
        let y = area.y;

        for offset in 0..area.width {
            let x = area.x + offset;
            let (symbol, style) = if offset < thumb {
                ("━", Style::default().fg(self.palette.fill))
            } else if offset == thumb {
                let symbol = if self.dragging { "◆" } else { "●" };
                let mut style = Style::default().fg(self.palette.accent);
                if self.focused {
                    style = style.add_modifier(Modifier::BOLD);
                }
                (symbol, style)
            } else {
                ("─", Style::default().fg(self.palette.track))
            };
            buf[(x, y)].set_symbol(symbol).set_style(style);
        }
    }
}

/// Monthly/yearly switch, knob on the right when yearly
pub fn billing_switch(yearly: bool, focused: bool, palette: &Palette) -> Line<'static> {
    let color = if yearly { palette.accent } else { palette.toggle_off };
    let body = if yearly { "(  ●)" } else { "(●  )" };
    let mut style = Style::default().fg(color);
    if focused {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    Line::from(Span::styled(body, style))
}

/// Theme switch label showing the active mode
pub fn theme_switch(mode: ThemeMode, focused: bool, palette: &Palette) -> Line<'static> {
    let icon = match mode {
        ThemeMode::Light => "☀",
        ThemeMode::Dark => "☾",
    };
    let mut style = Style::default().fg(palette.text_dim);
    if focused {
        style = Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    Line::from(Span::styled(format!(" {} {:<5} ", icon, mode.as_str()), style))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_thumb_offset() {
        assert_eq!(SliderBar::thumb_offset(0.0, 21), 0);
        assert_eq!(SliderBar::thumb_offset(0.5, 21), 10);
        assert_eq!(SliderBar::thumb_offset(1.0, 21), 20);
        assert_eq!(SliderBar::thumb_offset(1.0, 0), 0);
    }

    #[test]
    fn test_slider_render() {
        let palette = Palette::light();
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        SliderBar { fill: 0.5, palette: &palette, focused: false, dragging: false }
            .render(area, &mut buf);
        assert_eq!(row(&buf, 5), "━━●──");

        let mut buf = Buffer::empty(area);
        SliderBar { fill: 1.0, palette: &palette, focused: true, dragging: true }
            .render(area, &mut buf);
        assert_eq!(row(&buf, 5), "━━━━◆");
    }

    #[test]
    fn test_switch_widths() {
        let palette = Palette::dark();
        assert_eq!(billing_switch(true, false, &palette).width(), SWITCH_WIDTH as usize);
        assert_eq!(billing_switch(false, true, &palette).width(), SWITCH_WIDTH as usize);
        assert_eq!(theme_switch(ThemeMode::Dark, false, &palette).width(), 9);
    }
}
