mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Popup};
use crate::pricing::{Quote, YEARLY_DISCOUNT};
use crate::theme::Palette;
use components::{billing_switch, theme_switch, SliderBar, SWITCH_WIDTH};

const CARD_MAX_WIDTH: u16 = 64;
const HEADER_HEIGHT: u16 = 3;
const THEME_SWITCH_WIDTH: u16 = 9;

const MONTHLY_LABEL: &str = "Monthly Billing ";
const YEARLY_LABEL: &str = " Yearly Billing  ";

const FEATURES: [&str; 3] = ["Unlimited websites", "100% data ownership", "Email reports"];

fn discount_badge() -> String {
    format!(" -{}% ", (YEARLY_DISCOUNT * 100.0).round() as u32)
}

fn billing_row_width() -> u16 {
    (MONTHLY_LABEL.len() + YEARLY_LABEL.len() + discount_badge().len()) as u16 + SWITCH_WIDTH
}

/// Screen regions of the pricing page.
///
/// Rendering and mouse hit-testing both go through this, so the track a click
/// is resolved against is the track that was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub info: Rect,
    pub theme_switch: Rect,
    pub header: Rect,
    pub card: Rect,
    pub summary: Rect,
    pub slider: Rect,
    pub billing: Rect,
    pub billing_switch: Rect,
    pub divider: Rect,
    pub features: Rect,
    pub button: Rect,
    pub footer: Rect,
}

/// One content row of the card, empty when it does not fit
fn card_row(content: Rect, line: u16, height: u16) -> Rect {
    Rect::new(content.x, content.y.saturating_add(line), content.width, height).intersection(content)
}

pub fn layout(area: Rect, show_features: bool) -> PageLayout {
    let info = Rect::new(area.x, area.y, area.width, area.height.min(1));
    let footer = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, area.height.min(1));

    let theme_width = THEME_SWITCH_WIDTH.min(area.width);
    let theme_switch = Rect::new(area.right().saturating_sub(theme_width), area.y, theme_width, info.height);

    // Everything between the info line and the footer
    let body = Rect::new(
        area.x,
        area.y.saturating_add(1),
        area.width,
        area.height.saturating_sub(2),
    );

    let header = Rect::new(body.x, body.y.saturating_add(1), body.width, HEADER_HEIGHT).intersection(body);

    let feature_lines: u16 = if show_features { FEATURES.len() as u16 } else { 0 };
    // summary, gap, slider, gap, billing, divider, features, gap, button
    let inner_lines = 6 + feature_lines + 2;
    let card_width = CARD_MAX_WIDTH.min(area.width);
    let card = Rect::new(
        area.x + (area.width - card_width) / 2,
        header.bottom().saturating_add(1),
        card_width,
        inner_lines + 2,
    )
    .intersection(body);

    let content = Rect::new(
        card.x.saturating_add(2),
        card.y.saturating_add(1),
        card.width.saturating_sub(4),
        card.height.saturating_sub(2),
    );

    let summary = card_row(content, 0, 1);
    let slider = card_row(content, 2, 1);
    let billing = card_row(content, 4, 1);
    let divider = card_row(content, 5, 1);
    let features = card_row(content, 6, feature_lines);
    let button = card_row(content, 6 + feature_lines + 1, 1);

    let pad = billing.width.saturating_sub(billing_row_width()) / 2;
    let billing_switch = Rect::new(
        billing.x.saturating_add(pad + MONTHLY_LABEL.len() as u16),
        billing.y,
        SWITCH_WIDTH,
        billing.height,
    )
    .intersection(billing);

    PageLayout {
        info,
        theme_switch,
        header,
        card,
        summary,
        slider,
        billing,
        billing_switch,
        divider,
        features,
        button,
        footer,
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let palette = app.theme.palette();
    let regions = layout(area, app.show_features);

    f.render_widget(Block::default().style(Style::default().bg(palette.bg)), area);

    draw_info_line(f, app, &palette, &regions);
    draw_header(f, &palette, regions.header);
    draw_card(f, app, &palette, &regions);
    draw_footer(f, app, &palette, regions.footer);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, &palette),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, palette: &Palette, regions: &PageLayout) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(palette.badge_text)))
    } else if app.slider.is_dragging() {
        Line::from(Span::styled("Dragging… release to set", Style::default().fg(palette.text_dim)))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(palette.text_dim)))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), regions.info);
    f.render_widget(
        Paragraph::new(theme_switch(app.theme, app.focus == Focus::Theme, palette)),
        regions.theme_switch,
    );
}

fn draw_header(f: &mut Frame, palette: &Palette, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Simple, traffic-based pricing",
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Sign-up for our 30-day trial.", Style::default().fg(palette.text_dim))),
        Line::from(Span::styled("No credit card required.", Style::default().fg(palette.text_dim))),
    ])
    .alignment(Alignment::Center);

    f.render_widget(header, area);
}

fn draw_card(f: &mut Frame, app: &App, palette: &Palette, regions: &PageLayout) {
    let card_style = Style::default().bg(palette.card_bg);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.track))
        .style(card_style);
    f.render_widget(block, regions.card);

    let quote = Quote::new(app.slider.index(), app.billing);

    // Pageviews on the left, price on the right
    let summary = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(regions.summary);
    f.render_widget(
        Paragraph::new(Span::styled(
            quote.pageviews_label(),
            Style::default().fg(palette.text_dim).add_modifier(Modifier::BOLD),
        )),
        summary[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                quote.display_price.clone(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", quote.period_label()), Style::default().fg(palette.text_dim)),
        ]))
        .alignment(Alignment::Right),
        summary[1],
    );

    f.render_widget(
        SliderBar {
            fill: app.slider.fill_fraction(),
            palette,
            focused: app.focus == Focus::Slider,
            dragging: app.slider.is_dragging(),
        },
        regions.slider,
    );

    draw_billing_row(f, app, palette, regions);

    f.render_widget(
        Paragraph::new(Span::styled(
            "─".repeat(regions.divider.width as usize),
            Style::default().fg(palette.track),
        )),
        regions.divider,
    );

    if app.show_features {
        let lines: Vec<Line> = FEATURES
            .iter()
            .map(|feature| {
                Line::from(vec![
                    Span::styled("✓ ", Style::default().fg(palette.accent)),
                    Span::styled(*feature, Style::default().fg(palette.text_dim)),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), regions.features);
    }

    let button = Paragraph::new(Span::styled(
        "  Start my trial  ",
        Style::default()
            .fg(palette.button_text)
            .bg(palette.button_bg)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(button, regions.button);
}

fn draw_billing_row(f: &mut Frame, app: &App, palette: &Palette, regions: &PageLayout) {
    let row = regions.billing;
    let switch = regions.billing_switch;
    let dim = Style::default().fg(palette.text_dim);

    // Labels are right/left aligned against the switch so its column is fixed
    let left = Rect::new(row.x, row.y, switch.x.saturating_sub(row.x), row.height);
    f.render_widget(
        Paragraph::new(Span::styled(MONTHLY_LABEL, dim)).alignment(Alignment::Right),
        left,
    );

    f.render_widget(
        Paragraph::new(billing_switch(app.billing.is_yearly(), app.focus == Focus::Billing, palette)),
        switch,
    );

    let right = Rect::new(switch.right(), row.y, row.right().saturating_sub(switch.right()), row.height);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(YEARLY_LABEL, dim),
            Span::styled(
                discount_badge(),
                Style::default()
                    .fg(palette.badge_text)
                    .bg(palette.badge_bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        right,
    );
}

fn draw_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.focus {
        Focus::Slider => vec![
            ("←→", "Tier"),
            ("1-5", "Jump"),
            ("y", "Yearly"),
            ("t", "Theme"),
            ("Tab", "Next"),
            ("?", "Help"),
        ],
        Focus::Billing => vec![
            ("Space", "Toggle"),
            ("←→", "Period"),
            ("Tab", "Next"),
            ("?", "Help"),
        ],
        Focus::Theme => vec![
            ("Space", "Toggle"),
            ("Tab", "Next"),
            ("?", "Help"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 3 } else if area.width < 80 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(palette.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(palette.text_dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame, palette: &Palette) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 90 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let heading = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(palette.accent);

    let help_text = vec![
        Line::from(Span::styled("═══ Slider ═══", heading)),
        Line::from(vec![
            Span::styled("  ←/→ h/l   ", key),
            Span::raw("Previous/next tier"),
        ]),
        Line::from(vec![
            Span::styled("  Home/End  ", key),
            Span::raw("Smallest/largest tier"),
        ]),
        Line::from(vec![
            Span::styled("  1-5       ", key),
            Span::raw("Jump to a tier"),
        ]),
        Line::from(vec![
            Span::styled("  Mouse     ", key),
            Span::raw("Click or drag the track"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Toggles ═══", heading)),
        Line::from(vec![
            Span::styled("  y         ", key),
            Span::raw("Monthly/yearly billing (yearly is 25% off)"),
        ]),
        Line::from(vec![
            Span::styled("  t         ", key),
            Span::raw("Light/dark theme (remembered)"),
        ]),
        Line::from(vec![
            Span::styled("  Tab       ", key),
            Span::raw("Move focus: slider → billing → theme"),
        ]),
        Line::from(vec![
            Span::styled("  Space     ", key),
            Span::raw("Toggle the focused switch"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(palette.text_dim)),
            Span::styled("?", key),
            Span::styled("/", Style::default().fg(palette.text_dim)),
            Span::styled("Esc", key),
            Span::styled(" to close, ", Style::default().fg(palette.text_dim)),
            Span::styled("q", key),
            Span::styled(" to quit", Style::default().fg(palette.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" tierslide Help ", key))
                .borders(Borders::ALL)
                .border_style(key)
                .style(Style::default().bg(palette.card_bg).fg(palette.text)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::config::AppConfig;
    use crate::store::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_layout_on_standard_terminal() {
        let regions = layout(Rect::new(0, 0, 80, 30), true);
        assert_eq!(regions.card, Rect::new(8, 6, 64, 13));
        assert_eq!(regions.slider, Rect::new(10, 9, 60, 1));
        assert_eq!(regions.billing_switch, Rect::new(10 + 8 + 16, 11, SWITCH_WIDTH, 1));
        assert_eq!(regions.theme_switch, Rect::new(71, 0, 9, 1));
        assert_eq!(regions.button.y, 17);
        assert_eq!(regions.footer.y, 29);
    }

    #[test]
    fn test_layout_without_features_is_shorter() {
        let with = layout(Rect::new(0, 0, 80, 30), true);
        let without = layout(Rect::new(0, 0, 80, 30), false);
        assert_eq!(without.card.height + 3, with.card.height);
        assert_eq!(without.features.height, 0);
    }

    #[test]
    fn test_layout_tiny_terminal_does_not_panic() {
        for (w, h) in [(0, 0), (1, 1), (10, 3), (30, 8)] {
            let regions = layout(Rect::new(0, 0, w, h), true);
            assert!(regions.slider.width <= w);
        }
    }

    #[test]
    fn test_draw_shows_quote() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = App::new(&AppConfig::default(), Box::new(MemoryStore::new()), Default::default()).unwrap();

        terminal.draw(|f| draw(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(text.contains("100K PAGEVIEWS"));
        assert!(text.contains("$16.00"));
        assert!(text.contains("/ month"));
        assert!(text.contains("-25%"));
        assert!(text.contains("Start my trial"));
    }
}
