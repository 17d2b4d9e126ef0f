//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The layout is a three-row split: the banner strip on top (only when a
//! banner is visible), the details pane in the middle and a one-line status
//! bar at the bottom.  An absent banner and a banner that has not been
//! fetched yet look the same: no strip at all.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::banner::{Banner, BannerColor};

/// Tallest the banner strip may grow, borders included.
const MAX_BANNER_HEIGHT: u16 = 6;

/// Draw the complete UI for one frame.
pub fn draw(app: &App, frame: &mut Frame) {
    let banner = app.visible_banner();
    let text = banner.map(Banner::plain_text);
    let strip_height = text.as_deref().map_or(0, banner_height);

    let [banner_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(strip_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if let (Some(banner), Some(text)) = (banner, text) {
        draw_banner(banner, text, frame, banner_area);
    }
    draw_details(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn banner_height(text: &str) -> u16 {
    let lines = u16::try_from(text.lines().count().max(1)).unwrap_or(u16::MAX);
    lines.saturating_add(2).min(MAX_BANNER_HEIGHT)
}

/// Display colours for a tag.  Unknown tags get a neutral style; the tag
/// itself is left as received.
pub fn banner_style(color: &BannerColor) -> Style {
    match color {
        BannerColor::Pink => Style::default().fg(Color::Black).bg(Color::Magenta),
        BannerColor::Green => Style::default().fg(Color::Black).bg(Color::Green),
        BannerColor::Other(_) => Style::default().fg(Color::White).bg(Color::DarkGray),
    }
}

fn draw_banner(banner: &Banner, text: String, frame: &mut Frame, area: Rect) {
    let style = banner_style(&banner.color_tag);
    let paragraph = Paragraph::new(text)
        .style(style.add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).style(style));

    frame.render_widget(paragraph, area);
}

/// Render the middle pane: where the banner comes from and what it holds.
fn draw_details(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Banner ").borders(Borders::ALL);

    if !app.show_details {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Press ? to show details",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let label = |name: &'static str| {
        Span::styled(format!("{name:<11}"), Style::default().fg(Color::DarkGray))
    };

    let state = match (&app.banner, app.dismissed) {
        (None, _) => "absent",
        (Some(_), true) => "present (dismissed)",
        (Some(_), false) => "present",
    };
    let settled = app
        .last_settled
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".into());

    let mut lines = vec![
        Line::from(vec![label("platform"), Span::raw(app.platform.to_string())]),
        Line::from(vec![label("endpoint"), Span::raw(app.endpoint.as_str())]),
        Line::from(vec![label("state"), Span::raw(state)]),
        Line::from(vec![
            label("last fetch"),
            Span::raw(settled),
            Span::styled(
                format!("  ({} so far)", app.settlements),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    if let Some(banner) = &app.banner {
        let mut color = vec![
            label("color"),
            Span::styled(banner.color_tag.as_str(), banner_style(&banner.color_tag)),
        ];
        if !banner.color_tag.is_known() {
            color.push(Span::styled(
                "  (unrecognized tag)",
                Style::default().fg(Color::Yellow),
            ));
        }
        lines.push(Line::from(color));
        lines.push(Line::from(vec![
            label("markup"),
            Span::styled(banner.content.as_str(), Style::default().fg(Color::Cyan)),
        ]));
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(details, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit  r: refresh  x: dismiss  ?: details"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use chrono::{Local, TimeZone};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &App) -> Terminal<TestBackend> {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let width = buf.area.width as usize;
        buf.content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with(banner: Option<Banner>) -> App {
        let mut app = App::new(Platform::Hybrid, "https://bikeaction.org/lazer/api/banner/");
        let at = Local.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        app.apply_banner(banner, at);
        app
    }

    #[test]
    fn draw_does_not_panic_before_first_fetch() {
        let app = App::new(Platform::Browser, "/lazer/api/banner/");
        let text = screen_text(&render(&app));
        assert!(text.contains("never"));
        assert!(text.contains("absent"));
    }

    #[test]
    fn banner_text_is_rendered_without_markup() {
        let app = app_with(Some(Banner::new("<b>Group ride Saturday</b>", "pink")));
        let terminal = render(&app);
        let text = screen_text(&terminal);

        let first_line = text.lines().nth(1).unwrap();
        assert!(first_line.contains("Group ride Saturday"));
        assert!(!first_line.contains("<b>"));
    }

    #[test]
    fn banner_strip_uses_tag_colour() {
        let app = app_with(Some(Banner::new("Hello", "green")));
        let terminal = render(&app);
        let cell = &terminal.backend().buffer()[(0u16, 0u16)];
        assert_eq!(cell.bg, Color::Green);
    }

    #[test]
    fn absent_banner_draws_no_strip() {
        let app = app_with(None);
        let text = screen_text(&render(&app));
        assert!(
            text.lines().next().unwrap().contains("Banner"),
            "details pane starts at the top"
        );
    }

    #[test]
    fn dismissed_banner_draws_no_strip() {
        let mut app = app_with(Some(Banner::new("Hello", "pink")));
        app.dismiss();
        let text = screen_text(&render(&app));
        assert!(text.lines().next().unwrap().contains("Banner"));
        assert!(text.contains("present (dismissed)"));
    }

    #[test]
    fn unknown_tag_is_flagged_in_details() {
        let app = app_with(Some(Banner::new("Hello", "blue")));
        let text = screen_text(&render(&app));
        assert!(text.contains("unrecognized tag"));
    }

    #[test]
    fn hidden_details_show_hint() {
        let mut app = app_with(None);
        app.toggle_details();
        let text = screen_text(&render(&app));
        assert!(text.contains("Press ? to show details"));
    }

    #[test]
    fn status_bar_shows_status() {
        let app = app_with(Some(Banner::new("Hello", "pink")));
        let text = screen_text(&render(&app));
        assert!(text.lines().last().unwrap().contains("Banner updated at 12:00:00"));
    }

    #[test]
    fn banner_height_is_capped() {
        assert_eq!(banner_height("one line"), 3);
        assert_eq!(banner_height(""), 3);
        assert_eq!(banner_height("a\nb\nc\nd\ne\nf"), MAX_BANNER_HEIGHT);
    }

    #[test]
    fn banner_height_survives_huge_line_counts() {
        for count in [65_533, 65_534, 65_535, 70_000] {
            let text = "a\n".repeat(count);
            assert_eq!(banner_height(&text), MAX_BANNER_HEIGHT, "{count} lines");
        }
    }

    #[test]
    fn draw_handles_banner_with_many_line_breaks() {
        let content = "a<br>".repeat(65_533) + "a";
        let app = app_with(Some(Banner::new(content, "pink")));
        let text = screen_text(&render(&app));
        assert!(text.lines().nth(1).unwrap().contains('a'));
    }

    #[test]
    fn styles_per_tag() {
        assert_eq!(banner_style(&BannerColor::Pink).bg, Some(Color::Magenta));
        assert_eq!(banner_style(&BannerColor::Green).bg, Some(Color::Green));
        assert_eq!(
            banner_style(&BannerColor::Other("blue".into())).bg,
            Some(Color::DarkGray)
        );
    }
}
