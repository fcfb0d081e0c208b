use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(64, 38, f.area());

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Home", theme),
        key_line("/", "Search courses", theme),
        key_line("j / k", "Move through results", theme),
        key_line("Enter", "Open highlighted course", theme),
        key_line("A", "Browse all papers", theme),
        key_line("r", "Reload course list", theme),
        Line::from(""),
        section_header("Course", theme),
        key_line("Tab", "Switch filters / papers", theme),
        key_line("h / l", "Move between filter chips", theme),
        key_line("Space", "Toggle chip / mark paper done", theme),
        key_line("x", "Clear all filters", theme),
        key_line("Enter", "Download paper", theme),
        key_line("y", "Copy download link (OSC 52)", theme),
        key_line("r", "Reload papers", theme),
        key_line("Esc", "Back to home", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("Ctrl+k / p", "Command palette", theme),
        key_line("u", "Upload a paper", theme),
        key_line("t", "Toggle dark / light theme", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
        Line::from(""),
        section_header("Mouse", theme),
        key_line("Click", "Open course / select paper", theme),
        key_line("Click outside", "Close the palette", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<14}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
