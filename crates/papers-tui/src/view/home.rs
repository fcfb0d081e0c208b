use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use papers_core::LoadState;

use crate::app::{App, InputMode};
use crate::theme::Theme;
use crate::view::{spinner_char, truncate};

/// Render the Home screen into the given area.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect) {
    let [header_area, search_area, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    render_header(f, header_area, app);
    render_search_box(f, search_area, app);
    render_results(f, list_area, app);
    app.last_list_area = Some(list_area);
    app.list_offset = 0;
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let line = Line::from(vec![
        Span::styled(" Papers ", theme.header_style()),
        Span::styled(
            " Previous-year question papers",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", app.base_url), Style::default().fg(theme.dim)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_search_box(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.input_mode == InputMode::Search && !app.palette.open;
    let cursor = if focused { "\u{2588}" } else { "" };
    let content = if app.home.query.is_empty() && !focused {
        Line::from(Span::styled(
            "Press / to search by course name or code",
            Style::default().fg(theme.dim),
        ))
    } else {
        Line::from(vec![
            Span::styled(&app.home.query, Style::default().fg(theme.text)),
            Span::styled(cursor, Style::default().fg(theme.active)),
        ])
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.focus_border_style(focused))
        .title(" Search ");
    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = area.width.saturating_sub(4) as usize;

    let lines: Vec<Line> = match &app.home.courses {
        LoadState::Idle | LoadState::Loading => vec![status_line(
            format!("{} Loading courses...", spinner_char(app.tick)),
            theme.dim,
        )],
        LoadState::Failed(_) => vec![status_line("Failed to load courses".to_string(), theme.error)],
        LoadState::Loaded(_) => {
            let matches = app.home.matches();
            if matches.is_empty() {
                vec![status_line("No matching courses".to_string(), theme.dim)]
            } else {
                let cursor = app.home.cursor.min(matches.len() - 1);
                matches
                    .iter()
                    .enumerate()
                    .map(|(i, course)| course_line(course, i == cursor, width, theme))
                    .collect()
            }
        }
    };

    let title = if app.home.refreshing {
        format!(" Courses {} ", spinner_char(app.tick))
    } else {
        " Courses ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_line(text: String, color: ratatui::style::Color) -> Line<'static> {
    Line::from(Span::styled(format!(" {text}"), Style::default().fg(color)))
}

/// One search result: title, code, and paper count.
pub fn course_line(
    course: &papers_core::Course,
    highlighted: bool,
    width: usize,
    theme: &Theme,
) -> Line<'static> {
    let code = course.course_code.clone().unwrap_or_default();
    let count = format!("{} papers", course.paper_count);
    let title_width = width.saturating_sub(code.len() + count.len() + 6);
    let mut line = Line::from(vec![
        Span::styled(
            format!(" {:<w$}", truncate(&course.course_title, title_width), w = title_width),
            Style::default().fg(theme.text),
        ),
        Span::styled(format!("  {code}"), Style::default().fg(theme.active)),
        Span::styled(format!("  {count}"), Style::default().fg(theme.dim)),
    ]);
    if highlighted {
        line = line.style(theme.highlight_style());
    }
    line
}
