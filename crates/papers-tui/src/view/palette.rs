use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use papers_core::{LoadState, MAX_MATCHES};

use crate::app::App;
use crate::model::home::match_with;
use crate::view::home::course_line;
use crate::view::{centered_rect, spinner_char};

/// Render the command palette overlay and remember its bounds.
pub fn render(f: &mut Frame, app: &mut App) {
    let theme = &app.theme;
    let popup = centered_rect(64, MAX_MATCHES as u16 + 6, f.area());
    let [input_area, results_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(popup);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.active)),
        Span::styled(&app.palette.query, Style::default().fg(theme.text)),
        Span::styled("\u{2588}", Style::default().fg(theme.active)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" Jump to course "),
    );

    let width = results_area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = match &app.home.courses {
        LoadState::Idle | LoadState::Loading => vec![Line::from(Span::styled(
            format!(" {} Loading courses...", spinner_char(app.tick)),
            Style::default().fg(theme.dim),
        ))],
        LoadState::Failed(_) => vec![Line::from(Span::styled(
            " Failed to load courses",
            Style::default().fg(theme.error),
        ))],
        LoadState::Loaded(_) => {
            let matches = match_with(&app.home.courses, &app.palette.query);
            if matches.is_empty() {
                vec![Line::from(Span::styled(
                    " No matching courses",
                    Style::default().fg(theme.dim),
                ))]
            } else {
                let cursor = app.palette.cursor.min(matches.len() - 1);
                matches
                    .iter()
                    .enumerate()
                    .map(|(i, course)| course_line(course, i == cursor, width, theme))
                    .collect()
            }
        }
    };
    let results = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Style::default().fg(theme.active)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(input, input_area);
    f.render_widget(results, results_area);
    app.palette.area = Some(popup);
}
