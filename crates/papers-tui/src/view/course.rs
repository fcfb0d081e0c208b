use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use papers_core::{Facet, LoadState, format_year};

use crate::app::App;
use crate::model::course::Pane;
use crate::theme::Theme;
use crate::view::{scroll_offset, spinner_char, truncate};

const FILTER_PANEL_WIDTH: u16 = 36;

/// Render the Course screen into the given area.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect) {
    let [header_area, body_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(3)]).areas(area);
    render_header(f, header_area, app);

    let panel_width = FILTER_PANEL_WIDTH.min(body_area.width / 2);
    let [filter_area, list_area] =
        Layout::horizontal([Constraint::Length(panel_width), Constraint::Min(20)])
            .areas(body_area);

    render_filters(f, filter_area, app);
    render_papers(f, list_area, app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let course = &app.course;
    let mut title = vec![
        Span::styled(" Course ", theme.header_style()),
        Span::styled(
            format!(" {}", course.scope.title()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    if !course.selection.is_empty() {
        title.push(Span::styled(
            format!(
                "  [{} of {} shown]",
                course.visible.len(),
                course.papers().len()
            ),
            Style::default().fg(theme.active),
        ));
    }
    let subtitle_color = if course.catalog.error().is_some() {
        theme.error
    } else {
        theme.dim
    };
    let lines = vec![
        Line::from(title),
        Line::from(Span::styled(
            format!(" {}", course.subtitle()),
            Style::default().fg(subtitle_color),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_filters(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let course = &app.course;
    let focused = course.focus == Pane::Filters;

    let mut lines = Vec::new();
    for (row, facet) in Facet::ALL.into_iter().enumerate() {
        if row > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            facet.label(),
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        )));

        let mut spans = Vec::new();
        for (col, value) in facet.candidates().iter().enumerate() {
            let selected = course.selection.is_selected(facet, value);
            let count = course.counts.get(facet, value);
            let mark = if selected { "\u{25A0}" } else { "\u{25A1}" };
            let mut style = theme.chip_style(selected);
            if count == 0 && !selected {
                style = style.fg(theme.dim);
            }
            if focused && row == course.chip_row && col == course.chip_col {
                style = style.patch(theme.highlight_style());
            }
            spans.push(Span::styled(
                format!("{mark} {} ({count})", facet.display_value(value)),
                style,
            ));
            spans.push(Span::raw("  "));
        }
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.focus_border_style(focused))
        .title(" Filters ");
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_papers(f: &mut Frame, area: Rect, app: &mut App) {
    let course = &app.course;
    let theme = &app.theme;
    let focused = course.focus == Pane::Papers;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.focus_border_style(focused))
        .title(" Papers ");

    let placeholder = match &course.catalog {
        LoadState::Idle | LoadState::Loading => Some((
            format!("{} Loading papers...", spinner_char(app.tick)),
            theme.dim,
        )),
        LoadState::Failed(e) => Some((format!("Failed to load papers: {e}"), theme.error)),
        LoadState::Loaded(_) if course.papers().is_empty() => {
            Some(("No papers uploaded yet".to_string(), theme.dim))
        }
        LoadState::Loaded(_) if course.visible.is_empty() => Some((
            "No papers match the selected filters".to_string(),
            theme.dim,
        )),
        LoadState::Loaded(_) => None,
    };
    if let Some((text, color)) = placeholder {
        let line = Line::from(Span::styled(format!(" {text}"), Style::default().fg(color)));
        f.render_widget(Paragraph::new(line).block(block), area);
        app.last_list_area = Some(area);
        app.list_offset = 0;
        return;
    }

    // Border (2) + header row (1)
    let height = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(course.paper_cursor, height);
    let name_width = area.width.saturating_sub(42) as usize;
    let papers = course.papers();
    let done_set = app.done.snapshot();

    let header = Row::new(vec!["", "Code", "Type", "Year", "Slot", "File"]).style(
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = course
        .visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .filter_map(|(row, &i)| papers.get(i).map(|p| (row, p)))
        .map(|(row, paper)| {
            let done = done_set.contains(&paper.filename);
            let row_style = if row == course.paper_cursor && focused {
                theme.highlight_style()
            } else if row == course.paper_cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            paper_row(paper, done, name_width, theme).style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);

    app.last_list_area = Some(area);
    app.list_offset = offset;
}

fn paper_row(paper: &papers_core::Paper, done: bool, name_width: usize, theme: &Theme) -> Row<'static> {
    let (mark, mark_style) = if done {
        ("\u{2713}", Style::default().fg(theme.done))
    } else {
        (" ", Style::default())
    };
    let text_style = if done {
        Style::default().fg(theme.dim)
    } else {
        Style::default().fg(theme.text)
    };
    Row::new(vec![
        Cell::from(Span::styled(mark, mark_style)),
        Cell::from(Span::styled(paper.code_label().to_string(), text_style)),
        Cell::from(Span::styled(
            Facet::ExamType.display_value(&paper.exam_type),
            text_style,
        )),
        Cell::from(Span::styled(format_year(&paper.semester_name), text_style)),
        Cell::from(Span::styled(paper.slot.to_uppercase(), text_style)),
        Cell::from(Span::styled(truncate(&paper.filename, name_width), text_style)),
    ])
}
