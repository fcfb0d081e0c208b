use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::model::upload::UploadField;
use crate::view::{centered_rect, spinner_char};

/// Render the upload modal overlay.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let upload = &app.upload;
    let popup = centered_rect(64, 18, f.area());

    let mut lines = vec![
        Line::from(Span::styled(
            " Upload a paper ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, field) in UploadField::ALL.into_iter().enumerate() {
        let indicator = if upload.cursor == i { "> " } else { "  " };
        if field == UploadField::Submit {
            lines.push(Line::from(""));
            let (label, style) = if upload.submitting {
                (
                    format!(" {} Uploading... ", spinner_char(app.tick)),
                    Style::default().fg(theme.dim),
                )
            } else if upload.cursor == i {
                (
                    " Submit ".to_string(),
                    Style::default()
                        .fg(theme.header_fg)
                        .bg(theme.active)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (" Submit ".to_string(), Style::default().fg(theme.active))
            };
            lines.push(Line::from(vec![
                Span::raw(format!("  {indicator}")),
                Span::styled(label, style),
            ]));
            continue;
        }

        let editing_this = upload.editing && upload.cursor == i;
        let value = if editing_this {
            let (before, after) = upload.edit_buffer.split_at(upload.edit_cursor);
            format!("{before}\u{2588}{after}")
        } else {
            upload.value(field)
        };
        let value_style = if editing_this {
            Style::default().fg(theme.active)
        } else if field.is_text() {
            Style::default().fg(theme.text)
        } else {
            Style::default().fg(theme.chip_on)
        };
        let required = matches!(field, UploadField::CourseTitle | UploadField::File);
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {indicator}{:<13}", format!("{}{}:", field.label(), if required { "*" } else { "" })),
                Style::default().fg(theme.text),
            ),
            Span::styled(value, value_style),
        ]));
    }

    if let Some(error) = &upload.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme.error),
        )));
    }

    lines.push(Line::from(""));
    let hint = if upload.editing {
        "  Type value, Enter:confirm, Esc:cancel"
    } else {
        "  j/k:navigate  Enter:edit/cycle/submit  Esc:close"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(theme.dim))));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Upload "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
