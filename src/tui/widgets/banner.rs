//! Submission feedback: the success/error banner and the submit button.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::SubmitStatus;

/// Spinner frames cycled while a submission is in flight.
pub const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Returns the spinner character for animation tick `tick`.
pub fn spinner_frame(tick: usize) -> char {
    SPINNER[tick % SPINNER.len()]
}

/// Renders the outcome of the last submission.
///
/// Success is drawn in green, failure in red; `Esc` dismisses it.
#[mutants::skip]
pub fn draw_status_banner(status: &SubmitStatus, frame: &mut Frame, area: Rect) {
    let (color, title) = if status.is_success() {
        (Color::Green, " Submitted ")
    } else {
        (Color::Red, " Not Submitted ")
    };

    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(" Esc: dismiss ").alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        status.message(),
        Style::default().fg(color),
    )))
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(paragraph, area);
}

/// Renders the submit button.
///
/// While `submitting`, the label becomes a spinner and `Syncing...` and the
/// button is drawn dimmed.
#[mutants::skip]
pub fn draw_submit_button(
    submitting: bool,
    tick: usize,
    focused: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let (label, style) = if submitting {
        (
            format!("{} Syncing...", spinner_frame(tick)),
            Style::default().fg(Color::DarkGray),
        )
    } else if focused {
        (
            "Submit to Sheet".to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "Submit to Sheet".to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };

    let border = if focused && !submitting {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let paragraph = Paragraph::new(Line::from(Span::styled(label, style)))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}
