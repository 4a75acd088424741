//! Labelled single-line field box used by the form's selectors and inputs.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Everything needed to draw one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldView<'a> {
    /// Title shown on the top border.
    pub label: &'a str,
    /// Current value; `placeholder` is shown instead when empty.
    pub value: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
    /// Greyed out and not editable.
    pub disabled: bool,
    /// Marks the label with `*`.
    pub required: bool,
}

/// Border colour for a field in the given state.
///
/// Disabled wins over focus.
pub fn border_color(focused: bool, disabled: bool) -> Color {
    if disabled {
        Color::DarkGray
    } else if focused {
        Color::Yellow
    } else {
        Color::Gray
    }
}

/// Renders a bordered field within `area`.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_field(view: &FieldView, frame: &mut Frame, area: Rect) {
    let label = if view.required {
        format!(" {} * ", view.label)
    } else {
        format!(" {} ", view.label)
    };

    let block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(view.focused, view.disabled)));

    let span = if view.value.is_empty() {
        Span::styled(view.placeholder, Style::default().fg(Color::DarkGray))
    } else if view.disabled {
        Span::styled(view.value, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(view.value, Style::default().add_modifier(Modifier::BOLD))
    };

    frame.render_widget(Paragraph::new(Line::from(span)).block(block), area);
}
