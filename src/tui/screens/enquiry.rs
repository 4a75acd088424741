//! Enquiry entry screen, with the whole form on one page.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::model::{EnquiryField, FormController};
use crate::tui::action::Action;
use crate::tui::widgets::{FieldView, draw_field, draw_status_banner, draw_submit_button};

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Branch,
    SalesPerson,
    /// A text cell in the enquiry table.
    Cell { row: usize, field: EnquiryField },
    AddRow,
    Submit,
}

/// Tab order for a form with `rows` enquiry rows.
fn focus_order(rows: usize) -> Vec<Focus> {
    let mut order = vec![Focus::Branch, Focus::SalesPerson];
    for row in 0..rows {
        order.push(Focus::Cell {
            row,
            field: EnquiryField::CustomerName,
        });
        order.push(Focus::Cell {
            row,
            field: EnquiryField::Enquiry,
        });
    }
    order.push(Focus::AddRow);
    order.push(Focus::Submit);
    order
}

/// Picks the neighbouring option in `options`, where `None` stands for "nothing selected".
///
/// Moving up from the first option clears the selection; moving past
/// either end otherwise stays put.
fn step_option<'a>(options: &'a [String], current: &str, forward: bool) -> Option<&'a str> {
    let pos = options.iter().position(|o| o == current);
    let next = match (pos, forward) {
        (None, true) => Some(0),
        (None, false) => None,
        (Some(i), true) => Some((i + 1).min(options.len().saturating_sub(1))),
        (Some(0), false) => None,
        (Some(i), false) => Some(i - 1),
    };
    next.and_then(|i| options.get(i)).map(String::as_str)
}

/// UI-only state for the enquiry screen: focus and the validation alert.
///
/// All form data lives in the [`FormController`].
#[derive(Debug, Clone)]
pub struct EnquiryState {
    focus: Focus,
    alert: Option<String>,
}

impl Default for EnquiryState {
    fn default() -> Self {
        Self::new()
    }
}

impl EnquiryState {
    /// Creates the screen state with focus on the branch selector.
    pub fn new() -> Self {
        Self {
            focus: Focus::Branch,
            alert: None,
        }
    }

    /// Returns the focused control.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Moves focus directly to `focus`.
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Returns the validation alert, if one is showing.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Shows a modal alert; the next key press dismisses it.
    pub fn show_alert(&mut self, msg: String) {
        self.alert = Some(msg);
    }

    /// Keeps focus on an existing row after rows were removed.
    pub fn clamp_focus(&mut self, rows: usize) {
        if let Focus::Cell { row, field } = self.focus
            && row >= rows
        {
            self.focus = Focus::Cell {
                row: rows.saturating_sub(1),
                field,
            };
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    ///
    /// While a submission is in flight only focus movement is accepted.
    pub fn handle_key(&mut self, key: KeyEvent, ctl: &FormController) -> Action {
        if self.alert.take().is_some() {
            return Action::None;
        }

        let rows = ctl.form().enquiries().len();
        match key.code {
            KeyCode::Tab => {
                self.cycle_focus(rows, true);
                return Action::None;
            }
            KeyCode::BackTab => {
                self.cycle_focus(rows, false);
                return Action::None;
            }
            KeyCode::Esc if ctl.status().is_some() => return Action::DismissStatus,
            KeyCode::Esc if !ctl.is_submitting() => return Action::Quit,
            _ => {}
        }

        if ctl.is_submitting() {
            return Action::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => Action::Submit,
                KeyCode::Char('n') => Action::AddRow,
                KeyCode::Char('d') => match self.focus {
                    Focus::Cell { row, .. } if rows > 1 => Action::RemoveRow(row),
                    _ => Action::None,
                },
                _ => Action::None,
            };
        }

        match self.focus {
            Focus::Branch => self.handle_branch_key(key, ctl),
            Focus::SalesPerson => Self::handle_sales_person_key(key, ctl),
            Focus::Cell { row, field } => self.handle_cell_key(key, ctl, row, field),
            Focus::AddRow => match key.code {
                KeyCode::Enter => Action::AddRow,
                _ => Action::None,
            },
            Focus::Submit => match key.code {
                KeyCode::Enter => Action::Submit,
                _ => Action::None,
            },
        }
    }

    fn cycle_focus(&mut self, rows: usize, forward: bool) {
        let order = focus_order(rows);
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn handle_branch_key(&mut self, key: KeyEvent, ctl: &FormController) -> Action {
        let forward = match key.code {
            KeyCode::Down | KeyCode::Right => true,
            KeyCode::Up | KeyCode::Left => false,
            KeyCode::Enter => {
                self.cycle_focus(ctl.form().enquiries().len(), true);
                return Action::None;
            }
            _ => return Action::None,
        };
        let branches: Vec<String> = ctl.lookup().branches().map(str::to_string).collect();
        let next = step_option(&branches, &ctl.form().branch_name, forward).unwrap_or("");
        if next == ctl.form().branch_name {
            Action::None
        } else {
            Action::SelectBranch(next.to_string())
        }
    }

    fn handle_sales_person_key(key: KeyEvent, ctl: &FormController) -> Action {
        if ctl.form().branch_name.is_empty() {
            return Action::None;
        }
        let forward = match key.code {
            KeyCode::Down | KeyCode::Right => true,
            KeyCode::Up | KeyCode::Left => false,
            _ => return Action::None,
        };
        let next =
            step_option(ctl.sales_people(), &ctl.form().sales_person_name, forward).unwrap_or("");
        if next == ctl.form().sales_person_name {
            Action::None
        } else {
            Action::SelectSalesPerson(next.to_string())
        }
    }

    fn handle_cell_key(
        &mut self,
        key: KeyEvent,
        ctl: &FormController,
        row: usize,
        field: EnquiryField,
    ) -> Action {
        let Some(current) = ctl.form().enquiries().get(row).map(|e| e.field(field)) else {
            return Action::None;
        };
        match key.code {
            KeyCode::Char(ch) => {
                let mut value = current.to_string();
                value.push(ch);
                Action::SetEnquiryField(row, field, value)
            }
            KeyCode::Backspace if !current.is_empty() => {
                let mut value = current.to_string();
                value.pop();
                Action::SetEnquiryField(row, field, value)
            }
            KeyCode::Enter => {
                self.cycle_focus(ctl.form().enquiries().len(), true);
                Action::None
            }
            _ => Action::None,
        }
    }
}

/// Renders the enquiry screen.
#[mutants::skip]
pub fn draw_enquiry(
    state: &EnquiryState,
    ctl: &FormController,
    tick: usize,
    frame: &mut Frame,
    area: Rect,
) {
    let block = Block::default()
        .title(" Dead Stock Enquiry Form ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner_height = if ctl.status().is_some() { 4 } else { 0 };
    let [selectors_area, table_area, add_area, banner_area, submit_area, footer_area] =
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(inner);

    draw_selectors(state, ctl, frame, selectors_area);
    draw_table(state, ctl, frame, table_area);

    let add_style = if state.focus() == Focus::AddRow {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(" + Add New Enquiry Line ", add_style)),
        add_area,
    );

    if let Some(status) = ctl.status() {
        draw_status_banner(status, frame, banner_area);
    }

    let [button_area] = Layout::horizontal([Constraint::Length(30)])
        .flex(Flex::Center)
        .areas(submit_area);
    draw_submit_button(
        ctl.is_submitting(),
        tick,
        state.focus() == Focus::Submit,
        frame,
        button_area,
    );

    let footer = Paragraph::new(Line::from(
        "Tab: next  ↑/↓: choose  Ctrl+N: add row  Ctrl+D: delete row  Ctrl+S: submit  F1: help",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    if let Some(alert) = state.alert() {
        draw_alert(alert, frame, area);
    }
}

#[mutants::skip]
fn draw_selectors(state: &EnquiryState, ctl: &FormController, frame: &mut Frame, area: Rect) {
    let [date_area, branch_area, person_area] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(area);

    let form = ctl.form();
    let date = form.date.format("%Y-%m-%d").to_string();
    draw_field(
        &FieldView {
            label: "Today's Date",
            value: &date,
            disabled: true,
            ..FieldView::default()
        },
        frame,
        date_area,
    );
    draw_field(
        &FieldView {
            label: "Branch Name",
            value: &form.branch_name,
            placeholder: "Select Branch",
            focused: state.focus() == Focus::Branch,
            required: true,
            ..FieldView::default()
        },
        frame,
        branch_area,
    );
    draw_field(
        &FieldView {
            label: "Sales Person",
            value: &form.sales_person_name,
            placeholder: "Select Name",
            focused: state.focus() == Focus::SalesPerson,
            disabled: form.branch_name.is_empty(),
            required: true,
            ..FieldView::default()
        },
        frame,
        person_area,
    );
}

#[mutants::skip]
fn draw_table(state: &EnquiryState, ctl: &FormController, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Customer Entries ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let header = Row::new(vec!["Sr. No", "Customer Name", "Enquiry Details", "Del"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let focused_style = Style::default().fg(Color::Black).bg(Color::Yellow);
    let placeholder_style = Style::default().fg(Color::DarkGray);
    let enquiries = ctl.form().enquiries();
    let removable = enquiries.len() > 1;

    let cell = |row: usize, field: EnquiryField, text: &str, placeholder: &'static str| {
        let focused = state.focus() == Focus::Cell { row, field };
        match (text.is_empty(), focused) {
            (_, true) => Line::from(Span::styled(format!("{text}\u{2588}"), focused_style)),
            (true, false) => Line::from(Span::styled(placeholder, placeholder_style)),
            (false, false) => Line::from(text.to_string()),
        }
    };

    let rows: Vec<Row> = enquiries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Row::new(vec![
                Line::from(e.sr_no.to_string()),
                cell(
                    i,
                    EnquiryField::CustomerName,
                    &e.customer_name,
                    "Customer Full Name",
                ),
                cell(
                    i,
                    EnquiryField::Enquiry,
                    &e.enquiry,
                    "Requirement specifics...",
                ),
                Line::from(if removable { "x" } else { "" }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Percentage(40),
        Constraint::Fill(1),
        Constraint::Length(4),
    ];

    let selected = match state.focus() {
        Focus::Cell { row, .. } => Some(row),
        _ => None,
    };
    let mut table_state = TableState::default().with_selected(selected);
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_stateful_widget(table, area, &mut table_state);
}

#[mutants::skip]
fn draw_alert(msg: &str, frame: &mut Frame, area: Rect) {
    let [vertical] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(50)])
        .flex(Flex::Center)
        .areas(vertical);

    let block = Block::default()
        .title(" Check the form ")
        .title_bottom(Line::from(" any key: close ").alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let paragraph = Paragraph::new(msg)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(block);

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
