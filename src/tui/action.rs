//! Actions returned by screen event handlers.

use crossterm::event::KeyEvent;

use crate::model::EnquiryField;

use super::app::Screen;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` applies these to the [`FormController`](crate::model::FormController)
/// and switches screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Choose a branch; an empty string clears the selection.
    SelectBranch(String),
    /// Choose a salesperson; an empty string clears the selection.
    SelectSalesPerson(String),
    /// Replace one text field of an enquiry row.
    SetEnquiryField(usize, EnquiryField, String),
    /// Append a blank enquiry row.
    AddRow,
    /// Remove the enquiry row at the given index.
    RemoveRow(usize),
    /// Validate and send the form to the webhook.
    Submit,
    /// Hide the success/error banner.
    DismissStatus,
    /// Quit the application.
    Quit,
}

/// Common behavior for screens that need nothing but the key.
pub trait ScreenState {
    /// Process a key event and return an [`Action`] for the `App` to apply.
    fn handle_key(&mut self, key: KeyEvent) -> Action;
}
