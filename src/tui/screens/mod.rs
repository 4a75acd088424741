//! TUI screen implementations.

pub mod enquiry;
pub mod help;

pub use enquiry::{EnquiryState, Focus, draw_enquiry};
pub use help::{HelpState, draw_help};
