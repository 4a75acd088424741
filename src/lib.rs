//! Dead-stock enquiry form: a terminal UI that records customer enquiries
//! for a branch and posts them to a spreadsheet webhook as JSON.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod model;
pub mod tui;
pub mod webhook;
