//! TUI: App state, event loop, delivery worker, screens, widgets.

pub mod action;
pub mod app;
pub mod delivery;
pub mod error;
pub mod screens;
pub mod widgets;

pub use app::App;
pub use delivery::{Delivered, DeliveryWorker};
pub use error::AppError;
