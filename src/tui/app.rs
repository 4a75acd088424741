use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Frame, Terminal};

use crate::model::{EnquiryField, FormController, SubmitError, Submission};
use crate::webhook::WebhookError;

use super::action::{Action, ScreenState};
use super::delivery::{Delivered, DeliveryWorker};
use super::error::AppError;
use super::screens::{EnquiryState, Focus, HelpState, draw_enquiry, draw_help};

/// How long to wait for a key before checking on deliveries and redrawing.
const TICK: Duration = Duration::from_millis(100);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// The enquiry form.
    Enquiry,
    /// Show keybinding help.
    Help,
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    controller: FormController,
    enquiry: EnquiryState,
    help: HelpState,
    delivery: DeliveryWorker,
    /// Copy of the submission the worker is delivering.
    pending: Option<Submission>,
    tick: usize,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` on the [`Screen::Enquiry`] screen.
    pub fn new(controller: FormController, delivery: DeliveryWorker) -> Self {
        Self {
            screen: Screen::Enquiry,
            controller,
            enquiry: EnquiryState::new(),
            help: HelpState::new(),
            delivery,
            pending: None,
            tick: 0,
            should_quit: false,
        }
    }

    /// Main event loop: draw → poll key (one tick) → dispatch → collect deliveries.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }
            self.poll_delivery();
            self.tick = self.tick.wrapping_add(1);
        }
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::Enquiry => draw_enquiry(&self.enquiry, &self.controller, self.tick, frame, area),
            Screen::Help => draw_help(&self.help, frame, area),
        }
    }

    /// Handles a key event: global keys first, then the current screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::F(1) && self.screen != Screen::Help {
            self.help.reset();
            self.screen = Screen::Help;
            return;
        }

        let action = match self.screen {
            Screen::Enquiry => self.enquiry.handle_key(key, &self.controller),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
    }

    /// Applies an action produced by a screen.
    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => self.screen = screen,
            Action::SelectBranch(branch) => self.controller.select_branch(branch),
            Action::SelectSalesPerson(name) => self.controller.select_sales_person(name),
            Action::SetEnquiryField(row, field, value) => {
                self.controller.set_enquiry_field(row, field, value);
            }
            Action::AddRow => {
                self.controller.add_enquiry_row();
                let row = self.controller.form().enquiries().len() - 1;
                self.enquiry.set_focus(Focus::Cell {
                    row,
                    field: EnquiryField::CustomerName,
                });
            }
            Action::RemoveRow(row) => {
                self.controller.remove_enquiry_row(row);
                self.enquiry
                    .clamp_focus(self.controller.form().enquiries().len());
            }
            Action::Submit => self.start_submission(),
            Action::DismissStatus => self.controller.dismiss_status(),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Validates the form and hands it to the delivery worker.
    ///
    /// The controller flips to submitting before the job is queued, so a
    /// second submit key cannot queue a duplicate.
    fn start_submission(&mut self) {
        match self.controller.begin_submit() {
            Ok(submission) => {
                self.pending = Some(submission.clone());
                if let Err(submission) = self.delivery.dispatch(submission) {
                    tracing::error!("delivery worker has stopped");
                    self.finish(Delivered {
                        submission,
                        outcome: Err(WebhookError::WorkerStopped),
                    });
                }
            }
            Err(SubmitError::Validation(e)) => self.enquiry.show_alert(e.to_string()),
            Err(SubmitError::InFlight) => {}
        }
    }

    /// Applies any finished deliveries. Returns `true` if one was applied.
    ///
    /// A worker that died mid-delivery fails the pending submission.
    pub fn poll_delivery(&mut self) -> bool {
        let mut applied = false;
        loop {
            match self.delivery.try_outcome() {
                Ok(Some(delivered)) => self.finish(delivered),
                Ok(None) => break,
                Err(e) => {
                    let Some(submission) = self.pending.take() else {
                        break;
                    };
                    tracing::error!(error = %e, "delivery worker died mid-submission");
                    self.finish(Delivered {
                        submission,
                        outcome: Err(e),
                    });
                }
            }
            applied = true;
        }
        applied
    }

    fn finish(&mut self, delivered: Delivered) {
        self.pending = None;
        self.controller
            .finish_submit(delivered.submission, delivered.outcome);
        let rows = self.controller.form().enquiries().len();
        self.enquiry.clamp_focus(rows);
    }

    /// Blocks until the in-flight delivery finishes and applies it.
    #[cfg(test)]
    fn wait_for_delivery(&mut self) {
        if let Some(delivered) = self.delivery.wait_outcome() {
            self.finish(delivered);
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the form controller.
    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Returns the enquiry screen state.
    pub fn enquiry(&self) -> &EnquiryState {
        &self.enquiry
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::thread;

    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;
    use crate::model::{BranchSalesLookup, EnquiryFormData, SUBMIT_FAILED_MESSAGE, SubmitStatus};
    use crate::tui::delivery::tests::{CountingSink, PanickingSink};
    use crate::webhook::EnquirySink;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn make_app_with<S: EnquirySink + Send + 'static>(sink: S) -> App {
        let controller = FormController::with_clock(BranchSalesLookup::default(), today);
        App::new(controller, DeliveryWorker::spawn(sink).unwrap())
    }

    fn make_app() -> App {
        make_app_with(CountingSink::default())
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        key(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            app.handle_key(press(KeyCode::Char(ch)));
        }
    }

    /// Picks the first branch and salesperson, then fills the first row.
    fn fill_form(app: &mut App) {
        app.handle_key(press(KeyCode::Down)); // branch: Mumbai
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Down)); // sales: Amit Korgaonkar
        app.handle_key(press(KeyCode::Tab));
        type_str(app, "Shah Fabrics");
        app.handle_key(press(KeyCode::Tab));
        type_str(app, "Poplin 300m");
    }

    mod navigation {
        use super::*;

        #[test]
        fn starts_on_enquiry_form() {
            let app = make_app();
            assert_eq!(app.screen(), Screen::Enquiry);
            assert!(!app.should_quit());
            assert_eq!(app.controller().form(), &EnquiryFormData::new(today()));
        }

        #[test]
        fn f1_opens_help_and_q_returns() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::F(1)));
            assert_eq!(app.screen(), Screen::Help);
            app.handle_key(press(KeyCode::Char('q')));
            assert_eq!(app.screen(), Screen::Enquiry);
            assert!(!app.should_quit());
        }

        #[test]
        fn ctrl_c_quits_from_any_screen() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::F(1)));
            app.handle_key(ctrl('c'));
            assert!(app.should_quit());
        }

        #[test]
        fn esc_on_form_quits() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::Esc));
            assert!(app.should_quit());
        }

        #[test]
        fn release_events_are_ignored() {
            let mut app = make_app();
            app.handle_key(KeyEvent {
                code: KeyCode::Esc,
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Release,
                state: KeyEventState::NONE,
            });
            assert!(!app.should_quit());
        }
    }

    mod editing {
        use super::*;

        #[test]
        fn keys_fill_the_form() {
            let mut app = make_app();
            fill_form(&mut app);
            let form = app.controller().form();
            assert_eq!(form.branch_name, "Mumbai");
            assert_eq!(form.sales_person_name, "Amit Korgaonkar");
            assert_eq!(form.enquiries()[0].customer_name, "Shah Fabrics");
            assert_eq!(form.enquiries()[0].enquiry, "Poplin 300m");
        }

        #[test]
        fn changing_branch_clears_sales_person() {
            let mut app = make_app();
            fill_form(&mut app);
            app.enquiry.set_focus(Focus::Branch);
            app.handle_key(press(KeyCode::Down));
            let form = app.controller().form();
            assert_eq!(form.branch_name, "Ulasnagar");
            assert_eq!(form.sales_person_name, "");
        }

        #[test]
        fn add_row_focuses_new_row() {
            let mut app = make_app();
            app.handle_key(ctrl('n'));
            app.handle_key(ctrl('n'));
            let sr_nos: Vec<usize> = app
                .controller()
                .form()
                .enquiries()
                .iter()
                .map(|e| e.sr_no)
                .collect();
            assert_eq!(sr_nos, vec![1, 2, 3]);
            assert_eq!(
                app.enquiry().focus(),
                Focus::Cell {
                    row: 2,
                    field: EnquiryField::CustomerName
                }
            );
        }

        #[test]
        fn removing_last_row_moves_focus_up() {
            let mut app = make_app();
            app.handle_key(ctrl('n'));
            app.handle_key(ctrl('d'));
            assert_eq!(app.controller().form().enquiries().len(), 1);
            assert_eq!(
                app.enquiry().focus(),
                Focus::Cell {
                    row: 0,
                    field: EnquiryField::CustomerName
                }
            );
        }
    }

    mod submitting {
        use super::*;

        #[test]
        fn incomplete_form_shows_alert_and_sends_nothing() {
            let sink = CountingSink::default();
            let calls = Arc::clone(&sink.calls);
            let mut app = make_app_with(sink);

            app.handle_key(ctrl('s'));

            assert_eq!(
                app.enquiry().alert(),
                Some("Please select both Branch and Sales Person.")
            );
            assert!(!app.controller().is_submitting());
            assert!(!app.poll_delivery());
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn successful_submit_resets_form() {
            let mut app = make_app();
            fill_form(&mut app);

            app.handle_key(ctrl('s'));
            assert!(app.controller().is_submitting());
            app.wait_for_delivery();

            assert!(!app.controller().is_submitting());
            assert_eq!(app.controller().form(), &EnquiryFormData::new(today()));
            let status = app.controller().status().unwrap();
            assert!(status.is_success());
            assert!(status.message().contains("Mumbai"));
            assert_eq!(
                app.enquiry().focus(),
                Focus::Cell {
                    row: 0,
                    field: EnquiryField::Enquiry
                }
            );
        }

        #[test]
        fn failed_submit_keeps_form() {
            let mut app = make_app_with(CountingSink {
                fail: true,
                ..CountingSink::default()
            });
            fill_form(&mut app);
            let before = app.controller().form().clone();

            app.handle_key(ctrl('s'));
            app.wait_for_delivery();

            assert!(!app.controller().is_submitting());
            assert_eq!(app.controller().form(), &before);
            assert_eq!(
                app.controller().status(),
                Some(&SubmitStatus::Error(SUBMIT_FAILED_MESSAGE.to_string()))
            );
        }

        #[test]
        fn double_submit_sends_once() {
            let sink = CountingSink::default();
            let calls = Arc::clone(&sink.calls);
            let mut app = make_app_with(sink);
            fill_form(&mut app);

            app.handle_key(ctrl('s'));
            app.handle_key(ctrl('s'));
            app.wait_for_delivery();

            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert!(!app.poll_delivery());
        }

        #[test]
        fn esc_dismisses_banner_then_quits() {
            let mut app = make_app();
            fill_form(&mut app);
            app.handle_key(ctrl('s'));
            app.wait_for_delivery();

            app.handle_key(press(KeyCode::Esc));
            assert_eq!(app.controller().status(), None);
            assert!(!app.should_quit());

            app.handle_key(press(KeyCode::Esc));
            assert!(app.should_quit());
        }

        #[test]
        fn worker_dying_mid_delivery_returns_to_idle() {
            let mut app = make_app_with(PanickingSink);
            fill_form(&mut app);
            let before = app.controller().form().clone();

            app.handle_key(ctrl('s'));
            assert!(app.controller().is_submitting());
            for _ in 0..500 {
                if app.poll_delivery() {
                    break;
                }
                thread::sleep(Duration::from_millis(10));
            }

            assert!(!app.controller().is_submitting());
            assert_eq!(app.controller().form(), &before);
            assert_eq!(
                app.controller().status(),
                Some(&SubmitStatus::Error(SUBMIT_FAILED_MESSAGE.to_string()))
            );

            app.handle_key(press(KeyCode::Esc));
            app.handle_key(press(KeyCode::Esc));
            assert!(app.should_quit());
        }

        #[test]
        fn resubmit_after_worker_died_fails_again() {
            let mut app = make_app_with(PanickingSink);
            fill_form(&mut app);
            for _ in 0..2 {
                app.controller.dismiss_status();
                app.handle_key(ctrl('s'));
                for _ in 0..500 {
                    if !app.controller().is_submitting() {
                        break;
                    }
                    app.poll_delivery();
                    thread::sleep(Duration::from_millis(10));
                }
                assert!(!app.controller().is_submitting());
                assert!(!app.controller().status().unwrap().is_success());
            }
            assert!(!app.should_quit());
        }
    }
}
