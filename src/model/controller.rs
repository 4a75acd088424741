use chrono::{NaiveDate, Utc};
use thiserror::Error;

use super::branch::BranchSalesLookup;
use super::enquiry::{EnquiryField, EnquiryFormData};
use super::validation::{ValidationError, validate_form};
use crate::webhook::{EnquirySink, WebhookError};

/// Shown after a failed delivery; the form is kept so the user can retry.
pub const SUBMIT_FAILED_MESSAGE: &str =
    "Submission failed. Please check your internet connection and try again.";

/// Returns the current UTC calendar date.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Outcome banner shown after a submission completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Success(String),
    Error(String),
}

impl SubmitStatus {
    /// Returns the banner text.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Error(msg) => msg,
        }
    }

    /// Returns `true` for a success banner.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Reasons a submission could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// A previous submission has not finished yet.
    #[error("a submission is already in progress")]
    InFlight,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A snapshot of the form taken when a submission starts.
///
/// Handed back to [`FormController::finish_submit`] once delivery completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    form: EnquiryFormData,
}

impl Submission {
    /// Returns the form exactly as it will be posted.
    pub fn form(&self) -> &EnquiryFormData {
        &self.form
    }
}

/// Owns the enquiry form and runs the submit protocol.
///
/// Submission state moves `Idle → Submitting → Idle`. While submitting, a
/// second [`begin_submit`](Self::begin_submit) is refused, so at most one
/// delivery is ever in flight.
#[derive(Debug, Clone)]
pub struct FormController {
    form: EnquiryFormData,
    lookup: BranchSalesLookup,
    is_submitting: bool,
    status: Option<SubmitStatus>,
    clock: fn() -> NaiveDate,
}

impl FormController {
    /// Creates a controller with a fresh form dated today (UTC).
    pub fn new(lookup: BranchSalesLookup) -> Self {
        Self::with_clock(lookup, utc_today)
    }

    /// Creates a controller whose form dates come from `clock`.
    pub fn with_clock(lookup: BranchSalesLookup, clock: fn() -> NaiveDate) -> Self {
        Self {
            form: EnquiryFormData::new(clock()),
            lookup,
            is_submitting: false,
            status: None,
            clock,
        }
    }

    /// Returns the current form.
    pub fn form(&self) -> &EnquiryFormData {
        &self.form
    }

    /// Returns the branch table.
    pub fn lookup(&self) -> &BranchSalesLookup {
        &self.lookup
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Returns the banner from the last completed submission, if any.
    pub fn status(&self) -> Option<&SubmitStatus> {
        self.status.as_ref()
    }

    /// Salespeople selectable for the current branch.
    pub fn sales_people(&self) -> &[String] {
        self.lookup.sales_people(&self.form.branch_name)
    }

    /// Sets the branch and clears the salesperson.
    ///
    /// Unknown branches are accepted; they simply offer no salespeople.
    pub fn select_branch(&mut self, branch: impl Into<String>) {
        self.form.branch_name = branch.into();
        self.form.sales_person_name.clear();
    }

    /// Sets the salesperson verbatim.
    pub fn select_sales_person(&mut self, name: impl Into<String>) {
        self.form.sales_person_name = name.into();
    }

    /// Replaces one field of the row at `index`; returns `false` if there is no such row.
    pub fn set_enquiry_field(&mut self, index: usize, field: EnquiryField, value: String) -> bool {
        self.form.set_field(index, field, value)
    }

    /// Appends a blank row.
    pub fn add_enquiry_row(&mut self) {
        self.form.push_row();
    }

    /// Removes the row at `index`; refused when only one row remains.
    pub fn remove_enquiry_row(&mut self, index: usize) -> bool {
        self.form.remove_row(index)
    }

    /// Hides the status banner.
    pub fn dismiss_status(&mut self) {
        self.status = None;
    }

    /// Discards all input and starts over with a fresh form.
    pub fn reset(&mut self) {
        self.form = EnquiryFormData::new((self.clock)());
    }

    /// Validates the form and marks a submission as started.
    ///
    /// On error nothing changes: not the form, the status, or the submitting
    /// flag.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitError> {
        if self.is_submitting {
            return Err(SubmitError::InFlight);
        }
        validate_form(&self.form)?;

        self.is_submitting = true;
        self.status = None;
        tracing::info!(
            branch = %self.form.branch_name,
            rows = self.form.enquiries().len(),
            "submitting enquiries"
        );
        Ok(Submission {
            form: self.form.clone(),
        })
    }

    /// Records the delivery outcome of `submission`.
    ///
    /// Success resets the form; failure keeps it for a retry.
    pub fn finish_submit(&mut self, submission: Submission, outcome: Result<(), WebhookError>) {
        match outcome {
            Ok(()) => {
                tracing::info!(branch = %submission.form.branch_name, "enquiries delivered");
                self.status = Some(SubmitStatus::Success(format!(
                    "Success! Data for {} branch has been synced to the enquiry sheet.",
                    submission.form.branch_name
                )));
                self.reset();
            }
            Err(e) => {
                tracing::warn!(error = %e, "enquiry delivery failed");
                self.status = Some(SubmitStatus::Error(SUBMIT_FAILED_MESSAGE.to_string()));
            }
        }
        self.is_submitting = false;
    }

    /// Validates, delivers through `sink`, and records the outcome.
    ///
    /// Validation failures are returned without contacting `sink`.
    pub async fn submit<S: EnquirySink>(&mut self, sink: &S) -> Result<(), SubmitError> {
        let submission = self.begin_submit()?;
        let outcome = sink.deliver(submission.form()).await;
        self.finish_submit(submission, outcome);
        Ok(())
    }
}
