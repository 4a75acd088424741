mod branch;
mod controller;
mod enquiry;
mod validation;

pub use branch::{BranchEntry, BranchSalesLookup, BranchTableError};
pub use controller::{
    FormController, SUBMIT_FAILED_MESSAGE, SubmitError, SubmitStatus, Submission, utc_today,
};
pub use enquiry::{CustomerEnquiry, EnquiryField, EnquiryFormData};
pub use validation::{ValidationError, validate_form, validate_rows, validate_selection};
