use thiserror::Error;

use super::enquiry::EnquiryFormData;

/// Required-field failures that block a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select both Branch and Sales Person.")]
    MissingSelection,
    #[error("Customer name is required on row {sr_no}.")]
    EmptyCustomerName { sr_no: usize },
    #[error("Enquiry details are required on row {sr_no}.")]
    EmptyEnquiry { sr_no: usize },
}

/// Checks that branch and salesperson are both chosen.
pub fn validate_selection(form: &EnquiryFormData) -> Result<(), ValidationError> {
    if form.branch_name.is_empty() || form.sales_person_name.is_empty() {
        return Err(ValidationError::MissingSelection);
    }
    Ok(())
}

/// Checks that every row has both a customer name and enquiry text.
///
/// Reports the first offending row only.
pub fn validate_rows(form: &EnquiryFormData) -> Result<(), ValidationError> {
    for row in form.enquiries() {
        if row.customer_name.is_empty() {
            return Err(ValidationError::EmptyCustomerName { sr_no: row.sr_no });
        }
        if row.enquiry.is_empty() {
            return Err(ValidationError::EmptyEnquiry { sr_no: row.sr_no });
        }
    }
    Ok(())
}

/// Runs every required-field check, selectors first.
pub fn validate_form(form: &EnquiryFormData) -> Result<(), ValidationError> {
    validate_selection(form)?;
    validate_rows(form)
}
