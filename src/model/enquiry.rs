use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single customer's dead-stock request within one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEnquiry {
    /// 1-based position in the form; always `index + 1`.
    pub sr_no: usize,
    pub customer_name: String,
    pub enquiry: String,
}

impl CustomerEnquiry {
    /// Creates an empty row at the given serial number.
    pub fn blank(sr_no: usize) -> Self {
        Self {
            sr_no,
            customer_name: String::new(),
            enquiry: String::new(),
        }
    }

    /// Returns the text of the given field.
    pub fn field(&self, field: EnquiryField) -> &str {
        match field {
            EnquiryField::CustomerName => &self.customer_name,
            EnquiryField::Enquiry => &self.enquiry,
        }
    }

    fn field_mut(&mut self, field: EnquiryField) -> &mut String {
        match field {
            EnquiryField::CustomerName => &mut self.customer_name,
            EnquiryField::Enquiry => &mut self.enquiry,
        }
    }
}

/// The editable text columns of a [`CustomerEnquiry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnquiryField {
    CustomerName,
    Enquiry,
}

impl EnquiryField {
    /// Column heading shown in the entry table.
    pub fn label(self) -> &'static str {
        match self {
            Self::CustomerName => "Customer Name",
            Self::Enquiry => "Enquiry Details",
        }
    }
}

/// The whole form as it is posted to the webhook.
///
/// Serializes with the camelCase field names the sheet script expects:
/// `date`, `branchName`, `salesPersonName`, `enquiries[].srNo`,
/// `enquiries[].customerName`, `enquiries[].enquiry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryFormData {
    pub date: NaiveDate,
    pub branch_name: String,
    pub sales_person_name: String,
    enquiries: Vec<CustomerEnquiry>,
}

impl EnquiryFormData {
    /// Creates a fresh form dated `date` with no branch and a single blank row.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            branch_name: String::new(),
            sales_person_name: String::new(),
            enquiries: vec![CustomerEnquiry::blank(1)],
        }
    }

    /// Returns the enquiry rows in display order.
    pub fn enquiries(&self) -> &[CustomerEnquiry] {
        &self.enquiries
    }

    /// Replaces one text field of the row at `index`.
    ///
    /// Returns `false` and leaves the form untouched when `index` is out of range.
    pub fn set_field(&mut self, index: usize, field: EnquiryField, value: String) -> bool {
        match self.enquiries.get_mut(index) {
            Some(row) => {
                *row.field_mut(field) = value;
                true
            }
            None => false,
        }
    }

    /// Appends a blank row numbered after the current last row.
    pub fn push_row(&mut self) {
        let sr_no = self.enquiries.len() + 1;
        self.enquiries.push(CustomerEnquiry::blank(sr_no));
    }

    /// Removes the row at `index` and renumbers the remainder.
    ///
    /// The last remaining row can never be removed; returns `false` in that
    /// case or when `index` is out of range.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if self.enquiries.len() <= 1 || index >= self.enquiries.len() {
            return false;
        }
        self.enquiries.remove(index);
        for (i, row) in self.enquiries.iter_mut().enumerate() {
            row.sr_no = i + 1;
        }
        true
    }
}
