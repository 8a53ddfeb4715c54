//! Raw form input and its field-by-field validation.

use std::fmt;

use chrono::NaiveDate;

use crate::{Amount, AmountError, Category, NewRecord, MAX_WHOLE_UNITS};

const MIN_DESCRIPTION_CHARS: usize = 2;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unvalidated record input, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub notes: Option<String>,
}

impl RecordDraft {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validates every field and reports all failures together.
    pub fn validate(&self) -> Result<NewRecord, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let description = self.description.trim();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            errors.push(
                RecordField::Description,
                "Description must be at least 2 characters.",
            );
        }

        let amount = match self.amount.parse::<Amount>() {
            Ok(amount) if amount.is_positive() => Some(amount),
            Err(AmountError::TooLarge(_)) => {
                errors.push(
                    RecordField::Amount,
                    format!("Amount must not exceed {}", MAX_WHOLE_UNITS),
                );
                None
            }
            _ => {
                errors.push(RecordField::Amount, "Amount must be a valid positive number");
                None
            }
        };

        let category = if self.category.trim().is_empty() {
            errors.push(RecordField::Category, "Please select a category");
            None
        } else {
            match self.category.parse::<Category>() {
                Ok(category) => Some(category),
                Err(err) => {
                    errors.push(RecordField::Category, err.to_string());
                    None
                }
            }
        };

        let date = if self.date.trim().is_empty() {
            errors.push(RecordField::Date, "Please select a date");
            None
        } else {
            match NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(RecordField::Date, "Date must use the YYYY-MM-DD format");
                    None
                }
            }
        };

        match (amount, category, date) {
            (Some(amount), Some(category), Some(date)) if errors.is_empty() => {
                let mut record = NewRecord::new(description, amount, category, date);
                record.notes = self
                    .notes
                    .as_deref()
                    .map(str::trim)
                    .filter(|notes| !notes.is_empty())
                    .map(str::to_string);
                Ok(record)
            }
            _ => Err(errors),
        }
    }
}

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Description,
    Amount,
    Category,
    Date,
}

impl RecordField {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordField::Description => "description",
            RecordField::Amount => "amount",
            RecordField::Category => "category",
            RecordField::Date => "date",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: RecordField,
    pub message: String,
}

/// Every field failure found in a draft, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: RecordField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn for_field(&self, field: RecordField) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_draft_produces_canonical_record() {
        let draft = RecordDraft::new("  Rent ", "1200.00", "EXPENSE", "2024-04-01")
            .with_notes("   ");
        let record = draft.validate().expect("valid draft");
        assert_eq!(record.description, "Rent");
        assert_eq!(record.category, Category::Expense);
        assert_eq!(record.amount.to_string(), "1200.00");
        assert_eq!(record.notes, None);
        assert!(record.hex_data.is_none());
    }

    #[test]
    fn reports_every_failing_field() {
        let draft = RecordDraft::new("x", "-4", "", "04/01/2024");
        let errors = draft.validate().expect_err("invalid draft");
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.for_field(RecordField::Category).unwrap().message,
            "Please select a category"
        );
        assert!(errors
            .for_field(RecordField::Date)
            .unwrap()
            .message
            .contains("YYYY-MM-DD"));
    }

    #[test]
    fn zero_amount_is_rejected_by_the_form() {
        let draft = RecordDraft::new("Gift", "0", "income", "2024-01-01");
        let errors = draft.validate().expect_err("zero amount");
        assert!(errors.for_field(RecordField::Amount).is_some());
    }

    #[test]
    fn oversized_amount_names_the_limit() {
        let draft = RecordDraft::new("Bond", "79228162514264337593543950335", "asset", "2024-01-01");
        let errors = draft.validate().expect_err("oversized amount");
        assert_eq!(
            errors.for_field(RecordField::Amount).unwrap().message,
            "Amount must not exceed 1000000000000000"
        );
    }

    #[test]
    fn unknown_category_is_named_in_the_message() {
        let draft = RecordDraft::new("Coffee", "3.50", "snacks", "2024-01-01");
        let errors = draft.validate().expect_err("bad category");
        assert!(errors.to_string().contains("snacks"));
    }
}
