//! Form state for the two data-entry screens. Forms hold raw text per field
//! plus a focus marker; validation happens at submit time, and a failing
//! field has its displayed value replaced by the error text so the problem is
//! visible exactly where it occurred.

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Expense;
use crate::service;
use crate::store::ExpenseStore;
use crate::ui::helpers::surface_error;
use crate::ui::signal::{Destination, Signal};

/// Placeholder stored when description or category is submitted empty.
const EMPTY_FIELD_PLACEHOLDER: &str = "-";

/// English month names accepted by the summary form, in calendar order. The
/// table is the single immutable source of truth for both validation and the
/// prefilled month value.
pub(crate) const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Map a month name to its 1-based number, ignoring case and surrounding
/// whitespace.
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    let needle = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| month.to_lowercase() == needle)
        .map(|index| index as u32 + 1)
}

/// Fields of the change form, in focus order. `Submit` participates in the
/// cycle so Enter on the last input lands on the button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum ChangeField {
    #[default]
    Description,
    Category,
    Amount,
    Date,
    Submit,
}

impl ChangeField {
    fn next(self) -> Self {
        match self {
            ChangeField::Description => ChangeField::Category,
            ChangeField::Category => ChangeField::Amount,
            ChangeField::Amount => ChangeField::Date,
            ChangeField::Date => ChangeField::Submit,
            ChangeField::Submit => ChangeField::Description,
        }
    }

    fn previous(self) -> Self {
        match self {
            ChangeField::Description => ChangeField::Submit,
            ChangeField::Category => ChangeField::Description,
            ChangeField::Amount => ChangeField::Category,
            ChangeField::Date => ChangeField::Amount,
            ChangeField::Submit => ChangeField::Date,
        }
    }
}

/// Shared add/edit form. `editing_id` decides at submit time whether the
/// service call is an add or an update; everything else is identical.
#[derive(Debug, Clone)]
pub(crate) struct ChangeForm {
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) amount: String,
    pub(crate) date: String,
    pub(crate) focus: ChangeField,
    pub(crate) editing_id: Option<u32>,
}

impl ChangeForm {
    /// Fresh form for adding: amount prefilled with `0` (which fails
    /// validation until replaced) and date prefilled with today.
    pub(crate) fn new() -> Self {
        Self {
            description: String::new(),
            category: String::new(),
            amount: "0".to_string(),
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            focus: ChangeField::Description,
            editing_id: None,
        }
    }

    /// Form bound to an existing record for editing.
    pub(crate) fn for_expense(expense: &Expense) -> Self {
        Self {
            description: expense.description.clone(),
            category: expense.category.clone(),
            amount: format!("{:.2}", expense.amount),
            date: expense.spent_at.format("%Y-%m-%d").to_string(),
            focus: ChangeField::Description,
            editing_id: Some(expense.id),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        store: &dyn ExpenseStore,
    ) -> Option<Signal> {
        match code {
            KeyCode::Esc => Some(Signal::BackToTable),
            KeyCode::Enter if self.focus == ChangeField::Submit => self.submit(store),
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.focus = self.focus.previous();
                None
            }
            KeyCode::Backspace => {
                if let Some(value) = self.active_value_mut() {
                    value.pop();
                }
                None
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(value) = self.active_value_mut() {
                    value.push(ch);
                }
                None
            }
            _ => None,
        }
    }

    fn active_value_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            ChangeField::Description => Some(&mut self.description),
            ChangeField::Category => Some(&mut self.category),
            ChangeField::Amount => Some(&mut self.amount),
            ChangeField::Date => Some(&mut self.date),
            ChangeField::Submit => None,
        }
    }

    /// Validate, then hand the parsed values to the service. Validation
    /// failures stay on the form; service failures navigate to the message
    /// screen with a route back here.
    fn submit(&mut self, store: &dyn ExpenseStore) -> Option<Signal> {
        let (amount, date) = match self.validate() {
            Some(parsed) => parsed,
            None => return None,
        };
        let description = non_empty_or_placeholder(&self.description);
        let category = non_empty_or_placeholder(&self.category);

        let result: Result<Expense> = match self.editing_id {
            None => service::add_expense(store, &description, &category, amount, date),
            Some(id) => service::update_expense(store, id, &description, &category, amount, date),
        };

        match result {
            Ok(_) => Some(Signal::BackToTable),
            Err(err) => Some(Signal::ShowMessage {
                text: surface_error(&err),
                back: match self.editing_id {
                    None => Destination::AddForm,
                    Some(id) => Destination::EditForm(id),
                },
            }),
        }
    }

    /// Run every field validator. A failing field has its value replaced by
    /// the error text; returns the parsed values only when submission may
    /// proceed.
    fn validate(&mut self) -> Option<(f64, NaiveDate)> {
        match (parse_amount(&self.amount), parse_date(&self.date)) {
            (Ok(amount), Ok(date)) => Some((amount, date)),
            (amount, date) => {
                if let Err(message) = amount {
                    self.amount = message;
                }
                if let Err(message) = date {
                    self.date = message;
                }
                None
            }
        }
    }

    /// Render one labeled input line, highlighting the focused field.
    pub(crate) fn build_line(&self, label: &str, field: ChangeField) -> Line<'static> {
        let value = match field {
            ChangeField::Description => &self.description,
            ChangeField::Category => &self.category,
            ChangeField::Amount => &self.amount,
            ChangeField::Date => &self.date,
            ChangeField::Submit => unreachable!("submit is not an input line"),
        };
        build_input_line(label, value, self.focus == field)
    }

    pub(crate) fn submit_focused(&self) -> bool {
        self.focus == ChangeField::Submit
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Edit Expense"
        } else {
            "Add Expense"
        }
    }
}

/// Fields of the summary form, in focus order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum SummaryField {
    #[default]
    Year,
    Month,
    Submit,
}

impl SummaryField {
    fn next(self) -> Self {
        match self {
            SummaryField::Year => SummaryField::Month,
            SummaryField::Month => SummaryField::Submit,
            SummaryField::Submit => SummaryField::Year,
        }
    }

    fn previous(self) -> Self {
        match self {
            SummaryField::Year => SummaryField::Submit,
            SummaryField::Month => SummaryField::Year,
            SummaryField::Submit => SummaryField::Month,
        }
    }
}

/// Monthly summary form. Submitting recomputes the total in place; the
/// screen never navigates away on its own.
#[derive(Debug, Clone)]
pub(crate) struct SummaryForm {
    pub(crate) year: String,
    pub(crate) month: String,
    pub(crate) focus: SummaryField,
    /// Last successfully computed total, shown under the button.
    pub(crate) total: f64,
    /// Service failure from the last submit, shown instead of the total.
    pub(crate) error: Option<String>,
}

impl SummaryForm {
    /// Prefilled with the current year and month.
    pub(crate) fn new() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year().to_string(),
            month: MONTH_NAMES[today.month0() as usize].to_string(),
            focus: SummaryField::Year,
            total: 0.0,
            error: None,
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        store: &dyn ExpenseStore,
    ) -> Option<Signal> {
        match code {
            KeyCode::Esc => Some(Signal::BackToTable),
            KeyCode::Enter if self.focus == SummaryField::Submit => {
                self.submit(store);
                None
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.focus = self.focus.previous();
                None
            }
            KeyCode::Backspace => {
                if let Some(value) = self.active_value_mut() {
                    value.pop();
                }
                None
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(value) = self.active_value_mut() {
                    value.push(ch);
                }
                None
            }
            _ => None,
        }
    }

    fn active_value_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            SummaryField::Year => Some(&mut self.year),
            SummaryField::Month => Some(&mut self.month),
            SummaryField::Submit => None,
        }
    }

    fn submit(&mut self, store: &dyn ExpenseStore) {
        let (year, month) = match self.validate() {
            Some(parsed) => parsed,
            None => return,
        };

        match service::sum_for_month(store, year, month) {
            Ok(total) => {
                self.total = total;
                self.error = None;
            }
            Err(err) => {
                self.error = Some(format!("Error fetching summary: {}", surface_error(&err)));
            }
        }
    }

    fn validate(&mut self) -> Option<(i32, u32)> {
        match (parse_year(&self.year), parse_month(&self.month)) {
            (Ok(year), Ok(month)) => Some((year, month)),
            (year, month) => {
                if let Err(message) = year {
                    self.year = message;
                }
                if let Err(message) = month {
                    self.month = message;
                }
                None
            }
        }
    }

    pub(crate) fn build_line(&self, label: &str, field: SummaryField) -> Line<'static> {
        let value = match field {
            SummaryField::Year => &self.year,
            SummaryField::Month => &self.month,
            SummaryField::Submit => unreachable!("submit is not an input line"),
        };
        build_input_line(label, value, self.focus == field)
    }

    pub(crate) fn submit_focused(&self) -> bool {
        self.focus == SummaryField::Submit
    }

    /// Line shown beneath the button: either the last error or the total.
    pub(crate) fn result_line(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => format!("Total spent for chosen month: {:.2}", self.total),
        }
    }
}

fn build_input_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<empty>".to_string()
    } else {
        value.to_string()
    };

    let style = if active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

fn non_empty_or_placeholder(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_FIELD_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_amount(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("amount cannot be empty".to_string());
    }

    let amount: f64 = trimmed
        .parse()
        .map_err(|_| "invalid amount format".to_string())?;

    if amount <= 0.0 {
        return Err("amount should be a positive number".to_string());
    }

    Ok(amount)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("date cannot be empty".to_string());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| "date should be in YYYY-MM-DD format".to_string())
}

fn parse_year(value: &str) -> Result<i32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("year cannot be empty".to_string());
    }

    trimmed
        .parse()
        .map_err(|_| "year must be a number".to_string())
}

fn parse_month(value: &str) -> Result<u32, String> {
    month_from_name(value).ok_or_else(|| format!("invalid month: {}", value.trim()))
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use tempfile::tempdir;

    use crate::store::JsonFileStore;

    use super::*;

    #[test]
    fn month_names_map_case_insensitively() {
        assert_eq!(month_from_name("January"), Some(1));
        assert_eq!(month_from_name("january"), Some(1));
        assert_eq!(month_from_name(" DECEMBER "), Some(12));
        assert_eq!(month_from_name("Smarch"), None);
        assert_eq!(month_from_name(""), None);
    }

    #[test]
    fn amount_validator_rejects_empty_garbage_and_non_positive() {
        assert_eq!(parse_amount("12.5"), Ok(12.5));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
    }

    #[test]
    fn date_validator_requires_iso_format() {
        assert!(parse_date("2024-01-15").is_ok());
        assert!(parse_date("").is_err());
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn change_form_focus_wraps_both_ways() {
        let mut form = ChangeForm::new();
        assert_eq!(form.focus, ChangeField::Description);

        for _ in 0..5 {
            form.focus = form.focus.next();
        }
        assert_eq!(form.focus, ChangeField::Description);

        form.focus = form.focus.previous();
        assert_eq!(form.focus, ChangeField::Submit);
    }

    #[test]
    fn invalid_fields_are_replaced_by_their_error_text() {
        let mut form = ChangeForm::new();
        form.amount = "abc".to_string();
        form.date = "sometime".to_string();

        assert!(form.validate().is_none());
        assert_eq!(form.amount, "invalid amount format");
        assert_eq!(form.date, "date should be in YYYY-MM-DD format");
    }

    #[test]
    fn submit_with_invalid_amount_blocks_and_stays_on_the_form() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("store");

        let mut form = ChangeForm::new();
        form.description = "Coffee".to_string();
        form.amount = "0".to_string();
        form.focus = ChangeField::Submit;

        let signal = form.handle_key(KeyCode::Enter, &store);

        assert_eq!(signal, None);
        assert_eq!(form.amount, "amount should be a positive number");
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn valid_submit_adds_the_record_and_returns_to_the_table() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("store");

        let mut form = ChangeForm::new();
        form.description = "Coffee".to_string();
        form.category = String::new();
        form.amount = "3.5".to_string();
        form.date = "2024-01-15".to_string();
        form.focus = ChangeField::Submit;

        let signal = form.handle_key(KeyCode::Enter, &store);

        assert_eq!(signal, Some(Signal::BackToTable));
        let saved = store.load().expect("load");
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].description, "Coffee");
        assert_eq!(saved[0].category, "-");
        assert_eq!(saved[0].amount, 3.5);
    }

    #[test]
    fn summary_submit_computes_the_month_total_inline() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("store");
        service::add_expense(
            &store,
            "Coffee",
            "Food",
            12.0,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
        .expect("seed");
        service::add_expense(
            &store,
            "Bus",
            "Travel",
            5.0,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .expect("seed");

        let mut form = SummaryForm::new();
        form.year = "2024".to_string();
        form.month = "january".to_string();
        form.focus = SummaryField::Submit;

        let signal = form.handle_key(KeyCode::Enter, &store);

        assert_eq!(signal, None);
        assert_eq!(form.total, 12.0);
        assert!(form.error.is_none());
    }

    #[test]
    fn summary_with_unknown_month_replaces_the_field() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::at(dir.path().to_path_buf()).expect("store");

        let mut form = SummaryForm::new();
        form.month = "Smarch".to_string();
        form.focus = SummaryField::Submit;

        form.handle_key(KeyCode::Enter, &store);

        assert_eq!(form.month, "invalid month: Smarch");
    }
}
