//! Screen state for the table and message views. Each struct is created
//! fresh on every navigation transition; the only state that survives a
//! switch is whatever the navigation signal itself carries.

use crossterm::event::KeyCode;

use crate::models::Expense;
use crate::service;
use crate::store::ExpenseStore;
use crate::ui::helpers::surface_error;
use crate::ui::signal::{Destination, Signal};

/// Main screen: every expense in a table, a running total of the shown rows,
/// and an inline filter sub-mode over the category column.
#[derive(Debug)]
pub(crate) struct TableScreen {
    /// Unfiltered collection as last loaded from the store.
    pub(crate) all_expenses: Vec<Expense>,
    /// Rows currently shown, i.e. `all_expenses` narrowed by the filter.
    pub(crate) visible: Vec<Expense>,
    /// Index into `visible`. Kept in bounds by `apply_filter`.
    pub(crate) selected: usize,
    /// Sum over the visible rows, recomputed whenever they change.
    pub(crate) shown_total: f64,
    /// Whether keystrokes currently edit the filter instead of navigating.
    pub(crate) filter_active: bool,
    pub(crate) filter: String,
}

impl TableScreen {
    pub(crate) fn new(expenses: Vec<Expense>) -> Self {
        let mut screen = Self {
            all_expenses: expenses,
            visible: Vec::new(),
            selected: 0,
            shown_total: 0.0,
            filter_active: false,
            filter: String::new(),
        };
        screen.apply_filter();
        screen
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        store: &dyn ExpenseStore,
    ) -> Option<Signal> {
        if self.filter_active {
            self.handle_filter_key(code);
            return None;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Signal::Quit),
            KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Enter => self
                .selected_expense()
                .map(|expense| Signal::OpenEdit(expense.id)),
            KeyCode::Char('+') => Some(Signal::OpenAdd),
            KeyCode::Char('-') => self.delete_selected(store),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Signal::OpenSummary),
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.filter_active = true;
                self.filter.clear();
                self.apply_filter();
                None
            }
            _ => None,
        }
    }

    /// Keys while the filter input owns the keyboard. Esc drops the filter,
    /// Enter keeps it; both hand navigation back to the table.
    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.filter.clear();
                self.filter_active = false;
                self.apply_filter();
            }
            KeyCode::Enter => {
                self.filter_active = false;
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.apply_filter();
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                self.filter.push(ch);
                self.apply_filter();
            }
            _ => {}
        }
    }

    /// Delete the selected row, then reload so the table reflects the store.
    /// Both the delete and the reload surface failures through the message
    /// screen.
    fn delete_selected(&mut self, store: &dyn ExpenseStore) -> Option<Signal> {
        let expense = self.selected_expense().cloned()?;

        if let Err(err) = service::delete_expense(store, expense.id) {
            return Some(Signal::ShowMessage {
                text: surface_error(&err),
                back: Destination::Table,
            });
        }

        match service::get_all_expenses(store) {
            Ok(all) => {
                self.set_expenses(all);
                None
            }
            Err(err) => Some(Signal::ShowMessage {
                text: surface_error(&err),
                back: Destination::Table,
            }),
        }
    }

    pub(crate) fn set_expenses(&mut self, expenses: Vec<Expense>) {
        self.all_expenses = expenses;
        self.apply_filter();
    }

    /// Recompute the visible rows, their running total, and clamp the
    /// selection back into bounds.
    pub(crate) fn apply_filter(&mut self) {
        self.visible = self
            .all_expenses
            .iter()
            .filter(|expense| expense.category_matches(&self.filter))
            .cloned()
            .collect();
        self.shown_total = self.visible.iter().map(|expense| expense.amount).sum();

        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() as isize - 1;
        let next = (self.selected as isize + offset).clamp(0, last);
        self.selected = next as usize;
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.visible.get(self.selected)
    }
}

/// Full-screen notification. Displays arbitrary text; the next key press
/// navigates to the bound destination.
#[derive(Debug)]
pub(crate) struct MessageScreen {
    pub(crate) text: String,
    back: Destination,
}

impl MessageScreen {
    pub(crate) fn new(text: String, back: Destination) -> Self {
        Self { text, back }
    }

    pub(crate) fn handle_key(&mut self, _code: KeyCode) -> Option<Signal> {
        Some(self.back.into_signal())
    }
}
