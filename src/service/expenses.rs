//! CRUD and aggregation over the expense collection. Each function loads the
//! whole collection, applies its change in memory, and saves the whole
//! collection back; the store never sees partial updates.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

use crate::models::Expense;
use crate::service::error::{ExpenseNotFound, InvalidAmount};
use crate::store::ExpenseStore;

/// Append a new expense. The id is assigned here, never by the caller.
pub fn add_expense(
    store: &dyn ExpenseStore,
    description: &str,
    category: &str,
    amount: f64,
    spent_at: NaiveDate,
) -> Result<Expense> {
    ensure_positive_amount(amount)?;

    let mut expenses = store.load().context("failed to load expenses")?;

    let expense = Expense {
        id: next_expense_id(&expenses),
        description: description.to_string(),
        category: category.to_string(),
        amount,
        spent_at,
    };

    expenses.push(expense.clone());
    store.save(&expenses).context("failed to save expenses")?;

    Ok(expense)
}

/// Replace every mutable field of the expense with the given id and return
/// the updated record. Fails with [`ExpenseNotFound`] before any save when
/// the id does not exist.
pub fn update_expense(
    store: &dyn ExpenseStore,
    id: u32,
    description: &str,
    category: &str,
    amount: f64,
    spent_at: NaiveDate,
) -> Result<Expense> {
    ensure_positive_amount(amount)?;

    let mut expenses = store.load().context("failed to load expenses")?;

    let target = expenses
        .iter_mut()
        .find(|expense| expense.id == id)
        .ok_or(ExpenseNotFound { id })?;

    target.description = description.to_string();
    target.category = category.to_string();
    target.amount = amount;
    target.spent_at = spent_at;
    let updated = target.clone();

    store.save(&expenses).context("failed to save expenses")?;

    Ok(updated)
}

/// Remove the expense with the given id, preserving the relative order of
/// everything else. Fails with [`ExpenseNotFound`] before any save when the
/// id does not exist.
pub fn delete_expense(store: &dyn ExpenseStore, id: u32) -> Result<()> {
    let mut expenses = store.load().context("failed to load expenses")?;

    let index = expenses
        .iter()
        .position(|expense| expense.id == id)
        .ok_or(ExpenseNotFound { id })?;

    expenses.remove(index);
    store.save(&expenses).context("failed to save expenses")?;

    Ok(())
}

/// Read-only copy of the expense with the given id.
pub fn get_expense(store: &dyn ExpenseStore, id: u32) -> Result<Expense> {
    let expenses = store.load().context("failed to load expenses")?;

    expenses
        .into_iter()
        .find(|expense| expense.id == id)
        .ok_or_else(|| ExpenseNotFound { id }.into())
}

/// The full collection in store order.
pub fn get_all_expenses(store: &dyn ExpenseStore) -> Result<Vec<Expense>> {
    store.load().context("failed to load expenses")
}

/// Sum of all amounts; 0 for the empty collection.
pub fn sum_all(store: &dyn ExpenseStore) -> Result<f64> {
    let expenses = store.load().context("failed to load expenses")?;
    Ok(expenses.iter().map(|expense| expense.amount).sum())
}

/// Sum of the amounts spent within the given calendar year and month; 0 when
/// nothing matches.
pub fn sum_for_month(store: &dyn ExpenseStore, year: i32, month: u32) -> Result<f64> {
    let expenses = store.load().context("failed to load expenses")?;
    Ok(expenses
        .iter()
        .filter(|expense| expense.spent_at.year() == year && expense.spent_at.month() == month)
        .map(|expense| expense.amount)
        .sum())
}

fn ensure_positive_amount(amount: f64) -> Result<()> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(InvalidAmount { amount }.into())
    }
}

fn next_expense_id(expenses: &[Expense]) -> u32 {
    expenses
        .iter()
        .map(|expense| expense.id)
        .max()
        .map_or(1, |max_id| max_id + 1)
}
