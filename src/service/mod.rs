//! Application service over the expense collection. Every operation runs a
//! full load/mutate/save cycle against the store; nothing is cached between
//! calls.

mod error;
mod expenses;

pub use error::{ExpenseNotFound, InvalidAmount};
pub use expenses::{
    add_expense, delete_expense, get_all_expenses, get_expense, sum_all, sum_for_month,
    update_expense,
};
