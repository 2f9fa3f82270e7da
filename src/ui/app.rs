//! Application coordinator. `App` owns the store and exactly one active
//! screen; screens hand back navigation signals and the coordinator builds
//! the next screen's fresh state, fetching whatever context the signal calls
//! for. Rendering delegates to the active screen's draw routine.

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::service;
use crate::store::{export_csv, JsonFileStore};
use crate::ui::forms::{ChangeField, ChangeForm, SummaryField, SummaryForm};
use crate::ui::helpers::{centered_rect, surface_error};
use crate::ui::screens::{MessageScreen, TableScreen};
use crate::ui::signal::{Destination, Signal};

/// Footer space reserved for the key hints.
const FOOTER_HEIGHT: u16 = 3;

/// The interchangeable screens. Exactly one is alive at a time; switching
/// always rebuilds the target from scratch.
enum Screen {
    Table(TableScreen),
    ChangeForm(ChangeForm),
    Summary(SummaryForm),
    Message(MessageScreen),
}

/// Central application state shared across the TUI.
pub struct App {
    store: JsonFileStore,
    screen: Screen,
}

impl App {
    /// Load the collection once and start on the table screen. A failing
    /// initial load is a startup error the caller reports and exits on.
    pub fn new(store: JsonFileStore) -> Result<Self> {
        let expenses = service::get_all_expenses(&store)?;
        Ok(Self {
            store,
            screen: Screen::Table(TableScreen::new(expenses)),
        })
    }

    /// Route one key press to the active screen, then apply whatever signal
    /// it produced. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let signal = match &mut self.screen {
            Screen::Table(table) => table.handle_key(code, &self.store),
            Screen::ChangeForm(form) => form.handle_key(code, &self.store),
            Screen::Summary(form) => form.handle_key(code, &self.store),
            Screen::Message(message) => message.handle_key(code),
        };

        match signal {
            Some(signal) => Ok(self.apply_signal(signal)),
            None => Ok(false),
        }
    }

    /// Export the collection as CSV. Only meaningful on the table screen;
    /// both outcome paths land on the message screen so the user always sees
    /// where the file went (or why it did not).
    pub(crate) fn handle_ctrl_e(&mut self) -> Result<()> {
        if !matches!(self.screen, Screen::Table(_)) {
            return Ok(());
        }

        let signal = match service::get_all_expenses(&self.store).and_then(|expenses| {
            export_csv(self.store.dir(), &expenses).map(|path| (expenses.len(), path))
        }) {
            Ok((count, path)) => Signal::ShowMessage {
                text: format!("Exported {count} expenses to {}", path.display()),
                back: Destination::Table,
            },
            Err(err) => Signal::ShowMessage {
                text: surface_error(&err),
                back: Destination::Table,
            },
        };

        self.apply_signal(signal);
        Ok(())
    }

    /// Consume a navigation signal: build the target screen's fresh state and
    /// switch to it. Any error raised while building a screen is itself
    /// routed to the message screen, so nothing is dropped. Returns `true`
    /// only for the quit signal.
    fn apply_signal(&mut self, signal: Signal) -> bool {
        match signal {
            Signal::Quit => return true,
            Signal::BackToTable => {
                self.screen = self.fresh_table_screen();
            }
            Signal::OpenAdd => {
                self.screen = Screen::ChangeForm(ChangeForm::new());
            }
            Signal::OpenEdit(id) => {
                self.screen = match service::get_expense(&self.store, id) {
                    Ok(expense) => Screen::ChangeForm(ChangeForm::for_expense(&expense)),
                    Err(err) => Screen::Message(MessageScreen::new(
                        surface_error(&err),
                        Destination::Table,
                    )),
                };
            }
            Signal::OpenSummary => {
                self.screen = Screen::Summary(SummaryForm::new());
            }
            Signal::ShowMessage { text, back } => {
                self.screen = Screen::Message(MessageScreen::new(text, back));
            }
        }
        false
    }

    fn fresh_table_screen(&self) -> Screen {
        match service::get_all_expenses(&self.store) {
            Ok(expenses) => Screen::Table(TableScreen::new(expenses)),
            Err(err) => {
                Screen::Message(MessageScreen::new(surface_error(&err), Destination::Table))
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Table(table) => self.draw_table(frame, content_area, table),
            Screen::ChangeForm(form) => self.draw_change_form(frame, content_area, form),
            Screen::Summary(form) => self.draw_summary(frame, content_area, form),
            Screen::Message(message) => self.draw_message(frame, content_area, message),
        }

        if area.height > footer_height {
            self.draw_footer(frame, footer_area);
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, table: &TableScreen) {
        let show_filter = table.filter_active || !table.filter.is_empty();

        let mut constraints = Vec::new();
        if show_filter {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(1));
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);
        let mut chunk_iter = chunks.iter();

        if show_filter {
            let filter_area = *chunk_iter.next().expect("filter chunk");
            let value_style = if table.filter_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let filter_line = Line::from(vec![
                Span::raw("Filter: "),
                Span::styled(table.filter.clone(), value_style),
            ]);
            let filter_box = Paragraph::new(filter_line)
                .block(Block::default().borders(Borders::ALL).title("Category"));
            frame.render_widget(filter_box, filter_area);
        }

        let table_area = *chunk_iter.next().expect("table chunk");
        let total_area = *chunk_iter.next().expect("total chunk");

        if table.visible.is_empty() {
            let text = if table.filter.is_empty() {
                "No expenses yet. Press '+' to add one."
            } else {
                "No expenses match the filter."
            };
            let placeholder = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Expenses"));
            frame.render_widget(placeholder, table_area);
        } else {
            let header = Row::new(["ID", "Category", "Description", "Amount", "Date"]).style(
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            );

            let rows = table.visible.iter().map(|expense| {
                Row::new([
                    expense.id.to_string(),
                    expense.category.clone(),
                    expense.description.clone(),
                    format!("{:.2}", expense.amount),
                    expense.spent_at.format("%Y-%m-%d").to_string(),
                ])
            });

            let widths = [
                Constraint::Length(6),
                Constraint::Length(16),
                Constraint::Min(24),
                Constraint::Length(10),
                Constraint::Length(12),
            ];

            let widget = Table::new(rows, widths)
                .header(header)
                .block(Block::default().borders(Borders::ALL).title("Expenses"))
                .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");

            let mut state = TableState::default();
            state.select(Some(table.selected));
            frame.render_stateful_widget(widget, table_area, &mut state);
        }

        let total = Paragraph::new(format!("Total spent: {:.2}", table.shown_total));
        frame.render_widget(total, total_area);
    }

    fn draw_change_form(&self, frame: &mut Frame, area: Rect, form: &ChangeForm) {
        let lines = vec![
            form.build_line("Description", ChangeField::Description),
            form.build_line("Category", ChangeField::Category),
            form.build_line("Amount", ChangeField::Amount),
            form.build_line("Date (YYYY-MM-DD)", ChangeField::Date),
            Line::from(""),
            submit_line(form.submit_focused()),
        ];

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(form.title()));
        frame.render_widget(widget, area);
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect, form: &SummaryForm) {
        let lines = vec![
            form.build_line("Year", SummaryField::Year),
            form.build_line("Month", SummaryField::Month),
            Line::from(""),
            submit_line(form.submit_focused()),
            Line::from(""),
            Line::from(form.result_line()),
        ];

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Summary Info"),
        );
        frame.render_widget(widget, area);
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, message: &MessageScreen) {
        let popup = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup);

        let lines = vec![
            Line::from(message.text.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to continue...",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Notice"));
        frame.render_widget(widget, popup);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = match &self.screen {
            Screen::Table(table) if table.filter_active => {
                "type to filter  |  enter keep filter  |  esc clear filter  |  ctrl+c quit"
            }
            Screen::Table(_) => {
                "up/down select  |  enter edit  |  + add  |  - delete  |  f filter  |  s summary  |  ctrl+e export csv  |  q quit"
            }
            Screen::ChangeForm(_) | Screen::Summary(_) => {
                "up/down move  |  enter next/submit  |  esc back"
            }
            Screen::Message(_) => "press any key to continue",
        };

        let footer = Paragraph::new(hints)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
    }
}

fn submit_line(focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled("[ Submit ]", style))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::store::ExpenseStore;

    use super::*;

    fn app_with_store(dir: &std::path::Path) -> App {
        let store = JsonFileStore::at(dir.to_path_buf()).expect("store");
        App::new(store).expect("app")
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).expect("type");
        }
    }

    /// Drive the real screens end to end: open the add form, fill it in,
    /// submit, and land back on a table that shows the new record.
    #[test]
    fn add_flow_round_trips_through_the_form() {
        let dir = tempdir().expect("tempdir");
        let mut app = app_with_store(dir.path());

        assert!(matches!(app.screen, Screen::Table(_)));
        app.handle_key(KeyCode::Char('+')).expect("open add");
        assert!(matches!(app.screen, Screen::ChangeForm(_)));

        type_text(&mut app, "Coffee");
        app.handle_key(KeyCode::Enter).expect("to category");
        type_text(&mut app, "Food");
        app.handle_key(KeyCode::Enter).expect("to amount");
        // clear the prefilled "0"
        app.handle_key(KeyCode::Backspace).expect("clear amount");
        type_text(&mut app, "3.5");
        app.handle_key(KeyCode::Enter).expect("to date");
        app.handle_key(KeyCode::Enter).expect("to submit");
        app.handle_key(KeyCode::Enter).expect("submit");

        match &app.screen {
            Screen::Table(table) => {
                assert_eq!(table.visible.len(), 1);
                assert_eq!(table.visible[0].description, "Coffee");
                assert_eq!(table.visible[0].amount, 3.5);
                assert_eq!(table.visible[0].id, 1);
            }
            _ => panic!("expected the table screen after a valid submit"),
        }
        assert_eq!(app.store.load().expect("load").len(), 1);
    }

    #[test]
    fn edit_flow_binds_the_selected_expense() {
        let dir = tempdir().expect("tempdir");
        {
            let store = JsonFileStore::at(dir.path().to_path_buf()).expect("store");
            service::add_expense(
                &store,
                "Coffee",
                "Food",
                3.5,
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            )
            .expect("seed");
        }
        let mut app = app_with_store(dir.path());

        app.handle_key(KeyCode::Enter).expect("open edit");
        match &app.screen {
            Screen::ChangeForm(form) => {
                assert_eq!(form.editing_id, Some(1));
                assert_eq!(form.description, "Coffee");
            }
            _ => panic!("expected the change form bound to the selected row"),
        }

        // Straight to submit: description/category keep their values.
        app.handle_key(KeyCode::Esc).expect("back");
        assert!(matches!(app.screen, Screen::Table(_)));
    }

    #[test]
    fn editing_a_vanished_expense_routes_to_the_message_screen() {
        let dir = tempdir().expect("tempdir");
        let mut app = app_with_store(dir.path());

        assert!(!app.apply_signal(Signal::OpenEdit(42)));
        match &app.screen {
            Screen::Message(message) => {
                assert!(message.text.contains("42"));
            }
            _ => panic!("expected the message screen for a missing id"),
        }

        // Acknowledging the message returns to the table.
        app.handle_key(KeyCode::Char(' ')).expect("ack");
        assert!(matches!(app.screen, Screen::Table(_)));
    }

    #[test]
    fn summary_screen_opens_and_escapes_back() {
        let dir = tempdir().expect("tempdir");
        let mut app = app_with_store(dir.path());

        app.handle_key(KeyCode::Char('s')).expect("open summary");
        assert!(matches!(app.screen, Screen::Summary(_)));

        app.handle_key(KeyCode::Esc).expect("back");
        assert!(matches!(app.screen, Screen::Table(_)));
    }

    #[test]
    fn quit_signal_reaches_the_caller() {
        let dir = tempdir().expect("tempdir");
        let mut app = app_with_store(dir.path());
        assert!(app.handle_key(KeyCode::Char('q')).expect("quit"));
    }

    #[test]
    fn csv_export_lands_on_a_confirmation_message() {
        let dir = tempdir().expect("tempdir");
        let mut app = app_with_store(dir.path());

        app.handle_ctrl_e().expect("export");
        match &app.screen {
            Screen::Message(message) => {
                assert!(message.text.contains("Exported 0 expenses"));
            }
            _ => panic!("expected the export confirmation message"),
        }
        assert!(dir.path().join("expenses.csv").exists());
    }
}
