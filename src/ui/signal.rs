//! Navigation signals. A screen never switches screens itself; it returns one
//! of these values and the coordinator consumes it, so every transition is
//! explicit data rather than implicit type identity.

/// Effect a screen hands back to the coordinator after a key event.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Signal {
    /// Leave the event loop and restore the terminal.
    Quit,
    /// Reload the collection and show the table screen.
    BackToTable,
    /// Open an empty change form.
    OpenAdd,
    /// Fetch the expense with this id and open the change form bound to it.
    OpenEdit(u32),
    /// Open the monthly summary form.
    OpenSummary,
    /// Show `text` full screen; any key then navigates to `back`.
    ShowMessage { text: String, back: Destination },
}

/// Where the message screen returns to once acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destination {
    Table,
    AddForm,
    EditForm(u32),
    Summary,
}

impl Destination {
    /// Turn the stored destination back into the signal that reaches it.
    pub(crate) fn into_signal(self) -> Signal {
        match self {
            Destination::Table => Signal::BackToTable,
            Destination::AddForm => Signal::OpenAdd,
            Destination::EditForm(id) => Signal::OpenEdit(id),
            Destination::Summary => Signal::OpenSummary,
        }
    }
}
