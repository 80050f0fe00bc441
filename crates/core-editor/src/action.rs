//! Work left over when the single-line editor hands a line back.
//!
//! Every command that has to leave the current line is turned into exactly one
//! [`PendingAction`] by dispatch; the engine consumes it once `read_line` returns and then
//! either re-enters a line ([`Step::Edit`]) or ends the read.

use core_line::CursorHint;
use core_state::Column;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    NewLine,
    Submit,
    MoveUp,
    MoveDown,
    JoinAbove,
    JoinBelow,
    PreviousHistory,
    NextHistory,
    Search,
    Paste(String),
    /// New terminal size when the repaint comes from a resize.
    Repaint(Option<(u16, u16)>),
    ShowListing(Vec<String>),
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Edit the (new) current line with the cursor here.
    Edit(Column),
    Done,
    EndOfInput,
}

pub(crate) fn hint(column: Column) -> CursorHint {
    match column {
        Column::Start => CursorHint::Start,
        Column::End => CursorHint::End,
        Column::Byte(b) => CursorHint::Byte(b),
    }
}

impl PendingAction {
    /// Name for logs (never the payload).
    pub fn name(&self) -> &'static str {
        match self {
            PendingAction::NewLine => "new_line",
            PendingAction::Submit => "submit",
            PendingAction::MoveUp => "move_up",
            PendingAction::MoveDown => "move_down",
            PendingAction::JoinAbove => "join_above",
            PendingAction::JoinBelow => "join_below",
            PendingAction::PreviousHistory => "previous_history",
            PendingAction::NextHistory => "next_history",
            PendingAction::Search => "search",
            PendingAction::Paste(_) => "paste",
            PendingAction::Repaint(_) => "repaint",
            PendingAction::ShowListing(_) => "show_listing",
            PendingAction::EndOfInput => "end_of_input",
        }
    }
}
