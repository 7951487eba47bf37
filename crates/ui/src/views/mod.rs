mod chat;
mod history;
mod quiz;
mod quiz_panel;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chat::ChatView;
pub use history::HistoryView;
pub use quiz::QuizView;
pub use quiz_panel::QuizPanel;
pub use state::{ViewError, ViewState, view_state_from_resource};
