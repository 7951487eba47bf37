use dioxus::prelude::*;
use services::ChatError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    UnsupportedImage,
    QuizGeneration,
    NothingToExport,
    InvalidArticleUrl,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::UnsupportedImage => "Please choose an image file (PNG, JPEG, GIF, WebP).",
            ViewError::QuizGeneration => {
                "Could not generate the quiz. Check your AI settings and try again."
            }
            ViewError::NothingToExport => "There are no messages to export yet.",
            ViewError::InvalidArticleUrl => "Please enter a full article URL, such as https://...",
        }
    }
}

impl From<&ChatError> for ViewError {
    fn from(err: &ChatError) -> Self {
        match err {
            ChatError::InvalidUrl(_) => ViewError::InvalidArticleUrl,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
