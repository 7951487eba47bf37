mod chat_vm;
mod history_vm;
mod markdown_vm;
mod quiz_vm;
mod time_fmt;

pub use chat_vm::{
    AnalysisVm, ChatMessageVm, ChatTool, ResourceLinkVm, image_from_upload, map_chat_message,
    map_chat_messages,
};
pub use history_vm::{QuizAttemptCardVm, map_quiz_attempt_cards};
pub use markdown_vm::{markdown_to_html, plain_text_to_html, sanitize_html};
pub use quiz_vm::{
    QuizIntent, QuizOptionVm, QuizQuestionVm, QuizResultsVm, QuizReviewRowVm, QuizVm,
    map_quiz_results,
};
pub use time_fmt::format_datetime;
