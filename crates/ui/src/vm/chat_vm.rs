use sanderson_core::model::{ChatMessage, ImageDataUri, MessageId, NlpAnalysis, Role};

use super::markdown_vm::{markdown_to_html, plain_text_to_html};
use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLinkVm {
    pub title: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisVm {
    pub sentiment: String,
    pub entities: Vec<String>,
}

impl From<&NlpAnalysis> for AnalysisVm {
    fn from(analysis: &NlpAnalysis) -> Self {
        Self {
            sentiment: format!("Sentiment: {}", analysis.sentiment),
            entities: analysis
                .prominent_entities
                .iter()
                .map(|entity| format!("{} ({})", entity.name, entity.kind))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessageVm {
    pub id: MessageId,
    pub speaker: &'static str,
    pub is_user: bool,
    pub body_html: String,
    pub image_src: Option<String>,
    pub resources: Vec<ResourceLinkVm>,
    pub analysis: Option<AnalysisVm>,
    /// Topic for "Test your knowledge", when offered.
    pub quiz_topic: Option<String>,
}

#[must_use]
pub fn map_chat_message(message: &ChatMessage) -> ChatMessageVm {
    let body_html = match message.role {
        Role::User => plain_text_to_html(&message.content),
        Role::Assistant => markdown_to_html(&message.content),
    };
    ChatMessageVm {
        id: message.id,
        speaker: message.role.speaker(),
        is_user: message.is_user(),
        body_html,
        image_src: message.image.as_ref().map(ImageDataUri::as_uri),
        resources: message
            .suggested_resources
            .iter()
            .map(|resource| ResourceLinkVm {
                title: resource.title.clone(),
                href: resource.url.to_string(),
            })
            .collect(),
        analysis: message.nlp_analysis.as_ref().map(AnalysisVm::from),
        quiz_topic: message.quiz_topic().map(str::to_string),
    }
}

/// Composer actions that run on the typed text instead of sending it as a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatTool {
    GenerateImage,
    SummarizeArticle,
    AnalyzeText,
}

impl ChatTool {
    pub const ALL: [Self; 3] = [Self::GenerateImage, Self::SummarizeArticle, Self::AnalyzeText];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::GenerateImage => "Generate Image",
            Self::SummarizeArticle => "Summarize Article",
            Self::AnalyzeText => "Analyze Text",
        }
    }

    /// What the user's side of the conversation shows for this action.
    #[must_use]
    pub fn request_text(self, input: &str) -> String {
        let input = input.trim();
        match self {
            Self::GenerateImage => format!("Generate an image: {input}"),
            Self::SummarizeArticle => format!("Summarize this article: {input}"),
            Self::AnalyzeText => format!("Analyze: {input}"),
        }
    }
}

#[must_use]
pub fn map_chat_messages(messages: &[ChatMessage]) -> Vec<ChatMessageVm> {
    messages.iter().map(map_chat_message).collect()
}

/// Turn an uploaded file into an inline image.
///
/// # Errors
///
/// Returns `ViewError::UnsupportedImage` for unknown extensions or empty files.
pub fn image_from_upload(file_name: &str, bytes: &[u8]) -> Result<ImageDataUri, ViewError> {
    let ext = file_name.rsplit_once('.').map_or("", |(_, ext)| ext);
    let mime = ImageDataUri::mime_for_extension(ext).ok_or(ViewError::UnsupportedImage)?;
    ImageDataUri::from_bytes(mime, bytes).map_err(|_| ViewError::UnsupportedImage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanderson_core::model::{Entity, Sentiment, UserMessageDraft, resources_for_topic};
    use sanderson_core::time::fixed_now;

    #[test]
    fn tool_requests_echo_the_typed_text() {
        assert_eq!(
            ChatTool::GenerateImage.request_text("  a robot teacher "),
            "Generate an image: a robot teacher"
        );
        assert_eq!(
            ChatTool::SummarizeArticle.request_text("https://example.com/a"),
            "Summarize this article: https://example.com/a"
        );
        let labels: Vec<_> = ChatTool::ALL.iter().map(|tool| tool.label()).collect();
        assert_eq!(labels, ["Generate Image", "Summarize Article", "Analyze Text"]);
    }

    #[test]
    fn assistant_message_maps_markdown_resources_and_topic() {
        let message = ChatMessage::assistant("**Neural networks** learn weights.", fixed_now())
            .with_resources(resources_for_topic("neural network"))
            .with_analysis(Some(NlpAnalysis::new(
                Sentiment::Mixed,
                vec![Entity {
                    name: "Hinton".into(),
                    kind: "PERSON".into(),
                }],
            )));
        let vm = map_chat_message(&message);
        assert_eq!(vm.speaker, "Christian");
        assert!(!vm.is_user);
        assert!(vm.body_html.contains("<strong>Neural networks</strong>"));
        assert_eq!(vm.resources.len(), 2);
        let analysis = vm.analysis.unwrap();
        assert_eq!(analysis.sentiment, "Sentiment: Mixed");
        assert_eq!(analysis.entities, vec!["Hinton (PERSON)".to_string()]);
        assert_eq!(
            vm.quiz_topic.as_deref(),
            Some("**Neural networks** learn weights.")
        );
    }

    #[test]
    fn user_message_is_escaped_and_has_no_quiz() {
        let message = UserMessageDraft {
            text: "<i>hi</i>".into(),
            image: None,
        }
        .validate(fixed_now())
        .unwrap();
        let vm = map_chat_message(&message);
        assert_eq!(vm.speaker, "You");
        assert!(vm.is_user);
        assert!(!vm.body_html.contains("<i>"));
        assert!(vm.quiz_topic.is_none());
    }

    #[test]
    fn error_reply_offers_no_quiz() {
        let vm = map_chat_message(&ChatMessage::error_reply(fixed_now()));
        assert!(vm.quiz_topic.is_none());
    }

    #[test]
    fn uploads_need_image_extension() {
        let image = image_from_upload("cat.PNG", b"png-bytes").unwrap();
        assert_eq!(image.mime(), "image/png");
        assert_eq!(
            image_from_upload("notes.txt", b"x"),
            Err(ViewError::UnsupportedImage)
        );
        assert_eq!(
            image_from_upload("empty.jpg", b""),
            Err(ViewError::UnsupportedImage)
        );
    }
}
