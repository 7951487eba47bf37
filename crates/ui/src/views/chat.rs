use dioxus::prelude::*;
use sanderson_core::model::{Conversation, ImageDataUri, MessageId, UserMessageDraft};
use services::{ExportError, PageLayout, export_transcript};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::views::quiz_panel::QuizPanel;
use crate::vm::{ChatMessageVm, ChatTool, QuizVm, image_from_upload, map_chat_messages};

#[component]
pub fn ChatView() -> Element {
    let ctx = use_context::<AppContext>();
    let chat = ctx.chat();
    let quiz = ctx.quiz();
    let threshold = ctx.pass_threshold();
    let transcript_path = ctx.transcript_path();

    let mut conversation = use_signal(Conversation::new);
    let mut input = use_signal(String::new);
    let mut pending_image = use_signal(|| None::<ImageDataUri>);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);
    let mut notice = use_signal(|| None::<String>);
    let mut quiz_for = use_signal(|| None::<MessageId>);
    let mut inline_quiz = use_signal(|| None::<QuizVm>);

    let run_tool = {
        let chat = chat.clone();
        use_callback(move |tool: ChatTool| {
            if busy() {
                return;
            }
            let text = input.peek().trim().to_string();
            if text.is_empty() {
                return;
            }
            let draft = UserMessageDraft {
                text: tool.request_text(&text),
                image: None,
            };
            let Ok(user) = chat.user_message(draft) else {
                return;
            };
            conversation.write().push(user);
            input.set(String::new());
            busy.set(true);
            error.set(None);

            let chat = chat.clone();
            spawn(async move {
                let result = match tool {
                    ChatTool::GenerateImage => chat.generate_image(&text).await,
                    ChatTool::SummarizeArticle => chat.summarize_article(&text).await,
                    ChatTool::AnalyzeText => Ok(chat.analysis_reply(&text).await),
                };
                match result {
                    Ok(reply) => {
                        conversation.write().push(reply);
                    }
                    Err(err) => {
                        conversation.write().push(chat.apology());
                        error.set(Some(ViewError::from(&err)));
                    }
                }
                busy.set(false);
            });
        })
    };

    let send = use_callback(move |()| {
        if busy() {
            return;
        }
        let draft = UserMessageDraft {
            text: input.peek().clone(),
            image: pending_image.peek().clone(),
        };
        let Ok(user) = chat.user_message(draft) else {
            return;
        };
        conversation.write().push(user.clone());
        input.set(String::new());
        pending_image.set(None);
        busy.set(true);
        error.set(None);

        let chat = chat.clone();
        spawn(async move {
            match chat.reply(&user).await {
                Ok(reply) => {
                    conversation.write().push(reply);
                }
                Err(_) => {
                    conversation.write().push(chat.apology());
                    error.set(Some(ViewError::Unknown));
                }
            }
            busy.set(false);
        });
    });

    let open_quiz = use_callback(move |(id, topic): (MessageId, String)| {
        match quiz.single_question(&topic, threshold) {
            Ok(session) => {
                inline_quiz.set(Some(QuizVm::new(session)));
                quiz_for.set(Some(id));
            }
            Err(_) => error.set(Some(ViewError::Unknown)),
        }
    });

    let close_quiz = use_callback(move |()| {
        quiz_for.set(None);
        inline_quiz.set(None);
    });

    let export = use_callback(move |()| {
        let messages = conversation.peek().messages().to_vec();
        match export_transcript(&transcript_path, &messages, PageLayout::default()) {
            Ok(()) => notice.set(Some(format!(
                "Chat exported to {}",
                transcript_path.display()
            ))),
            Err(ExportError::Empty) => error.set(Some(ViewError::NothingToExport)),
            Err(_) => error.set(Some(ViewError::Unknown)),
        }
    });

    let clear = use_callback(move |()| {
        conversation.write().clear();
        close_quiz.call(());
        notice.set(None);
        error.set(None);
    });

    let messages = map_chat_messages(conversation.read().messages());
    let active_quiz = quiz_for();

    rsx! {
        div { class: "page page--chat",
            header { class: "chat-header",
                h2 { "Chat with Christian" }
                div { class: "chat-header-actions",
                    button { onclick: move |_| export.call(()), "Export Chat" }
                    button { onclick: move |_| clear.call(()), "Clear" }
                }
            }
            if !ctx.ai_enabled() {
                p { class: "hint", "Set SANDERSON_AI_API_KEY to chat with Christian." }
            }
            div { class: "chat-log",
                if messages.is_empty() {
                    p { class: "empty", "Ask Christian anything about AI and machine learning." }
                }
                for (id, message) in messages.into_iter().map(|m| (m.id, m)) {
                    MessageBubble {
                        key: "{id}",
                        quiz_open: active_quiz == Some(id),
                        message,
                        on_quiz: open_quiz,
                    }
                }
                if busy() {
                    p { class: "typing", "Christian is thinking..." }
                }
            }
            if active_quiz.is_some() {
                div { class: "inline-quiz",
                    QuizPanel { vm: inline_quiz }
                    button { onclick: move |_| close_quiz.call(()), "Close Quiz" }
                }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            if let Some(text) = notice() {
                p { class: "notice", "{text}" }
            }
            ChatComposer {
                value: input(),
                image_attached: pending_image.read().is_some(),
                busy: busy(),
                on_input: move |value: String| input.set(value),
                on_image: move |result: Result<ImageDataUri, ViewError>| match result {
                    Ok(image) => {
                        pending_image.set(Some(image));
                        error.set(None);
                    }
                    Err(err) => error.set(Some(err)),
                },
                on_clear_image: move |()| pending_image.set(None),
                on_send: send,
                on_tool: run_tool,
            }
        }
    }
}

#[component]
fn MessageBubble(message: ChatMessageVm, quiz_open: bool, on_quiz: Callback<(MessageId, String)>) -> Element {
    let bubble_class = if message.is_user {
        "message message--user"
    } else {
        "message message--assistant"
    };
    let id = message.id;

    rsx! {
        article { class: bubble_class,
            p { class: "message-speaker", "{message.speaker}" }
            if let Some(src) = message.image_src.clone() {
                img { class: "message-image", src: "{src}", alt: "Attached image" }
            }
            div { class: "message-body", dangerous_inner_html: "{message.body_html}" }
            if let Some(analysis) = message.analysis.clone() {
                div { class: "message-analysis",
                    span { "{analysis.sentiment}" }
                    if !analysis.entities.is_empty() {
                        ul {
                            for entity in analysis.entities {
                                li { "{entity}" }
                            }
                        }
                    }
                }
            }
            if !message.resources.is_empty() {
                div { class: "message-resources",
                    h4 { "Learn More" }
                    ul {
                        for resource in message.resources.clone() {
                            li {
                                a { href: "{resource.href}", target: "_blank", "{resource.title}" }
                            }
                        }
                    }
                }
            }
            if let Some(topic) = message.quiz_topic.clone() {
                if !quiz_open {
                    button {
                        class: "message-quiz",
                        onclick: move |_| on_quiz.call((id, topic.clone())),
                        "Test your knowledge"
                    }
                }
            }
        }
    }
}

#[component]
fn ChatComposer(
    value: String,
    image_attached: bool,
    busy: bool,
    on_input: EventHandler<String>,
    on_image: EventHandler<Result<ImageDataUri, ViewError>>,
    on_clear_image: EventHandler<()>,
    on_send: Callback<()>,
    on_tool: Callback<ChatTool>,
) -> Element {
    let can_send = !busy && (!value.trim().is_empty() || image_attached);
    let can_use_tools = !busy && !value.trim().is_empty();

    rsx! {
        form {
            class: "chat-composer",
            onsubmit: move |evt| {
                evt.prevent_default();
                on_send.call(());
            },
            textarea {
                value: "{value}",
                placeholder: "Ask about neural networks, generative AI, ethics...",
                disabled: busy,
                oninput: move |evt| on_input.call(evt.value()),
                onkeydown: move |evt| {
                    if evt.key() == Key::Enter && !evt.modifiers().contains(Modifiers::SHIFT) {
                        evt.prevent_default();
                        on_send.call(());
                    }
                },
            }
            div { class: "chat-composer-actions",
                input {
                    r#type: "file",
                    accept: "image/*",
                    disabled: busy,
                    onchange: move |evt| async move {
                        if let Some(file) = evt.files().into_iter().next() {
                            let name = file.name();
                            let result = match file.read_bytes().await {
                                Ok(bytes) => image_from_upload(&name, &bytes),
                                Err(_) => Err(ViewError::UnsupportedImage),
                            };
                            on_image.call(result);
                        }
                    },
                }
                if image_attached {
                    span { class: "chat-attachment", "Image attached" }
                    button { r#type: "button", onclick: move |_| on_clear_image.call(()), "Remove" }
                }
                for tool in ChatTool::ALL {
                    button {
                        r#type: "button",
                        class: "chat-tool",
                        disabled: !can_use_tools,
                        onclick: move |_| on_tool.call(tool),
                        "{tool.label()}"
                    }
                }
                button { r#type: "submit", class: "primary", disabled: !can_send, "Send" }
            }
        }
    }
}
