use super::question::{QuizQuestion, QuizQuestionDraft, QuizValidationError};

/// Characters of an assistant reply used as the quiz topic.
pub const TOPIC_PREFIX_CHARS: usize = 100;

struct Entry {
    keywords: &'static [&'static str],
    question: &'static str,
    options: [&'static str; 4],
    correct: i64,
    explanation: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        keywords: &["neural network"],
        question: "What is the basic building block of a neural network?",
        options: ["Algorithm", "Neuron (or Node)", "Dataset", "Function"],
        correct: 1,
        explanation: "Neurons (or nodes) are the fundamental units that process and transmit \
                      information in a neural network, inspired by biological neurons.",
    },
    Entry {
        keywords: &["ethics"],
        question: "Which of these is a common ethical concern in AI development?",
        options: [
            "Algorithm speed",
            "Bias in datasets and models",
            "Hardware compatibility",
            "Programming language choice",
        ],
        correct: 1,
        explanation: "Bias in datasets can lead to AI systems making unfair or discriminatory \
                      decisions, which is a major ethical concern.",
    },
    Entry {
        keywords: &["generative ai"],
        question: "What is a common application of Generative AI?",
        options: [
            "Data sorting",
            "Image classification",
            "Creating new images or text",
            "Predicting stock prices",
        ],
        correct: 2,
        explanation: "Generative AI models are designed to create new content, such as images, \
                      text, music, or video, based on the data they were trained on.",
    },
    Entry {
        keywords: &["explainable ai", "xai"],
        question: "What is the primary goal of Explainable AI (XAI)?",
        options: [
            "To make AI models faster",
            "To make AI models more complex",
            "To make AI models understandable to humans",
            "To reduce the cost of AI development",
        ],
        correct: 2,
        explanation: "XAI aims to provide insights into how AI models make their decisions, \
                      making them more transparent and trustworthy.",
    },
];

const FALLBACK: Entry = Entry {
    keywords: &[],
    question: "What does \"AI\" stand for?",
    options: [
        "Automated Intelligence",
        "Artificial Intelligence",
        "Algorithmic Intelligence",
        "Advanced Interface",
    ],
    correct: 1,
    explanation: "\"AI\" stands for Artificial Intelligence, which refers to the simulation of \
                  human intelligence in machines.",
};

/// First [`TOPIC_PREFIX_CHARS`] characters of `message`.
#[must_use]
pub fn topic_from_message(message: &str) -> &str {
    match message.char_indices().nth(TOPIC_PREFIX_CHARS) {
        Some((byte, _)) => &message[..byte],
        None => message,
    }
}

/// Pick the built-in question whose keyword appears in `topic`.
///
/// # Errors
///
/// Only fails if a catalog entry is itself malformed.
pub fn question_for_topic(topic: &str) -> Result<QuizQuestion, QuizValidationError> {
    let lowered = topic.to_lowercase();
    let entry = ENTRIES
        .iter()
        .find(|entry| entry.keywords.iter().any(|kw| lowered.contains(kw)))
        .unwrap_or(&FALLBACK);

    QuizQuestionDraft::new(
        entry.question,
        entry.options,
        entry.correct,
        Some(entry.explanation),
    )
    .validate()
}
