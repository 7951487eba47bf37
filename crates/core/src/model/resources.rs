use serde::{Deserialize, Serialize};
use url::Url;

/// Most "Learn More" links attached to a single reply.
pub const MAX_SUGGESTED_RESOURCES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedResource {
    pub title: String,
    pub url: Url,
}

struct Topic {
    keywords: &'static [&'static str],
    links: [(&'static str, &'static str); 2],
}

const TOPICS: &[Topic] = &[
    Topic {
        keywords: &["neural network"],
        links: [
            (
                "Neural Networks and Deep Learning - Michael Nielsen",
                "http://neuralnetworksanddeeplearning.com/",
            ),
            ("DeepLearning.AI - Andrew Ng", "https://www.deeplearning.ai/"),
        ],
    },
    Topic {
        keywords: &["ethics"],
        links: [
            (
                "AI Ethics - Markkula Center for Applied Ethics",
                "https://www.scu.edu/ethics/ai-ethics/",
            ),
            (
                "Ethics of Artificial Intelligence - Stanford Encyclopedia of Philosophy",
                "https://plato.stanford.edu/entries/ethics-ai/",
            ),
        ],
    },
    Topic {
        keywords: &["generative ai"],
        links: [
            (
                "What is Generative AI? - NVIDIA",
                "https://www.nvidia.com/en-us/glossary/generative-ai/",
            ),
            (
                "Generative AI by Google Cloud",
                "https://cloud.google.com/discover/generative-ai",
            ),
        ],
    },
    Topic {
        keywords: &["explainable ai", "xai"],
        links: [
            (
                "Explainable AI (XAI) - IBM",
                "https://www.ibm.com/topics/explainable-ai",
            ),
            (
                "Introduction to Explainable AI - Google Cloud",
                "https://cloud.google.com/ai-platform/docs/explainable-ai/overview",
            ),
        ],
    },
];

/// Built-in reading suggestions for `topic`, at most [`MAX_SUGGESTED_RESOURCES`].
///
/// Unknown but non-blank topics get search links instead.
#[must_use]
pub fn resources_for_topic(topic: &str) -> Vec<SuggestedResource> {
    let lowered = topic.to_lowercase();
    let mut out: Vec<SuggestedResource> = TOPICS
        .iter()
        .filter(|t| t.keywords.iter().any(|kw| lowered.contains(kw)))
        .flat_map(|t| t.links.iter())
        .filter_map(|(title, url)| {
            Url::parse(url).ok().map(|url| SuggestedResource {
                title: (*title).to_string(),
                url,
            })
        })
        .collect();

    let trimmed = topic.trim();
    if out.is_empty() && !trimmed.is_empty() {
        out.extend(search_links(trimmed));
    }

    out.truncate(MAX_SUGGESTED_RESOURCES);
    out
}

fn search_links(topic: &str) -> Vec<SuggestedResource> {
    let mut links = Vec::with_capacity(2);
    if let Ok(url) =
        Url::parse_with_params("https://scholar.google.com/scholar", &[("q", topic)])
    {
        links.push(SuggestedResource {
            title: format!("Search results for \"{topic}\" on Google Scholar"),
            url,
        });
    }
    if let Ok(url) = Url::parse_with_params(
        "https://en.wikipedia.org/wiki/Special:Search",
        &[("search", topic)],
    ) {
        links.push(SuggestedResource {
            title: format!("Learn about \"{topic}\" on Wikipedia"),
            url,
        });
    }
    links
}
