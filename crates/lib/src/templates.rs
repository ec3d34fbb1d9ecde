//! # Response Templates
//!
//! Fixed texts returned by the non-generative strategies, the fallbacks used
//! when generation fails or produces too little, and the small tables used by
//! the post-processor.

use rand::{seq::SliceRandom, Rng};

// --- Conversational pools ---

pub const GREETING_RESPONSES: &[&str] = &[
    "Hello! I'm your climate education companion. I can help you learn about climate change, its impacts, and sustainability solutions. What would you like to explore today?",
    "Hi there! Great to meet you. I love helping people understand climate science and environmental issues. Which climate topic can I help you with?",
    "Hey! Welcome. I'm happy to share what I know about our planet's climate and how we can protect it. What would you like to learn about?",
    "Hello! I enjoy talking about climate science, renewable energy, and environmental solutions. What climate question is on your mind?",
    "Hi! Nice to see you. I'm a friendly climate education assistant, ready to explore global warming, sustainability, and environmental protection with you. What interests you most?",
];

pub const COMPLIMENT_RESPONSES: &[&str] = &[
    "Thank you so much! I'm glad I could help you learn about climate science. What other climate topic would you like to explore?",
    "You're very welcome! I love sharing knowledge about our planet's climate. Is there another environmental question I can help with?",
    "I appreciate your kind words! What else would you like to know about sustainability or environmental protection?",
    "Thank you! It makes me happy to help people understand climate change better. What other climate topic interests you?",
    "I'm so glad that was helpful! There's a lot to learn about climate science. What would you like to explore next?",
    "Thanks for the feedback! What other questions do you have about our environment?",
];

// --- Routing templates ---

/// Placeholders: `{topic}`, `{examples}`.
pub const OFF_DOMAIN_REJECTION_TEMPLATE: &str = "I'm a climate education assistant and can only answer questions about climate change, the environment, and sustainability. Your question appears to be about {topic} (detected: {examples}).\n\nTry asking about: global warming, renewable energy, carbon footprint, climate impacts, or environmental solutions!";

pub const LOW_CONFIDENCE_REDIRECT: &str = "I specialize in climate education and can help with questions about:\n   Climate science (greenhouse effect, global warming)\n   Environmental impacts (sea level rise, extreme weather)\n   Climate solutions (renewable energy, sustainability)\n   Climate education and awareness\n\nCould you please ask a climate-related question?";

/// Placeholders: `{topic}`, `{explanation}`.
pub const SCIENCE_BRIDGE_TEMPLATE: &str = "While {topic} isn't exclusively a climate topic, it connects to climate science: {explanation}\n\nWould you like to know more about the climate aspects of this topic?";

pub const GENERATION_APOLOGY: &str = "I can help with this climate question, but I ran into a technical issue. Please try rephrasing your question.";

pub const SHORT_ANSWER_FALLBACK: &str =
    "I can provide information about this climate topic. What specific aspect interests you?";

/// System instruction sent alongside the prompt to chat-style generators.
pub const GENERATOR_SYSTEM_PROMPT: &str = "You are a climate education assistant. Answer the user's climate question in two or three clear, factual sentences suitable for a general audience.";

pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "What is global warming?",
    "How do renewable energy sources work?",
    "What can individuals do about climate change?",
    "How does deforestation affect the climate?",
];

// --- Post-processing tables ---

/// Leading labels a generator may echo back, matched case-insensitively.
pub const ANSWER_LABELS: &[&str] = &["question:", "answer:", "response:", "a:", "q:"];

/// Polarity-inverted phrases and their corrections.
pub const FACTUAL_CORRECTIONS: &[(&str, &str)] = &[
    ("sea levels falling", "sea levels rising"),
    ("sea level falling", "sea level rising"),
    ("temperature decreasing", "temperature increasing"),
];

/// Picks one response from a pool using the caller's randomness source.
pub fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}
