//! # Lexicon Store
//!
//! The static trigger-phrase tables behind every classifier in the pipeline.
//! A [`Lexicon`] is built once at startup, validated, and then only read, so a
//! single instance can be shared across sessions behind an `Arc`.

use crate::{errors::LexiconError, normalize::strip_punctuation};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};
use tracing::info;

/// A supported-domain category with its fixed scoring weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCategory {
    pub name: String,
    pub weight: f64,
    pub phrases: Vec<String>,
}

/// An unweighted off-domain category, used only for detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCategory {
    pub name: String,
    pub phrases: Vec<String>,
}

/// A cross-disciplinary science topic and the sentence linking it to the domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceBridge {
    pub topic: String,
    pub explanation: String,
}

/// The serializable shape of a lexicon, as found in a YAML lexicon file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconData {
    pub domain: Vec<DomainCategory>,
    pub off_domain: Vec<TopicCategory>,
    #[serde(default)]
    pub greetings: Vec<String>,
    #[serde(default)]
    pub compliments: Vec<String>,
    #[serde(default)]
    pub science_bridges: Vec<ScienceBridge>,
}

/// Validated, immutable trigger tables for the three classification axes.
#[derive(Debug, Clone)]
pub struct Lexicon {
    domain: Vec<DomainCategory>,
    off_domain: Vec<TopicCategory>,
    greetings: Vec<String>,
    compliments: Vec<String>,
    science_bridges: Vec<ScienceBridge>,
    max_domain_score: f64,
}

impl Lexicon {
    /// Builds a lexicon from raw data, lower-casing every phrase.
    ///
    /// Fails when a group repeats a category name, a domain weight is not a
    /// positive finite number, or a category has no phrases. The domain,
    /// off-domain, greeting and compliment groups must also be disjoint: no
    /// category name may be both domain and off-domain, and no phrase may
    /// belong to more than one group.
    pub fn new(data: LexiconData) -> Result<Self, LexiconError> {
        let mut seen = HashSet::new();
        let mut domain = Vec::with_capacity(data.domain.len());
        for category in data.domain {
            if !seen.insert(category.name.clone()) {
                return Err(LexiconError::DuplicateCategory(category.name));
            }
            if !(category.weight.is_finite() && category.weight > 0.0) {
                return Err(LexiconError::NonPositiveWeight(
                    category.name,
                    category.weight,
                ));
            }
            if category.phrases.is_empty() {
                return Err(LexiconError::EmptyCategory(category.name));
            }
            domain.push(DomainCategory {
                phrases: lowercase_all(category.phrases),
                ..category
            });
        }

        let mut seen = HashSet::new();
        let mut off_domain = Vec::with_capacity(data.off_domain.len());
        for category in data.off_domain {
            if !seen.insert(category.name.clone()) {
                return Err(LexiconError::DuplicateCategory(category.name));
            }
            if category.phrases.is_empty() {
                return Err(LexiconError::EmptyCategory(category.name));
            }
            off_domain.push(TopicCategory {
                phrases: lowercase_all(category.phrases),
                ..category
            });
        }

        if let Some(category) = off_domain
            .iter()
            .find(|c| domain.iter().any(|d| d.name == c.name))
        {
            return Err(LexiconError::OverlappingGroups(format!(
                "category '{}' is both domain and off-domain",
                category.name
            )));
        }

        // Conversational phrases are compared against punctuation-free text.
        let conversational = |phrases: Vec<String>| -> Vec<String> {
            phrases
                .iter()
                .map(|p| strip_punctuation(&p.to_lowercase()))
                .filter(|p| !p.is_empty())
                .collect()
        };
        let greetings = conversational(data.greetings);
        let compliments = conversational(data.compliments);

        ensure_disjoint_phrases(&[
            ("domain", domain.iter().flat_map(|c| &c.phrases).collect()),
            ("off-domain", off_domain.iter().flat_map(|c| &c.phrases).collect()),
            ("greeting", greetings.iter().collect()),
            ("compliment", compliments.iter().collect()),
        ])?;

        let science_bridges = data
            .science_bridges
            .into_iter()
            .map(|bridge| ScienceBridge {
                topic: bridge.topic.to_lowercase(),
                explanation: bridge.explanation,
            })
            .collect();

        let max_domain_score = domain
            .iter()
            .map(|c| c.phrases.len() as f64 * c.weight)
            .sum();

        Ok(Self {
            domain,
            off_domain,
            greetings,
            compliments,
            science_bridges,
            max_domain_score,
        })
    }

    /// Parses and validates a lexicon from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, LexiconError> {
        let data: LexiconData = serde_yaml::from_str(yaml)?;
        Self::new(data)
    }

    /// Reads a YAML lexicon file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let lexicon = Self::from_yaml(&content)?;
        info!(path = %path.display(), "Loaded lexicon from file.");
        Ok(lexicon)
    }

    /// The default climate-education lexicon.
    pub fn built_in() -> Self {
        Self::new(built_in_data()).expect("built-in lexicon is valid")
    }

    pub fn domain_categories(&self) -> &[DomainCategory] {
        &self.domain
    }

    pub fn off_domain_categories(&self) -> &[TopicCategory] {
        &self.off_domain
    }

    pub fn greetings(&self) -> &[String] {
        &self.greetings
    }

    pub fn compliments(&self) -> &[String] {
        &self.compliments
    }

    pub fn science_bridges(&self) -> &[ScienceBridge] {
        &self.science_bridges
    }

    /// Sum over domain categories of `phrase count × weight`.
    pub fn max_domain_score(&self) -> f64 {
        self.max_domain_score
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::built_in()
    }
}

/// Phrases may repeat inside a group (two domain categories can share one)
/// but never across groups.
fn ensure_disjoint_phrases(groups: &[(&str, Vec<&String>)]) -> Result<(), LexiconError> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for (group, phrases) in groups {
        for phrase in phrases {
            let key = strip_punctuation(phrase);
            match owners.get(&key) {
                Some(owner) if owner != group => {
                    return Err(LexiconError::OverlappingGroups(format!(
                        "phrase '{key}' is in both the {owner} and {group} groups"
                    )));
                }
                Some(_) => {}
                None => {
                    owners.insert(key, group);
                }
            }
        }
    }
    Ok(())
}

fn lowercase_all(phrases: Vec<String>) -> Vec<String> {
    phrases.into_iter().map(|p| p.to_lowercase()).collect()
}

// --- Built-in tables ---

const DOMAIN_TABLE: &[(&str, f64, &[&str])] = &[
    (
        "core_climate",
        4.0,
        &[
            "climate",
            "global warming",
            "greenhouse",
            "carbon dioxide",
            "co2",
            "emissions",
            "temperature",
            "warming",
            "cooling",
            "weather patterns",
            "climate change",
            "greenhouse effect",
            "greenhouse gas",
            "carbon emissions",
        ],
    ),
    (
        "environmental",
        1.5,
        &[
            "environment",
            "pollution",
            "sustainability",
            "renewable energy",
            "fossil fuels",
            "deforestation",
            "biodiversity",
            "ecosystem",
            "conservation",
            "sustainable",
            "green energy",
            "clean energy",
            "environmental impact",
        ],
    ),
    (
        "climate_impacts",
        2.5,
        &[
            "sea level",
            "ice caps",
            "glaciers",
            "drought",
            "flooding",
            "storms",
            "hurricanes",
            "extreme weather",
            "ocean acidification",
            "coral bleaching",
            "rising seas",
            "melting ice",
            "heat waves",
            "climate disasters",
        ],
    ),
    (
        "climate_science",
        3.0,
        &[
            "greenhouse effect",
            "carbon cycle",
            "methane",
            "ozone",
            "atmosphere",
            "albedo",
            "feedback",
            "tipping points",
            "climate models",
            "ipcc",
            "carbon footprint",
            "carbon sink",
            "atmospheric co2",
            "climate data",
        ],
    ),
    (
        "climate_solutions",
        2.5,
        &[
            "renewable",
            "solar",
            "wind",
            "electric vehicles",
            "carbon capture",
            "reforestation",
            "energy efficiency",
            "carbon footprint",
            "offsetting",
            "solar panels",
            "wind turbines",
            "green technology",
            "carbon offsets",
            "climate action",
            "mitigation",
            "adaptation",
        ],
    ),
    (
        "climate_education",
        2.0,
        &[
            "learn climate",
            "teach climate",
            "climate facts",
            "climate science",
            "climate education",
            "explain climate",
            "climate knowledge",
            "climate awareness",
        ],
    ),
];

const OFF_DOMAIN_TABLE: &[(&str, &[&str])] = &[
    (
        "technology",
        &[
            "computer",
            "software",
            "programming",
            "coding",
            "internet",
            "smartphone",
            "app",
        ],
    ),
    (
        "sports",
        &[
            "football",
            "basketball",
            "soccer",
            "tennis",
            "olympics",
            "sports",
            "game",
        ],
    ),
    (
        "entertainment",
        &[
            "movie",
            "music",
            "celebrity",
            "actor",
            "singer",
            "netflix",
            "youtube",
        ],
    ),
    (
        "food",
        &[
            "recipe",
            "cooking",
            "cook",
            "pasta",
            "restaurant",
            "food",
            "meal",
            "dinner",
            "breakfast",
        ],
    ),
    (
        "health",
        &[
            "medicine",
            "doctor",
            "hospital",
            "disease",
            "symptoms",
            "treatment",
        ],
    ),
    (
        "finance",
        &[
            "money",
            "investment",
            "stocks",
            "banking",
            "loan",
            "cryptocurrency",
        ],
    ),
    (
        "personal_life",
        &["relationship", "dating", "marriage", "family", "personal"],
    ),
    (
        "general",
        &["capital", "country", "geography", "population", "language"],
    ),
];

const GREETINGS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "howdy",
    "what's up",
    "whats up",
    "sup",
    "yo",
    "hiya",
];

const COMPLIMENTS: &[&str] = &[
    "thank you",
    "thanks",
    "great",
    "awesome",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "brilliant",
    "helpful",
    "nice",
    "good job",
    "well done",
    "impressive",
    "perfect",
    "love it",
    "appreciate",
    "grateful",
    "cool",
    "nice response",
    "good response",
    "that was helpful",
    "very helpful",
    "thx",
    "ty",
    "good answer",
    "great answer",
    "smart",
    "clever",
];

const SCIENCE_BRIDGES: &[(&str, &str)] = &[
    (
        "photosynthesis",
        "Photosynthesis ties directly into climate through the carbon cycle: plants draw CO2 out of the air as they grow, which makes forests and oceans important carbon sinks.",
    ),
    (
        "ocean currents",
        "Ocean currents move enormous amounts of heat around the planet, shaping regional climates and weather patterns.",
    ),
    (
        "water cycle",
        "The water cycle is closely linked to climate: warmer temperatures speed up evaporation and change where and how much rain falls.",
    ),
    (
        "chemistry",
        "Chemistry underpins climate science, from how greenhouse gases trap heat to the reactions behind ocean acidification.",
    ),
    (
        "biology",
        "Biology connects to climate through how ecosystems respond to warming, how species adapt, and the role living things play in the carbon cycle.",
    ),
];

fn strings(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

fn built_in_data() -> LexiconData {
    LexiconData {
        domain: DOMAIN_TABLE
            .iter()
            .map(|(name, weight, phrases)| DomainCategory {
                name: name.to_string(),
                weight: *weight,
                phrases: strings(phrases),
            })
            .collect(),
        off_domain: OFF_DOMAIN_TABLE
            .iter()
            .map(|(name, phrases)| TopicCategory {
                name: name.to_string(),
                phrases: strings(phrases),
            })
            .collect(),
        greetings: strings(GREETINGS),
        compliments: strings(COMPLIMENTS),
        science_bridges: SCIENCE_BRIDGES
            .iter()
            .map(|(topic, explanation)| ScienceBridge {
                topic: topic.to_string(),
                explanation: explanation.to_string(),
            })
            .collect(),
    }
}
