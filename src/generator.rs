//! Candidate pools and synthesis of business insight records
//!
//! Both the insight service and the client's offline fallback draw from the
//! same pools, so a locally synthesized record is indistinguishable in shape
//! and bounds from a server response. All selection goes through a
//! caller-provided `Rng` so tests can pass a seeded generator.

use crate::models::BusinessInsight;
use chrono::Utc;
use rand::Rng;

/// Discrete rating pool, shared by the service and the offline fallback.
pub const RATING_POOL: [f64; 8] = [4.1, 4.2, 4.3, 4.4, 4.5, 4.6, 4.7, 4.8];

/// Plausible review counts
pub const REVIEW_POOL: [u32; 10] = [45, 67, 89, 123, 156, 189, 234, 267, 298, 334];

const HEADLINE_TEMPLATES: [&str; 7] = [
    "Why {name} is {location}'s Best Kept Secret in 2025",
    "Discover {name}: {location}'s Rising Star Business",
    "{name} in {location}: Where Quality Meets Excellence",
    "Top-Rated {name} Transforms {location}'s Business Scene",
    "{name}: The {location} Business Everyone's Talking About",
    "Experience Excellence at {name} in {location}",
    "{name} Sets New Standards for {location} Businesses",
];

const REGENERATE_TEMPLATES: [&str; 9] = [
    "{name}: Leading {location}'s Business Innovation in 2025",
    "Why {name} is {location}'s Most Trusted Choice",
    "{name} Redefines Excellence in {location}",
    "Discover What Makes {name} {location}'s Premier Destination",
    "{name}: Where {location} Finds Quality and Service",
    "Experience the {name} Difference in {location}",
    "{name} - {location}'s Award-Winning Business Solution",
    "Join Thousands Who Choose {name} in {location}",
    "{name}: Elevating {location}'s Business Standards",
];

/// Substitute every placeholder occurrence in a headline template.
fn fill(template: &str, name: &str, location: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{location}", location)
}

/// Stateless insight synthesizer
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightGenerator;

impl InsightGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Synthesize a full insight record for an already-validated query.
    pub fn insight(&self, name: &str, location: &str, rng: &mut impl Rng) -> BusinessInsight {
        BusinessInsight {
            rating: RATING_POOL[rng.gen_range(0..RATING_POOL.len())],
            reviews: REVIEW_POOL[rng.gen_range(0..REVIEW_POOL.len())],
            headline: fill(
                HEADLINE_TEMPLATES[rng.gen_range(0..HEADLINE_TEMPLATES.len())],
                name,
                location,
            ),
            name: name.to_string(),
            location: location.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Pick a fresh headline, independent of any previous one. Repeats are
    /// allowed; there is no dedup guarantee.
    pub fn headline(&self, name: &str, location: &str, rng: &mut impl Rng) -> String {
        fill(
            REGENERATE_TEMPLATES[rng.gen_range(0..REGENERATE_TEMPLATES.len())],
            name,
            location,
        )
    }
}
