// Heuristic URL scoring
// Ordered rule table evaluated in a single pass over the feature record

use crate::models::{HeuristicRuleId, Signal, UrlFeatures};

/// A predicate over the feature record with its score increment and message
pub struct HeuristicRule {
    pub id: HeuristicRuleId,
    pub applies: fn(&UrlFeatures) -> bool,
    pub increment: fn(&UrlFeatures) -> i32,
    pub message: fn(&UrlFeatures) -> String,
}

impl HeuristicRule {
    /// Increment and signal when the rule fires
    pub fn evaluate(&self, features: &UrlFeatures) -> Option<(i32, Signal)> {
        if !(self.applies)(features) {
            return None;
        }
        let signal = Signal {
            message: (self.message)(features),
            rule: self.id,
        };
        Some(((self.increment)(features), signal))
    }
}

pub const LONG_URL_THRESHOLD: usize = 75;
pub const HIGH_ENTROPY_THRESHOLD: f64 = 3.5;
pub const SUSPICIOUS_WORD_WEIGHT: i32 = 12;
pub const SUSPICIOUS_WORD_CAP: i32 = 30;

/// Evaluation order is also signal order
pub static HEURISTIC_RULES: [HeuristicRule; 7] = [
    HeuristicRule {
        id: HeuristicRuleId::IpHost,
        applies: |f| f.has_ip,
        increment: |_| 30,
        message: |_| "host looks like IP".to_string(),
    },
    HeuristicRule {
        id: HeuristicRuleId::AtSymbol,
        applies: |f| f.has_at_symbol,
        increment: |_| 25,
        message: |_| "contains '@'".to_string(),
    },
    HeuristicRule {
        id: HeuristicRuleId::Shortener,
        applies: |f| f.uses_shortener,
        increment: |_| 20,
        message: |_| "uses shortener".to_string(),
    },
    HeuristicRule {
        id: HeuristicRuleId::SuspiciousWords,
        applies: |f| f.suspicious_word_count > 0,
        increment: |f| {
            let count = i32::try_from(f.suspicious_word_count).unwrap_or(i32::MAX);
            count
                .saturating_mul(SUSPICIOUS_WORD_WEIGHT)
                .min(SUSPICIOUS_WORD_CAP)
        },
        message: |f| format!("{} suspicious word(s)", f.suspicious_word_count),
    },
    HeuristicRule {
        id: HeuristicRuleId::LongUrl,
        applies: |f| f.url_length > LONG_URL_THRESHOLD,
        increment: |_| 10,
        message: |_| "very long URL".to_string(),
    },
    HeuristicRule {
        id: HeuristicRuleId::HighHostEntropy,
        applies: |f| f.host_entropy > HIGH_ENTROPY_THRESHOLD,
        increment: |_| 8,
        message: |_| "high host entropy".to_string(),
    },
    HeuristicRule {
        id: HeuristicRuleId::NotHttps,
        applies: |f| !f.is_https,
        increment: |_| 5,
        message: |_| "not HTTPS".to_string(),
    },
];

/// Score a feature record. Every rule is evaluated; the sum is clamped to 0..=100.
pub fn score(features: &UrlFeatures) -> (u8, Vec<Signal>) {
    let mut total: i32 = 0;
    let mut signals = Vec::new();

    for rule in HEURISTIC_RULES.iter() {
        if let Some((increment, signal)) = rule.evaluate(features) {
            total = total.saturating_add(increment);
            signals.push(signal);
        }
    }

    (total.clamp(0, 100) as u8, signals)
}
