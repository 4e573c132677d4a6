// Attachment metadata scoring
// Rule table over filename, mimetype and size; independent of URL scoring

use crate::models::{AttachmentAdvice, AttachmentScanResult};

pub const SUSPICIOUS_EXTENSIONS: [&str; 7] =
    [".exe", ".scr", ".js", ".vbs", ".bat", ".ps1", ".jar"];
pub const PHISHY_NAME_WORDS: [&str; 2] = ["invoice", "payment"];
pub const LARGE_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Attachment metadata with the filename already lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentMeta {
    pub filename: String,
    pub mimetype: String,
    pub filesize: u64,
}

impl AttachmentMeta {
    pub fn new(filename: &str, mimetype: &str, filesize: u64) -> Self {
        Self {
            filename: filename.to_lowercase(),
            mimetype: mimetype.to_lowercase(),
            filesize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentCondition {
    ExtensionSuffix(&'static str),
    LargerThan(u64),
    NameContainsAny(&'static [&'static str]),
}

impl AttachmentCondition {
    pub fn matches(&self, meta: &AttachmentMeta) -> bool {
        match self {
            AttachmentCondition::ExtensionSuffix(ext) => meta.filename.ends_with(ext),
            AttachmentCondition::LargerThan(limit) => meta.filesize > *limit,
            AttachmentCondition::NameContainsAny(words) => {
                words.iter().any(|w| meta.filename.contains(w))
            },
        }
    }

    fn signal(&self) -> String {
        match self {
            AttachmentCondition::ExtensionSuffix(ext) => format!("suspicious_ext:{}", ext),
            AttachmentCondition::LargerThan(_) => "large_file".to_string(),
            AttachmentCondition::NameContainsAny(_) => "phishy_filename".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentRule {
    pub condition: AttachmentCondition,
    pub increment: u32,
}

/// One rule per suspicious extension, then size, then filename wording.
/// Extension rules are additive: every matching suffix contributes.
pub fn attachment_rules() -> Vec<AttachmentRule> {
    SUSPICIOUS_EXTENSIONS
        .iter()
        .map(|&ext| AttachmentRule {
            condition: AttachmentCondition::ExtensionSuffix(ext),
            increment: 40,
        })
        .chain([
            AttachmentRule {
                condition: AttachmentCondition::LargerThan(LARGE_FILE_BYTES),
                increment: 10,
            },
            AttachmentRule {
                condition: AttachmentCondition::NameContainsAny(&PHISHY_NAME_WORDS),
                increment: 10,
            },
        ])
        .collect()
}

pub fn score_attachment(meta: &AttachmentMeta) -> AttachmentScanResult {
    let mut total: u32 = 0;
    let mut signals = Vec::new();

    for rule in attachment_rules() {
        if rule.condition.matches(meta) {
            total = total.saturating_add(rule.increment);
            signals.push(rule.condition.signal());
        }
    }

    let score = total.min(100) as u8;
    AttachmentScanResult {
        score,
        signals,
        advice: AttachmentAdvice::from_score(score),
    }
}
