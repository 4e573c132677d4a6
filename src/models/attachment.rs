// Attachment metadata scan models

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentAdvice {
    #[serde(rename = "DON'T OPEN")]
    DontOpen,
    #[serde(rename = "Caution")]
    Caution,
}

impl AttachmentAdvice {
    pub fn from_score(score: u8) -> Self {
        if score >= 50 {
            AttachmentAdvice::DontOpen
        } else {
            AttachmentAdvice::Caution
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentAdvice::DontOpen => "DON'T OPEN",
            AttachmentAdvice::Caution => "Caution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentScanResult {
    pub score: u8,
    pub signals: Vec<String>,
    pub advice: AttachmentAdvice,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanAttachmentRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default, deserialize_with = "lenient_filesize")]
    pub filesize: Option<u64>,
}

/// Accept sizes sent as integers, floats or numeric strings. Fractions are
/// truncated and negative sizes count as zero; any other value is rejected.
fn lenient_filesize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let size = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|_| 0))
            .or_else(|| n.as_f64().map(truncate_size)),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .ok()
                .map(|n| u64::try_from(n).unwrap_or(0))
        },
        Some(_) => None,
    };
    size.map(Some)
        .ok_or_else(|| de::Error::custom("filesize must be a number"))
}

fn truncate_size(size: f64) -> u64 {
    if size.is_finite() && size > 0.0 {
        size.trunc() as u64
    } else {
        0
    }
}

/// Wire shape of `POST /scan_attachment`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanAttachmentResponse {
    pub filename: String,
    pub mimetype: String,
    pub filesize: u64,
    pub score: u8,
    pub signals: Vec<String>,
    pub advice: AttachmentAdvice,
}
