// URL feature extraction
// Turns raw URL text into the fixed-shape record consumed by the scorers

use lazy_static::lazy_static;
use regex::Regex;
use axum::http::Uri;
use std::collections::HashMap;
use url::Url;

use crate::models::UrlFeatures;

// =============================================================================
// STATIC TABLES
// =============================================================================

/// Words counted as substrings of the lowercased URL; overlaps count separately
pub const SUSPICIOUS_WORDS: [&str; 8] = [
    "login", "secure", "update", "verify", "account", "bank", "signin", "password",
];

pub const SHORTENER_DOMAINS: [&str; 5] = ["bit.ly", "tinyurl.com", "t.co", "goo.gl", "is.gd"];

lazy_static! {
    /// Dotted-quad of 1-3 digit groups, no range check
    static ref IPV4_PATTERN: Regex =
        Regex::new(r"^[0-9]{1,3}(\.[0-9]{1,3}){3}$").expect("Invalid IPv4 pattern regex");
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Scheme, host and path as submitted. Numeric hosts are kept verbatim
/// rather than normalized into dotted-quad form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct UrlParts {
    scheme: String,
    host: String,
    path: String,
}

/// Split a URL into its parts. Host-rewriting parsers are only used when the
/// text is not a valid URI. Input without a scheme has no host or path.
fn split_url(url: &str) -> Option<UrlParts> {
    if let Ok(uri) = url.parse::<Uri>() {
        let scheme = uri.scheme_str()?.to_lowercase();
        return Some(UrlParts {
            scheme,
            host: uri.host().unwrap_or("").to_lowercase(),
            path: uri.path().to_string(),
        });
    }

    let parsed = Url::parse(url).ok()?;
    Some(UrlParts {
        scheme: parsed.scheme().to_string(),
        host: parsed.host_str().unwrap_or("").to_string(),
        path: parsed.path().to_string(),
    })
}

/// Best-effort host from scheme-less text such as `www.example.com/login`
fn bare_host(url: &str) -> Option<String> {
    let authority = url.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit('@').next().unwrap_or("");
    let host = host_port.split(':').next().unwrap_or("").to_lowercase();
    let valid = host.contains('.')
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    valid.then_some(host)
}

/// Extract features from a URL. Never fails: unparsable input yields empty
/// host/scheme/path fields while the lexical fields still reflect the raw text.
pub fn extract(url: &str) -> UrlFeatures {
    let url = url.trim();
    let parts = split_url(url).unwrap_or_else(|| {
        tracing::debug!("URL did not parse, extracting lexical features only: {}", url);
        UrlParts::default()
    });
    let host = parts.host.as_str();

    let has_ip = looks_like_ip(host);
    let apex = if has_ip {
        host.to_string()
    } else if host.is_empty() {
        bare_host(url)
            .and_then(|candidate| registered_domain(&candidate))
            .unwrap_or_default()
    } else {
        registered_domain(host).unwrap_or_else(|| host.to_string())
    };

    UrlFeatures {
        url_length: url.chars().count(),
        host_length: apex.chars().count(),
        host_entropy: shannon_entropy(&apex),
        has_ip,
        has_at_symbol: url.contains('@'),
        dot_count: host.matches('.').count(),
        suspicious_word_count: suspicious_word_count(url),
        is_https: parts.scheme == "https",
        uses_shortener: SHORTENER_DOMAINS.iter().any(|s| host.ends_with(s)),
        path_token_count: parts
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .count(),
    }
}

/// Shannon entropy in bits of the character distribution, 0.0 for ""
pub fn shannon_entropy(text: &str) -> f64 {
    let mut freq_map: HashMap<char, usize> = HashMap::new();
    let mut len = 0usize;
    for ch in text.chars() {
        *freq_map.entry(ch).or_insert(0) += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }

    let len = len as f64;
    let entropy: f64 = freq_map
        .values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum();
    // A single repeated character gives -0.0
    entropy.max(0.0)
}

pub fn looks_like_ip(host: &str) -> bool {
    !host.is_empty() && IPV4_PATTERN.is_match(host)
}

pub fn suspicious_word_count(url: &str) -> usize {
    let lower = url.to_lowercase();
    SUSPICIOUS_WORDS
        .iter()
        .filter(|word| lower.contains(*word))
        .count()
}

/// Registered (apex) domain under a known ICANN public suffix; `None` for
/// empty hosts and hosts whose suffix is not on the list (e.g. `localhost`).
/// Privately registered suffixes such as `blogspot.com` are not treated as
/// suffixes, so `foo.blogspot.com` has the apex `blogspot.com`.
pub fn registered_domain(host: &str) -> Option<String> {
    if host.is_empty() {
        return None;
    }
    let domain = psl::domain(host.as_bytes())?;
    let suffix = domain.suffix();
    if !suffix.is_known() {
        return None;
    }
    if suffix.typ() == Some(psl::Type::Private) {
        return icann_registered_domain(host, suffix.as_bytes());
    }
    std::str::from_utf8(domain.as_bytes())
        .ok()
        .map(str::to_owned)
}

/// Apex under the longest ICANN suffix contained in a private suffix
fn icann_registered_domain(host: &str, private_suffix: &[u8]) -> Option<String> {
    let labels: Vec<&str> = host.split('.').collect();
    let suffix_labels = private_suffix.split(|&b| b == b'.').count();

    for n in (1..suffix_labels).rev() {
        let tail = labels.get(labels.len().checked_sub(n)?..)?.join(".");
        let Some(suffix) = psl::suffix(tail.as_bytes()) else {
            continue;
        };
        if suffix.is_known()
            && suffix.typ() == Some(psl::Type::Icann)
            && suffix.as_bytes() == tail.as_bytes()
        {
            let start = labels.len().checked_sub(n + 1)?;
            return Some(labels[start..].join("."));
        }
    }
    None
}
