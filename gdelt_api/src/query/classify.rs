//! Free-text query classification.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Two 3-letter codes around `->` or a unicode arrow, not embedded in a
/// longer uppercase run.
static DIRECTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Z])([A-Z]{3})\s*(?:->|→|⟶|➔|➝|⇒)\s*([A-Z]{3})(?:[^A-Z]|$)")
        .expect("directional marker pattern is valid")
});

/// The shape of a query, decided before any mode is chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tokens", rename_all = "snake_case")]
pub enum QueryKind {
    /// Free-text topic. Holds every whitespace-separated token.
    Topic(Vec<String>),
    /// A single 3-letter country/actor code.
    Country(String),
    /// Two codes with no direction.
    Bilateral(String, String),
    /// `A->B`: actor A acting upon actor B.
    BilateralDirectional(String, String),
}

impl QueryKind {
    /// The pair of codes for bilateral kinds.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match self {
            QueryKind::Bilateral(a, b) | QueryKind::BilateralDirectional(a, b) => {
                Some((a.as_str(), b.as_str()))
            }
            _ => None,
        }
    }

    /// The tokens carried by this kind, in order.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            QueryKind::Topic(tokens) => tokens.clone(),
            QueryKind::Country(code) => vec![code.clone()],
            QueryKind::Bilateral(a, b) | QueryKind::BilateralDirectional(a, b) => {
                vec![a.clone(), b.clone()]
            }
        }
    }
}

/// Classifies raw query text.
///
/// A directional marker is checked first, so `USA->CHN` is never taken for a
/// plain pair. More than two code tokens is ambiguous and stays a topic.
pub fn classify(input: &str) -> QueryKind {
    let q = input.trim();
    if q.is_empty() {
        return QueryKind::Topic(Vec::new());
    }

    if let Some(caps) = DIRECTIONAL.captures(q) {
        return QueryKind::BilateralDirectional(caps[1].to_string(), caps[2].to_string());
    }

    let codes: Vec<&str> = q.split_whitespace().filter(|t| is_code(t)).collect();
    match codes.as_slice() {
        [a, b] => QueryKind::Bilateral(a.to_string(), b.to_string()),
        [code] => QueryKind::Country(code.to_string()),
        _ => QueryKind::Topic(q.split_whitespace().map(str::to_string).collect()),
    }
}

fn is_code(token: &str) -> bool {
    token.len() == 3 && token.bytes().all(|b| b.is_ascii_uppercase())
}
