//! Mapping of a classified query (plus an optional caller hint) onto an
//! upstream action and API version.

use std::str::FromStr;

use serde::Serialize;

use super::classify::QueryKind;

/// Upstream action, sent as the `action` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Context,
    Search,
    Bilateral,
    BilateralConflictCoverage,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Action::Context => "context",
                Action::Search => "search",
                Action::Bilateral => "bilateral",
                Action::BilateralConflictCoverage => "bilateral_conflict_coverage",
            }
        )?;
        Ok(())
    }
}

/// Upstream API version. V2 endpoints live under a `/v2` path suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ApiVersion {
    V1 = 1,
    V2 = 2,
}

impl ApiVersion {
    pub fn path_suffix(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "",
            ApiVersion::V2 => "/v2",
        }
    }
}

impl Action {
    /// The canonical API version for this action.
    pub fn api_version(&self) -> ApiVersion {
        match self {
            Action::Context | Action::BilateralConflictCoverage => ApiVersion::V2,
            Action::Search | Action::Bilateral => ApiVersion::V1,
        }
    }
}

/// Mode explicitly requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeHint {
    /// The default mode; carries no preference over inference.
    Context,
    Search,
    Bilateral,
    /// Bilateral conflict coverage.
    Bbva,
}

impl FromStr for ModeHint {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "context" => Ok(ModeHint::Context),
            "search" => Ok(ModeHint::Search),
            "bilateral" => Ok(ModeHint::Bilateral),
            "bbva" | "bilateral_conflict_coverage" => Ok(ModeHint::Bbva),
            _ => Err(()),
        }
    }
}

/// The concrete upstream call a query resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModeResolution {
    pub action: Action,
    pub api_version: ApiVersion,
    /// Codes for country/bilateral queries, words for topics.
    pub tokens: Vec<String>,
}

impl ModeResolution {
    /// Resolves `kind` to an action.
    ///
    /// A `Search` hint always wins. `Bilateral` and `Bbva` hints are honored
    /// only when the query carries two codes; otherwise inference decides.
    pub fn resolve(kind: &QueryKind, hint: Option<ModeHint>) -> Self {
        let inferred = match kind {
            QueryKind::BilateralDirectional(..) => Action::BilateralConflictCoverage,
            QueryKind::Bilateral(..) => Action::Bilateral,
            QueryKind::Country(_) | QueryKind::Topic(_) => Action::Context,
        };
        let honored = match (hint, kind.pair()) {
            (Some(ModeHint::Search), _) => Some(Action::Search),
            (Some(ModeHint::Bilateral), Some(_)) => Some(Action::Bilateral),
            (Some(ModeHint::Bbva), Some(_)) => Some(Action::BilateralConflictCoverage),
            (Some(h @ (ModeHint::Bilateral | ModeHint::Bbva)), None) => {
                tracing::debug!("Mode hint {:?} needs two codes, using {}", h, inferred);
                None
            }
            _ => None,
        };
        let action = honored.unwrap_or(inferred);
        Self {
            action,
            api_version: action.api_version(),
            tokens: kind.tokens(),
        }
    }
}
