//! Assembly of the outbound parameter list from a resolved mode.

use crate::Error;

use super::common::{DateWindow, Query};
use super::mode::{Action, ApiVersion, ModeResolution};
use super::search::SearchQuery;

/// Action-specific parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeFields {
    /// `None` keywords is a pure date-range fetch.
    Context { keywords: Option<String> },
    Search,
    Bilateral { country1: String, country2: String },
    ConflictCoverage { actor1: String, actor2: String },
}

/// A transport-agnostic GDELT request: version plus a flat parameter list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GdeltRequest {
    pub action: Action,
    pub api_version: ApiVersion,
    pub window: DateWindow,
    pub fields: ModeFields,
}

impl GdeltRequest {
    /// Builds the request for `resolution` over the query's date range.
    ///
    /// Fails only when a bilateral action was resolved without two codes,
    /// which [`ModeResolution::resolve`] never produces.
    pub fn build(resolution: &ModeResolution, query: &SearchQuery) -> Result<Self, Error> {
        let window = DateWindow::new(&query.from, &query.to, query.granularity);
        let fields = match resolution.action {
            Action::Context => {
                let text = query.text.trim();
                ModeFields::Context {
                    keywords: (!text.is_empty()).then(|| text.to_string()),
                }
            }
            Action::Search => ModeFields::Search,
            Action::Bilateral => {
                let (a, b) = code_pair(resolution)?;
                ModeFields::Bilateral {
                    country1: a,
                    country2: b,
                }
            }
            Action::BilateralConflictCoverage => {
                let (a, b) = code_pair(resolution)?;
                ModeFields::ConflictCoverage {
                    actor1: a,
                    actor2: b,
                }
            }
        };
        Ok(Self {
            action: resolution.action,
            api_version: resolution.api_version,
            window,
            fields,
        })
    }
}

fn code_pair(resolution: &ModeResolution) -> Result<(String, String), Error> {
    match resolution.tokens.as_slice() {
        [a, b] => Ok((a.clone(), b.clone())),
        other => Err(Error::InvalidQuery(format!(
            "{} needs two actor codes, got {}",
            resolution.action,
            other.len()
        ))),
    }
}

impl Query for GdeltRequest {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("action", self.action.to_string())];
        params.extend(self.window.params());
        match &self.fields {
            ModeFields::Context { keywords } => {
                if let Some(keywords) = keywords {
                    params.push(("keywords", keywords.clone()));
                    params.push(("include_insights", "true".to_string()));
                }
            }
            ModeFields::Search => {}
            ModeFields::Bilateral { country1, country2 } => {
                params.push(("country1", country1.clone()));
                params.push(("country2", country2.clone()));
            }
            ModeFields::ConflictCoverage { actor1, actor2 } => {
                params.push(("actor1_code", actor1.clone()));
                params.push(("actor2_code", actor2.clone()));
                params.push(("include_total", "true".to_string()));
            }
        }
        params
    }
}
