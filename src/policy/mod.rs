mod builder;
pub use builder::ConstraintsBuilder;

use std::collections::BTreeSet;

use crate::{strategy::matching_strategy, MatchResponse, SecurityConstraint};

/// Resolves the authorization requirements for `path` and `method` against an
/// ordered list of security constraints.
///
/// The standard HTTP methods and custom methods are matched by different
/// strategies. Evaluation is infallible: no applicable constraint yields
/// `MatchResponse::no_match()`.
pub fn evaluate(path: &str, method: &str, constraints: &[SecurityConstraint]) -> MatchResponse {
    matching_strategy(method).perform_match(constraints, path, method)
}

/// The security constraints of one web application, in declaration order.
///
/// Read-only once built and safe to share between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityConstraintCollection {
    constraints: Vec<SecurityConstraint>,
}

impl SecurityConstraintCollection {
    pub fn new(constraints: Vec<SecurityConstraint>) -> Self {
        Self { constraints }
    }

    /// Evaluates a request. See [`evaluate`].
    pub fn match_response(&self, path: &str, method: &str) -> MatchResponse {
        evaluate(path, method, &self.constraints)
    }

    pub fn constraints(&self) -> &[SecurityConstraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }
}

impl From<Vec<SecurityConstraint>> for SecurityConstraintCollection {
    fn from(constraints: Vec<SecurityConstraint>) -> Self {
        Self::new(constraints)
    }
}

/// What an authorization filter should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No roles are required.
    Unprotected { ssl_required: bool },
    /// The caller must authenticate and hold one of `roles`.
    Challenge {
        roles: BTreeSet<String>,
        ssl_required: bool,
    },
    /// Access is refused regardless of identity.
    Denied(String),
    /// A custom HTTP method is not allowed for the requested URL.
    MethodNotAllowed,
}

impl Verdict {
    pub fn is_denied(&self) -> bool {
        matches!(self, Verdict::Denied(_) | Verdict::MethodNotAllowed)
    }
}

impl From<&MatchResponse> for Verdict {
    fn from(response: &MatchResponse) -> Self {
        if response.is_custom_no_match() {
            Verdict::MethodNotAllowed
        } else if response.is_deny() {
            Verdict::Denied("HTTP method is uncovered and uncovered methods are denied".into())
        } else if response.is_access_precluded() {
            Verdict::Denied(
                "access is precluded because a security constraint grants no roles".into(),
            )
        } else if response.roles().is_empty() {
            Verdict::Unprotected {
                ssl_required: response.is_ssl_required(),
            }
        } else {
            Verdict::Challenge {
                roles: response.roles().clone(),
                ssl_required: response.is_ssl_required(),
            }
        }
    }
}

impl MatchResponse {
    /// Classifies this response for an authorization filter.
    pub fn verdict(&self) -> Verdict {
        Verdict::from(self)
    }
}
