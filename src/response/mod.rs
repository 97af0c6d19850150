mod aggregate;
pub use aggregate::ResponseAggregate;

use std::collections::BTreeSet;

use crate::{CollectionMatch, Error, MatchType, Result, SecurityConstraint};

/// Which well-known outcome, if any, a response stands for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Outcome {
    Constraint,
    NoMatch,
    CustomNoMatch,
    Deny,
}

/// Authorization requirements resolved for a request: the roles allowed in,
/// whether the transport must be confidential, and whether access is
/// precluded altogether.
///
/// Responses produced from a single constraint carry the `CollectionMatch`
/// that selected them. Merged responses do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResponse {
    roles: BTreeSet<String>,
    ssl_required: bool,
    access_precluded: bool,
    collection_match: Option<CollectionMatch>,
    outcome: Outcome,
}

impl MatchResponse {
    pub fn new<R>(roles: R, ssl_required: bool, access_precluded: bool) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let roles: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        if access_precluded && !roles.is_empty() {
            return Err(Error::InvalidConstraint(format!(
                "access is precluded but roles {:?} are specified",
                roles
            )));
        }

        Ok(Self {
            roles,
            ssl_required,
            access_precluded,
            collection_match: None,
            outcome: Outcome::Constraint,
        })
    }

    /// No constraint applies to the request.
    pub fn no_match() -> Self {
        Self::well_known(Outcome::NoMatch, false, None)
    }

    /// A custom HTTP method hit a resource whose constraint lists methods
    /// explicitly but not this one.
    pub fn custom_no_match() -> Self {
        Self::well_known(Outcome::CustomNoMatch, true, None)
    }

    /// The HTTP method is uncovered and the application denies uncovered methods.
    pub fn deny() -> Self {
        Self::well_known(Outcome::Deny, true, Some(CollectionMatch::DENY_MATCH))
    }

    fn well_known(
        outcome: Outcome,
        access_precluded: bool,
        collection_match: Option<CollectionMatch>,
    ) -> Self {
        Self {
            roles: BTreeSet::new(),
            ssl_required: false,
            access_precluded,
            collection_match,
            outcome,
        }
    }

    /// Requirements of `constraint`, tagged with the collection match that
    /// selected it.
    pub(crate) fn for_constraint(
        constraint: &SecurityConstraint,
        collection_match: CollectionMatch,
    ) -> Self {
        Self {
            roles: constraint.roles().clone(),
            ssl_required: constraint.is_ssl_required(),
            access_precluded: constraint.is_access_precluded(),
            collection_match: Some(collection_match),
            outcome: Outcome::Constraint,
        }
    }

    /// Unconditional permit, skipping role and SSL requirements.
    pub(crate) fn permit() -> Self {
        Self {
            roles: BTreeSet::new(),
            ssl_required: false,
            access_precluded: false,
            collection_match: Some(CollectionMatch::PERMIT),
            outcome: Outcome::Constraint,
        }
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn is_ssl_required(&self) -> bool {
        self.ssl_required
    }

    pub fn is_access_precluded(&self) -> bool {
        self.access_precluded
    }

    pub fn collection_match(&self) -> Option<&CollectionMatch> {
        self.collection_match.as_ref()
    }

    pub fn is_no_match(&self) -> bool {
        self.outcome == Outcome::NoMatch
    }

    pub fn is_custom_no_match(&self) -> bool {
        self.outcome == Outcome::CustomNoMatch
    }

    pub fn is_deny(&self) -> bool {
        self.outcome == Outcome::Deny
    }

    /// Folds this response into the aggregate slot matching its collection
    /// match type.
    pub fn aggregate_response(self, aggregate: &mut ResponseAggregate) {
        let (match_type, url_pattern) = match &self.collection_match {
            Some(collection_match) => (
                collection_match.match_type(),
                collection_match.url_pattern().to_owned(),
            ),
            None => return,
        };

        match match_type {
            MatchType::Exact | MatchType::ExactByOmission => {
                let merged = self.merge(aggregate.exact_match_response.as_ref());
                aggregate.exact_match_response = Some(merged);
            }
            MatchType::Path => {
                let longest_len = aggregate.longest_path_url_pattern.len();
                if url_pattern.len() > longest_len {
                    aggregate.longest_path_url_pattern = url_pattern;
                    aggregate.path_match_response = Some(self);
                } else if url_pattern.len() == longest_len {
                    let merged = self.merge(aggregate.path_match_response.as_ref());
                    aggregate.path_match_response = Some(merged);
                }
            }
            MatchType::Extension => {
                let merged = self.merge(aggregate.extension_match_response.as_ref());
                aggregate.extension_match_response = Some(merged);
            }
            MatchType::Deny => {
                let merged = self.merge(aggregate.deny_match_response.as_ref());
                aggregate.deny_match_response = Some(merged);
            }
            MatchType::DenyByOmission => {
                let merged = self.merge(aggregate.deny_match_by_omission_response.as_ref());
                aggregate.deny_match_by_omission_response = Some(merged);
            }
            MatchType::Permit => {
                let merged = self.merge(aggregate.permit_response.as_ref());
                aggregate.permit_response = Some(merged);
            }
            MatchType::NoMatch => {}
        }
    }

    /// Combines two responses for the same precedence tier.
    ///
    /// For exact matches SSL is required only when both sides require it;
    /// for every other tier either side suffices. Preclusion wins over roles,
    /// and an empty role set on either side means no role restriction.
    pub fn merge(&self, other: Option<&MatchResponse>) -> MatchResponse {
        let other = match other {
            Some(other) if other != self => other,
            _ => return self.clone(),
        };

        let exact_tier = self.collection_match.as_ref().map_or(false, |m| {
            matches!(m.match_type(), MatchType::Exact | MatchType::ExactByOmission)
        });
        let ssl_required = if exact_tier {
            self.ssl_required && other.ssl_required
        } else {
            self.ssl_required || other.ssl_required
        };

        let access_precluded = self.access_precluded || other.access_precluded;
        let roles = if access_precluded || self.roles.is_empty() || other.roles.is_empty() {
            BTreeSet::new()
        } else {
            self.roles.union(&other.roles).cloned().collect()
        };

        MatchResponse {
            roles,
            ssl_required,
            access_precluded,
            collection_match: None,
            outcome: Outcome::Constraint,
        }
    }
}
