mod custom;
mod standard;

pub use custom::CustomMatchingStrategy;
pub use standard::StandardMatchingStrategy;

use tracing::{debug, trace};

use crate::{
    CollectionMatch, MatchResponse, MatchType, ResponseAggregate, SecurityConstraint,
    WebResourceCollection,
};

/// HTTP methods served by `StandardMatchingStrategy`.
pub const STANDARD_HTTP_METHODS: [&str; 7] =
    ["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "TRACE"];

static STANDARD: StandardMatchingStrategy = StandardMatchingStrategy;
static CUSTOM: CustomMatchingStrategy = CustomMatchingStrategy;

/// Resolves a request against a list of security constraints.
///
/// `perform_match` drives the evaluation; implementors decide how a single
/// web resource collection and a single constraint respond to the request,
/// and which responses count as matches.
pub trait MatchingStrategy {
    fn name(&self) -> &'static str;

    fn create_response_aggregate(&self) -> ResponseAggregate;

    fn match_response(
        &self,
        constraint: &SecurityConstraint,
        path: &str,
        method: &str,
    ) -> MatchResponse;

    fn optionally_set_aggregate_response_default(
        &self,
        _current: &MatchResponse,
        _aggregate: &mut ResponseAggregate,
    ) {
    }

    fn is_match(&self, response: &MatchResponse) -> bool;

    fn initial_collection_match(&self) -> Option<CollectionMatch>;

    fn collection_match_for_web_resource_collection(
        &self,
        collection: &WebResourceCollection,
        path: &str,
        method: &str,
    ) -> Option<CollectionMatch>;

    fn perform_match(
        &self,
        constraints: &[SecurityConstraint],
        path: &str,
        method: &str,
    ) -> MatchResponse {
        debug!(
            path = path,
            method = method,
            strategy = self.name(),
            constraints = constraints.len(),
            "Matching security constraints"
        );

        let mut aggregate = self.create_response_aggregate();
        for (index, constraint) in constraints.iter().enumerate() {
            let current = self.match_response(constraint, path, method);
            trace!(
                constraint = index,
                collection_match = ?current.collection_match(),
                "constraint response"
            );

            self.optionally_set_aggregate_response_default(&current, &mut aggregate);
            if self.is_match(&current) {
                current.aggregate_response(&mut aggregate);
            }
        }

        aggregate.select_match_response()
    }

    /// Best match among the constraint's collections. Scanning stops at the
    /// first collection that matches exactly.
    fn best_collection_match(
        &self,
        constraint: &SecurityConstraint,
        path: &str,
        method: &str,
    ) -> Option<CollectionMatch> {
        let mut best = self.initial_collection_match();
        for collection in constraint.web_resource_collections() {
            let current = self.collection_match_for_web_resource_collection(collection, path, method);
            let found_exact = current
                .as_ref()
                .map_or(false, CollectionMatch::is_exact_match);

            best = select_best_collection_match(best, current);
            if found_exact {
                break;
            }
        }
        best
    }
}

/// Picks the strategy serving `method`.
pub fn matching_strategy(method: &str) -> &'static dyn MatchingStrategy {
    if STANDARD_HTTP_METHODS.contains(&method) {
        &STANDARD
    } else {
        &CUSTOM
    }
}

/// Combines the best collection match so far with the next one.
///
/// Deny by omission > deny > permit > exact > path (longest pattern, earlier
/// on a tie) > extension > no match. A missing match never replaces a
/// present one.
pub fn select_best_collection_match(
    previous: Option<CollectionMatch>,
    current: Option<CollectionMatch>,
) -> Option<CollectionMatch> {
    match (previous, current) {
        (None, current) => current,
        (previous, None) => previous,
        (Some(previous), Some(current)) => {
            if previous.is_path_match() && current.is_path_match() {
                if current.url_pattern().len() > previous.url_pattern().len() {
                    Some(current)
                } else {
                    Some(previous)
                }
            } else if rank(&current) > rank(&previous) {
                Some(current)
            } else {
                Some(previous)
            }
        }
    }
}

fn rank(collection_match: &CollectionMatch) -> u8 {
    match collection_match.match_type() {
        MatchType::DenyByOmission => 6,
        MatchType::Deny => 5,
        MatchType::Permit => 4,
        MatchType::Exact | MatchType::ExactByOmission => 3,
        MatchType::Path => 2,
        MatchType::Extension => 1,
        MatchType::NoMatch => 0,
    }
}
