use crate::{
    strategy::MatchingStrategy, CollectionMatch, MatchResponse, ResponseAggregate,
    SecurityConstraint, WebResourceCollection,
};

/// Matching for HTTP methods outside the standard seven.
///
/// A custom method hitting a URL whose collection enumerates methods without
/// naming it is not silently allowed: the evaluation falls back to
/// `MatchResponse::custom_no_match()`.
#[derive(Debug, Default, Copy, Clone)]
pub struct CustomMatchingStrategy;

impl MatchingStrategy for CustomMatchingStrategy {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn create_response_aggregate(&self) -> ResponseAggregate {
        ResponseAggregate::new(MatchResponse::no_match())
    }

    fn match_response(
        &self,
        constraint: &SecurityConstraint,
        path: &str,
        method: &str,
    ) -> MatchResponse {
        match self.best_collection_match(constraint, path, method) {
            Some(best) if best.is_no_match() => MatchResponse::no_match(),
            Some(best) => MatchResponse::for_constraint(constraint, best),
            None if constraint.roles().is_empty() && !constraint.is_access_precluded() => {
                MatchResponse::no_match()
            }
            None => MatchResponse::custom_no_match(),
        }
    }

    fn optionally_set_aggregate_response_default(
        &self,
        current: &MatchResponse,
        aggregate: &mut ResponseAggregate,
    ) {
        if current.is_custom_no_match() {
            aggregate.set_default_response(current.clone());
        }
    }

    fn is_match(&self, response: &MatchResponse) -> bool {
        !(response.is_custom_no_match() || response.is_no_match())
    }

    fn initial_collection_match(&self) -> Option<CollectionMatch> {
        None
    }

    fn collection_match_for_web_resource_collection(
        &self,
        collection: &WebResourceCollection,
        path: &str,
        method: &str,
    ) -> Option<CollectionMatch> {
        match collection.perform_url_match(path) {
            None => Some(CollectionMatch::NO_MATCH),
            Some(url_match) if collection.is_method_matched(method) => Some(url_match),
            Some(_) if collection.is_method_listed(method) => Some(CollectionMatch::NO_MATCH),
            Some(_) => None,
        }
    }
}
