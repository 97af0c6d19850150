use crate::{
    strategy::MatchingStrategy, CollectionMatch, MatchResponse, MatchType, ResponseAggregate,
    SecurityConstraint, WebResourceCollection,
};

/// Matching for the seven standard HTTP methods.
///
/// Honors `deny_uncovered_http_methods`: a method a collection does not
/// cover is denied on that collection's URLs instead of being ignored.
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardMatchingStrategy;

impl MatchingStrategy for StandardMatchingStrategy {
    fn name(&self) -> &'static str {
        "standard"
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
        let best = self
            .best_collection_match(constraint, path, method)
            .unwrap_or(CollectionMatch::NO_MATCH);

        if best.is_no_match() {
            MatchResponse::no_match()
        } else if best.is_exact_match()
            && constraint.is_access_uncovered()
            && constraint.is_from_http_constraint()
        {
            MatchResponse::permit()
        } else {
            MatchResponse::for_constraint(constraint, best)
        }
    }

    fn is_match(&self, response: &MatchResponse) -> bool {
        !response.is_no_match()
    }

    fn initial_collection_match(&self) -> Option<CollectionMatch> {
        Some(CollectionMatch::NO_MATCH)
    }

    fn collection_match_for_web_resource_collection(
        &self,
        collection: &WebResourceCollection,
        path: &str,
        method: &str,
    ) -> Option<CollectionMatch> {
        if collection.is_method_matched(method) {
            return Some(
                collection
                    .perform_url_match(path)
                    .unwrap_or(CollectionMatch::NO_MATCH),
            );
        }

        if !collection.denied_due_to_deny_uncovered_http_methods(method) {
            return None;
        }

        let url_match = collection
            .perform_url_match(path)
            .unwrap_or(CollectionMatch::NO_MATCH);
        if url_match.is_no_match() || url_match.is_deny_match() {
            Some(url_match)
        } else if collection.is_specified_omission_method(method) {
            Some(url_match.retag(MatchType::DenyByOmission))
        } else {
            Some(url_match.retag(MatchType::Deny))
        }
    }
}
