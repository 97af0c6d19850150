use tracing::trace;

use crate::MatchResponse;

/// Best-so-far responses per precedence tier for a single request evaluation.
///
/// Created by a matching strategy, fed once per constraint through
/// `MatchResponse::aggregate_response` and consumed by `select_match_response`.
#[derive(Debug)]
pub struct ResponseAggregate {
    pub(crate) default_response: MatchResponse,
    pub(crate) exact_match_response: Option<MatchResponse>,
    pub(crate) path_match_response: Option<MatchResponse>,
    pub(crate) extension_match_response: Option<MatchResponse>,
    pub(crate) deny_match_response: Option<MatchResponse>,
    pub(crate) deny_match_by_omission_response: Option<MatchResponse>,
    pub(crate) permit_response: Option<MatchResponse>,
    pub(crate) longest_path_url_pattern: String,
}

impl ResponseAggregate {
    pub fn new(default_response: MatchResponse) -> Self {
        Self {
            default_response,
            exact_match_response: None,
            path_match_response: None,
            extension_match_response: None,
            deny_match_response: None,
            deny_match_by_omission_response: None,
            permit_response: None,
            longest_path_url_pattern: String::new(),
        }
    }

    pub fn default_response(&self) -> &MatchResponse {
        &self.default_response
    }

    pub fn set_default_response(&mut self, response: MatchResponse) {
        self.default_response = response;
    }

    pub fn longest_path_url_pattern(&self) -> &str {
        &self.longest_path_url_pattern
    }

    /// Picks the final response.
    ///
    /// A permit without any denial rides on the exact match. Otherwise exact,
    /// path and extension matches win in that order, even over denials. A
    /// denial on its own yields `MatchResponse::deny()`. With nothing
    /// recorded the default response is returned.
    pub fn select_match_response(self) -> MatchResponse {
        let denied =
            self.deny_match_response.is_some() || self.deny_match_by_omission_response.is_some();

        if !denied {
            if let Some(permit) = self.permit_response {
                trace!("selected permit response");
                return self.exact_match_response.unwrap_or(permit);
            }
        }

        if let Some(exact) = self.exact_match_response {
            trace!("selected exact match response");
            exact
        } else if let Some(path) = self.path_match_response {
            trace!(url_pattern = %self.longest_path_url_pattern, "selected path match response");
            path
        } else if let Some(extension) = self.extension_match_response {
            trace!("selected extension match response");
            extension
        } else if denied {
            trace!("selected deny response");
            MatchResponse::deny()
        } else {
            trace!("selected default response");
            self.default_response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CollectionMatch, MatchType, SecurityConstraint, WebResourceCollection};

    fn response(roles: &[&str], ssl: bool, m: CollectionMatch) -> MatchResponse {
        let collections = vec![WebResourceCollection::all_methods(vec!["/a"])];
        let constraint =
            SecurityConstraint::new(collections, roles.iter().copied(), ssl, false).unwrap();
        MatchResponse::for_constraint(&constraint, m)
    }

    #[test]
    fn empty_aggregate_returns_default() {
        let aggregate = ResponseAggregate::new(MatchResponse::custom_no_match());
        assert!(aggregate.select_match_response().is_custom_no_match());
    }

    #[test]
    fn exact_wins_over_deny() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        response(&["d"], false, CollectionMatch::new("/a/*", MatchType::Deny))
            .aggregate_response(&mut aggregate);
        response(&["e"], false, CollectionMatch::new("/a", MatchType::Exact))
            .aggregate_response(&mut aggregate);

        let selected = aggregate.select_match_response();
        assert!(selected.roles().contains("e"));
        assert!(!selected.is_deny());
    }

    #[test]
    fn path_wins_over_extension_and_deny_by_omission() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        response(&["x"], false, CollectionMatch::new("*.jsp", MatchType::Extension))
            .aggregate_response(&mut aggregate);
        response(&["o"], false, CollectionMatch::new("/a/*", MatchType::DenyByOmission))
            .aggregate_response(&mut aggregate);
        response(&["p"], true, CollectionMatch::new("/a/*", MatchType::Path))
            .aggregate_response(&mut aggregate);

        let selected = aggregate.select_match_response();
        assert!(selected.roles().contains("p"));
        assert!(selected.is_ssl_required());
    }

    #[test]
    fn deny_alone_selects_canonical_deny() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        response(&["d"], true, CollectionMatch::new("/a", MatchType::Deny))
            .aggregate_response(&mut aggregate);

        let selected = aggregate.select_match_response();
        assert_eq!(MatchResponse::deny(), selected);
        assert!(selected.roles().is_empty());
    }

    #[test]
    fn deny_by_omission_alone_selects_canonical_deny() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        response(&["d"], false, CollectionMatch::new("/a", MatchType::DenyByOmission))
            .aggregate_response(&mut aggregate);

        assert!(aggregate.select_match_response().is_deny());
    }

    #[test]
    fn permit_without_deny_overrides_path_match() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        response(&["p"], true, CollectionMatch::new("/*", MatchType::Path))
            .aggregate_response(&mut aggregate);
        MatchResponse::permit().aggregate_response(&mut aggregate);

        let selected = aggregate.select_match_response();
        assert!(selected.roles().is_empty());
        assert!(!selected.is_ssl_required());
        assert!(!selected.is_access_precluded());
    }

    #[test]
    fn permit_prefers_recorded_exact_match() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        response(&["e"], true, CollectionMatch::new("/a", MatchType::Exact))
            .aggregate_response(&mut aggregate);
        MatchResponse::permit().aggregate_response(&mut aggregate);

        assert!(aggregate.select_match_response().roles().contains("e"));
    }

    #[test]
    fn permit_with_deny_falls_back_to_tiers() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        MatchResponse::permit().aggregate_response(&mut aggregate);
        response(&["d"], false, CollectionMatch::new("/a", MatchType::Deny))
            .aggregate_response(&mut aggregate);

        assert!(aggregate.select_match_response().is_deny());
    }

    #[test]
    fn longest_path_marker_tracks_replacements() {
        let mut aggregate = ResponseAggregate::new(MatchResponse::no_match());
        response(&["a"], false, CollectionMatch::new("/a/*", MatchType::Path))
            .aggregate_response(&mut aggregate);
        response(&["b"], false, CollectionMatch::new("/a/b/*", MatchType::Path))
            .aggregate_response(&mut aggregate);

        assert_eq!("/a/b/*", aggregate.longest_path_url_pattern());
    }
}
