use std::collections::BTreeSet;

use crate::{Error, Result, WebResourceCollection};

/// One security constraint: the resources it protects and what access to
/// them requires.
///
/// A precluded constraint denies access outright and never carries roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConstraint {
    web_resource_collections: Vec<WebResourceCollection>,
    roles: BTreeSet<String>,
    ssl_required: bool,
    access_precluded: bool,
    access_uncovered: bool,
    from_http_constraint: bool,
}

impl SecurityConstraint {
    pub fn new<R>(
        web_resource_collections: Vec<WebResourceCollection>,
        roles: R,
        ssl_required: bool,
        access_precluded: bool,
    ) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: Into<String>,
    {
        if web_resource_collections.is_empty() {
            return Err(Error::InvalidConstraint(
                "at least one web resource collection is required".into(),
            ));
        }

        let roles: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        if access_precluded && !roles.is_empty() {
            return Err(Error::InvalidConstraint(format!(
                "access is precluded but roles {:?} are specified",
                roles
            )));
        }

        Ok(Self {
            web_resource_collections,
            roles,
            ssl_required,
            access_precluded,
            access_uncovered: false,
            from_http_constraint: false,
        })
    }

    /// Marks the constraint as permitting methods it does not cover.
    pub fn with_access_uncovered(mut self, access_uncovered: bool) -> Self {
        self.access_uncovered = access_uncovered;
        self
    }

    /// Marks the constraint as generated from an HTTP constraint annotation
    /// rather than a deployment descriptor.
    pub fn with_from_http_constraint(mut self, from_http_constraint: bool) -> Self {
        self.from_http_constraint = from_http_constraint;
        self
    }

    pub fn web_resource_collections(&self) -> &[WebResourceCollection] {
        &self.web_resource_collections
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

    pub fn is_access_uncovered(&self) -> bool {
        self.access_uncovered
    }

    pub fn is_from_http_constraint(&self) -> bool {
        self.from_http_constraint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const NONE: [&str; 0] = [];

    #[test]
    fn precluded_constraint_with_roles_is_rejected() {
        let collections = vec![WebResourceCollection::all_methods(vec!["/secret"])];
        let result = SecurityConstraint::new(collections, vec!["admin"], false, true);
        assert_matches!(result, Err(Error::InvalidConstraint(_)));
    }

    #[test]
    fn constraint_without_collections_is_rejected() {
        let result = SecurityConstraint::new(Vec::new(), vec!["admin"], false, false);
        assert_matches!(result, Err(Error::InvalidConstraint(_)));
    }

    #[test]
    fn roles_are_deduplicated() {
        let collections = vec![WebResourceCollection::all_methods(vec!["/a"])];
        let constraint =
            SecurityConstraint::new(collections, vec!["user", "admin", "user"], true, false)
                .unwrap();

        let roles: Vec<&str> = constraint.roles().iter().map(String::as_str).collect();
        assert_eq!(vec!["admin", "user"], roles);
        assert!(constraint.is_ssl_required());
    }

    #[test]
    fn uncovered_flags_default_to_false() {
        let collections = vec![WebResourceCollection::all_methods(vec!["/a"])];
        let constraint = SecurityConstraint::new(collections, NONE, false, true).unwrap();
        assert!(!constraint.is_access_uncovered());
        assert!(!constraint.is_from_http_constraint());

        let constraint = constraint
            .with_access_uncovered(true)
            .with_from_http_constraint(true);
        assert!(constraint.is_access_uncovered());
        assert!(constraint.is_from_http_constraint());
    }
}
