use serde::Deserialize;
use tracing::debug;

use crate::{
    validator::{DefaultValidator, Field},
    ConstraintValidator, Error, Result, SecurityConstraint, SecurityConstraintCollection,
    WebResourceCollection,
};

/// Builds a `SecurityConstraintCollection` from a JSON constraint definition.
///
/// ```json
/// {
///     "denyUncoveredHttpMethods": true,
///     "constraints": [
///         {
///             "roles": ["admin"],
///             "sslRequired": true,
///             "resourceCollections": [
///                 { "urlPatterns": ["/admin/*"], "httpMethods": ["GET", "POST"] }
///             ]
///         }
///     ]
/// }
/// ```
pub struct ConstraintsBuilder<V> {
    validator: V,
    json: String,
    deny_uncovered_http_methods: bool,
}

impl ConstraintsBuilder<DefaultValidator> {
    pub fn from_json(json: &str) -> Self {
        Self {
            validator: DefaultValidator,
            json: json.into(),
            deny_uncovered_http_methods: false,
        }
    }
}

impl<V> ConstraintsBuilder<V>
where
    V: ConstraintValidator,
{
    pub fn with_validator<U>(self, validator: U) -> ConstraintsBuilder<U>
    where
        U: ConstraintValidator,
    {
        ConstraintsBuilder {
            validator,
            json: self.json,
            deny_uncovered_http_methods: self.deny_uncovered_http_methods,
        }
    }

    /// Policy used when the definition does not state `denyUncoveredHttpMethods`.
    pub fn with_deny_uncovered_http_methods(mut self, deny: bool) -> Self {
        self.deny_uncovered_http_methods = deny;
        self
    }

    pub fn build(self) -> Result<SecurityConstraintCollection> {
        let definition: ConstraintsDefinition = serde_json::from_str(&self.json)?;

        let deny_uncovered = definition
            .deny_uncovered_http_methods
            .unwrap_or(self.deny_uncovered_http_methods);

        let mut constraints = Vec::with_capacity(definition.constraints.len());
        for constraint in &definition.constraints {
            constraints.push(self.process_constraint(constraint, deny_uncovered)?);
        }

        debug!(
            constraints = constraints.len(),
            deny_uncovered_http_methods = deny_uncovered,
            "Built security constraints"
        );
        Ok(SecurityConstraintCollection::new(constraints))
    }

    fn process_constraint(
        &self,
        constraint: &ConstraintDefinition,
        deny_uncovered: bool,
    ) -> Result<SecurityConstraint> {
        self.validator
            .validate(Field::Description, &constraint.description)?;
        for role in &constraint.roles {
            self.validator.validate(Field::Role, role)?;
        }

        let mut collections = Vec::with_capacity(constraint.resource_collections.len());
        for collection in &constraint.resource_collections {
            collections.push(self.process_collection(collection, deny_uncovered)?);
        }

        SecurityConstraint::new(
            collections,
            constraint.roles.iter().cloned(),
            constraint.ssl_required,
            constraint.access_precluded,
        )
        .map(|built| {
            built
                .with_access_uncovered(constraint.access_uncovered)
                .with_from_http_constraint(constraint.from_http_constraint)
        })
        .map_err(|e| match e {
            Error::InvalidConstraint(reason) if !constraint.description.is_empty() => {
                Error::InvalidConstraint(format!("{} ({})", reason, constraint.description))
            }
            other => other,
        })
    }

    fn process_collection(
        &self,
        collection: &CollectionDefinition,
        deny_uncovered: bool,
    ) -> Result<WebResourceCollection> {
        for pattern in &collection.url_patterns {
            self.validator.validate(Field::UrlPattern, pattern)?;
        }
        for method in collection
            .http_methods
            .iter()
            .chain(&collection.http_method_omissions)
        {
            self.validator.validate(Field::HttpMethod, method)?;
        }

        WebResourceCollection::new(
            collection.url_patterns.iter().cloned(),
            collection.http_methods.iter().cloned(),
            collection.http_method_omissions.iter().cloned(),
            deny_uncovered,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConstraintsDefinition {
    #[serde(default)]
    deny_uncovered_http_methods: Option<bool>,
    #[serde(default)]
    constraints: Vec<ConstraintDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConstraintDefinition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    ssl_required: bool,
    #[serde(default)]
    access_precluded: bool,
    #[serde(default)]
    access_uncovered: bool,
    #[serde(default)]
    from_http_constraint: bool,
    resource_collections: Vec<CollectionDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionDefinition {
    url_patterns: Vec<String>,
    #[serde(default)]
    http_methods: Vec<String>,
    #[serde(default)]
    http_method_omissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::NoopValidator;
    use assert_matches::assert_matches;

    #[test]
    fn test_basic_definition() {
        let json = r#"{
            "constraints": [
                {
                    "description": "admin pages",
                    "roles": ["admin", "operator"],
                    "sslRequired": true,
                    "resourceCollections": [
                        {
                            "name": "admin",
                            "urlPatterns": ["/admin/*", "*.cfg"],
                            "httpMethods": ["GET", "POST"]
                        }
                    ]
                },
                {
                    "accessPrecluded": true,
                    "resourceCollections": [
                        { "urlPatterns": ["/secret"] }
                    ]
                }
            ]
        }"#;

        let collection = ConstraintsBuilder::from_json(json).build().unwrap();
        assert_eq!(2, collection.len());

        let admin = &collection.constraints()[0];
        assert!(admin.is_ssl_required());
        assert_eq!(2, admin.roles().len());
        let resources = &admin.web_resource_collections()[0];
        assert_eq!(2, resources.url_patterns().len());
        assert!(resources.methods().contains("POST"));
        assert!(!resources.deny_uncovered_http_methods());

        assert!(collection.constraints()[1].is_access_precluded());
    }

    #[test]
    fn document_policy_overrides_builder_default() {
        let json = r#"{
            "denyUncoveredHttpMethods": true,
            "constraints": [
                { "roles": ["r"], "resourceCollections": [ { "urlPatterns": ["/a"], "httpMethods": ["GET"] } ] }
            ]
        }"#;
        let collection = ConstraintsBuilder::from_json(json)
            .with_deny_uncovered_http_methods(false)
            .build()
            .unwrap();
        assert!(collection.constraints()[0].web_resource_collections()[0].deny_uncovered_http_methods());

        let json = r#"{
            "constraints": [
                { "roles": ["r"], "resourceCollections": [ { "urlPatterns": ["/a"], "httpMethods": ["GET"] } ] }
            ]
        }"#;
        let collection = ConstraintsBuilder::from_json(json)
            .with_deny_uncovered_http_methods(true)
            .build()
            .unwrap();
        assert!(collection.constraints()[0].web_resource_collections()[0].deny_uncovered_http_methods());
    }

    #[test]
    fn uncovered_flags_are_carried() {
        let json = r#"{
            "constraints": [
                {
                    "accessUncovered": true,
                    "fromHttpConstraint": true,
                    "resourceCollections": [ { "urlPatterns": ["/open"] } ]
                }
            ]
        }"#;
        let collection = ConstraintsBuilder::from_json(json).build().unwrap();
        let constraint = &collection.constraints()[0];
        assert!(constraint.is_access_uncovered());
        assert!(constraint.is_from_http_constraint());
    }

    #[test]
    fn precluded_with_roles_is_rejected() {
        let json = r#"{
            "constraints": [
                {
                    "description": "broken",
                    "roles": ["admin"],
                    "accessPrecluded": true,
                    "resourceCollections": [ { "urlPatterns": ["/secret"] } ]
                }
            ]
        }"#;
        let result = ConstraintsBuilder::from_json(json).build();
        assert_matches!(result, Err(Error::InvalidConstraint(reason)) if reason.contains("broken"));
    }

    #[test]
    fn methods_with_omissions_are_rejected() {
        let json = r#"{
            "constraints": [
                {
                    "resourceCollections": [
                        { "urlPatterns": ["/a"], "httpMethods": ["GET"], "httpMethodOmissions": ["POST"] }
                    ]
                }
            ]
        }"#;
        let result = ConstraintsBuilder::from_json(json).build();
        assert_matches!(result, Err(Error::InvalidConstraint(_)));
    }

    #[test]
    fn invalid_fields_fail_validation() {
        let json = r#"{
            "constraints": [
                { "resourceCollections": [ { "urlPatterns": ["admin/*"] } ] }
            ]
        }"#;
        assert_matches!(
            ConstraintsBuilder::from_json(json).build(),
            Err(Error::Validation(_))
        );

        // the same definition passes without validation.
        assert!(ConstraintsBuilder::from_json(json)
            .with_validator(NoopValidator)
            .build()
            .is_ok());
    }

    #[test]
    fn malformed_json_is_a_deserializing_error() {
        assert_matches!(
            ConstraintsBuilder::from_json("{ \"constraints\": [ {").build(),
            Err(Error::Deserializing(_))
        );
    }
}
