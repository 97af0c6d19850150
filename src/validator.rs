use lazy_static::lazy_static;
use regex::Regex;

use crate::{Error, Result};

lazy_static! {
    // RFC 7230 token: one or more tchar.
    static ref HTTP_METHOD: Regex = Regex::new(r"^[!#$%&'*+\-.^_`|~0-9A-Za-z]+$").unwrap();
}

/// Extension point for checking constraint definition fields before the
/// constraints are built.
pub trait ConstraintValidator {
    fn validate(&self, field: Field, value: &str) -> Result<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    UrlPattern,
    HttpMethod,
    Role,
    Description,
}

/// Accepts well-formed URL patterns, HTTP method tokens and non-empty role
/// names.
#[derive(Debug, Default)]
pub struct DefaultValidator;

impl ConstraintValidator for DefaultValidator {
    fn validate(&self, field: Field, value: &str) -> Result<()> {
        match field {
            Field::UrlPattern => validate_url_pattern(value),
            Field::HttpMethod => {
                if HTTP_METHOD.is_match(value) {
                    Ok(())
                } else {
                    Err(Error::Validation(format!(
                        "'{}' is not a valid HTTP method",
                        value
                    )))
                }
            }
            Field::Role => {
                if value.trim().is_empty() {
                    Err(Error::Validation("role name must not be empty".into()))
                } else {
                    Ok(())
                }
            }
            Field::Description => Ok(()),
        }
    }
}

/// Accepts anything.
#[derive(Debug, Default)]
pub struct NoopValidator;

impl ConstraintValidator for NoopValidator {
    fn validate(&self, _field: Field, _value: &str) -> Result<()> {
        Ok(())
    }
}

fn validate_url_pattern(pattern: &str) -> Result<()> {
    let valid = if pattern.is_empty() || pattern == "/" {
        true
    } else if let Some(extension) = pattern.strip_prefix("*.") {
        !extension.is_empty() && !extension.contains('/')
    } else if pattern.starts_with('/') {
        // '*' is only allowed as the final segment of a path-prefix pattern.
        match pattern.find('*') {
            None => true,
            Some(index) => pattern.ends_with("/*") && index == pattern.len() - 1,
        }
    } else {
        false
    };

    if valid {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "'{}' is not a valid URL pattern",
            pattern
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/admin" ; "exact")]
    #[test_case("/admin/*" ; "path prefix")]
    #[test_case("/*" ; "root prefix")]
    #[test_case("*.jsp" ; "extension")]
    #[test_case("/" ; "default")]
    #[test_case("" ; "context root")]
    fn accepts_url_pattern(pattern: &str) {
        assert!(DefaultValidator.validate(Field::UrlPattern, pattern).is_ok());
    }

    #[test_case("admin" ; "no leading slash")]
    #[test_case("/admin*" ; "star without slash")]
    #[test_case("/a/*/b" ; "star in the middle")]
    #[test_case("*." ; "empty extension")]
    #[test_case("*.a/b" ; "extension with slash")]
    fn rejects_url_pattern(pattern: &str) {
        assert!(DefaultValidator.validate(Field::UrlPattern, pattern).is_err());
    }

    #[test_case("GET" => true)]
    #[test_case("PATCH" => true)]
    #[test_case("M-SEARCH" => true)]
    #[test_case("" => false ; "empty")]
    #[test_case("GET POST" => false ; "whitespace")]
    #[test_case("GET/1" => false ; "separator")]
    fn http_method(method: &str) -> bool {
        DefaultValidator.validate(Field::HttpMethod, method).is_ok()
    }

    #[test]
    fn role_must_not_be_blank() {
        assert!(DefaultValidator.validate(Field::Role, "admin").is_ok());
        assert!(DefaultValidator.validate(Field::Role, "  ").is_err());
    }

    #[test]
    fn noop_accepts_everything() {
        assert!(NoopValidator.validate(Field::HttpMethod, "GET POST").is_ok());
        assert!(NoopValidator.validate(Field::UrlPattern, "admin").is_ok());
    }
}
