use std::collections::BTreeSet;

use crate::matcher::{is_exact_match, is_extension_match, is_path_match, longest_url_pattern};
use crate::{Error, Result};

/// Kind of match a web resource collection produced for a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MatchType {
    Exact,
    Path,
    Extension,
    NoMatch,
    Deny,
    DenyByOmission,
    ExactByOmission,
    Permit,
}

/// Outcome of matching one web resource collection against a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionMatch {
    url_pattern: String,
    match_type: MatchType,
}

impl CollectionMatch {
    pub const NO_MATCH: CollectionMatch = CollectionMatch::well_known(MatchType::NoMatch);
    pub const DENY_MATCH: CollectionMatch = CollectionMatch::well_known(MatchType::Deny);
    pub const DENY_MATCH_BY_OMISSION: CollectionMatch =
        CollectionMatch::well_known(MatchType::DenyByOmission);
    pub const EXACT_MATCH_BY_OMISSION: CollectionMatch =
        CollectionMatch::well_known(MatchType::ExactByOmission);
    pub const PERMIT: CollectionMatch = CollectionMatch::well_known(MatchType::Permit);

    const fn well_known(match_type: MatchType) -> Self {
        Self {
            url_pattern: String::new(),
            match_type,
        }
    }

    pub fn new(url_pattern: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            url_pattern: url_pattern.into(),
            match_type,
        }
    }

    pub fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn is_exact_match(&self) -> bool {
        self.match_type == MatchType::Exact
    }

    pub fn is_path_match(&self) -> bool {
        self.match_type == MatchType::Path
    }

    pub fn is_extension_match(&self) -> bool {
        self.match_type == MatchType::Extension
    }

    pub fn is_no_match(&self) -> bool {
        self.match_type == MatchType::NoMatch
    }

    pub fn is_deny_match(&self) -> bool {
        self.match_type == MatchType::Deny
    }

    pub fn is_deny_match_by_omission(&self) -> bool {
        self.match_type == MatchType::DenyByOmission
    }

    pub fn is_permit_match(&self) -> bool {
        self.match_type == MatchType::Permit
    }

    /// Same URL pattern, different match type. Used to downgrade a URL match
    /// into a denial for an uncovered HTTP method.
    pub(crate) fn retag(&self, match_type: MatchType) -> Self {
        Self {
            url_pattern: self.url_pattern.clone(),
            match_type,
        }
    }
}

/// A set of URL patterns plus the HTTP methods they cover.
///
/// At most one of `methods` and `omission_methods` is non-empty. With both
/// empty the collection covers every method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResourceCollection {
    url_patterns: Vec<String>,
    methods: BTreeSet<String>,
    omission_methods: BTreeSet<String>,
    deny_uncovered_http_methods: bool,
}

impl WebResourceCollection {
    pub fn new<P, M, O>(
        url_patterns: P,
        methods: M,
        omission_methods: O,
        deny_uncovered_http_methods: bool,
    ) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        let patterns = ordered_patterns(url_patterns);
        let methods: BTreeSet<String> = methods.into_iter().map(Into::into).collect();
        let omission_methods: BTreeSet<String> =
            omission_methods.into_iter().map(Into::into).collect();

        if !methods.is_empty() && !omission_methods.is_empty() {
            return Err(Error::InvalidConstraint(
                "http-method and http-method-omission cannot both be specified".into(),
            ));
        }

        Ok(Self {
            url_patterns: patterns,
            methods,
            omission_methods,
            deny_uncovered_http_methods,
        })
    }

    /// Collection covering every HTTP method on the given patterns.
    pub fn all_methods<P>(url_patterns: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            url_patterns: ordered_patterns(url_patterns),
            methods: BTreeSet::new(),
            omission_methods: BTreeSet::new(),
            deny_uncovered_http_methods: false,
        }
    }

    pub fn url_patterns(&self) -> &[String] {
        &self.url_patterns
    }

    pub fn methods(&self) -> &BTreeSet<String> {
        &self.methods
    }

    pub fn omission_methods(&self) -> &BTreeSet<String> {
        &self.omission_methods
    }

    pub fn deny_uncovered_http_methods(&self) -> bool {
        self.deny_uncovered_http_methods
    }

    pub fn match_all_methods(&self) -> bool {
        self.methods.is_empty() && self.omission_methods.is_empty()
    }

    /// Finds the best URL match among this collection's patterns.
    ///
    /// Exact beats path beats extension; among path patterns the longest one
    /// wins. Returns `None` when no pattern matches.
    pub fn perform_url_match(&self, path: &str) -> Option<CollectionMatch> {
        let mut longest_path: Option<&str> = None;
        let mut extension: Option<&str> = None;

        for pattern in &self.url_patterns {
            if is_exact_match(path, pattern) {
                return Some(CollectionMatch::new(pattern.as_str(), MatchType::Exact));
            } else if is_path_match(path, pattern) {
                longest_path = Some(match longest_path {
                    Some(current) => longest_url_pattern(current, pattern),
                    None => pattern.as_str(),
                });
            } else if extension.is_none() && is_extension_match(path, pattern) {
                extension = Some(pattern.as_str());
            }
        }

        longest_path
            .map(|pattern| CollectionMatch::new(pattern, MatchType::Path))
            .or_else(|| extension.map(|pattern| CollectionMatch::new(pattern, MatchType::Extension)))
    }

    pub fn is_method_matched(&self, method: &str) -> bool {
        self.match_all_methods()
            || self.methods.contains(method)
            || (!self.omission_methods.is_empty() && !self.omission_methods.contains(method))
    }

    /// `true` if the method is named in either method list.
    pub fn is_method_listed(&self, method: &str) -> bool {
        self.methods.contains(method) || self.omission_methods.contains(method)
    }

    pub fn denied_due_to_deny_uncovered_http_methods(&self, method: &str) -> bool {
        self.deny_uncovered_http_methods && !self.is_method_matched(method)
    }

    pub fn is_specified_omission_method(&self, method: &str) -> bool {
        self.omission_methods.contains(method)
    }
}

// Keeps declaration order, drops repeated patterns.
fn ordered_patterns<P>(url_patterns: P) -> Vec<String>
where
    P: IntoIterator,
    P::Item: Into<String>,
{
    let mut patterns: Vec<String> = Vec::new();
    for pattern in url_patterns.into_iter().map(Into::into) {
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }
    patterns
}
