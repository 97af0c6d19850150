//! Servlet-style security constraint matching.
//!
//! Given a request path and HTTP method, finds the security constraints that
//! apply and merges them into a single [`MatchResponse`]: the roles allowed
//! in, whether SSL is required and whether access is precluded.
//!
//! ```
//! use allow_servlet::{evaluate, SecurityConstraint, WebResourceCollection};
//!
//! let admin = SecurityConstraint::new(
//!     vec![WebResourceCollection::all_methods(vec!["/admin/*"])],
//!     vec!["admin"],
//!     true,
//!     false,
//! )?;
//!
//! let response = evaluate("/admin/users", "GET", &[admin]);
//! assert!(response.roles().contains("admin"));
//! assert!(response.is_ssl_required());
//! # Ok::<(), allow_servlet::Error>(())
//! ```
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::fn_params_excessive_bools
)]
mod collection;
mod constraint;
mod errors;
mod matcher;
mod policy;
mod response;
mod strategy;
mod validator;

pub use collection::{CollectionMatch, MatchType, WebResourceCollection};
pub use constraint::SecurityConstraint;
pub use errors::{Error, Result};
pub use matcher::{is_exact_match, is_extension_match, is_path_match, longest_url_pattern};
pub use policy::{evaluate, ConstraintsBuilder, SecurityConstraintCollection, Verdict};
pub use response::{MatchResponse, ResponseAggregate};
pub use strategy::{
    matching_strategy, select_best_collection_match, CustomMatchingStrategy, MatchingStrategy,
    StandardMatchingStrategy, STANDARD_HTTP_METHODS,
};
pub use validator::{ConstraintValidator, DefaultValidator, Field, NoopValidator};
