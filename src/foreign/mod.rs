//! Foreign condition representation
//!
//! The host CMS stores visibility rules in its native meta-query style
//! arrays. This module models those arrays and parses them from JSON; the
//! translators in `fulfillable` convert them to and from condition trees.

pub mod cache;
mod node;

pub use cache::{get_or_parse, get_or_parse_shared};
pub use node::*;
