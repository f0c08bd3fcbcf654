//! CLI command implementations.

pub(crate) mod fold;
pub(crate) mod follow;
pub(crate) mod widths;
