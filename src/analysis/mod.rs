//! Analysis passes over the type metadata model.
//!
//! # Key Components
//!
//! - [`footprint`] - Heuristic native allocation cost estimation per class
//! - [`scope`] - Scope building and partition rebuild for multi-dex layouts

pub mod footprint;
pub mod scope;
