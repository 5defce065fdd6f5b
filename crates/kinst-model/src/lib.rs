//! Plain data shared by every installer crate.
//!
//! Nothing here performs IO; the types describe units of work, their observed outcome,
//! the component selection and the persisted configuration document.
mod domain;
pub use domain::*;
