//! Node abstraction for mtrie.
//!
//! A structural comparison walks two trees of [`Noder`]s in lockstep. Any
//! tree-like source (a versioned tree in an object store, a live directory,
//! an in-memory literal) takes part by implementing the trait.
//!
//! # Key Types
//!
//! - [`Noder`] / [`NoderRef`] -- the node contract and its shared handle
//! - [`Change`] / [`Action`] -- one added/removed/modified record
//! - [`fsnoder`] -- literal file and directory nodes for tests

pub mod change;
pub mod error;
pub mod fsnoder;
pub mod noder;

pub use change::{Action, Change, Changes};
pub use error::{NoderError, NoderResult};
pub use noder::{sort_by_name, Noder, NoderRef, NO_CHILDREN};
