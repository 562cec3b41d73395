//! Literal file and directory nodes.
//!
//! These nodes exist to exercise the [`Noder`](crate::Noder) contract and
//! comparison algorithms without a store or a filesystem. Trees are written
//! in a compact notation:
//!
//! ```text
//! (a<1> b(c<2> d()))
//! ```
//!
//! `name<contents>` is a file, `name(children...)` a directory. The
//! outermost directory is unnamed. Rendering sorts children by name, so
//! a tree renders the same regardless of insertion order.

mod dir;
mod file;
mod parse;

pub use dir::Dir;
pub use file::File;
pub use parse::parse;
