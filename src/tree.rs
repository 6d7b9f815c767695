//! Dependency trees
//!
//! Converts one sentence's flat, index-linked word list into a rooted tree of
//! [`Form`] nodes. Each parent owns its children outright; the edge label
//! (dependency relation) lives on the child.
//!
//! - `builder`: single-pass construction and dependency extraction
//! - `form`: nodes and edges
//! - `format`: indented and treeviz renderings

pub mod builder;
pub mod form;
pub mod format;

pub use builder::{DependencyTree, TreeError};
pub use form::{Dependency, Form};
pub use format::to_treeviz_str;
