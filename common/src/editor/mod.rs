//! Editing operations over the component tree: pure mutations, snapshot history,
//! block presets and the session that ties them to a selection.

pub mod blocks;
pub mod history;
pub mod session;
pub mod tree;
