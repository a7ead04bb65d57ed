//! Script composition for livegraph.
//!
//! Follows a [`livegraph_core::GraphStore`] through its change events and
//! concatenates node payloads into a single script in dependency order.

pub mod composer;
pub mod config;
pub mod error;
pub mod fragment;

pub use composer::{Script, ScriptComposer};
pub use config::ComposerConfig;
pub use error::ComposeError;
pub use fragment::{DirtyState, Fragment, FragmentTable};
