//! Entity × time × variable panel and its builder.

/// Alignment checks and panel construction.
pub mod builder;
pub mod store;
/// Loader output types.
pub mod types;

pub use builder::build_panel;
pub use store::{EntityView, Panel, VariableView};
pub use types::{Entity, SourceTable};
