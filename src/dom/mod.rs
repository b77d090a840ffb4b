// ============================================================================
// DOM MODULE - Helpers para manipulación DOM
// ============================================================================

pub mod element;
pub mod builder;
pub mod events;
pub mod select;

pub use element::*;
pub use builder::*;
pub use events::*;
pub use select::*;
