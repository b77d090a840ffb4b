// ============================================================================
// STATE MODULE - State Management con Rc<RefCell>
// ============================================================================

pub mod generation;
pub mod selection_state;
pub mod cascade_state;
pub mod save_state;
pub mod grid_session;

pub use generation::*;
pub use selection_state::*;
pub use cascade_state::*;
pub use save_state::*;
pub use grid_session::*;
