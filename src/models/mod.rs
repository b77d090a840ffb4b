pub mod time;
pub mod day;
pub mod shift;
pub mod grid;
pub mod sync;
pub mod options;
pub mod offering;

pub use day::Day;
pub use shift::{build_slots, normalize_slots, ShiftDefinition, ShiftError, ShiftKey, Slot};
pub use grid::{CellKey, GridCell, GridModel, GridRow, GridTable, LayoutMode};
pub use sync::{
    MutationResponse, OccupiedResponse, OccupiedSlot, SaveItem, SaveOutcome, SaveRequest, SaveStatus,
    SelectionContext, SlotDetail, ToggleRequest, GridConfigResponse,
};
pub use options::{OptionItem, OptionsResponse};
pub use offering::{Offering, OfferingResponse, OFFERING_YEARS};
