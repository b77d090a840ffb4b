// ============================================================================
// SELECTORS VIEW - Vuelca el CascadeState en los <select> de la página
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::fill_select;
use crate::state::cascade_state::{CascadeState, Level};

/// Selects de la cascada, en orden carrera, plan, materia, turno
pub struct SelectorElements {
    pub elements: [Element; 4],
}

impl SelectorElements {
    pub fn get(&self, level: Level) -> &Element {
        &self.elements[level.index()]
    }
}

/// Re-escribe los selects desde `from` hacia la derecha
pub fn render_selectors(selects: &SelectorElements, state: &CascadeState, from: Level) -> Result<(), JsValue> {
    for level in Level::ALL.into_iter().filter(|level| *level >= from) {
        let selector = state.selector(level);
        fill_select(
            selects.get(level),
            selector.placeholder,
            &selector.options,
            &selector.value,
            selector.enabled,
        )?;
    }
    Ok(())
}
