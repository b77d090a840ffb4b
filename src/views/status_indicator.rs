// ============================================================================
// STATUS INDICATOR VIEW - "Guardando…", "Guardado", errores
// ============================================================================

use wasm_bindgen::prelude::*;
use crate::dom::{get_element_by_id, set_class, set_style, set_text_content};
use crate::models::sync::SaveStatus;
use crate::utils::constants::SAVE_INDICATOR_ID;

/// Actualiza el indicador de la página; si no existe no hace nada
pub fn render_status(status: &SaveStatus) -> Result<(), JsValue> {
    let Some(indicator) = get_element_by_id(SAVE_INDICATOR_ID) else {
        return Ok(());
    };

    set_text_content(&indicator, status.text());
    set_style(&indicator, "color", status.color())?;
    set_class(&indicator, "save-indicator--error", status.is_error())?;
    Ok(())
}
