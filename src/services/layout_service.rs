// ============================================================================
// LAYOUT SERVICE - Bloques de cada turno (embebidos o del servidor)
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::config::LayoutSource;
use crate::models::shift::{build_slots, ShiftDefinition, ShiftKey, Slot};
use crate::services::api_client::ApiClient;

/// Bloques de un turno embebido
pub fn embedded_slots(shift: ShiftKey, block_minutes: u32) -> Vec<Slot> {
    build_slots(&ShiftDefinition::embedded(shift), block_minutes)
}

/// Resuelve y cachea los bloques por turno mientras viva la página
#[derive(Clone)]
pub struct LayoutService {
    api_client: ApiClient,
    source: LayoutSource,
    block_minutes: u32,
    cache: Rc<RefCell<HashMap<ShiftKey, Vec<Slot>>>>,
}

impl LayoutService {
    pub fn new(api_client: ApiClient, source: LayoutSource, block_minutes: u32) -> Self {
        Self {
            api_client,
            source,
            block_minutes,
            cache: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn cached(&self, shift: ShiftKey) -> Option<Vec<Slot>> {
        self.cache.borrow().get(&shift).cloned()
    }

    pub async fn slots_for(&self, shift: ShiftKey) -> Vec<Slot> {
        if let Some(slots) = self.cached(shift) {
            return slots;
        }

        let slots = match self.source {
            LayoutSource::Embedded => embedded_slots(shift, self.block_minutes),
            LayoutSource::Server => match self.api_client.get_grid_config(shift).await {
                Ok(slots) if !slots.is_empty() => {
                    log::info!("📐 [GRID] {} bloques del servidor para {}", slots.len(), shift);
                    slots
                }
                Ok(_) => {
                    log::warn!("⚠️ [GRID] El servidor no trae bloques para {}, usando los embebidos", shift);
                    embedded_slots(shift, self.block_minutes)
                }
                Err(e) => {
                    log::warn!("⚠️ [GRID] Error cargando la grilla de {}: {}. Usando la embebida", shift, e);
                    embedded_slots(shift, self.block_minutes)
                }
            },
        };

        self.cache.borrow_mut().insert(shift, slots.clone());
        slots
    }
}
