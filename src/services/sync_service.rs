// ============================================================================
// SYNC SERVICE - Lectura y persistencia de la grilla de una combinación
// ============================================================================
// Sin combinación completa no sale ningún request: se devuelve Ok(None).
// ============================================================================

use crate::models::grid::CellKey;
use crate::models::sync::{OccupiedSlot, SaveItem, SaveOutcome, SaveRequest, SelectionContext, ToggleRequest};
use crate::services::api_client::ApiClient;
use crate::services::api_error::ApiError;

#[derive(Clone)]
pub struct SyncService {
    api_client: ApiClient,
}

impl SyncService {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    /// Snapshot de celdas ocupadas
    pub async fn fetch_current(&self, context: &SelectionContext) -> Result<Option<Vec<OccupiedSlot>>, ApiError> {
        if !context.is_complete() {
            log::debug!("[SYNC] combinación incompleta, no se consulta");
            return Ok(None);
        }

        let slots = self.api_client.get_occupied(context).await?;
        log::info!("🔄 [SYNC] {} celdas ocupadas para {:?}", slots.len(), context);
        Ok(Some(slots))
    }

    /// Guardado completo: manda TODO el conjunto deseado.
    /// Un conjunto vacío borra la combinación en el servidor.
    pub async fn persist(
        &self,
        context: &SelectionContext,
        items: Vec<SaveItem>,
    ) -> Result<Option<SaveOutcome>, ApiError> {
        if !context.is_complete() {
            return Ok(None);
        }

        let request = SaveRequest::new(context, items);
        log::info!("💾 [SYNC] Guardando {} bloques", request.items.len());
        let outcome = self.api_client.post_save(&request).await?;
        log::info!("✅ [SYNC] Guardado: {} bloques en el servidor", outcome.saved_count);
        Ok(Some(outcome))
    }

    /// Autoguardado de una celda
    pub async fn persist_toggle(
        &self,
        context: &SelectionContext,
        key: CellKey,
        selected: bool,
    ) -> Result<Option<SaveOutcome>, ApiError> {
        if !context.is_complete() {
            return Ok(None);
        }

        let request = ToggleRequest::new(context, key, selected);
        let outcome = self.api_client.post_toggle(&request).await?;
        log::debug!("[SYNC] toggle {} {} → {} ({} en total)", key.day, key.from, selected, outcome.saved_count);
        Ok(Some(outcome))
    }
}
