// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP y valida respuestas.
// Todos los requests llevan X-Requested-With y cookies same-origin;
// los POST además llevan el token CSRF de la cookie.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::RequestCredentials;
use crate::config::EndpointConfig;
use crate::models::offering::{Offering, OfferingResponse};
use crate::models::options::{OptionItem, OptionsResponse};
use crate::models::shift::{ShiftKey, Slot};
use crate::models::sync::{
    GridConfigResponse, OccupiedResponse, OccupiedSlot, SaveOutcome, SaveRequest, SelectionContext, ToggleRequest,
};
use crate::services::api_error::{decode_body, decode_mutation, ApiError};
use crate::utils::constants::{AJAX_HEADER, AJAX_HEADER_VALUE, CSRF_HEADER};
use crate::utils::cookies::csrf_token;

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    endpoints: EndpointConfig,
}

impl ApiClient {
    pub fn new(endpoints: EndpointConfig) -> Self {
        Self { endpoints }
    }

    fn with_common_headers(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AJAX_HEADER, AJAX_HEADER_VALUE)
            .credentials(RequestCredentials::SameOrigin)
    }

    /// Status, content-type y body de la respuesta
    async fn read(response: Response) -> Result<(u16, Option<String>, String), ApiError> {
        let status = response.status();
        let content_type = response.headers().get("content-type");
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok((status, content_type, body))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let response = Self::with_common_headers(Request::get(url))
            .query(query.iter().copied())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (status, content_type, body) = Self::read(response).await?;
        decode_body(status, content_type.as_deref(), &body)
    }

    async fn post_mutation<B: Serialize>(&self, url: &str, payload: &B) -> Result<SaveOutcome, ApiError> {
        let mut builder = Self::with_common_headers(Request::post(url));
        match csrf_token() {
            Some(token) => builder = builder.header(CSRF_HEADER, &token),
            None => log::warn!("⚠️ [SYNC] Sin cookie CSRF, el POST puede ser rechazado"),
        }

        let response = builder
            .json(payload)
            .map_err(|e| ApiError::Serialize(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (status, content_type, body) = Self::read(response).await?;
        decode_mutation(status, content_type.as_deref(), &body)
    }

    async fn get_options(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<OptionItem>, ApiError> {
        let response: OptionsResponse = self.get_json(url, query).await?;
        Ok(response.into_items())
    }

    /// Listar carreras (profesorados)
    pub async fn get_programs(&self) -> Result<Vec<OptionItem>, ApiError> {
        self.get_options(&self.endpoints.programs, &[]).await
    }

    /// Planes de una carrera
    pub async fn get_plans(&self, program: &str) -> Result<Vec<OptionItem>, ApiError> {
        self.get_options(&self.endpoints.plans, &[("carrera", program)]).await
    }

    /// Materias de un plan
    pub async fn get_subjects(&self, plan: &str) -> Result<Vec<OptionItem>, ApiError> {
        self.get_options(&self.endpoints.subjects, &[("plan_id", plan)]).await
    }

    pub async fn get_shifts(&self) -> Result<Vec<OptionItem>, ApiError> {
        self.get_options(&self.endpoints.shifts, &[]).await
    }

    pub async fn get_teachers(&self) -> Result<Vec<OptionItem>, ApiError> {
        self.get_options(&self.endpoints.teachers, &[]).await
    }

    /// Bloques de un turno según el servidor (ya normalizados)
    pub async fn get_grid_config(&self, shift: ShiftKey) -> Result<Vec<Slot>, ApiError> {
        let response: GridConfigResponse = self
            .get_json(&self.endpoints.grid_config, &[("turno", shift.as_str())])
            .await?;
        Ok(response.into_slots())
    }

    /// Celdas guardadas para la combinación
    pub async fn get_occupied(&self, context: &SelectionContext) -> Result<Vec<OccupiedSlot>, ApiError> {
        let response: OccupiedResponse = self.get_json(&self.endpoints.occupied, &context.query()).await?;
        Ok(response.into_slots())
    }

    /// Toggle de una celda (autoguardado)
    pub async fn post_toggle(&self, request: &ToggleRequest) -> Result<SaveOutcome, ApiError> {
        self.post_mutation(&self.endpoints.toggle, request).await
    }

    /// Guardado completo: reemplaza lo guardado para la combinación
    pub async fn post_save(&self, request: &SaveRequest) -> Result<SaveOutcome, ApiError> {
        self.post_mutation(&self.endpoints.save, request).await
    }

    /// Horario de un profesorado (vista de solo lectura)
    pub async fn get_program_schedule(
        &self,
        program: &str,
        plan: &str,
        shift: ShiftKey,
    ) -> Result<Vec<OccupiedSlot>, ApiError> {
        let code = shift.code().to_string();
        let query = [("carrera", program), ("plan_id", plan), ("turno", code.as_str())];
        let response: OccupiedResponse = self.get_json(&self.endpoints.program_schedule, &query).await?;
        Ok(response.into_slots())
    }

    /// Horario de un docente en un turno (vista de solo lectura)
    pub async fn get_teacher_schedule(&self, teacher: &str, shift: ShiftKey) -> Result<Vec<OccupiedSlot>, ApiError> {
        let code = shift.code().to_string();
        let query = [("docente_id", teacher), ("turno", code.as_str())];
        let response: OccupiedResponse = self.get_json(&self.endpoints.teacher_schedule, &query).await?;
        Ok(response.into_slots())
    }

    /// Oferta de un profesorado agrupada por año (plan opcional)
    pub async fn get_program_offering(&self, program: &str, plan: &str) -> Result<Offering, ApiError> {
        let mut query = vec![("profesorado_id", program)];
        if !plan.is_empty() {
            query.push(("plan_id", plan));
        }
        let response: OfferingResponse = self.get_json(&self.endpoints.offering, &query).await?;
        Ok(response.into())
    }
}
