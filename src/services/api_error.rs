// ============================================================================
// API ERROR - Errores de la comunicación con el backend
// ============================================================================

use serde::de::DeserializeOwned;
use thiserror::Error;
use crate::models::sync::{MutationResponse, SaveOutcome};
use crate::utils::constants::BODY_PREVIEW_CHARS;
use crate::utils::text::preview;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Falló el transporte (sin red, CORS, request abortado)
    #[error("Network error: {0}")]
    Network(String),

    /// Respuesta fuera de 2xx
    #[error("HTTP {status}: {body_preview}")]
    Http { status: u16, body_preview: String },

    /// Respuesta 2xx que no es JSON (típicamente la página de login)
    #[error("Expected JSON, got {content_type:?}: {body_preview}")]
    NotJson {
        content_type: Option<String>,
        body_preview: String,
    },

    /// JSON con una forma inesperada
    #[error("Parse error: {0}")]
    Decode(String),

    /// El servidor respondió `ok: false`
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl ApiError {
    /// Texto para el indicador de guardado
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Sin conexión".to_string(),
            ApiError::Rejected(message) if !message.trim().is_empty() => message.clone(),
            _ => "Error al guardar".to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

/// Valida status y content-type, y decodifica el body
pub fn decode_body<T: DeserializeOwned>(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Http {
            status,
            body_preview: preview(body, BODY_PREVIEW_CHARS),
        });
    }

    if !is_json(content_type) {
        return Err(ApiError::NotJson {
            content_type: content_type.map(str::to_string),
            body_preview: preview(body, BODY_PREVIEW_CHARS),
        });
    }

    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Igual que `decode_body` pero para toggle/guardado: un `{ok:false, error}`
/// (con cualquier status) se convierte en `Rejected` con el mensaje del servidor
pub fn decode_mutation(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<SaveOutcome, ApiError> {
    if is_json(content_type) {
        if let Ok(response) = serde_json::from_str::<MutationResponse>(body) {
            if !response.ok {
                let message = response.error.unwrap_or_default();
                return Err(ApiError::Rejected(message));
            }
        }
    }

    let response: MutationResponse = decode_body(status, content_type, body)?;
    Ok(SaveOutcome {
        saved_count: response.count.unwrap_or_default(),
    })
}
