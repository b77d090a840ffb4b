use serde::{Deserialize, Serialize};
use crate::models::grid::LayoutMode;
use crate::utils::constants::{DEFAULT_BLOCK_MINUTES, POLL_INTERVAL_MS, STATUS_CLEAR_MS};

/// Cómo se persiste la grilla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Cada click manda un toggle al servidor
    #[default]
    Autosave,
    /// Botón "Guardar" que reemplaza el conjunto completo
    Explicit,
}

/// De dónde salen los bloques de cada turno
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSource {
    /// Turnos embebidos en el binario
    #[default]
    Embedded,
    /// Endpoint de configuración de grilla (con fallback a los embebidos)
    Server,
}

impl SaveMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "autosave" | "auto" => Some(SaveMode::Autosave),
            "explicit" | "manual" => Some(SaveMode::Explicit),
            _ => None,
        }
    }
}

impl LayoutSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "embedded" => Some(LayoutSource::Embedded),
            "server" => Some(LayoutSource::Server),
            _ => None,
        }
    }
}

fn parse_layout_mode(value: &str) -> Option<LayoutMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "split" => Some(LayoutMode::Split),
        "unified" => Some(LayoutMode::Unified),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub programs: String,
    pub plans: String,
    pub subjects: String,
    pub shifts: String,
    pub teachers: String,
    pub grid_config: String,
    pub occupied: String,
    pub toggle: String,
    pub save: String,
    pub program_schedule: String,
    pub teacher_schedule: String,
    pub offering: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            programs: "/api/carreras/".to_string(),
            plans: "/api/planes/".to_string(),
            subjects: "/api/materias/".to_string(),
            shifts: "/api/turnos/".to_string(),
            teachers: "/api/docentes/".to_string(),
            grid_config: "/api/grilla-config/".to_string(),
            occupied: "/api/horario/grid/".to_string(),
            toggle: "/api/horario/toggle/".to_string(),
            save: "/api/horario/guardar/".to_string(),
            program_schedule: "/api/horario/profesorado/".to_string(),
            teacher_schedule: "/api/horario/docente/".to_string(),
            offering: "/api/oferta/profesorado/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    pub block_minutes: u32,
    pub poll_interval_ms: u32,
    pub status_clear_ms: u32,
    pub layout_mode: LayoutMode,
    pub layout_source: LayoutSource,
    pub save_mode: SaveMode,
    pub include_saturday: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            block_minutes: DEFAULT_BLOCK_MINUTES,
            poll_interval_ms: POLL_INTERVAL_MS,
            status_clear_ms: STATUS_CLEAR_MS,
            layout_mode: LayoutMode::default(),
            layout_source: LayoutSource::Embedded,
            save_mode: SaveMode::Autosave,
            include_saturday: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub enable_logging: bool,
    pub endpoints: EndpointConfig,
    pub grid: GridSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            enable_logging: true,
            endpoints: EndpointConfig::default(),
            grid: GridSettings::default(),
        }
    }
}

/// Variables globales que la plantilla del servidor deja en `window`
pub const PAGE_ENDPOINT_KEYS: [&str; 12] = [
    "API_CARRERAS",
    "API_PLANES",
    "API_MATERIAS",
    "API_TURNOS",
    "API_DOCENTES",
    "API_GRILLA_CONFIG",
    "API_GRID",
    "API_TOGGLE",
    "API_SAVE",
    "API_HPROF",
    "API_HDOC",
    "API_OFERTA_PROFESORADO",
];

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let endpoint = |value: Option<&'static str>, fallback: String| {
            value.map(str::to_string).unwrap_or(fallback)
        };
        let d = defaults.endpoints;
        let g = defaults.grid;

        Self {
            environment: option_env!("HORARIOS_ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("HORARIOS_ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            endpoints: EndpointConfig {
                programs: endpoint(option_env!("HORARIOS_API_CARRERAS"), d.programs),
                plans: endpoint(option_env!("HORARIOS_API_PLANES"), d.plans),
                subjects: endpoint(option_env!("HORARIOS_API_MATERIAS"), d.subjects),
                shifts: endpoint(option_env!("HORARIOS_API_TURNOS"), d.shifts),
                teachers: endpoint(option_env!("HORARIOS_API_DOCENTES"), d.teachers),
                grid_config: endpoint(option_env!("HORARIOS_API_GRILLA_CONFIG"), d.grid_config),
                occupied: endpoint(option_env!("HORARIOS_API_GRID"), d.occupied),
                toggle: endpoint(option_env!("HORARIOS_API_TOGGLE"), d.toggle),
                save: endpoint(option_env!("HORARIOS_API_SAVE"), d.save),
                program_schedule: endpoint(option_env!("HORARIOS_API_HPROF"), d.program_schedule),
                teacher_schedule: endpoint(option_env!("HORARIOS_API_HDOC"), d.teacher_schedule),
                offering: endpoint(option_env!("HORARIOS_API_OFERTA"), d.offering),
            },
            grid: GridSettings {
                block_minutes: option_env!("HORARIOS_BLOCK_MINUTES")
                    .and_then(|v| v.parse().ok())
                    .filter(|minutes| *minutes > 0)
                    .unwrap_or(g.block_minutes),
                poll_interval_ms: option_env!("HORARIOS_POLL_INTERVAL_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(g.poll_interval_ms),
                status_clear_ms: option_env!("HORARIOS_STATUS_CLEAR_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(g.status_clear_ms),
                layout_mode: option_env!("HORARIOS_LAYOUT_MODE")
                    .and_then(parse_layout_mode)
                    .unwrap_or(g.layout_mode),
                layout_source: option_env!("HORARIOS_LAYOUT_SOURCE")
                    .and_then(LayoutSource::parse)
                    .unwrap_or(g.layout_source),
                save_mode: option_env!("HORARIOS_SAVE_MODE")
                    .and_then(SaveMode::parse)
                    .unwrap_or(g.save_mode),
                include_saturday: option_env!("HORARIOS_INCLUDE_SATURDAY")
                    .unwrap_or("true").parse().unwrap_or(g.include_saturday),
            },
        }
    }

    /// Aplica un override de página (`window.API_GRID = "/..."`, etc.)
    pub fn apply_page_value(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let target = match key {
            "API_CARRERAS" => &mut self.endpoints.programs,
            "API_PLANES" => &mut self.endpoints.plans,
            "API_MATERIAS" => &mut self.endpoints.subjects,
            "API_TURNOS" => &mut self.endpoints.shifts,
            "API_DOCENTES" => &mut self.endpoints.teachers,
            "API_GRILLA_CONFIG" => &mut self.endpoints.grid_config,
            "API_GRID" => &mut self.endpoints.occupied,
            "API_TOGGLE" => &mut self.endpoints.toggle,
            "API_SAVE" => &mut self.endpoints.save,
            "API_HPROF" => &mut self.endpoints.program_schedule,
            "API_HDOC" => &mut self.endpoints.teacher_schedule,
            "API_OFERTA_PROFESORADO" => &mut self.endpoints.offering,
            "HORARIOS_LAYOUT_MODE" => {
                return match parse_layout_mode(value) {
                    Some(mode) => {
                        self.grid.layout_mode = mode;
                        true
                    }
                    None => false,
                };
            }
            "HORARIOS_SAVE_MODE" => {
                return match SaveMode::parse(value) {
                    Some(mode) => {
                        self.grid.save_mode = mode;
                        true
                    }
                    None => false,
                };
            }
            _ => return false,
        };
        *target = value.to_string();
        true
    }

    /// Configuración efectiva para la página actual: compilada + globals de `window`
    pub fn with_page_overrides(&self) -> Self {
        let mut config = self.clone();
        let Some(window) = web_sys::window() else {
            return config;
        };

        let keys = PAGE_ENDPOINT_KEYS
            .iter()
            .copied()
            .chain(["HORARIOS_LAYOUT_MODE", "HORARIOS_SAVE_MODE"]);
        for key in keys {
            let value = js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_string());
            if let Some(value) = value {
                if config.apply_page_value(key, &value) {
                    log::debug!("⚙️ [CONFIG] {} = {}", key, value);
                }
            }
        }
        config
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.grid.block_minutes, 40);
        assert_eq!(config.grid.poll_interval_ms, 10_000);
        assert_eq!(config.grid.status_clear_ms, 2_500);
        assert_eq!(config.grid.save_mode, SaveMode::Autosave);
        assert_eq!(config.grid.layout_mode, LayoutMode::Unified);
    }

    #[test]
    fn test_page_values_override_endpoints() {
        let mut config = AppConfig::default();
        assert!(config.apply_page_value("API_GRID", "/horarios/grid/"));
        assert!(config.apply_page_value("HORARIOS_LAYOUT_MODE", "split"));
        assert!(!config.apply_page_value("API_TOGGLE", "  "));
        assert!(!config.apply_page_value("API_DESCONOCIDA", "/x/"));
        assert!(config.apply_page_value("API_OFERTA_PROFESORADO", "/oferta/"));

        assert_eq!(config.endpoints.occupied, "/horarios/grid/");
        assert_eq!(config.grid.layout_mode, LayoutMode::Split);
        assert_eq!(config.endpoints.offering, "/oferta/");
        assert_eq!(config.endpoints.toggle, AppConfig::default().endpoints.toggle);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(SaveMode::parse("Explicit"), Some(SaveMode::Explicit));
        assert_eq!(LayoutSource::parse("server"), Some(LayoutSource::Server));
        assert_eq!(parse_layout_mode("otro"), None);
    }
}
