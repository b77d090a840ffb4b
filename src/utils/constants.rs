/// Duración estándar de un bloque de clase (minutos)
pub const DEFAULT_BLOCK_MINUTES: u32 = 40;

/// Intervalo de refresco silencioso contra el servidor
pub const POLL_INTERVAL_MS: u32 = 10_000;

/// Tiempo que queda visible el indicador "Guardado" / error
pub const STATUS_CLEAR_MS: u32 = 2_500;

/// Máximo de caracteres del body que se conserva en los errores HTTP
pub const BODY_PREVIEW_CHARS: usize = 200;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const AJAX_HEADER: &str = "X-Requested-With";
pub const AJAX_HEADER_VALUE: &str = "XMLHttpRequest";

pub const BREAK_LABEL: &str = "Recreo";
pub const TIME_HEADER: &str = "Hora";
pub const EMPTY_OPTION_LABEL: &str = "---------";

// IDs de los puntos de montaje en las páginas
pub const EDITOR_GRID_ID: &str = "ah-grid-unificado";
pub const SAVE_INDICATOR_ID: &str = "save-indicator";
pub const BLOCKS_COUNTER_SELECTOR: &str = "[data-role=\"blocks-counter\"]";
pub const CLEAR_BUTTON_ID: &str = "ah-btn-limpiar";
pub const SAVE_BUTTON_ID: &str = "ah-btn-guardar";

pub const PROGRAM_SELECT_ID: &str = "id_carrera";
pub const PLAN_SELECT_ID: &str = "id_plan";
pub const SUBJECT_SELECT_ID: &str = "id_materia";
pub const SHIFT_SELECT_ID: &str = "id_turno";

pub const PROGRAM_VIEW_PROGRAM_ID: &str = "hp_carrera";
pub const PROGRAM_VIEW_PLAN_ID: &str = "hp_plan";
pub const PROGRAM_VIEW_SHIFT_ID: &str = "hp_turno";
pub const PROGRAM_VIEW_GRID_ID: &str = "hp_grid";
pub const PROGRAM_VIEW_PRINT_ID: &str = "hp_btn_imprimir";

pub const TEACHER_VIEW_SELECT_ID: &str = "hd_docente";
pub const TEACHER_VIEW_PRINT_ID: &str = "hd_btn_imprimir";
/// Grillas del docente, una por turno (sufijo = código del turno)
pub const TEACHER_VIEW_GRID_PREFIX: &str = "hd_grid_";

pub const OFFERING_SHEETS_ID: &str = "sheets";
pub const OFFERING_PRINT_ID: &str = "btn-print";
pub const OFFERING_EMPTY_LABEL: &str = "Sin resultados para los filtros seleccionados.";
