// ============================================================================
// SYNC MODELS - Formatos de intercambio con el backend de horarios
// ============================================================================
// Todas las formas que manda el servidor se normalizan acá a tipos
// canónicos (Day, NaiveTime, CellKey). Nada fuera de este módulo mira JSON.
// ============================================================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use crate::models::day::Day;
use crate::models::grid::CellKey;
use crate::models::shift::{normalize_slots, ShiftKey, Slot};
use crate::models::time::{hhmm, parse_hhmm};

/// Estado visible del indicador de guardado
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved { message: String },
    Error { message: String },
}

impl SaveStatus {
    pub fn saved() -> Self {
        SaveStatus::Saved { message: "Guardado".to_string() }
    }

    pub fn synced() -> Self {
        SaveStatus::Saved { message: "Sincronizado".to_string() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SaveStatus::Error { message: message.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Saving => "Guardando…",
            SaveStatus::Saved { message } | SaveStatus::Error { message } => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SaveStatus::Error { .. })
    }

    /// Los estados finales se borran solos después de un rato
    pub fn auto_clears(&self) -> bool {
        matches!(self, SaveStatus::Saved { .. } | SaveStatus::Error { .. })
    }

    pub fn color(&self) -> &'static str {
        match self {
            SaveStatus::Idle | SaveStatus::Saving => "#6b7280",
            SaveStatus::Saved { .. } => "#0f766e",
            SaveStatus::Error { .. } => "#b91c1c",
        }
    }
}

/// Combinación (profesorado, plan, materia, turno) que identifica una grilla guardada
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub program: String,
    pub plan: String,
    pub subject: String,
    pub shift: String,
}

impl SelectionContext {
    pub fn new(
        program: impl Into<String>,
        plan: impl Into<String>,
        subject: impl Into<String>,
        shift: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            plan: plan.into(),
            subject: subject.into(),
            shift: shift.into(),
        }
    }

    /// Sin los cuatro valores no se hace ningún request
    pub fn is_complete(&self) -> bool {
        [&self.program, &self.plan, &self.subject, &self.shift]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    pub fn shift_key(&self) -> Option<ShiftKey> {
        ShiftKey::parse(&self.shift)
    }

    /// Parámetros del GET de celdas ocupadas
    pub fn query(&self) -> [(&'static str, &str); 4] {
        [
            ("carrera", self.program.as_str()),
            ("plan", self.plan.as_str()),
            ("materia", self.subject.as_str()),
            ("turno", self.shift.as_str()),
        ]
    }
}

/// Datos de la asignación que ocupa una celda
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDetail {
    #[serde(rename = "materia", default)]
    pub subject: Option<String>,
    #[serde(rename = "docente", default)]
    pub teacher: Option<String>,
    #[serde(rename = "comision", default)]
    pub commission: Option<String>,
    #[serde(rename = "aula", default)]
    pub room: Option<String>,
}

impl SlotDetail {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.teacher.is_none() && self.commission.is_none() && self.room.is_none()
    }
}

/// Celda ocupada según el servidor (forma canónica)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupiedSlot {
    pub day: Day,
    pub from: NaiveTime,
    pub to: Option<NaiveTime>,
    pub shift: Option<ShiftKey>,
    pub detail: SlotDetail,
}

impl OccupiedSlot {
    pub fn new(day: Day, from: NaiveTime) -> Self {
        Self {
            day,
            from,
            to: None,
            shift: None,
            detail: SlotDetail::default(),
        }
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(self.day, self.from)
    }
}

#[derive(Deserialize)]
pub struct OccupiedItem {
    dia: Day,
    #[serde(with = "hhmm")]
    inicio: NaiveTime,
    #[serde(default, deserialize_with = "hhmm::option::deserialize")]
    fin: Option<NaiveTime>,
    #[serde(default)]
    turno: Option<String>,
    #[serde(flatten)]
    detail: SlotDetail,
}

impl From<OccupiedItem> for OccupiedSlot {
    fn from(item: OccupiedItem) -> Self {
        Self {
            day: item.dia,
            from: item.inicio,
            to: item.fin,
            shift: item.turno.as_deref().and_then(ShiftKey::parse),
            detail: item.detail,
        }
    }
}

#[derive(Deserialize)]
pub struct OccupiedCompact {
    d: Day,
    #[serde(with = "hhmm")]
    hhmm: NaiveTime,
}

/// Respuesta del GET de ocupadas: `{items:[..]}` o `{slots:[{d,hhmm}],count}`
#[derive(Deserialize)]
#[serde(untagged)]
pub enum OccupiedResponse {
    Items {
        items: Vec<OccupiedItem>,
    },
    Slots {
        slots: Vec<OccupiedCompact>,
        #[serde(default)]
        #[allow(dead_code)]
        count: Option<usize>,
    },
}

impl OccupiedResponse {
    pub fn into_slots(self) -> Vec<OccupiedSlot> {
        match self {
            OccupiedResponse::Items { items } => items.into_iter().map(OccupiedSlot::from).collect(),
            OccupiedResponse::Slots { slots, .. } => slots
                .into_iter()
                .map(|slot| OccupiedSlot::new(slot.d, slot.hhmm))
                .collect(),
        }
    }
}

/// Ítem del guardado completo
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SaveItem {
    pub dia: Day,
    #[serde(with = "hhmm")]
    pub inicio: NaiveTime,
    #[serde(with = "hhmm")]
    pub fin: NaiveTime,
}

/// Guardado completo: reemplaza TODO lo guardado para la combinación.
/// Mandar `items` vacío borra la combinación entera.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub profesorado_id: String,
    pub plan_id: String,
    pub materia_id: String,
    pub turno: String,
    pub items: Vec<SaveItem>,
}

impl SaveRequest {
    pub fn new(context: &SelectionContext, items: Vec<SaveItem>) -> Self {
        Self {
            profesorado_id: context.program.clone(),
            plan_id: context.plan.clone(),
            materia_id: context.subject.clone(),
            turno: context.shift.clone(),
            items,
        }
    }
}

/// Toggle de una sola celda (modo autoguardado)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToggleRequest {
    #[serde(rename = "carrera")]
    pub program: String,
    pub plan: String,
    #[serde(rename = "materia")]
    pub subject: String,
    pub turno: String,
    pub day: Day,
    #[serde(with = "hhmm")]
    pub hhmm: NaiveTime,
    pub selected: bool,
}

impl ToggleRequest {
    pub fn new(context: &SelectionContext, key: CellKey, selected: bool) -> Self {
        Self {
            program: context.program.clone(),
            plan: context.plan.clone(),
            subject: context.subject.clone(),
            turno: context.shift.clone(),
            day: key.day,
            hhmm: key.from,
            selected,
        }
    }
}

/// Respuesta de toggle y guardado: `{ok, count}` o `{ok:false, error}`
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Resultado de un guardado aceptado
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveOutcome {
    pub saved_count: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GridConfigRow {
    Object {
        #[serde(default)]
        ini: Option<String>,
        #[serde(default)]
        inicio: Option<String>,
        #[serde(default)]
        hora_inicio: Option<String>,
        #[serde(default)]
        desde: Option<String>,
        #[serde(default)]
        fin: Option<String>,
        #[serde(default)]
        hora_fin: Option<String>,
        #[serde(default)]
        hasta: Option<String>,
        #[serde(default)]
        recreo: Option<bool>,
    },
    Pair(String, String),
}

impl GridConfigRow {
    fn into_slot(self) -> Option<Slot> {
        let (from, to, is_break) = match self {
            GridConfigRow::Object { ini, inicio, hora_inicio, desde, fin, hora_fin, hasta, recreo } => (
                ini.or(inicio).or(hora_inicio).or(desde)?,
                fin.or(hora_fin).or(hasta)?,
                recreo.unwrap_or(false),
            ),
            GridConfigRow::Pair(from, to) => (from, to, false),
        };
        Some(Slot {
            from: parse_hhmm(&from)?,
            to: parse_hhmm(&to)?,
            is_break,
        })
    }
}

/// Configuración de grilla de un turno: `{rows:[..]}` o `{bloques:[..]}`
#[derive(Deserialize)]
pub struct GridConfigResponse {
    #[serde(default)]
    rows: Vec<GridConfigRow>,
    #[serde(default)]
    bloques: Vec<GridConfigRow>,
}

impl GridConfigResponse {
    pub fn into_slots(self) -> Vec<Slot> {
        let rows = if self.rows.is_empty() { self.bloques } else { self.rows };
        normalize_slots(rows.into_iter().filter_map(GridConfigRow::into_slot))
    }
}
