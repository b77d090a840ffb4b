// ============================================================================
// SHIFT - Turnos, recreos y generación de bloques horarios
// ============================================================================

use std::collections::HashSet;
use std::fmt;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::time::{format_range, from_minutes, parse_hhmm, to_minutes};
use crate::utils::text::fold_key;

/// Turno (mañana / tarde / vespertino / sábado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShiftKey {
    Manana,
    Tarde,
    Vespertino,
    Sabado,
}

impl ShiftKey {
    pub const ALL: [ShiftKey; 4] = [
        ShiftKey::Manana,
        ShiftKey::Tarde,
        ShiftKey::Vespertino,
        ShiftKey::Sabado,
    ];

    /// Turnos que se eligen en el selector (el sábado siempre tiene su propia columna)
    pub const WEEKDAY: [ShiftKey; 3] = [ShiftKey::Manana, ShiftKey::Tarde, ShiftKey::Vespertino];

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftKey::Manana => "manana",
            ShiftKey::Tarde => "tarde",
            ShiftKey::Vespertino => "vespertino",
            ShiftKey::Sabado => "sabado",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShiftKey::Manana => "Mañana",
            ShiftKey::Tarde => "Tarde",
            ShiftKey::Vespertino => "Vespertino",
            ShiftKey::Sabado => "Sábado",
        }
    }

    /// Código de una letra usado por las vistas de docente
    pub fn code(self) -> char {
        match self {
            ShiftKey::Manana => 'm',
            ShiftKey::Tarde => 't',
            ShiftKey::Vespertino => 'v',
            ShiftKey::Sabado => 's',
        }
    }

    /// Acepta la clave, la etiqueta ("Mañana") o el código ("m")
    pub fn parse(value: &str) -> Option<Self> {
        let folded = fold_key(value);
        if folded.is_empty() {
            return None;
        }
        ShiftKey::ALL.into_iter().find(|key| {
            key.as_str() == folded || fold_key(key.label()) == folded || folded == key.code().to_string()
        })
    }

    pub fn is_saturday(self) -> bool {
        self == ShiftKey::Sabado
    }
}

impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ShiftKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ShiftKey::parse(&value).ok_or_else(|| format!("turno desconocido: {value:?}"))
    }
}

impl From<ShiftKey> for String {
    fn from(key: ShiftKey) -> Self {
        key.as_str().to_string()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShiftError {
    #[error("el turno termina antes de empezar ({start} → {end})")]
    InvertedRange { start: NaiveTime, end: NaiveTime },
    #[error("recreo inválido {from} → {to}")]
    InvalidBreak { from: NaiveTime, to: NaiveTime },
    #[error("el recreo {from} → {to} queda fuera del turno")]
    BreakOutOfRange { from: NaiveTime, to: NaiveTime },
    #[error("recreos superpuestos o desordenados en {at}")]
    OverlappingBreaks { at: NaiveTime },
    #[error("hora inválida: {0:?}")]
    InvalidTime(String),
}

/// Definición estática de un turno
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub key: ShiftKey,
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub breaks: Vec<(NaiveTime, NaiveTime)>,
}

impl ShiftDefinition {
    /// Construir validando rango y recreos
    pub fn new(
        key: ShiftKey,
        label: impl Into<String>,
        start: NaiveTime,
        end: NaiveTime,
        breaks: Vec<(NaiveTime, NaiveTime)>,
    ) -> Result<Self, ShiftError> {
        if start >= end {
            return Err(ShiftError::InvertedRange { start, end });
        }

        let mut previous_end = start;
        for &(from, to) in &breaks {
            if from >= to {
                return Err(ShiftError::InvalidBreak { from, to });
            }
            if from < start || to > end {
                return Err(ShiftError::BreakOutOfRange { from, to });
            }
            if from < previous_end {
                return Err(ShiftError::OverlappingBreaks { at: from });
            }
            previous_end = to;
        }

        Ok(Self {
            key,
            label: label.into(),
            start,
            end,
            breaks,
        })
    }

    /// Igual que `new` pero con horas en texto "HH:MM"
    pub fn from_hhmm(
        key: ShiftKey,
        start: &str,
        end: &str,
        breaks: &[(&str, &str)],
    ) -> Result<Self, ShiftError> {
        let time = |raw: &str| parse_hhmm(raw).ok_or_else(|| ShiftError::InvalidTime(raw.to_string()));
        let breaks = breaks
            .iter()
            .map(|(from, to)| Ok((time(from)?, time(to)?)))
            .collect::<Result<Vec<_>, ShiftError>>()?;
        Self::new(key, key.label(), time(start)?, time(end)?, breaks)
    }

    /// Turnos incluidos en la aplicación (mismos tramos que el catálogo del servidor)
    pub fn embedded(key: ShiftKey) -> Self {
        let (start, end, breaks) = match key {
            ShiftKey::Manana => ((7, 45), (12, 45), [((9, 5), (9, 15)), ((10, 35), (10, 45))]),
            ShiftKey::Tarde => ((13, 0), (18, 0), [((14, 20), (14, 30)), ((15, 50), (16, 0))]),
            ShiftKey::Vespertino => ((18, 10), (23, 10), [((19, 30), (19, 40)), ((21, 0), (21, 10))]),
            ShiftKey::Sabado => ((9, 0), (14, 0), [((10, 20), (10, 30)), ((11, 50), (12, 0))]),
        };

        let t = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        Self {
            key,
            label: key.label().to_string(),
            start: t(start),
            end: t(end),
            breaks: breaks.iter().map(|&(from, to)| (t(from), t(to))).collect(),
        }
    }
}

/// Una fila de la grilla: bloque de clase o recreo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "crate::models::time::hhmm")]
    pub from: NaiveTime,
    #[serde(with = "crate::models::time::hhmm")]
    pub to: NaiveTime,
    pub is_break: bool,
}

impl Slot {
    pub fn block(from: NaiveTime, to: NaiveTime) -> Self {
        Self { from, to, is_break: false }
    }

    pub fn recess(from: NaiveTime, to: NaiveTime) -> Self {
        Self { from, to, is_break: true }
    }

    pub fn label(&self) -> String {
        format_range(self.from, self.to)
    }
}

/// Generar los bloques de un turno.
///
/// Avanza desde `start` en bloques de `block_minutes`. Antes de cada recreo
/// el resto que no alcanza para un bloque completo se absorbe (el cursor salta
/// al inicio del recreo). El resto final que no llega a un bloque se descarta.
/// Una definición mal formada (`end <= start`) produce una secuencia vacía.
pub fn build_slots(shift: &ShiftDefinition, block_minutes: u32) -> Vec<Slot> {
    let start = to_minutes(shift.start);
    let end = to_minutes(shift.end);
    if end <= start || block_minutes == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = start;

    let emit_blocks = |cursor: &mut u32, limit: u32, slots: &mut Vec<Slot>| {
        while *cursor + block_minutes <= limit {
            let (Some(from), Some(to)) = (from_minutes(*cursor), from_minutes(*cursor + block_minutes)) else {
                break;
            };
            slots.push(Slot::block(from, to));
            *cursor += block_minutes;
        }
    };

    for &(break_from, break_to) in &shift.breaks {
        let (b_start, b_end) = (to_minutes(break_from), to_minutes(break_to));
        // Recreos fuera de orden o de rango no se pueden intercalar
        if b_start < cursor || b_end <= b_start || b_end > end {
            continue;
        }

        emit_blocks(&mut cursor, b_start, &mut slots);
        slots.push(Slot::recess(break_from, break_to));
        cursor = b_end;
    }

    emit_blocks(&mut cursor, end, &mut slots);
    slots
}

/// Normalizar filas de grilla recibidas del servidor: descarta filas sin
/// horas válidas, elimina duplicados (inicio, fin, recreo) y ordena por
/// inicio y luego fin.
pub fn normalize_slots(rows: impl IntoIterator<Item = Slot>) -> Vec<Slot> {
    let mut seen = HashSet::new();
    let mut slots: Vec<Slot> = rows
        .into_iter()
        .filter(|slot| slot.to > slot.from)
        .filter(|slot| seen.insert(*slot))
        .collect();
    slots.sort_by_key(|slot| (slot.from, slot.to));
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(value: &str) -> NaiveTime {
        parse_hhmm(value).unwrap()
    }

    #[test]
    fn test_shift_key_parse() {
        assert_eq!(ShiftKey::parse("Mañana"), Some(ShiftKey::Manana));
        assert_eq!(ShiftKey::parse("manana"), Some(ShiftKey::Manana));
        assert_eq!(ShiftKey::parse("v"), Some(ShiftKey::Vespertino));
        assert_eq!(ShiftKey::parse("Sábado"), Some(ShiftKey::Sabado));
        assert_eq!(ShiftKey::parse(""), None);
        assert_eq!(ShiftKey::parse("noche"), None);
    }

    #[test]
    fn test_new_rejects_bad_breaks() {
        let inverted = ShiftDefinition::from_hhmm(ShiftKey::Tarde, "18:00", "13:00", &[]);
        assert!(matches!(inverted, Err(ShiftError::InvertedRange { .. })));

        let outside = ShiftDefinition::from_hhmm(ShiftKey::Tarde, "13:00", "18:00", &[("12:00", "12:10")]);
        assert!(matches!(outside, Err(ShiftError::BreakOutOfRange { .. })));

        let overlapping = ShiftDefinition::from_hhmm(
            ShiftKey::Tarde,
            "13:00",
            "18:00",
            &[("14:00", "14:20"), ("14:10", "14:30")],
        );
        assert!(matches!(overlapping, Err(ShiftError::OverlappingBreaks { .. })));
    }

    #[test]
    fn test_morning_example() {
        let shift = ShiftDefinition::from_hhmm(
            ShiftKey::Manana,
            "07:45",
            "12:45",
            &[("09:05", "09:15"), ("10:35", "10:45")],
        )
        .unwrap();
        let slots = build_slots(&shift, 40);

        assert_eq!(slots[0], Slot::block(hm("07:45"), hm("08:25")));
        assert_eq!(slots[1], Slot::block(hm("08:25"), hm("09:05")));
        assert_eq!(slots[2], Slot::recess(hm("09:05"), hm("09:15")));
        assert_eq!(slots[3], Slot::block(hm("09:15"), hm("09:55")));
        assert!(slots.last().unwrap().to <= hm("12:45"));
        assert_eq!(slots.len(), 9);
    }

    #[test]
    fn test_remainder_before_break_is_absorbed() {
        // 08:00–08:40 entra, 08:40–09:00 no alcanza y se absorbe
        let shift =
            ShiftDefinition::from_hhmm(ShiftKey::Manana, "08:00", "10:00", &[("09:00", "09:10")]).unwrap();
        let slots = build_slots(&shift, 40);
        assert_eq!(
            slots,
            vec![
                Slot::block(hm("08:00"), hm("08:40")),
                Slot::recess(hm("09:00"), hm("09:10")),
                Slot::block(hm("09:10"), hm("09:50")),
            ]
        );
    }

    #[test]
    fn test_malformed_shift_yields_nothing() {
        let mut shift = ShiftDefinition::embedded(ShiftKey::Tarde);
        shift.end = shift.start;
        assert!(build_slots(&shift, 40).is_empty());
        assert!(build_slots(&ShiftDefinition::embedded(ShiftKey::Tarde), 0).is_empty());
    }

    #[test]
    fn test_late_shift_does_not_wrap_midnight() {
        let shift = ShiftDefinition::from_hhmm(ShiftKey::Vespertino, "22:30", "23:59", &[]).unwrap();
        let slots = build_slots(&shift, 40);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].to, hm("23:50"));
    }

    #[test]
    fn test_embedded_shifts_tile_exactly() {
        for key in ShiftKey::ALL {
            let shift = ShiftDefinition::embedded(key);
            let slots = build_slots(&shift, 40);
            assert_eq!(slots.first().unwrap().from, shift.start, "{key}");
            assert_eq!(slots.last().unwrap().to, shift.end, "{key}");
            for pair in slots.windows(2) {
                assert_eq!(pair[0].to, pair[1].from, "{key}");
            }
        }
    }

    #[test]
    fn test_building_twice_gives_the_same_rows() {
        for key in ShiftKey::ALL {
            let shift = ShiftDefinition::embedded(key);
            assert_eq!(build_slots(&shift, 40), build_slots(&shift, 40), "{key}");
        }
        let odd = ShiftDefinition::from_hhmm(ShiftKey::Tarde, "13:10", "17:55", &[("14:35", "14:50")]).unwrap();
        assert_eq!(build_slots(&odd, 45), build_slots(&odd, 45));
    }

    #[test]
    fn test_break_rows_are_exactly_the_configured_breaks() {
        let evening = ShiftDefinition::from_hhmm(
            ShiftKey::Vespertino,
            "18:10",
            "23:10",
            &[("19:30", "19:40"), ("21:00", "21:10")],
        )
        .unwrap();
        let odd = ShiftDefinition::from_hhmm(
            ShiftKey::Tarde,
            "13:10",
            "17:55",
            &[("14:35", "14:50"), ("16:20", "16:25")],
        )
        .unwrap();

        for shift in [evening, odd, ShiftDefinition::embedded(ShiftKey::Tarde)] {
            let breaks: Vec<(NaiveTime, NaiveTime)> = build_slots(&shift, 40)
                .iter()
                .filter(|slot| slot.is_break)
                .map(|slot| (slot.from, slot.to))
                .collect();
            assert_eq!(breaks, shift.breaks, "{}", shift.key);
        }
    }

    #[test]
    fn test_normalize_slots_dedups_and_sorts() {
        let rows = vec![
            Slot::block(hm("08:25"), hm("09:05")),
            Slot::block(hm("07:45"), hm("08:25")),
            Slot::block(hm("08:25"), hm("09:05")),
            Slot::block(hm("09:05"), hm("09:05")),
        ];
        let slots = normalize_slots(rows);
        assert_eq!(
            slots,
            vec![Slot::block(hm("07:45"), hm("08:25")), Slot::block(hm("08:25"), hm("09:05"))]
        );
    }
}
