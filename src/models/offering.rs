// ============================================================================
// OFFERING - Oferta de un profesorado agrupada por año
// ============================================================================
// El servidor devuelve `{"1": [..], "2": [..], ...}`. Cada año se dibuja
// con la grilla de UN turno: el que más aparece en sus ítems o, si ningún
// ítem trae turno, el que corresponde a la mediana de los horarios.
// ============================================================================

use std::collections::BTreeMap;
use chrono::Timelike;
use serde::Deserialize;
use crate::models::shift::ShiftKey;
use crate::models::sync::{OccupiedItem, OccupiedSlot};

/// Años que siempre se muestran (una hoja por año)
pub const OFFERING_YEARS: [u8; 4] = [1, 2, 3, 4];

#[derive(Deserialize)]
#[serde(transparent)]
pub struct OfferingResponse {
    years: BTreeMap<u8, Option<Vec<OccupiedItem>>>,
}

impl OfferingResponse {
    pub fn into_years(self) -> BTreeMap<u8, Vec<OccupiedSlot>> {
        self.years
            .into_iter()
            .map(|(year, items)| {
                let slots = items.unwrap_or_default().into_iter().map(OccupiedSlot::from).collect();
                (year, slots)
            })
            .collect()
    }
}

/// Oferta normalizada
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Offering {
    years: BTreeMap<u8, Vec<OccupiedSlot>>,
}

impl Offering {
    pub fn new(years: BTreeMap<u8, Vec<OccupiedSlot>>) -> Self {
        Self { years }
    }

    pub fn items(&self, year: u8) -> &[OccupiedSlot] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Turno de cada año mostrado
    pub fn shifts(&self) -> Vec<(u8, ShiftKey)> {
        OFFERING_YEARS
            .iter()
            .map(|&year| (year, pick_shift(self.items(year))))
            .collect()
    }
}

impl From<OfferingResponse> for Offering {
    fn from(response: OfferingResponse) -> Self {
        Self::new(response.into_years())
    }
}

/// Turno de un año: mayoría entre mañana/tarde/vespertino (empate → el primero)
pub fn pick_shift(items: &[OccupiedSlot]) -> ShiftKey {
    let counts = ShiftKey::WEEKDAY.map(|key| items.iter().filter(|item| item.shift == Some(key)).count());

    if counts.iter().any(|&count| count > 0) {
        let mut best = 0;
        for (index, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = index;
            }
        }
        return ShiftKey::WEEKDAY[best];
    }

    let mut starts: Vec<_> = items.iter().map(|item| item.from).collect();
    starts.sort();
    match starts.get(starts.len() / 2) {
        Some(median) if median.hour() >= 18 => ShiftKey::Vespertino,
        Some(median) if median.hour() >= 13 => ShiftKey::Tarde,
        _ => ShiftKey::Manana,
    }
}

/// Filtro estricto: solo los ítems cuyo turno es exactamente `shift`
/// (los que no traen turno tampoco se pintan)
pub fn matching_shift(items: &[OccupiedSlot], shift: ShiftKey) -> Vec<OccupiedSlot> {
    items.iter().filter(|item| item.shift == Some(shift)).cloned().collect()
}

/// "Profesorado • Plan: 2015 • Turno: Mañana" (se omiten las partes vacías)
pub fn sheet_meta(program: &str, plan: &str, shift: ShiftKey) -> String {
    let program = program.trim();
    let plan = plan.trim();
    let mut parts = Vec::new();
    if !program.is_empty() {
        parts.push(program.to_string());
    }
    if !plan.is_empty() {
        parts.push(format!("Plan: {}", plan));
    }
    parts.push(format!("Turno: {}", shift.label()));
    parts.join(" • ")
}

/// Título del documento al imprimir
pub fn print_title(program: &str, plan: &str) -> String {
    let plan = plan.trim();
    if plan.is_empty() {
        format!("Horarios - {}", program.trim())
    } else {
        format!("Horarios - {} - {}", program.trim(), plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::day::Day;
    use crate::models::time::parse_hhmm;

    fn item(hhmm: &str, shift: Option<ShiftKey>) -> OccupiedSlot {
        let mut slot = OccupiedSlot::new(Day::Monday, parse_hhmm(hhmm).unwrap());
        slot.shift = shift;
        slot
    }

    #[test]
    fn test_years_from_server_payload() {
        let body = r#"{
            "1": [{"dia":"lu","inicio":"07:45:00","fin":"08:25","turno":"Mañana","materia":"Pedagogía","docente":"Pérez","aula":"12"}],
            "2": [],
            "3": null
        }"#;
        let offering: Offering = serde_json::from_str::<OfferingResponse>(body).unwrap().into();

        assert_eq!(offering.total(), 1);
        let first = &offering.items(1)[0];
        assert_eq!(first.day, Day::Monday);
        assert_eq!(first.shift, Some(ShiftKey::Manana));
        assert_eq!(first.detail.teacher.as_deref(), Some("Pérez"));
        assert!(offering.items(3).is_empty());
        assert!(offering.items(4).is_empty());
    }

    #[test]
    fn test_majority_shift_wins() {
        let items = vec![
            item("13:00", Some(ShiftKey::Tarde)),
            item("13:40", Some(ShiftKey::Tarde)),
            item("07:45", Some(ShiftKey::Manana)),
            item("09:00", None),
        ];
        assert_eq!(pick_shift(&items), ShiftKey::Tarde);
    }

    #[test]
    fn test_tie_goes_to_the_earlier_shift() {
        let items = vec![item("18:30", Some(ShiftKey::Vespertino)), item("13:00", Some(ShiftKey::Tarde))];
        assert_eq!(pick_shift(&items), ShiftKey::Tarde);
    }

    #[test]
    fn test_median_start_when_no_item_has_a_shift() {
        assert_eq!(pick_shift(&[item("07:45", None), item("12:59", None)]), ShiftKey::Manana);
        assert_eq!(pick_shift(&[item("07:45", None), item("14:00", None), item("15:20", None)]), ShiftKey::Tarde);
        assert_eq!(pick_shift(&[item("18:00", None)]), ShiftKey::Vespertino);
        assert_eq!(pick_shift(&[]), ShiftKey::Manana);
        // el sábado no cuenta como turno de un año
        assert_eq!(pick_shift(&[item("19:00", Some(ShiftKey::Sabado))]), ShiftKey::Vespertino);
    }

    #[test]
    fn test_strict_filter_drops_other_and_missing_shifts() {
        let items = vec![
            item("07:45", Some(ShiftKey::Manana)),
            item("13:00", Some(ShiftKey::Tarde)),
            item("08:25", None),
        ];
        let kept = matching_shift(&items, ShiftKey::Manana);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].from, parse_hhmm("07:45").unwrap());
    }

    #[test]
    fn test_meta_and_print_title() {
        assert_eq!(
            sheet_meta("Profesorado de Historia", "2015", ShiftKey::Manana),
            "Profesorado de Historia • Plan: 2015 • Turno: Mañana"
        );
        assert_eq!(sheet_meta("", "", ShiftKey::Tarde), "Turno: Tarde");
        assert_eq!(print_title("Historia", ""), "Horarios - Historia");
        assert_eq!(print_title("Historia", "2015"), "Horarios - Historia - 2015");
    }
}
