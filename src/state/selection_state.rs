// ============================================================================
// SELECTION STATE - Flags por celda (ocupada / alta pendiente / baja pendiente)
// ============================================================================
// Estado puro, sin DOM. Se arma a partir del GridModel de la sesión y se
// descarta entero cuando cambia la combinación carrera/plan/materia/turno.
//
// deseado = (ocupada && !baja_pendiente) || alta_pendiente
// ============================================================================

use std::collections::BTreeMap;
use chrono::NaiveTime;
use crate::models::grid::{CellKey, GridModel};
use crate::models::sync::{OccupiedSlot, SaveItem, SlotDetail};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellFlags {
    pub occupied: bool,
    pub pending_add: bool,
    pub pending_remove: bool,
}

impl CellFlags {
    pub fn desired(&self) -> bool {
        (self.occupied && !self.pending_remove) || self.pending_add
    }

    pub fn is_pending(&self) -> bool {
        self.pending_add || self.pending_remove
    }
}

#[derive(Debug, Clone)]
struct CellEntry {
    to: NaiveTime,
    flags: CellFlags,
    detail: Option<SlotDetail>,
}

/// Celdas cuyo estado deseado difiere del servidor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    pub add: Vec<CellKey>,
    pub remove: Vec<CellKey>,
}

impl SelectionDelta {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    cells: BTreeMap<CellKey, CellEntry>,
}

impl SelectionState {
    /// Una entrada por cada celda direccionable (los recreos nunca entran)
    pub fn from_model(model: &GridModel) -> Self {
        let cells = model
            .addressable()
            .map(|(key, to)| (key, CellEntry { to, flags: CellFlags::default(), detail: None }))
            .collect();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn flags(&self, key: &CellKey) -> Option<CellFlags> {
        self.cells.get(key).map(|entry| entry.flags)
    }

    pub fn detail(&self, key: &CellKey) -> Option<&SlotDetail> {
        self.cells.get(key).and_then(|entry| entry.detail.as_ref())
    }

    /// Click en una celda. Devuelve el nuevo estado deseado,
    /// o `None` si la celda no existe (recreo, hueco o clave desconocida).
    pub fn toggle(&mut self, key: &CellKey) -> Option<bool> {
        let entry = self.cells.get_mut(key)?;
        let flags = &mut entry.flags;
        if flags.occupied {
            flags.pending_remove = !flags.pending_remove;
        } else {
            flags.pending_add = !flags.pending_add;
        }
        Some(flags.desired())
    }

    /// Reemplaza el estado del servidor. Limpia todos los pendientes.
    /// Devuelve cuántos ítems del snapshot coincidieron con una celda.
    pub fn apply_server_snapshot(&mut self, occupied: &[OccupiedSlot]) -> usize {
        for entry in self.cells.values_mut() {
            entry.flags = CellFlags::default();
            entry.detail = None;
        }

        let mut matched = 0;
        for slot in occupied {
            match self.cells.get_mut(&slot.key()) {
                Some(entry) => {
                    entry.flags.occupied = true;
                    entry.detail = (!slot.detail.is_empty()).then(|| slot.detail.clone());
                    matched += 1;
                }
                None => log::debug!("[GRID] ocupada sin celda: {} {}", slot.day, slot.from),
            }
        }
        matched
    }

    pub fn delta(&self) -> SelectionDelta {
        let mut delta = SelectionDelta::default();
        for (key, entry) in &self.cells {
            match (entry.flags.occupied, entry.flags.desired()) {
                (false, true) => delta.add.push(*key),
                (true, false) => delta.remove.push(*key),
                _ => {}
            }
        }
        delta
    }

    /// Conjunto completo deseado, ordenado por (día, inicio)
    pub fn desired_set(&self) -> Vec<(CellKey, NaiveTime)> {
        self.cells
            .iter()
            .filter(|(_, entry)| entry.flags.desired())
            .map(|(key, entry)| (*key, entry.to))
            .collect()
    }

    /// Ítems del guardado completo
    pub fn save_items(&self) -> Vec<SaveItem> {
        self.desired_set()
            .into_iter()
            .map(|(key, to)| SaveItem { dia: key.day, inicio: key.from, fin: to })
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.cells.values().filter(|entry| entry.flags.desired()).count()
    }

    /// Deshace el pendiente de una celda (guardado fallido). `occupied` no se toca.
    pub fn revert(&mut self, key: &CellKey) -> bool {
        match self.cells.get_mut(key) {
            Some(entry) => {
                entry.flags.pending_add = false;
                entry.flags.pending_remove = false;
                true
            }
            None => false,
        }
    }

    /// Deshace todos los pendientes
    pub fn clear_pending(&mut self) {
        for entry in self.cells.values_mut() {
            entry.flags.pending_add = false;
            entry.flags.pending_remove = false;
        }
    }

    /// El servidor confirmó `persisted` para una celda. Un click posterior
    /// que todavía no se guardó queda como pendiente sobre el nuevo valor.
    pub fn commit(&mut self, key: &CellKey, persisted: bool) {
        if let Some(entry) = self.cells.get_mut(key) {
            let desired = entry.flags.desired();
            entry.flags = CellFlags {
                occupied: persisted,
                pending_add: desired && !persisted,
                pending_remove: !desired && persisted,
            };
            if !persisted {
                entry.detail = None;
            }
        }
    }

    /// Guardado completo aceptado: `saved` es exactamente lo que quedó en el servidor
    pub fn commit_saved(&mut self, saved: &[CellKey]) {
        let keys: Vec<CellKey> = self.cells.keys().copied().collect();
        for key in keys {
            self.commit(&key, saved.contains(&key));
        }
    }

    /// Marca todo para borrar (botón "Limpiar")
    pub fn deselect_all(&mut self) {
        for entry in self.cells.values_mut() {
            entry.flags.pending_add = false;
            entry.flags.pending_remove = entry.flags.occupied;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.cells.values().any(|entry| entry.flags.is_pending())
    }

    /// Un guardado completo que borraría algo ya guardado pide confirmación
    pub fn needs_confirmation(&self) -> bool {
        self.cells
            .values()
            .any(|entry| entry.flags.occupied && !entry.flags.desired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::day::Day;
    use crate::models::grid::LayoutMode;
    use crate::models::shift::{build_slots, ShiftDefinition, ShiftKey};
    use crate::models::time::parse_hhmm;

    fn hm(value: &str) -> NaiveTime {
        parse_hhmm(value).unwrap()
    }

    fn morning_state() -> SelectionState {
        let slots = build_slots(&ShiftDefinition::embedded(ShiftKey::Manana), 40);
        SelectionState::from_model(&GridModel::for_editor(&slots, None, LayoutMode::Split))
    }

    #[test]
    fn test_breaks_are_not_addressable() {
        let mut state = morning_state();
        assert_eq!(state.len(), 5 * 7);
        assert_eq!(state.toggle(&CellKey::new(Day::Monday, hm("09:05"))), None);
        assert_eq!(state.toggle(&CellKey::new(Day::Saturday, hm("07:45"))), None);
    }

    #[test]
    fn test_toggle_twice_restores_flags() {
        let mut state = morning_state();
        let key = CellKey::new(Day::Monday, hm("07:45"));
        state.apply_server_snapshot(&[OccupiedSlot::new(Day::Monday, hm("07:45"))]);
        let before = state.flags(&key);

        assert_eq!(state.toggle(&key), Some(false));
        assert_eq!(state.toggle(&key), Some(true));
        assert_eq!(state.flags(&key), before);
    }

    #[test]
    fn test_snapshot_clears_pending_and_unmatched() {
        let mut state = morning_state();
        state.toggle(&CellKey::new(Day::Friday, hm("11:25")));
        let matched = state.apply_server_snapshot(&[
            OccupiedSlot::new(Day::Tuesday, hm("08:25")),
            OccupiedSlot::new(Day::Saturday, hm("09:00")),
        ]);
        assert_eq!(matched, 1);
        assert!(state.delta().is_empty());
        assert!(!state.is_dirty());
        assert_eq!(state.selected_count(), 1);
    }

    #[test]
    fn test_delta_and_desired_set() {
        let mut state = morning_state();
        let kept = CellKey::new(Day::Monday, hm("07:45"));
        let dropped = CellKey::new(Day::Monday, hm("08:25"));
        let added = CellKey::new(Day::Tuesday, hm("08:25"));
        state.apply_server_snapshot(&[
            OccupiedSlot::new(Day::Monday, hm("07:45")),
            OccupiedSlot::new(Day::Monday, hm("08:25")),
        ]);

        state.toggle(&dropped);
        state.toggle(&added);

        assert_eq!(state.delta(), SelectionDelta { add: vec![added], remove: vec![dropped] });
        assert_eq!(
            state.desired_set(),
            vec![(kept, hm("08:25")), (added, hm("09:05"))]
        );
        assert!(state.needs_confirmation());
    }

    #[test]
    fn test_revert_leaves_occupied_untouched() {
        let mut state = morning_state();
        let key = CellKey::new(Day::Wednesday, hm("09:15"));
        state.apply_server_snapshot(&[OccupiedSlot::new(Day::Wednesday, hm("09:15"))]);
        state.toggle(&key);
        assert!(state.revert(&key));
        assert_eq!(
            state.flags(&key),
            Some(CellFlags { occupied: true, pending_add: false, pending_remove: false })
        );
    }

    #[test]
    fn test_commit_moves_desired_into_occupied() {
        let mut state = morning_state();
        let key = CellKey::new(Day::Thursday, hm("10:45"));
        let sent = state.toggle(&key).unwrap();
        state.commit(&key, sent);
        assert_eq!(state.flags(&key).map(|f| (f.occupied, f.is_pending())), Some((true, false)));
    }

    #[test]
    fn test_overlapping_toggles_keep_the_confirmed_value() {
        let mut state = morning_state();
        let key = CellKey::new(Day::Tuesday, hm("11:25"));
        let first = state.toggle(&key).unwrap();
        let second = state.toggle(&key).unwrap();
        assert!(first && !second);

        // llega el ok del primer toggle: el servidor tiene la celda
        state.commit(&key, first);
        let flags = state.flags(&key).unwrap();
        assert!(flags.occupied);
        assert!(!flags.desired());

        // el segundo falla: se vuelve a lo confirmado, no a "libre"
        state.revert(&key);
        assert_eq!(
            state.flags(&key),
            Some(CellFlags { occupied: true, pending_add: false, pending_remove: false })
        );
    }

    #[test]
    fn test_commit_saved_keeps_edits_made_during_the_save() {
        let mut state = morning_state();
        let saved = CellKey::new(Day::Monday, hm("07:45"));
        let late = CellKey::new(Day::Monday, hm("08:25"));
        state.toggle(&saved);
        let items: Vec<CellKey> = state.desired_set().into_iter().map(|(key, _)| key).collect();

        state.toggle(&late);
        state.commit_saved(&items);

        assert_eq!(state.flags(&saved).map(|f| (f.occupied, f.is_pending())), Some((true, false)));
        assert_eq!(state.flags(&late).map(|f| (f.occupied, f.pending_add)), Some((false, true)));
        assert!(state.is_dirty());
    }

    #[test]
    fn test_deselect_all_marks_occupied_for_removal() {
        let mut state = morning_state();
        state.apply_server_snapshot(&[OccupiedSlot::new(Day::Monday, hm("07:45"))]);
        state.toggle(&CellKey::new(Day::Friday, hm("07:45")));
        state.deselect_all();
        assert_eq!(state.selected_count(), 0);
        assert!(state.save_items().is_empty());
        assert!(state.needs_confirmation());
    }
}
