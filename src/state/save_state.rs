// ============================================================================
// SAVE STATE - Estado del guardado de la grilla
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::sync::SaveStatus;

/// Estado de guardado compartido entre los closures de una sesión
#[derive(Clone)]
pub struct SaveState {
    pub status: Rc<RefCell<SaveStatus>>,
    pub in_flight: Rc<RefCell<usize>>,
}

impl SaveState {
    /// Crear nuevo estado de guardado
    pub fn new() -> Self {
        Self {
            status: Rc::new(RefCell::new(SaveStatus::Idle)),
            in_flight: Rc::new(RefCell::new(0)),
        }
    }

    /// Establecer status
    pub fn set_status(&self, status: SaveStatus) {
        *self.status.borrow_mut() = status;
    }

    /// Obtener status
    pub fn get_status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Marca el inicio de un request de escritura
    pub fn begin(&self) {
        *self.in_flight.borrow_mut() += 1;
        self.set_status(SaveStatus::Saving);
    }

    /// Marca el fin de un request de escritura (ok o error)
    pub fn finish(&self, status: SaveStatus) {
        {
            let mut in_flight = self.in_flight.borrow_mut();
            *in_flight = in_flight.saturating_sub(1);
        }
        self.set_status(status);
    }

    /// Mientras haya escrituras en vuelo no se aplican snapshots del polling
    pub fn is_saving(&self) -> bool {
        *self.in_flight.borrow() > 0
    }

    /// Vuelve a Idle (lo llama el timer del indicador)
    pub fn clear_status(&self) {
        *self.status.borrow_mut() = SaveStatus::Idle;
    }
}

impl Default for SaveState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_counter() {
        let state = SaveState::new();
        state.begin();
        state.begin();
        assert!(state.is_saving());
        assert_eq!(state.get_status(), SaveStatus::Saving);

        state.finish(SaveStatus::saved());
        assert!(state.is_saving());
        state.finish(SaveStatus::error("Sin conexión"));
        assert!(!state.is_saving());
        assert!(state.get_status().is_error());
    }

    #[test]
    fn test_status_timer_goes_back_to_idle() {
        let state = SaveState::new();
        let timer_copy = state.clone();
        state.begin();
        state.finish(SaveStatus::saved());
        assert!(state.get_status().auto_clears());

        timer_copy.clear_status();
        assert_eq!(state.get_status(), SaveStatus::Idle);
        assert!(!state.is_saving());
    }

    #[test]
    fn test_finish_never_underflows() {
        let state = SaveState::new();
        state.finish(SaveStatus::saved());
        assert!(!state.is_saving());
    }
}
