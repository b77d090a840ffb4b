// ============================================================================
// GRID SESSION - Contexto explícito de UNA grilla montada
// ============================================================================
// Todo lo que antes eran globales del módulo vive acá: combinación, modelo,
// flags de selección, mapa CellKey → <td>, estado de guardado, timers.
// Al cambiar la combinación se hace teardown() y se crea una sesión nueva.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use gloo_timers::callback::Timeout;
use web_sys::Element;
use crate::models::grid::{CellKey, GridModel};
use crate::models::sync::SelectionContext;
use crate::services::poller::Poller;
use crate::state::generation::Generation;
use crate::state::save_state::SaveState;
use crate::state::selection_state::SelectionState;

pub struct GridSession {
    pub context: SelectionContext,
    pub model: GridModel,
    pub selection: RefCell<SelectionState>,
    pub cells: RefCell<HashMap<CellKey, Element>>,
    pub save: SaveState,
    pub generation: Generation,
    issued: u64,
    pub poller: RefCell<Option<Poller>>,
    pub status_timer: RefCell<Option<Timeout>>,
}

impl GridSession {
    pub fn new(context: SelectionContext, model: GridModel, generation: Generation) -> Rc<Self> {
        let selection = SelectionState::from_model(&model);
        let issued = generation.bump();
        Rc::new(Self {
            context,
            model,
            selection: RefCell::new(selection),
            cells: RefCell::new(HashMap::new()),
            save: SaveState::new(),
            generation,
            issued,
            poller: RefCell::new(None),
            status_timer: RefCell::new(None),
        })
    }

    /// false cuando ya hubo otro render o un teardown: la respuesta se descarta
    pub fn is_live(&self) -> bool {
        self.generation.is_current(self.issued)
    }

    /// Celda DOM de una clave (mapa armado una vez por render)
    pub fn cell(&self, key: &CellKey) -> Option<Element> {
        self.cells.borrow().get(key).cloned()
    }

    pub fn set_cells(&self, cells: HashMap<CellKey, Element>) {
        *self.cells.borrow_mut() = cells;
    }

    pub fn set_poller(&self, poller: Poller) {
        *self.poller.borrow_mut() = Some(poller);
    }

    pub fn set_status_timer(&self, timer: Timeout) {
        // El timer anterior se cancela al dropearse
        *self.status_timer.borrow_mut() = Some(timer);
    }

    /// Corta polling y timers e invalida los requests en vuelo
    pub fn teardown(&self) {
        self.generation.bump();
        self.poller.borrow_mut().take();
        self.status_timer.borrow_mut().take();
        self.cells.borrow_mut().clear();
        log::info!("🧹 [GRID] Sesión cerrada para {:?}", self.context);
    }
}
