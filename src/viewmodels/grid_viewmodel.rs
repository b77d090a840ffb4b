// ============================================================================
// GRID VIEWMODEL - Editor de grilla (clicks, autoguardado, polling)
// ============================================================================
// Flujo: combinación → bloques del turno → render → snapshot del servidor →
// clicks optimistas → persistencia (toggle o guardado completo) → revert
// si el servidor rechaza. Cada combinación vive en su propia GridSession.
// Los clicks llegan por un único listener delegado en el contenedor.
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::Event;
use crate::config::{AppConfig, SaveMode};
use crate::dom::{clear_children, closest_target, confirm, get_element_by_id, on_click, EventListener};
use crate::models::grid::{CellKey, GridModel};
use crate::models::shift::ShiftKey;
use crate::models::sync::{SaveStatus, SelectionContext};
use crate::services::{ApiClient, LayoutService, Poller, SyncService};
use crate::state::{Generation, GridSession};
use crate::utils::constants::{CLEAR_BUTTON_ID, EDITOR_GRID_ID, SAVE_BUTTON_ID};
use crate::views::{paint_cell, render_grid, render_status, update_counter};

const CONFIRM_REPLACE: &str = "Se van a quitar bloques ya guardados para esta materia. ¿Continuar?";
const CONFIRM_CLEAR: &str = "Se va a borrar toda la grilla guardada para esta materia. ¿Continuar?";
const CELL_SELECTOR: &str = "td[data-day][data-from]";

/// ¿Se puede pisar la selección local con un snapshot del servidor?
///
/// Nunca con escrituras en vuelo. En modo explícito tampoco con clicks
/// sin guardar: el refresco se posterga hasta el próximo "Guardar".
pub fn snapshot_allowed(save_mode: SaveMode, saving: bool, dirty: bool) -> bool {
    !saving && !(save_mode == SaveMode::Explicit && dirty)
}

pub struct GridViewModel {
    config: AppConfig,
    sync_service: SyncService,
    layout_service: LayoutService,
    generation: Generation,
    session: RefCell<Option<Rc<GridSession>>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl GridViewModel {
    pub fn new(config: AppConfig, api_client: ApiClient) -> Rc<Self> {
        let layout_service = LayoutService::new(
            api_client.clone(),
            config.grid.layout_source,
            config.grid.block_minutes,
        );
        Rc::new(Self {
            config,
            sync_service: SyncService::new(api_client),
            layout_service,
            generation: Generation::new(),
            session: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn current_context(&self) -> Option<SelectionContext> {
        self.session.borrow().as_ref().map(|session| session.context.clone())
    }

    /// Listener delegado de la grilla y botones "Guardar" / "Limpiar".
    /// Se registran una sola vez; el teardown los suelta.
    pub fn mount_controls(self: &Rc<Self>) -> Result<(), wasm_bindgen::JsValue> {
        let mut listeners = Vec::new();

        if let Some(host) = get_element_by_id(EDITOR_GRID_ID) {
            let vm = Rc::downgrade(self);
            listeners.push(on_click(&host, move |event| Self::on_grid_click(&vm, &event))?);
        }
        if let Some(button) = get_element_by_id(SAVE_BUTTON_ID) {
            let vm = Rc::downgrade(self);
            listeners.push(on_click(&button, move |_| {
                if let Some(vm) = vm.upgrade() {
                    vm.save_all();
                }
            })?);
        }
        if let Some(button) = get_element_by_id(CLEAR_BUTTON_ID) {
            let vm = Rc::downgrade(self);
            listeners.push(on_click(&button, move |_| {
                if let Some(vm) = vm.upgrade() {
                    vm.clear_all();
                }
            })?);
        }

        self.listeners.borrow_mut().extend(listeners);
        Ok(())
    }

    /// Cierra la sesión actual y vacía la grilla
    pub fn clear(&self) {
        self.generation.bump();
        if let Some(session) = self.session.borrow_mut().take() {
            session.teardown();
        }
        if let Some(host) = get_element_by_id(EDITOR_GRID_ID) {
            clear_children(&host);
        }
        update_counter(0);
    }

    /// Muestra la grilla de una combinación (re-render completo)
    pub fn show(self: &Rc<Self>, context: SelectionContext) {
        let Some(shift) = context.shift_key() else {
            log::warn!("⚠️ [GRID] Turno desconocido: {:?}", context.shift);
            self.clear();
            return;
        };

        self.clear();
        let ticket = self.generation.current();
        let vm = Rc::clone(self);

        spawn_local(async move {
            let weekday = vm.layout_service.slots_for(shift).await;
            let saturday = if vm.config.grid.include_saturday && !shift.is_saturday() {
                Some(vm.layout_service.slots_for(ShiftKey::Sabado).await)
            } else {
                None
            };

            if !vm.generation.is_current(ticket) {
                log::debug!("[GRID] Combinación cambiada mientras se cargaban los bloques");
                return;
            }

            let model = GridModel::for_editor(&weekday, saturday.as_deref(), vm.config.grid.layout_mode);
            let session = GridSession::new(context, model, vm.generation.clone());
            if let Err(e) = Self::mount_session(&session) {
                log::error!("❌ [GRID] Error renderizando la grilla: {:?}", e);
                return;
            }
            *vm.session.borrow_mut() = Some(Rc::clone(&session));

            if session.context.is_complete() {
                vm.refresh(&session, false);
                vm.start_polling(&session);
            }
        });
    }

    fn mount_session(session: &Rc<GridSession>) -> Result<(), wasm_bindgen::JsValue> {
        let Some(host) = get_element_by_id(EDITOR_GRID_ID) else {
            log::warn!("⚠️ [GRID] No existe #{} en la página", EDITOR_GRID_ID);
            return Ok(());
        };

        let cells = render_grid(&host, &session.model, true)?;
        log::info!("📅 [GRID] {} celdas para {:?}", cells.len(), session.context);
        session.set_cells(cells);
        Self::paint_all(session);
        Ok(())
    }

    fn on_grid_click(vm: &Weak<Self>, event: &Event) {
        let Some(vm) = vm.upgrade() else {
            return;
        };
        let Some(cell) = closest_target(event, CELL_SELECTOR) else {
            return;
        };
        let key = match (cell.get_attribute("data-day"), cell.get_attribute("data-from")) {
            (Some(day), Some(from)) => CellKey::from_data(&day, &from),
            _ => None,
        };
        let session = vm.session.borrow().clone();
        if let (Some(key), Some(session)) = (key, session) {
            if session.cell(&key).is_some() {
                vm.on_cell_click(&session, key);
            }
        }
    }

    fn paint_all(session: &GridSession) {
        let selection = session.selection.borrow();
        for (key, cell) in session.cells.borrow().iter() {
            if let Some(flags) = selection.flags(key) {
                if let Err(e) = paint_cell(cell, flags, selection.detail(key)) {
                    log::warn!("⚠️ [GRID] No se pudo pintar {:?}: {:?}", key, e);
                }
            }
        }
        update_counter(selection.selected_count());
    }

    fn paint_one(session: &GridSession, key: &CellKey) {
        let selection = session.selection.borrow();
        if let (Some(cell), Some(flags)) = (session.cell(key), selection.flags(key)) {
            if let Err(e) = paint_cell(&cell, flags, selection.detail(key)) {
                log::warn!("⚠️ [GRID] No se pudo pintar {:?}: {:?}", key, e);
            }
        }
        update_counter(selection.selected_count());
    }

    fn on_cell_click(self: &Rc<Self>, session: &Rc<GridSession>, key: CellKey) {
        let toggled = session.selection.borrow_mut().toggle(&key);
        let Some(selected) = toggled else {
            return;
        };
        Self::paint_one(session, &key);

        if self.config.grid.save_mode != SaveMode::Autosave || !session.context.is_complete() {
            return;
        }

        let vm = Rc::clone(self);
        let session = Rc::clone(session);
        session.save.begin();
        vm.show_status(&session, SaveStatus::Saving);

        spawn_local(async move {
            let result = vm.sync_service.persist_toggle(&session.context, key, selected).await;
            if !session.is_live() {
                return;
            }

            let status = match result {
                Ok(Some(outcome)) => {
                    // Se confirma lo que viajó en ESTE request, no el estado actual de la celda
                    session.selection.borrow_mut().commit(&key, selected);
                    log::debug!("💾 [SYNC] Toggle ok, {} bloques guardados", outcome.saved_count);
                    SaveStatus::saved()
                }
                Ok(None) => SaveStatus::Idle,
                Err(e) => {
                    log::error!("❌ [SYNC] Toggle rechazado: {}", e);
                    session.selection.borrow_mut().revert(&key);
                    SaveStatus::error(e.user_message())
                }
            };
            session.save.finish(status.clone());
            Self::paint_one(&session, &key);
            vm.show_status(&session, status);
        });
    }

    /// Guardado completo (modo explícito): reemplaza todo lo guardado
    pub fn save_all(self: &Rc<Self>) {
        let Some(session) = self.session.borrow().clone() else {
            return;
        };
        if !session.context.is_complete() {
            return;
        }
        if session.selection.borrow().needs_confirmation() && !confirm(CONFIRM_REPLACE) {
            return;
        }
        self.persist_full(&session);
    }

    /// Botón "Limpiar": borra toda la combinación en el servidor
    pub fn clear_all(self: &Rc<Self>) {
        let Some(session) = self.session.borrow().clone() else {
            return;
        };
        if !session.context.is_complete() || !confirm(CONFIRM_CLEAR) {
            return;
        }
        session.selection.borrow_mut().deselect_all();
        Self::paint_all(&session);
        self.persist_full(&session);
    }

    fn persist_full(self: &Rc<Self>, session: &Rc<GridSession>) {
        let items = session.selection.borrow().save_items();
        let saved: Vec<CellKey> = items.iter().map(|item| CellKey::new(item.dia, item.inicio)).collect();
        let vm = Rc::clone(self);
        let session = Rc::clone(session);
        session.save.begin();
        vm.show_status(&session, SaveStatus::Saving);

        spawn_local(async move {
            let result = vm.sync_service.persist(&session.context, items).await;
            if !session.is_live() {
                return;
            }

            match result {
                Ok(outcome) => {
                    if let Some(outcome) = outcome {
                        log::info!("💾 [SYNC] Guardado completo: {} bloques", outcome.saved_count);
                    }
                    session.selection.borrow_mut().commit_saved(&saved);
                    session.save.finish(SaveStatus::saved());
                    Self::paint_all(&session);
                    vm.show_status(&session, SaveStatus::saved());
                    // Snapshot fresco para quedar alineados con el servidor
                    vm.refresh(&session, true);
                }
                Err(e) => {
                    log::error!("❌ [SYNC] Guardado rechazado: {}", e);
                    session.selection.borrow_mut().clear_pending();
                    let status = SaveStatus::error(e.user_message());
                    session.save.finish(status.clone());
                    Self::paint_all(&session);
                    vm.show_status(&session, status);
                }
            }
        });
    }

    fn can_apply_snapshot(&self, session: &GridSession) -> bool {
        snapshot_allowed(
            self.config.grid.save_mode,
            session.save.is_saving(),
            session.selection.borrow().is_dirty(),
        )
    }

    /// Trae el snapshot del servidor y lo aplica (salvo escrituras en vuelo
    /// o cambios sin guardar)
    fn refresh(self: &Rc<Self>, session: &Rc<GridSession>, silent: bool) {
        if !self.can_apply_snapshot(session) {
            log::debug!("[SYNC] Hay cambios locales, se saltea el refresco");
            return;
        }

        let vm = Rc::clone(self);
        let session = Rc::clone(session);
        spawn_local(async move {
            let result = vm.sync_service.fetch_current(&session.context).await;
            // El usuario pudo haber clickeado mientras tanto
            if !session.is_live() || !vm.can_apply_snapshot(&session) {
                return;
            }

            match result {
                Ok(Some(occupied)) => {
                    let matched = session.selection.borrow_mut().apply_server_snapshot(&occupied);
                    if matched < occupied.len() {
                        log::warn!("⚠️ [SYNC] {} bloques del servidor no están en la grilla", occupied.len() - matched);
                    }
                    Self::paint_all(&session);
                    if !silent {
                        vm.show_status(&session, SaveStatus::synced());
                    }
                }
                Ok(None) => {}
                Err(e) if e.is_network() => {
                    log::warn!("📴 [SYNC] Sin conexión, se reintenta en el próximo ciclo");
                    if !silent {
                        vm.show_status(&session, SaveStatus::error(e.user_message()));
                    }
                }
                Err(e) => {
                    log::error!("❌ [SYNC] Error trayendo la grilla: {}", e);
                    if !silent {
                        vm.show_status(&session, SaveStatus::error(e.user_message()));
                    }
                }
            }
        });
    }

    fn start_polling(self: &Rc<Self>, session: &Rc<GridSession>) {
        let vm = Rc::downgrade(self);
        let weak = Rc::downgrade(session);
        let poller = Poller::start(self.config.grid.poll_interval_ms, move || {
            if let (Some(vm), Some(session)) = (vm.upgrade(), weak.upgrade()) {
                if session.is_live() {
                    vm.refresh(&session, true);
                }
            }
        });
        session.set_poller(poller);
    }

    fn show_status(&self, session: &Rc<GridSession>, status: SaveStatus) {
        session.save.set_status(status.clone());
        if let Err(e) = render_status(&status) {
            log::warn!("⚠️ [SYNC] Indicador no disponible: {:?}", e);
        }

        if status.auto_clears() {
            let save = session.save.clone();
            let timer = Timeout::new(self.config.grid.status_clear_ms, move || {
                save.clear_status();
                if let Err(e) = render_status(&SaveStatus::Idle) {
                    log::warn!("⚠️ [SYNC] Indicador no disponible: {:?}", e);
                }
            });
            session.set_status_timer(timer);
        } else {
            session.status_timer.borrow_mut().take();
        }
    }

    /// Teardown completo (unmount): sesión, polling y listeners
    pub fn teardown(&self) {
        self.generation.bump();
        if let Some(session) = self.session.borrow_mut().take() {
            session.teardown();
        }
        self.listeners.borrow_mut().clear();
    }
}
