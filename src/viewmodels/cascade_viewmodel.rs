// ============================================================================
// CASCADE VIEWMODEL - Selects carrera → plan → materia → turno del editor
// ============================================================================
// La lógica está en CascadeState; acá solo se conectan eventos del DOM,
// requests de opciones y la grilla.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use crate::dom::{get_element_by_id, on_change, read_options, select_value, window, EventListener};
use crate::models::options::OptionItem;
use crate::services::{ApiClient, ApiError};
use crate::state::cascade_state::{seed_shift_options, CascadeState, FetchRequest, Level, LoadOutcome, Prefill};
use crate::utils::constants::{PLAN_SELECT_ID, PROGRAM_SELECT_ID, SHIFT_SELECT_ID, SUBJECT_SELECT_ID};
use crate::viewmodels::grid_viewmodel::GridViewModel;
use crate::views::{render_selectors, SelectorElements};

/// Valor global que deja la plantilla (`initialSelectedPlanId = 3`, etc.)
fn page_value(name: &str) -> Option<String> {
    let window = window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    let text = value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))?;
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

pub struct CascadeViewModel {
    api_client: ApiClient,
    state: RefCell<CascadeState>,
    selects: SelectorElements,
    grid: Rc<GridViewModel>,
    listeners: RefCell<Vec<EventListener>>,
}

impl CascadeViewModel {
    /// `None` si la página no tiene los cuatro selects
    pub fn mount(api_client: ApiClient, grid: Rc<GridViewModel>) -> Result<Option<Rc<Self>>, JsValue> {
        let elements = [PROGRAM_SELECT_ID, PLAN_SELECT_ID, SUBJECT_SELECT_ID, SHIFT_SELECT_ID]
            .map(get_element_by_id);
        let [Some(program), Some(plan), Some(subject), Some(shift)] = elements else {
            log::warn!("⚠️ [CASCADE] Faltan selects en la página, no se monta la cascada");
            return Ok(None);
        };

        let program_options: Vec<OptionItem> = read_options(&program)
            .into_iter()
            .filter(|option| !option.id.is_empty())
            .collect();
        let shift_options = seed_shift_options(&read_options(&shift));

        // Lo que vino seleccionado en el HTML o en las globals de la plantilla
        let prefill = Prefill {
            program: page_value("initialSelectedCarreraId").or_else(|| non_empty(select_value(&program))),
            plan: page_value("initialSelectedPlanId").or_else(|| non_empty(select_value(&plan))),
            subject: page_value("initialSelectedMateriaId").or_else(|| non_empty(select_value(&subject))),
            shift: page_value("initialSelectedTurnoValue").or_else(|| non_empty(select_value(&shift))),
        };
        log::info!("🔗 [CASCADE] {} carreras, precarga {:?}", program_options.len(), prefill);

        let vm = Rc::new(Self {
            api_client,
            state: RefCell::new(CascadeState::new(program_options, shift_options).with_prefill(prefill)),
            selects: SelectorElements { elements: [program, plan, subject, shift] },
            grid,
            listeners: RefCell::new(Vec::new()),
        });

        for level in Level::ALL {
            let handler_vm = Rc::downgrade(&vm);
            let listener = on_change(vm.selects.get(level), move |_| {
                if let Some(vm) = handler_vm.upgrade() {
                    vm.on_user_change(level);
                }
            })?;
            vm.listeners.borrow_mut().push(listener);
        }

        render_selectors(&vm.selects, &vm.state.borrow(), Level::Program)?;
        let replay = vm.state.borrow_mut().replay();
        vm.after_change(Level::Program, replay);
        Ok(Some(vm))
    }

    /// Suelta los listeners de los selects
    pub fn teardown(&self) {
        self.listeners.borrow_mut().clear();
    }

    fn on_user_change(self: &Rc<Self>, level: Level) {
        let value = select_value(self.selects.get(level));
        log::debug!("[CASCADE] {:?} = {:?}", level, value);
        let request = self.state.borrow_mut().user_change(level, &value);
        self.after_change(level, request);
    }

    fn after_change(self: &Rc<Self>, level: Level, request: Option<FetchRequest>) {
        if let Err(e) = render_selectors(&self.selects, &self.state.borrow(), level) {
            log::error!("❌ [CASCADE] Error actualizando selects: {:?}", e);
        }
        if let Some(request) = request {
            self.fetch(request);
        }
        self.sync_grid();
    }

    fn fetch(self: &Rc<Self>, request: FetchRequest) {
        let vm = Rc::clone(self);
        spawn_local(async move {
            let result: Result<Vec<OptionItem>, ApiError> = match request.level {
                Level::Plan => vm.api_client.get_plans(&request.parent).await,
                Level::Subject => vm.api_client.get_subjects(&request.parent).await,
                Level::Program | Level::Shift => Ok(Vec::new()),
            };

            let outcome = match result {
                Ok(options) => vm.state.borrow_mut().options_loaded(request.level, request.generation, options),
                Err(e) => {
                    log::error!("❌ [CASCADE] Error cargando {:?}: {}", request.level, e);
                    vm.state.borrow_mut().options_failed(request.level, request.generation)
                }
            };

            match outcome {
                LoadOutcome::Stale => {}
                LoadOutcome::AutoSelected { next, .. } | LoadOutcome::Prefilled { next, .. } => {
                    vm.after_change(request.level, next);
                }
                LoadOutcome::Halted | LoadOutcome::Ready => vm.after_change(request.level, None),
            }
        });
    }

    /// Muestra u oculta la grilla según la combinación actual
    fn sync_grid(&self) {
        let context = self.state.borrow().context();
        if context.shift_key().is_none() {
            // También invalida una grilla que todavía se esté cargando
            self.grid.clear();
            return;
        }
        if self.grid.current_context().as_ref() != Some(&context) {
            self.grid.show(context);
        }
    }
}
