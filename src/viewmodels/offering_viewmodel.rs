// ============================================================================
// OFFERING VIEWMODEL - Oferta por profesorado (una hoja por año)
// ============================================================================
// Carrera + plan opcional → oferta agrupada por año → turno de cada año →
// grilla de ese turno (lunes a sábado) → solo se pintan los ítems de ese
// turno. Sin datos se muestra el mensaje de vacío.
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use crate::dom::{
    append_child, clear_children, fill_select, get_element_by_id, on_change, on_click, print_page, select_value,
    selected_text, set_document_title, ElementBuilder, EventListener,
};
use crate::models::day::Day;
use crate::models::grid::GridModel;
use crate::models::offering::{matching_shift, print_title, sheet_meta, Offering};
use crate::models::shift::ShiftKey;
use crate::models::sync::OccupiedSlot;
use crate::services::{ApiClient, LayoutService};
use crate::state::Generation;
use crate::utils::constants::{
    EMPTY_OPTION_LABEL, OFFERING_EMPTY_LABEL, OFFERING_PRINT_ID, OFFERING_SHEETS_ID, PLAN_SELECT_ID,
    PROGRAM_SELECT_ID,
};
use crate::viewmodels::schedule_viewmodel::render_schedule;

/// Ítems que se pintan en la hoja de un año
pub fn sheet_items(offering: &Offering, year: u8, shift: ShiftKey) -> Vec<OccupiedSlot> {
    matching_shift(offering.items(year), shift)
}

fn render_empty(host: &Element) -> Result<(), JsValue> {
    clear_children(host);
    let empty = ElementBuilder::new("div")?.class("empty").text(OFFERING_EMPTY_LABEL).build();
    append_child(host, &empty)
}

fn render_sheet(container: &Element, year: u8, meta: &str, model: &GridModel, items: &[OccupiedSlot]) -> Result<usize, JsValue> {
    let body = ElementBuilder::new("div")?.class("sheet__body").build();
    let sheet = ElementBuilder::new("div")?
        .class("sheet")
        .attr("data-anio", &year.to_string())?
        .style("break-inside", "avoid")?
        .child(ElementBuilder::new("div")?.class("sheet__title").text(&format!("{}° Año", year)).build())?
        .child(
            ElementBuilder::new("div")?
                .class("sheet__meta")
                .text(meta)
                .style("margin-bottom", "8px")?
                .build(),
        )?
        .child(body.clone())?
        .build();
    append_child(container, &sheet)?;
    render_schedule(&body, model, items)
}

pub struct OfferingViewModel {
    api_client: ApiClient,
    layout_service: LayoutService,
    generation: Generation,
    program: Element,
    plan: Element,
    sheets: Element,
    listeners: RefCell<Vec<EventListener>>,
}

impl OfferingViewModel {
    /// `None` si la página no tiene el contenedor de hojas o los selects
    pub fn mount(api_client: ApiClient, layout_service: LayoutService) -> Result<Option<Rc<Self>>, JsValue> {
        let ids = [PROGRAM_SELECT_ID, PLAN_SELECT_ID, OFFERING_SHEETS_ID];
        let [Some(program), Some(plan), Some(sheets)] = ids.map(get_element_by_id) else {
            return Ok(None);
        };

        let vm = Rc::new(Self {
            api_client,
            layout_service,
            generation: Generation::new(),
            program,
            plan,
            sheets,
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        let handler = Rc::downgrade(&vm);
        listeners.push(on_change(&vm.program, move |_| {
            if let Some(vm) = handler.upgrade() {
                vm.on_program_change();
            }
        })?);
        let handler = Rc::downgrade(&vm);
        listeners.push(on_change(&vm.plan, move |_| {
            if let Some(vm) = handler.upgrade() {
                vm.render();
            }
        })?);
        if let Some(button) = get_element_by_id(OFFERING_PRINT_ID) {
            let handler = Rc::downgrade(&vm);
            listeners.push(on_click(&button, move |_| {
                if let Some(vm) = handler.upgrade() {
                    vm.print();
                }
            })?);
        }
        *vm.listeners.borrow_mut() = listeners;

        vm.on_program_change();
        log::info!("🗓️ [SCHEDULE] Vista de oferta montada");
        Ok(Some(vm))
    }

    pub fn teardown(&self) {
        self.generation.bump();
        self.listeners.borrow_mut().clear();
    }

    fn print(&self) {
        set_document_title(&print_title(&selected_text(&self.program), &selected_text(&self.plan)));
        if let Err(e) = print_page() {
            log::error!("❌ Error imprimiendo: {:?}", e);
        }
    }

    /// Recarga los planes de la carrera y después las hojas
    fn on_program_change(self: &Rc<Self>) {
        let ticket = self.generation.bump();
        let program = select_value(&self.program);
        if let Err(e) = fill_select(&self.plan, EMPTY_OPTION_LABEL, &[], "", false) {
            log::error!("❌ [SCHEDULE] {:?}", e);
        }
        if program.is_empty() {
            self.render();
            return;
        }

        let vm = Rc::clone(self);
        spawn_local(async move {
            let plans = vm.api_client.get_plans(&program).await.unwrap_or_else(|e| {
                log::error!("❌ [SCHEDULE] Error cargando planes: {}", e);
                Vec::new()
            });
            if !vm.generation.is_current(ticket) {
                return;
            }
            if let Err(e) = fill_select(&vm.plan, EMPTY_OPTION_LABEL, &plans, "", true) {
                log::error!("❌ [SCHEDULE] {:?}", e);
            }
            vm.render();
        });
    }

    fn render(self: &Rc<Self>) {
        let ticket = self.generation.bump();
        let program = select_value(&self.program);
        let plan = select_value(&self.plan);
        if program.is_empty() {
            if let Err(e) = render_empty(&self.sheets) {
                log::error!("❌ [SCHEDULE] {:?}", e);
            }
            return;
        }

        let vm = Rc::clone(self);
        spawn_local(async move {
            let offering = vm.api_client.get_program_offering(&program, &plan).await.unwrap_or_else(|e| {
                log::error!("❌ [SCHEDULE] Error cargando la oferta: {}", e);
                Offering::default()
            });
            if !vm.generation.is_current(ticket) {
                return;
            }
            if offering.is_empty() {
                if let Err(e) = render_empty(&vm.sheets) {
                    log::error!("❌ [SCHEDULE] {:?}", e);
                }
                return;
            }

            // Una grilla por turno distinto (LayoutService cachea los bloques)
            let shifts = offering.shifts();
            let mut grids = BTreeMap::new();
            for (_, shift) in &shifts {
                if !grids.contains_key(shift) {
                    let slots = vm.layout_service.slots_for(*shift).await;
                    grids.insert(*shift, GridModel::uniform(&slots, &Day::ALL));
                }
            }
            if !vm.generation.is_current(ticket) {
                return;
            }

            match vm.render_sheets(&offering, &shifts, &grids) {
                Ok(painted) => log::info!("🗓️ [SCHEDULE] Oferta: {} de {} ítems pintados", painted, offering.total()),
                Err(e) => log::error!("❌ [SCHEDULE] Error renderizando la oferta: {:?}", e),
            }
        });
    }

    fn render_sheets(
        &self,
        offering: &Offering,
        shifts: &[(u8, ShiftKey)],
        grids: &BTreeMap<ShiftKey, GridModel>,
    ) -> Result<usize, JsValue> {
        let program_text = selected_text(&self.program);
        let plan_text = selected_text(&self.plan);

        clear_children(&self.sheets);
        let container = ElementBuilder::new("div")?.class("sheets__grid").build();
        append_child(&self.sheets, &container)?;

        let mut painted = 0;
        for &(year, shift) in shifts {
            let Some(model) = grids.get(&shift) else {
                continue;
            };
            let meta = sheet_meta(&program_text, &plan_text, shift);
            painted += render_sheet(&container, year, &meta, model, &sheet_items(offering, year, shift))?;
        }
        Ok(painted)
    }
}
