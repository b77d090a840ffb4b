// ============================================================================
// SCHEDULE VIEWMODEL - Horarios de solo lectura (profesorado y docente)
// ============================================================================
// Misma grilla que el editor pero sin clicks: se pintan los ítems que
// devuelve el servidor en las celdas (día, inicio) que existan.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use crate::dom::{
    clear_children, fill_select, get_element_by_id, on_change, on_click, print_page, read_options, select_value,
    EventListener,
};
use crate::models::day::Day;
use crate::models::grid::GridModel;
use crate::models::options::OptionItem;
use crate::models::shift::ShiftKey;
use crate::models::sync::OccupiedSlot;
use crate::services::{ApiClient, ApiError, LayoutService};
use crate::state::Generation;
use crate::utils::constants::{
    EMPTY_OPTION_LABEL, PROGRAM_VIEW_GRID_ID, PROGRAM_VIEW_PLAN_ID, PROGRAM_VIEW_PRINT_ID, PROGRAM_VIEW_PROGRAM_ID,
    PROGRAM_VIEW_SHIFT_ID, TEACHER_VIEW_GRID_PREFIX, TEACHER_VIEW_PRINT_ID, TEACHER_VIEW_SELECT_ID,
};
use crate::views::{paint_item, render_grid};

/// Columnas de una grilla de solo lectura
pub fn schedule_days(shift: ShiftKey) -> Vec<Day> {
    if shift.is_saturday() {
        vec![Day::Saturday]
    } else {
        Day::WEEKDAYS.to_vec()
    }
}

/// Ítems que caen en una celda de bloque; el resto se ignora
pub fn placeable<'a>(model: &GridModel, items: &'a [OccupiedSlot]) -> Vec<&'a OccupiedSlot> {
    let keys: std::collections::HashSet<_> = model.addressable().map(|(key, _)| key).collect();
    items.iter().filter(|item| keys.contains(&item.key())).collect()
}

fn known_shifts() -> Vec<OptionItem> {
    ShiftKey::ALL
        .iter()
        .map(|key| OptionItem::new(key.as_str(), key.label()))
        .collect()
}

pub(crate) fn render_schedule(host: &Element, model: &GridModel, items: &[OccupiedSlot]) -> Result<usize, JsValue> {
    let cells = render_grid(host, model, false)?;
    let matched = placeable(model, items);
    for item in &matched {
        if let Some(cell) = cells.get(&item.key()) {
            paint_item(cell, &item.detail)?;
        }
    }
    Ok(matched.len())
}

pub(crate) fn wire_print_button(id: &str) -> Result<Option<EventListener>, JsValue> {
    let Some(button) = get_element_by_id(id) else {
        return Ok(None);
    };
    let listener = on_click(&button, |_| {
        if let Err(e) = print_page() {
            log::error!("❌ Error imprimiendo: {:?}", e);
        }
    })?;
    Ok(Some(listener))
}

// ============================================================================
// Horario por profesorado
// ============================================================================

pub struct ProgramScheduleViewModel {
    api_client: ApiClient,
    layout_service: LayoutService,
    generation: Generation,
    program: Element,
    plan: Element,
    shift: Element,
    grid: Element,
    listeners: RefCell<Vec<EventListener>>,
}

impl ProgramScheduleViewModel {
    pub fn mount(api_client: ApiClient, layout_service: LayoutService) -> Result<Option<Rc<Self>>, JsValue> {
        let ids = [PROGRAM_VIEW_PROGRAM_ID, PROGRAM_VIEW_PLAN_ID, PROGRAM_VIEW_SHIFT_ID, PROGRAM_VIEW_GRID_ID];
        let [Some(program), Some(plan), Some(shift), Some(grid)] = ids.map(get_element_by_id) else {
            return Ok(None);
        };

        let vm = Rc::new(Self {
            api_client,
            layout_service,
            generation: Generation::new(),
            program,
            plan,
            shift,
            grid,
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        let handler = Rc::downgrade(&vm);
        listeners.push(on_change(&vm.program, move |_| {
            if let Some(vm) = handler.upgrade() {
                vm.on_program_change();
            }
        })?);
        for select in [&vm.plan, &vm.shift] {
            let handler = Rc::downgrade(&vm);
            listeners.push(on_change(select, move |_| {
                if let Some(vm) = handler.upgrade() {
                    vm.render();
                }
            })?);
        }
        listeners.extend(wire_print_button(PROGRAM_VIEW_PRINT_ID)?);
        *vm.listeners.borrow_mut() = listeners;

        vm.load_programs();
        if !read_options(&vm.shift).iter().any(|option| !option.id.is_empty()) {
            vm.load_shifts();
        }
        log::info!("🗓️ [SCHEDULE] Vista por profesorado montada");
        Ok(Some(vm))
    }

    pub fn teardown(&self) {
        self.generation.bump();
        self.listeners.borrow_mut().clear();
    }

    fn load_programs(self: &Rc<Self>) {
        let vm = Rc::clone(self);
        spawn_local(async move {
            let programs = vm.api_client.get_programs().await.unwrap_or_else(|e| {
                log::error!("❌ [SCHEDULE] Error cargando carreras: {}", e);
                Vec::new()
            });
            if let Err(e) = fill_select(&vm.program, EMPTY_OPTION_LABEL, &programs, "", true) {
                log::error!("❌ [SCHEDULE] {:?}", e);
            }
        });
    }

    /// Turnos del servidor; si no responde, los cuatro conocidos
    fn load_shifts(self: &Rc<Self>) {
        let vm = Rc::clone(self);
        spawn_local(async move {
            let shifts = match vm.api_client.get_shifts().await {
                Ok(shifts) if !shifts.is_empty() => shifts,
                Ok(_) => known_shifts(),
                Err(e) => {
                    log::warn!("⚠️ [SCHEDULE] Sin turnos del servidor ({}), usando los embebidos", e);
                    known_shifts()
                }
            };
            if let Err(e) = fill_select(&vm.shift, EMPTY_OPTION_LABEL, &shifts, "", true) {
                log::error!("❌ [SCHEDULE] {:?}", e);
            }
        });
    }

    fn on_program_change(self: &Rc<Self>) {
        let program = select_value(&self.program);
        if let Err(e) = fill_select(&self.plan, EMPTY_OPTION_LABEL, &[], "", false) {
            log::error!("❌ [SCHEDULE] {:?}", e);
        }
        if program.is_empty() {
            self.render();
            return;
        }

        let vm = Rc::clone(self);
        let ticket = self.generation.bump();
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
        let Some(shift) = ShiftKey::parse(&select_value(&self.shift)) else {
            clear_children(&self.grid);
            return;
        };
        let program = select_value(&self.program);
        let plan = select_value(&self.plan);

        let vm = Rc::clone(self);
        spawn_local(async move {
            let slots = vm.layout_service.slots_for(shift).await;
            let model = GridModel::uniform(&slots, &schedule_days(shift));

            let items = if program.is_empty() || plan.is_empty() {
                Vec::new()
            } else {
                vm.api_client
                    .get_program_schedule(&program, &plan, shift)
                    .await
                    .unwrap_or_else(|e: ApiError| {
                        log::error!("❌ [SCHEDULE] Error cargando el horario: {}", e);
                        Vec::new()
                    })
            };

            if !vm.generation.is_current(ticket) {
                return;
            }
            match render_schedule(&vm.grid, &model, &items) {
                Ok(painted) => log::info!("🗓️ [SCHEDULE] {} de {} ítems pintados", painted, items.len()),
                Err(e) => log::error!("❌ [SCHEDULE] Error renderizando: {:?}", e),
            }
        });
    }
}

// ============================================================================
// Horario por docente (una grilla por turno)
// ============================================================================

pub struct TeacherScheduleViewModel {
    api_client: ApiClient,
    layout_service: LayoutService,
    generation: Generation,
    teacher: Element,
    grids: Vec<(ShiftKey, Element)>,
    listeners: RefCell<Vec<EventListener>>,
}

impl TeacherScheduleViewModel {
    pub fn mount(api_client: ApiClient, layout_service: LayoutService) -> Result<Option<Rc<Self>>, JsValue> {
        let Some(teacher) = get_element_by_id(TEACHER_VIEW_SELECT_ID) else {
            return Ok(None);
        };
        let grids: Vec<(ShiftKey, Element)> = ShiftKey::ALL
            .iter()
            .filter_map(|shift| {
                get_element_by_id(&format!("{}{}", TEACHER_VIEW_GRID_PREFIX, shift.code())).map(|grid| (*shift, grid))
            })
            .collect();

        let vm = Rc::new(Self {
            api_client,
            layout_service,
            generation: Generation::new(),
            teacher,
            grids,
            listeners: RefCell::new(Vec::new()),
        });

        let handler = Rc::downgrade(&vm);
        let mut listeners = vec![on_change(&vm.teacher, move |_| {
            if let Some(vm) = handler.upgrade() {
                vm.render();
            }
        })?];
        listeners.extend(wire_print_button(TEACHER_VIEW_PRINT_ID)?);
        *vm.listeners.borrow_mut() = listeners;

        vm.load_teachers();
        log::info!("🗓️ [SCHEDULE] Vista por docente montada ({} grillas)", vm.grids.len());
        Ok(Some(vm))
    }

    pub fn teardown(&self) {
        self.generation.bump();
        self.listeners.borrow_mut().clear();
    }

    fn load_teachers(self: &Rc<Self>) {
        let vm = Rc::clone(self);
        spawn_local(async move {
            let teachers = vm.api_client.get_teachers().await.unwrap_or_else(|e| {
                log::error!("❌ [SCHEDULE] Error cargando docentes: {}", e);
                Vec::new()
            });
            if let Err(e) = fill_select(&vm.teacher, EMPTY_OPTION_LABEL, &teachers, "", true) {
                log::error!("❌ [SCHEDULE] {:?}", e);
            }
        });
    }

    fn render(self: &Rc<Self>) {
        let ticket = self.generation.bump();
        let teacher = select_value(&self.teacher);
        if teacher.is_empty() {
            for (_, grid) in &self.grids {
                clear_children(grid);
            }
            return;
        }

        let vm = Rc::clone(self);
        spawn_local(async move {
            for (shift, grid) in &vm.grids {
                let slots = vm.layout_service.slots_for(*shift).await;
                let model = GridModel::uniform(&slots, &schedule_days(*shift));
                let items = vm
                    .api_client
                    .get_teacher_schedule(&teacher, *shift)
                    .await
                    .unwrap_or_else(|e| {
                        log::error!("❌ [SCHEDULE] Error cargando turno {}: {}", shift, e);
                        Vec::new()
                    });

                if !vm.generation.is_current(ticket) {
                    return;
                }
                if let Err(e) = render_schedule(grid, &model, &items) {
                    log::error!("❌ [SCHEDULE] Error renderizando turno {}: {:?}", shift, e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::{build_slots, ShiftDefinition};
    use crate::models::time::parse_hhmm;

    #[test]
    fn test_saturday_grid_has_single_column() {
        assert_eq!(schedule_days(ShiftKey::Sabado), vec![Day::Saturday]);
        assert_eq!(schedule_days(ShiftKey::Tarde).len(), 5);
    }

    #[test]
    fn test_items_outside_blocks_are_ignored() {
        let slots = build_slots(&ShiftDefinition::embedded(ShiftKey::Manana), 40);
        let model = GridModel::uniform(&slots, &schedule_days(ShiftKey::Manana));
        let at = |day, hhmm: &str| OccupiedSlot::new(day, parse_hhmm(hhmm).unwrap());

        let items = vec![
            at(Day::Monday, "07:45"),
            // recreo
            at(Day::Monday, "09:05"),
            // sábado no está en esta grilla
            at(Day::Saturday, "07:45"),
            // no coincide con un inicio de bloque
            at(Day::Friday, "08:00"),
        ];
        let placed = placeable(&model, &items);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].day, Day::Monday);
    }
}
