// ============================================================================
// APP - Detecta la página y monta los viewmodels que correspondan
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use crate::config::AppConfig;
use crate::dom::get_element_by_id;
use crate::services::{ApiClient, LayoutService};
use crate::utils::constants::{EDITOR_GRID_ID, OFFERING_SHEETS_ID, PROGRAM_VIEW_GRID_ID, TEACHER_VIEW_SELECT_ID};
use crate::viewmodels::{
    CascadeViewModel, GridViewModel, OfferingViewModel, ProgramScheduleViewModel, TeacherScheduleViewModel,
};

/// Qué pantalla está cargada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Editor,
    Offering,
    ProgramSchedule,
    TeacherSchedule,
    Unknown,
}

impl Page {
    /// El editor va primero: comparte los selects de carrera y plan con la oferta
    pub fn detect() -> Self {
        if get_element_by_id(EDITOR_GRID_ID).is_some() {
            Page::Editor
        } else if get_element_by_id(OFFERING_SHEETS_ID).is_some() {
            Page::Offering
        } else if get_element_by_id(PROGRAM_VIEW_GRID_ID).is_some() {
            Page::ProgramSchedule
        } else if get_element_by_id(TEACHER_VIEW_SELECT_ID).is_some() {
            Page::TeacherSchedule
        } else {
            Page::Unknown
        }
    }
}

/// Aplicación principal
pub struct App {
    config: AppConfig,
    grid: Option<Rc<GridViewModel>>,
    cascade: Option<Rc<CascadeViewModel>>,
    offering: Option<Rc<OfferingViewModel>>,
    program_view: Option<Rc<ProgramScheduleViewModel>>,
    teacher_view: Option<Rc<TeacherScheduleViewModel>>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            grid: None,
            cascade: None,
            offering: None,
            program_view: None,
            teacher_view: None,
        }
    }

    pub fn mount(&mut self) -> Result<(), JsValue> {
        let page = Page::detect();
        log::info!("🎬 [APP] Página detectada: {:?}", page);

        let api_client = ApiClient::new(self.config.endpoints.clone());
        let (source, block_minutes) = (self.config.grid.layout_source, self.config.grid.block_minutes);
        let layout_service = || LayoutService::new(api_client.clone(), source, block_minutes);

        match page {
            Page::Editor => {
                let grid = GridViewModel::new(self.config.clone(), api_client.clone());
                grid.mount_controls()?;
                self.cascade = CascadeViewModel::mount(api_client.clone(), Rc::clone(&grid))?;
                self.grid = Some(grid);
            }
            Page::Offering => {
                self.offering = OfferingViewModel::mount(api_client.clone(), layout_service())?;
            }
            Page::ProgramSchedule => {
                self.program_view = ProgramScheduleViewModel::mount(api_client.clone(), layout_service())?;
            }
            Page::TeacherSchedule => {
                self.teacher_view = TeacherScheduleViewModel::mount(api_client.clone(), layout_service())?;
            }
            Page::Unknown => log::warn!("⚠️ [APP] No hay grilla en esta página, nada para montar"),
        }
        Ok(())
    }

    /// Corta polling, timers, listeners y requests pendientes
    pub fn unmount(&mut self) {
        if let Some(cascade) = self.cascade.take() {
            cascade.teardown();
        }
        if let Some(grid) = self.grid.take() {
            grid.teardown();
        }
        if let Some(offering) = self.offering.take() {
            offering.teardown();
        }
        if let Some(view) = self.program_view.take() {
            view.teardown();
        }
        if let Some(view) = self.teacher_view.take() {
            view.teardown();
        }
        log::info!("🧹 [APP] Desmontada");
    }
}
