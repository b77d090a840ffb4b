// ============================================================================
// CASCADE STATE - Selects en cascada carrera → plan → materia → turno
// ============================================================================
// Máquina de estados pura. El viewmodel le pasa los eventos (cambio de un
// select, opciones recibidas) y ejecuta lo que devuelve (fetch de opciones).
// Las reglas:
// - cambiar un nivel limpia y deshabilita todos los de la derecha
// - cero opciones: el siguiente nivel queda deshabilitado y la cadena se corta
// - una sola opción: se autoselecciona y la cascada sigue
// - los valores precargados por el servidor se aplican una sola vez y solo
//   si existen entre las opciones cargadas
// ============================================================================

use crate::models::options::OptionItem;
use crate::models::shift::ShiftKey;
use crate::models::sync::SelectionContext;
use crate::state::generation::Generation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Program,
    Plan,
    Subject,
    Shift,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Program, Level::Plan, Level::Subject, Level::Shift];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Level> {
        Level::ALL.get(self.index() + 1).copied()
    }

    /// Texto del select mientras espera al nivel anterior
    pub fn waiting_label(self) -> &'static str {
        match self {
            Level::Program => "Seleccioná una carrera...",
            Level::Plan => "Esperando carrera...",
            Level::Subject => "Esperando plan...",
            Level::Shift => "Esperando materia...",
        }
    }

    pub fn loading_label(self) -> &'static str {
        match self {
            Level::Program => "Cargando carreras...",
            Level::Plan => "Cargando planes...",
            Level::Subject => "Cargando materias...",
            Level::Shift => "Cargando turnos...",
        }
    }

    pub fn empty_label(self) -> &'static str {
        match self {
            Level::Program => "Sin carreras",
            Level::Plan => "Sin planes",
            Level::Subject => "Sin materias",
            Level::Shift => "Sin turnos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorState {
    pub options: Vec<OptionItem>,
    pub value: String,
    pub enabled: bool,
    pub placeholder: &'static str,
}

impl SelectorState {
    fn waiting(level: Level) -> Self {
        Self {
            options: Vec::new(),
            value: String::new(),
            enabled: false,
            placeholder: level.waiting_label(),
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.id == value)
    }
}

/// Pedido de opciones para un nivel, filtrado por el valor del nivel anterior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub level: Level,
    pub parent: String,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// La respuesta llegó tarde: ya hubo otro cambio
    Stale,
    /// Cero opciones: la cadena se corta
    Halted,
    /// Una sola opción: se eligió sola y la cascada siguió
    AutoSelected { value: String, next: Option<FetchRequest> },
    /// Había un valor precargado válido
    Prefilled { value: String, next: Option<FetchRequest> },
    /// Opciones cargadas, esperando al usuario
    Ready,
}

/// Valores iniciales que renderizó el servidor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub program: Option<String>,
    pub plan: Option<String>,
    pub subject: Option<String>,
    pub shift: Option<String>,
}

impl Prefill {
    fn slot(&mut self, level: Level) -> &mut Option<String> {
        match level {
            Level::Program => &mut self.program,
            Level::Plan => &mut self.plan,
            Level::Subject => &mut self.subject,
            Level::Shift => &mut self.shift,
        }
    }

    fn clear_after(&mut self, level: Level) {
        for later in Level::ALL.into_iter().filter(|l| *l > level) {
            *self.slot(later) = None;
        }
    }
}

/// Turnos del select: los del servidor si trae opciones reales,
/// si no los embebidos (sin sábado, que siempre va en su propia columna)
pub fn seed_shift_options(existing: &[OptionItem]) -> Vec<OptionItem> {
    let real: Vec<OptionItem> = existing
        .iter()
        .filter(|option| !option.id.trim().is_empty() && !option.label.trim().is_empty())
        .cloned()
        .collect();
    if !real.is_empty() {
        return real;
    }

    ShiftKey::WEEKDAY
        .iter()
        .map(|key| OptionItem::new(key.as_str(), key.label()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct CascadeState {
    selectors: [SelectorState; 4],
    shift_options: Vec<OptionItem>,
    prefill: Prefill,
    generation: Generation,
}

impl CascadeState {
    pub fn new(program_options: Vec<OptionItem>, shift_options: Vec<OptionItem>) -> Self {
        let mut selectors = Level::ALL.map(SelectorState::waiting);
        selectors[0] = SelectorState {
            enabled: true,
            options: program_options,
            ..SelectorState::waiting(Level::Program)
        };
        Self {
            selectors,
            shift_options,
            prefill: Prefill::default(),
            generation: Generation::new(),
        }
    }

    pub fn with_prefill(mut self, prefill: Prefill) -> Self {
        self.prefill = prefill;
        self
    }

    pub fn selector(&self, level: Level) -> &SelectorState {
        &self.selectors[level.index()]
    }

    pub fn value(&self, level: Level) -> &str {
        &self.selectors[level.index()].value
    }

    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    pub fn context(&self) -> SelectionContext {
        SelectionContext::new(
            self.value(Level::Program),
            self.value(Level::Plan),
            self.value(Level::Subject),
            self.value(Level::Shift),
        )
    }

    /// Aplica la selección precargada de carrera y arranca la cascada una vez
    pub fn replay(&mut self) -> Option<FetchRequest> {
        let program = self.prefill.program.take()?;
        if !self.selector(Level::Program).has_option(&program) {
            log::warn!("[CASCADE] carrera precargada inexistente: {}", program);
            return None;
        }
        self.change(Level::Program, &program)
    }

    /// Cambio hecho por el usuario: los precargados de la derecha ya no aplican
    pub fn user_change(&mut self, level: Level, value: &str) -> Option<FetchRequest> {
        self.prefill.clear_after(level);
        self.change(level, value)
    }

    /// Fija el valor de un nivel, limpia los de la derecha y devuelve
    /// el fetch del nivel siguiente (si hace falta uno)
    pub fn change(&mut self, level: Level, value: &str) -> Option<FetchRequest> {
        self.selectors[level.index()].value = value.to_string();
        for later in Level::ALL.into_iter().filter(|l| *l > level) {
            self.selectors[later.index()] = SelectorState::waiting(later);
        }

        let generation = self.generation.bump();
        let next = level.next()?;
        if value.is_empty() {
            return None;
        }

        if next == Level::Shift {
            // Los turnos no dependen de la materia: se habilitan sin request
            let options = self.shift_options.clone();
            return match self.apply_options(next, options) {
                LoadOutcome::AutoSelected { next, .. } | LoadOutcome::Prefilled { next, .. } => next,
                _ => None,
            };
        }

        let selector = &mut self.selectors[next.index()];
        selector.placeholder = next.loading_label();
        Some(FetchRequest {
            level: next,
            parent: value.to_string(),
            generation,
        })
    }

    /// Opciones recibidas para `level`
    pub fn options_loaded(&mut self, level: Level, generation: u64, options: Vec<OptionItem>) -> LoadOutcome {
        if !self.generation.is_current(generation) {
            log::debug!("[CASCADE] respuesta vieja para {:?} descartada", level);
            return LoadOutcome::Stale;
        }
        self.apply_options(level, options)
    }

    /// El fetch de opciones falló: el nivel queda deshabilitado
    pub fn options_failed(&mut self, level: Level, generation: u64) -> LoadOutcome {
        if !self.generation.is_current(generation) {
            return LoadOutcome::Stale;
        }
        self.apply_options(level, Vec::new())
    }

    fn apply_options(&mut self, level: Level, options: Vec<OptionItem>) -> LoadOutcome {
        let selector = &mut self.selectors[level.index()];
        selector.value.clear();

        if options.is_empty() {
            selector.options.clear();
            selector.enabled = false;
            selector.placeholder = level.empty_label();
            return LoadOutcome::Halted;
        }

        selector.options = options;
        selector.enabled = true;
        selector.placeholder = crate::utils::EMPTY_OPTION_LABEL;

        if selector.options.len() == 1 {
            let value = selector.options[0].id.clone();
            let next = self.change(level, &value);
            return LoadOutcome::AutoSelected { value, next };
        }

        if let Some(value) = self.prefill.slot(level).take() {
            if self.selector(level).has_option(&value) {
                let next = self.change(level, &value);
                return LoadOutcome::Prefilled { value, next };
            }
            log::warn!("[CASCADE] valor precargado {:?} no está entre las opciones de {:?}", value, level);
        }

        LoadOutcome::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ids: &[&str]) -> Vec<OptionItem> {
        ids.iter().map(|id| OptionItem::new(*id, format!("Opción {id}"))).collect()
    }

    fn cascade() -> CascadeState {
        CascadeState::new(opts(&["1", "2"]), seed_shift_options(&[]))
    }

    #[test]
    fn test_change_clears_right_and_requests_next() {
        let mut state = cascade();
        let request = state.user_change(Level::Program, "1").unwrap();
        assert_eq!(request.level, Level::Plan);
        assert_eq!(request.parent, "1");
        assert!(!state.selector(Level::Plan).enabled);
        assert!(!state.selector(Level::Subject).enabled);
        assert!(!state.selector(Level::Shift).enabled);
    }

    #[test]
    fn test_zero_plans_halts_chain() {
        let mut state = cascade();
        let request = state.user_change(Level::Program, "1").unwrap();
        let outcome = state.options_loaded(Level::Plan, request.generation, Vec::new());

        assert_eq!(outcome, LoadOutcome::Halted);
        for level in [Level::Plan, Level::Subject, Level::Shift] {
            assert!(!state.selector(level).enabled);
            assert!(state.selector(level).options.is_empty());
        }
        assert_eq!(state.selector(Level::Plan).placeholder, "Sin planes");
    }

    #[test]
    fn test_single_subject_auto_selects_and_cascades() {
        let mut state = cascade();
        let plans = state.user_change(Level::Program, "1").unwrap();
        assert_eq!(state.options_loaded(Level::Plan, plans.generation, opts(&["7", "8"])), LoadOutcome::Ready);

        let subjects = state.user_change(Level::Plan, "7").unwrap();
        let outcome = state.options_loaded(Level::Subject, subjects.generation, opts(&["19"]));

        assert_eq!(outcome, LoadOutcome::AutoSelected { value: "19".into(), next: None });
        assert_eq!(state.value(Level::Subject), "19");
        // La cascada siguió hasta los turnos
        let shift = state.selector(Level::Shift);
        assert!(shift.enabled);
        assert_eq!(shift.options.len(), 3);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut state = cascade();
        let first = state.user_change(Level::Program, "1").unwrap();
        let second = state.user_change(Level::Program, "2").unwrap();

        assert_eq!(state.options_loaded(Level::Plan, first.generation, opts(&["7"])), LoadOutcome::Stale);
        assert!(!state.selector(Level::Plan).enabled);
        assert_eq!(state.options_loaded(Level::Plan, second.generation, opts(&["9", "10"])), LoadOutcome::Ready);
    }

    #[test]
    fn test_prefill_replays_once_and_only_when_present() {
        let prefill = Prefill {
            program: Some("2".into()),
            plan: Some("8".into()),
            subject: Some("99".into()),
            shift: Some("tarde".into()),
        };
        let mut state = cascade().with_prefill(prefill);

        let plans = state.replay().unwrap();
        let outcome = state.options_loaded(Level::Plan, plans.generation, opts(&["7", "8"]));
        let subjects = match outcome {
            LoadOutcome::Prefilled { value, next: Some(next) } => {
                assert_eq!(value, "8");
                next
            }
            other => panic!("unexpected outcome: {other:?}"),
        };

        // "99" no existe: no se aplica
        assert_eq!(state.options_loaded(Level::Subject, subjects.generation, opts(&["19", "20"])), LoadOutcome::Ready);
        assert_eq!(state.value(Level::Subject), "");
        assert!(state.replay().is_none());
    }

    #[test]
    fn test_prefilled_shift_completes_context() {
        let prefill = Prefill { shift: Some("vespertino".into()), ..Prefill::default() };
        let mut state = cascade().with_prefill(prefill);
        state.change(Level::Program, "1");
        state.change(Level::Plan, "7");
        state.change(Level::Subject, "19");

        assert_eq!(state.value(Level::Shift), "vespertino");
        assert!(state.context().is_complete());
    }

    #[test]
    fn test_seed_keeps_server_options() {
        let server = vec![OptionItem::new("", "---------"), OptionItem::new("manana", "Mañana")];
        assert_eq!(seed_shift_options(&server), vec![OptionItem::new("manana", "Mañana")]);

        let seeded = seed_shift_options(&[OptionItem::new("", "---------")]);
        assert!(seeded.iter().all(|option| option.id != "sabado"));
    }
}
