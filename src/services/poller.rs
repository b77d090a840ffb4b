// ============================================================================
// POLLER - Refresco periódico cancelable
// ============================================================================
// Dueño del Interval de gloo_timers: al dropear el Poller se cancela
// el intervalo (lo hace el Drop de Interval).
// ============================================================================

use gloo_timers::callback::Interval;

pub struct Poller {
    _interval: Interval,
}

impl Poller {
    /// Ejecuta `tick` cada `period_ms` hasta que el Poller se dropee
    pub fn start<F>(period_ms: u32, tick: F) -> Self
    where
        F: FnMut() + 'static,
    {
        log::debug!("⏱️ [SYNC] Polling cada {} ms", period_ms);
        Self {
            _interval: Interval::new(period_ms, tick),
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        log::debug!("⏹️ [SYNC] Polling detenido");
    }
}
