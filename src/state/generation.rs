// ============================================================================
// GENERATION - Contador para descartar respuestas viejas
// ============================================================================
// Cada request lleva la generación vigente al momento de salir. Cualquier
// cambio de contexto incrementa el contador; una respuesta que vuelve con
// una generación anterior se ignora.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Rc<Cell<u64>>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalida todo lo que esté en vuelo y devuelve la nueva generación
    pub fn bump(&self) -> u64 {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        next
    }

    pub fn current(&self) -> u64 {
        self.current.get()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current.get() == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_old_generation_is_stale() {
        let generation = Generation::new();
        let first = generation.bump();
        assert!(generation.is_current(first));

        let second = generation.bump();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn test_clones_share_the_counter() {
        let generation = Generation::new();
        let shared = generation.clone();
        let issued = generation.bump();
        shared.bump();
        assert!(!generation.is_current(issued));
    }
}
