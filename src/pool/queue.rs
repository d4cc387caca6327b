//! # Cola de Trabajo LIFO
//! src/pool/queue.rs
//!
//! Pila thread-safe de conexiones pendientes. La conexión aceptada más
//! recientemente se atiende primero (no hay fairness entre conexiones).
//!
//! `pop` e `is_empty` viven en `QueueState` y solo se pueden llamar con el
//! lock tomado: el worker combina "esperar trabajo" y "esperar apagado" en
//! una sola sección crítica sin locks anidados.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Contenido protegido por el lock de la cola
pub struct QueueState<C> {
    stack: Vec<C>,
    pushed: u64,
}

impl<C> QueueState<C> {
    /// Saca la conexión más reciente, o `None` si la pila está vacía
    pub fn pop(&mut self) -> Option<C> {
        self.stack.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

/// Cola compartida entre el dispatcher y los workers
pub struct WorkQueue<C> {
    state: Mutex<QueueState<C>>,

    /// "Hay trabajo o estamos apagando"
    not_empty: Condvar,
}

impl<C> WorkQueue<C> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                stack: Vec::new(),
                pushed: 0,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Apila una conexión y despierta a un solo worker
    pub fn push(&self, conn: C) {
        let mut state = self.lock();
        state.stack.push(conn);
        state.pushed += 1;
        self.not_empty.notify_one();
    }

    /// Toma el lock de la cola
    pub fn lock(&self) -> MutexGuard<'_, QueueState<C>> {
        // Ningún código corre un handler con este lock tomado, así que un
        // lock envenenado sigue teniendo una pila consistente
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bloquea sobre la condición liberando el lock; lo retoma al despertar
    pub fn wait<'a>(&self, guard: MutexGuard<'a, QueueState<C>>) -> MutexGuard<'a, QueueState<C>> {
        self.not_empty
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Despierta a todos los workers bloqueados (modo drenado).
    ///
    /// El caller debe haber limpiado el flag de ejecución con el lock de la
    /// cola tomado para que ningún worker se pierda la transición.
    pub fn wake_all(&self) {
        self.not_empty.notify_all();
    }

    /// Retira todas las conexiones que quedaron sin atender
    pub fn drain(&self) -> Vec<C> {
        let mut state = self.lock();
        std::mem::take(&mut state.stack)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total de conexiones apiladas desde la creación
    pub fn total_pushed(&self) -> u64 {
        self.lock().pushed
    }
}

impl<C> Default for WorkQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
