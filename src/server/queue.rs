//! # Cola Acotada de Conexiones
//! src/server/queue.rs
//!
//! Buffer circular de capacidad fija entre el accept loop (productor) y
//! los workers (consumidores). Es el único punto de entrega entre ambos:
//!
//! - `insert` bloquea mientras la cola está llena (backpressure).
//! - `remove` bloquea mientras está vacía y despierta a un productor.
//! - Orden FIFO estricto, sin prioridades.
//!
//! `head` y `tail` crecen monótonamente; el slot es `índice % capacidad`.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct Ring<T> {
    slots: Vec<Option<T>>,

    /// Próximo slot a consumir
    head: u64,

    /// Próximo slot a producir
    tail: u64,

    closed: bool,
}

impl<T> Ring<T> {
    fn len(&self) -> usize {
        (self.tail - self.head) as usize
    }
}

/// Cola FIFO acotada y bloqueante
pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,

    /// Se señaliza cuando se libera un slot
    not_full: Condvar,

    /// Se señaliza cuando hay un item nuevo
    not_empty: Condvar,

    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola con `capacity` slots
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be >= 1");

        Self {
            ring: Mutex::new(Ring {
                slots: (0..capacity).map(|_| None).collect(),
                head: 0,
                tail: 0,
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publica `item`, bloqueando hasta que haya un slot libre.
    ///
    /// Retorna `Err(item)` si la cola está cerrada.
    pub fn insert(&self, item: T) -> Result<(), T> {
        let mut ring = self.lock();

        while ring.len() == self.capacity && !ring.closed {
            ring = self.not_full.wait(ring).unwrap_or_else(PoisonError::into_inner);
        }

        if ring.closed {
            return Err(item);
        }

        self.push(&mut ring, item);
        drop(ring);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Como `insert` pero sin bloquear: `Err(item)` si está llena o cerrada
    pub fn try_insert(&self, item: T) -> Result<(), T> {
        let mut ring = self.lock();

        if ring.closed || ring.len() == self.capacity {
            return Err(item);
        }

        self.push(&mut ring, item);
        drop(ring);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Saca el item más antiguo, bloqueando mientras la cola esté vacía.
    ///
    /// Retorna `None` solo cuando la cola está cerrada y ya no quedan items.
    pub fn remove(&self) -> Option<T> {
        let mut ring = self.lock();

        while ring.len() == 0 {
            if ring.closed {
                return None;
            }
            ring = self.not_empty.wait(ring).unwrap_or_else(PoisonError::into_inner);
        }

        let slot = (ring.head % self.capacity as u64) as usize;
        let item = ring.slots[slot].take();
        ring.head += 1;
        drop(ring);

        self.not_full.notify_one();
        item
    }

    fn push(&self, ring: &mut Ring<T>, item: T) {
        let slot = (ring.tail % self.capacity as u64) as usize;
        ring.slots[slot] = Some(item);
        ring.tail += 1;
    }

    /// Cierra la cola: `insert` falla y `remove` vacía lo pendiente y luego
    /// retorna `None`. Despierta a todos los threads bloqueados.
    pub fn close(&self) {
        self.lock().closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Items publicados que ningún worker ha tomado aún
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
