//! # Pool de Workers
//! src/server/pool.rs
//!
//! Número fijo de threads de larga duración. Cada worker repite:
//!
//! ```text
//! loop {
//!     conn = queue.remove()      // bloquea
//!     handler(conn)              // request/response completo
//!     // conn se cierra al salir de scope
//! }
//! ```
//!
//! Un panic dentro del handler se captura con `catch_unwind`: se pierde esa
//! conexión pero el worker sigue atendiendo la cola.

use crate::server::queue::BoundedQueue;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Función que atiende un item de la cola
pub type ConnectionHandler<T> = Arc<dyn Fn(T, usize) + Send + Sync + 'static>;

/// Pool fijo de workers alimentado por una `BoundedQueue`
pub struct WorkerPool<T: Send + 'static> {
    workers: Vec<Worker>,
    queue: Arc<BoundedQueue<T>>,
}

struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Lanza `size` workers que consumen `queue` con `handler`.
    ///
    /// El handler recibe el item y el id del worker que lo atiende.
    pub fn spawn(
        size: usize,
        queue: Arc<BoundedQueue<T>>,
        handler: ConnectionHandler<T>,
    ) -> io::Result<Self> {
        assert!(size > 0, "worker pool size must be >= 1");

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let queue = Arc::clone(&queue);
            let handler = Arc::clone(&handler);

            let thread = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(id, queue, handler))?;

            workers.push(Worker { id, thread: Some(thread) });
        }

        info!(workers = size, capacity = queue.capacity(), "pool de workers iniciado");

        Ok(Self { workers, queue })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Cierra la cola, deja que los workers terminen lo pendiente y los
    /// espera
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.queue.close();

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    error!(worker = worker.id, "worker terminó con panic");
                }
            }
        }
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop<T>(id: usize, queue: Arc<BoundedQueue<T>>, handler: ConnectionHandler<T>) {
    debug!(worker = id, "worker iniciado");

    while let Some(item) = queue.remove() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler(item, id)));

        if let Err(payload) = result {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(worker = id, reason = %reason, "panic atendiendo conexión, se descarta");
        }
    }

    debug!(worker = id, "cola cerrada, worker terminado");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn test_pool_processes_all_items() {
        let queue = Arc::new(BoundedQueue::new(16));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let pool = {
            let seen = Arc::clone(&seen);
            WorkerPool::spawn(
                4,
                Arc::clone(&queue),
                Arc::new(move |item: u32, _worker: usize| seen.lock().unwrap().push(item)),
            )
            .unwrap()
        };
        assert_eq!(pool.size(), 4);

        for i in 0..100 {
            queue.insert(i).unwrap();
        }
        pool.shutdown();

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_panic_does_not_kill_worker() {
        let queue = Arc::new(BoundedQueue::new(4));
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);

        let pool = WorkerPool::spawn(
            1,
            Arc::clone(&queue),
            Arc::new(move |item: u32, _worker: usize| {
                if item == 0 {
                    panic!("request roto");
                }
                tx.lock().unwrap().send(item).unwrap();
            }),
        )
        .unwrap();

        queue.insert(0).unwrap();
        queue.insert(1).unwrap();
        queue.insert(2).unwrap();

        // Un único worker: si el panic lo hubiera matado no llegaría nada
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2);

        pool.shutdown();
    }

    #[test]
    fn test_work_is_distributed() {
        let queue = Arc::new(BoundedQueue::new(8));
        let workers_seen = Arc::new(Mutex::new(HashSet::new()));

        let pool = {
            let workers_seen = Arc::clone(&workers_seen);
            WorkerPool::spawn(
                3,
                Arc::clone(&queue),
                Arc::new(move |_item: u32, worker: usize| {
                    workers_seen.lock().unwrap().insert(worker);
                    thread::sleep(Duration::from_millis(20));
                }),
            )
            .unwrap()
        };

        for i in 0..12 {
            queue.insert(i).unwrap();
        }
        pool.shutdown();

        assert!(workers_seen.lock().unwrap().len() > 1);
    }

    #[test]
    fn test_worker_threads_are_named() {
        let queue = Arc::new(BoundedQueue::new(2));
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);

        let pool = WorkerPool::spawn(
            1,
            Arc::clone(&queue),
            Arc::new(move |_item: (), _worker: usize| {
                let name = thread::current().name().map(str::to_string);
                tx.lock().unwrap().send(name).unwrap();
            }),
        )
        .unwrap();

        queue.insert(()).unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap().as_deref(),
            Some("worker-0")
        );
        pool.shutdown();
    }
}
