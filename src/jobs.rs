//! Registro en memoria de jobs asíncronos (`POST /kickoff_post`).
//!
//! Retención acotada: al superar la capacidad se desalojan los jobs
//! terminados más antiguos. Un job `Running` nunca se desaloja.

use std::collections::VecDeque;
use std::sync::Mutex;

use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum JobStatus {
    Running,
    Done(Value),
    Failed(String),
}

impl JobStatus {
    fn is_finished(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

pub struct RunRegistry {
    jobs: DashMap<Uuid, JobStatus>,
    /// Orden de inserción, para la política de desalojo.
    order: Mutex<VecDeque<Uuid>>,
    capacity: usize,
}

impl RunRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Registra un job nuevo en estado `Running` y devuelve su id.
    pub fn start(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.jobs.insert(id, JobStatus::Running);
        if let Ok(mut order) = self.order.lock() {
            order.push_back(id);
        }
        id
    }

    /// Marca el job como terminado (ok o error) y aplica el desalojo.
    pub fn finish(&self, id: Uuid, status: JobStatus) {
        self.jobs.insert(id, status);
        self.evict_overflow();
    }

    pub fn get(&self, id: Uuid) -> Option<JobStatus> {
        self.jobs.get(&id).map(|s| s.clone())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn evict_overflow(&self) {
        let Ok(mut order) = self.order.lock() else { return };
        while self.jobs.len() > self.capacity {
            // Busca el terminado más antiguo; si todos corren, no desaloja.
            let Some(pos) = order.iter()
                .position(|id| self.jobs.get(id).map(|s| s.is_finished()).unwrap_or(true))
            else {
                return;
            };
            if let Some(id) = order.remove(pos) {
                self.jobs.remove(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn start_then_finish_then_poll() {
        let reg = RunRegistry::new(8);
        let id = reg.start();
        assert!(matches!(reg.get(id), Some(JobStatus::Running)));

        reg.finish(id, JobStatus::Done(json!({"ok": true})));
        assert!(matches!(reg.get(id), Some(JobStatus::Done(_))));
        assert!(reg.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn oldest_finished_jobs_are_evicted_at_capacity() {
        let reg = RunRegistry::new(2);
        let a = reg.start();
        reg.finish(a, JobStatus::Done(json!(1)));
        let b = reg.start();
        reg.finish(b, JobStatus::Done(json!(2)));
        let c = reg.start();
        reg.finish(c, JobStatus::Failed("boom".into()));

        assert_eq!(reg.len(), 2);
        assert!(reg.get(a).is_none());
        assert!(reg.get(b).is_some());
        assert!(reg.get(c).is_some());
    }

    #[test]
    fn running_jobs_survive_eviction() {
        let reg = RunRegistry::new(1);
        let running = reg.start();
        let other = reg.start();
        reg.finish(other, JobStatus::Done(json!({})));

        assert!(matches!(reg.get(running), Some(JobStatus::Running)));
        assert!(reg.get(other).is_none());
    }
}
