//! Infrastructure layer: clock capability, the in-memory store fake, and the
//! scheduled sweep worker.
//!
//! The production document store is an external collaborator; `InMemoryStore`
//! implements the same transactional contract (serializable isolation on the
//! documents touched, bounded optimistic retries, server-assigned timestamps,
//! bounded batch deletes) so the engine stays testable without it.

pub mod clock;
pub mod memory;
pub mod sweep_worker;


pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::InMemoryStore;
pub use sweep_worker::{SweepWorker, WorkerHandle};
