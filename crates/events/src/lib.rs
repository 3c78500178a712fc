//! Domain events: the typed `Event` contract, stream envelopes and the
//! pub/sub abstraction used to feed downstream consumers (audit log, caches).

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
