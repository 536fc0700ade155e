pub mod interactions;
pub mod publisher;
pub mod scoring;
pub mod user_locks;

pub use interactions::{EngineStores, InteractionEngine};
pub use publisher::{EventPublisher, EventSink, PublisherHandle};
pub use scoring::{EngineSettings, WeightTable};
