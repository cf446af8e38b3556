pub mod broker;
pub mod buffer;
pub mod client;
pub mod executor;
pub mod protocol;
pub mod server;

pub use broker::{Broker, PortHandle};
pub use buffer::{PortId, WorkItem};
pub use client::{NetworkWorker, NetworkWorkerConfig, WorkerReport};
pub use executor::BrokeredExecutor;
pub use protocol::COMMAND_LENGTH;
pub use server::{ConsumerHandle, NetworkConsumer, NetworkConsumerConfig};

pub use paragen_error::{ParagenError, ParagenResult, ensure, paragen_bail, paragen_err};

pub(crate) type Result<T> = ParagenResult<T>;
