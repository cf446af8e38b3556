pub mod base;
pub mod builder;
pub mod checkpoint;
pub mod control;
pub mod ea;
pub mod engine;
pub mod generation;
pub mod limit;
pub mod monitor;
pub mod recombine;
pub mod sa;

pub use builder::{EvolutionaryAlgorithmBuilder, SimulatedAnnealingBuilder};
pub use checkpoint::{CheckpointConfig, load_checkpoint, save_checkpoint};
pub use control::HaltHandle;
pub use ea::EvolutionaryAlgorithm;
pub use engine::{Engine, EngineExt};
pub use generation::{Generation, OptimizeOutcome};
pub use limit::{Limit, StopReason};
pub use monitor::{Monitor, MonitorPhase, ProgressMonitor};
pub use recombine::RecombinationMethod;
pub use sa::SimulatedAnnealing;

pub use paragen_core::*;
pub use paragen_error::{ParagenError, ensure, paragen_bail, paragen_err};
pub use paragen_selectors::*;

pub(crate) type Result<T> = std::result::Result<T, ParagenError>;

/// Installs a compact tracing subscriber once per process. Demos and tests
/// call this; library users bring their own subscriber.
pub fn init_logging() {
    use std::sync::Once;
    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .init();
    });
}
