pub mod best;
pub mod candidate;
pub mod domain;
pub mod executors;
pub mod function;
pub mod individual;
pub mod objectives;
pub mod population;
pub mod serialize;
pub mod traits;

pub use best::BestSet;
pub use candidate::Candidate;
pub use domain::*;
pub use executors::{EvalOutcome, Executor, SerialExecutor, WorkerPoolExecutor};
pub use function::{BenchmarkFunction, FunctionIndividual};
pub use individual::Individual;
pub use objectives::{Objective, Optimize, Score, Scored};
pub use population::Population;
pub use serialize::SerializationMode;
pub use traits::PersonalityTraits;

pub use paragen_error::{ParagenError, ParagenResult, ensure, paragen_bail, paragen_err};

pub(crate) type Result<T> = ParagenResult<T>;

pub mod prelude {
    pub use super::best::BestSet;
    pub use super::candidate::Candidate;
    pub use super::domain::random_provider;
    pub use super::executors::{EvalOutcome, Executor, SerialExecutor, WorkerPoolExecutor};
    pub use super::function::{BenchmarkFunction, FunctionIndividual};
    pub use super::individual::Individual;
    pub use super::objectives::{Objective, Optimize, Score, Scored};
    pub use super::population::Population;
    pub use super::serialize::SerializationMode;
    pub use super::traits::PersonalityTraits;
}
