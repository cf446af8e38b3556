pub mod optimize;
pub mod score;

pub use optimize::{Objective, Optimize};
pub use score::{Score, Scored};
