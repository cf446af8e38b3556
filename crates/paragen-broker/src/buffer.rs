use paragen_core::{Candidate, Individual};
use std::collections::VecDeque;
use std::fmt::Display;

/// Opaque tag identifying a producer's buffer pair inside the broker. Work
/// items carry it so returned results can be matched back to their origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PortId(pub u64);

impl Display for PortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate in transit between a producer and a worker, together with the
/// iteration it was dispatched in and the port it must return to.
#[derive(Clone, Debug)]
pub struct WorkItem<I: Individual> {
    pub candidate: Candidate<I>,
    pub iteration: usize,
    pub port: PortId,
}

impl<I: Individual> WorkItem<I> {
    pub fn new(candidate: Candidate<I>, iteration: usize, port: PortId) -> Self {
        WorkItem {
            candidate,
            iteration,
            port,
        }
    }
}

/// The bounded queue pair owned by the broker for one producer: outbound
/// items awaiting a worker and inbound items coming back. Blocking semantics
/// live in the [Broker](crate::Broker), which guards all pairs with one lock.
#[derive(Debug)]
pub(crate) struct PortBuffers<I: Individual> {
    pub(crate) outbound: VecDeque<WorkItem<I>>,
    pub(crate) inbound: VecDeque<WorkItem<I>>,
}

impl<I: Individual> PortBuffers<I> {
    pub(crate) fn new(capacity: usize) -> Self {
        PortBuffers {
            outbound: VecDeque::with_capacity(capacity),
            inbound: VecDeque::with_capacity(capacity),
        }
    }
}
