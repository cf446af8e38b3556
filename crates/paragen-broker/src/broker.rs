use crate::Result;
use crate::buffer::{PortBuffers, PortId, WorkItem};
use paragen_core::Individual;
use paragen_error::paragen_err;
use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// The matchmaker between evaluation producers and work consumers.
///
/// A broker owns one bounded buffer pair per producer port and hands work
/// items to whichever consumer asks first, round-robin across ports so no
/// producer starves. It knows nothing about optimization; items are opaque
/// to it apart from their port tag.
///
/// The broker imposes no ordering guarantee on returned items: results may
/// arrive in any order and from any generation, and results pushed to a port
/// that has already been returned are discarded silently.
///
/// Cloning yields another handle to the same broker, so tests and servers
/// can share it without any process-wide singleton.
pub struct Broker<I: Individual> {
    shared: Arc<Shared<I>>,
}

impl<I: Individual> Clone for Broker<I> {
    fn clone(&self) -> Self {
        Broker {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<I: Individual> {
    state: Mutex<State<I>>,
    work_available: Condvar,
    results_available: Condvar,
    space_available: Condvar,
}

struct State<I: Individual> {
    ports: BTreeMap<PortId, PortBuffers<I>>,
    next_port: u64,
    rr_cursor: Option<PortId>,
    capacity: usize,
}

impl<I: Individual> Broker<I> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// A broker whose per-port queues hold at most `capacity` items before
    /// pushes block.
    pub fn with_capacity(capacity: usize) -> Self {
        Broker {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    ports: BTreeMap::new(),
                    next_port: 0,
                    rr_cursor: None,
                    capacity: capacity.max(1),
                }),
                work_available: Condvar::new(),
                results_available: Condvar::new(),
                space_available: Condvar::new(),
            }),
        }
    }

    /// Registers a new producer and returns the handle to its buffer pair.
    /// Dropping the handle returns the port and tears the buffers down.
    pub fn get_port(&self) -> PortHandle<I> {
        let mut state = self.shared.state.lock().unwrap();
        let id = PortId(state.next_port);
        state.next_port += 1;
        let capacity = state.capacity;
        state.ports.insert(id, PortBuffers::new(capacity));

        debug!(port = %id, "broker port opened");
        PortHandle {
            broker: self.clone(),
            id,
        }
    }

    /// Tears down a producer's buffers. In-flight results for the port are
    /// discarded from now on.
    pub fn return_port(&self, id: PortId) {
        let mut state = self.shared.state.lock().unwrap();
        if state.ports.remove(&id).is_some() {
            debug!(port = %id, "broker port returned");
        }
        // Wake anyone blocked on the dead port so they can observe it is gone.
        self.shared.space_available.notify_all();
        self.shared.results_available.notify_all();
    }

    pub fn n_ports(&self) -> usize {
        self.shared.state.lock().unwrap().ports.len()
    }

    /// Producer side: enqueues a work item on its port's outbound queue,
    /// blocking while the queue is full.
    pub fn push_work(&self, item: WorkItem<I>) -> Result<()> {
        let port = item.port;
        let mut state = self.shared.state.lock().unwrap();
        loop {
            let capacity = state.capacity;
            match state.ports.get_mut(&port) {
                None => return Err(paragen_err!(Broker: "push to unknown port {}", port)),
                Some(buffers) if buffers.outbound.len() < capacity => {
                    buffers.outbound.push_back(item);
                    self.shared.work_available.notify_one();
                    return Ok(());
                }
                Some(_) => {
                    state = self.shared.space_available.wait(state).unwrap();
                }
            }
        }
    }

    /// Consumer side: blocks until any port has outbound work and returns
    /// the next item, fair round-robin across ports.
    pub fn pop_work_item(&self) -> (PortId, WorkItem<I>) {
        let mut state = self.shared.state.lock().unwrap();
        loop {
            if let Some(found) = Self::take_round_robin(&mut state) {
                self.shared.space_available.notify_all();
                return found;
            }
            state = self.shared.work_available.wait(state).unwrap();
        }
    }

    /// Consumer side: like [Broker::pop_work_item] but gives up after `dt`.
    pub fn pop_work_or_timeout(&self, dt: Duration) -> Option<(PortId, WorkItem<I>)> {
        let deadline = Instant::now() + dt;
        let mut state = self.shared.state.lock().unwrap();
        loop {
            if let Some(found) = Self::take_round_robin(&mut state) {
                self.shared.space_available.notify_all();
                return Some(found);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, _timeout) = self
                .shared
                .work_available
                .wait_timeout(state, remaining)
                .unwrap();
            state = guard;
        }
    }

    /// Consumer side: hands a processed item back to its producer. Results
    /// for ports that no longer exist are discarded silently; a full inbound
    /// queue blocks until the producer drains it or returns the port.
    pub fn push_result(&self, port: PortId, item: WorkItem<I>) {
        let mut state = self.shared.state.lock().unwrap();
        loop {
            let capacity = state.capacity;
            match state.ports.get_mut(&port) {
                None => {
                    debug!(port = %port, "result for returned port discarded");
                    return;
                }
                Some(buffers) if buffers.inbound.len() < capacity => {
                    buffers.inbound.push_back(item);
                    self.shared.results_available.notify_all();
                    return;
                }
                Some(_) => {
                    state = self.shared.space_available.wait(state).unwrap();
                }
            }
        }
    }

    /// Producer side: waits up to `dt` for a result on the given port.
    pub fn pop_result(&self, port: PortId, dt: Duration) -> Option<WorkItem<I>> {
        let deadline = Instant::now() + dt;
        let mut state = self.shared.state.lock().unwrap();
        loop {
            match state.ports.get_mut(&port) {
                None => return None,
                Some(buffers) => {
                    if let Some(item) = buffers.inbound.pop_front() {
                        self.shared.space_available.notify_all();
                        return Some(item);
                    }
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, _timeout) = self
                .shared
                .results_available
                .wait_timeout(state, remaining)
                .unwrap();
            state = guard;
        }
    }

    /// Pops from the first non-empty outbound queue after the round-robin
    /// cursor, wrapping around once.
    fn take_round_robin(state: &mut State<I>) -> Option<(PortId, WorkItem<I>)> {
        let start = state.rr_cursor;

        let candidate_port = {
            let after = match start {
                Some(cursor) => state
                    .ports
                    .range((
                        std::ops::Bound::Excluded(cursor),
                        std::ops::Bound::Unbounded,
                    ))
                    .find(|(_, buffers)| !buffers.outbound.is_empty())
                    .map(|(id, _)| *id),
                None => None,
            };

            after.or_else(|| {
                state
                    .ports
                    .iter()
                    .find(|(_, buffers)| !buffers.outbound.is_empty())
                    .map(|(id, _)| *id)
            })
        };

        let port = candidate_port?;
        let item = state
            .ports
            .get_mut(&port)
            .and_then(|buffers| buffers.outbound.pop_front())?;
        state.rr_cursor = Some(port);
        Some((port, item))
    }
}

impl<I: Individual> Default for Broker<I> {
    fn default() -> Self {
        Broker::new()
    }
}

/// A producer's claim on a broker port. Pushes go out through the handle,
/// results come back through it, and dropping it returns the port.
pub struct PortHandle<I: Individual> {
    broker: Broker<I>,
    id: PortId,
}

impl<I: Individual> PortHandle<I> {
    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn push(&self, candidate: paragen_core::Candidate<I>, iteration: usize) -> Result<()> {
        self.broker
            .push_work(WorkItem::new(candidate, iteration, self.id))
    }

    pub fn pop_result(&self, dt: Duration) -> Option<WorkItem<I>> {
        self.broker.pop_result(self.id, dt)
    }
}

impl<I: Individual> Drop for PortHandle<I> {
    fn drop(&mut self) {
        self.broker.return_port(self.id);
    }
}
