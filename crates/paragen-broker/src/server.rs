use crate::broker::Broker;
use crate::buffer::{PortId, WorkItem};
use crate::protocol::{commands, read_field, read_numeric_field, read_payload, write_field};
use crate::{Result, paragen_bail};
use paragen_core::{Candidate, Individual, SerializationMode, ThreadPool};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration of the TCP consumer.
#[derive(Clone, Debug)]
pub struct NetworkConsumerConfig {
    /// Address to listen on, e.g. `"0.0.0.0:10000"`. Port 0 picks a free one.
    pub addr: String,
    /// Payload encoding announced to workers with every `compute` reply.
    pub mode: SerializationMode,
    /// First seed handed out; each `getSeed` transaction gets the next one.
    pub seed_start: u32,
    /// Size of the connection-handling thread pool.
    pub n_threads: usize,
    /// How long a `ready` transaction waits for work before `nosuccess`.
    pub ready_timeout: Duration,
}

impl Default for NetworkConsumerConfig {
    fn default() -> Self {
        NetworkConsumerConfig {
            addr: "127.0.0.1:0".to_string(),
            mode: SerializationMode::Text,
            seed_start: 1,
            n_threads: 4,
            ready_timeout: Duration::from_millis(200),
        }
    }
}

/// The TCP server side of the broker: accepts worker connections and serves
/// one transaction per connection (`getSeed`, `ready` or `result`).
///
/// A protocol error on a connection drops that connection only; the broker
/// state is unaffected.
pub struct NetworkConsumer<I: Individual> {
    broker: Broker<I>,
    config: NetworkConsumerConfig,
    listener: TcpListener,
}

impl<I> NetworkConsumer<I>
where
    I: Individual + Serialize + DeserializeOwned,
{
    pub fn bind(broker: Broker<I>, config: NetworkConsumerConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.addr)?;
        Ok(NetworkConsumer {
            broker,
            config,
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Starts the accept loop on its own thread and returns a handle that
    /// shuts the consumer down when dropped.
    pub fn spawn(self) -> Result<ConsumerHandle> {
        let addr = self.local_addr()?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        self.listener.set_nonblocking(true)?;

        let thread = std::thread::spawn(move || {
            let pool = ThreadPool::new(self.config.n_threads.max(1));
            let seeds = Arc::new(AtomicU32::new(self.config.seed_start));

            while !shutdown_flag.load(Ordering::Relaxed) {
                match self.listener.accept() {
                    Ok((stream, peer)) => {
                        debug!(%peer, "worker connected");
                        let broker = self.broker.clone();
                        let config = self.config.clone();
                        let seeds = Arc::clone(&seeds);
                        pool.submit(move || {
                            if let Err(e) = handle_connection(broker, config, seeds, stream) {
                                warn!(%peer, error = %e, "connection dropped");
                            }
                        });
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(25));
                    }
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        std::thread::sleep(Duration::from_millis(25));
                    }
                }
            }
        });

        Ok(ConsumerHandle {
            addr,
            shutdown,
            thread: Some(thread),
        })
    }
}

/// Keeps the consumer alive; dropping it stops the accept loop and joins the
/// thread.
pub struct ConsumerHandle {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ConsumerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One client-initiated transaction, dispatched by its leading command field.
fn handle_connection<I>(
    broker: Broker<I>,
    config: NetworkConsumerConfig,
    seeds: Arc<AtomicU32>,
    mut stream: TcpStream,
) -> Result<()>
where
    I: Individual + Serialize + DeserializeOwned,
{
    // Accepted sockets can inherit the listener's non-blocking flag on some
    // platforms.
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    stream.set_write_timeout(Some(Duration::from_secs(10)))?;

    let command = read_field(&mut stream)?;
    match command.as_str() {
        commands::GET_SEED => {
            let seed = seeds.fetch_add(1, Ordering::SeqCst);
            write_field(&mut stream, &seed.to_string())?;
            Ok(())
        }
        commands::READY => match broker.pop_work_or_timeout(config.ready_timeout) {
            Some((port, item)) => send_compute(&mut stream, &config, port, item),
            None => write_field(&mut stream, commands::NO_SUCCESS),
        },
        commands::RESULT => {
            let port = PortId(read_numeric_field(&mut stream)?);
            let size = read_numeric_field(&mut stream)? as usize;
            let payload = read_payload(&mut stream, size)?;

            let candidate: Candidate<I> = config.mode.from_bytes(&payload)?;
            let iteration = candidate.assigned_iteration();
            broker.push_result(port, WorkItem::new(candidate, iteration, port));
            Ok(())
        }
        other => {
            paragen_bail!(Protocol: "unknown command {:?}", other)
        }
    }
}

/// Replies to a `ready` request: `compute`, payload size, serialization
/// mode, port id, then the payload, in one gather-write.
fn send_compute<I>(
    stream: &mut TcpStream,
    config: &NetworkConsumerConfig,
    port: PortId,
    item: WorkItem<I>,
) -> Result<()>
where
    I: Individual + Serialize,
{
    let payload = config.mode.to_bytes(&item.candidate)?;

    let mut message = Vec::with_capacity(4 * crate::COMMAND_LENGTH + payload.len());
    message.extend_from_slice(&crate::protocol::encode_field(commands::COMPUTE)?);
    message.extend_from_slice(&crate::protocol::encode_field(&payload.len().to_string())?);
    message.extend_from_slice(&crate::protocol::encode_field(config.mode.as_token())?);
    message.extend_from_slice(&crate::protocol::encode_field(&port.to_string())?);
    message.extend_from_slice(&payload);

    stream.write_all(&message)?;
    Ok(())
}
