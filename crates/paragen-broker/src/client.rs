use crate::protocol::{commands, encode_field, read_field, read_numeric_field, read_payload, write_field};
use crate::{Result, paragen_bail};
use paragen_core::{Candidate, Individual, SerializationMode, random_provider};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::marker::PhantomData;
use std::net::TcpStream;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration of a remote evaluation worker.
#[derive(Clone, Debug)]
pub struct NetworkWorkerConfig {
    /// Server address, e.g. `"192.168.0.10:10000"`.
    pub addr: String,
    /// Consecutive `nosuccess` replies tolerated before giving up.
    /// Zero means unlimited.
    pub max_stalls: u32,
    /// Failed connection attempts tolerated before giving up.
    /// Zero means unlimited.
    pub max_connection_attempts: u32,
    /// Whether evaluations that failed are sent back anyway (flagged as
    /// unsuccessfully processed) or silently dropped.
    pub return_if_unsuccessful: bool,
    /// Processing-cycles hint applied to every received candidate.
    pub processing_cycles: usize,
}

impl NetworkWorkerConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        NetworkWorkerConfig {
            addr: addr.into(),
            max_stalls: 10,
            max_connection_attempts: 10,
            return_if_unsuccessful: true,
            processing_cycles: 1,
        }
    }
}

/// What a worker did before it stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub processed: usize,
    pub stalls: u32,
}

/// A remote evaluation client.
///
/// The worker polls the server with `ready` transactions, evaluates whatever
/// it is handed and pushes the result back, one transaction per connection.
/// When the server has nothing to hand out the worker sleeps half a second
/// and retries, up to `max_stalls` consecutive stalls. Any unexpected
/// protocol reply is fatal for the worker.
pub struct NetworkWorker<I> {
    config: NetworkWorkerConfig,
    stall_sleep: Duration,
    retry_sleep: Duration,
    _individual: PhantomData<I>,
}

impl<I> NetworkWorker<I>
where
    I: Individual + Serialize + DeserializeOwned,
{
    pub fn new(config: NetworkWorkerConfig) -> Self {
        NetworkWorker {
            config,
            stall_sleep: Duration::from_millis(500),
            retry_sleep: Duration::from_millis(200),
            _individual: PhantomData,
        }
    }

    /// Shortens the stall and retry sleeps, for tests that should not spend
    /// wall-clock time waiting.
    pub fn with_sleeps(mut self, stall_sleep: Duration, retry_sleep: Duration) -> Self {
        self.stall_sleep = stall_sleep;
        self.retry_sleep = retry_sleep;
        self
    }

    /// Fetches the RNG seed assigned by the server, seeds the local random
    /// facility with it, then processes work until the stall limit is hit.
    pub fn run(&self) -> Result<WorkerReport> {
        let seed = self.fetch_seed()?;
        random_provider::set_seed(seed as u64);
        info!(seed, addr = %self.config.addr, "worker started");

        let mut report = WorkerReport::default();
        let mut stalls = 0u32;
        loop {
            if self.process_one()? {
                stalls = 0;
                report.processed += 1;
            } else {
                stalls += 1;
                report.stalls += 1;
                if self.config.max_stalls != 0 && stalls >= self.config.max_stalls {
                    debug!(stalls, "stall limit reached, worker stopping");
                    break;
                }
                std::thread::sleep(self.stall_sleep);
            }
        }

        Ok(report)
    }

    /// One `getSeed` transaction.
    pub fn fetch_seed(&self) -> Result<u32> {
        let mut stream = self.connect()?;
        write_field(&mut stream, commands::GET_SEED)?;

        let seed = read_numeric_field(&mut stream)?;
        Ok(seed as u32)
    }

    /// One `ready` transaction. Returns whether a candidate was computed.
    fn process_one(&self) -> Result<bool> {
        let mut stream = self.connect()?;
        write_field(&mut stream, commands::READY)?;

        let reply = read_field(&mut stream)?;
        if reply != commands::COMPUTE {
            // Any non-compute reply counts as a stall.
            return Ok(false);
        }

        let size = read_numeric_field(&mut stream)? as usize;
        let mode = SerializationMode::from_token(&read_field(&mut stream)?)?;
        let port = read_field(&mut stream)?;
        let payload = read_payload(&mut stream, size)?;
        drop(stream);

        let mut candidate: Candidate<I> = mode.from_bytes(&payload)?;
        candidate.set_processing_cycles(self.config.processing_cycles);

        match candidate.evaluate() {
            Ok(()) => {}
            Err(e) if self.config.return_if_unsuccessful => {
                warn!(error = %e, "evaluation failed, returning unsuccessful candidate");
            }
            Err(e) => {
                warn!(error = %e, "evaluation failed, dropping candidate");
                return Ok(true);
            }
        }

        self.return_result(&candidate, &port, mode)?;
        Ok(true)
    }

    /// One `result` transaction: command, port id, payload size and payload
    /// in a single gather-write. The server sends no reply.
    fn return_result(
        &self,
        candidate: &Candidate<I>,
        port: &str,
        mode: SerializationMode,
    ) -> Result<()> {
        let payload = mode.to_bytes(candidate)?;

        let mut message = Vec::with_capacity(3 * crate::COMMAND_LENGTH + payload.len());
        message.extend_from_slice(&encode_field(commands::RESULT)?);
        message.extend_from_slice(&encode_field(port)?);
        message.extend_from_slice(&encode_field(&payload.len().to_string())?);
        message.extend_from_slice(&payload);

        let mut stream = self.connect()?;
        stream.write_all(&message)?;
        Ok(())
    }

    /// Connects to the server, retrying failed attempts with a short sleep
    /// up to the configured limit.
    fn connect(&self) -> Result<TcpStream> {
        let mut attempt = 0u32;
        loop {
            match TcpStream::connect(&self.config.addr) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
                    stream.set_write_timeout(Some(Duration::from_secs(10)))?;
                    return Ok(stream);
                }
                Err(e) => {
                    attempt += 1;
                    if self.config.max_connection_attempts != 0
                        && attempt >= self.config.max_connection_attempts
                    {
                        paragen_bail!(Protocol: "could not connect to {} after {} attempts: {}",
                            self.config.addr, attempt, e);
                    }
                    std::thread::sleep(self.retry_sleep);
                }
            }
        }
    }
}
