use std::fmt::Debug;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

/// A fixed-size thread pool backing the worker-pool executor and the TCP
/// consumer. Workers are long-lived and reused for the lifetime of the pool;
/// dropping the pool joins them.
pub struct ThreadPool {
    sender: mpsc::Sender<Message>,
    workers: Vec<Worker>,
}

impl ThreadPool {
    pub fn new(size: usize) -> Self {
        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        ThreadPool {
            sender,
            workers: (0..size.max(1))
                .map(|id| Worker::new(id, Arc::clone(&receiver)))
                .collect(),
        }
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    pub fn is_alive(&self) -> bool {
        self.workers.iter().any(|worker| worker.is_alive())
    }

    /// Fire-and-forget job submission.
    pub fn submit<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f);
        self.sender.send(Message::Work(job)).unwrap();
    }

    /// Submits a job and returns a [WorkResult] that yields its value later.
    /// [WorkResult::result] blocks until the job is complete.
    pub fn submit_with_result<F, T>(&self, f: F) -> WorkResult<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let job = Box::new(move || {
            let _ = tx.send(f());
        });

        self.sender.send(Message::Work(job)).unwrap();

        WorkResult { receiver: rx }
    }
}

/// All workers are terminated and joined when the pool is dropped.
impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in self.workers.iter() {
            let _ = self.sender.send(Message::Terminate);
        }

        for worker in self.workers.iter_mut() {
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

/// The pending value of a job submitted with
/// [submit_with_result](ThreadPool::submit_with_result).
pub struct WorkResult<T> {
    receiver: mpsc::Receiver<T>,
}

impl<T> WorkResult<T> {
    /// Blocks until the job has finished and returns its value.
    ///
    /// # Panics
    /// Panics if the job itself panicked and its value was never sent. Use
    /// [WorkResult::try_result] where a dead task must be survivable.
    pub fn result(self) -> T {
        self.receiver.recv().unwrap()
    }

    /// Blocks until the job has finished; `None` means the job died without
    /// producing a value (e.g. it panicked).
    pub fn try_result(self) -> Option<T> {
        self.receiver.recv().ok()
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Work(Job),
    Terminate,
}

/// Listens for incoming `Message`s and executes the `Job`s or terminates.
struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Self {
        Worker {
            id,
            thread: Some(thread::spawn(move || {
                loop {
                    let message = match receiver.lock() {
                        Ok(guard) => guard.recv(),
                        Err(_) => break,
                    };

                    match message {
                        Ok(Message::Work(job)) => job(),
                        Ok(Message::Terminate) | Err(_) => break,
                    }
                }
            })),
        }
    }

    /// The thread is 'taken' when the worker is dropped, so a `None` thread
    /// means the worker is no longer alive.
    fn is_alive(&self) -> bool {
        self.thread.is_some()
    }
}

impl Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("is_alive", &self.is_alive())
            .finish()
    }
}
