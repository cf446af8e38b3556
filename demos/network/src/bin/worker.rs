use paragen::*;

/// A remote evaluation worker. Point it at a running `network-server`:
///
/// ```text
/// network-worker 192.168.0.10:10200
/// ```
fn main() -> ParagenResult<()> {
    init_logging();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:10200".to_string());

    let mut config = NetworkWorkerConfig::new(addr);
    config.max_stalls = 20;
    config.max_connection_attempts = 0; // keep retrying, the server may start later

    let worker: NetworkWorker<FunctionIndividual> = NetworkWorker::new(config);
    let report = worker.run()?;

    println!(
        "worker done: {} candidates processed, {} stalls",
        report.processed, report.stalls
    );
    Ok(())
}
