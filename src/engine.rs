use crate::{
    error::VqaError,
    model::{VqaModel, VqaRequest},
};
use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
        mpsc,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, oneshot};

/// Represents the current state of the inference engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No generation is running.
    Idle,
    /// The model is currently generating an answer.
    Processing,
}

impl EngineState {
    /// Returns the state as a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Processing => "processing",
        }
    }
}

/// Answer produced by the engine together with timing information.
#[derive(Debug, Clone)]
pub struct EngineResponse {
    /// Identifier assigned when the request was submitted.
    pub id: u64,
    /// Timestamp when the model started working on the request.
    pub start_time: Instant,
    /// Time spent inside the model.
    pub duration: Duration,
    /// First decoded answer.
    pub answer: String,
}

struct EngineJob {
    id: u64,
    request: VqaRequest,
    reply: oneshot::Sender<Result<EngineResponse, VqaError>>,
    // released only once the inference thread is done with the job
    _permit: OwnedSemaphorePermit,
}

/// Serves visual questions from a single model instance.
///
/// The model is moved onto a dedicated inference thread and is never
/// shared, so generation calls are serialized without locking. Each caller
/// gets its own reply channel, and a semaphore bounds how many requests may
/// be admitted (queued or running) at the same time.
pub struct VqaEngine {
    processing: Arc<AtomicBool>,
    req_tx: Option<mpsc::Sender<EngineJob>>,
    inference_handle: Option<JoinHandle<()>>,
    permits: Arc<Semaphore>,
    max_in_flight: usize,
    id_counter: AtomicU64,
}

impl VqaEngine {
    /// Creates a new engine that owns `model`.
    ///
    /// `max_in_flight` is the number of requests admitted at once; zero is
    /// treated as one.
    pub fn new<M>(mut model: M, max_in_flight: usize) -> Self
    where
        M: VqaModel + Send + 'static,
    {
        let max_in_flight = max_in_flight.max(1);
        let (req_tx, req_rx) = mpsc::channel::<EngineJob>();
        let processing = Arc::new(AtomicBool::new(false));

        let inference_handle = std::thread::spawn({
            let processing = processing.clone();
            move || {
                while let Ok(job) = req_rx.recv() {
                    if job.reply.is_closed() {
                        log::debug!("Skipping request {}, requester is gone", job.id);
                        continue;
                    }

                    log::debug!("Running inference for request {}", job.id);

                    processing.store(true, Ordering::SeqCst);
                    let start_time = Instant::now();

                    let result = run_model(&mut model, job.request);
                    let duration = start_time.elapsed();

                    processing.store(false, Ordering::SeqCst);
                    log::debug!("Inference {} completed in {:?}", job.id, duration);

                    // the caller may have gone away, nothing to do then
                    let _ = job.reply.send(result.map(|answer| EngineResponse {
                        id: job.id,
                        start_time,
                        duration,
                        answer,
                    }));
                }
                log::debug!("Inference thread exiting");
            }
        });

        Self {
            processing,
            req_tx: Some(req_tx),
            inference_handle: Some(inference_handle),
            permits: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            id_counter: AtomicU64::new(0),
        }
    }

    /// Returns the current state of the inference engine.
    pub fn state(&self) -> EngineState {
        if self.processing.load(Ordering::SeqCst) {
            EngineState::Processing
        } else {
            EngineState::Idle
        }
    }

    /// Number of requests currently admitted.
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.permits.available_permits()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Submits a request and waits for its answer.
    ///
    /// Waits for an admission permit first when `max_in_flight` requests are
    /// already admitted. The permit travels with the job, so a request stays
    /// admitted until the inference thread has finished or skipped it, even
    /// if the caller stops waiting.
    pub async fn answer(&self, request: VqaRequest) -> Result<EngineResponse, VqaError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| engine_stopped())?;

        let tx = self.req_tx.as_ref().ok_or_else(engine_stopped)?;
        let id = self.id_counter.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();

        tx.send(EngineJob {
            id,
            request,
            reply: reply_tx,
            _permit: permit,
        })
        .map_err(|_| engine_stopped())?;

        reply_rx.await.map_err(|_| engine_stopped())?
    }

    /// Stops the inference engine and shuts down the background thread.
    ///
    /// Requests already queued are still answered before the thread exits.
    pub fn stop(&mut self) {
        self.permits.close();
        self.req_tx.take();
        if let Some(handle) = self.inference_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for VqaEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_model<M: VqaModel>(model: &mut M, request: VqaRequest) -> Result<String, VqaError> {
    // a panicking model must not take the inference thread down with it
    let output = std::panic::catch_unwind(AssertUnwindSafe(|| model.run(request)))
        .map_err(|_| VqaError::InferenceFailure("model panicked during generation".to_string()))?
        .map_err(|e| VqaError::InferenceFailure(e.to_string()))?;

    output
        .first()
        .ok_or_else(|| VqaError::InferenceFailure("model produced no output".to_string()))
}

fn engine_stopped() -> VqaError {
    VqaError::InferenceFailure("inference engine stopped".to_string())
}
