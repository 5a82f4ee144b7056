use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::PipelineError;

/// Runs a blocking collaborator call on a worker thread and bounds the
/// wait. On expiry the worker is detached and its eventual result
/// discarded; the caller gets `CollaboratorTimeout`. A zero timeout
/// disables the deadline and runs the call inline.
pub(crate) fn call_with_deadline<T, F>(
    timeout: Duration,
    context: &'static str,
    call: F,
) -> Result<T, PipelineError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
{
    if timeout.is_zero() {
        return call();
    }

    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name(format!("collaborator-{context}"))
        .spawn(move || {
            let _ = sender.send(call());
        })
        .map_err(|e| PipelineError::io("spawn collaborator worker", e))?;

    match receiver.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(PipelineError::CollaboratorTimeout {
            context,
            timeout_ms: timeout.as_millis() as u64,
        }),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(PipelineError::runtime(
            context,
            "collaborator worker exited without a result",
        )),
    }
}
