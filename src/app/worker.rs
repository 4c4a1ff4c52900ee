use std::sync::mpsc;
use std::time::Duration;

pub(super) const WORKER_RESULT_POLL_INTERVAL: Duration = Duration::from_millis(24);
const WORKER_THREAD_NAME: &str = "frosted-worker";

/// Runs `work` on a background thread and hands its result to `on_result`
/// on the GTK main loop.
pub(super) fn spawn_worker_action<T, W, H>(work: W, mut on_result: H)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    H: FnMut(T) + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    let spawned = std::thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            let result = work();
            let _ = tx.send(result);
        });
    if let Err(err) = spawned {
        tracing::error!(?err, "failed to spawn worker thread");
        return;
    }

    gtk4::glib::timeout_add_local(WORKER_RESULT_POLL_INTERVAL, move || match rx.try_recv() {
        Ok(result) => {
            on_result(result);
            gtk4::glib::ControlFlow::Break
        }
        Err(mpsc::TryRecvError::Empty) => gtk4::glib::ControlFlow::Continue,
        Err(mpsc::TryRecvError::Disconnected) => {
            tracing::warn!("worker thread exited without a result");
            gtk4::glib::ControlFlow::Break
        }
    });
}
