//! Trailing-edge debounce for search input.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Forward only the last value of each burst.
///
/// A value is emitted once `quiet` has passed without a newer one arriving.
/// When the input closes, a pending value is flushed immediately and the
/// output closes after it.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    quiet: Duration,
) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        while let Some(first) = input.recv().await {
            let mut pending = first;
            loop {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(value) => pending = value,
                        None => {
                            let _ = tx.send(pending).await;
                            return;
                        }
                    },
                    _ = sleep(quiet) => break,
                }
            }
            if tx.send(pending).await.is_err() {
                tracing::trace!("debounce output dropped");
                return;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (tx, rx) = mpsc::channel(8);
        let mut out = debounce(rx, QUIET);

        for term in ["s", "su", "sur", "surf"] {
            tx.send(term.to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(QUIET).await;

        assert_eq!(out.recv().await.as_deref(), Some("surf"));
        drop(tx);
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_emit() {
        let (tx, rx) = mpsc::channel(8);
        let mut out = debounce(rx, QUIET);

        tx.send("reef").await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        tx.send("swell").await.unwrap();

        assert_eq!(out.recv().await, Some("reef"));
        assert_eq!(out.recv().await, Some("swell"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_value() {
        let (tx, rx) = mpsc::channel(8);
        let mut out = debounce(rx, QUIET);

        tx.send(1).await.unwrap();
        tx.send(2).await.unwrap();
        drop(tx);

        assert_eq!(out.recv().await, Some(2));
        assert_eq!(out.recv().await, None);
    }
}
