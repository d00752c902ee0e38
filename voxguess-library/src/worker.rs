//! Background loader thread
//!
//! The cache lives on one worker thread; requests and results travel
//! over channels. Single ownership of the cache means concurrent
//! requests for one URL coalesce into a single fetch+decode for free.

use crate::cache::ClipCache;
use crate::decode::DecodedClip;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// How a load failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPriority {
    /// The clip the player is waiting on; failures come back as
    /// outcomes so the round's play control can stay inert.
    Current,
    /// Opportunistic warm-up (next round, cue sounds); failures are
    /// logged and swallowed.
    Prefetch,
}

#[derive(Debug)]
pub struct LoadRequest {
    pub url: String,
    pub priority: LoadPriority,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Ready {
        url: String,
        clip: Arc<DecodedClip>,
    },
    /// Only emitted for `Current` loads.
    Failed {
        url: String,
        error: String,
    },
}

/// Run the loader until the request channel closes. Requests are served
/// in arrival order, so a `Current` load is never stuck behind a
/// prefetch issued after it.
pub fn spawn_loader(
    mut cache: ClipCache,
    requests: Receiver<LoadRequest>,
    outcomes: Sender<LoadOutcome>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for request in requests.iter() {
            match cache.load(&request.url) {
                Ok(clip) => {
                    let _ = outcomes.send(LoadOutcome::Ready {
                        url: request.url,
                        clip,
                    });
                }
                Err(e) => match request.priority {
                    LoadPriority::Current => {
                        tracing::error!(url = %request.url, error = %e, "clip load failed");
                        let _ = outcomes.send(LoadOutcome::Failed {
                            url: request.url,
                            error: e.to_string(),
                        });
                    }
                    LoadPriority::Prefetch => {
                        tracing::warn!(url = %request.url, error = %e, "prefetch failed");
                    }
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::CountingSource;
    use crate::decode::ClipDecoder;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_cache() -> (ClipCache, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fetches: fetches.clone(),
            fail: false,
        };
        (
            ClipCache::new(Box::new(source), ClipDecoder::new(8000)),
            fetches,
        )
    }

    #[test]
    fn test_current_load_roundtrip() {
        let (cache, _) = test_cache();
        let (req_tx, req_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();
        let handle = spawn_loader(cache, req_rx, out_tx);

        req_tx
            .send(LoadRequest {
                url: "round.wav".into(),
                priority: LoadPriority::Current,
            })
            .unwrap();
        match out_rx.recv().unwrap() {
            LoadOutcome::Ready { url, clip } => {
                assert_eq!(url, "round.wav");
                assert!(!clip.samples.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        drop(req_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_prefetch_failure_is_swallowed() {
        let (cache, _) = test_cache();
        let (req_tx, req_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();
        let handle = spawn_loader(cache, req_rx, out_tx);

        req_tx
            .send(LoadRequest {
                url: "missing.wav".into(),
                priority: LoadPriority::Prefetch,
            })
            .unwrap();
        // A good load afterwards proves the worker survived and the
        // prefetch failure produced no outcome.
        req_tx
            .send(LoadRequest {
                url: "ok.wav".into(),
                priority: LoadPriority::Current,
            })
            .unwrap();

        match out_rx.recv().unwrap() {
            LoadOutcome::Ready { url, .. } => assert_eq!(url, "ok.wav"),
            other => panic!("unexpected outcome: {other:?}"),
        }

        drop(req_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_current_failure_is_reported() {
        let (cache, _) = test_cache();
        let (req_tx, req_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();
        let handle = spawn_loader(cache, req_rx, out_tx);

        req_tx
            .send(LoadRequest {
                url: "missing.wav".into(),
                priority: LoadPriority::Current,
            })
            .unwrap();
        match out_rx.recv().unwrap() {
            LoadOutcome::Failed { url, .. } => assert_eq!(url, "missing.wav"),
            other => panic!("unexpected outcome: {other:?}"),
        }

        drop(req_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_repeat_request_hits_cache() {
        let (cache, fetches) = test_cache();
        let (req_tx, req_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();
        let handle = spawn_loader(cache, req_rx, out_tx);

        for _ in 0..2 {
            req_tx
                .send(LoadRequest {
                    url: "same.wav".into(),
                    priority: LoadPriority::Current,
                })
                .unwrap();
        }
        let _ = out_rx.recv().unwrap();
        let _ = out_rx.recv().unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        drop(req_tx);
        handle.join().unwrap();
    }
}
