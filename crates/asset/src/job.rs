//! Background model load: one worker thread, results streamed over a channel.

use std::{path::PathBuf, sync::Arc, thread};

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvError, Sender, TryRecvError};

use crate::loader::{AssetLoader, LoadObserver, LoadProgress, LoadedModel};

pub enum LoadEvent {
    Progress(LoadProgress),
    /// Always the last event of a job.
    Finished(Result<LoadedModel>),
}

struct ChannelObserver(Sender<LoadEvent>);

impl LoadObserver for ChannelObserver {
    fn on_progress(&self, progress: LoadProgress) {
        // Receiver may already be gone (provider reset); nothing to do then.
        let _ = self.0.send(LoadEvent::Progress(progress));
    }
}

/// Handle to an in-flight load. Dropping it detaches the worker; its result is discarded.
pub struct LoadJob {
    events: Receiver<LoadEvent>,
}

impl LoadJob {
    pub fn spawn(loader: Arc<dyn AssetLoader>, path: PathBuf) -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                let observer = ChannelObserver(tx.clone());
                let result = loader.load(&path, &observer);
                let _ = tx.send(LoadEvent::Finished(result));
            })?;
        Ok(Self { events: rx })
    }

    /// Non-blocking; `Disconnected` means the worker died without reporting.
    pub fn try_recv(&self) -> Result<LoadEvent, TryRecvError> {
        self.events.try_recv()
    }

    pub fn recv(&self) -> Result<LoadEvent, RecvError> {
        self.events.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct Chunked;

    impl AssetLoader for Chunked {
        fn load(&self, _path: &Path, observer: &dyn LoadObserver) -> Result<LoadedModel> {
            for loaded in [10, 20] {
                observer.on_progress(LoadProgress {
                    loaded,
                    total: Some(20),
                });
            }
            anyhow::bail!("truncated");
        }
    }

    #[test]
    fn progress_then_result() {
        let job = LoadJob::spawn(Arc::new(Chunked), PathBuf::from("bag.glb")).unwrap();
        let mut percents = Vec::new();
        loop {
            match job.recv().unwrap() {
                LoadEvent::Progress(p) => percents.push(p.percent().unwrap()),
                LoadEvent::Finished(result) => {
                    assert!(result.is_err());
                    break;
                }
            }
        }
        assert_eq!(percents, vec![50, 100]);
    }
}
