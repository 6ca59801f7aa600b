use crossbeam_channel::{unbounded, TryRecvError};
use notify::{event::ModifyKind, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tilepaint::*;

/// The style rules currently in use, reloaded when their file changes.
pub struct StyleSource {
    path: PathBuf,
    revision: u64,
    engine: RuleStyleEngine,
    rx: crossbeam_channel::Receiver<std::result::Result<notify::event::Event, notify::Error>>,
    _watcher: Option<RecommendedWatcher>,
}

impl StyleSource {
    pub fn load(path: impl Into<PathBuf>, watch: bool) -> Result<Self, LoadError> {
        let path = path.into();
        let engine = RuleStyleEngine::load(&path, 0)?;
        log::info!("Loaded {} style rules from {}.", engine.rules().len(), path.display());

        let (tx, rx) = unbounded();
        let watcher = if watch {
            Self::watch(&path, tx)
        } else {
            None
        };

        Ok(Self {
            path,
            revision: 0,
            engine,
            rx,
            _watcher: watcher,
        })
    }

    fn watch(
        path: &Path,
        tx: crossbeam_channel::Sender<std::result::Result<notify::event::Event, notify::Error>>,
    ) -> Option<RecommendedWatcher> {
        let mut watcher: RecommendedWatcher = match Watcher::new_immediate(move |res| {
            if tx.send(res).is_err() {
                log::debug!("Style watcher outlived its receiver.");
            }
        }) {
            Ok(watcher) => watcher,
            Err(err) => {
                log::info!("Failed to create a watcher for the style:");
                log::info!("{}", err);
                return None;
            }
        };

        match watcher.watch(path, RecursiveMode::NonRecursive) {
            Ok(_) => Some(watcher),
            Err(err) => {
                log::info!("Failed to start watching {}:", path.display());
                log::info!("{}", err);
                None
            }
        }
    }

    pub fn engine(&self) -> &RuleStyleEngine {
        &self.engine
    }

    /// Reloads the style if the file watcher has detected a change to the style file.
    ///
    /// On success the cached styles of the old revision are dropped from `resolver`.
    pub fn update(&mut self, resolver: &mut StyleResolver) -> bool {
        match self.rx.try_recv() {
            Ok(Ok(notify::event::Event {
                kind: EventKind::Modify(ModifyKind::Data(_)),
                ..
            })) => match RuleStyleEngine::load(&self.path, self.revision + 1) {
                Ok(engine) => {
                    let old = std::mem::replace(&mut self.engine, engine);
                    self.revision += 1;
                    resolver.invalidate(old.source_id());
                    log::info!("Reloaded style {}.", self.engine.source_id());
                    true
                }
                Err(err) => {
                    log::error!("Keeping the previous style. Reason:\r\n{}", err);
                    false
                }
            },
            // Everything is alright but file wasn't actually changed.
            Ok(Ok(_)) => false,
            // This happens all the time when there is no new message.
            Err(TryRecvError::Empty) => false,
            Ok(Err(err)) => {
                log::info!(
                    "Something went wrong with the style file watcher:\r\n{:?}",
                    err
                );
                false
            }
            Err(TryRecvError::Disconnected) => {
                log::debug!("The style file watcher has stopped.");
                false
            }
        }
    }
}
