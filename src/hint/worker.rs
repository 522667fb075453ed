use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::event::AppEvent;
use crate::hint::{HintProvider, get_hint};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintReply {
    /// Identifies the challenge the hint was requested for.
    pub serial: u64,
    pub challenge: String,
    pub text: String,
}

/// Runs hint fetches off the UI thread and posts replies to the event loop.
pub struct HintWorker {
    provider: Arc<dyn HintProvider>,
    tx: Sender<AppEvent>,
}

impl HintWorker {
    pub fn new(provider: Arc<dyn HintProvider>, tx: Sender<AppEvent>) -> Self {
        Self { provider, tx }
    }

    pub fn spawn(&self, challenge: String, serial: u64, online: bool) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let text = get_hint(provider.as_ref(), &challenge, online);
            // The receiver is gone once the app quits; nothing left to notify.
            let _ = tx.send(AppEvent::Hint(HintReply {
                serial,
                challenge,
                text,
            }));
        });
    }
}
