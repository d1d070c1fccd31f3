use super::{suggest_search, suggest_theme, TextModel, ThemeError};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

type Repaint = Arc<dyn Fn() + Send + Sync>;

/// Completed search request, tagged so the requester can drop stale replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReply {
    pub request_id: u64,
    pub query: String,
    pub suggestions: Vec<String>,
}

/// Runs model calls on short-lived background threads.
///
/// Results come back over channels the UI polls each frame; the optional
/// repaint hook wakes the UI once a result is ready.
#[derive(Clone)]
pub struct AiWorker {
    model: Arc<dyn TextModel>,
    repaint: Option<Repaint>,
}

impl AiWorker {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self {
            model,
            repaint: None,
        }
    }

    pub fn with_repaint(mut self, repaint: impl Fn() + Send + Sync + 'static) -> Self {
        self.repaint = Some(Arc::new(repaint));
        self
    }

    pub fn is_available(&self) -> bool {
        self.model.is_available()
    }

    /// Start a theme request. Dropping the receiver abandons the result.
    pub fn request_theme(&self, description: String) -> Receiver<Result<String, ThemeError>> {
        let (tx, rx) = mpsc::channel();
        let model = self.model.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let result = suggest_theme(model.as_ref(), &description);
            let _ = tx.send(result);
            if let Some(repaint) = repaint {
                repaint();
            }
        });
        rx
    }

    /// Start a search request whose reply is sent to `reply`.
    pub fn request_search(&self, request_id: u64, query: String, reply: Sender<SearchReply>) {
        let model = self.model.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let suggestions = suggest_search(model.as_ref(), &query);
            let _ = reply.send(SearchReply {
                request_id,
                query,
                suggestions,
            });
            if let Some(repaint) = repaint {
                repaint();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Echo;

    impl TextModel for Echo {
        fn complete(&self, prompt: &str) -> anyhow::Result<String> {
            let query = prompt.rsplit("Query: ").next().unwrap_or("").trim();
            Ok(format!("{query} one\n{query} two"))
        }
    }

    #[test]
    fn search_reply_carries_request_id() {
        let worker = AiWorker::new(Arc::new(Echo));
        let (tx, rx) = mpsc::channel();
        worker.request_search(7, "rust".into(), tx);
        let reply = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(reply.request_id, 7);
        assert_eq!(reply.suggestions, vec!["rust one", "rust two"]);
    }

    #[test]
    fn repaint_hook_fires_after_theme_result() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let worker = AiWorker::new(Arc::new(Echo)).with_repaint(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let rx = worker.request_theme("moody".into());
        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap().is_ok());
        for _ in 0..50 {
            if hits.load(Ordering::SeqCst) == 1 {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("repaint hook never fired");
    }
}
