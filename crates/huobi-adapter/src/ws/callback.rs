/*
[INPUT]:  User closures (sync or async) and decoded messages
[OUTPUT]: Callback invocation, inline or on per-topic worker tasks
[POS]:    WebSocket layer - callback model and run-loop dispatch
[UPDATE]: When changing callback execution or ordering guarantees
*/

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::config::CallbackMode;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A message callback, either a plain function or one returning a future.
pub enum Callback<T> {
    Sync(Arc<dyn Fn(T) + Send + Sync>),
    Async(Arc<dyn Fn(T) -> BoxFuture + Send + Sync>),
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        match self {
            Callback::Sync(f) => Callback::Sync(Arc::clone(f)),
            Callback::Async(f) => Callback::Async(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Sync(_) => f.write_str("Callback::Sync"),
            Callback::Async(_) => f.write_str("Callback::Async"),
        }
    }
}

impl<T: Send + 'static> Callback<T> {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Callback::Sync(Arc::new(f))
    }

    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Callback::Async(Arc::new(move |value| Box::pin(f(value)) as BoxFuture))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Callback::Async(_))
    }

    /// Call the function and await it if it is asynchronous.
    pub async fn invoke(&self, value: T) {
        match self {
            Callback::Sync(f) => f(value),
            Callback::Async(f) => f(value).await,
        }
    }
}

/// Runs callbacks for a single run loop.
///
/// Sync callbacks always run on the loop task. Async callbacks are awaited in place in
/// [`CallbackMode::Inline`]; in [`CallbackMode::Background`] each lane (a topic, or the error
/// lane) gets one worker task that drains its queue in arrival order.
pub(crate) struct Dispatcher {
    mode: CallbackMode,
    lanes: HashMap<String, mpsc::UnboundedSender<BoxFuture>>,
    error_lane: Option<mpsc::UnboundedSender<BoxFuture>>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub(crate) fn new(mode: CallbackMode) -> Self {
        Self {
            mode,
            lanes: HashMap::new(),
            error_lane: None,
            workers: Vec::new(),
        }
    }

    /// Dispatch on the lane of `topic`, or on the error lane for `None`.
    pub(crate) async fn dispatch<T: Send + 'static>(
        &mut self,
        topic: Option<&str>,
        callback: &Callback<T>,
        value: T,
    ) {
        let future = match callback {
            Callback::Sync(f) => return f(value),
            Callback::Async(f) => f(value),
        };
        if self.mode == CallbackMode::Inline {
            return future.await;
        }

        let sender = self.lane(topic);
        if sender.send(future).is_err() {
            warn!(topic = topic.unwrap_or("<errors>"), "callback worker is gone, message dropped");
        }
    }

    fn lane(&mut self, topic: Option<&str>) -> &mpsc::UnboundedSender<BoxFuture> {
        let workers = &mut self.workers;
        match topic {
            Some(topic) => self
                .lanes
                .entry(topic.to_string())
                .or_insert_with(|| spawn_worker(workers)),
            None => self.error_lane.get_or_insert_with(|| spawn_worker(workers)),
        }
    }

    /// Close every lane and wait for queued callbacks to finish.
    pub(crate) async fn finish(mut self) {
        self.lanes.clear();
        self.error_lane = None;
        for worker in self.workers.drain(..) {
            if let Err(err) = worker.await {
                warn!(error = %err, "callback worker panicked");
            }
        }
    }
}

fn spawn_worker(workers: &mut Vec<JoinHandle<()>>) -> mpsc::UnboundedSender<BoxFuture> {
    let (tx, mut rx) = mpsc::unbounded_channel::<BoxFuture>();
    workers.push(tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            job.await;
        }
    }));
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test]
    async fn test_invoke_sync_and_async() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let sync = Callback::sync(move |v: i32| sink.lock().unwrap().push(v));
        let sink = seen.clone();
        let asynchronous = Callback::from_async(move |v: i32| {
            let sink = sink.clone();
            async move {
                tokio::task::yield_now().await;
                sink.lock().unwrap().push(v * 10);
            }
        });

        assert!(!sync.is_async());
        assert!(asynchronous.is_async());
        sync.invoke(1).await;
        asynchronous.invoke(2).await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 20]);
    }

    #[tokio::test]
    async fn test_background_lane_preserves_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback = Callback::from_async(move |v: u64| {
            let sink = sink.clone();
            async move {
                // later messages finish their sleep first if run concurrently
                tokio::time::sleep(Duration::from_millis(20 - v * 5)).await;
                sink.lock().unwrap().push(v);
            }
        });

        let mut dispatcher = Dispatcher::new(CallbackMode::Background);
        for v in 0..4 {
            dispatcher.dispatch(Some("topic"), &callback, v).await;
        }
        dispatcher.finish().await;

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_background_error_lane_runs() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback = Callback::from_async(move |v: &'static str| {
            let sink = sink.clone();
            async move { sink.lock().unwrap().push(v) }
        });

        let mut dispatcher = Dispatcher::new(CallbackMode::Background);
        dispatcher.dispatch(None, &callback, "boom").await;
        dispatcher.finish().await;

        assert_eq!(*seen.lock().unwrap(), vec!["boom"]);
    }
}
