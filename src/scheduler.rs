//! Deferred tasks and timers
//!
//! Geometry refreshes run on a zero-delay task and focus waits race a
//! timer. Both go through `Scheduler` so that the browser event loop and
//! deterministic tests can drive the same manager code.

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub trait Scheduler {
    /// Run `task` once the current task has finished
    fn defer(&self, task: Box<dyn FnOnce()>);

    /// Future resolving after `ms` milliseconds
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

#[derive(Default)]
struct ManualState {
    now: u64,
    tasks: VecDeque<Box<dyn FnOnce()>>,
    timers: Vec<(u64, oneshot::Sender<()>)>,
}

/// Scheduler driven by hand with a virtual clock
///
/// Deferred tasks queue until `run_pending`; timers fire when `advance`
/// moves the clock past their deadline.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    pub fn pending_tasks(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Run queued tasks, including ones queued while running, and return
    /// how many ran
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.state.borrow_mut().tasks.pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Move the clock forward, firing due timers, then run pending tasks
    pub fn advance(&self, ms: u64) {
        let due = {
            let mut state = self.state.borrow_mut();
            state.now += ms;
            let now = state.now;
            let (due, waiting): (Vec<_>, Vec<_>) =
                state.timers.drain(..).partition(|(deadline, _)| *deadline <= now);
            state.timers = waiting;
            due
        };
        for (_, sender) in due {
            let _ = sender.send(());
        }
        self.run_pending();
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        self.state.borrow_mut().tasks.push_back(task);
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        let (sender, receiver) = oneshot::channel();
        {
            let mut state = self.state.borrow_mut();
            let deadline = state.now + u64::from(ms);
            state.timers.push((deadline, sender));
        }
        Box::pin(async move {
            let _ = receiver.await;
        })
    }
}

/// Scheduler backed by `window.setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let callback = Closure::once_into_js(move || task());
        match web_sys::window() {
            Some(window) => {
                if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    0,
                ) {
                    log::error!("setTimeout failed: {:?}", e);
                }
            }
            None => log::error!("No window available to defer task"),
        }
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve: js_sys::Function, _reject: js_sys::Function| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
            }
        });
        Box::pin(async move {
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        })
    }
}
