use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::clock::{Clock, TimerHandle};
use super::progress::{ProgressState, RandomSource, SimulatedProgress};

type Listener = Rc<dyn Fn(&ProgressState)>;

struct TickerInner {
    progress: SimulatedProgress,
    random: Box<dyn RandomSource>,
    clock: Rc<dyn Clock>,
    timer: Option<TimerHandle>,
    listener: Listener,
}

/// Drives a `SimulatedProgress` from a `Clock`, one timer at a time.
///
/// Only a single timer is ever armed; stopping drops it, so no tick can
/// fire after `stop`, `complete`, `fail` or `reset`.
#[derive(Clone)]
pub struct ProgressTicker {
    inner: Rc<RefCell<TickerInner>>,
}

impl ProgressTicker {
    pub fn new(
        clock: Rc<dyn Clock>,
        random: Box<dyn RandomSource>,
        listener: impl Fn(&ProgressState) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TickerInner {
                progress: SimulatedProgress::default(),
                random,
                clock,
                timer: None,
                listener: Rc::new(listener),
            })),
        }
    }

    pub fn state(&self) -> ProgressState {
        self.inner.borrow().progress.state()
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.inner.borrow().timer.is_some()
    }

    /// Restart from 0% in the upload phase.
    pub fn start(&self) {
        let delay = {
            let mut inner = self.inner.borrow_mut();
            inner.timer = None;
            inner.progress.start()
        };
        self.notify();
        Self::arm(&self.inner, delay);
    }

    /// Cancel the pending tick, leaving progress where it is. Idempotent.
    pub fn stop(&self) {
        let timer = self.inner.borrow_mut().timer.take();
        drop(timer);
    }

    /// Stop and jump to 100% for a successful result.
    pub fn complete(&self) {
        self.stop();
        self.inner.borrow_mut().progress.complete();
        self.notify();
    }

    /// Stop and mark the run as finished.
    pub fn finish(&self) {
        self.stop();
        self.inner.borrow_mut().progress.finish();
        self.notify();
    }

    pub fn reset(&self) {
        self.stop();
        self.inner.borrow_mut().progress.reset();
    }

    fn notify(&self) {
        let (state, listener) = {
            let inner = self.inner.borrow();
            (inner.progress.state(), inner.listener.clone())
        };
        listener(&state);
    }

    fn arm(inner: &Rc<RefCell<TickerInner>>, delay: Duration) {
        let clock = inner.borrow().clock.clone();
        let weak = Rc::downgrade(inner);
        let handle = clock.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Self::on_tick(&inner);
                }
            }),
        );
        inner.borrow_mut().timer = Some(handle);
    }

    fn on_tick(inner: &Rc<RefCell<TickerInner>>) {
        let (next, state, listener) = {
            let mut guard = inner.borrow_mut();
            // This timer has fired; forget its handle.
            guard.timer = None;
            let TickerInner {
                progress,
                random,
                listener,
                ..
            } = &mut *guard;
            let next = progress.tick(random.as_mut());
            (next, progress.state(), listener.clone())
        };
        listener(&state);

        // The listener may have stopped or finished the run.
        let still_ticking = inner.borrow().progress.is_ticking();
        if let (Some(delay), true) = (next, still_ticking) {
            Self::arm(inner, delay);
        }
    }
}

impl std::fmt::Debug for ProgressTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ProgressTicker")
            .field("state", &inner.progress.state())
            .field("timer", &inner.timer)
            .finish()
    }
}
