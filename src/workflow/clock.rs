use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::glib;

/// Something that can run a task once after a delay on the UI thread.
pub trait Clock {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Scoped handle to a scheduled task. Cancelling is idempotent and dropping
/// the handle cancels it.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Clock backed by GLib main-loop timeouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlibClock;

impl Clock for GlibClock {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        // Removing a source that already fired is a GLib critical.
        let fired = Rc::new(Cell::new(false));
        let fired_in_task = fired.clone();
        let source = glib::timeout_add_local_once(delay, move || {
            fired_in_task.set(true);
            task();
        });
        TimerHandle::new(move || {
            if !fired.get() {
                source.remove();
            }
        })
    }
}


#[cfg(test)]
mod tests {
    use super::manual::ManualClock;
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn task_runs_once_when_due() {
        let clock = ManualClock::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _handle = clock.schedule(Duration::from_millis(100), Box::new(move || h.set(h.get() + 1)));

        clock.advance(Duration::from_millis(99));
        assert_eq!(hits.get(), 0);
        clock.advance(Duration::from_millis(1));
        assert_eq!(hits.get(), 1);
        clock.advance(Duration::from_secs(10));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropping_handle_cancels() {
        let clock = ManualClock::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let handle = clock.schedule(Duration::from_millis(10), Box::new(move || h.set(1)));
        drop(handle);
        assert_eq!(clock.pending(), 0);
        clock.advance(Duration::from_secs(1));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let clock = ManualClock::new();
        let mut handle = clock.schedule(Duration::from_millis(10), Box::new(|| {}));
        handle.cancel();
        handle.cancel();
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn tasks_run_in_due_order() {
        let clock = ManualClock::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        let _late = clock.schedule(Duration::from_millis(30), Box::new(move || a.borrow_mut().push("late")));
        let _early = clock.schedule(Duration::from_millis(10), Box::new(move || b.borrow_mut().push("early")));
        clock.advance(Duration::from_millis(50));
        assert_eq!(*log.borrow(), ["early", "late"]);
    }
}
