use std::sync::Mutex;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

/// Receives the completion percentage (0..=100) of a long running call.
///
/// Called from worker threads, values never decrease.
pub trait ProgressSink: Sync {
    fn report(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Sync,
{
    fn report(&self, percent: u8) {
        self(percent)
    }
}

/// Counts finished units of work and forwards increasing percentages to a sink.
///
/// Reports are made while holding `reported`, so the sink sees them in order.
pub(crate) struct ProgressCounter<'a> {
    sink: Option<&'a dyn ProgressSink>,
    total: usize,
    done: AtomicUsize,
    reported: Mutex<u8>,
}

impl<'a> ProgressCounter<'a> {
    pub fn new(sink: Option<&'a dyn ProgressSink>, total: usize) -> Self {
        Self {
            sink,
            total,
            done: AtomicUsize::new(0),
            reported: Mutex::new(0),
        }
    }

    pub fn tick(&self) {
        let Some(sink) = self.sink else {
            return;
        };
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let percent = ((done * 100) / self.total.max(1)).min(100) as u8;
        self.report_above(sink, percent);
    }

    pub fn finish(&self) {
        if let Some(sink) = self.sink {
            self.report_above(sink, 100);
        }
    }

    fn report_above(&self, sink: &dyn ProgressSink, percent: u8) {
        let Ok(mut reported) = self.reported.lock() else {
            return;
        };
        if percent > *reported {
            *reported = percent;
            sink.report(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_is_increasing() {
        let seen = Mutex::new(Vec::new());
        let push = |p: u8| seen.lock().unwrap().push(p);
        let sink: &dyn ProgressSink = &push;
        let counter = ProgressCounter::new(Some(sink), 8);
        for _ in 0..8 {
            counter.tick();
        }
        counter.finish();
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_parallel_ticks_never_decrease() {
        use rayon::prelude::*;

        let seen = Mutex::new(Vec::new());
        let push = |p: u8| seen.lock().unwrap().push(p);
        let sink: &dyn ProgressSink = &push;
        let counter = ProgressCounter::new(Some(sink), 1000);
        (0..1000).into_par_iter().for_each(|_| counter.tick());
        counter.finish();
        let seen = seen.into_inner().unwrap();
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.last(), Some(&100));
    }

    #[test]
    fn test_without_sink() {
        let counter = ProgressCounter::new(None, 0);
        counter.tick();
        counter.finish();
    }
}
