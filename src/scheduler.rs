//! Deferred work for the single-threaded game loop.
//!
//! Stands in for `setTimeout` and `requestAnimationFrame`: tasks are plain
//! values handed back to the caller when due, so the browser pump and native
//! tests drive the same queue with a real or a fake clock.

use std::collections::VecDeque;

/// Groups tasks so they can be dropped together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

struct Timer<T> {
    due_ms: f64,
    seq: u64,
    token: Option<CancelToken>,
    task: T,
}

struct FrameTask<T> {
    token: Option<CancelToken>,
    task: T,
}

pub struct Scheduler<T> {
    now_ms: f64,
    seq: u64,
    next_token: u64,
    timers: Vec<Timer<T>>,
    frames: VecDeque<FrameTask<T>>,
    /// Frame tasks queued before the current frame was opened.
    frame_ready: usize,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            seq: 0,
            next_token: 0,
            timers: Vec::new(),
            frames: VecDeque::new(),
            frame_ready: 0,
        }
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn token(&mut self) -> CancelToken {
        self.next_token += 1;
        CancelToken(self.next_token)
    }

    /// Run `task` once `delay_ms` has elapsed on the scheduler clock.
    pub fn after(&mut self, delay_ms: f64, task: T, token: Option<CancelToken>) {
        self.seq += 1;
        self.timers.push(Timer {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq: self.seq,
            token,
            task,
        });
    }

    /// Run `task` on the next frame.
    pub fn next_frame(&mut self, task: T, token: Option<CancelToken>) {
        self.frames.push_back(FrameTask { token, task });
    }

    /// Drop every pending task submitted with `token`. Returns how many were dropped.
    pub fn cancel(&mut self, token: CancelToken) -> usize {
        let before = self.timers.len() + self.frames.len();
        self.timers.retain(|t| t.token != Some(token));

        let mut kept = VecDeque::with_capacity(self.frames.len());
        let mut ready = 0;
        for (i, f) in self.frames.drain(..).enumerate() {
            if f.token == Some(token) {
                continue;
            }
            if i < self.frame_ready {
                ready += 1;
            }
            kept.push_back(f);
        }
        self.frames = kept;
        self.frame_ready = ready;

        before - (self.timers.len() + self.frames.len())
    }

    /// Move the clock forward and open a new frame. Frame tasks queued from
    /// here on wait for the following frame. The clock never runs backwards.
    pub fn advance_to(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        self.frame_ready = self.frames.len();
    }

    /// Next task to run: due timers first, in due-time then submission order,
    /// then the tasks of the open frame.
    pub fn pop_due(&mut self) -> Option<T> {
        let next_timer = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= self.now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i);
        if let Some(i) = next_timer {
            return Some(self.timers.swap_remove(i).task);
        }
        if self.frame_ready > 0 {
            self.frame_ready -= 1;
            return self.frames.pop_front().map(|f| f.task);
        }
        None
    }

    pub fn pending(&self) -> usize {
        self.timers.len() + self.frames.len()
    }

    /// Due time of the earliest timer, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .iter()
            .map(|t| t.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>) -> Vec<&'static str> {
        std::iter::from_fn(|| s.pop_due()).collect()
    }

    #[test]
    fn timers_fire_in_due_then_submission_order() {
        let mut s = Scheduler::new();
        s.after(100.0, "b", None);
        s.after(50.0, "a", None);
        s.after(100.0, "c", None);
        s.advance_to(99.0);
        assert_eq!(drain(&mut s), vec!["a"]);
        s.advance_to(100.0);
        assert_eq!(drain(&mut s), vec!["b", "c"]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn frame_tasks_wait_for_next_frame() {
        let mut s = Scheduler::new();
        s.next_frame("first", None);
        assert_eq!(s.pop_due(), None);
        s.advance_to(16.0);
        assert_eq!(s.pop_due(), Some("first"));
        // queued while the frame is running
        s.next_frame("second", None);
        assert_eq!(s.pop_due(), None);
        s.advance_to(32.0);
        assert_eq!(s.pop_due(), Some("second"));
    }

    #[test]
    fn cancel_drops_only_tokened_tasks() {
        let mut s = Scheduler::new();
        let old = s.token();
        let new = s.token();
        s.after(10.0, "stale timer", Some(old));
        s.next_frame("stale frame", Some(old));
        s.after(10.0, "fresh", Some(new));
        s.next_frame("untokened", None);
        s.advance_to(5.0);
        assert_eq!(s.cancel(old), 2);
        assert_eq!(s.pop_due(), Some("untokened"));
        s.advance_to(10.0);
        assert_eq!(drain(&mut s), vec!["fresh"]);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.advance_to(50.0);
        s.advance_to(10.0);
        assert_eq!(s.now(), 50.0);
        s.after(5.0, (), None);
        assert_eq!(s.next_deadline(), Some(55.0));
    }
}
