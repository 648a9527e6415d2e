// Host-side tests for the tempo scheduler using a recording timer.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tunnel_core::*;

#[derive(Default, Debug)]
struct TimerLog {
    scheduled: Vec<(u32, Duration)>,
    cancelled: Vec<u32>,
}

struct RecordingTimer {
    next: u32,
    fail: bool,
    log: Rc<RefCell<TimerLog>>,
}

impl RecordingTimer {
    fn new() -> (Self, Rc<RefCell<TimerLog>>) {
        let log = Rc::new(RefCell::new(TimerLog::default()));
        (
            Self {
                next: 1,
                fail: false,
                log: log.clone(),
            },
            log,
        )
    }
}

impl BeatTimer for RecordingTimer {
    type Handle = u32;

    fn schedule(&mut self, delay: Duration) -> Result<u32, SequencerError> {
        if self.fail {
            return Err(SequencerError::Timer("no timer available".into()));
        }
        let handle = self.next;
        self.next += 1;
        self.log.borrow_mut().scheduled.push((handle, delay));
        Ok(handle)
    }

    fn cancel(&mut self, handle: u32) {
        self.log.borrow_mut().cancelled.push(handle);
    }
}

fn started(bpm: f32) -> Sequencer {
    let mut seq = Sequencer::new(&TunnelConfig::default());
    seq.begin(bpm).unwrap();
    seq
}

#[test]
fn arm_schedules_one_beat_period() {
    let (timer, log) = RecordingTimer::new();
    let mut sched = TempoScheduler::new(timer);
    let period = sched.arm(120.0, 1.0).unwrap();
    assert_eq!(period, Duration::from_millis(500));
    assert!(sched.is_armed());
    assert_eq!(sched.armed_period(), Some(period));
    assert_eq!(log.borrow().scheduled, vec![(1, period)]);
}

#[test]
fn rearming_cancels_the_pending_timer() {
    let (timer, log) = RecordingTimer::new();
    let mut sched = TempoScheduler::new(timer);
    sched.arm(120.0, 1.0).unwrap();
    sched.arm(120.0, 2.0).unwrap();
    assert_eq!(log.borrow().cancelled, vec![1]);
    assert_eq!(sched.armed_period(), Some(Duration::from_millis(250)));
}

#[test]
fn fire_runs_beat_then_rearms() {
    let (timer, log) = RecordingTimer::new();
    let mut sched = TempoScheduler::new(timer);
    let mut seq = started(120.0);
    let mut out = Vec::new();
    sched.arm(120.0, 1.0).unwrap();

    sched.fire(&mut seq, &mut out).unwrap();
    assert_eq!(seq.length(), SPACING);
    assert!(out.iter().any(|c| matches!(c, SceneCommand::SpawnSegment { .. })));
    assert!(sched.is_armed());
    // the fired handle is spent, not cancelled
    assert!(log.borrow().cancelled.is_empty());
    assert_eq!(log.borrow().scheduled.len(), 2);
}

#[test]
fn speed_change_applies_from_the_next_beat() {
    let (timer, log) = RecordingTimer::new();
    let mut sched = TempoScheduler::new(timer);
    let mut seq = started(120.0);
    let mut out = Vec::new();
    sched.arm(120.0, seq.speed().factor).unwrap();

    let mut input = InputState::default();
    input.set_button(BUTTON_LEFT, true);
    let time = FrameTime {
        delta_ms: 16.0,
        elapsed_sec: 0.0,
    };
    for _ in 0..20 {
        seq.frame(&input, time, &mut out);
    }
    assert!(seq.speed().factor > 1.0);
    // pending interval keeps the period it was armed with
    assert_eq!(sched.armed_period(), Some(Duration::from_millis(500)));
    assert_eq!(log.borrow().scheduled.len(), 1);

    let next = sched.fire(&mut seq, &mut out).unwrap();
    assert!(next < Duration::from_millis(500));
    assert_eq!(next, beat_period(120.0, seq.speed().factor));
}

#[test]
fn fire_before_tempo_fails_and_stays_idle() {
    let (timer, log) = RecordingTimer::new();
    let mut sched = TempoScheduler::new(timer);
    let mut seq = Sequencer::new(&TunnelConfig::default());
    let mut out = Vec::new();
    assert_eq!(sched.fire(&mut seq, &mut out), Err(SequencerError::NotStarted));
    assert!(!sched.is_armed());
    assert!(log.borrow().scheduled.is_empty());
}

#[test]
fn invalid_inputs_do_not_touch_the_timer() {
    let (timer, log) = RecordingTimer::new();
    let mut sched = TempoScheduler::new(timer);
    assert!(matches!(sched.arm(0.0, 1.0), Err(SequencerError::InvalidTempo(_))));
    assert!(matches!(sched.arm(120.0, 0.0), Err(SequencerError::InvalidSpeed(_))));
    assert!(matches!(sched.arm(120.0, f32::NAN), Err(SequencerError::InvalidSpeed(_))));
    assert!(!sched.is_armed());
    assert!(log.borrow().scheduled.is_empty());
}

#[test]
fn timer_failure_propagates() {
    let (mut timer, _log) = RecordingTimer::new();
    timer.fail = true;
    let mut sched = TempoScheduler::new(timer);
    assert!(matches!(sched.arm(120.0, 1.0), Err(SequencerError::Timer(_))));
    assert!(!sched.is_armed());
}

#[test]
fn stop_and_drop_cancel_pending() {
    let (timer, log) = RecordingTimer::new();
    let mut sched = TempoScheduler::new(timer);
    sched.arm(120.0, 1.0).unwrap();
    sched.stop();
    assert!(!sched.is_armed());
    assert_eq!(sched.armed_period(), None);
    assert_eq!(log.borrow().cancelled, vec![1]);

    sched.arm(120.0, 1.0).unwrap();
    drop(sched);
    assert_eq!(log.borrow().cancelled, vec![1, 2]);
}
