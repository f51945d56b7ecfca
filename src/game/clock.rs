use log::debug;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use super::Side;

/// Remaining time for both sides, in milliseconds, and whose time is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockState {
    active: Side,
    remaining_ms: [u64; 2],
    bonus_ms: u64,
}

impl ClockState {
    /// Both sides start with `total_ms`; White's time runs first.
    pub fn new(total_ms: u64, bonus_ms: u64) -> Self {
        Self {
            active: Side::White,
            remaining_ms: [total_ms; 2],
            bonus_ms,
        }
    }

    /// Charge `elapsed` to the side whose time is running, flooring at zero.
    pub fn tick(&mut self, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let slot = &mut self.remaining_ms[self.active.index()];
        *slot = slot.saturating_sub(elapsed_ms);
    }

    pub fn credit_bonus(&mut self, side: Side) {
        let slot = &mut self.remaining_ms[side.index()];
        *slot = slot.saturating_add(self.bonus_ms);
    }

    /// Credit the bonus to `mover` and start the opponent's time.
    pub fn pass_turn(&mut self, mover: Side) -> Side {
        debug_assert_eq!(mover, self.active, "turn passed by the idle side");
        self.credit_bonus(mover);
        self.active = mover.opponent();
        self.active
    }

    pub fn remaining(&self, side: Side) -> u64 {
        self.remaining_ms[side.index()]
    }

    pub fn is_expired(&self) -> bool {
        self.expired_side().is_some()
    }

    /// The first side (White before Black) whose flag has fallen.
    pub fn expired_side(&self) -> Option<Side> {
        Side::ALL.into_iter().find(|&side| self.remaining(side) == 0)
    }

    pub fn active(&self) -> Side {
        self.active
    }

    pub fn bonus(&self) -> u64 {
        self.bonus_ms
    }
}

/// Shared handle to a [`ClockState`].
///
/// The countdown thread and the polling loop both go through this handle, and
/// every read or write takes the same lock, so the active side can never flip
/// in the middle of a decrement.
#[derive(Debug, Clone)]
pub struct Clock {
    state: Arc<Mutex<ClockState>>,
}

impl Clock {
    pub fn new(total_ms: u64, bonus_ms: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClockState::new(total_ms, bonus_ms))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        // The state is plain numbers; a panic mid-update cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tick(&self, elapsed: Duration) {
        self.lock().tick(elapsed);
    }

    pub fn credit_bonus(&self, side: Side) {
        self.lock().credit_bonus(side);
    }

    pub fn pass_turn(&self, mover: Side) -> Side {
        let mut state = self.lock();
        let next = state.pass_turn(mover);
        debug!(
            "{} credited {} ms, {} ms left; {} to move",
            mover,
            state.bonus(),
            state.remaining(mover),
            next
        );
        next
    }

    pub fn remaining(&self, side: Side) -> u64 {
        self.lock().remaining(side)
    }

    pub fn is_expired(&self) -> bool {
        self.lock().is_expired()
    }

    pub fn expired_side(&self) -> Option<Side> {
        self.lock().expired_side()
    }

    pub fn active(&self) -> Side {
        self.lock().active()
    }

    /// Consistent copy of the whole state taken under one lock.
    pub fn snapshot(&self) -> ClockState {
        self.lock().clone()
    }
}

/// Background thread that charges wall-clock time to the active side.
///
/// The thread waits on a channel between samples, so dropping the sender
/// wakes it at once instead of after a full interval.
pub struct Countdown {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Countdown {
    /// Start sampling the wall clock every `interval`.
    pub fn start(clock: Clock, interval: Duration) -> io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("countdown".to_string())
            .spawn(move || {
                let mut last = Instant::now();
                while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(interval) {
                    // Only whole milliseconds are charged; the remainder
                    // carries over to the next sample.
                    let elapsed_ms = last.elapsed().as_millis() as u64;
                    if elapsed_ms > 0 {
                        clock.tick(Duration::from_millis(elapsed_ms));
                        last += Duration::from_millis(elapsed_ms);
                    }
                }
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Wake the thread and wait for it to exit. Returns without waiting out
    /// the current interval.
    pub fn stop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("countdown thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_floors_at_zero() {
        let mut state = ClockState::new(1_500, 0);
        state.tick(Duration::from_millis(1_000));
        assert_eq!(state.remaining(Side::White), 500);
        state.tick(Duration::from_secs(3_600));
        assert_eq!(state.remaining(Side::White), 0);
        state.tick(Duration::from_secs(1));
        assert_eq!(state.remaining(Side::White), 0);
    }

    #[test]
    fn tick_only_charges_active_side() {
        let mut state = ClockState::new(10_000, 0);
        state.tick(Duration::from_millis(2_500));
        assert_eq!(state.remaining(Side::Black), 10_000);

        state.pass_turn(Side::White);
        state.tick(Duration::from_millis(1_000));
        assert_eq!(state.remaining(Side::White), 7_500);
        assert_eq!(state.remaining(Side::Black), 9_000);
    }

    #[test]
    fn bonus_is_exact_and_one_sided() {
        let mut state = ClockState::new(60_000, 5_000);
        state.credit_bonus(Side::Black);
        assert_eq!(state.remaining(Side::Black), 65_000);
        assert_eq!(state.remaining(Side::White), 60_000);
    }

    #[test]
    fn pass_turn_credits_mover_and_flips() {
        let mut state = ClockState::new(10_000, 1_000);
        assert_eq!(state.pass_turn(Side::White), Side::Black);
        assert_eq!(state.active(), Side::Black);
        assert_eq!(state.remaining(Side::White), 11_000);
        assert_eq!(state.remaining(Side::Black), 10_000);
    }

    #[test]
    fn expired_iff_a_side_is_at_zero() {
        let mut state = ClockState::new(1_000, 0);
        assert!(!state.is_expired());
        assert_eq!(state.expired_side(), None);

        state.pass_turn(Side::White);
        state.tick(Duration::from_millis(999));
        assert!(!state.is_expired());
        state.tick(Duration::from_millis(1));
        assert!(state.is_expired());
        assert_eq!(state.expired_side(), Some(Side::Black));
    }

    #[test]
    fn zero_time_game_is_expired_immediately() {
        assert!(ClockState::new(0, 10_000).is_expired());
    }

    #[test]
    fn shared_handle_sees_same_state() {
        let clock = Clock::new(5_000, 0);
        let other = clock.clone();
        other.tick(Duration::from_millis(2_000));
        assert_eq!(clock.remaining(Side::White), 3_000);
        assert_eq!(clock.snapshot(), other.snapshot());
    }

    #[test]
    fn countdown_charges_wall_time() {
        let clock = Clock::new(10_000, 0);
        let mut countdown = Countdown::start(clock.clone(), Duration::from_millis(5)).unwrap();
        thread::sleep(Duration::from_millis(60));
        countdown.stop();
        assert!(!countdown.is_running());

        let left = clock.remaining(Side::White);
        assert!(left < 10_000, "no time was charged");
        assert!(left > 5_000, "charged far more than elapsed: {}", left);
        assert_eq!(clock.remaining(Side::Black), 10_000);

        // Stopped threads charge nothing more.
        thread::sleep(Duration::from_millis(20));
        assert_eq!(clock.remaining(Side::White), left);
    }

    #[test]
    fn stop_does_not_wait_out_the_interval() {
        let clock = Clock::new(10_000, 0);
        let mut countdown = Countdown::start(clock.clone(), Duration::from_secs(30)).unwrap();
        thread::sleep(Duration::from_millis(10));

        let started = Instant::now();
        countdown.stop();
        assert!(started.elapsed() < Duration::from_secs(1), "stop() slept through the interval");
        assert!(!countdown.is_running());
        assert_eq!(clock.remaining(Side::White), 10_000);
    }
}
