//! Pace controller.
//!
//! Owns the speed selection, the periodic frame timer and the full-speed
//! state machine. Exactly one tick source is live at a time: the timer while
//! a preset is selected, or the controller's own internal ticks while full
//! speed is running.
//!
//! Every operation configures the timer completely before recording the new
//! selection, so nothing observing the state mid-dispatch can see a new
//! speed paired with a stale timer.

use std::time::Duration;

use emu_core::{Observable, Value};

use crate::clock::HostClock;
use crate::speed::{self, DEFAULT_PRESET, PRESETS, SpeedSelection};
use crate::throughput::Throughput;
use crate::timer::{PeriodicTimer, Tick, TickSource};

/// Highest frame-skip ceiling accepted from the command line.
pub const MAX_FRAME_SKIP: u32 = 9;

/// Progress of fast-forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullSpeedPhase {
    /// Normal pacing.
    #[default]
    None,
    /// Fast-forward requested but deferred (a modifier is held, or focus
    /// moved away mid fast-forward). The timer paces the loop meanwhile.
    Selected,
    /// The loop re-ticks itself after every frame with no wait.
    Running,
}

/// The single mutable record behind the controller.
#[derive(Debug, Clone)]
pub struct PaceState {
    selected_speed: SpeedSelection,
    fullspeed_phase: FullSpeedPhase,
    timer: PeriodicTimer,
    time_limit: Duration,
    max_frame_skip: u32,
    pause_reason: Option<String>,
    user_paused: bool,
    fast_forward: bool,
    throughput: Throughput,
    /// An internal tick has been emitted and not yet consumed.
    internal_in_flight: bool,
    emitted: Option<Tick>,
}

impl PaceState {
    fn new(now: Duration) -> Self {
        let preset = &PRESETS[DEFAULT_PRESET];
        Self {
            selected_speed: SpeedSelection::Preset(DEFAULT_PRESET),
            fullspeed_phase: FullSpeedPhase::None,
            timer: PeriodicTimer::new(preset.interval),
            time_limit: preset.time_limit(),
            max_frame_skip: preset.max_frame_skip,
            pause_reason: None,
            user_paused: false,
            fast_forward: false,
            throughput: Throughput::new(now),
            internal_in_flight: false,
            emitted: None,
        }
    }

    #[must_use]
    pub fn selected_speed(&self) -> SpeedSelection {
        self.selected_speed
    }

    #[must_use]
    pub fn fullspeed_phase(&self) -> FullSpeedPhase {
        self.fullspeed_phase
    }

    #[must_use]
    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Timer period of the active preset.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.timer.interval()
    }

    /// Ticks at least this old are skipped.
    #[must_use]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    #[must_use]
    pub fn max_frame_skip(&self) -> u32 {
        self.max_frame_skip
    }

    #[must_use]
    pub fn pause_reason(&self) -> Option<&str> {
        self.pause_reason.as_deref()
    }

    /// Whether the pause hotkey is holding emulation.
    #[must_use]
    pub fn is_user_paused(&self) -> bool {
        self.user_paused
    }

    /// Whether any trigger currently wants fast-forward.
    #[must_use]
    pub fn is_fast_forward(&self) -> bool {
        self.fast_forward
    }

    #[must_use]
    pub fn throughput(&self) -> &Throughput {
        &self.throughput
    }
}

/// Speed, pause and fast-forward operations over a [`PaceState`].
pub struct PaceController<C: HostClock> {
    state: PaceState,
    clock: C,
}

impl<C: HostClock> PaceController<C> {
    /// Create a controller at the default preset, then apply `initial`.
    pub fn new(clock: C, initial: SpeedSelection) -> Self {
        let mut pace = Self {
            state: PaceState::new(clock.now()),
            clock,
        };
        pace.set_speed(initial);
        pace
    }

    #[must_use]
    pub fn state(&self) -> &PaceState {
        &self.state
    }

    /// Current host time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Select a preset, pause, or full speed.
    ///
    /// An out-of-range preset falls back to the 100% preset with a
    /// warning. Any explicit selection clears the pause hotkey.
    pub fn set_speed(&mut self, selection: SpeedSelection) {
        tracing::debug!("setspeed {selection:?}");
        self.state.user_paused = false;

        let selection = match selection {
            SpeedSelection::Full => {
                self.start_fullspeed();
                SpeedSelection::Full
            }
            SpeedSelection::Paused => {
                self.state.timer.stop();
                self.state.fullspeed_phase = FullSpeedPhase::None;
                self.state.fast_forward = false;
                SpeedSelection::Paused
            }
            SpeedSelection::Preset(requested) => {
                self.state.timer.stop();
                self.state.fullspeed_phase = FullSpeedPhase::None;
                self.state.fast_forward = false;

                let (index, preset) = speed::resolve(requested);
                self.state.timer.set_interval(preset.interval);
                self.state.time_limit = preset.time_limit();
                self.state.max_frame_skip = preset.max_frame_skip;
                tracing::debug!(
                    "new speed #{index} ({}), timer interval={:?}, max frame skip={}",
                    preset.name,
                    preset.interval,
                    preset.max_frame_skip
                );
                self.state.timer.start(self.clock.now());
                SpeedSelection::Preset(index)
            }
        };

        self.state.selected_speed = selection;
    }

    /// Stop the timer and record why. Idempotent; the selection is kept.
    pub fn pause(&mut self, reason: &str) {
        if self.state.timer_armed() {
            tracing::debug!("pausing ({reason})");
        }
        self.state.timer.stop();
        self.state.pause_reason = Some(reason.to_string());
    }

    /// Restart the timer after [`pause`](Self::pause).
    ///
    /// Only a selected preset is timer-paced: resuming under `Paused` or
    /// `Full`, while full speed is running, or while the pause hotkey is
    /// held leaves the timer stopped.
    pub fn resume(&mut self) {
        self.state.pause_reason = None;
        if matches!(self.state.selected_speed, SpeedSelection::Preset(_))
            && !self.state.user_paused
            && self.state.fullspeed_phase != FullSpeedPhase::Running
        {
            self.state.timer.start(self.clock.now());
        }
    }

    /// Request fast-forward.
    ///
    /// A dedicated key (`via_modifier == false`) starts full speed at once,
    /// even while `Paused` is selected; releasing it returns to `Paused`.
    /// A modifier only latches the request as [`FullSpeedPhase::Selected`],
    /// to be started by the next explicit trigger.
    pub fn enter_fastforward(&mut self, via_modifier: bool) {
        if self.state.fullspeed_phase == FullSpeedPhase::Running {
            return;
        }
        if via_modifier {
            tracing::debug!("full-speed latched");
            self.state.fullspeed_phase = FullSpeedPhase::Selected;
        } else {
            self.start_fullspeed();
        }
    }

    /// Leave fast-forward.
    ///
    /// Does nothing while full speed is selected explicitly; the speed menu
    /// owns that mode. Releasing a modifier mid fast-forward only downgrades
    /// to [`FullSpeedPhase::Selected`] and hands pacing back to the timer.
    pub fn exit_fastforward(&mut self, via_modifier: bool) {
        if self.state.selected_speed == SpeedSelection::Full {
            return;
        }
        self.state.fast_forward = false;

        let was_running = self.state.fullspeed_phase == FullSpeedPhase::Running;
        if via_modifier {
            if was_running {
                tracing::debug!("full-speed downgraded to latched");
                self.state.fullspeed_phase = FullSpeedPhase::Selected;
                self.restart_timer();
            }
        } else {
            tracing::debug!("stopping full-speed");
            self.state.fullspeed_phase = FullSpeedPhase::None;
            if was_running {
                self.restart_timer();
            }
        }
    }

    /// Pause hotkey: toggle a user pause.
    ///
    /// Pausing halts both the timer and self-pacing. Unpausing re-arms
    /// whichever source is active, unless `Paused` is selected.
    pub fn toggle_pause(&mut self) {
        if self.state.user_paused {
            if self.state.selected_speed == SpeedSelection::Paused {
                return;
            }
            tracing::debug!("unpaused");
            self.state.user_paused = false;
            if self.state.fullspeed_phase == FullSpeedPhase::Running {
                self.emit_internal_tick();
            } else if matches!(self.state.selected_speed, SpeedSelection::Preset(_)) {
                self.state.timer.start(self.clock.now());
            }
        } else {
            tracing::debug!("paused");
            self.state.timer.stop();
            self.state.user_paused = true;
        }
    }

    /// Override the renderer's frame-skip ceiling, clamped to
    /// `1..=MAX_FRAME_SKIP`. The next `set_speed` replaces it.
    pub fn set_max_frame_skip(&mut self, max: u32) {
        self.state.max_frame_skip = max.clamp(1, MAX_FRAME_SKIP);
    }

    /// When the loop next needs to wake for a tick. An emitted internal
    /// tick is due immediately.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.state.emitted.is_some() {
            Some(Duration::ZERO)
        } else {
            self.state.timer.next_deadline()
        }
    }

    /// Take the internal tick emitted since the last call, if any.
    pub fn take_emitted(&mut self) -> Option<Tick> {
        self.state.emitted.take()
    }

    /// Take the next due timer tick, if any.
    pub fn poll_timer(&mut self) -> Option<Tick> {
        let now = self.clock.now();
        self.state.timer.poll(now)
    }

    /// Decide whether a dequeued tick may drive a frame.
    ///
    /// Internal ticks are only honoured while full speed is running and
    /// timer ticks only while the timer is armed, so a tick queued before a
    /// mode change never runs under the new mode.
    pub(crate) fn admit(&mut self, tick: Tick) -> bool {
        match tick.source {
            TickSource::Internal => {
                self.state.internal_in_flight = false;
                self.state.fullspeed_phase == FullSpeedPhase::Running && !self.state.user_paused
            }
            TickSource::Timer => self.state.timer_armed(),
        }
    }

    /// Queue the next self-paced tick. At most one is ever in flight.
    pub(crate) fn emit_internal_tick(&mut self) {
        if self.state.internal_in_flight {
            return;
        }
        self.state.internal_in_flight = true;
        self.state.emitted = Some(Tick::internal(self.clock.now()));
    }

    pub(crate) fn throughput_mut(&mut self) -> &mut Throughput {
        &mut self.state.throughput
    }

    fn start_fullspeed(&mut self) {
        self.state.fast_forward = true;
        if self.state.fullspeed_phase != FullSpeedPhase::Running {
            tracing::debug!("starting full-speed");
            self.state.timer.stop();
            self.state.fullspeed_phase = FullSpeedPhase::Running;
        }
        self.emit_internal_tick();
    }

    /// Re-arm the timer after fast-forward, unless something is holding
    /// emulation paused.
    fn restart_timer(&mut self) {
        if matches!(self.state.selected_speed, SpeedSelection::Preset(_))
            && !self.state.user_paused
            && self.state.pause_reason.is_none()
        {
            self.state.timer.start(self.clock.now());
        }
    }
}

impl<C: HostClock> Observable for PaceController<C> {
    fn query(&self, path: &str) -> Option<Value> {
        let state = &self.state;
        let value = match path {
            "speed.selected" => Value::String(state.selected_speed.to_string()),
            "speed.fullspeed_phase" => Value::String(format!("{:?}", state.fullspeed_phase)),
            "speed.fast_forward" => state.fast_forward.into(),
            "timer.armed" => state.timer_armed().into(),
            "timer.interval" => state.interval().into(),
            "timer.time_limit" => state.time_limit.into(),
            "video.max_frame_skip" => state.max_frame_skip.into(),
            "pause.reason" => state.pause_reason().into(),
            "pause.user" => state.user_paused.into(),
            "throughput.mhz" => state.throughput.latest().map(|s| s.mhz).into(),
            "throughput.percent" => state.throughput.latest().map(|s| s.percent).into(),
            _ => return None,
        };
        Some(value)
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "speed.selected",
            "speed.fullspeed_phase",
            "speed.fast_forward",
            "timer.armed",
            "timer.interval",
            "timer.time_limit",
            "video.max_frame_skip",
            "pause.reason",
            "pause.user",
            "throughput.mhz",
            "throughput.percent",
        ]
    }
}
