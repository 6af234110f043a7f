//! Frame driver: runs one emulation frame per admitted tick.

use emu_core::{Indicator, Indicators, Machine};

use crate::clock::HostClock;
use crate::controller::{FullSpeedPhase, PaceController};
use crate::host::Host;
use crate::timer::{Tick, TickSource};

/// What happened to a tick handed to [`FrameDriver::on_tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was executed.
    Executed,
    /// The tick was older than the time limit; the frame was skipped.
    Stale,
    /// The tick belonged to a source that is no longer active.
    Dropped,
}

/// Per-frame bookkeeping around [`Machine::run_frame`].
#[derive(Debug, Default)]
pub struct FrameDriver {
    indicators: Indicators,
    frames_run: u64,
    frames_skipped: u64,
}

impl FrameDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one tick.
    ///
    /// A tick whose age has reached the preset's time limit is discarded
    /// without running a frame, so a host that fell behind catches up by
    /// skipping rather than by bursting. Everything else runs exactly one
    /// frame, then decays indicators, then performs at most one deferred
    /// snapshot operation.
    pub fn on_tick<M, H, C>(
        &mut self,
        tick: Tick,
        pace: &mut PaceController<C>,
        machine: &mut M,
        host: &mut H,
    ) -> TickOutcome
    where
        M: Machine,
        H: Host,
        C: HostClock,
    {
        if !pace.admit(tick) {
            tracing::trace!("dropping {:?} tick from inactive source", tick.source);
            return TickOutcome::Dropped;
        }

        let running_full = pace.state().fullspeed_phase() == FullSpeedPhase::Running;
        let delay = pace.now().saturating_sub(tick.timestamp);
        if delay >= pace.state().time_limit() {
            tracing::trace!("skipping stale tick, delay={delay:?}");
            self.frames_skipped += 1;
            // The self-paced chain has to keep going even when a tick is skipped.
            if tick.source == TickSource::Internal && running_full {
                pace.emit_internal_tick();
            }
            return TickOutcome::Stale;
        }

        if let Err(fault) = machine.run_frame(&mut self.indicators) {
            tracing::warn!("emulation fault: {fault}");
        }
        self.frames_run += 1;

        for indicator in self.indicators.tick() {
            tracing::trace!("{indicator:?} countdown expired");
            machine.indicator_expired(indicator);
        }

        if machine.deferred_load_pending() {
            if let Err(err) = machine.perform_load() {
                tracing::error!("deferred snapshot load failed: {err}");
            }
        } else if machine.deferred_save_pending() {
            if let Err(err) = machine.perform_save() {
                tracing::error!("deferred snapshot save failed: {err}");
            }
        }

        if pace.state().fullspeed_phase() == FullSpeedPhase::Running {
            pace.emit_internal_tick();
        }

        let now = pace.now();
        if let Some(sample) = pace.throughput_mut().record_frame(machine.clock(), now) {
            host.publish_throughput(sample.mhz, sample.percent);
        }

        TickOutcome::Executed
    }

    /// Whether the machine is still inside its autoboot window.
    #[must_use]
    pub fn autoboot_active(&self) -> bool {
        self.indicators.is_active(Indicator::Autoboot)
    }

    #[must_use]
    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    pub fn indicators_mut(&mut self) -> &mut Indicators {
        &mut self.indicators
    }

    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    #[must_use]
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}
