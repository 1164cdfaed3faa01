//! Solution runner

use cranecuber_hal::{Clock, Motor};

use crate::error::Error;
use crate::motion::{ActuatorSequencer, TimingStats};
use crate::moves::MoveSpec;
use crate::planner::{MoveTranslator, RepositionCounts};
use crate::safety::CancelToken;

/// Outcome of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Moves completed
    pub moves_executed: usize,
    /// Moves in the list
    pub total_moves: usize,
    /// Stopped early by the cancellation flag; the robot is not parked
    pub cancelled: bool,
    /// Time in each primitive
    pub timing: TimingStats,
    /// Repositions per direction
    pub repositions: RepositionCounts,
    /// Wall-clock time of the run
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Average time per executed move
    pub fn average_move_ms(&self) -> u64 {
        if self.moves_executed == 0 {
            0
        } else {
            self.elapsed_ms / self.moves_executed as u64
        }
    }
}

/// Runs move lists on one robot
pub struct SolutionRunner<M: Motor, C: Clock> {
    sequencer: ActuatorSequencer<M, C>,
    translator: MoveTranslator,
}

impl<M: Motor, C: Clock> SolutionRunner<M, C> {
    pub fn new(sequencer: ActuatorSequencer<M, C>) -> Self {
        Self {
            sequencer,
            translator: MoveTranslator::new(),
        }
    }

    pub fn sequencer(&self) -> &ActuatorSequencer<M, C> {
        &self.sequencer
    }

    /// Sequencer access for homing, scanning and shutdown
    pub fn sequencer_mut(&mut self) -> &mut ActuatorSequencer<M, C> {
        &mut self.sequencer
    }

    pub fn into_sequencer(self) -> ActuatorSequencer<M, C> {
        self.sequencer
    }

    /// Execute `moves`, then park
    ///
    /// Every move is checked before the first motion, so an unsupported
    /// move aborts the list with the robot untouched. The cancellation
    /// flag is polled before and after each move; when it is set the run
    /// stops and the caller is expected to shut the robot down.
    pub fn run<T: CancelToken>(&mut self, moves: &[MoveSpec], cancel: &T) -> Result<RunReport, Error> {
        for spec in moves {
            MoveTranslator::check(spec, self.sequencer.profile())?;
        }

        self.sequencer.reset_timing();
        self.translator.reset_counts();
        let started = self.sequencer.clock().now_ms();
        let interval = self.sequencer.config().maintenance_interval as usize;
        let total = moves.len();
        let mut executed = 0;
        let mut cancelled = false;

        for (index, spec) in moves.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            log::info!("move {}/{}: {}", index + 1, total, spec);
            self.translator.apply(&mut self.sequencer, spec)?;
            executed += 1;

            // Keep the squisher from creeping out of place
            if interval > 0 && index % interval == 0 {
                self.sequencer.squisher_reset()?;
            }
            log::debug!("facing: {}", self.sequencer.facing());

            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
        }

        if cancelled {
            log::warn!("run cancelled after {} of {} moves", executed, total);
        } else {
            self.sequencer.park()?;
        }

        let report = RunReport {
            moves_executed: executed,
            total_moves: total,
            cancelled,
            timing: *self.sequencer.timing(),
            repositions: *self.translator.reposition_counts(),
            elapsed_ms: self.sequencer.clock().elapsed_ms(started),
        };
        if executed > 0 {
            log::info!(
                "finished: {}, {}s total, {} moves, avg {}ms per move",
                report.timing,
                report.elapsed_ms / 1000,
                executed,
                report.average_move_ms()
            );
            log::info!("repositions: {}", report.repositions);
        }
        Ok(report)
    }
}
