use alloc::vec::Vec;
use core::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::Instant;

use crate::*;

/// Counters accumulated over a game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentStats {
    pub turns: u32,
    /// Cells proven by single-clue propagation.
    pub propagated: u32,
    /// Cells proven by subset elimination.
    pub eliminated: u32,
    pub guesses: u32,
    /// Time spent deciding, summed over all turns.
    pub elapsed: Duration,
}

/// Which step of the turn produced new work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Source {
    Pending,
    Propagation,
    Elimination,
    Guess,
    Sweep,
    Nothing,
}

/// Incremental decision maker for one game.
///
/// Each call to [`Agent::next_action`] takes the outcome of the previous
/// action, folds it into the agent's view of the board, and returns exactly
/// one new action. Deduced mines are marked before any pending reveal is
/// issued.
#[derive(Clone, Debug)]
pub struct Agent<R = SmallRng> {
    config: AgentConfig,
    grid: Grid,
    clues: ClueSet,
    to_reveal: PendingQueue,
    to_mark: PendingQueue,
    awaiting: Option<Coord2>,
    finished: bool,
    rng: R,
    stats: AgentStats,
}

impl Agent<SmallRng> {
    /// Agent whose random fallback is seeded from `config.seed`.
    pub fn new(config: AgentConfig) -> Result<Self> {
        let rng = SmallRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Agent<R> {
    pub fn with_rng(config: AgentConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.size, config.mines),
            clues: ClueSet::new(),
            to_reveal: PendingQueue::new(),
            to_mark: PendingQueue::new(),
            awaiting: Some(config.start),
            finished: false,
            rng,
            stats: AgentStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn clues(&self) -> &ClueSet {
        &self.clues
    }

    pub fn pending_reveals(&self) -> &PendingQueue {
        &self.to_reveal
    }

    pub fn pending_marks(&self) -> &PendingQueue {
        &self.to_mark
    }

    pub fn stats(&self) -> &AgentStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Records `outcome` and chooses the next action.
    ///
    /// The first call must carry the label of the start cell. Once
    /// [`Action::Done`] has been returned every later call returns it again.
    pub fn next_action(&mut self, outcome: Outcome) -> Result<Action> {
        if self.finished {
            return Ok(Action::Done);
        }

        let started = Instant::now();
        self.record(outcome)?;
        let source = self.plan()?;
        let action = self.emit();
        let elapsed = started.elapsed();

        self.stats.turns += 1;
        self.stats.elapsed += elapsed;
        log::debug!(
            "turn {}: {action:?} via {source:?}, {} clues, {} mines left, {elapsed:?}",
            self.stats.turns,
            self.clues.len(),
            self.grid.mines_left()
        );
        Ok(action)
    }

    fn record(&mut self, outcome: Outcome) -> Result<()> {
        match (outcome, self.awaiting) {
            (Outcome::Revealed(label), Some(coords)) => {
                self.grid.set_label(coords, label)?;
                self.awaiting = None;
                self.clues.insert(ActiveClue { coords, label });
                self.clues.purge_around(&self.grid, coords);
                Ok(())
            }
            (Outcome::Marked, None) => Ok(()),
            _ => Err(AgentError::UnexpectedOutcome),
        }
    }

    /// Refills the pending queues, escalating only while they stay empty.
    fn plan(&mut self) -> Result<Source> {
        let fresh = self.apply(propagate(&self.clues, &self.grid))?;
        self.stats.propagated += fresh;
        if !self.is_idle() {
            return Ok(if fresh > 0 {
                Source::Propagation
            } else {
                Source::Pending
            });
        }

        if self.grid.mines_left() == 0 {
            return Ok(self.sweep());
        }

        self.clues.purge(&self.grid);
        let eliminated = eliminate(&self.clues, &self.grid);
        self.stats.eliminated += self.apply(eliminated)?;
        if !self.is_idle() {
            return Ok(Source::Elimination);
        }

        let guess = choose_guess(&self.clues, &self.grid, self.config.fallback, &mut self.rng);
        let Some(guess) = guess else {
            return Ok(Source::Nothing);
        };
        log::debug!("No deduction available, guessing {guess:?}");
        self.stats.guesses += 1;
        self.to_reveal.push(guess.coords());
        Ok(Source::Guess)
    }

    /// Marks deduced mines on the grid right away and queues every new cell.
    fn apply(&mut self, deductions: Deductions) -> Result<u32> {
        let mut fresh = 0;

        for coords in deductions.mines {
            if !self.grid.is_hidden(coords) {
                continue;
            }
            self.grid.set_marked(coords)?;
            self.to_mark.push(coords);
            self.clues.purge_around(&self.grid, coords);
            log::trace!("mine at {coords:?}");
            fresh += 1;
        }

        for coords in deductions.safe {
            if self.grid.is_hidden(coords) && self.to_reveal.push(coords) {
                log::trace!("safe at {coords:?}");
                fresh += 1;
            }
        }

        Ok(fresh)
    }

    /// With every mine marked, the rest of the board is safe.
    fn sweep(&mut self) -> Source {
        if !self.config.sweep_when_budget_met {
            return Source::Nothing;
        }
        let hidden: Vec<_> = self.grid.hidden_cells().collect();
        for coords in hidden {
            self.to_reveal.push(coords);
        }
        if self.to_reveal.is_empty() {
            Source::Nothing
        } else {
            Source::Sweep
        }
    }

    fn emit(&mut self) -> Action {
        if let Some(coords) = self.to_mark.pop() {
            return Action::Mark(coords);
        }

        while let Some(coords) = self.to_reveal.pop() {
            if self.grid.is_hidden(coords) {
                self.awaiting = Some(coords);
                return Action::Reveal(coords);
            }
        }

        self.finished = true;
        Action::Done
    }

    fn is_idle(&self) -> bool {
        self.to_mark.is_empty() && self.to_reveal.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(size: Coord2, mines: CellCount, start: Coord2) -> Agent {
        Agent::new(AgentConfig::new(size, mines, start)).unwrap()
    }

    #[test]
    fn empty_board_reveals_everything_then_finishes() {
        let mut agent = agent((2, 2), 0, (0, 0));

        let mut revealed = Vec::new();
        let mut action = agent.next_action(Outcome::Revealed(0)).unwrap();
        while let Action::Reveal(coords) = action {
            revealed.push(coords);
            action = agent.next_action(Outcome::Revealed(0)).unwrap();
        }
        revealed.sort();

        assert_eq!(action, Action::Done);
        assert_eq!(revealed, [(0, 1), (1, 0), (1, 1)]);
        assert_eq!(agent.grid().marked_count(), 0);
        assert!(agent.is_finished());
    }

    #[test]
    fn single_hidden_neighbor_is_marked_not_revealed() {
        let mut agent = agent((2, 1), 1, (0, 0));

        assert_eq!(
            agent.next_action(Outcome::Revealed(1)).unwrap(),
            Action::Mark((1, 0))
        );
        assert_eq!(agent.grid().cell_at((1, 0)), Some(Cell::Marked));
        assert_eq!(agent.next_action(Outcome::Marked).unwrap(), Action::Done);
    }

    #[test]
    fn marks_are_drained_before_reveals() {
        // (2, 0) = 0 queues both sides; (1, 0) = 1 then forces (0, 0)
        let layout = MineLayout::from_mine_coords((5, 1), &[(0, 0)]).unwrap();
        let mut referee = Referee::new(layout);
        let mut agent = agent((5, 1), 1, (2, 0));

        let mut verdict = referee.apply(Action::Reveal((2, 0))).unwrap();
        let mut actions = Vec::new();
        while let Some(outcome) = verdict.outcome() {
            let action = agent.next_action(outcome).unwrap();
            if matches!(action, Action::Reveal(_)) {
                assert!(agent.pending_marks().is_empty());
            }
            actions.push(action);
            verdict = referee.apply(action).unwrap();
        }

        let mark_at = actions.iter().position(|a| *a == Action::Mark((0, 0))).unwrap();
        let reveal_at = actions.iter().position(|a| *a == Action::Reveal((1, 0))).unwrap();
        assert_eq!(mark_at, reveal_at + 1);
        assert_eq!(actions.last(), Some(&Action::Done));
        assert!(referee.is_cleared());
    }

    #[test]
    fn done_once_budget_met_without_constraints() {
        let mut agent = agent((3, 1), 1, (0, 0));

        assert_eq!(
            agent.next_action(Outcome::Revealed(1)).unwrap(),
            Action::Mark((1, 0))
        );
        assert_eq!(agent.next_action(Outcome::Marked).unwrap(), Action::Done);
        assert!(agent.clues().is_empty());
        assert_eq!(agent.grid().mines_left(), 0);
        assert_eq!(agent.next_action(Outcome::Marked).unwrap(), Action::Done);
    }

    #[test]
    fn sweep_reveals_rest_once_budget_met() {
        let config = AgentConfig::new((3, 1), 1, (0, 0)).with_sweep(true);
        let mut agent = Agent::new(config).unwrap();

        assert_eq!(
            agent.next_action(Outcome::Revealed(1)).unwrap(),
            Action::Mark((1, 0))
        );
        assert_eq!(
            agent.next_action(Outcome::Marked).unwrap(),
            Action::Reveal((2, 0))
        );
        assert_eq!(agent.next_action(Outcome::Revealed(1)).unwrap(), Action::Done);
    }

    #[test]
    fn zero_clue_never_marks() {
        let mut agent = agent((3, 3), 1, (0, 0));

        let action = agent.next_action(Outcome::Revealed(0)).unwrap();

        assert!(matches!(action, Action::Reveal(_)));
        assert!(agent.pending_marks().is_empty());
        let mut queued: Vec<_> = agent.pending_reveals().iter().collect();
        queued.extend(action.coords());
        queued.sort();
        assert_eq!(queued, [(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn guesses_when_nothing_is_certain() {
        let mut agent = agent((3, 3), 1, (1, 1));

        let action = agent.next_action(Outcome::Revealed(1)).unwrap();

        assert!(matches!(action, Action::Reveal(_)));
        assert_eq!(agent.stats().guesses, 1);
        assert_eq!(agent.stats().turns, 1);
    }

    #[test]
    fn rejects_outcome_that_does_not_fit() {
        let mut agent = agent((2, 2), 1, (0, 0));

        assert_eq!(
            agent.next_action(Outcome::Marked),
            Err(AgentError::UnexpectedOutcome)
        );
        assert_eq!(
            agent.next_action(Outcome::Revealed(9)),
            Err(AgentError::InvalidLabel)
        );
        assert!(agent.next_action(Outcome::Revealed(1)).is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert_eq!(
            Agent::new(AgentConfig::new((1, 1), 0, (0, 0))).err(),
            Some(AgentError::InvalidBoardShape)
        );
        assert_eq!(
            Agent::new(AgentConfig::new((2, 2), 4, (0, 0))).err(),
            Some(AgentError::TooManyMines)
        );
        assert_eq!(
            Agent::new(AgentConfig::new((2, 2), 1, (2, 0))).err(),
            Some(AgentError::InvalidCoords)
        );
    }
}
