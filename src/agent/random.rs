//! Uniformly random opponent.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::agent::Agent;
use crate::error::Result;
use crate::game::State;

/// Pick a uniformly random empty cell of `state`.
///
/// A board without empty cells only shows up in terminal replays, where any
/// index is accepted, so the choice then falls back to every cell.
pub(crate) fn random_empty_cell<R: Rng>(state: &State, rng: &mut R) -> usize {
    let empty = state.empty_cells();
    match empty.choose(rng) {
        Some(&index) => index,
        None if state.is_empty() => 0,
        None => rng.gen_range(0..state.len()),
    }
}

/// Agent that plays a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    /// Create a random agent, seeded for reproducibility if `seed` is set.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Agent for RandomAgent {
    fn action(&mut self, state: &State) -> Result<usize> {
        Ok(random_empty_cell(state, &mut self.rng))
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    #[test]
    fn test_only_picks_empty_cells() {
        let state = State::from(vec![
            Cell::Player(0),
            Cell::Empty,
            Cell::Player(1),
            Cell::Empty,
        ]);
        let mut agent = RandomAgent::new(Some(11));
        for _ in 0..100 {
            let index = agent.action(&state).unwrap();
            assert!(index == 1 || index == 3);
        }
    }

    #[test]
    fn test_full_board_falls_back_to_any_cell() {
        let state = State::from(vec![Cell::Player(0); 4]);
        let mut agent = RandomAgent::new(Some(5));
        for _ in 0..50 {
            assert!(agent.action(&state).unwrap() < 4);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let state = State::from(vec![Cell::Empty; 16]);
        let mut a = RandomAgent::new(Some(42));
        let mut b = RandomAgent::new(Some(42));
        let left: Vec<usize> = (0..20).map(|_| a.action(&state).unwrap()).collect();
        let right: Vec<usize> = (0..20).map(|_| b.action(&state).unwrap()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_hooks_are_noops() {
        let mut agent = RandomAgent::default();
        let state = State::from(vec![Cell::Empty; 2]);
        agent.fit(&state, &state, 0, 1.0);
        agent.decay(1);
        assert!(agent.save(std::path::Path::new("unused")).is_ok());
        assert_eq!(agent.name(), "random");
    }
}
