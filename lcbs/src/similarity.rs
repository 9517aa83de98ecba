//! Longest common balanced sequence between two balanced sequences.
//!
//! For non-empty `a` and `b` with `a = 0 ah 1 at` and `b = 0 bh 1 bt`:
//!
//! ```text
//! lcbs(a, b) = max(
//!     lcbs(ah, bh) + lcbs(at, bt) + 1,   // the leading brackets correspond
//!     lcbs(ah at, b),                    // a's leading bracket is dropped
//!     lcbs(a, bh bt),                    // b's leading bracket is dropped
//! )
//! ```
//!
//! and `lcbs` is zero when either side is empty. Every argument that shows up
//! is a member of `decompose(a) ∪ decompose(b)`, so the sub-problems are
//! memoized in a triangular table indexed by the codes of that universe.

use crate::decompose::{Code, Universe};
use crate::error::{Error, Result};
use crate::sequence::BalancedSequence;
use crate::{debug, trace};

/// Configuration for similarity computations.
#[derive(Debug, Clone)]
pub struct SimilarityConfig {
    /// Upper bound, in bytes, on the memo table of a single computation.
    /// Pairs whose table would be larger fail with
    /// [`Error::MemoBudgetExceeded`] instead of allocating.
    pub memo_budget_bytes: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            memo_budget_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Raw and normalized similarity between two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityScore {
    /// Length, in pairs, of the longest common balanced sequence.
    pub common: u32,
    /// Pairs in the left sequence.
    pub left_pairs: usize,
    /// Pairs in the right sequence.
    pub right_pairs: usize,
}

impl SimilarityScore {
    /// Dice coefficient: `2 × common / (left_pairs + right_pairs)`.
    ///
    /// Two empty sequences are identical, so they score `1.0`.
    pub fn dice(&self) -> f64 {
        let total = self.left_pairs + self.right_pairs;
        if total == 0 {
            1.0
        } else {
            2.0 * f64::from(self.common) / total as f64
        }
    }
}

/// Marks a memo cell that has not been computed yet.
const ABSENT: u32 = u32::MAX;

/// Triangular table over unordered pairs of codes.
struct MemoTable {
    cells: Vec<u32>,
}

impl MemoTable {
    /// Allocate a table for `codes` distinct sequences, or refuse if it would
    /// not fit in the configured budget.
    fn with_budget(codes: usize, config: &SimilarityConfig) -> Result<Self> {
        let entries = codes
            .checked_add(1)
            .and_then(|n| n.checked_mul(codes))
            .map(|n| n / 2);
        let bytes = entries.and_then(|n| n.checked_mul(size_of::<u32>()));

        match (entries, bytes) {
            (Some(entries), Some(bytes)) if bytes <= config.memo_budget_bytes => Ok(Self {
                cells: vec![ABSENT; entries],
            }),
            _ => Err(Error::MemoBudgetExceeded {
                codes,
                entries: entries.unwrap_or(usize::MAX),
                budget_bytes: config.memo_budget_bytes,
            }),
        }
    }

    #[inline]
    fn slot(a: Code, b: Code) -> usize {
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        hi * (hi + 1) / 2 + lo
    }

    #[inline]
    fn get(&self, a: Code, b: Code) -> Option<u32> {
        match self.cells[Self::slot(a, b)] {
            ABSENT => None,
            value => Some(value),
        }
    }

    #[inline]
    fn set(&mut self, a: Code, b: Code, value: u32) {
        self.cells[Self::slot(a, b)] = value;
    }
}

/// State of one top-level computation. Never shared between unrelated pairs.
struct Solver<'u> {
    universe: &'u Universe,
    memo: MemoTable,
}

impl<'u> Solver<'u> {
    fn new(universe: &'u Universe, config: &SimilarityConfig) -> Result<Self> {
        let memo = MemoTable::with_budget(universe.len(), config)?;
        Ok(Self { universe, memo })
    }

    /// The answer for `(a, b)` if it needs no further work.
    #[inline]
    fn known(&self, a: Code, b: Code) -> Option<u32> {
        if self.universe.entry(a).pairs == 0 || self.universe.entry(b).pairs == 0 {
            return Some(0);
        }
        self.memo.get(a, b)
    }

    /// Evaluate the recursion with an explicit stack: a pair stays on the stack
    /// until all of its sub-problems are known, then it is computed and stored.
    fn solve(&mut self, a: Code, b: Code) -> u32 {
        let mut stack = vec![(a, b)];

        while let Some(&(a, b)) = stack.last() {
            if self.known(a, b).is_some() {
                stack.pop();
                continue;
            }

            let ea = self.universe.entry(a);
            let eb = self.universe.entry(b);
            let deps = [(ea.head, eb.head), (ea.tail, eb.tail), (ea.flat, b), (a, eb.flat)];

            let waiting = stack.len();
            for (x, y) in deps {
                if self.known(x, y).is_none() {
                    stack.push((x, y));
                }
            }
            if stack.len() > waiting {
                continue;
            }

            let [heads, tails, drop_a, drop_b] = deps.map(|(x, y)| self.known(x, y).unwrap_or(0));
            let match_roots = heads + tails + 1;
            let best = match_roots.max(drop_a).max(drop_b);
            trace!(a, b, match_roots, drop_a, drop_b, best, "solved pair");

            self.memo.set(a, b, best);
            stack.pop();
        }

        self.known(a, b).unwrap_or(0)
    }
}

/// Length, in pairs, of the longest common balanced sequence of `s` and `t`,
/// with the memo table bounded by `config`.
pub fn similarity_with_config(
    s: &BalancedSequence,
    t: &BalancedSequence,
    config: &SimilarityConfig,
) -> Result<u32> {
    if s.is_empty() || t.is_empty() {
        return Ok(0);
    }

    let universe = Universe::build([s, t]);
    debug!(
        left = s.len(),
        right = t.len(),
        codes = universe.len(),
        "similarity start"
    );

    let mut solver = match Solver::new(&universe, config) {
        Ok(solver) => solver,
        Err(err) => {
            debug!(%err, "memo table over budget");
            return Err(err);
        }
    };

    let (Some(a), Some(b)) = (universe.code(s), universe.code(t)) else {
        unreachable!("roots are always members of their own universe");
    };
    let result = solver.solve(a, b);
    debug!(result, "similarity done");
    Ok(result)
}

/// Length, in pairs, of the longest common balanced sequence of `s` and `t`.
///
/// # Panics
///
/// If the memo table would exceed the default budget of
/// [`SimilarityConfig`]. Use [`similarity_with_config`] to handle that case.
pub fn similarity(s: &BalancedSequence, t: &BalancedSequence) -> u32 {
    match similarity_with_config(s, t, &SimilarityConfig::default()) {
        Ok(result) => result,
        Err(err) => panic!("{err}"),
    }
}

/// [`similarity_with_config`] together with the sizes needed to normalize it.
pub fn score(
    s: &BalancedSequence,
    t: &BalancedSequence,
    config: &SimilarityConfig,
) -> Result<SimilarityScore> {
    Ok(SimilarityScore {
        common: similarity_with_config(s, t, config)?,
        left_pairs: s.pairs(),
        right_pairs: t.pairs(),
    })
}
