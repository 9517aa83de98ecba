//! Decomposition of balanced sequences.
//!
//! The decomposition of the empty sequence is `{empty}`. For any other `s` it is
//! `{s}` together with the decompositions of `head(s)`, `tail(s)` and
//! `head(s) tail(s)`. Deduplicating by value keeps it polynomial in `|s|`.

use rapidhash::{RapidHashMap as HashMap, RapidHashSet as HashSet};

use crate::sequence::{BalancedSequence, concat};

/// Dense index of a sequence inside a [`Universe`].
pub(crate) type Code = usize;

/// What the solver needs to know about one coded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    /// Number of matched pairs; zero only for the empty sequence.
    pub pairs: usize,
    pub head: Code,
    pub tail: Code,
    /// Code of `head · tail`.
    pub flat: Code,
}

/// Joint decomposition of one or more sequences, with a code per distinct value.
///
/// Codes are assigned by value equality; the hash only picks the bucket.
/// Every head, tail and head·tail of a member is itself a member.
#[derive(Debug)]
pub(crate) struct Universe {
    codes: HashMap<BalancedSequence, Code>,
    values: Vec<BalancedSequence>,
    entries: Vec<Entry>,
}

impl Universe {
    /// Build the joint decomposition of `roots`.
    pub fn build<'a>(roots: impl IntoIterator<Item = &'a BalancedSequence>) -> Self {
        let mut universe = Self {
            codes: HashMap::default(),
            values: Vec::new(),
            entries: Vec::new(),
        };
        let mut pending = Vec::new();

        for root in roots {
            universe.intern(root, &mut pending);
        }

        while let Some(code) = pending.pop() {
            let seq = universe.values[code].clone();
            if seq.is_empty() {
                continue;
            }

            let (head, tail) = seq.partition();
            let flat = concat(&head, &tail);
            let entry = Entry {
                pairs: seq.pairs(),
                head: universe.intern(&head, &mut pending),
                tail: universe.intern(&tail, &mut pending),
                flat: universe.intern(&flat, &mut pending),
            };
            universe.entries[code] = entry;
        }

        universe
    }

    /// Look up or assign the code of `seq`; new values are queued for expansion.
    fn intern(&mut self, seq: &BalancedSequence, pending: &mut Vec<Code>) -> Code {
        if let Some(&code) = self.codes.get(seq) {
            return code;
        }

        let code = self.values.len();
        self.codes.insert(seq.clone(), code);
        self.values.push(seq.clone());
        // Placeholder until the value is expanded; the empty sequence keeps it.
        self.entries.push(Entry {
            pairs: 0,
            head: code,
            tail: code,
            flat: code,
        });
        pending.push(code);
        code
    }

    /// Number of distinct sequences.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Code of a member sequence.
    pub fn code(&self, seq: &BalancedSequence) -> Option<Code> {
        self.codes.get(seq).copied()
    }

    #[inline]
    pub fn entry(&self, code: Code) -> Entry {
        self.entries[code]
    }

    pub fn into_values(self) -> Vec<BalancedSequence> {
        self.values
    }
}

/// Compute the decomposition set of `seq`.
///
/// The result always contains the empty sequence, and contains `seq` itself.
pub fn decompose(seq: &BalancedSequence) -> HashSet<BalancedSequence> {
    Universe::build([seq]).into_values().into_iter().collect()
}
