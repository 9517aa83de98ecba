//! # lcbs
//!
//! Similarity of unordered subtrees for structured merge.
//!
//! When two revisions of a syntax tree are merged, some nodes have children
//! whose order carries no meaning (the members of a class body, for instance).
//! To decide which of those subtrees correspond, a matcher needs to know how
//! much structure they share. This crate answers that with a single integer.
//!
//! ## Algorithm Overview
//!
//! 1. **Encoding**: a tree becomes a balanced bit sequence, every child written
//!    as `0`, its own sequence, `1`.
//! 2. **Decomposition**: each sequence splits uniquely as `0 head 1 tail`; the
//!    closure of a sequence under taking `head`, `tail` and `head·tail` is its
//!    decomposition, which is polynomial in size.
//! 3. **Solving**: the longest common balanced sequence (LCBS) of two
//!    encodings is computed by a memoized recursion over the joint
//!    decomposition, each distinct value getting a dense code.
//!
//! See Antoni Lozano and Gabriel Valiente, *On the maximum common embedded
//! subtree problem for ordered trees*.
//!
//! The crate only scores. Turning scores into an assignment of nodes is the
//! caller's job.
//!
//! ## Usage
//!
//! ```
//! use lcbs::{Tree, SimilarityConfig, similarity_of_trees};
//!
//! // class A { f; g; }
//! let mut a = Tree::new("class A");
//! a.add_child(a.root, "f");
//! a.add_child(a.root, "g");
//!
//! // class A { m { body } }
//! let mut b = Tree::new("class A");
//! let m = b.add_child(b.root, "m");
//! b.add_child(m, "body");
//!
//! let score = similarity_of_trees(&a, a.root, &b, b.root, &SimilarityConfig::default()).unwrap();
//! assert_eq!(score, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

pub use indextree;

mod tracing_macros;

/// Parallel scoring of candidate pairs
pub mod batch;
mod decompose;
mod error;
/// Balanced sequences and the tree codec
pub mod sequence;
/// LCBS solver
pub mod similarity;
/// Tree access
pub mod tree;

pub use batch::{SimilarityMatrix, score_matrix};
pub use decompose::decompose;
pub use error::{Error, Result};
pub use sequence::{BalancedSequence, concat, encode};
pub use similarity::{SimilarityConfig, SimilarityScore, score, similarity, similarity_with_config};
pub use tree::{Tree, TreeView};

/// Encode two subtrees and compute their similarity.
///
/// The trees may be of different types; only their shape is compared.
pub fn similarity_of_trees<TA, TB>(
    tree_a: &TA,
    node_a: TA::Node,
    tree_b: &TB,
    node_b: TB::Node,
    config: &SimilarityConfig,
) -> Result<u32>
where
    TA: TreeView,
    TB: TreeView,
{
    let a = encode(tree_a, node_a);
    let b = encode(tree_b, node_b);
    debug!(left = a.len(), right = b.len(), "similarity_of_trees");
    similarity_with_config(&a, &b, config)
}
