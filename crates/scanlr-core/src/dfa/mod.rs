//! Components C/D — NFA-to-DFA subset construction and minimization
//! (`spec.md` §4.4, §4.5).

pub mod minimize;
pub mod subset;

pub use minimize::minimize;
pub use subset::{build_dfa, Dfa, DfaState};

use crate::nfa::Nfa;

/// Builds and minimizes a DFA from an NFA pool in one call.
pub fn build(nfa: &Nfa) -> Dfa {
  minimize(&build_dfa(nfa))
}
