//! Components E/F/G — LR(0) kernels, LALR lookahead propagation, and
//! action/goto table assembly (`spec.md` §4.6–§4.8).

pub mod item;
pub mod kernel;
pub mod lookahead;
pub mod table;

pub use item::CoreItem;
pub use kernel::{build_lr0, Lr0Automaton, State};
pub use lookahead::{compute_first_sets, compute_lalr_lookaheads, FirstSets};
pub use table::{build_table, Action, Conflict, ParseTable};

use crate::grammar::Grammar;
use crate::types::{Diagnostic, Diagnostics};

/// Runs the whole LR(0)+LALR(1) pipeline over a grammar: kernel
/// construction, lookahead propagation, table assembly. Returns the table
/// directly; any unresolved conflicts are surfaced by the caller via
/// [`conflicts_to_diagnostics`] (`spec.md` §4.8: "the caller treats a
/// non-empty set as a fatal build error").
pub fn build(grammar: &Grammar) -> ParseTable {
  let automaton = build_lr0(grammar);
  let firsts = compute_first_sets(grammar);
  let lookaheads = compute_lalr_lookaheads(grammar, &automaton, &firsts);
  build_table(grammar, &automaton, &firsts, &lookaheads)
}

/// Converts the table's raw conflict records into reportable diagnostics,
/// resolving symbol ids back to names for the message (`spec.md` §7's
/// `Conflict{kind, left, right}`).
pub fn conflicts_to_diagnostics(grammar: &Grammar, symbols: &crate::symbol::SymbolTable, table: &ParseTable) -> Diagnostics {
  let mut diags = Diagnostics::new();
  for c in &table.conflicts {
    diags.push(Diagnostic::Conflict {
      kind:     c.kind,
      state:    c.state,
      terminal: symbols.display_name(c.terminal),
      left:     describe_action(grammar, symbols, c.left),
      right:    describe_action(grammar, symbols, c.right),
    });
  }
  diags
}

fn describe_action(grammar: &Grammar, symbols: &crate::symbol::SymbolTable, action: Action) -> String {
  match action {
    Action::Shift(s) => format!("shift to state {s}"),
    Action::Reduce(rule_id) => format!("reduce by `{}`", symbols.display_name(grammar.rule(rule_id).lhs)),
    Action::Accept => "accept".to_string(),
  }
}
