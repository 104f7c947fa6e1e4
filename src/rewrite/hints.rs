use tracing::debug;

use crate::ast::{NodeKind, QueryTree};
use crate::rewrite::prune::prune_where;

/// Reserved assignment name for the shard-day planner hint.
pub const SHARD_DAY_HINT: &str = "_shardDayHint_";

/// Remove every occurrence of the shard-day hint from the tree, including
/// duplicates across sibling conjuncts and disjuncts, then collapse any
/// junction left with zero or one children. A tree consisting solely of
/// hints cleans to the empty predicate.
///
/// Cleaning is a fixpoint: cleaning twice yields the same tree as cleaning
/// once.
pub fn remove_hints(tree: &mut QueryTree) {
    let before = tree.is_empty_predicate();
    prune_where(tree, &|tree, id| {
        matches!(tree.kind(id), NodeKind::Assignment { name, .. } if name == SHARD_DAY_HINT)
    });
    if !before && tree.is_empty_predicate() {
        debug!("predicate consisted solely of {} hints", SHARD_DAY_HINT);
    }
}
