//! Shared depth-first traversal with a predecessor guard
//!
//! The validator, visibility selector and classifier all walk the bipartite
//! graph the same way: visit a node, decide which neighbours to step into,
//! and never step back across the edge just arrived on. The per-component
//! policy lives in the visitor; the guard and recursion live here.
//!
//! The walk is genuinely recursive so that, on a cyclic graph, a revisited
//! node is always an ancestor on the current predecessor chain (a back edge).
//! The validator's cycle reconstruction depends on this.

use std::convert::Infallible;

/// Depth-first walk from `node`, arriving from `pred`.
///
/// The visitor receives each visited node with its predecessor and the flags
/// threaded along the path, and returns the neighbours to recurse into (with
/// the flags each should carry). Successors equal to the current node's
/// predecessor are skipped.
pub fn depth_first<F, E, V>(
    node: &str,
    pred: Option<&str>,
    flags: F,
    visit: &mut V,
) -> Result<(), E>
where
    V: FnMut(&str, Option<&str>, F) -> Result<Vec<(String, F)>, E>,
{
    let successors = visit(node, pred, flags)?;
    for (next, next_flags) in successors {
        if Some(next.as_str()) == pred {
            continue;
        }
        depth_first(&next, Some(node), next_flags, visit)?;
    }
    Ok(())
}

/// [`depth_first`] for visitors that cannot fail.
pub fn depth_first_infallible<F, V>(node: &str, pred: Option<&str>, flags: F, visit: &mut V)
where
    V: FnMut(&str, Option<&str>, F) -> Vec<(String, F)>,
{
    let result: Result<(), Infallible> =
        depth_first(node, pred, flags, &mut |n, p, f| Ok(visit(n, p, f)));
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}
