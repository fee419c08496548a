use geo::MultiPolygon;
use rayon::prelude::*;
use tracing::trace;

use crate::error::{OperationError, Result};
use crate::geometry::boolean;

/// Parameters for the fork-join merge of partial buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeParams {
    /// Minimum list length at which a reduction is split across workers.
    pub parallel_threshold: usize,
    /// Number of sub-lists a split produces.
    pub fan_out: usize,
    /// Maximum recursion depth of parallel splits.
    pub max_depth: usize,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            parallel_threshold: 20,
            fan_out: 2,
            max_depth: 8,
        }
    }
}

impl MergeParams {
    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if `fan_out < 2`.
    pub fn validate(&self) -> Result<()> {
        if self.fan_out < 2 {
            return Err(OperationError::InvalidArgument(format!(
                "merge fan-out must be at least 2, got {}",
                self.fan_out
            ))
            .into());
        }
        Ok(())
    }
}

/// Unions `shapes` into a running accumulator, emitting the accumulator as a
/// partial result every `batch_size` shapes.
///
/// A trailing incomplete batch is emitted as well.
pub fn accumulate<I>(shapes: I, batch_size: usize) -> Vec<MultiPolygon<f64>>
where
    I: IntoIterator<Item = MultiPolygon<f64>>,
{
    let batch_size = batch_size.max(1);
    let mut partials = Vec::new();
    let mut running = MultiPolygon::new(Vec::new());
    let mut count = 0;
    for shape in shapes {
        running = boolean::union_multi(&running, &shape);
        count += 1;
        if count == batch_size {
            partials.push(std::mem::replace(&mut running, MultiPolygon::new(Vec::new())));
            count = 0;
        }
    }
    if count > 0 {
        partials.push(running);
    }
    trace!(partials = partials.len(), batch_size, "accumulated pre-buffers");
    partials
}

/// Unions a list of partial buffers into one.
///
/// Returns `None` for an empty list.
pub fn merge_partials(
    partials: Vec<MultiPolygon<f64>>,
    parallel: bool,
    params: &MergeParams,
) -> Option<MultiPolygon<f64>> {
    fork_join_reduce(partials, parallel, params, &|a: &MultiPolygon<f64>, b: &MultiPolygon<f64>| {
        boolean::union_multi(a, b)
    })
}

/// Bounded-depth fork-join tree reduction.
///
/// Below `params.parallel_threshold` items, past `params.max_depth` splits,
/// or when `parallel` is false, items are combined pairwise on the calling
/// thread (`i` with `i + 1`, an odd trailing item carried through) until one
/// remains. Otherwise the list is split into `params.fan_out` sub-lists
/// that are reduced on the rayon pool, and their results are combined the
/// same pairwise way.
pub fn fork_join_reduce<T, F>(items: Vec<T>, parallel: bool, params: &MergeParams, op: &F) -> Option<T>
where
    T: Send,
    F: Fn(&T, &T) -> T + Sync,
{
    reduce_at_depth(items, parallel, params, op, 0)
}

fn reduce_at_depth<T, F>(
    items: Vec<T>,
    parallel: bool,
    params: &MergeParams,
    op: &F,
    depth: usize,
) -> Option<T>
where
    T: Send,
    F: Fn(&T, &T) -> T + Sync,
{
    let split = parallel
        && items.len() >= params.parallel_threshold
        && depth < params.max_depth
        && params.fan_out >= 2;
    if !split {
        return pairwise(items, op);
    }

    trace!(items = items.len(), depth, fan_out = params.fan_out, "fork");
    if params.fan_out == 2 {
        let mut left = items;
        let right = left.split_off(left.len() / 2);
        let (a, b) = rayon::join(
            || reduce_at_depth(left, parallel, params, op, depth + 1),
            || reduce_at_depth(right, parallel, params, op, depth + 1),
        );
        return match (a, b) {
            (Some(a), Some(b)) => Some(op(&a, &b)),
            (a, b) => a.or(b),
        };
    }

    let chunk_len = items.len().div_ceil(params.fan_out);
    let mut groups = Vec::with_capacity(params.fan_out);
    let mut rest = items;
    while rest.len() > chunk_len {
        let tail = rest.split_off(chunk_len);
        groups.push(rest);
        rest = tail;
    }
    groups.push(rest);

    let results: Vec<T> = groups
        .into_par_iter()
        .filter_map(|group| reduce_at_depth(group, parallel, params, op, depth + 1))
        .collect();
    pairwise(results, op)
}

fn pairwise<T, F>(mut items: Vec<T>, op: &F) -> Option<T>
where
    F: Fn(&T, &T) -> T,
{
    while items.len() > 1 {
        let mut next = Vec::with_capacity(items.len().div_ceil(2));
        let mut iter = items.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => next.push(op(&a, &b)),
                None => next.push(a),
            }
        }
        items = next;
    }
    items.pop()
}
