//! The reference operation dialect for GradeLang.
//!
//! This crate is an "external collaborator" in the language core's own terms: the core
//! evaluator only knows about the [`gradelang_eval::OperationProvider`] trait, and ships
//! no built-in operations of its own. [`reference_dialect`] builds a
//! [`BasicOperationProvider`] registered with the informative dialect from the language
//! reference: `drop`, `top`, `join`, `resolve`, `clamp`, `maxOf`, `minOf`, `map`, three
//! overloads of `require`, and `len`.

#![warn(missing_docs)]

use gradelang_eval::BasicOperationProvider;
use gradelang_parser::ListValue;

/// Removes the `n` smallest non-NaN values from `list`, ties broken by higher index (later
/// elements dropped first). Weights are not consulted for selection. A no-op when `n == 0`
/// or the list is empty.
fn drop_lowest(n: u64, mut list: ListValue) -> ListValue {
    if n == 0 || list.is_empty() {
        tracing::trace!(n, size = list.len(), "drop is a no-op");
        return list;
    }

    let mut by_value: Vec<(f64, usize)> = list
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.value.is_nan())
        .map(|(index, entry)| (entry.value, index))
        .collect();

    // Lowest value first; among equal values, the later index sorts first so it's the one
    // kept in the truncated "drop these" set when `n` cuts through a run of ties.
    by_value.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(b.1.cmp(&a.1)));

    let mut indices_to_remove: Vec<usize> = by_value
        .into_iter()
        .take(n as usize)
        .map(|(_, index)| index)
        .collect();
    indices_to_remove.sort_unstable_by(|a, b| b.cmp(a));

    for index in indices_to_remove {
        list.remove(index);
    }
    list
}

/// Keeps the highest `n` values, equivalent to dropping `max(0, size - n)` lowest.
fn keep_highest(n: u64, list: ListValue) -> ListValue {
    let size = list.len() as u64;
    let to_drop = size.saturating_sub(n);
    drop_lowest(to_drop, list)
}

/// Appends `b`'s entries onto `a`.
fn join_lists(a: ListValue, b: ListValue) -> ListValue {
    let mut a = a;
    a.extend(b);
    a
}

/// Replaces every NaN value in `list` with `default_value`. Weights are untouched.
fn resolve_undefined(default_value: f64, mut list: ListValue) -> ListValue {
    for entry in list.iter_mut() {
        if entry.value.is_nan() {
            entry.value = default_value;
        }
    }
    list
}

/// Clips every defined value in `list` into `[lo, hi]`.
fn clamp_range(lo: f64, hi: f64, mut list: ListValue) -> ListValue {
    for entry in list.iter_mut() {
        if entry.value.is_nan() {
            continue;
        }
        if entry.value < lo {
            entry.value = lo;
        } else if entry.value > hi {
            entry.value = hi;
        }
    }
    list
}

/// Raises defined values below `threshold` up to `threshold`.
fn max_of(threshold: f64, mut list: ListValue) -> ListValue {
    for entry in list.iter_mut() {
        // NaN < threshold is false under IEEE rules, so undefined entries pass through.
        if entry.value < threshold {
            entry.value = threshold;
        }
    }
    list
}

/// Lowers defined values above `threshold` down to `threshold`.
fn min_of(threshold: f64, mut list: ListValue) -> ListValue {
    for entry in list.iter_mut() {
        if entry.value > threshold {
            entry.value = threshold;
        }
    }
    list
}

/// Linearly remaps defined values from `[src_start, src_end]` to `[dst_start, dst_end]`.
/// Extrapolates outside the source range rather than clamping. When the source range is
/// zero, every defined value collapses to the destination range's midpoint.
fn linear_map(src_start: f64, src_end: f64, dst_start: f64, dst_end: f64, mut list: ListValue) -> ListValue {
    let src_range = src_end - src_start;
    let dst_range = dst_end - dst_start;

    if src_range == 0.0 {
        let midpoint = dst_start + dst_range / 2.0;
        tracing::debug!(src_start, midpoint, "map source range is zero, collapsing to midpoint");
        for entry in list.iter_mut() {
            if !entry.value.is_nan() {
                entry.value = midpoint;
            }
        }
    } else {
        for entry in list.iter_mut() {
            if !entry.value.is_nan() {
                entry.value = dst_start + ((entry.value - src_start) / src_range) * dst_range;
            }
        }
    }
    list
}

/// `value < threshold` under IEEE-754 rules: NaN always takes the `above` branch, since
/// `NaN < threshold` is false.
fn require4(value: f64, threshold: f64, below: f64, above: f64) -> f64 {
    if value < threshold {
        below
    } else {
        above
    }
}

fn require3(value: f64, threshold: f64, above: f64) -> f64 {
    require4(value, threshold, 0.0, above)
}

fn require2(value: f64, threshold: f64) -> f64 {
    require4(value, threshold, 0.0, 1.0)
}

fn list_len(list: ListValue) -> u64 {
    list.len() as u64
}

/// Builds a [`BasicOperationProvider`] registered with the reference operation dialect.
///
/// Registration order matters for `require`'s three overloads: the 4-argument form is
/// registered before the 3- and 2-argument forms so that a 2-argument call can't
/// accidentally match a wider signature (arity alone already disambiguates these, but the
/// order mirrors the reference registration order for clarity).
pub fn reference_dialect() -> BasicOperationProvider {
    let mut provider = BasicOperationProvider::new();

    provider.register_op2("drop", drop_lowest);
    provider.register_op2("top", keep_highest);
    provider.register_op2("join", join_lists);
    provider.register_op2("resolve", resolve_undefined);
    provider.register_op3("clamp", clamp_range);
    provider.register_op2("maxOf", max_of);
    provider.register_op2("minOf", min_of);
    provider.register_op5("map", linear_map);
    provider.register_op4("require", require4);
    provider.register_op3("require", require3);
    provider.register_op2("require", require2);
    provider.register_op1("len", list_len);

    tracing::debug!(signatures = 12, "reference dialect registered");
    provider
}
