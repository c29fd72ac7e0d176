//! Time index lookup over time-ordered records.

use contracts::{ContractError, Timestamped};

/// Smallest index `i >= max(hint, 1)` with `items[i].time > target_us`
///
/// Pass the previous result as `hint` while `target_us` does not decrease;
/// pass `0` after seeking backwards. Results are non-decreasing for
/// non-decreasing queries.
///
/// # Errors
/// - `items` is empty
/// - `hint` is out of bounds
/// - `target_us` is not before the last timestamp
pub fn find_index_for_time<T: Timestamped>(
    items: &[T],
    hint: usize,
    target_us: u64,
) -> Result<usize, ContractError> {
    let Some(last) = items.last() else {
        return Err(ContractError::lookup_out_of_range(target_us, "store is empty"));
    };
    if hint >= items.len() {
        return Err(ContractError::lookup_out_of_range(
            target_us,
            format!("hint {hint} out of bounds for {} records", items.len()),
        ));
    }
    if target_us >= last.time_us() {
        return Err(ContractError::lookup_out_of_range(
            target_us,
            format!("past last record at {}us", last.time_us()),
        ));
    }

    let start = hint.max(1);
    items[start..]
        .iter()
        .position(|item| item.time_us() > target_us)
        .map(|offset| start + offset)
        .ok_or_else(|| ContractError::lookup_out_of_range(target_us, "no later record"))
}
