//! Basic statistics.

use contracts::ContractError;

/// Arithmetic mean
///
/// # Errors
/// - `data` is empty
pub fn mean(data: &[f64]) -> Result<f64, ContractError> {
    if data.is_empty() {
        return Err(ContractError::invalid_argument("data", "mean of empty slice"));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation
///
/// # Errors
/// - `data` is empty
pub fn stddev(data: &[f64]) -> Result<f64, ContractError> {
    let m = mean(data)?;
    let var = data.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64;
    Ok(var.sqrt())
}
