//! Data helpers for chart widgets.

/// Convert optional percentages to sparkline bar heights.
///
/// Missing values become empty bars so the bars stay aligned with rows.
#[must_use]
pub fn sparkline_values(series: &[Option<f64>]) -> Vec<u64> {
    series
        .iter()
        .map(|v| v.map_or(0, |v| v.max(0.0).round() as u64))
        .collect()
}

/// Resample sparkline data to fit a target width.
///
/// Shorter data is stretched by repeating points; longer data is averaged
/// into buckets. Returns exactly `target_width` points unless `data` is
/// empty.
#[must_use]
pub fn resample_sparkline_data(data: &[u64], target_width: usize) -> Vec<u64> {
    if data.is_empty() || target_width == 0 {
        return Vec::new();
    }

    if data.len() == target_width {
        return data.to_vec();
    }

    let mut result = Vec::with_capacity(target_width);

    if data.len() < target_width {
        for i in 0..target_width {
            let src_idx = i * (data.len() - 1) / (target_width - 1).max(1);
            result.push(data[src_idx.min(data.len() - 1)]);
        }
    } else {
        let bucket_size = data.len() as f64 / target_width as f64;
        for i in 0..target_width {
            let start = (i as f64 * bucket_size) as usize;
            let end = (((i + 1) as f64 * bucket_size) as usize).min(data.len());

            if start < end {
                let sum: u64 = data[start..end].iter().sum();
                result.push(sum / (end - start) as u64);
            } else if start < data.len() {
                result.push(data[start]);
            }
        }
    }

    result
}

/// Latest present value of a series.
#[must_use]
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}
