//! # 插值模块
//!
//! 提供分段线性插值服务，作为剂量函数和散射因子函数的数值基础。
//!
//! ## 约定
//! - 1D 线性插值：定义域外求值返回 `DomainError`
//! - 2D 双线性插值：矩形网格（轴可以无序），网格外求值返回 `DomainError`
//! - 网格点上求值精确返回样本值
//!
//! ## 依赖关系
//! - 被 `parsers/mephisto.rs` (PDD 函数) 和 `scatter/` 使用
//! - 使用 `error.rs`

pub mod bilinear;
pub mod linear;

pub use bilinear::BilinearInterpolator;
pub use linear::LinearInterpolator;

use crate::error::{BeamDataError, Result};

/// 对坐标轴排序，返回排序后的轴和原始索引的排列
///
/// 轴值必须有限且互不相同。
pub(crate) fn sort_axis(values: &[f64], quantity: &str) -> Result<(Vec<f64>, Vec<usize>)> {
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(BeamDataError::InvalidArgument(format!(
            "{} axis contains non-finite value {}",
            quantity, v
        )));
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let sorted: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(BeamDataError::InvalidArgument(format!(
            "{} axis contains duplicate value {}",
            quantity, pair[0]
        )));
    }

    Ok((sorted, order))
}

/// 在有序轴上定位插值区间
///
/// 返回 (下标, 上标, 上端权重)。恰好命中网格点时上下标相同、权重为 0。
/// 超出轴范围返回 `None`。
pub(crate) fn locate(axis: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    let first = *axis.first()?;
    let last = *axis.last()?;
    if !(first..=last).contains(&value) {
        return None;
    }

    let upper = axis.partition_point(|&v| v < value);
    if axis[upper] == value {
        return Some((upper, upper, 0.0));
    }

    let lower = upper - 1;
    let weight = (value - axis[lower]) / (axis[upper] - axis[lower]);
    Some((lower, upper, weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_axis_permutation() {
        let (sorted, order) = sort_axis(&[100.0, 25.0, 400.0], "area").unwrap();
        assert_eq!(sorted, vec![25.0, 100.0, 400.0]);
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_sort_axis_rejects_duplicates() {
        assert!(sort_axis(&[1.0, 2.0, 1.0], "depth").is_err());
        assert!(sort_axis(&[1.0, f64::NAN], "depth").is_err());
    }

    #[test]
    fn test_locate() {
        let axis = [0.0, 5.0, 10.0];
        assert_eq!(locate(&axis, 5.0), Some((1, 1, 0.0)));
        assert_eq!(locate(&axis, 0.0), Some((0, 0, 0.0)));
        assert_eq!(locate(&axis, 10.0), Some((2, 2, 0.0)));

        let (lo, hi, w) = locate(&axis, 7.5).unwrap();
        assert_eq!((lo, hi), (1, 2));
        assert!((w - 0.5).abs() < 1e-12);

        assert_eq!(locate(&axis, -0.1), None);
        assert_eq!(locate(&axis, 10.1), None);
        assert_eq!(locate(&axis, f64::NAN), None);
    }
}
