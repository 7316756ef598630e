//! # 一维线性插值
//!
//! 分段线性插值，定义域为样本点的 [最小值, 最大值]。
//! 定义域外求值返回 `DomainError`，不做截断也不做外推。
//!
//! ## 依赖关系
//! - 被 `scatter/functions.rs` 使用
//! - 使用 `interp/mod.rs` 的轴排序与区间定位

use super::{locate, sort_axis};
use crate::error::{BeamDataError, Result};

/// 一维分段线性插值器
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    /// 严格递增的自变量
    xs: Vec<f64>,
    /// 与 `xs` 对齐的函数值
    ys: Vec<f64>,
    /// 自变量名称（用于错误信息）
    quantity: String,
}

impl LinearInterpolator {
    /// 从样本点创建插值器，样本点可以无序
    ///
    /// 至少需要两个点，自变量互不相同。
    pub fn new(xs: &[f64], ys: &[f64], quantity: impl Into<String>) -> Result<Self> {
        let quantity = quantity.into();

        if xs.len() != ys.len() {
            return Err(BeamDataError::InvalidArgument(format!(
                "{} samples: {} x values but {} y values",
                quantity,
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(BeamDataError::InvalidArgument(format!(
                "{} needs at least 2 samples, got {}",
                quantity,
                xs.len()
            )));
        }

        let (xs_sorted, order) = sort_axis(xs, &quantity)?;
        let ys_sorted = order.iter().map(|&i| ys[i]).collect();

        Ok(Self {
            xs: xs_sorted,
            ys: ys_sorted,
            quantity,
        })
    }

    /// 定义域 (最小值, 最大值)
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// 在 `x` 处求值
    pub fn evaluate(&self, x: f64) -> Result<f64> {
        let (lower, upper, weight) = locate(&self.xs, x).ok_or_else(|| {
            let (min, max) = self.domain();
            BeamDataError::DomainError {
                quantity: self.quantity.clone(),
                value: x,
                min,
                max,
            }
        })?;

        if lower == upper {
            return Ok(self.ys[lower]);
        }
        Ok(self.ys[lower] + weight * (self.ys[upper] - self.ys[lower]))
    }
}
