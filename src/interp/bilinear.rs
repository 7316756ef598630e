//! # 二维双线性插值
//!
//! 在矩形网格 (x × y) 上做双线性插值（每个方向分段线性、无平滑）。
//! 输入轴可以无序，构造时排序并同步置换数值矩阵。
//!
//! ## 算法
//! 1. 在 x、y 轴上分别定位区间与权重
//! 2. 取四个角点按权重加权求和
//!
//! 网格外求值返回 `DomainError`。
//!
//! ## 依赖关系
//! - 被 `parsers/mephisto.rs` 的 `PddFunction` 使用
//! - 使用 `interp/mod.rs` 的轴排序与区间定位

use super::{locate, sort_axis};
use crate::error::{BeamDataError, Result};

/// 二维双线性插值器
#[derive(Debug, Clone)]
pub struct BilinearInterpolator {
    /// 严格递增的 x 轴
    xs: Vec<f64>,
    /// 严格递增的 y 轴
    ys: Vec<f64>,
    /// 行优先数值矩阵，`values[i * ys.len() + j]` 对应 (xs[i], ys[j])
    values: Vec<f64>,
    /// 轴名称（用于错误信息）
    x_name: String,
    y_name: String,
}

impl BilinearInterpolator {
    /// 创建插值器
    ///
    /// `values[i][j]` 为 (xs[i], ys[j]) 处的值。每个方向至少两个点。
    pub fn new(
        xs: &[f64],
        ys: &[f64],
        values: &[Vec<f64>],
        x_name: impl Into<String>,
        y_name: impl Into<String>,
    ) -> Result<Self> {
        let x_name = x_name.into();
        let y_name = y_name.into();

        if xs.len() < 2 || ys.len() < 2 {
            return Err(BeamDataError::InvalidArgument(format!(
                "bilinear grid needs at least 2x2 points, got {}x{}",
                xs.len(),
                ys.len()
            )));
        }
        if values.len() != xs.len() || values.iter().any(|row| row.len() != ys.len()) {
            return Err(BeamDataError::InvalidArgument(format!(
                "value grid does not match {}x{} axes",
                xs.len(),
                ys.len()
            )));
        }

        let (xs_sorted, x_order) = sort_axis(xs, &x_name)?;
        let (ys_sorted, y_order) = sort_axis(ys, &y_name)?;

        let mut grid = Vec::with_capacity(xs.len() * ys.len());
        for &i in &x_order {
            for &j in &y_order {
                grid.push(values[i][j]);
            }
        }

        Ok(Self {
            xs: xs_sorted,
            ys: ys_sorted,
            values: grid,
            x_name,
            y_name,
        })
    }

    /// x 轴定义域
    pub fn x_domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// y 轴定义域
    pub fn y_domain(&self) -> (f64, f64) {
        (self.ys[0], self.ys[self.ys.len() - 1])
    }

    fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.ys.len() + j]
    }

    /// 在 (x, y) 处求值
    pub fn evaluate(&self, x: f64, y: f64) -> Result<f64> {
        let (x0, x1, tx) = locate(&self.xs, x).ok_or_else(|| {
            let (min, max) = self.x_domain();
            BeamDataError::DomainError {
                quantity: self.x_name.clone(),
                value: x,
                min,
                max,
            }
        })?;
        let (y0, y1, ty) = locate(&self.ys, y).ok_or_else(|| {
            let (min, max) = self.y_domain();
            BeamDataError::DomainError {
                quantity: self.y_name.clone(),
                value: y,
                min,
                max,
            }
        })?;

        // 网格点上直接返回
        if x0 == x1 && y0 == y1 {
            return Ok(self.at(x0, y0));
        }

        let q00 = self.at(x0, y0);
        let q01 = self.at(x0, y1);
        let q10 = self.at(x1, y0);
        let q11 = self.at(x1, y1);

        Ok((1.0 - tx) * (1.0 - ty) * q00
            + (1.0 - tx) * ty * q01
            + tx * (1.0 - ty) * q10
            + tx * ty * q11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn plane() -> BilinearInterpolator {
        // f(x, y) = x + 10 y
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0];
        let values: Vec<Vec<f64>> = xs
            .iter()
            .map(|&x| ys.iter().map(|&y| x + 10.0 * y).collect())
            .collect();
        BilinearInterpolator::new(&xs, &ys, &values, "x", "y").unwrap()
    }

    #[test]
    fn test_bilinear_grid_points() {
        let f = plane();
        assert_eq!(f.evaluate(1.0, 1.0).unwrap(), 11.0);
        assert_eq!(f.evaluate(2.0, 0.0).unwrap(), 2.0);
    }

    #[test]
    fn test_bilinear_between_points() {
        let f = plane();
        assert!((f.evaluate(0.5, 0.5).unwrap() - 5.5).abs() < 1e-12);
        assert!((f.evaluate(1.25, 0.0).unwrap() - 1.25).abs() < 1e-12);
        assert!((f.evaluate(2.0, 0.3).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_unordered_axes() {
        let xs = [2.0, 0.0, 1.0];
        let ys = [1.0, 0.0];
        let values: Vec<Vec<f64>> = xs
            .iter()
            .map(|&x| ys.iter().map(|&y| x + 10.0 * y).collect())
            .collect();
        let f = BilinearInterpolator::new(&xs, &ys, &values, "x", "y").unwrap();
        let g = plane();
        for &(x, y) in &[(0.0, 0.0), (0.7, 0.2), (1.5, 0.9), (2.0, 1.0)] {
            assert!((f.evaluate(x, y).unwrap() - g.evaluate(x, y).unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bilinear_outside_grid() {
        let f = plane();
        assert_eq!(f.evaluate(-0.1, 0.5).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(f.evaluate(1.0, 1.5).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_bilinear_shape_mismatch() {
        let values = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(BilinearInterpolator::new(&[0.0, 1.0], &[0.0, 1.0], &values, "x", "y").is_err());
    }
}
