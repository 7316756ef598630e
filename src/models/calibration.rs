//! # 散射因子校准表数据模型
//!
//! 每行对应一个射野面积，列为各散射因子测量值，缺失值以 `None` 表示。
//! 每一列有独立的有效性掩码：某行缺失只会把该行从这一列的插值定义域中排除。
//!
//! ## 依赖关系
//! - 被 `parsers/calibration.rs` 构建
//! - 被 `scatter/functions.rs` 使用

use crate::error::{BeamDataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 开野 / 楔形板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatterKind {
    Open,
    Wedge,
}

impl ScatterKind {
    /// 校准表中的 Scp 列名
    pub fn scp_column(&self) -> &'static str {
        match self {
            ScatterKind::Open => "Scp_open",
            ScatterKind::Wedge => "Scp_wedge",
        }
    }

    /// 校准表中的 Sc 列名
    pub fn sc_column(&self) -> &'static str {
        match self {
            ScatterKind::Open => "Sc_open",
            ScatterKind::Wedge => "Sc_wedge",
        }
    }

    /// 返回函数名 (Scp, Sc, Sp)
    pub fn function_names(&self) -> [&'static str; 3] {
        match self {
            ScatterKind::Open => ["Scp", "Sc", "Sp"],
            ScatterKind::Wedge => ["Scp_wedge", "Sc_wedge", "Sp_wedge"],
        }
    }
}

impl std::fmt::Display for ScatterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScatterKind::Open => write!(f, "open"),
            ScatterKind::Wedge => write!(f, "wedge"),
        }
    }
}

/// 散射因子校准表
///
/// 列长度由 [`ScatterCalibrationTable::with_column`] 校验，因此只实现 `Serialize`。
#[derive(Debug, Clone, Serialize)]
pub struct ScatterCalibrationTable {
    /// 来源（文件路径，用于错误信息）
    source: String,
    /// 行索引：射野面积 (cm²)
    field_areas: Vec<f64>,
    /// 列名 -> 与 `field_areas` 对齐的可选值
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl ScatterCalibrationTable {
    /// 创建空表
    pub fn new(source: impl Into<String>, field_areas: Vec<f64>) -> Self {
        Self {
            source: source.into(),
            field_areas,
            columns: BTreeMap::new(),
        }
    }

    /// 添加一列，长度必须与行数一致
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        if values.len() != self.field_areas.len() {
            return Err(BeamDataError::ConsistencyError {
                path: self.source.clone(),
                reason: format!(
                    "column '{}' has {} rows, index has {}",
                    name,
                    values.len(),
                    self.field_areas.len()
                ),
            });
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn field_areas(&self) -> &[f64] {
        &self.field_areas
    }

    /// 列名列表（按字母序）
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// 原始列（含缺失值）
    pub fn raw_column(&self, name: &str) -> Result<&[Option<f64>]> {
        self.columns
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| BeamDataError::MissingColumn {
                path: self.source.clone(),
                column: name.to_string(),
            })
    }

    /// 有效的 (射野面积, 值) 对，跳过缺失值
    pub fn column(&self, name: &str) -> Result<Vec<(f64, f64)>> {
        let values = self.raw_column(name)?;
        Ok(self
            .field_areas
            .iter()
            .zip(values)
            .filter_map(|(&area, value)| value.map(|v| (area, v)))
            .collect())
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.field_areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_areas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn table() -> ScatterCalibrationTable {
        ScatterCalibrationTable::new("cal.csv", vec![25.0, 100.0, 400.0])
            .with_column("Scp_open", vec![Some(0.98), Some(1.0), Some(1.03)])
            .unwrap()
            .with_column("Sc_open", vec![None, Some(1.0), Some(1.02)])
            .unwrap()
    }

    #[test]
    fn test_independent_masks() {
        let t = table();
        assert_eq!(t.column("Scp_open").unwrap().len(), 3);
        assert_eq!(
            t.column("Sc_open").unwrap(),
            vec![(100.0, 1.0), (400.0, 1.02)]
        );
    }

    #[test]
    fn test_missing_column() {
        let err = table().column("Scp_wedge").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_column_length_mismatch() {
        let result = ScatterCalibrationTable::new("cal.csv", vec![25.0, 100.0])
            .with_column("Sc_open", vec![Some(1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ScatterKind::Open.scp_column(), "Scp_open");
        assert_eq!(ScatterKind::Wedge.sc_column(), "Sc_wedge");
        assert_eq!(ScatterKind::Wedge.function_names()[2], "Sp_wedge");
        assert_eq!(ScatterKind::Open.to_string(), "open");
    }
}
