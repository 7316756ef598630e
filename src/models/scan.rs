//! # PDD 扫描数据模型
//!
//! 单次扫描 (`ScanRecord`) 与文件级百分深度剂量表 (`PddTable`)。
//!
//! ## 不变量
//! - 所有扫描的深度网格与第一次扫描完全相同（逐位相等）
//! - 所有扫描的采样点数相同
//! - 每次扫描的最大读数为正（归一化有定义）
//! - 各扫描的射野面积互不相同
//!
//! ## 依赖关系
//! - 被 `parsers/mephisto.rs` 构建
//! - 被 `scatter/` 间接使用（经由 PDD 函数）

use crate::error::{BeamDataError, Result};
use serde::{Deserialize, Serialize};

/// 单次扫描
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    /// inplane 方向射野尺寸 (cm，已缩放至目标 SSD)
    pub inplane_size: f64,

    /// crossplane 方向射野尺寸 (cm，已缩放至目标 SSD)
    pub crossplane_size: f64,

    /// 深度采样 (cm)
    pub depths: Vec<f64>,

    /// 原始探测器读数，与 `depths` 一一对应
    pub readings: Vec<f64>,

    /// `BEGIN_SCAN` 所在行（从 0 开始）
    pub begin_line: usize,

    /// `END_SCAN` 所在行（从 0 开始）
    pub end_line: usize,
}

impl ScanRecord {
    /// 射野面积 (cm²)
    pub fn field_area(&self) -> f64 {
        self.inplane_size * self.crossplane_size
    }

    /// 最大原始读数
    pub fn max_reading(&self) -> Option<f64> {
        self.readings.iter().copied().reduce(f64::max)
    }

    /// 归一化到本次扫描最大值的百分深度剂量
    pub fn normalised_readings(&self) -> Vec<f64> {
        match self.max_reading() {
            Some(max) if max > 0.0 => self.readings.iter().map(|r| r / max * 100.0).collect(),
            _ => Vec::new(),
        }
    }
}

/// 单个射野面积对应的一列 PDD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PddColumn {
    /// 射野面积 (cm²)
    pub field_area: f64,
    /// 百分深度剂量 (%)，与深度网格对齐
    pub doses: Vec<f64>,
}

/// 文件级 PDD 表：行为共享深度网格，列按扫描发现顺序排列
///
/// 只能经由 [`PddTable::from_scans`] 构建，因此只实现 `Serialize`。
#[derive(Debug, Clone, Serialize)]
pub struct PddTable {
    source: String,
    depths: Vec<f64>,
    columns: Vec<PddColumn>,
}

impl PddTable {
    /// 从扫描列表构建 PDD 表并校验一致性
    ///
    /// `source` 仅用于错误信息。
    pub fn from_scans(scans: &[ScanRecord], source: &str) -> Result<Self> {
        let inconsistent = |reason: String| BeamDataError::ConsistencyError {
            path: source.to_string(),
            reason,
        };

        let first = scans
            .first()
            .ok_or_else(|| inconsistent("no scans found".to_string()))?;
        let depths = first.depths.clone();

        for (i, scan) in scans.iter().enumerate() {
            if scan.readings.len() != scan.depths.len() {
                return Err(inconsistent(format!(
                    "inconsistent sample count: scan {} has {} depths but {} readings",
                    i + 1,
                    scan.depths.len(),
                    scan.readings.len()
                )));
            }
            if scan.depths.len() != depths.len() {
                return Err(inconsistent(format!(
                    "inconsistent sample count: scan {} has {} samples, scan 1 has {}",
                    i + 1,
                    scan.depths.len(),
                    depths.len()
                )));
            }
            if scan.depths != depths {
                return Err(inconsistent(format!(
                    "inconsistent depth sampling across scans: scan {} differs from scan 1",
                    i + 1
                )));
            }
        }

        let mut columns = Vec::with_capacity(scans.len());
        for (i, scan) in scans.iter().enumerate() {
            match scan.max_reading() {
                Some(max) if max > 0.0 => {}
                _ => {
                    return Err(inconsistent(format!(
                        "scan {} has no positive reading to normalise to",
                        i + 1
                    )))
                }
            }

            let field_area = scan.field_area();
            if columns.iter().any(|c: &PddColumn| c.field_area == field_area) {
                return Err(inconsistent(format!(
                    "duplicate field area {} cm² (scan {})",
                    field_area,
                    i + 1
                )));
            }

            columns.push(PddColumn {
                field_area,
                doses: scan.normalised_readings(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            depths,
            columns,
        })
    }

    /// 来源（文件路径）
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 共享深度网格 (cm)
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// 按扫描顺序排列的射野面积 (cm²)
    pub fn field_areas(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.field_area).collect()
    }

    /// 所有列
    pub fn columns(&self) -> &[PddColumn] {
        &self.columns
    }

    /// 第 `scan_index` 列在第 `depth_index` 个深度处的值
    pub fn value(&self, depth_index: usize, scan_index: usize) -> Option<f64> {
        self.columns
            .get(scan_index)
            .and_then(|c| c.doses.get(depth_index))
            .copied()
    }

    /// 扫描（列）数
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
