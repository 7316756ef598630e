//! # 配置参数
//!
//! 解析与函数构建所需的几何参数。库本身不读取环境变量或配置文件，
//! 调用方可以通过 `serde` 从自己的配置中反序列化这些结构。
//!
//! ## 默认值
//! - Mephisto 射野尺寸定义距离：100 cm
//! - 测量 SSD：100 cm
//! - 校准 SSD：100 cm
//! - 校准射野面积：100 cm² (10 × 10)
//!
//! ## 依赖关系
//! - 被 `parsers/mephisto.rs` 和 `scatter/` 使用

use crate::error::{BeamDataError, Result};
use serde::{Deserialize, Serialize};

/// PDD 扫描文件解析参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PddOptions {
    /// 文件中射野尺寸所对应的参考距离 (cm)
    pub field_size_defined_at: f64,
    /// 目标源皮距 SSD (cm)
    pub ssd: f64,
}

impl Default for PddOptions {
    fn default() -> Self {
        Self {
            field_size_defined_at: 100.0,
            ssd: 100.0,
        }
    }
}

impl PddOptions {
    /// 设置射野尺寸参考距离
    pub fn with_field_size_defined_at(mut self, distance: f64) -> Self {
        self.field_size_defined_at = distance;
        self
    }

    /// 设置 SSD
    pub fn with_ssd(mut self, ssd: f64) -> Self {
        self.ssd = ssd;
        self
    }

    /// 射野尺寸缩放因子 SSD / 参考距离
    pub fn scale(&self) -> f64 {
        self.ssd / self.field_size_defined_at
    }

    /// 检查参数均为正的有限值
    pub fn validate(&self) -> Result<()> {
        check_positive("field_size_defined_at", self.field_size_defined_at)?;
        check_positive("ssd", self.ssd)
    }
}

/// 散射因子函数构建参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSetup {
    /// PDD 测量时的 SSD (cm)
    pub ssd_data: f64,
    /// 校准时的 SSD (cm)
    pub ssd_cal: f64,
    /// 校准射野面积 (cm²)
    pub calibration_field_area: f64,
    /// Mephisto 文件射野尺寸参考距离 (cm)
    pub field_size_defined_at: f64,
}

impl Default for ScatterSetup {
    fn default() -> Self {
        Self {
            ssd_data: 100.0,
            ssd_cal: 100.0,
            calibration_field_area: 100.0,
            field_size_defined_at: 100.0,
        }
    }
}

impl ScatterSetup {
    pub fn with_ssd_data(mut self, ssd: f64) -> Self {
        self.ssd_data = ssd;
        self
    }

    pub fn with_ssd_cal(mut self, ssd: f64) -> Self {
        self.ssd_cal = ssd;
        self
    }

    pub fn with_calibration_field_area(mut self, area: f64) -> Self {
        self.calibration_field_area = area;
        self
    }

    pub fn with_field_size_defined_at(mut self, distance: f64) -> Self {
        self.field_size_defined_at = distance;
        self
    }

    /// 面积缩放因子 (SSD_data / SSD_cal)²
    pub fn area_scale(&self) -> f64 {
        (self.ssd_data / self.ssd_cal).powi(2)
    }

    /// 构建 PDD 函数所用的解析参数（以测量 SSD 解析）
    pub fn pdd_options(&self) -> PddOptions {
        PddOptions::default()
            .with_field_size_defined_at(self.field_size_defined_at)
            .with_ssd(self.ssd_data)
    }

    /// 检查参数均为正的有限值
    pub fn validate(&self) -> Result<()> {
        check_positive("ssd_data", self.ssd_data)?;
        check_positive("ssd_cal", self.ssd_cal)?;
        check_positive("calibration_field_area", self.calibration_field_area)?;
        check_positive("field_size_defined_at", self.field_size_defined_at)
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BeamDataError::InvalidArgument(format!(
            "{} must be a positive distance, got {}",
            name, value
        )))
    }
}
