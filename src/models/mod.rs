//! # 数据模型模块
//!
//! 定义扫描数据、PDD 表和散射因子校准表的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `scatter/` 使用
//! - 子模块: scan, calibration

pub mod calibration;
pub mod scan;

pub use calibration::{ScatterCalibrationTable, ScatterKind};
pub use scan::{PddColumn, PddTable, ScanRecord};
