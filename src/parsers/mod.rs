//! # 解析器模块
//!
//! 提供 Mephisto PDD 扫描文件和散射因子校准表的解析器。
//!
//! ## 依赖关系
//! - 被 `scatter/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: mephisto, calibration

pub mod calibration;
pub mod mephisto;

pub use calibration::{parse_calibration_content, parse_calibration_file};
pub use mephisto::{create_pdd_function, parse_mephisto_content, parse_mephisto_file, PddFunction};
