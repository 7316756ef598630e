//! # beamdata - 放疗剂量学测量数据解析与插值
//!
//! 解析 Mephisto 水箱扫描文件和散射因子校准表，构建 MU 独立核对所需的
//! 百分深度剂量函数与输出因子函数。
//!
//! ## 功能
//! - `parsers::mephisto` - PDD 扫描文件解析，构建 PDD(depth, area) 插值函数
//! - `parsers::calibration` - 散射因子校准表 (CSV) 解析
//! - `scatter` - 开野与楔形板的 Scp / Sc / Sp 函数组
//!
//! ## 用法
//! ```no_run
//! use beamdata::{build_open_scatter_functions, AreaFunction, ScatterSetup};
//! use std::path::Path;
//!
//! let functions = build_open_scatter_functions(
//!     Path::new("scatter.csv"),
//!     Path::new("open_pdd.mcc"),
//!     &ScatterSetup::default(),
//! )?;
//! let sp = functions.sp().evaluate(144.0)?;
//! # Ok::<(), beamdata::BeamDataError>(())
//! ```
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── scatter/    (散射因子函数构建)
//!   │     ├── parsers/   (扫描文件与校准表解析)
//!   │     ├── interp/    (分段线性插值)
//!   │     └── models/    (数据模型)
//!   ├── config.rs   (几何参数)
//!   └── error.rs    (错误处理)
//! ```

pub mod config;
pub mod error;
pub mod interp;
pub mod models;
pub mod parsers;
pub mod scatter;

pub use config::{PddOptions, ScatterSetup};
pub use error::{BeamDataError, ErrorKind, Result};
pub use models::{PddTable, ScanRecord, ScatterCalibrationTable, ScatterKind};
pub use parsers::{create_pdd_function, PddFunction};
pub use scatter::{
    build_open_scatter_functions, build_scatter_functions, build_wedge_scatter_functions,
    AreaFunction, ScatterFunctions,
};
