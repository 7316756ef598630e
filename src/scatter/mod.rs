//! # 散射因子模块
//!
//! 由散射因子校准表和 PDD 插值函数构建输出因子函数。
//!
//! ## 子模块
//! - `functions`: Scp / Sc / Sp 函数对象
//! - `builder`: 开野与楔形板函数组的构建入口
//!
//! ## 依赖关系
//! - 使用 `parsers/`, `models/`, `interp/`, `config.rs`

pub mod builder;
pub mod functions;

pub use builder::{
    build_open_scatter_functions, build_scatter_functions, build_wedge_scatter_functions,
};
pub use functions::{
    AreaFunction, AreaInterpolant, PhantomScatter, ScatterFunctions, REFERENCE_DEPTH,
};
