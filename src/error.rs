//! # 统一错误处理模块
//!
//! 定义 beamdata 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - I/O 错误：文件不存在或不可读
//! - 格式错误：标签结构不符、数值字段无法解析、表格缺列
//! - 一致性错误：扫描边界嵌套错误、深度网格不一致、采样数不一致
//! - 定义域错误：插值函数在有效范围之外求值
//!
//! 所有错误都是致命的，不返回部分结果。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// beamdata 统一错误类型
#[derive(Error, Debug)]
pub enum BeamDataError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 格式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed file {path}{}: {reason}", fmt_line(.line))]
    FormatError {
        path: String,
        /// 出错行号（从 1 开始）
        line: Option<usize>,
        reason: String,
    },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: String, column: String },

    // ─────────────────────────────────────────────────────────────
    // 一致性错误
    // ─────────────────────────────────────────────────────────────
    #[error("Inconsistent data in {path}: {reason}")]
    ConsistencyError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 定义域错误
    // ─────────────────────────────────────────────────────────────
    #[error("{quantity} = {value} is outside the interpolation domain [{min}, {max}]")]
    DomainError {
        quantity: String,
        value: f64,
        min: f64,
        max: f64,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

fn fmt_line(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (line {})", n),
        None => String::new(),
    }
}

/// 错误类别，供调用方按类别分支处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    Consistency,
    Domain,
    InvalidArgument,
}

impl BeamDataError {
    /// 返回错误所属类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            BeamDataError::FileReadError { .. } => ErrorKind::Io,
            BeamDataError::FormatError { .. }
            | BeamDataError::MissingColumn { .. }
            | BeamDataError::CsvError(_) => ErrorKind::Format,
            BeamDataError::ConsistencyError { .. } => ErrorKind::Consistency,
            BeamDataError::DomainError { .. } => ErrorKind::Domain,
            BeamDataError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, BeamDataError>;
