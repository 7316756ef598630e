//! # 散射因子校准表解析器
//!
//! 读取 CSV 格式的散射因子校准表。
//!
//! ## 表格格式
//! ```text
//! field_area,Scp_open,Sc_open,Scp_wedge,Sc_wedge
//! 25,0.962,0.975,,
//! 100,1.000,1.000,1.000,1.000
//! 400,1.041,1.022,1.030,NaN
//! ```
//! 第一列为射野面积索引 (cm²)，其余列按表头命名。
//! 空单元格、`NaN`、`NA`、`N/A` 视为缺失值。
//!
//! ## 依赖关系
//! - 被 `scatter/builder.rs` 调用
//! - 使用 `models/calibration.rs`
//! - 使用 `csv` 库读取表格

use crate::error::{BeamDataError, Result};
use crate::models::ScatterCalibrationTable;

use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 解析校准表文件
pub fn parse_calibration_file(path: &Path) -> Result<ScatterCalibrationTable> {
    let file = File::open(path).map_err(|e| BeamDataError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_calibration_reader(file, &path.display().to_string())
}

/// 从字符串内容解析校准表
pub fn parse_calibration_content(content: &str, source: &str) -> Result<ScatterCalibrationTable> {
    parse_calibration_reader(content.as_bytes(), source)
}

fn parse_calibration_reader<R: Read>(reader: R, source: &str) -> Result<ScatterCalibrationTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err(BeamDataError::FormatError {
            path: source.to_string(),
            line: Some(1),
            reason: "calibration table needs an index column and at least one value column"
                .to_string(),
        });
    }
    let names: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

    let mut field_areas = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize);
        let format_error = |reason: String| BeamDataError::FormatError {
            path: source.to_string(),
            line,
            reason,
        };

        let index_cell = record.get(0).unwrap_or("");
        let area = match parse_cell(index_cell) {
            Some(Some(v)) if v > 0.0 => v,
            _ => {
                return Err(format_error(format!(
                    "invalid field area index '{}'",
                    index_cell
                )))
            }
        };

        let mut present = 0;
        for (col, name) in names.iter().enumerate() {
            let cell = record.get(col + 1).unwrap_or("");
            let value = parse_cell(cell)
                .ok_or_else(|| format_error(format!("invalid {} value '{}'", name, cell)))?;
            if value.is_some() {
                present += 1;
            }
            columns[col].push(value);
        }

        if present == 0 {
            warn!("{}: row for field area {} has no values", source, area);
        }
        field_areas.push(area);
    }

    let mut table = ScatterCalibrationTable::new(source, field_areas);
    for (name, values) in names.into_iter().zip(columns) {
        table = table.with_column(name, values)?;
    }

    debug!(
        "{}: loaded {} calibration rows, columns {:?}",
        source,
        table.len(),
        table.column_names()
    );

    Ok(table)
}

/// 解析单元格：缺失值返回 `Some(None)`，无法解析返回 `None`
fn parse_cell(cell: &str) -> Option<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty()
        || cell.eq_ignore_ascii_case("nan")
        || cell.eq_ignore_ascii_case("na")
        || cell.eq_ignore_ascii_case("n/a")
    {
        return Some(None);
    }

    cell.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}
