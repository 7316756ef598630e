//! # Mephisto PDD 扫描文件解析器
//!
//! 解析水箱扫描仪导出的制表符分隔、标签逐行的 PDD 扫描文件，
//! 并构建深度 × 射野面积的百分深度剂量插值函数。
//!
//! ## 文件格式
//! ```text
//! BEGIN_SCAN_DATA
//! 	BEGIN_SCAN  1
//! 		FIELD_INPLANE=100.00
//! 		FIELD_CROSSPLANE=100.00
//! 		BEGIN_DATA
//! 			0.00		1.2340E-09
//! 			5.00		1.3010E-09
//! 		END_DATA
//! 	END_SCAN  1
//! END_SCAN_DATA
//! ```
//! 射野尺寸与深度单位为 mm，尺寸定义在 `field_size_defined_at` 距离处。
//!
//! ## 解析流程
//! 1. 单次遍历建立标签行索引
//! 2. 按位置配对 BEGIN_SCAN/END_SCAN 与 BEGIN_DATA/END_DATA，检查嵌套
//! 3. 读取每个扫描内的射野尺寸与数据块
//! 4. 交给 `PddTable::from_scans` 校验一致性并归一化
//!
//! ## 依赖关系
//! - 被 `scatter/builder.rs` 调用
//! - 使用 `models/scan.rs`, `interp/bilinear.rs`, `config.rs`
//! - 使用 `regex` 匹配标签行和数据行

use crate::config::PddOptions;
use crate::error::{BeamDataError, Result};
use crate::interp::BilinearInterpolator;
use crate::models::{PddTable, ScanRecord};

use log::{debug, trace};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// 结构标签；`\b` 排除 BEGIN_SCAN_DATA / END_SCAN_DATA 文件外壳
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(BEGIN_SCAN|END_SCAN|BEGIN_DATA|END_DATA)\b").expect("valid tag regex")
});

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*FIELD_(INPLANE|CROSSPLANE)=(\S*)").expect("valid field regex")
});

/// 数据行：`<深度>\t\t<读数>`，读数可为科学计数法
static DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\t\t(\d+(?:\.\d+)?(?:[Ee][-+]?\d+)?)\s*$")
        .expect("valid data regex")
});

/// 标签行索引（行号从 0 开始）
#[derive(Debug, Default)]
struct TagIndex {
    begin_scan: Vec<usize>,
    end_scan: Vec<usize>,
    begin_data: Vec<usize>,
    end_data: Vec<usize>,
    inplane: Vec<(usize, f64)>,
    crossplane: Vec<(usize, f64)>,
}

impl TagIndex {
    /// 单次正向遍历所有行
    fn build(lines: &[&str], source: &str) -> Result<Self> {
        let mut index = TagIndex::default();

        for (i, line) in lines.iter().enumerate() {
            if let Some(caps) = TAG_RE.captures(line) {
                match &caps[1] {
                    "BEGIN_SCAN" => index.begin_scan.push(i),
                    "END_SCAN" => index.end_scan.push(i),
                    "BEGIN_DATA" => index.begin_data.push(i),
                    _ => index.end_data.push(i),
                }
                continue;
            }

            if let Some(caps) = FIELD_RE.captures(line) {
                let value = parse_field_size(&caps[2]).ok_or_else(|| BeamDataError::FormatError {
                    path: source.to_string(),
                    line: Some(i + 1),
                    reason: format!("invalid FIELD_{} value '{}'", &caps[1], &caps[2]),
                })?;
                if &caps[1] == "INPLANE" {
                    index.inplane.push((i, value));
                } else {
                    index.crossplane.push((i, value));
                }
            }
        }

        Ok(index)
    }

    /// 按位置配对扫描边界，返回 (BEGIN_SCAN, END_SCAN) 行号
    fn scan_bounds(&self, source: &str) -> Result<Vec<(usize, usize)>> {
        let format_error = |line: Option<usize>, reason: String| BeamDataError::FormatError {
            path: source.to_string(),
            line,
            reason,
        };

        if self.begin_scan.len() != self.end_scan.len() {
            return Err(format_error(
                None,
                format!(
                    "tag count mismatch: {} BEGIN_SCAN vs {} END_SCAN",
                    self.begin_scan.len(),
                    self.end_scan.len()
                ),
            ));
        }
        if self.begin_scan.is_empty() {
            return Err(format_error(None, "no BEGIN_SCAN tag found".to_string()));
        }

        let bounds: Vec<(usize, usize)> = self
            .begin_scan
            .iter()
            .copied()
            .zip(self.end_scan.iter().copied())
            .collect();

        let mut previous_end: Option<usize> = None;
        for &(begin, end) in &bounds {
            if end < begin || previous_end.is_some_and(|prev| begin < prev) {
                return Err(format_error(
                    Some(end + 1),
                    "END_SCAN does not pair with the preceding BEGIN_SCAN".to_string(),
                ));
            }
            previous_end = Some(end);
        }

        Ok(bounds)
    }

    /// 按位置配对数据块，并检查每个数据块严格位于对应扫描内部
    fn data_bounds(&self, scans: &[(usize, usize)], source: &str) -> Result<Vec<(usize, usize)>> {
        if self.begin_data.len() != self.end_data.len() {
            return Err(BeamDataError::FormatError {
                path: source.to_string(),
                line: None,
                reason: format!(
                    "tag count mismatch: {} BEGIN_DATA vs {} END_DATA",
                    self.begin_data.len(),
                    self.end_data.len()
                ),
            });
        }

        let malformed = |reason: String| BeamDataError::ConsistencyError {
            path: source.to_string(),
            reason: format!("malformed scan boundaries: {}", reason),
        };

        if self.begin_data.len() != scans.len() {
            return Err(malformed(format!(
                "{} data blocks for {} scans",
                self.begin_data.len(),
                scans.len()
            )));
        }

        let blocks: Vec<(usize, usize)> = self
            .begin_data
            .iter()
            .copied()
            .zip(self.end_data.iter().copied())
            .collect();

        for (i, (&(scan_begin, scan_end), &(data_begin, data_end))) in
            scans.iter().zip(&blocks).enumerate()
        {
            let nested = scan_begin < data_begin
                && data_begin < scan_end
                && scan_begin < data_end
                && data_end < scan_end
                && data_begin < data_end;
            if !nested {
                return Err(malformed(format!(
                    "data block at lines {}-{} is not inside scan {} (lines {}-{})",
                    data_begin + 1,
                    data_end + 1,
                    i + 1,
                    scan_begin + 1,
                    scan_end + 1
                )));
            }
        }

        Ok(blocks)
    }
}

/// 射野尺寸必须为正的有限值
fn parse_field_size(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// 在扫描边界内查找唯一的射野尺寸声明
fn field_in_scan(
    declarations: &[(usize, f64)],
    (begin, end): (usize, usize),
    name: &str,
    scan_number: usize,
    source: &str,
) -> Result<f64> {
    let found: Vec<f64> = declarations
        .iter()
        .filter(|(line, _)| begin < *line && *line < end)
        .map(|&(_, value)| value)
        .collect();

    match found.as_slice() {
        [value] => Ok(*value),
        _ => Err(BeamDataError::FormatError {
            path: source.to_string(),
            line: Some(begin + 1),
            reason: format!(
                "scan {} has {} FIELD_{} declarations, expected 1",
                scan_number,
                found.len(),
                name
            ),
        }),
    }
}

/// 解析数据块内部行，返回 (深度 cm, 读数)
fn parse_data_block(
    lines: &[&str],
    (begin, end): (usize, usize),
    source: &str,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut depths = Vec::with_capacity(end - begin);
    let mut readings = Vec::with_capacity(end - begin);

    for (i, line) in lines.iter().enumerate().take(end).skip(begin + 1) {
        let parsed = DATA_RE.captures(line).and_then(|caps| {
            let depth = caps[1].parse::<f64>().ok().filter(|v| v.is_finite())?;
            let reading = caps[2].parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some((depth, reading))
        });

        let (depth_mm, reading) = parsed.ok_or_else(|| BeamDataError::FormatError {
            path: source.to_string(),
            line: Some(i + 1),
            reason: format!("malformed data line '{}'", line.trim()),
        })?;

        depths.push(depth_mm / 10.0);
        readings.push(reading);
    }

    Ok((depths, readings))
}

/// 解析 Mephisto 扫描文件
pub fn parse_mephisto_file(path: &Path, options: &PddOptions) -> Result<PddTable> {
    let content = fs::read_to_string(path).map_err(|e| BeamDataError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_mephisto_content(&content, &path.display().to_string(), options)
}

/// 从字符串内容解析 Mephisto 扫描数据
///
/// `source` 用于错误信息和日志，通常为文件路径。
pub fn parse_mephisto_content(
    content: &str,
    source: &str,
    options: &PddOptions,
) -> Result<PddTable> {
    options.validate()?;

    let lines: Vec<&str> = content.lines().collect();
    let index = TagIndex::build(&lines, source)?;
    let scan_bounds = index.scan_bounds(source)?;
    let data_bounds = index.data_bounds(&scan_bounds, source)?;

    let scale = options.scale();

    let mut scans = Vec::with_capacity(scan_bounds.len());
    for (i, (&bounds, &block)) in scan_bounds.iter().zip(&data_bounds).enumerate() {
        let inplane = field_in_scan(&index.inplane, bounds, "INPLANE", i + 1, source)?;
        let crossplane = field_in_scan(&index.crossplane, bounds, "CROSSPLANE", i + 1, source)?;
        let (depths, readings) = parse_data_block(&lines, block, source)?;

        let scan = ScanRecord {
            // mm -> cm，再缩放到目标 SSD
            inplane_size: inplane / 10.0 * scale,
            crossplane_size: crossplane / 10.0 * scale,
            depths,
            readings,
            begin_line: bounds.0,
            end_line: bounds.1,
        };
        trace!(
            "{}: scan {} field {:.2} x {:.2} cm, {} samples",
            source,
            i + 1,
            scan.inplane_size,
            scan.crossplane_size,
            scan.readings.len()
        );
        scans.push(scan);
    }

    let table = PddTable::from_scans(&scans, source)?;
    debug!(
        "{}: parsed {} scans over {} depths, field areas {:?} cm²",
        source,
        table.len(),
        table.depths().len(),
        table.field_areas()
    );

    Ok(table)
}

/// 百分深度剂量插值函数 PDD(depth, area)
///
/// 深度单位 cm，面积单位 cm²。网格外求值返回 `DomainError`。
#[derive(Debug, Clone)]
pub struct PddFunction {
    table: PddTable,
    interpolator: BilinearInterpolator,
}

impl PddFunction {
    /// 从 PDD 表构建双线性插值函数
    pub fn from_table(table: PddTable) -> Result<Self> {
        let depths = table.depths();
        let areas = table.field_areas();

        // 行 = 深度，列 = 射野面积
        let grid: Vec<Vec<f64>> = (0..depths.len())
            .map(|d| table.columns().iter().map(|c| c.doses[d]).collect())
            .collect();

        let interpolator = BilinearInterpolator::new(depths, &areas, &grid, "depth", "field area")
            .map_err(|e| BeamDataError::ConsistencyError {
                path: table.source().to_string(),
                reason: format!("cannot build depth-dose interpolant: {}", e),
            })?;

        Ok(Self {
            table,
            interpolator,
        })
    }

    /// 在 (depth cm, area cm²) 处的百分深度剂量
    pub fn evaluate(&self, depth: f64, area: f64) -> Result<f64> {
        self.interpolator.evaluate(depth, area)
    }

    /// 底层 PDD 表
    pub fn table(&self) -> &PddTable {
        &self.table
    }

    /// 深度定义域 (cm)
    pub fn depth_domain(&self) -> (f64, f64) {
        self.interpolator.x_domain()
    }

    /// 射野面积定义域 (cm²)
    pub fn area_domain(&self) -> (f64, f64) {
        self.interpolator.y_domain()
    }
}

/// 解析扫描文件并构建 PDD 插值函数
pub fn create_pdd_function(path: &Path, options: &PddOptions) -> Result<PddFunction> {
    let table = parse_mephisto_file(path, options)?;
    PddFunction::from_table(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// 生成扫描块；`points` 为 (深度 mm, 读数)
    fn scan_block(n: usize, inplane: &str, crossplane: &str, points: &[(&str, &str)]) -> String {
        let mut s = format!("\tBEGIN_SCAN  {}\n", n);
        s.push_str("\t\tSCAN_CURVETYPE=PDD\n");
        s.push_str(&format!("\t\tFIELD_INPLANE={}\n", inplane));
        s.push_str(&format!("\t\tFIELD_CROSSPLANE={}\n", crossplane));
        s.push_str("\t\tBEGIN_DATA\n");
        for (depth, reading) in points {
            s.push_str(&format!("\t\t\t{}\t\t{}\n", depth, reading));
        }
        s.push_str("\t\tEND_DATA\n");
        s.push_str(&format!("\tEND_SCAN  {}\n", n));
        s
    }

    fn file(blocks: &[String]) -> String {
        format!("BEGIN_SCAN_DATA\n\tFORMAT=MEPHISTO\n{}END_SCAN_DATA\n", blocks.concat())
    }

    const SMALL: [(&str, &str); 3] = [
        ("0.00", "5.0000E-01"),
        ("50.00", "1.0000E+00"),
        ("100.00", "2.5000E-01"),
    ];
    const LARGE: [(&str, &str); 3] = [
        ("0.00", "2.0000E+00"),
        ("50.00", "4.0000E+00"),
        ("100.00", "3.0000E+00"),
    ];

    fn two_scans() -> String {
        file(&[
            scan_block(1, "50.00", "50.00", &SMALL),
            scan_block(2, "100.00", "100.00", &LARGE),
        ])
    }

    #[test]
    fn test_parse_two_scans() {
        let table = parse_mephisto_content(&two_scans(), "test", &PddOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.depths(), &[0.0, 5.0, 10.0]);
        assert_eq!(table.field_areas(), vec![25.0, 100.0]);
        assert_eq!(table.value(1, 0), Some(100.0));
        assert_eq!(table.value(2, 0), Some(25.0));
        assert_eq!(table.value(2, 1), Some(75.0));
    }

    #[test]
    fn test_field_size_scaled_to_ssd() {
        let opts = PddOptions::default().with_ssd(90.0);
        let table = parse_mephisto_content(&two_scans(), "test", &opts).unwrap();
        let areas = table.field_areas();
        assert!((areas[0] - 5.0 * 5.0 * 0.81).abs() < 1e-9);
        assert!((areas[1] - 10.0 * 10.0 * 0.81).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_tags_ignored() {
        // BEGIN_SCAN_DATA / END_SCAN_DATA 不应被当作扫描标签
        let index = TagIndex::build(&two_scans().lines().collect::<Vec<_>>(), "t").unwrap();
        assert_eq!(index.begin_scan.len(), 2);
        assert_eq!(index.end_scan.len(), 2);
    }

    #[test]
    fn test_scan_tag_count_mismatch() {
        let content = two_scans().replacen("\tEND_SCAN  2\n", "", 1);
        let err = parse_mephisto_content(&content, "test", &PddOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_data_outside_scan() {
        let content = two_scans().replacen(
            "\t\tEND_DATA\n\tEND_SCAN  1\n",
            "\tEND_SCAN  1\n\t\tEND_DATA\n",
            1,
        );
        let err = parse_mephisto_content(&content, "test", &PddOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert!(err.to_string().contains("malformed scan boundaries"));
    }

    #[test]
    fn test_depth_mismatch() {
        let shifted = [
            ("0.00", "2.0000E+00"),
            ("51.00", "4.0000E+00"),
            ("100.00", "3.0000E+00"),
        ];
        let content = file(&[
            scan_block(1, "50.00", "50.00", &SMALL),
            scan_block(2, "100.00", "100.00", &shifted),
        ]);
        let err = parse_mephisto_content(&content, "test", &PddOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert!(err.to_string().contains("inconsistent depth sampling"));
    }

    #[test]
    fn test_malformed_data_line() {
        let content = two_scans().replacen("2.5000E-01", "abc", 1);
        let err = parse_mephisto_content(&content, "test", &PddOptions::default()).unwrap_err();
        match err {
            BeamDataError::FormatError { line, .. } => assert_eq!(line, Some(10)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overflowing_reading() {
        let content = two_scans().replacen("1.0000E+00", "1.0000E+999", 1);
        let err = parse_mephisto_content(&content, "test", &PddOptions::default()).unwrap_err();
        match err {
            BeamDataError::FormatError { line, .. } => assert_eq!(line, Some(9)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_declaration() {
        let content = two_scans().replacen("\t\tFIELD_CROSSPLANE=100.00\n", "", 1);
        let err = parse_mephisto_content(&content, "test", &PddOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_pdd_function_reproduces_grid() {
        let table = parse_mephisto_content(&two_scans(), "test", &PddOptions::default()).unwrap();
        let pdd = PddFunction::from_table(table).unwrap();
        assert_eq!(pdd.evaluate(5.0, 100.0).unwrap(), 100.0);
        assert_eq!(pdd.evaluate(10.0, 25.0).unwrap(), 25.0);
        assert_eq!(pdd.depth_domain(), (0.0, 10.0));
        assert_eq!(pdd.area_domain(), (25.0, 100.0));

        // 面积方向中点
        let mid = pdd.evaluate(10.0, 62.5).unwrap();
        assert!((mid - 50.0).abs() < 1e-9);

        assert_eq!(pdd.evaluate(12.0, 50.0).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_single_scan_cannot_interpolate() {
        let content = file(&[scan_block(1, "100.00", "100.00", &LARGE)]);
        let table = parse_mephisto_content(&content, "test", &PddOptions::default()).unwrap();
        let err = PddFunction::from_table(table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Consistency);
    }

    #[test]
    fn test_missing_file() {
        let err = create_pdd_function(Path::new("/nonexistent/open.mcc"), &PddOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
