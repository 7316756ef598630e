//! # 散射因子函数构建
//!
//! 读取校准表与 PDD 扫描文件，构建开野或楔形板的 {Scp, Sc, Sp} 函数组。
//! 开野与楔形板流程相同，仅读取的校准表列不同。
//!
//! ## 依赖关系
//! - 使用 `parsers/calibration.rs` 读取校准表
//! - 使用 `parsers/mephisto.rs` 构建 PDD 函数
//! - 使用 `scatter/functions.rs`

use crate::config::ScatterSetup;
use crate::error::Result;
use crate::models::{ScatterCalibrationTable, ScatterKind};
use crate::parsers::calibration::parse_calibration_file;
use crate::parsers::mephisto::{create_pdd_function, PddFunction};
use crate::scatter::functions::{AreaInterpolant, PhantomScatter, ScatterFunctions};

use log::debug;
use std::path::Path;

/// 构建开野散射因子函数 {Scp, Sc, Sp}
pub fn build_open_scatter_functions(
    scatter_path: &Path,
    pdd_path: &Path,
    setup: &ScatterSetup,
) -> Result<ScatterFunctions> {
    build_from_files(ScatterKind::Open, scatter_path, pdd_path, setup)
}

/// 构建楔形板散射因子函数 {Scp_wedge, Sc_wedge, Sp_wedge}
pub fn build_wedge_scatter_functions(
    scatter_path: &Path,
    pdd_path: &Path,
    setup: &ScatterSetup,
) -> Result<ScatterFunctions> {
    build_from_files(ScatterKind::Wedge, scatter_path, pdd_path, setup)
}

fn build_from_files(
    kind: ScatterKind,
    scatter_path: &Path,
    pdd_path: &Path,
    setup: &ScatterSetup,
) -> Result<ScatterFunctions> {
    setup.validate()?;

    debug!(
        "building {} scatter functions from {} and {}",
        kind,
        scatter_path.display(),
        pdd_path.display()
    );

    let table = parse_calibration_file(scatter_path)?;
    let pdd = create_pdd_function(pdd_path, &setup.pdd_options())?;

    build_scatter_functions(kind, &table, pdd, setup)
}

/// 由已加载的校准表和 PDD 函数构建散射因子函数
///
/// `pdd` 应以 `setup.ssd_data` 解析。
pub fn build_scatter_functions(
    kind: ScatterKind,
    table: &ScatterCalibrationTable,
    pdd: PddFunction,
    setup: &ScatterSetup,
) -> Result<ScatterFunctions> {
    setup.validate()?;

    let [scp_name, sc_name, sp_name] = kind.function_names();

    let scp_points = table.column(kind.scp_column())?;
    let sc_points = table.column(kind.sc_column())?;

    let scp = AreaInterpolant::from_points(scp_name, &scp_points, table.source())?;
    let sc = AreaInterpolant::from_points(sc_name, &sc_points, table.source())?;

    debug!(
        "{}: {} domain {:?} cm², {} domain {:?} cm²",
        table.source(),
        scp_name,
        scp.domain(),
        sc_name,
        sc.domain()
    );

    let sp = PhantomScatter::new(sp_name, scp.clone(), sc.clone(), pdd, *setup);

    Ok(ScatterFunctions::new(kind, scp, sc, sp))
}
