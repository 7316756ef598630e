//! # 散射因子函数
//!
//! 由校准表与 PDD 函数构建的可调用散射因子：
//! - `AreaInterpolant`：Scp / Sc，在 √面积 上线性插值
//! - `PhantomScatter`：Sp，由 Scp/Sc 与 10 cm 深度 PDD 比值得到，并在校准射野面积处归一化为 1
//!
//! ## 公式
//! ```text
//! k        = (SSD_data / SSD_cal)²
//! A_iso    = A_surface / k
//! A_ref    = A_cal × k
//! Sp'(A)   = Scp(A_iso) / Sc(A_iso) × PDD(10, A_ref) / PDD(10, A)
//! Sp(A)    = Sp'(A) / Sp'(A_cal)
//! ```
//!
//! ## 依赖关系
//! - 被 `scatter/builder.rs` 构建
//! - 使用 `interp/linear.rs` 与 `parsers/mephisto.rs` 的 `PddFunction`

use crate::config::ScatterSetup;
use crate::error::{BeamDataError, Result};
use crate::interp::LinearInterpolator;
use crate::models::ScatterKind;
use crate::parsers::mephisto::PddFunction;

/// Sp 的 PDD 校正所用深度 (cm)
pub const REFERENCE_DEPTH: f64 = 10.0;

/// 以射野面积为自变量的函数
pub trait AreaFunction {
    /// 函数名（如 `Scp`, `Sc_wedge`）
    fn name(&self) -> &str;

    /// 在给定射野面积 (cm²) 处求值
    fn evaluate(&self, area: f64) -> Result<f64>;

    /// 逐点求值，任一点失败则整体失败
    fn evaluate_many(&self, areas: &[f64]) -> Result<Vec<f64>> {
        areas.iter().map(|&a| self.evaluate(a)).collect()
    }
}

/// Scp / Sc 插值函数：在 √面积 上做线性插值
#[derive(Debug, Clone)]
pub struct AreaInterpolant {
    name: String,
    interpolator: LinearInterpolator,
}

impl AreaInterpolant {
    /// 从 (射野面积, 值) 有效点构建
    ///
    /// `source` 为校准表来源，用于错误信息。
    pub fn from_points(
        name: impl Into<String>,
        points: &[(f64, f64)],
        source: &str,
    ) -> Result<Self> {
        let name = name.into();
        let sides: Vec<f64> = points.iter().map(|&(area, _)| area.sqrt()).collect();
        let values: Vec<f64> = points.iter().map(|&(_, value)| value).collect();

        let interpolator = LinearInterpolator::new(&sides, &values, format!("sqrt({} area)", name))
            .map_err(|e| BeamDataError::ConsistencyError {
                path: source.to_string(),
                reason: format!("cannot build {} interpolant: {}", name, e),
            })?;

        Ok(Self { name, interpolator })
    }

    /// 射野面积定义域 (cm²)
    pub fn domain(&self) -> (f64, f64) {
        let (lo, hi) = self.interpolator.domain();
        (lo * lo, hi * hi)
    }
}

impl AreaFunction for AreaInterpolant {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, iso_area: f64) -> Result<f64> {
        self.interpolator
            .evaluate(iso_area.sqrt())
            .map_err(|e| match e {
                BeamDataError::DomainError { .. } => {
                    let (min, max) = self.domain();
                    BeamDataError::DomainError {
                        quantity: format!("{} field area", self.name),
                        value: iso_area,
                        min,
                        max,
                    }
                }
                other => other,
            })
    }
}

/// 模体散射因子 Sp
#[derive(Debug, Clone)]
pub struct PhantomScatter {
    name: String,
    scp: AreaInterpolant,
    sc: AreaInterpolant,
    pdd: PddFunction,
    setup: ScatterSetup,
}

impl PhantomScatter {
    pub fn new(
        name: impl Into<String>,
        scp: AreaInterpolant,
        sc: AreaInterpolant,
        pdd: PddFunction,
        setup: ScatterSetup,
    ) -> Self {
        Self {
            name: name.into(),
            scp,
            sc,
            pdd,
            setup,
        }
    }

    /// 未归一化的 Sp，`area_surface` 为测量 SSD 处的射野面积
    pub fn not_normalised(&self, area_surface: f64) -> Result<f64> {
        let k = self.setup.area_scale();
        let area_reference = self.setup.calibration_field_area * k;
        let area_iso = area_surface / k;

        let sp_uncorrected = self.scp.evaluate(area_iso)? / self.sc.evaluate(area_iso)?;
        let pdd_correction = self.pdd.evaluate(REFERENCE_DEPTH, area_reference)?
            / self.pdd.evaluate(REFERENCE_DEPTH, area_surface)?;

        Ok(sp_uncorrected * pdd_correction)
    }

    /// 构建时使用的几何参数
    pub fn setup(&self) -> &ScatterSetup {
        &self.setup
    }
}

impl AreaFunction for PhantomScatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, area_surface: f64) -> Result<f64> {
        Ok(self.not_normalised(area_surface)?
            / self.not_normalised(self.setup.calibration_field_area)?)
    }
}

/// 一组散射因子函数 {Scp, Sc, Sp}（楔形板为 {Scp_wedge, Sc_wedge, Sp_wedge}）
#[derive(Debug, Clone)]
pub struct ScatterFunctions {
    kind: ScatterKind,
    scp: AreaInterpolant,
    sc: AreaInterpolant,
    sp: PhantomScatter,
}

impl ScatterFunctions {
    pub fn new(
        kind: ScatterKind,
        scp: AreaInterpolant,
        sc: AreaInterpolant,
        sp: PhantomScatter,
    ) -> Self {
        Self { kind, scp, sc, sp }
    }

    pub fn kind(&self) -> ScatterKind {
        self.kind
    }

    /// 函数名，顺序为 Scp, Sc, Sp
    pub fn names(&self) -> [&'static str; 3] {
        self.kind.function_names()
    }

    /// 总散射因子 Scp（等中心面积）
    pub fn scp(&self) -> &AreaInterpolant {
        &self.scp
    }

    /// 准直器散射因子 Sc（等中心面积）
    pub fn sc(&self) -> &AreaInterpolant {
        &self.sc
    }

    /// 模体散射因子 Sp（表面面积）
    pub fn sp(&self) -> &PhantomScatter {
        &self.sp
    }

    /// 按名称取函数
    pub fn get(&self, name: &str) -> Option<&dyn AreaFunction> {
        let [scp, sc, sp] = self.names();
        if name == scp {
            Some(&self.scp as &dyn AreaFunction)
        } else if name == sc {
            Some(&self.sc as &dyn AreaFunction)
        } else if name == sp {
            Some(&self.sp as &dyn AreaFunction)
        } else {
            None
        }
    }

    /// 按名称求值
    pub fn evaluate(&self, name: &str, area: f64) -> Result<f64> {
        self.lookup(name)?.evaluate(area)
    }

    /// 按名称逐点求值
    pub fn evaluate_many(&self, name: &str, areas: &[f64]) -> Result<Vec<f64>> {
        self.lookup(name)?.evaluate_many(areas)
    }

    fn lookup(&self, name: &str) -> Result<&dyn AreaFunction> {
        self.get(name).ok_or_else(|| {
            BeamDataError::InvalidArgument(format!(
                "unknown {} scatter function '{}', expected one of {:?}",
                self.kind,
                name,
                self.names()
            ))
        })
    }
}
