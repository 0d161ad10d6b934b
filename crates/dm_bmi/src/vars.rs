// crates/dm_bmi/src/vars.rs

//! 交换量注册表
//!
//! 封闭的交换量枚举：名称只在边界处解析一次，内部一律用标签变体
//! 分发，元数据（单位/类型/网格/读写性）集中在本模块。
//!
//! # 网格编号
//!
//! - 0: 标量网格（秩 0，大小 1）
//! - 1: 活动窗口网格（秩 2，维度 `[ny_full/2, nx, 1]`）
//! - 2: 全网格（秩 2，维度 `[ny_full, nx, 1]`，通量输入坐标系）
//!
//! 传统网格量名（`DEPTH` 等）大小写不敏感，标准名精确匹配。

use serde::{Deserialize, Serialize};

use dm_foundation::error::{DmError, DmResult};

/// 波高
pub const NAME_WAVE_HEIGHT: &str = "sea_surface_water_wave__height";
/// 波周期
pub const NAME_WAVE_PERIOD: &str = "sea_surface_water_wave__period";
/// 来波角高角占比参数
pub const NAME_ANGLE_HIGHNESS: &str =
    "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_highness_parameter";
/// 来波角不对称参数
pub const NAME_ANGLE_ASYMMETRY: &str =
    "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_asymmetry_parameter";
/// 瞬时来波角
pub const NAME_WAVE_ANGLE: &str =
    "sea_surface_water_wave__azimuth_angle_of_opposite_of_phase_velocity";
/// 来波角增量最小值
pub const NAME_WAVE_ANGLE_MIN: &str =
    "sea_surface_water_wave__min_of_increment_of_azimuth_angle_of_opposite_of_phase_velocity";
/// 来波角增量平均值
pub const NAME_WAVE_ANGLE_MEAN: &str =
    "sea_surface_water_wave__mean_of_increment_of_azimuth_angle_of_opposite_of_phase_velocity";
/// 来波角增量最大值
pub const NAME_WAVE_ANGLE_MAX: &str =
    "sea_surface_water_wave__max_of_increment_of_azimuth_angle_of_opposite_of_phase_velocity";
/// 水深（窗口网格，传统名）
pub const NAME_DEPTH: &str = "DEPTH";
/// 填充率（窗口网格，传统名）
pub const NAME_PERCENT_FILLED: &str = "PERCENT_FILLED";
/// 高程（窗口网格，传统名，= 负水深）
pub const NAME_ELEVATION: &str = "ELEVATION";
/// 输沙通量网格（全网格）
pub const NAME_SEDIMENT_FLUX: &str = "land_surface_water_sediment~bedload__mass_flow_rate";

/// 可设置的交换量名称表
pub const INPUT_VAR_NAMES: &[&str] = &[
    NAME_WAVE_HEIGHT,
    NAME_WAVE_PERIOD,
    NAME_ANGLE_HIGHNESS,
    NAME_ANGLE_ASYMMETRY,
    NAME_SEDIMENT_FLUX,
];

/// 可读取的交换量名称表
pub const OUTPUT_VAR_NAMES: &[&str] = &[
    NAME_WAVE_ANGLE_MIN,
    NAME_WAVE_ANGLE,
    NAME_WAVE_ANGLE_MEAN,
    NAME_WAVE_ANGLE_MAX,
    NAME_WAVE_HEIGHT,
    NAME_WAVE_PERIOD,
    NAME_DEPTH,
    NAME_PERCENT_FILLED,
    NAME_ELEVATION,
];

/// 交换量所在的网格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridId {
    /// 标量网格
    Scalar = 0,
    /// 活动窗口网格
    Window = 1,
    /// 全网格（通量输入）
    Full = 2,
}

impl GridId {
    /// 网格秩
    #[inline]
    pub const fn rank(self) -> usize {
        match self {
            GridId::Scalar => 0,
            GridId::Window | GridId::Full => 2,
        }
    }

    /// 网格类型字符串
    #[inline]
    pub const fn grid_type(self) -> &'static str {
        match self {
            GridId::Scalar => "scalar",
            GridId::Window | GridId::Full => "uniform_rectilinear",
        }
    }
}

/// 已注册的交换量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variable {
    /// 波高 [m]
    WaveHeight,
    /// 波周期 [s]
    WavePeriod,
    /// 来波角高角占比参数
    AngleHighness,
    /// 来波角不对称参数
    AngleAsymmetry,
    /// 瞬时来波角 [rad]
    WaveAngle,
    /// 来波角增量最小值 [rad]
    WaveAngleMin,
    /// 来波角增量平均值 [rad]
    WaveAngleMean,
    /// 来波角增量最大值 [rad]
    WaveAngleMax,
    /// 水深（窗口网格）[m]
    Depth,
    /// 填充率（窗口网格）
    PercentFilled,
    /// 高程（窗口网格）[m]
    Elevation,
    /// 输沙通量网格（全网格）[kg/s]
    SedimentFluxGrid,
}

/// 全部交换量（遍历用）
pub const ALL_VARIABLES: &[Variable] = &[
    Variable::WaveHeight,
    Variable::WavePeriod,
    Variable::AngleHighness,
    Variable::AngleAsymmetry,
    Variable::WaveAngle,
    Variable::WaveAngleMin,
    Variable::WaveAngleMean,
    Variable::WaveAngleMax,
    Variable::Depth,
    Variable::PercentFilled,
    Variable::Elevation,
    Variable::SedimentFluxGrid,
];

impl Variable {
    /// 按名称解析交换量
    ///
    /// 标准名精确匹配；传统网格量名大小写不敏感。未注册的名称返回
    /// [`DmError::UnknownVariable`]。
    pub fn resolve(name: &str) -> DmResult<Self> {
        match name {
            NAME_WAVE_HEIGHT => return Ok(Self::WaveHeight),
            NAME_WAVE_PERIOD => return Ok(Self::WavePeriod),
            NAME_ANGLE_HIGHNESS => return Ok(Self::AngleHighness),
            NAME_ANGLE_ASYMMETRY => return Ok(Self::AngleAsymmetry),
            NAME_WAVE_ANGLE => return Ok(Self::WaveAngle),
            NAME_WAVE_ANGLE_MIN => return Ok(Self::WaveAngleMin),
            NAME_WAVE_ANGLE_MEAN => return Ok(Self::WaveAngleMean),
            NAME_WAVE_ANGLE_MAX => return Ok(Self::WaveAngleMax),
            NAME_SEDIMENT_FLUX => return Ok(Self::SedimentFluxGrid),
            _ => {}
        }
        if name.eq_ignore_ascii_case(NAME_DEPTH) {
            Ok(Self::Depth)
        } else if name.eq_ignore_ascii_case(NAME_PERCENT_FILLED) {
            Ok(Self::PercentFilled)
        } else if name.eq_ignore_ascii_case(NAME_ELEVATION) {
            Ok(Self::Elevation)
        } else {
            Err(DmError::unknown_variable(name))
        }
    }

    /// 注册名称
    pub const fn name(self) -> &'static str {
        match self {
            Self::WaveHeight => NAME_WAVE_HEIGHT,
            Self::WavePeriod => NAME_WAVE_PERIOD,
            Self::AngleHighness => NAME_ANGLE_HIGHNESS,
            Self::AngleAsymmetry => NAME_ANGLE_ASYMMETRY,
            Self::WaveAngle => NAME_WAVE_ANGLE,
            Self::WaveAngleMin => NAME_WAVE_ANGLE_MIN,
            Self::WaveAngleMean => NAME_WAVE_ANGLE_MEAN,
            Self::WaveAngleMax => NAME_WAVE_ANGLE_MAX,
            Self::Depth => NAME_DEPTH,
            Self::PercentFilled => NAME_PERCENT_FILLED,
            Self::Elevation => NAME_ELEVATION,
            Self::SedimentFluxGrid => NAME_SEDIMENT_FLUX,
        }
    }

    /// 单位字符串
    pub const fn units(self) -> &'static str {
        match self {
            Self::WaveHeight | Self::Depth | Self::Elevation => "meters",
            Self::WavePeriod => "seconds",
            Self::AngleHighness | Self::AngleAsymmetry | Self::PercentFilled => "-",
            Self::WaveAngle | Self::WaveAngleMin | Self::WaveAngleMean | Self::WaveAngleMax => {
                "radians"
            }
            Self::SedimentFluxGrid => "kilograms / second",
        }
    }

    /// 所在网格
    pub const fn grid(self) -> GridId {
        match self {
            Self::WaveHeight
            | Self::WavePeriod
            | Self::AngleHighness
            | Self::AngleAsymmetry
            | Self::WaveAngle
            | Self::WaveAngleMin
            | Self::WaveAngleMean
            | Self::WaveAngleMax => GridId::Scalar,
            Self::Depth | Self::PercentFilled | Self::Elevation => GridId::Window,
            Self::SedimentFluxGrid => GridId::Full,
        }
    }

    /// 元素类型字符串（所有交换量统一为双精度）
    pub const fn var_type(self) -> &'static str {
        "double"
    }

    /// 单元素字节数
    pub const fn itemsize(self) -> usize {
        std::mem::size_of::<f64>()
    }

    /// 是否可设置
    pub const fn is_input(self) -> bool {
        matches!(
            self,
            Self::WaveHeight
                | Self::WavePeriod
                | Self::AngleHighness
                | Self::AngleAsymmetry
                | Self::SedimentFluxGrid
        )
    }

    /// 是否可读取
    pub const fn is_output(self) -> bool {
        !matches!(self, Self::AngleHighness | Self::AngleAsymmetry | Self::SedimentFluxGrid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_standard_names() {
        assert_eq!(
            Variable::resolve(NAME_WAVE_HEIGHT).unwrap(),
            Variable::WaveHeight
        );
        assert_eq!(
            Variable::resolve(NAME_ANGLE_ASYMMETRY).unwrap(),
            Variable::AngleAsymmetry
        );
        assert_eq!(
            Variable::resolve(NAME_WAVE_ANGLE_MEAN).unwrap(),
            Variable::WaveAngleMean
        );
    }

    #[test]
    fn test_resolve_legacy_names_case_insensitive() {
        assert_eq!(Variable::resolve("DEPTH").unwrap(), Variable::Depth);
        assert_eq!(Variable::resolve("depth").unwrap(), Variable::Depth);
        assert_eq!(
            Variable::resolve("Percent_Filled").unwrap(),
            Variable::PercentFilled
        );
        assert_eq!(Variable::resolve("Elevation").unwrap(), Variable::Elevation);
    }

    #[test]
    fn test_resolve_unknown() {
        let err = Variable::resolve("sea_surface__no_such_thing").unwrap_err();
        assert!(matches!(err, DmError::UnknownVariable { .. }));
    }

    #[test]
    fn test_standard_names_are_case_sensitive() {
        assert!(Variable::resolve("SEA_SURFACE_WATER_WAVE__HEIGHT").is_err());
    }

    #[test]
    fn test_name_resolve_roundtrip() {
        for &var in ALL_VARIABLES {
            assert_eq!(Variable::resolve(var.name()).unwrap(), var);
        }
    }

    #[test]
    fn test_metadata() {
        assert_eq!(Variable::WaveHeight.units(), "meters");
        assert_eq!(Variable::WaveAngle.units(), "radians");
        assert_eq!(Variable::Depth.grid(), GridId::Window);
        assert_eq!(Variable::SedimentFluxGrid.grid(), GridId::Full);
        assert_eq!(Variable::WaveHeight.grid().rank(), 0);
        assert_eq!(Variable::Depth.grid().rank(), 2);
        assert_eq!(Variable::Depth.var_type(), "double");
        assert_eq!(Variable::Depth.itemsize(), 8);
    }

    #[test]
    fn test_access_flags() {
        assert!(Variable::WaveHeight.is_input());
        assert!(Variable::WaveHeight.is_output());
        assert!(Variable::AngleHighness.is_input());
        assert!(!Variable::AngleHighness.is_output());
        assert!(!Variable::Depth.is_input());
        assert!(Variable::Depth.is_output());
        assert!(Variable::SedimentFluxGrid.is_input());
        assert!(!Variable::SedimentFluxGrid.is_output());
    }

    #[test]
    fn test_name_tables_resolve() {
        for name in INPUT_VAR_NAMES {
            assert!(Variable::resolve(name).unwrap().is_input());
        }
        for name in OUTPUT_VAR_NAMES {
            assert!(Variable::resolve(name).unwrap().is_output());
        }
    }

    #[test]
    fn test_grid_type_strings() {
        assert_eq!(GridId::Scalar.grid_type(), "scalar");
        assert_eq!(GridId::Window.grid_type(), "uniform_rectilinear");
    }
}
