// crates/dm_bmi/src/model.rs

//! 模型门面
//!
//! 把 [`GridStore`]、[`RiverSystem`]、[`StepController`] 和
//! [`WaveClimate`] 组合成标准化的步进/查询/更新接口。物理内核以
//! `Box<dyn MorphologyKernel>` 注入，本层从不触碰其内部。
//!
//! 所有时间参数单位为天；内部一个模型步 = 固定的 `day_per_step` 天。

use std::path::Path;

use dm_engine::{
    ActiveWindow, GridStore, MorphologyKernel, RiverSystem, StepController, WaveClimate,
};
use dm_foundation::error::{DmError, DmResult};
use dm_foundation::grid::GridShape;
use dm_foundation::ensure;

use crate::config::ModelConfig;
use crate::vars::{GridId, Variable};

/// 组件名称
pub const COMPONENT_NAME: &str = "deltamorph";

/// 时间单位（天）
pub const TIME_UNITS: &str = "d";

/// 取值/设值的载荷
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 标量
    Scalar(f64),
    /// 网格数组（行主序，坐标系由交换量的网格编号决定）
    Grid(Vec<f64>),
}

impl Value {
    /// 期望标量，否则报形状错误
    fn expect_scalar(&self) -> DmResult<f64> {
        match self {
            Value::Scalar(v) => Ok(*v),
            Value::Grid(g) => Err(DmError::shape_mismatch("标量交换量", 1, g.len())),
        }
    }

    /// 期望网格，否则报形状错误
    fn expect_grid(&self) -> DmResult<&[f64]> {
        match self {
            Value::Grid(g) => Ok(g),
            Value::Scalar(_) => Err(DmError::invalid_input(
                "网格交换量需要数组载荷".to_string(),
            )),
        }
    }
}

/// 耦合模型句柄
pub struct DeltaModel {
    config: ModelConfig,
    store: GridStore,
    rivers: Option<RiverSystem>,
    stepper: StepController,
    waves: WaveClimate,
    kernel: Box<dyn MorphologyKernel>,
    initialized: bool,
}

impl DeltaModel {
    /// 创建未初始化的模型
    pub fn new(kernel: Box<dyn MorphologyKernel>) -> Self {
        let config = ModelConfig::default();
        // 默认步长为常量 1.0，构造不可失败
        let stepper = StepController::new(config.day_per_step).expect("默认步长有效");
        Self {
            config,
            store: GridStore::new(),
            rivers: None,
            stepper,
            waves: WaveClimate::default(),
            kernel,
            initialized: false,
        }
    }

    /// 初始化：读取（可选的）初始化文件并建立运行状态
    ///
    /// 已初始化的句柄上再次调用返回 [`DmError::AlreadyInitialized`]。
    pub fn initialize(&mut self, config_file: Option<&Path>) -> DmResult<()> {
        ensure!(!self.initialized, DmError::AlreadyInitialized);

        let config = ModelConfig::from_file(config_file)?;
        self.waves = WaveClimate::new(
            config.wave_height,
            config.wave_period,
            config.angle_highness,
            config.angle_asymmetry,
        )?;
        self.stepper = StepController::new(config.day_per_step)?;
        self.store.set_cell_width(config.cell_width)?;
        tracing::info!(
            end_time = config.end_time,
            day_per_step = config.day_per_step,
            "设定结束时间"
        );
        self.config = config;
        self.initialized = true;
        Ok(())
    }

    /// 结束运行：释放网格并回到未初始化状态
    ///
    /// 幂等：重复调用无副作用。
    pub fn finalize(&mut self) {
        self.store.release();
        self.rivers = None;
        self.initialized = false;
    }

    /// 是否已初始化
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ===== 网格建立 =====

    /// 设置网格形状并分配状态数组
    ///
    /// 已分配时为静默无操作（刻意的幂等语义）。同时建立河流系统：
    /// 容量 = 单元总数，入流列默认取 `ny_full / 2`。
    pub fn set_grid_shape(&mut self, nx: usize, ny_full: usize) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        if self.store.is_allocated() {
            return self.store.allocate(nx, ny_full);
        }
        self.store.allocate(nx, ny_full)?;
        let shape = self.store.shape();
        self.rivers = Some(RiverSystem::new(shape.len(), shape.ny_full() / 2)?);
        Ok(())
    }

    /// 设置单元宽度 [m]
    pub fn set_cell_width(&mut self, dx: f64) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        self.config.cell_width = dx;
        self.store.set_cell_width(dx)
    }

    /// 播种初始水深（行主序，全网格大小）
    pub fn seed_depth(&mut self, values: &[f64]) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        self.store.seed_depth(values)
    }

    // ===== 时间推进 =====

    /// 推进一个完整模型步
    pub fn update(&mut self) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        self.stepper
            .advance_one_step(self.kernel.as_mut(), &mut self.store, &mut self.waves)
    }

    /// 推进到目标时间 [d]
    pub fn update_until(&mut self, target_day: f64) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        self.stepper.advance_to(
            self.kernel.as_mut(),
            &mut self.store,
            &mut self.waves,
            target_day,
        )
    }

    /// 推进一个步长的分数倍
    pub fn update_frac(&mut self, fraction: f64) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        self.stepper.advance_fraction(
            self.kernel.as_mut(),
            &mut self.store,
            &mut self.waves,
            fraction,
        )
    }

    // ===== 时间查询 =====

    /// 起始时间 [d]
    #[inline]
    pub fn start_time(&self) -> f64 {
        0.0
    }

    /// 结束时间 [d]
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.config.end_time
    }

    /// 当前时间 [d]
    #[inline]
    pub fn current_time(&self) -> f64 {
        self.stepper.current_time()
    }

    /// 单步时长 [d]
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.stepper.time_step()
    }

    /// 时间单位
    #[inline]
    pub fn time_units(&self) -> &'static str {
        TIME_UNITS
    }

    /// 组件名称
    #[inline]
    pub fn component_name(&self) -> &'static str {
        COMPONENT_NAME
    }

    // ===== 取值 / 设值 =====

    /// 读取交换量
    pub fn get_value(&self, name: &str) -> DmResult<Value> {
        ensure!(self.initialized, DmError::NotInitialized);
        let var = Variable::resolve(name)?;
        ensure!(
            var.is_output(),
            DmError::invalid_input(format!("交换量 {} 不可读取", var.name()))
        );

        let value = match var {
            Variable::WaveHeight => Value::Scalar(self.waves.height()),
            Variable::WavePeriod => Value::Scalar(self.waves.period()),
            Variable::WaveAngle => Value::Scalar(self.waves.angle()),
            Variable::WaveAngleMin => Value::Scalar(self.waves.angle_min()),
            Variable::WaveAngleMean => Value::Scalar(self.waves.angle_mean()),
            Variable::WaveAngleMax => Value::Scalar(self.waves.angle_max()),
            Variable::Depth => Value::Grid(self.window()?.extract(&self.store.depth)?),
            Variable::PercentFilled => {
                Value::Grid(self.window()?.extract(&self.store.percent_full)?)
            }
            Variable::Elevation => {
                Value::Grid(self.window()?.extract_map(&self.store.depth, |d| -d)?)
            }
            // is_output 已排除
            Variable::AngleHighness | Variable::AngleAsymmetry | Variable::SedimentFluxGrid => {
                unreachable!()
            }
        };
        Ok(value)
    }

    /// 写入交换量
    ///
    /// 未注册的名称返回 [`DmError::UnknownVariable`]，状态不变；
    /// 只读交换量返回 [`DmError::InvalidInput`]。
    pub fn set_value(&mut self, name: &str, value: &Value) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        let var = Variable::resolve(name)?;
        match var {
            Variable::WaveHeight => self.waves.set_height(value.expect_scalar()?),
            Variable::WavePeriod => self.waves.set_period(value.expect_scalar()?),
            Variable::AngleHighness => self.waves.set_angle_highness(value.expect_scalar()?),
            Variable::AngleAsymmetry => self.waves.set_angle_asymmetry(value.expect_scalar()?),
            Variable::SedimentFluxGrid => {
                let shape = self.allocated_shape()?;
                let rivers = self.rivers.as_mut().ok_or(DmError::NotInitialized)?;
                rivers.set_flux_grid(value.expect_grid()?, &shape)
            }
            _ => Err(DmError::invalid_input(format!(
                "交换量 {} 只读",
                var.name()
            ))),
        }
    }

    // ===== 网格元数据 =====

    /// 交换量所在网格编号
    pub fn var_grid(&self, name: &str) -> DmResult<GridId> {
        Ok(Variable::resolve(name)?.grid())
    }

    /// 交换量类型字符串
    pub fn var_type(&self, name: &str) -> DmResult<&'static str> {
        Ok(Variable::resolve(name)?.var_type())
    }

    /// 交换量单位字符串
    pub fn var_units(&self, name: &str) -> DmResult<&'static str> {
        Ok(Variable::resolve(name)?.units())
    }

    /// 交换量单元素字节数
    pub fn var_itemsize(&self, name: &str) -> DmResult<usize> {
        Ok(Variable::resolve(name)?.itemsize())
    }

    /// 交换量总字节数（= itemsize × 网格大小）
    pub fn var_nbytes(&self, name: &str) -> DmResult<usize> {
        let var = Variable::resolve(name)?;
        Ok(var.itemsize() * self.grid_size(var.grid())?)
    }

    /// 网格秩
    pub fn grid_rank(&self, grid: GridId) -> usize {
        grid.rank()
    }

    /// 网格类型字符串
    pub fn grid_type(&self, grid: GridId) -> &'static str {
        grid.grid_type()
    }

    /// 网格维度 `[高, 宽, 1]`（标量网格为 `[1, 1, 1]`）
    pub fn grid_dimen(&self, grid: GridId) -> DmResult<[usize; 3]> {
        match grid {
            GridId::Scalar => Ok([1, 1, 1]),
            GridId::Window => {
                let shape = self.allocated_shape()?;
                Ok([shape.window_height(), shape.nx(), 1])
            }
            GridId::Full => {
                let shape = self.allocated_shape()?;
                Ok([shape.ny_full(), shape.nx(), 1])
            }
        }
    }

    /// 网格大小（单元总数）
    pub fn grid_size(&self, grid: GridId) -> DmResult<usize> {
        let dimen = self.grid_dimen(grid)?;
        Ok(dimen[0] * dimen[1] * dimen[2])
    }

    /// 网格分辨率 `[dy, dx, 1]`
    pub fn grid_resolution(&self, grid: GridId) -> DmResult<[f64; 3]> {
        match grid {
            GridId::Scalar => Ok([1.0, 1.0, 1.0]),
            GridId::Window | GridId::Full => Ok(self.window()?.resolution()),
        }
    }

    // ===== 河流操作 =====

    /// 定位第 `n` 条河的河口
    pub fn find_river_mouth(&mut self, n: usize) -> DmResult<(usize, usize)> {
        ensure!(self.initialized, DmError::NotInitialized);
        let rivers = self.rivers.as_mut().ok_or(DmError::NotInitialized)?;
        rivers.find_mouth(&self.store, n)
    }

    /// 改道第 `n` 条河并返回单点通量脉冲（窗口坐标系）
    pub fn avulse(&mut self, n: usize, flux: f64) -> DmResult<Vec<f64>> {
        ensure!(self.initialized, DmError::NotInitialized);
        let rivers = self.rivers.as_mut().ok_or(DmError::NotInitialized)?;
        rivers.avulse(&self.store, n, flux)
    }

    /// 设置第 `n` 条河的河口位置
    pub fn set_river_position(&mut self, n: usize, x: usize, y: usize) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        let shape = self.allocated_shape()?;
        let rivers = self.rivers.as_mut().ok_or(DmError::NotInitialized)?;
        rivers.set_mouth(n, x, y, &shape)
    }

    /// 设置第 `n` 条河的输沙通量 [kg/s]
    pub fn set_river_flux(&mut self, n: usize, flux: f64) -> DmResult<()> {
        ensure!(self.initialized, DmError::NotInitialized);
        let rivers = self.rivers.as_mut().ok_or(DmError::NotInitialized)?;
        rivers.set_flux(n, flux)
    }

    /// 河流系统（只读）
    pub fn rivers(&self) -> Option<&RiverSystem> {
        self.rivers.as_ref()
    }

    /// 状态网格（只读）
    pub fn store(&self) -> &GridStore {
        &self.store
    }

    // ===== 内部辅助 =====

    fn allocated_shape(&self) -> DmResult<GridShape> {
        ensure!(self.store.is_allocated(), DmError::NotInitialized);
        Ok(self.store.shape())
    }

    fn window(&self) -> DmResult<ActiveWindow> {
        ensure!(self.store.is_allocated(), DmError::NotInitialized);
        Ok(self.store.window())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::{NAME_DEPTH, NAME_ELEVATION, NAME_WAVE_HEIGHT, NAME_SEDIMENT_FLUX};
    use dm_engine::IdleKernel;

    fn initialized_model() -> DeltaModel {
        let mut model = DeltaModel::new(Box::new(IdleKernel));
        model.initialize(None).unwrap();
        model
    }

    /// 4×8 网格、默认配置的就绪模型
    fn gridded_model() -> DeltaModel {
        let mut model = initialized_model();
        model.set_grid_shape(4, 8).unwrap();
        model
    }

    #[test]
    fn test_initialize_defaults() {
        let model = initialized_model();
        assert!((model.end_time() - 20.0).abs() < 1e-10);
        assert!((model.time_step() - 1.0).abs() < 1e-10);
        assert!((model.start_time() - 0.0).abs() < 1e-10);
        assert_eq!(model.time_units(), "d");
        assert_eq!(model.component_name(), "deltamorph");
    }

    #[test]
    fn test_initialize_twice_fails() {
        let mut model = initialized_model();
        assert!(matches!(
            model.initialize(None),
            Err(DmError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_uninitialized_operations_fail() {
        let mut model = DeltaModel::new(Box::new(IdleKernel));
        assert!(matches!(model.update(), Err(DmError::NotInitialized)));
        assert!(matches!(
            model.get_value(NAME_WAVE_HEIGHT),
            Err(DmError::NotInitialized)
        ));
        assert!(matches!(
            model.set_grid_shape(4, 8),
            Err(DmError::NotInitialized)
        ));
    }

    #[test]
    fn test_default_wave_height_example() {
        // 4×8 网格（窗口高 4），无文件初始化 -> 默认值生效
        let model = gridded_model();
        let value = model.get_value(NAME_WAVE_HEIGHT).unwrap();
        assert_eq!(value, Value::Scalar(2.0));
    }

    #[test]
    fn test_set_value_unknown_name_leaves_state() {
        let mut model = gridded_model();
        let err = model
            .set_value("sea_surface__bogus", &Value::Scalar(1.0))
            .unwrap_err();
        assert!(matches!(err, DmError::UnknownVariable { .. }));
        // 状态不变
        assert_eq!(
            model.get_value(NAME_WAVE_HEIGHT).unwrap(),
            Value::Scalar(2.0)
        );
    }

    #[test]
    fn test_set_value_read_only_rejected() {
        let mut model = gridded_model();
        assert!(matches!(
            model.set_value(NAME_DEPTH, &Value::Scalar(1.0)),
            Err(DmError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_set_and_get_wave_scalar() {
        let mut model = gridded_model();
        model
            .set_value(NAME_WAVE_HEIGHT, &Value::Scalar(3.25))
            .unwrap();
        assert_eq!(
            model.get_value(NAME_WAVE_HEIGHT).unwrap(),
            Value::Scalar(3.25)
        );
    }

    /// 整步把播种的初始水深拷入当前水深的测试内核
    struct SeedCopyKernel;

    impl MorphologyKernel for SeedCopyKernel {
        fn advance_step(
            &mut self,
            store: &mut dm_engine::GridStore,
            _waves: &mut dm_engine::WaveClimate,
        ) -> DmResult<()> {
            let init = store.init_depth.clone();
            store.depth.copy_from_slice(&init);
            Ok(())
        }

        fn advance_fraction(
            &mut self,
            _store: &mut dm_engine::GridStore,
            _waves: &mut dm_engine::WaveClimate,
            _fraction: f64,
        ) -> DmResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_depth_and_elevation_windows() {
        let mut model = DeltaModel::new(Box::new(SeedCopyKernel));
        model.initialize(None).unwrap();
        model.set_grid_shape(4, 8).unwrap();

        // 播种按 x*100 + y 打标的水深并让内核拷入当前水深
        let shape = model.store().shape();
        let mut z = vec![0.0; shape.len()];
        for x in 0..shape.nx() {
            for y in 0..shape.ny_full() {
                z[shape.offset(x, y)] = (x * 100 + y) as f64;
            }
        }
        model.seed_depth(&z).unwrap();
        model.update().unwrap();

        let depth = match model.get_value(NAME_DEPTH).unwrap() {
            Value::Grid(g) => g,
            _ => panic!("期望网格载荷"),
        };
        let elev = match model.get_value(NAME_ELEVATION).unwrap() {
            Value::Grid(g) => g,
            _ => panic!("期望网格载荷"),
        };

        // 窗口为 y ∈ [2, 6)，x 主序；首行应为 2, 3, 4, 5
        assert_eq!(depth.len(), 16);
        assert_eq!(&depth[..4], &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(&depth[4..8], &[102.0, 103.0, 104.0, 105.0]);

        // 高程 = 负水深
        assert_eq!(elev.len(), 16);
        for (d, e) in depth.iter().zip(elev.iter()) {
            assert!((d + e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flux_grid_to_rivers() {
        let mut model = gridded_model();
        let shape = model.store().shape();
        let mut qs = vec![0.0; shape.len()];
        qs[shape.offset(2, 5)] = 4.5;

        model
            .set_value(NAME_SEDIMENT_FLUX, &Value::Grid(qs))
            .unwrap();
        let rivers = model.rivers().unwrap();
        assert_eq!(rivers.n_rivers(), 1);
        assert_eq!(rivers.mouths()[0].x, 2);
        assert_eq!(rivers.mouths()[0].y, 5);
        assert!((rivers.mouths()[0].flux - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_update_until_time_accounting() {
        let mut model = gridded_model();
        model.update_until(2.5).unwrap();
        // 分数步不推进整步计数
        assert!((model.current_time() - 2.0).abs() < 1e-12);
        model.update().unwrap();
        assert!((model.current_time() - 3.0).abs() < 1e-12);
        model.update_frac(0.25).unwrap();
        assert!((model.current_time() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_metadata() {
        let model = gridded_model();
        assert_eq!(model.grid_dimen(GridId::Window).unwrap(), [4, 4, 1]);
        assert_eq!(model.grid_dimen(GridId::Full).unwrap(), [8, 4, 1]);
        assert_eq!(model.grid_dimen(GridId::Scalar).unwrap(), [1, 1, 1]);
        assert_eq!(model.grid_size(GridId::Window).unwrap(), 16);
        assert_eq!(model.grid_size(GridId::Full).unwrap(), 32);
        assert_eq!(model.grid_rank(GridId::Scalar), 0);
        assert_eq!(model.grid_rank(GridId::Window), 2);

        let res = model.grid_resolution(GridId::Window).unwrap();
        assert_eq!(res, [100.0, 100.0, 1.0]);

        assert_eq!(model.var_nbytes(NAME_WAVE_HEIGHT).unwrap(), 8);
        assert_eq!(model.var_nbytes(NAME_DEPTH).unwrap(), 16 * 8);
        assert_eq!(model.var_units(NAME_DEPTH).unwrap(), "meters");
        assert_eq!(model.var_type(NAME_DEPTH).unwrap(), "double");
        assert_eq!(model.var_grid(NAME_DEPTH).unwrap(), GridId::Window);
    }

    #[test]
    fn test_grid_reinit_is_noop() {
        let mut model = gridded_model();
        model.set_grid_shape(10, 20).unwrap();
        assert_eq!(model.store().shape().nx(), 4);
        // 河流系统保持原容量
        assert_eq!(model.rivers().unwrap().capacity(), 32);
    }

    #[test]
    fn test_river_glue() {
        let mut model = gridded_model();
        model.set_river_position(0, 1, 5).unwrap();
        model.set_river_flux(0, 2.0).unwrap();
        let mouths = model.rivers().unwrap().mouths();
        assert_eq!((mouths[0].x, mouths[0].y), (1, 5));

        // 入流列默认在域中心（y = 4），列首单元非滩 -> 河口 (0, 4)
        let (x, y) = model.find_river_mouth(0).unwrap();
        assert_eq!((x, y), (0, 4));

        // 河口 (0, 4) 重心化到窗口坐标 y' = 2
        let qs = model.avulse(0, 6.0).unwrap();
        assert_eq!(qs.len(), 16);
        assert!((qs[2] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_finalize_idempotent() {
        let mut model = gridded_model();
        model.finalize();
        assert!(!model.is_initialized());
        assert!(model.rivers().is_none());
        model.finalize();

        // finalize 后可重新初始化
        model.initialize(None).unwrap();
        model.set_grid_shape(2, 4).unwrap();
        assert_eq!(model.store().shape().len(), 8);
    }

    #[test]
    fn test_grid_values_before_shape_fail() {
        let model = initialized_model();
        assert!(matches!(
            model.get_value(NAME_DEPTH),
            Err(DmError::NotInitialized)
        ));
        assert!(matches!(
            model.grid_dimen(GridId::Window),
            Err(DmError::NotInitialized)
        ));
    }
}
