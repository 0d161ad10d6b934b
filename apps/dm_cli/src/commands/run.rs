// apps/dm_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 用空置内核演示完整的耦合生命周期：初始化、建网格、播种水深、
//! 按输出间隔推进到结束时间并报告窗口统计。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use dm_bmi::vars::NAME_DEPTH;
use dm_bmi::{DeltaModel, Value};
use dm_engine::IdleKernel;

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 初始化文件路径（缺省或不存在时使用内置默认值）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// nx 轴网格数
    #[arg(long, default_value = "50")]
    pub nx: usize,

    /// ny 轴网格数（全宽，奇数向下取整为偶数）
    #[arg(long, default_value = "120")]
    pub ny: usize,

    /// 单元宽度 [m]
    #[arg(long, default_value = "100.0")]
    pub cell_width: f64,

    /// 初始水深 [m]（均匀播种）
    #[arg(long, default_value = "10.0")]
    pub initial_depth: f64,

    /// 输出间隔 [d]
    #[arg(long, default_value = "5.0")]
    pub output_interval: f64,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== DeltaMorph 模拟启动 ===");

    let mut model = DeltaModel::new(Box::new(IdleKernel));
    model
        .initialize(args.config.as_deref())
        .context("初始化失败")?;
    model
        .set_grid_shape(args.nx, args.ny)
        .context("网格分配失败")?;
    model.set_cell_width(args.cell_width)?;

    let n_cells = model.store().shape().len();
    model
        .seed_depth(&vec![args.initial_depth; n_cells])
        .context("播种初始水深失败")?;

    info!(
        "网格: {} x {} 单元, 间距 {} m",
        args.nx,
        model.store().shape().ny_full(),
        args.cell_width
    );
    info!(
        "时间: 结束 {} d, 步长 {} d",
        model.end_time(),
        model.time_step()
    );

    anyhow::ensure!(args.output_interval > 0.0, "输出间隔必须为正");

    let start = Instant::now();
    let end_time = model.end_time();
    let mut next_output = args.output_interval.max(model.time_step());

    // 整步计数只随完整步推进，以 target 判断循环终止
    loop {
        let target = next_output.min(end_time);
        model
            .update_until(target)
            .with_context(|| format!("推进到 {target} d 失败"))?;

        if let Value::Grid(depth) = model.get_value(NAME_DEPTH)? {
            let d_max = depth.iter().cloned().fold(f64::MIN, f64::max);
            let d_min = depth.iter().cloned().fold(f64::MAX, f64::min);
            info!(
                "t={:.2} d: 窗口水深 min={:.3} m, max={:.3} m, 河流数={}",
                model.current_time(),
                d_min,
                d_max,
                model.rivers().map_or(0, |r| r.n_rivers())
            );
        }

        if target >= end_time {
            break;
        }
        next_output += args.output_interval;
    }

    let elapsed = start.elapsed();
    info!("=== 模拟完成 ===");
    info!("模型时间: {:.2} d", model.current_time());
    info!("计算耗时: {:.3} s", elapsed.as_secs_f64());

    model.finalize();
    Ok(())
}
