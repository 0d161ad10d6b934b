// apps/dm_cli/src/commands/info.rs

//! 显示交换量与网格信息命令

use anyhow::{Context, Result};
use clap::Args;

use dm_bmi::vars::ALL_VARIABLES;
use dm_bmi::{DeltaModel, GridId};
use dm_engine::IdleKernel;

/// 信息命令参数
#[derive(Args)]
pub struct InfoArgs {
    /// nx 轴网格数（用于展示网格元数据）
    #[arg(long, default_value = "50")]
    pub nx: usize,

    /// ny 轴网格数（全宽）
    #[arg(long, default_value = "120")]
    pub ny: usize,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let mut model = DeltaModel::new(Box::new(IdleKernel));
    model.initialize(None).context("初始化失败")?;
    model
        .set_grid_shape(args.nx, args.ny)
        .context("网格分配失败")?;

    println!("组件: {}", model.component_name());
    println!(
        "时间: 起始 {} {u}, 结束 {} {u}, 步长 {} {u}",
        model.start_time(),
        model.end_time(),
        model.time_step(),
        u = model.time_units()
    );
    println!();

    println!("{:<100} {:>18} {:>8} {:>6}", "交换量", "单位", "类型", "读写");
    for &var in ALL_VARIABLES {
        let access = match (var.is_input(), var.is_output()) {
            (true, true) => "in/out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "-",
        };
        println!(
            "{:<100} {:>18} {:>8} {:>6}",
            var.name(),
            var.units(),
            var.var_type(),
            access
        );
    }
    println!();

    for grid in [GridId::Scalar, GridId::Window, GridId::Full] {
        let dimen = model.grid_dimen(grid)?;
        let res = model.grid_resolution(grid)?;
        println!(
            "网格 {:?}: 类型 {}, 秩 {}, 维度 {:?}, 分辨率 {:?}, 大小 {}",
            grid,
            model.grid_type(grid),
            model.grid_rank(grid),
            dimen,
            res,
            model.grid_size(grid)?
        );
    }

    Ok(())
}
