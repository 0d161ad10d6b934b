// crates/dm_bmi/src/lib.rs

//! DeltaMorph 接口层
//!
//! 把引擎层包装成标准化的步进/查询/更新耦合接口，供外部驱动器或
//! 耦合框架消费。
//!
//! # 模块概览
//!
//! - [`config`]: 运行配置与传统初始化文件解析
//! - [`vars`]: 交换量注册表（封闭枚举 + 元数据）
//! - [`model`]: 模型门面（生命周期、取值/设值、网格元数据）
//!
//! # 生命周期
//!
//! ```text
//! new -> initialize -> set_grid_shape/set_cell_width/seed_depth
//!     -> update / update_until / update_frac -> finalize
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod model;
pub mod vars;

// 重导出常用类型
pub use config::ModelConfig;
pub use model::{DeltaModel, Value};
pub use vars::{GridId, Variable, INPUT_VAR_NAMES, OUTPUT_VAR_NAMES};
