// crates/dm_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `DmError` 枚举和 `DmResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **全量返回**: 所有操作返回显式的成功/失败结果，不抛 panic
//! 2. **易用性**: 提供便捷的构造方法和 `check_*` 校验函数
//! 3. **边界安全**: 越界、容量溢出、时间倒退等调用方错误都有独立变体
//!
//! # 示例
//!
//! ```
//! use dm_foundation::error::{DmError, DmResult};
//!
//! fn read_config() -> DmResult<()> {
//!     Err(DmError::config("配置文件格式错误"))
//! }
//! ```

use thiserror::Error;

/// 统一结果类型
pub type DmResult<T> = Result<T, DmError>;

/// DeltaMorph 错误类型
///
/// 核心错误类型，用于整个项目。外部物理内核的失败通过
/// [`DmError::KernelStep`] 立即向上传播。
#[derive(Error, Debug)]
pub enum DmError {
    /// 配置文件错误（格式损坏或不可读）
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 交换量名称未注册
    #[error("未知交换量: {name}")]
    UnknownVariable {
        /// 请求的名称
        name: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    ShapeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 模型尚未初始化
    #[error("模型尚未初始化")]
    NotInitialized,

    /// 模型已经初始化
    #[error("模型已经初始化")]
    AlreadyInitialized,

    /// 河口搜索扫完整列仍未找到非滩单元
    #[error("未找到河口: 第{column}列全部 {nx} 个单元均为滩")]
    NoRiverMouthFound {
        /// 扫描的列（ny 轴坐标）
        column: usize,
        /// 扫描的单元数（nx 轴长度）
        nx: usize,
    },

    /// 正通量单元数超过河流容量
    #[error("河流数量超限: 找到{found}, 容量{capacity}")]
    TooManyRivers {
        /// 正通量单元数
        found: usize,
        /// 河流列表容量
        capacity: usize,
    },

    /// 外部物理内核单步失败
    #[error("内核第{step}步失败: {message}")]
    KernelStep {
        /// 失败时的整步编号
        step: u64,
        /// 内核报告的失败信息
        message: String,
    },

    /// 网格数组分配失败
    #[error("分配失败: {what} ({len} 个元素)")]
    Allocation {
        /// 数组名称
        what: &'static str,
        /// 请求的元素数
        len: usize,
    },

    /// 推进目标早于当前时间
    #[error("目标时间 {target} d 早于当前时间 {now} d")]
    TimeTargetInPast {
        /// 请求的目标时间 [d]
        target: f64,
        /// 当前模型时间 [d]
        now: f64,
    },

    /// 索引越界
    #[error("索引越界: {what} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        what: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 无效输入
    #[error("无效的输入: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl DmError {
    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 未知交换量
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Self::UnknownVariable { name: name.into() }
    }

    /// 数组大小不匹配
    pub fn shape_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 河口搜索失败
    pub fn no_river_mouth(column: usize, nx: usize) -> Self {
        Self::NoRiverMouthFound { column, nx }
    }

    /// 河流数量超限
    pub fn too_many_rivers(found: usize, capacity: usize) -> Self {
        Self::TooManyRivers { found, capacity }
    }

    /// 内核单步失败
    pub fn kernel_step(step: u64, message: impl Into<String>) -> Self {
        Self::KernelStep {
            step,
            message: message.into(),
        }
    }

    /// 分配失败
    pub fn allocation(what: &'static str, len: usize) -> Self {
        Self::Allocation { what, len }
    }

    /// 索引越界
    pub fn index_out_of_bounds(what: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { what, index, len }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl DmError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> DmResult<()> {
        if expected != actual {
            Err(Self::shape_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(what: &'static str, index: usize, len: usize) -> DmResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(what, index, len))
        } else {
            Ok(())
        }
    }
}

/// 条件校验宏：条件不满足时返回给定错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

// ========================================================================
// 测试
// ========================================================================
