// crates/dm_bmi/src/config.rs

//! 运行配置
//!
//! 支持从传统的纯文本初始化文件读取：一行五个逗号分隔的实数，
//! 固定顺序为
//!
//! ```text
//! end_time, wave_height, wave_period, angle_highness, angle_asymmetry
//! ```
//!
//! 文件缺失不是错误（使用内置默认值）；文件存在但解析出的数值
//! 少于 5 个是硬初始化失败。多余的数值被忽略。

use std::path::Path;

use serde::{Deserialize, Serialize};

use dm_foundation::error::{DmError, DmResult};

/// 模型运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 结束时间 [d]
    pub end_time: f64,
    /// 波高 [m]
    pub wave_height: f64,
    /// 波周期 [s]
    pub wave_period: f64,
    /// 来波角高角占比参数
    pub angle_highness: f64,
    /// 来波角不对称参数
    pub angle_asymmetry: f64,
    /// 步日换算因子 [d/步]（不在初始化文件中）
    pub day_per_step: f64,
    /// 单元宽度 [m]（不在初始化文件中）
    pub cell_width: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            end_time: 20.0,
            wave_height: 2.0,
            wave_period: 7.0,
            angle_highness: 0.2,
            angle_asymmetry: 0.5,
            day_per_step: 1.0,
            cell_width: 100.0,
        }
    }
}

impl ModelConfig {
    /// 从可选的初始化文件读取配置
    ///
    /// `None` 或文件不存在时返回默认配置；文件不可读或数值不足
    /// 5 个时返回 [`DmError::Config`]。
    pub fn from_file(path: Option<&Path>) -> DmResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "初始化文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|err| {
            DmError::config(format!("无法读取初始化文件 {}: {err}", path.display()))
        })?;
        Self::parse(&text)
    }

    /// 解析初始化文件内容
    pub fn parse(text: &str) -> DmResult<Self> {
        let values: Vec<f64> = text
            .split(',')
            .map(str::trim)
            .take_while(|tok| !tok.is_empty())
            .map_while(|tok| tok.parse::<f64>().ok())
            .collect();

        if values.len() < 5 {
            return Err(DmError::config(format!(
                "初始化文件需要 5 个数值，只解析到 {}",
                values.len()
            )));
        }

        Ok(Self {
            end_time: values[0],
            wave_height: values[1],
            wave_period: values[2],
            angle_highness: values[3],
            angle_asymmetry: values[4],
            ..Self::default()
        })
    }
}
