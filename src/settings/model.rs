//! 设置数据模型
//! 持久化存储键为既定契约（country / showRemote），不可变更

use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::rule::CountryCode;

/// 运行时设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub country: CountryCode,
    pub show_remote: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            country: CountryCode::US,
            show_remote: true,
        }
    }
}

/// 持久化存储中的原始设置
/// 两个键各自可缺失（首次安装/部分写入），读取时逐键并入默认值；
/// 国家字符串非法时同样回退默认并告警
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_remote: Option<bool>,
}

impl PersistedSettings {
    /// 逐键并入默认值，得到完整运行时设置
    pub fn merge_with_defaults(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(raw) = &self.country {
            match CountryCode::from_str(raw) {
                Ok(code) => settings.country = code,
                Err(e) => log::warn!("持久化国家代码非法，保持默认值：{}", e),
            }
        }
        if let Some(show_remote) = self.show_remote {
            settings.show_remote = show_remote;
        }

        settings
    }
}

impl From<Settings> for PersistedSettings {
    fn from(settings: Settings) -> Self {
        Self {
            country: Some(settings.country.to_string()),
            show_remote: Some(settings.show_remote),
        }
    }
}
