//! 规则数据模型定义
//! 仅存储规则数据，无任何业务逻辑

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::RsjobfilterError;

/// 支持的国家/地区代码
/// 与持久化设置中的两字母字符串形式一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CountryCode {
    #[default]
    US, // 美国
    CA, // 加拿大
    UK, // 英国
    AU, // 澳大利亚
    NZ, // 新西兰
    EU, // 欧盟
}

impl CountryCode {
    /// 全部受支持的代码（规则表与测试遍历用）
    pub const ALL: [CountryCode; 6] = [
        CountryCode::US,
        CountryCode::CA,
        CountryCode::UK,
        CountryCode::AU,
        CountryCode::NZ,
        CountryCode::EU,
    ];

    /// 两字母字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::US => "US",
            CountryCode::CA => "CA",
            CountryCode::UK => "UK",
            CountryCode::AU => "AU",
            CountryCode::NZ => "NZ",
            CountryCode::EU => "EU",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = RsjobfilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "US" => Ok(CountryCode::US),
            "CA" => Ok(CountryCode::CA),
            "UK" => Ok(CountryCode::UK),
            "AU" => Ok(CountryCode::AU),
            "NZ" => Ok(CountryCode::NZ),
            "EU" => Ok(CountryCode::EU),
            other => Err(RsjobfilterError::InvalidCountryCode(other.to_string())),
        }
    }
}

/// 单个国家的地域规则
/// allowed - 用户自身地区的同义短语（首项用于横幅文案）
/// filter - 需要过滤的其他地区短语（地名/城市/称谓）
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRule {
    pub allowed: Vec<&'static str>,
    pub filter: Vec<&'static str>,
}

impl LocationRule {
    /// 横幅文案使用的首选地区标签
    pub fn display_label(&self) -> &'static str {
        self.allowed.first().copied().unwrap_or("your region")
    }
}
