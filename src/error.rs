//! 全局错误类型定义
use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum RsjobfilterError {
    // 规则相关错误
    #[error("规则表缺失国家代码：{0}")]
    RuleNotFound(String),
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),
    #[error("规则编译失败：{0}")]
    RuleCompileError(String),

    // 设置相关错误
    #[error("无效国家代码：{0}")]
    InvalidCountryCode(String),
    #[error("设置读取失败：{0}")]
    SettingsLoadError(String),
    #[error("设置保存失败：{0}")]
    SettingsSaveError(String),
    #[error("跨页面消息发送失败：{0}")]
    MessageSendError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

// 全局Result类型
pub type RsjResult<T> = Result<T, RsjobfilterError>;
