//! 跨页面消息定义
//! 设置面板到内容脚本的单向通知，线格式为既定契约：
//! `{"type":"settingsUpdated","settings":{"country":"US","showRemote":true}}`

use serde::{Deserialize, Serialize};

use super::model::Settings;
use crate::error::RsjResult;

/// 运行时消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuntimeMessage {
    #[serde(rename = "settingsUpdated")]
    SettingsUpdated { settings: Settings },
}

/// 消息发送端特质（设置面板侧）
/// 宿主负责把消息投递到当前活动页面的内容脚本实例
pub trait MessageSender {
    fn send(&mut self, message: &RuntimeMessage) -> RsjResult<()>;
}
