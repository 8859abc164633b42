//! 设置面板
//! 浏览器弹出页的本地逻辑：读取持久化设置渲染控件，用户改动即保存，
//! 保存后短暂显示“已保存”状态并向活动页面广播设置更新消息

use crate::config::GlobalConfig;
use crate::rule::CountryCode;
use crate::scheduler::{ScheduledTask, Scheduler, TimerId};
use crate::settings::{
    load_or_default, MessageSender, RuntimeMessage, Settings, SettingsStore,
};

/// 设置面板
pub struct SettingsPanel<St: SettingsStore, M: MessageSender, S: Scheduler> {
    store: St,
    sender: M,
    scheduler: S,
    settings: Settings,
    status_visible: bool,
    // “已保存”状态的在途隐藏定时器
    status_timer: Option<TimerId>,
    config: GlobalConfig,
}

impl<St: SettingsStore, M: MessageSender, S: Scheduler> SettingsPanel<St, M, S> {
    /// 打开面板：读取持久化设置，失败时降级为默认值
    pub fn open(store: St, sender: M, scheduler: S, config: GlobalConfig) -> Self {
        let settings = load_or_default(&store);
        Self {
            store,
            sender,
            scheduler,
            settings,
            status_visible: false,
            status_timer: None,
            config,
        }
    }

    /// 当前控件状态
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_status_visible(&self) -> bool {
        self.status_visible
    }

    /// 国家下拉框变更
    pub fn set_country(&mut self, country: CountryCode) {
        self.settings.country = country;
        self.save_settings();
    }

    /// 远程开关变更
    pub fn set_show_remote(&mut self, show_remote: bool) {
        self.settings.show_remote = show_remote;
        self.save_settings();
    }

    /// 保存当前设置：持久化、显示状态、广播消息
    /// 持久化失败时记录错误并跳过广播，面板内状态仍保持用户的选择
    fn save_settings(&mut self) {
        if let Err(err) = self.store.save(&self.settings) {
            log::error!("设置保存失败: {}", err);
            return;
        }

        // 1. 显示“已保存”，重置在途隐藏定时器
        self.status_visible = true;
        if let Some(timer) = self.status_timer.take() {
            self.scheduler.clear_timeout(timer);
        }
        self.status_timer = Some(self.scheduler.set_timeout(
            self.config.status_display_ms,
            ScheduledTask::HideSavedStatus,
        ));

        // 2. 通知活动页面；无接收方不算错误（页面可能未注入脚本）
        let message = RuntimeMessage::SettingsUpdated {
            settings: self.settings,
        };
        if let Err(err) = self.sender.send(&message) {
            log::debug!("设置消息未送达: {}", err);
        }
    }

    /// 定时任务分发
    pub fn run_task(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::HideSavedStatus => {
                self.status_timer = None;
                self.status_visible = false;
            }
            other => {
                log::debug!("忽略非面板任务：{:?}", other);
            }
        }
    }
}
