//! 页面监听订阅
//! 两条独立的帖子发现路径：结构变更监听与滚动安全网。
//! 宿主胶水把原生事件交给对应监听器投递，监听器退订后静默丢弃事件，
//! 页面卸载时宿主显式退订，不依赖析构顺序

use crate::dom::{DomHost, NodeId, ViewportObserver};
use crate::scheduler::Scheduler;

use super::ContentScript;

/// 可退订的事件订阅
pub trait Subscription {
    /// 退订后不再投递事件，幂等
    fn unsubscribe(&mut self);

    fn is_active(&self) -> bool;
}

/// 结构变更监听：新增节点进入帖子发现路径
#[derive(Debug)]
pub struct MutationWatcher {
    active: bool,
}

impl MutationWatcher {
    pub fn new() -> Self {
        Self { active: true }
    }

    /// 投递一批新增节点
    pub fn deliver_added_nodes<D: DomHost, S: Scheduler, V: ViewportObserver>(
        &self,
        script: &mut ContentScript<D, S, V>,
        nodes: &[NodeId],
    ) {
        if !self.active {
            log::debug!("结构变更监听已退订，丢弃 {} 个节点", nodes.len());
            return;
        }
        for &node in nodes {
            script.handle_added_node(node);
        }
    }
}

impl Default for MutationWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription for MutationWatcher {
    fn unsubscribe(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// 滚动监听：虚拟化列表下结构监听的安全网
#[derive(Debug)]
pub struct ScrollWatcher {
    active: bool,
}

impl ScrollWatcher {
    pub fn new() -> Self {
        Self { active: true }
    }

    /// 投递一次滚动事件（防抖在脚本侧进行）
    pub fn deliver_scroll<D: DomHost, S: Scheduler, V: ViewportObserver>(
        &self,
        script: &mut ContentScript<D, S, V>,
    ) {
        if !self.active {
            return;
        }
        script.handle_scroll();
    }
}

impl Default for ScrollWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription for ScrollWatcher {
    fn unsubscribe(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::dom::{MemoryDom, RecordingViewport};
    use crate::scheduler::ManualScheduler;
    use crate::script::DocumentReadyState;
    use crate::settings::MemoryStore;

    fn test_script() -> ContentScript<MemoryDom, ManualScheduler, RecordingViewport> {
        let mut script = ContentScript::new(
            MemoryDom::new(),
            ManualScheduler::new(),
            RecordingViewport::new(),
            &MemoryStore::new(),
            ConfigManager::get_default(),
        );
        script.start(DocumentReadyState::Complete);
        script
    }

    #[test]
    fn test_mutation_watcher_delivers_until_unsubscribed() {
        // 测试场景：活跃时投递新增节点，退订后丢弃
        let mut script = test_script();
        let root = script.dom().root();
        let first = script.dom_mut().add_element(root, "div", &["jobs-job-card"], "");

        let mut watcher = MutationWatcher::new();
        assert!(watcher.is_active());
        watcher.deliver_added_nodes(&mut script, &[first]);
        assert!(script.viewport().is_observed(first));

        watcher.unsubscribe();
        let second = script.dom_mut().add_element(root, "div", &["jobs-job-card"], "");
        watcher.deliver_added_nodes(&mut script, &[second]);
        assert!(!script.viewport().is_observed(second));
    }

    #[test]
    fn test_scroll_watcher_stops_after_unsubscribe() {
        // 测试场景：退订后滚动事件不再触发防抖定时器
        let mut script = test_script();
        let mut watcher = ScrollWatcher::new();

        watcher.deliver_scroll(&mut script);
        assert_eq!(script.scheduler_mut().pending_count(), 1);
        let _ = script.scheduler_mut().drain_pending();

        watcher.unsubscribe();
        watcher.deliver_scroll(&mut script);
        assert_eq!(script.scheduler_mut().pending_count(), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        // 测试场景：重复退订不改变状态
        let mut watcher = MutationWatcher::new();
        watcher.unsubscribe();
        watcher.unsubscribe();
        assert!(!watcher.is_active());
    }
}
