//! 调度抽象：定时器与动画帧回调
//! 单线程协作模型，宿主负责真正的计时；任务到期后由宿主把
//! ScheduledTask 回传给对应页面对象的 run_task 统一分发

use crate::dom::NodeId;

/// 定时器句柄
pub type TimerId = u64;

/// 可调度任务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    // 批次间延迟到期（到期后申请动画帧）
    BatchDelayElapsed,
    // 动画帧回调：处理下一批
    ProcessBatch,
    // 动画帧回调：展示动画起始（淡出遮罩）
    RevealFade(NodeId),
    // 展示动画结束：拆除遮罩与横幅
    RevealTeardown(NodeId),
    // 滚动防抖到期：安全网重扫
    ScrollRescan,
    // 设置面板"已保存"提示隐藏
    HideSavedStatus,
}

/// 调度器特质（宿主 setTimeout / requestAnimationFrame 的抽象）
pub trait Scheduler {
    fn set_timeout(&mut self, delay_ms: u64, task: ScheduledTask) -> TimerId;
    fn clear_timeout(&mut self, timer: TimerId);
    fn request_animation_frame(&mut self, task: ScheduledTask) -> TimerId;
}

/// 挂起任务
#[derive(Debug, Clone)]
struct PendingTask {
    id: TimerId,
    task: ScheduledTask,
    // None 表示动画帧回调
    delay_ms: Option<u64>,
    cancelled: bool,
}

/// 手动驱动的调度器实现（测试与演示用）
/// 任务按登记顺序排队，由调用方显式抽取执行
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Vec<PendingTask>,
    next_id: TimerId,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 抽取全部未取消任务（按登记顺序），清空队列
    pub fn drain_pending(&mut self) -> Vec<ScheduledTask> {
        self.pending
            .drain(..)
            .filter(|pending| !pending.cancelled)
            .map(|pending| pending.task)
            .collect()
    }

    /// 未取消任务数量
    pub fn pending_count(&self) -> usize {
        self.pending.iter().filter(|p| !p.cancelled).count()
    }

    /// 指定任务的登记延迟（断言调度参数用）
    pub fn delay_of(&self, task: ScheduledTask) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| !p.cancelled && p.task == task)
            .and_then(|p| p.delay_ms)
    }

    fn push(&mut self, task: ScheduledTask, delay_ms: Option<u64>) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(PendingTask {
            id,
            task,
            delay_ms,
            cancelled: false,
        });
        id
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&mut self, delay_ms: u64, task: ScheduledTask) -> TimerId {
        self.push(task, Some(delay_ms))
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        if let Some(pending) = self.pending.iter_mut().find(|p| p.id == timer) {
            pending.cancelled = true;
        }
    }

    fn request_animation_frame(&mut self, task: ScheduledTask) -> TimerId {
        self.push(task, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_registration_order() {
        // 测试场景：任务按登记顺序抽取
        let mut scheduler = ManualScheduler::new();
        scheduler.set_timeout(100, ScheduledTask::BatchDelayElapsed);
        scheduler.request_animation_frame(ScheduledTask::ProcessBatch);
        assert_eq!(
            scheduler.drain_pending(),
            vec![ScheduledTask::BatchDelayElapsed, ScheduledTask::ProcessBatch]
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cleared_timer_is_skipped() {
        // 测试场景：取消的定时器不被抽取（防抖依赖此行为）
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.set_timeout(150, ScheduledTask::ScrollRescan);
        scheduler.clear_timeout(first);
        scheduler.set_timeout(150, ScheduledTask::ScrollRescan);
        assert_eq!(scheduler.drain_pending(), vec![ScheduledTask::ScrollRescan]);
    }

    #[test]
    fn test_delay_of_reports_registration_delay() {
        // 测试场景：delay_of 返回登记时的延迟，动画帧为 None
        let mut scheduler = ManualScheduler::new();
        scheduler.set_timeout(300, ScheduledTask::RevealTeardown(7));
        scheduler.request_animation_frame(ScheduledTask::RevealFade(7));
        assert_eq!(scheduler.delay_of(ScheduledTask::RevealTeardown(7)), Some(300));
        assert_eq!(scheduler.delay_of(ScheduledTask::RevealFade(7)), None);
    }
}
