//! 渐进式加载器
//! 视口驱动的分批调度：新帖先注册视口观察，进入视口前夕才入队；
//! 每批最多处理固定数量，批间让出主线程（定时器 + 动画帧），
//! 长滚动会话不阻塞页面响应。
//! processedPosts 身份集保证同一帖子恰好处理一次

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::config::GlobalConfig;
use crate::detector::{PostFilterEngine, PostVerdict};
use crate::dom::{DomHost, IntersectionEntry, NodeId, ViewportObserver};
use crate::obscurer::PostObscurer;
use crate::scheduler::{ScheduledTask, Scheduler};
use crate::settings::Settings;

/// 单批处理所需的协作方集合
pub struct ProcessContext<'a, D: DomHost> {
    pub dom: &'a mut D,
    pub scheduler: &'a mut dyn Scheduler,
    pub engine: &'a PostFilterEngine,
    pub settings: &'a Settings,
    pub obscurer: &'a mut PostObscurer,
}

/// 渐进式加载器
#[derive(Debug)]
pub struct ProgressiveLoader {
    // 已处理（或已入队）帖子的身份集，恰好一次处理的守卫
    processed: FxHashSet<NodeId>,
    // 待处理FIFO队列
    queue: VecDeque<NodeId>,
    // 批处理循环进行中标志
    is_processing: bool,
    config: GlobalConfig,
}

impl ProgressiveLoader {
    pub fn new(config: GlobalConfig) -> Self {
        Self {
            processed: FxHashSet::default(),
            queue: VecDeque::new(),
            is_processing: false,
            config,
        }
    }

    /// 帖子是否已被处理（或已在队列中）
    pub fn is_processed(&self, post: NodeId) -> bool {
        self.processed.contains(&post)
    }

    /// 批处理循环是否进行中
    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// 待处理队列长度
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// 注册帖子的视口观察
    /// 已处理的帖子不再注册；分类工作推迟到元素即将可见时
    pub fn observe_post(&mut self, post: NodeId, viewport: &mut dyn ViewportObserver) {
        if !self.processed.contains(&post) {
            viewport.observe(post);
        }
    }

    /// 视口交叉回调：进入视口的帖子全部转入处理队列并停止观察，
    /// 随后空闲时启动一次批处理循环（同批交付的条目共享一个批次）
    pub fn handle_intersection<D: DomHost>(
        &mut self,
        entries: &[IntersectionEntry],
        viewport: &mut dyn ViewportObserver,
        ctx: &mut ProcessContext<'_, D>,
    ) {
        for entry in entries {
            if entry.is_intersecting {
                viewport.unobserve(entry.target);
                self.enqueue(entry.target);
            }
        }
        if !self.is_processing {
            self.process_batch(ctx);
        }
    }

    /// 单帖入队，空闲时立即启动批处理循环
    pub fn add_to_queue<D: DomHost>(&mut self, post: NodeId, ctx: &mut ProcessContext<'_, D>) {
        self.enqueue(post);
        if !self.is_processing {
            self.process_batch(ctx);
        }
    }

    /// 恰好一次守卫下的入队
    fn enqueue(&mut self, post: NodeId) {
        if self.processed.contains(&post) {
            return;
        }
        self.queue.push_back(post);
        self.processed.insert(post);
    }

    /// 处理一批帖子
    /// 同步分类+过滤至多 batch_size 条；队列未空则预约批间延迟，
    /// 到期后经动画帧回到本方法；队列已空则转入空闲
    pub fn process_batch<D: DomHost>(&mut self, ctx: &mut ProcessContext<'_, D>) {
        if self.queue.is_empty() {
            self.is_processing = false;
            return;
        }

        self.is_processing = true;
        let batch_size = self.config.batch_size.max(1);
        let display_label = ctx
            .engine
            .country_rule(ctx.settings)
            .map(|rule| rule.display_label.clone())
            .unwrap_or_else(|| "your region".to_string());

        for _ in 0..batch_size {
            let Some(post) = self.queue.pop_front() else {
                break;
            };
            let text = ctx.dom.text_content(post);
            if ctx.engine.evaluate(&text, ctx.settings) == PostVerdict::Filtered {
                ctx.obscurer.filter_post(ctx.dom, post, &display_label);
            }
        }

        if !self.queue.is_empty() {
            ctx.scheduler.set_timeout(
                self.config.processing_delay_ms,
                ScheduledTask::BatchDelayElapsed,
            );
        } else {
            self.is_processing = false;
        }
    }

    /// 批间延迟到期：申请动画帧继续下一批
    pub fn handle_batch_delay_elapsed(&self, scheduler: &mut dyn Scheduler) {
        scheduler.request_animation_frame(ScheduledTask::ProcessBatch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::dom::{MemoryDom, RecordingViewport};
    use crate::scheduler::ManualScheduler;

    fn make_post(dom: &mut MemoryDom, text: &str) -> NodeId {
        let root = dom.root();
        let post = dom.add_element(root, "div", &["feed-shared-update-v2"], "");
        dom.add_element(post, "div", &["feed-shared-text"], text);
        post
    }

    struct Harness {
        dom: MemoryDom,
        scheduler: ManualScheduler,
        engine: PostFilterEngine,
        settings: Settings,
        obscurer: PostObscurer,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                dom: MemoryDom::new(),
                scheduler: ManualScheduler::new(),
                engine: PostFilterEngine::new(ConfigManager::get_default()),
                settings: Settings::default(),
                obscurer: PostObscurer::new(ConfigManager::get_default()),
            }
        }

        fn ctx(&mut self) -> ProcessContext<'_, MemoryDom> {
            ProcessContext {
                dom: &mut self.dom,
                scheduler: &mut self.scheduler,
                engine: &self.engine,
                settings: &self.settings,
                obscurer: &mut self.obscurer,
            }
        }
    }

    #[test]
    fn test_observe_post_defers_to_viewport() {
        // 测试场景：observe_post 只注册观察，不立即处理
        let mut harness = Harness::new();
        let post = make_post(&mut harness.dom, "We're hiring, based in Toronto, Canada");
        let mut loader = ProgressiveLoader::new(ConfigManager::get_default());
        let mut viewport = RecordingViewport::new();

        loader.observe_post(post, &mut viewport);
        assert_eq!(viewport.observed, vec![post]);
        assert_eq!(harness.obscurer.filtered_count(), 0);
    }

    #[test]
    fn test_exactly_once_processing_guard() {
        // 测试场景：交叉触发后重复 observe_post 不再注册，也不会二次处理
        let mut harness = Harness::new();
        let post = make_post(&mut harness.dom, "We're hiring, based in Toronto, Canada");
        let mut loader = ProgressiveLoader::new(ConfigManager::get_default());
        let mut viewport = RecordingViewport::new();
        let entries = [IntersectionEntry { target: post, is_intersecting: true }];

        loader.handle_intersection(&entries, &mut viewport, &mut harness.ctx());
        assert!(loader.is_processed(post));
        assert_eq!(viewport.unobserved, vec![post]);

        loader.observe_post(post, &mut viewport);
        assert!(viewport.observed.is_empty());

        // 再次交叉同样被身份集拦下
        loader.handle_intersection(&entries, &mut viewport, &mut harness.ctx());
        assert_eq!(harness.obscurer.filtered_count(), 1);
    }

    #[test]
    fn test_non_intersecting_entries_are_ignored() {
        // 测试场景：未交叉条目不入队
        let mut harness = Harness::new();
        let post = make_post(&mut harness.dom, "We're hiring");
        let mut loader = ProgressiveLoader::new(ConfigManager::get_default());
        let mut viewport = RecordingViewport::new();
        let entries = [IntersectionEntry { target: post, is_intersecting: false }];

        loader.handle_intersection(&entries, &mut viewport, &mut harness.ctx());
        assert!(!loader.is_processed(post));
        assert!(viewport.unobserved.is_empty());
    }

    #[test]
    fn test_batches_yield_between_runs() {
        // 测试场景：单次交叉交付 7 帖，第一批处理 5 条后预约批间延迟，
        // 经动画帧回调处理剩余 2 条后转入空闲
        let mut harness = Harness::new();
        let entries: Vec<IntersectionEntry> = (0..7)
            .map(|i| {
                let post = make_post(
                    &mut harness.dom,
                    &format!("Post {} - we're hiring, must be authorized to work in Canada", i),
                );
                IntersectionEntry { target: post, is_intersecting: true }
            })
            .collect();
        let mut loader = ProgressiveLoader::new(ConfigManager::get_default());
        let mut viewport = RecordingViewport::new();

        loader.handle_intersection(&entries, &mut viewport, &mut harness.ctx());
        // 首批处理 5 条，剩余 2 条挂起
        assert_eq!(harness.obscurer.filtered_count(), 5);
        assert!(loader.is_processing());
        assert_eq!(loader.queue_len(), 2);
        assert_eq!(
            harness.scheduler.delay_of(ScheduledTask::BatchDelayElapsed),
            Some(100)
        );

        // 驱动延迟 → 动画帧 → 下一批
        let tasks = harness.scheduler.drain_pending();
        assert_eq!(tasks, vec![ScheduledTask::BatchDelayElapsed]);
        loader.handle_batch_delay_elapsed(&mut harness.scheduler);
        let tasks = harness.scheduler.drain_pending();
        assert_eq!(tasks, vec![ScheduledTask::ProcessBatch]);
        loader.process_batch(&mut harness.ctx());

        assert_eq!(harness.obscurer.filtered_count(), 7);
        assert!(!loader.is_processing());
        assert_eq!(loader.queue_len(), 0);
    }

    #[test]
    fn test_allowed_posts_pass_through_unfiltered() {
        // 测试场景：放行帖子不被遮罩但计入已处理
        let mut harness = Harness::new();
        let post = make_post(
            &mut harness.dom,
            "Apply now - Remote position in United States",
        );
        let mut loader = ProgressiveLoader::new(ConfigManager::get_default());

        loader.add_to_queue(post, &mut harness.ctx());
        assert!(loader.is_processed(post));
        assert_eq!(harness.obscurer.filtered_count(), 0);
    }
}
