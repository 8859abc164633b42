//! 内容脚本编排
//! 把设置上下文、判定引擎、渐进加载器与遮罩器装配为单个页面对象；
//! 宿主事件（DOM就绪、结构变更、滚动、视口交叉、指针/点击、跨页面消息、
//! 定时任务）统一经由本模块的处理方法进入

pub mod watchers;

use crate::config::GlobalConfig;
use crate::detector::PostFilterEngine;
use crate::dom::selectors::{post_selector_list, unfiltered_post_selector_list};
use crate::dom::{DomHost, IntersectionEntry, NodeId, ViewportConfig, ViewportObserver};
use crate::loader::{ProcessContext, ProgressiveLoader};
use crate::obscurer::PostObscurer;
use crate::scheduler::{ScheduledTask, Scheduler, TimerId};
use crate::settings::{load_or_default, RuntimeMessage, Settings, SettingsStore};

/// 宿主文档就绪状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentReadyState {
    Loading,
    Interactive,
    Complete,
}

/// 内容脚本
pub struct ContentScript<D: DomHost, S: Scheduler, V: ViewportObserver> {
    dom: D,
    scheduler: S,
    viewport: V,
    loader: ProgressiveLoader,
    obscurer: PostObscurer,
    engine: PostFilterEngine,
    // 显式设置上下文，初始化自持久化存储，消息到达时原地更新
    settings: Settings,
    config: GlobalConfig,
    started: bool,
    // 滚动防抖的在途定时器
    scroll_timer: Option<TimerId>,
}

impl<D: DomHost, S: Scheduler, V: ViewportObserver> ContentScript<D, S, V> {
    /// 创建内容脚本实例
    /// 设置读取失败时降级为默认设置，初始化不被存储故障阻塞
    pub fn new(
        dom: D,
        scheduler: S,
        viewport: V,
        store: &dyn SettingsStore,
        config: GlobalConfig,
    ) -> Self {
        let settings = load_or_default(store);
        log::info!("内容脚本启动，设置：{:?}", settings);
        Self {
            dom,
            scheduler,
            viewport,
            loader: ProgressiveLoader::new(config.clone()),
            obscurer: PostObscurer::new(config.clone()),
            engine: PostFilterEngine::new(config.clone()),
            settings,
            config,
            started: false,
            scroll_timer: None,
        }
    }

    /// 宿主构造视口观察者所需的配置
    pub fn viewport_config(&self) -> ViewportConfig {
        ViewportConfig {
            root_margin: self.config.viewport_root_margin.clone(),
            threshold: self.config.viewport_threshold,
        }
    }

    /// 按文档就绪状态启动：加载中则推迟到 DOMContentLoaded
    pub fn start(&mut self, ready_state: DocumentReadyState) {
        match ready_state {
            DocumentReadyState::Loading => {
                log::debug!("文档加载中，推迟初始化");
            }
            DocumentReadyState::Interactive | DocumentReadyState::Complete => self.initialize(),
        }
    }

    /// DOMContentLoaded 回调
    pub fn handle_dom_content_loaded(&mut self) {
        if !self.started {
            self.initialize();
        }
    }

    /// 扫描现有帖子并逐个注册视口观察
    fn initialize(&mut self) {
        self.started = true;
        let posts = self.dom.query_selector_all(&post_selector_list());
        log::debug!("初始化扫描到 {} 个候选帖子", posts.len());
        for post in posts {
            self.loader.observe_post(post, &mut self.viewport);
        }
    }

    /// 结构变更发现路径：新增节点自身或其后代命中帖子选择器时注册观察
    pub fn handle_added_node(&mut self, node: NodeId) {
        let selector_list = post_selector_list();
        if self.dom.matches(node, &selector_list) {
            self.loader.observe_post(node, &mut self.viewport);
        }
        for post in self.dom.query_selector_all_within(node, &selector_list) {
            self.loader.observe_post(post, &mut self.viewport);
        }
    }

    /// 滚动安全网：防抖后重扫结构监听可能漏掉的帖子
    pub fn handle_scroll(&mut self) {
        if let Some(timer) = self.scroll_timer.take() {
            self.scheduler.clear_timeout(timer);
        }
        self.scroll_timer = Some(self.scheduler.set_timeout(
            self.config.scroll_debounce_ms,
            ScheduledTask::ScrollRescan,
        ));
    }

    /// 视口交叉回调
    pub fn handle_intersections(&mut self, entries: &[IntersectionEntry]) {
        let mut ctx = ProcessContext {
            dom: &mut self.dom,
            scheduler: &mut self.scheduler,
            engine: &self.engine,
            settings: &self.settings,
            obscurer: &mut self.obscurer,
        };
        self.loader.handle_intersection(entries, &mut self.viewport, &mut ctx);
    }

    /// 指针进入帖子
    pub fn handle_pointer_enter(&mut self, post: NodeId) {
        self.obscurer.handle_pointer_enter(&mut self.dom, post);
    }

    /// 指针离开帖子
    pub fn handle_pointer_leave(&mut self, post: NodeId) {
        self.obscurer.handle_pointer_leave(&mut self.dom, post);
    }

    /// 横幅点击
    pub fn handle_banner_click(&mut self, post: NodeId) {
        self.obscurer.handle_banner_click(&mut self.scheduler, post);
    }

    /// 跨页面消息：原地更新设置并全量重处理
    /// 在途批次不被取消，重处理同步覆盖全部已遮罩帖子（接受的竞态）
    pub fn handle_message(&mut self, message: RuntimeMessage) {
        match message {
            RuntimeMessage::SettingsUpdated { settings } => {
                log::info!("收到设置更新：{:?}", settings);
                self.settings = settings;
                self.obscurer
                    .reprocess_posts(&mut self.dom, &self.engine, &self.settings);
            }
        }
    }

    /// 定时/动画帧任务统一分发
    pub fn run_task(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::BatchDelayElapsed => {
                self.loader.handle_batch_delay_elapsed(&mut self.scheduler);
            }
            ScheduledTask::ProcessBatch => {
                let mut ctx = ProcessContext {
                    dom: &mut self.dom,
                    scheduler: &mut self.scheduler,
                    engine: &self.engine,
                    settings: &self.settings,
                    obscurer: &mut self.obscurer,
                };
                self.loader.process_batch(&mut ctx);
            }
            ScheduledTask::RevealFade(post) => {
                self.obscurer
                    .run_reveal_fade(&mut self.dom, &mut self.scheduler, post);
            }
            ScheduledTask::RevealTeardown(post) => {
                self.obscurer.run_reveal_teardown(&mut self.dom, post);
            }
            ScheduledTask::ScrollRescan => {
                self.scroll_timer = None;
                self.rescan_unprocessed();
            }
            // 设置面板专属任务，内容脚本侧忽略
            ScheduledTask::HideSavedStatus => {
                log::debug!("忽略非内容脚本任务：{:?}", task);
            }
        }
    }

    /// 安全网重扫：未标记 data-filtered 且未处理过的帖子补注册观察
    fn rescan_unprocessed(&mut self) {
        let posts = self.dom.query_selector_all(&unfiltered_post_selector_list());
        for post in posts {
            if !self.loader.is_processed(post) {
                self.loader.observe_post(post, &mut self.viewport);
            }
        }
    }

    // ---- 协作方与内部状态访问器（宿主胶水与测试用） ----

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn obscurer(&self) -> &PostObscurer {
        &self.obscurer
    }

    pub fn loader(&self) -> &ProgressiveLoader {
        &self.loader
    }
}
