//! 帖子遮罩器
//! 对被过滤的帖子施加模糊遮罩与提示横幅，支持悬停预览、点击展示
//! 与设置变更触发的全量重处理。
//! 不变量：单个帖子同一时刻至多一条横幅；data-filtered 存在
//! 当且仅当横幅与遮罩当前存在

use rustc_hash::FxHashMap;

use crate::config::GlobalConfig;
use crate::detector::{PostFilterEngine, PostVerdict};
use crate::dom::selectors::{
    post_selector_list, ACTOR_NAME_SELECTOR, ATTR_CONTENT_OVERLAY, ATTR_FILTERED,
    ATTR_FILTER_BANNER, ATTR_USER_CLEARED, CONTENT_AREA_SELECTORS,
};
use crate::dom::{DomHost, NodeId};
use crate::scheduler::{ScheduledTask, Scheduler};
use crate::settings::Settings;

/// 横幅内联样式
const BANNER_STYLE: &str = "position: absolute; top: 0; left: 0; right: 0; \
background: #ff595e; color: white; padding: 8px; text-align: center; \
z-index: 2; font-size: 14px; transition: all 0.3s ease-in-out; pointer-events: auto;";

/// 内容遮罩内联样式
const OVERLAY_STYLE: &str = "position: absolute; top: 0; left: 0; right: 0; bottom: 0; \
background: rgba(255, 255, 255, 0.8); backdrop-filter: blur(4px); \
-webkit-backdrop-filter: blur(4px); transition: all 0.3s ease-in-out; \
z-index: 1; pointer-events: none;";

/// 单条遮罩记录
#[derive(Debug, Clone)]
struct OverlayRecord {
    area: NodeId,
    overlay: NodeId,
}

/// 单个被过滤帖子的装饰状态
#[derive(Debug, Clone)]
struct FilteredPost {
    banner: NodeId,
    overlays: Vec<OverlayRecord>,
    // 展示动画已启动后点击不再重复触发
    revealing: bool,
}

/// 帖子遮罩器
#[derive(Debug)]
pub struct PostObscurer {
    filtered: FxHashMap<NodeId, FilteredPost>,
    config: GlobalConfig,
}

impl PostObscurer {
    pub fn new(config: GlobalConfig) -> Self {
        Self {
            filtered: FxHashMap::default(),
            config,
        }
    }

    /// 当前被遮罩的帖子数量
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// 指定帖子的横幅节点（测试断言用）
    pub fn banner_of(&self, post: NodeId) -> Option<NodeId> {
        self.filtered.get(&post).map(|state| state.banner)
    }

    /// 对帖子施加遮罩与横幅
    /// 已标记 data-filtered 的帖子直接跳过（幂等）；
    /// 内容区零匹配时仍插入横幅并打标记
    pub fn filter_post<D: DomHost>(&mut self, dom: &mut D, post: NodeId, display_label: &str) {
        if dom.has_attribute(post, ATTR_FILTERED) {
            return;
        }

        // 1. 收集遮罩目标内容区，排除发帖人名称头部内部的元素
        let mut content_areas = Vec::new();
        for selector in CONTENT_AREA_SELECTORS {
            for area in dom.query_selector_all_within(post, selector) {
                if dom.closest(area, ACTOR_NAME_SELECTOR).is_none() {
                    content_areas.push(area);
                }
            }
        }

        // 2. 创建提示横幅
        let banner = dom.create_element("div");
        dom.set_style_text(banner, BANNER_STYLE);
        dom.set_text_content(
            banner,
            &format!("Position not available in {} - Click to show", display_label),
        );
        dom.set_attribute(banner, ATTR_FILTER_BANNER, "true");

        // 3. 帖子容器建立定位上下文并打过滤标记
        dom.set_style(post, "position", "relative");
        dom.set_attribute(post, ATTR_FILTERED, "true");
        dom.insert_as_first_child(post, banner);

        // 4. 为每个内容区附加模糊遮罩
        let overlays = content_areas
            .into_iter()
            .map(|area| {
                let overlay = dom.create_element("div");
                dom.set_style_text(overlay, OVERLAY_STYLE);
                dom.set_attribute(overlay, ATTR_CONTENT_OVERLAY, "true");

                // 内容区为 static 时设为 relative，形成遮罩的包含块
                if dom.computed_style(area, "position") == "static" {
                    dom.set_style(area, "position", "relative");
                }

                dom.append_child(area, overlay);
                OverlayRecord { area, overlay }
            })
            .collect::<Vec<_>>();

        log::debug!("帖子 {} 已遮罩，内容区 {} 处", post, overlays.len());
        self.filtered.insert(post, FilteredPost {
            banner,
            overlays,
            revealing: false,
        });
    }

    /// 指针进入：减弱模糊，提供悬停预览
    pub fn handle_pointer_enter<D: DomHost>(&self, dom: &mut D, post: NodeId) {
        if !dom.has_attribute(post, ATTR_FILTERED) {
            return;
        }
        if let Some(state) = self.filtered.get(&post) {
            for record in &state.overlays {
                dom.set_style(record.overlay, "backdrop-filter", "blur(2px)");
                dom.set_style(record.overlay, "-webkit-backdrop-filter", "blur(2px)");
                dom.set_style(record.overlay, "background", "rgba(255, 255, 255, 0.5)");
            }
        }
    }

    /// 指针离开：恢复完整模糊
    pub fn handle_pointer_leave<D: DomHost>(&self, dom: &mut D, post: NodeId) {
        if !dom.has_attribute(post, ATTR_FILTERED) {
            return;
        }
        if let Some(state) = self.filtered.get(&post) {
            for record in &state.overlays {
                dom.set_style(record.overlay, "backdrop-filter", "blur(4px)");
                dom.set_style(record.overlay, "-webkit-backdrop-filter", "blur(4px)");
                dom.set_style(record.overlay, "background", "rgba(255, 255, 255, 0.8)");
            }
        }
    }

    /// 横幅点击：启动展示动画（动画帧内淡出，随后定时拆除）
    /// 展示后不可逆，直至设置变更触发全量重处理
    pub fn handle_banner_click(&mut self, scheduler: &mut dyn Scheduler, post: NodeId) {
        let Some(state) = self.filtered.get_mut(&post) else {
            return;
        };
        if state.revealing {
            return;
        }
        state.revealing = true;
        scheduler.request_animation_frame(ScheduledTask::RevealFade(post));
    }

    /// 展示动画第一步：淡出遮罩、移出横幅，并预约拆除
    /// 仅对 revealing 状态的装饰生效；重处理换代后的新装饰
    /// （revealing=false）不受换代前遗留回调影响
    pub fn run_reveal_fade<D: DomHost>(
        &self,
        dom: &mut D,
        scheduler: &mut dyn Scheduler,
        post: NodeId,
    ) {
        let Some(state) = self.filtered.get(&post) else {
            return;
        };
        if !state.revealing {
            return;
        }
        for record in &state.overlays {
            dom.set_style(record.overlay, "opacity", "0");
        }
        dom.set_style(state.banner, "transform", "translateY(-100%)");
        dom.set_style(state.banner, "opacity", "0");
        scheduler.set_timeout(
            self.config.reveal_animation_ms,
            ScheduledTask::RevealTeardown(post),
        );
    }

    /// 展示动画第二步：拆除遮罩/横幅节点，复位定位副作用，
    /// 摘除过滤标记并打用户手动展示标记
    pub fn run_reveal_teardown<D: DomHost>(&mut self, dom: &mut D, post: NodeId) {
        // 过期定时器守卫：定时器按 NodeId 预约，若等待期间重处理已换代装饰
        // （新 filter_post 条目 revealing=false），遗留定时器不得拆除新装饰
        if !self.filtered.get(&post).is_some_and(|state| state.revealing) {
            return;
        }
        let Some(state) = self.filtered.remove(&post) else {
            return;
        };
        for record in &state.overlays {
            dom.remove_node(record.overlay);
            dom.set_style(record.area, "position", "");
        }
        dom.remove_node(state.banner);
        dom.set_style(post, "position", "");
        dom.remove_attribute(post, ATTR_FILTERED);
        dom.set_attribute(post, ATTR_USER_CLEARED, "true");
        log::debug!("帖子 {} 已由用户展示", post);
    }

    /// 全量重处理：拆除所有现存遮罩并清除两类标记，
    /// 再以当前设置重新扫描全部帖子并同步重新过滤。
    /// 这是唯一能重新遮罩用户手动展示过的帖子的路径
    pub fn reprocess_posts<D: DomHost>(
        &mut self,
        dom: &mut D,
        engine: &PostFilterEngine,
        settings: &Settings,
    ) {
        // 1. 拆除全部现存遮罩与标记
        let filtered_marker = format!("[{}]", ATTR_FILTERED);
        for post in dom.query_selector_all(&filtered_marker) {
            for overlay in
                dom.query_selector_all_within(post, &format!("[{}]", ATTR_CONTENT_OVERLAY))
            {
                dom.remove_node(overlay);
            }
            for banner in
                dom.query_selector_all_within(post, &format!("[{}]", ATTR_FILTER_BANNER))
            {
                dom.remove_node(banner);
            }
            for selector in CONTENT_AREA_SELECTORS {
                for area in dom.query_selector_all_within(post, selector) {
                    dom.set_style(area, "position", "");
                }
            }
            dom.set_style(post, "position", "");
            dom.remove_attribute(post, ATTR_FILTERED);
            dom.remove_attribute(post, ATTR_USER_CLEARED);
            self.filtered.remove(&post);
        }

        // 2. 清除仅剩用户手动展示标记的帖子，使其可被重新过滤
        for post in dom.query_selector_all(&format!("[{}]", ATTR_USER_CLEARED)) {
            dom.remove_attribute(post, ATTR_USER_CLEARED);
        }

        // 3. 以当前设置重新分类并过滤（同步全量，不走分批队列）
        let display_label = engine
            .country_rule(settings)
            .map(|rule| rule.display_label.clone())
            .unwrap_or_else(|| "your region".to_string());
        for post in dom.query_selector_all(&post_selector_list()) {
            let text = dom.text_content(post);
            if engine.evaluate(&text, settings) == PostVerdict::Filtered {
                self.filter_post(dom, post, &display_label);
            }
        }
        log::debug!("重处理完成，当前遮罩帖子 {} 个", self.filtered.len());
    }
}
