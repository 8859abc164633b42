//! Feed filtering demonstration for rsjobfilter
//! rsjobfilter 信息流职位贴过滤演示程序
//! 功能说明：
//! 1. 演示内存DOM中构建模拟信息流页面
//! 2. 展示视口驱动的分批判定与遮罩流程
//! 3. 演示设置面板保存设置并广播到内容脚本的联动
//!
//! 运行命令：
//! cargo run --example feed_demo

use env_logger::{Builder, Env, Target};
use rsjobfilter::{
    ConfigManager, ContentScript, CountryCode, DocumentReadyState, DomHost, IntersectionEntry,
    ManualScheduler, MemoryDom, MemoryStore, MessageSender, RecordingViewport, RsjResult,
    RuntimeMessage, SettingsPanel,
};
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

/// 把面板广播的消息缓存起来，供演示转发给内容脚本
#[derive(Default, Clone)]
struct QueueSender {
    queued: Rc<RefCell<Vec<RuntimeMessage>>>,
}

impl MessageSender for QueueSender {
    fn send(&mut self, message: &RuntimeMessage) -> RsjResult<()> {
        self.queued.borrow_mut().push(message.clone());
        Ok(())
    }
}

/// 主函数 - 信息流过滤演示入口
/// 执行流程：
/// 1. 初始化结构化日志系统
/// 2. 构建模拟信息流页面（三类帖子）
/// 3. 启动内容脚本并模拟视口交叉与批处理循环
/// 4. 输出各帖子的遮罩状态
/// 5. 通过设置面板切换国家并广播，观察重处理结果
fn main() -> Result<(), Box<dyn Error>> {
    // ========== 1. 日志系统初始化 ==========
    Builder::from_env(Env::default().default_filter_or("debug"))
        .target(Target::Stdout)
        .init();

    // ========== 2. 构建模拟信息流页面 ==========
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let samples = [
        ("海外职位贴", "We're hiring! Senior engineer, position is based in Toronto, Canada"),
        ("本地职位贴", "Join our team - open position located in New York, United States"),
        ("普通动态贴", "Had a great time at the conference this week!"),
    ];
    let mut posts = Vec::new();
    for (label, text) in samples {
        let post = dom.add_element(root, "div", &["feed-shared-update-v2"], "");
        dom.add_element(post, "div", &["feed-shared-text"], text);
        posts.push((label, post));
    }

    // ========== 3. 启动内容脚本 ==========
    let store = MemoryStore::new();
    let mut script = ContentScript::new(
        dom,
        ManualScheduler::new(),
        RecordingViewport::new(),
        &store,
        ConfigManager::get_default(),
    );
    script.start(DocumentReadyState::Complete);

    // 模拟全部帖子进入视口，驱动调度器直至队列耗尽
    let entries: Vec<IntersectionEntry> = script
        .viewport()
        .currently_observed()
        .into_iter()
        .map(|target| IntersectionEntry { target, is_intersecting: true })
        .collect();
    script.handle_intersections(&entries);
    pump(&mut script);

    // ========== 4. 输出遮罩状态 ==========
    println!("\n=============== 过滤结果（默认设置：US / 显示远程） ===============");
    for (label, post) in &posts {
        report(&script, label, *post);
    }

    // ========== 5. 设置面板切换国家并广播 ==========
    let sender = QueueSender::default();
    let mut panel = SettingsPanel::open(
        MemoryStore::new(),
        sender.clone(),
        ManualScheduler::new(),
        ConfigManager::get_default(),
    );
    panel.set_country(CountryCode::CA);

    // 把面板广播的消息投递到内容脚本，触发全量重处理
    for message in sender.queued.borrow_mut().drain(..) {
        script.handle_message(message);
    }

    println!("\n=============== 过滤结果（切换设置：CA / 显示远程） ===============");
    for (label, post) in &posts {
        report(&script, label, *post);
    }
    println!("\n当前脚本设置：{}", serde_json::to_string(script.settings())?);

    Ok(())
}

type DemoScript = ContentScript<MemoryDom, ManualScheduler, RecordingViewport>;

/// 驱动调度器直至任务队列耗尽
fn pump(script: &mut DemoScript) {
    loop {
        let tasks = script.scheduler_mut().drain_pending();
        if tasks.is_empty() {
            return;
        }
        for task in tasks {
            script.run_task(task);
        }
    }
}

/// 打印单个帖子的遮罩状态
fn report(script: &DemoScript, label: &str, post: rsjobfilter::NodeId) {
    let filtered = script.dom().has_attribute(post, "data-filtered");
    let status = if filtered { "已遮罩" } else { "正常显示" };
    println!("📌 {}: {}", label, status);
}
