//! 宿主DOM抽象层
//! DOM、视口交叉观察为宿主页面提供的外部协作方，本库只消费不实现；
//! 全部查询对零匹配/失效节点容错，空结果不视为错误

pub mod selectors;
pub mod memory;

pub use memory::{MemoryDom, RecordingViewport};

/// 宿主DOM节点句柄
pub type NodeId = u64;

/// 视口观察配置（与宿主 IntersectionObserver 选项一致）
#[derive(Debug, Clone)]
pub struct ViewportConfig {
    pub root_margin: String,
    pub threshold: f64,
}

/// 视口交叉条目
#[derive(Debug, Clone, Copy)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

/// 视口观察者特质
/// 宿主在元素即将进入视口时回传 IntersectionEntry，
/// 分类工作由此推迟到元素可见前夕，避免对屏幕外内容做无谓计算
pub trait ViewportObserver {
    fn observe(&mut self, node: NodeId);
    fn unobserve(&mut self, node: NodeId);
    fn disconnect(&mut self);
}

/// 宿主DOM操作特质
/// 选择器参数均为逗号分隔的CSS选择器列表；失效节点上的操作应退化为无操作
pub trait DomHost {
    /// 节点自身是否命中选择器列表
    fn matches(&self, node: NodeId, selector_list: &str) -> bool;

    /// 文档范围选择器查询（先序）
    fn query_selector_all(&self, selector_list: &str) -> Vec<NodeId>;

    /// 子树范围选择器查询（不含根节点自身）
    fn query_selector_all_within(&self, root: NodeId, selector_list: &str) -> Vec<NodeId>;

    /// 含自身向上查找最近命中祖先
    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId>;

    /// 节点及其子树的纯文本内容
    fn text_content(&self, node: NodeId) -> String;

    fn create_element(&mut self, tag: &str) -> NodeId;
    fn set_text_content(&mut self, node: NodeId, text: &str);

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);
    fn has_attribute(&self, node: NodeId, name: &str) -> bool;

    /// 设置单条内联样式；空值表示清除该属性
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    /// 以 cssText 形式整体设置内联样式
    fn set_style_text(&mut self, node: NodeId, css: &str);
    /// 计算样式查询（position 缺省为 static）
    fn computed_style(&self, node: NodeId, property: &str) -> String;

    fn append_child(&mut self, parent: NodeId, child: NodeId);
    fn insert_as_first_child(&mut self, parent: NodeId, child: NodeId);
    /// 将节点连同子树从文档中摘除
    fn remove_node(&mut self, node: NodeId);
}
