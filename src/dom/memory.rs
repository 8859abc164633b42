//! 内存DOM参考实现
//! 供单元测试与演示程序使用的最小元素树，自带一个只覆盖本库选择器
//! 形态（类、属性存在、:not、逗号列表）的简易选择器匹配器。
//! 文本内容以空格连接各文本段，近似真实页面中的空白文本节点。

use rustc_hash::FxHashMap;

use super::{DomHost, NodeId};

/// 简单选择器
#[derive(Debug, Clone, PartialEq)]
enum SimpleSelector {
    Tag(String),
    Class(String),
    HasAttr(String),
    Not(Vec<SimpleSelector>),
}

/// 内存元素节点
#[derive(Debug, Clone, Default)]
struct ElementNode {
    tag: String,
    classes: Vec<String>,
    attrs: FxHashMap<String, String>,
    styles: FxHashMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// 内存DOM
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: FxHashMap<NodeId, ElementNode>,
    root: NodeId,
    next_id: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// 创建带 body 根节点的空文档
    pub fn new() -> Self {
        let mut nodes = FxHashMap::default();
        nodes.insert(1, ElementNode {
            tag: "body".to_string(),
            ..ElementNode::default()
        });
        Self {
            nodes,
            root: 1,
            next_id: 2,
        }
    }

    /// 文档根节点（body）
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// 节点是否仍在文档中
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// 便捷构建：在父节点下追加带类名与文本的元素
    pub fn add_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        classes: &[&str],
        text: &str,
    ) -> NodeId {
        let node = self.create_element(tag);
        for class in classes {
            self.add_class(node, class);
        }
        if !text.is_empty() {
            self.set_text_content(node, text);
        }
        self.append_child(parent, node);
        node
    }

    /// 追加类名
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    /// 读取内联样式（测试断言用）
    pub fn style_of(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(&node)
            .and_then(|element| element.styles.get(property))
            .cloned()
    }

    /// 直接子节点列表
    pub fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|element| element.children.clone())
            .unwrap_or_default()
    }

    // ---- 选择器解析与匹配 ----

    fn parse_compound(selector: &str) -> Vec<SimpleSelector> {
        let mut parts = Vec::new();
        let mut rest = selector.trim();

        while !rest.is_empty() {
            if let Some(stripped) = rest.strip_prefix('.') {
                let (ident, tail) = Self::read_ident(stripped);
                if ident.is_empty() {
                    break;
                }
                parts.push(SimpleSelector::Class(ident));
                rest = tail;
            } else if let Some(stripped) = rest.strip_prefix('[') {
                let Some(end) = stripped.find(']') else {
                    log::debug!("选择器缺少闭合括号，忽略剩余部分：{:?}", rest);
                    break;
                };
                parts.push(SimpleSelector::HasAttr(stripped[..end].trim().to_string()));
                rest = &stripped[end + 1..];
            } else if let Some(stripped) = rest.strip_prefix(":not(") {
                let Some(end) = stripped.find(')') else {
                    log::debug!("选择器缺少闭合括号，忽略剩余部分：{:?}", rest);
                    break;
                };
                parts.push(SimpleSelector::Not(Self::parse_compound(&stripped[..end])));
                rest = &stripped[end + 1..];
            } else {
                let (ident, tail) = Self::read_ident(rest);
                if ident.is_empty() {
                    // 不支持的形态（组合器等），忽略剩余部分
                    log::debug!("不支持的选择器形态，忽略剩余部分：{:?}", rest);
                    break;
                }
                parts.push(SimpleSelector::Tag(ident));
                rest = tail;
            }
        }

        parts
    }

    fn read_ident(input: &str) -> (String, &str) {
        let end = input
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(input.len());
        (input[..end].to_string(), &input[end..])
    }

    fn matches_simple(&self, element: &ElementNode, selector: &SimpleSelector) -> bool {
        match selector {
            SimpleSelector::Tag(tag) => element.tag == *tag,
            SimpleSelector::Class(class) => element.classes.iter().any(|c| c == class),
            SimpleSelector::HasAttr(name) => element.attrs.contains_key(name),
            SimpleSelector::Not(inner) => {
                !inner.iter().all(|part| self.matches_simple(element, part))
            }
        }
    }

    fn matches_selector_list(&self, node: NodeId, selector_list: &str) -> bool {
        let Some(element) = self.nodes.get(&node) else {
            return false;
        };
        selector_list.split(',').any(|compound| {
            let parts = Self::parse_compound(compound);
            !parts.is_empty() && parts.iter().all(|part| self.matches_simple(element, part))
        })
    }

    /// 先序遍历收集命中节点
    fn collect_matches(
        &self,
        node: NodeId,
        selector_list: &str,
        include_self: bool,
        found: &mut Vec<NodeId>,
    ) {
        if include_self && self.matches_selector_list(node, selector_list) {
            found.push(node);
        }
        for child in self.children_of(node) {
            self.collect_matches(child, selector_list, true, found);
        }
    }

    fn remove_subtree(&mut self, node: NodeId) {
        for child in self.children_of(node) {
            self.remove_subtree(child);
        }
        self.nodes.remove(&node);
    }

    fn collect_text(&self, node: NodeId, segments: &mut Vec<String>) {
        if let Some(element) = self.nodes.get(&node) {
            if !element.text.is_empty() {
                segments.push(element.text.clone());
            }
            for child in &element.children {
                self.collect_text(*child, segments);
            }
        }
    }
}

impl DomHost for MemoryDom {
    fn matches(&self, node: NodeId, selector_list: &str) -> bool {
        self.matches_selector_list(node, selector_list)
    }

    fn query_selector_all(&self, selector_list: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_matches(self.root, selector_list, false, &mut found);
        found
    }

    fn query_selector_all_within(&self, root: NodeId, selector_list: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        for child in self.children_of(root) {
            self.collect_matches(child, selector_list, true, &mut found);
        }
        found
    }

    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.matches_selector_list(id, selector) {
                return Some(id);
            }
            current = self.nodes.get(&id).and_then(|element| element.parent);
        }
        None
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut segments = Vec::new();
        self.collect_text(node, &mut segments);
        segments.join(" ")
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, ElementNode {
            tag: tag.to_string(),
            ..ElementNode::default()
        });
        id
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element.text = text.to_string();
        }
    }

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(&node)
            .and_then(|element| element.attrs.get(name))
            .cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element.attrs.remove(name);
        }
    }

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|element| element.attrs.contains_key(name))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            if value.is_empty() {
                element.styles.remove(property);
            } else {
                element.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn set_style_text(&mut self, node: NodeId, css: &str) {
        let declarations: Vec<(String, String)> = css
            .split(';')
            .filter_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                let property = property.trim();
                let value = value.trim();
                (!property.is_empty() && !value.is_empty())
                    .then(|| (property.to_string(), value.to_string()))
            })
            .collect();
        if let Some(element) = self.nodes.get_mut(&node) {
            for (property, value) in declarations {
                element.styles.insert(property, value);
            }
        }
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        if let Some(value) = self.style_of(node, property) {
            return value;
        }
        // 内联样式缺省时的计算值
        match property {
            "position" => "static".to_string(),
            _ => String::new(),
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        if let Some(element) = self.nodes.get_mut(&child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.nodes.get_mut(&parent) {
            element.children.push(child);
        }
    }

    fn insert_as_first_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        if let Some(element) = self.nodes.get_mut(&child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.nodes.get_mut(&parent) {
            element.children.insert(0, child);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        let parent = self.nodes.get(&node).and_then(|element| element.parent);
        if let Some(parent) = parent {
            if let Some(element) = self.nodes.get_mut(&parent) {
                element.children.retain(|&c| c != node);
            }
        }
        self.remove_subtree(node);
    }
}

/// 记录型视口观察者（测试与演示用）
/// 只登记 observe/unobserve 调用，交叉事件由调用方显式回传
#[derive(Debug, Default)]
pub struct RecordingViewport {
    pub observed: Vec<NodeId>,
    pub unobserved: Vec<NodeId>,
    pub disconnected: bool,
}

impl RecordingViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 节点当前是否处于观察中
    pub fn is_observed(&self, node: NodeId) -> bool {
        let observed = self.observed.iter().filter(|&&n| n == node).count();
        let unobserved = self.unobserved.iter().filter(|&&n| n == node).count();
        observed > unobserved
    }

    /// 当前观察中的节点（保序去重）
    pub fn currently_observed(&self) -> Vec<NodeId> {
        let mut seen = Vec::new();
        for &node in &self.observed {
            if self.is_observed(node) && !seen.contains(&node) {
                seen.push(node);
            }
        }
        seen
    }
}

impl super::ViewportObserver for RecordingViewport {
    fn observe(&mut self, node: NodeId) {
        self.observed.push(node);
    }

    fn unobserve(&mut self, node: NodeId) {
        self.unobserved.push(node);
    }

    fn disconnect(&mut self) {
        self.disconnected = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_selector_query() {
        // 测试场景：类选择器查询与逗号列表
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let a = dom.add_element(root, "div", &["feed-shared-update-v2"], "");
        let b = dom.add_element(root, "div", &["jobs-job-card"], "");
        dom.add_element(root, "div", &["unrelated"], "");

        let found = dom.query_selector_all(".feed-shared-update-v2,.jobs-job-card");
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn test_attr_and_not_selector() {
        // 测试场景：[attr] 与 :not([attr]) 组合
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let marked = dom.add_element(root, "div", &["jobs-job-card"], "");
        let unmarked = dom.add_element(root, "div", &["jobs-job-card"], "");
        dom.set_attribute(marked, "data-filtered", "true");

        assert_eq!(dom.query_selector_all("[data-filtered]"), vec![marked]);
        assert_eq!(
            dom.query_selector_all(".jobs-job-card:not([data-filtered])"),
            vec![unmarked]
        );
    }

    #[test]
    fn test_text_content_concatenates_subtree() {
        // 测试场景：子树文本拼接
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let post = dom.add_element(root, "div", &["feed-shared-update-v2"], "");
        dom.add_element(post, "span", &[], "We're hiring");
        dom.add_element(post, "span", &[], "based in Toronto");
        assert_eq!(dom.text_content(post), "We're hiring based in Toronto");
    }

    #[test]
    fn test_closest_walks_ancestors() {
        // 测试场景：closest 含自身向上查找
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let header = dom.add_element(root, "div", &["feed-shared-actor__name"], "");
        let inner = dom.add_element(header, "span", &["feed-shared-text"], "");
        assert_eq!(dom.closest(inner, ".feed-shared-actor__name"), Some(header));
        assert_eq!(dom.closest(root, ".feed-shared-actor__name"), None);
    }

    #[test]
    fn test_remove_node_drops_subtree() {
        // 测试场景：摘除节点连同子树
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let post = dom.add_element(root, "div", &["feed-shared-update-v2"], "");
        let child = dom.add_element(post, "span", &[], "text");
        dom.remove_node(post);
        assert!(!dom.exists(post));
        assert!(!dom.exists(child));
        assert!(dom.query_selector_all(".feed-shared-update-v2").is_empty());
    }

    #[test]
    fn test_style_text_parsing_and_clear() {
        // 测试场景：cssText 解析与单属性清除
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let node = dom.add_element(root, "div", &[], "");
        dom.set_style_text(node, "position: absolute; top: 0; background: rgba(255, 255, 255, 0.8);");
        assert_eq!(dom.style_of(node, "position").as_deref(), Some("absolute"));
        assert_eq!(dom.style_of(node, "background").as_deref(), Some("rgba(255, 255, 255, 0.8)"));
        dom.set_style(node, "position", "");
        assert_eq!(dom.computed_style(node, "position"), "static");
    }
}
