//! 宿主页面选择器与标记属性常量
//! 选择器集合是与宿主页面的协作约定；移植到其他信息流页面时
//! 由协作方提供等价的选择器常量即可，其余逻辑不变

/// 帖子容器候选选择器
pub const POST_SELECTORS: [&str; 6] = [
    ".feed-shared-update-v2",
    ".jobs-job-card",
    ".job-card-container",
    ".jobs-search-results__list-item",
    ".update-components-actor",
    ".feed-shared-article",
];

/// 帖子内承载内容的后代选择器（遮罩目标）
pub const CONTENT_AREA_SELECTORS: [&str; 18] = [
    // 帖子主体内容
    ".feed-shared-update-v2__description-wrapper",
    ".feed-shared-article__description-container",
    ".feed-shared-text",
    ".feed-shared-update-v2__content",
    ".feed-shared-mini-update-v2__description",
    ".feed-shared-article",
    // 职位贴专属内容
    ".feed-shared-actor__description",
    ".feed-shared-actor__title",
    ".feed-shared-actor__sub-description",
    ".feed-shared-text-view",
    // 职位详情
    ".jobs-unified-top-card__content--two-pane",
    ".jobs-unified-top-card__primary-description",
    ".jobs-unified-top-card__job-title",
    ".jobs-unified-top-card__subtitle-primary",
    ".jobs-unified-top-card__description",
    // 附加内容区
    ".update-components-text",
    ".update-components-actor__meta",
    ".update-components-actor__primary-text",
];

/// 发帖人名称头部（排除遮罩）
pub const ACTOR_NAME_SELECTOR: &str = ".feed-shared-actor__name";

// 标记属性（与宿主页面语义不冲突的契约属性）
pub const ATTR_FILTERED: &str = "data-filtered";
pub const ATTR_USER_CLEARED: &str = "data-user-cleared";
pub const ATTR_FILTER_BANNER: &str = "data-filter-banner";
pub const ATTR_CONTENT_OVERLAY: &str = "data-content-overlay";

/// 逗号连接的帖子选择器列表
pub fn post_selector_list() -> String {
    POST_SELECTORS.join(",")
}

/// 帖子选择器列表，每项排除已标记 data-filtered 的元素（滚动安全网用）
pub fn unfiltered_post_selector_list() -> String {
    POST_SELECTORS
        .iter()
        .map(|s| format!("{}:not([{}])", s, ATTR_FILTERED))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_selector_list_is_comma_joined() {
        // 测试场景：选择器列表以逗号连接且保序
        let list = post_selector_list();
        assert!(list.starts_with(".feed-shared-update-v2,"));
        assert!(list.ends_with(".feed-shared-article"));
        assert_eq!(list.matches(',').count(), POST_SELECTORS.len() - 1);
    }

    #[test]
    fn test_unfiltered_list_excludes_marker_per_selector() {
        // 测试场景：:not 限定附着在每一项上而非仅末项
        let list = unfiltered_post_selector_list();
        for part in list.split(',') {
            assert!(part.ends_with(":not([data-filtered])"), "缺少排除限定：{}", part);
        }
    }
}
