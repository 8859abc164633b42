//! 全局配置管理,存储所有可配置项

/// 全局配置
/// 所有数值默认值为既定产品常量
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 单批次处理的帖子数量上限
    pub batch_size: usize,
    // 批次间让出主线程的延迟（单位：毫秒）
    pub processing_delay_ms: u64,
    // 滚动安全网的防抖间隔（单位：毫秒）
    pub scroll_debounce_ms: u64,
    // 点击展示后拆除遮罩前的动画时长（单位：毫秒）
    pub reveal_animation_ms: u64,
    // 设置面板"已保存"提示的展示时长（单位：毫秒）
    pub status_display_ms: u64,
    // 地域短语后向前看的窗口宽度（单位：字符）
    pub location_window_chars: usize,
    // 视口观察者的根外边距（与宿主IntersectionObserver语义一致）
    pub viewport_root_margin: String,
    // 视口观察者的可见度阈值
    pub viewport_threshold: f64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            processing_delay_ms: 100,
            scroll_debounce_ms: 150,
            reveal_animation_ms: 300,
            status_display_ms: 2000,
            location_window_chars: 50,
            viewport_root_margin: "100px 0px".to_string(),
            viewport_threshold: 0.1,
        }
    }
}

/// 配置管理器（单例）
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn processing_delay_ms(mut self, delay: u64) -> Self {
        self.config.processing_delay_ms = delay;
        self
    }

    pub fn scroll_debounce_ms(mut self, debounce: u64) -> Self {
        self.config.scroll_debounce_ms = debounce;
        self
    }

    pub fn reveal_animation_ms(mut self, duration: u64) -> Self {
        self.config.reveal_animation_ms = duration;
        self
    }

    pub fn status_display_ms(mut self, duration: u64) -> Self {
        self.config.status_display_ms = duration;
        self
    }

    pub fn location_window_chars(mut self, window: usize) -> Self {
        self.config.location_window_chars = window;
        self
    }

    pub fn viewport_root_margin(mut self, margin: String) -> Self {
        self.config.viewport_root_margin = margin;
        self
    }

    pub fn viewport_threshold(mut self, threshold: f64) -> Self {
        self.config.viewport_threshold = threshold;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_script_constants() {
        // 测试场景：默认配置必须与既定产品常量一致
        let config = ConfigManager::get_default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.processing_delay_ms, 100);
        assert_eq!(config.scroll_debounce_ms, 150);
        assert_eq!(config.reveal_animation_ms, 300);
        assert_eq!(config.status_display_ms, 2000);
        assert_eq!(config.location_window_chars, 50);
        assert_eq!(config.viewport_root_margin, "100px 0px");
        assert!((config.viewport_threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_builder_overrides() {
        // 测试场景：构建器逐项覆盖默认值
        let config = ConfigManager::custom()
            .batch_size(3)
            .processing_delay_ms(50)
            .build();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.processing_delay_ms, 50);
        // 未覆盖项保持默认
        assert_eq!(config.scroll_debounce_ms, 150);
    }
}
