//! 过滤判定引擎：整合分类器与地域匹配器，输出单帖判定结果

use std::sync::Arc;

use super::classifier::JobClassifier;
use super::matcher::LocationMatcher;
use crate::compiler::{compiled_rule_library, CompiledCountryRule, CompiledRuleLibrary};
use crate::config::GlobalConfig;
use crate::settings::Settings;

/// 单帖判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostVerdict {
    NotJob,   // 非职位贴，不处理
    Allowed,  // 职位贴且地域放行
    Filtered, // 职位贴且应被遮罩
}

/// 过滤判定引擎
#[derive(Debug, Clone)]
pub struct PostFilterEngine {
    compiled: Arc<CompiledRuleLibrary>,
    config: GlobalConfig,
}

impl PostFilterEngine {
    /// 创建引擎（使用全局编译规则库）
    pub fn new(config: GlobalConfig) -> Self {
        Self {
            compiled: compiled_rule_library(),
            config,
        }
    }

    /// 创建引擎（注入自定义规则库，测试与多实例场景用）
    pub fn with_library(compiled: Arc<CompiledRuleLibrary>, config: GlobalConfig) -> Self {
        Self { compiled, config }
    }

    /// 核心判定接口
    /// 规则库缺失当前国家时降级为放行并记录告警，初始化不因此阻塞
    pub fn evaluate(&self, text: &str, settings: &Settings) -> PostVerdict {
        if !JobClassifier::is_job_post(text) {
            return PostVerdict::NotJob;
        }

        let Ok(rule) = self.compiled.get(settings.country) else {
            log::warn!("规则库缺失国家 {}，降级为放行", settings.country);
            return PostVerdict::Allowed;
        };

        if LocationMatcher::is_allowed(
            text,
            rule,
            settings.show_remote,
            self.config.location_window_chars,
        ) {
            PostVerdict::Allowed
        } else {
            PostVerdict::Filtered
        }
    }

    /// 当前国家的编译后规则（遮罩横幅需要地区标签）
    pub fn country_rule(&self, settings: &Settings) -> Option<&CompiledCountryRule> {
        self.compiled.get(settings.country).ok()
    }
}
