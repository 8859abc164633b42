//! 全局编译规则库单例管理
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::compiler::RuleCompiler;
use super::pattern::CompiledRuleLibrary;

/// 全局编译规则库实例
/// 首次访问时编译；编译失败降级为空库并记录错误（空库拒绝所有查询）
static COMPILED_LIBRARY: Lazy<Arc<CompiledRuleLibrary>> = Lazy::new(|| {
    let library = RuleCompiler::compile().unwrap_or_else(|e| {
        log::error!("全局规则库编译失败，降级为空库：{}", e);
        CompiledRuleLibrary::default()
    });
    Arc::new(library)
});

/// 获取全局编译规则库
pub fn compiled_rule_library() -> Arc<CompiledRuleLibrary> {
    Arc::clone(&COMPILED_LIBRARY)
}
