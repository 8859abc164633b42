//! 规则编译模块
//! 将静态规则表预编译为可直接匹配的结构（每个(国家,短语)只编译一次，
//! 避免每次分类调用重建正则）

pub mod pattern;
pub mod compiler;
pub mod global;

pub use pattern::{PhraseMatcher, RestrictionPattern, CompiledCountryRule, CompiledRuleLibrary};
pub use compiler::RuleCompiler;
pub use global::compiled_rule_library;
