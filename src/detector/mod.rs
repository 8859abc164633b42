//! 检测模块：职位贴分类器、地域匹配器与过滤判定引擎

pub mod classifier;
pub mod matcher;
pub mod detector;

pub use classifier::JobClassifier;
pub use matcher::LocationMatcher;
pub use detector::{PostFilterEngine, PostVerdict};
