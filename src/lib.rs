//! rsjobfilter - 社交信息流职位贴地域过滤引擎

// 导出全局错误类型
pub use self::error::{RsjobfilterError, RsjResult};

// 导出配置模块
pub use self::config::{GlobalConfig, ConfigManager, CustomConfigBuilder};

// 导出规则模块核心接口
pub use self::rule::{CountryCode, LocationRule, location_rules};

// 导出编译模块核心接口
pub use self::compiler::{
    PhraseMatcher, RestrictionPattern, CompiledCountryRule, CompiledRuleLibrary,
    RuleCompiler, compiled_rule_library,
};

// 导出判定模块核心接口
pub use self::detector::{JobClassifier, LocationMatcher, PostFilterEngine, PostVerdict};

// 导出设置模块核心接口
pub use self::settings::{
    Settings, PersistedSettings, SettingsStore, JsonFileStore, MemoryStore,
    MessageSender, RuntimeMessage, load_or_default,
};

// 导出宿主抽象层核心接口
pub use self::dom::{
    DomHost, NodeId, ViewportObserver, ViewportConfig, IntersectionEntry,
    MemoryDom, RecordingViewport,
};
pub use self::scheduler::{Scheduler, ScheduledTask, TimerId, ManualScheduler};

// 导出页面侧核心接口
pub use self::obscurer::PostObscurer;
pub use self::loader::{ProgressiveLoader, ProcessContext};
pub use self::script::{ContentScript, DocumentReadyState};
pub use self::script::watchers::{Subscription, MutationWatcher, ScrollWatcher};
pub use self::popup::SettingsPanel;

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod compiler;
pub mod detector;
pub mod settings;
pub mod dom;
pub mod scheduler;
pub mod obscurer;
pub mod loader;
pub mod script;
pub mod popup;
