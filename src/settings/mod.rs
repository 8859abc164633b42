//! 设置模块：设置模型、持久化存储与跨页面消息

pub mod model;
pub mod store;
pub mod message;

pub use model::{PersistedSettings, Settings};
pub use store::{JsonFileStore, MemoryStore, SettingsStore, load_or_default};
pub use message::{MessageSender, RuntimeMessage};
