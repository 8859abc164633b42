//! 设置持久化存储
//! 宿主存储（扩展安装范围内的键值存储）抽象为 SettingsStore 特质，
//! 任何读取失败均降级为默认设置，初始化永不因存储故障阻塞

use std::fs;
use std::path::PathBuf;

use super::model::{PersistedSettings, Settings};
use crate::error::{RsjResult, RsjobfilterError};

/// 设置存储特质
pub trait SettingsStore {
    /// 读取持久化设置（键可部分缺失）
    fn load(&self) -> RsjResult<PersistedSettings>;

    /// 整体覆盖写入
    fn save(&mut self, settings: &Settings) -> RsjResult<()>;
}

/// 读取并降级：存储故障时记录告警并返回默认设置
pub fn load_or_default(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(persisted) => persisted.merge_with_defaults(),
        Err(e) => {
            log::warn!("设置读取失败，使用默认设置：{}", e);
            Settings::default()
        }
    }
}

/// JSON 文件存储实现
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> RsjResult<PersistedSettings> {
        // 文件不存在视为首次安装，返回全缺失而非错误
        if !self.path.exists() {
            return Ok(PersistedSettings::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        let persisted = serde_json::from_str(&raw)?;
        Ok(persisted)
    }

    fn save(&mut self, settings: &Settings) -> RsjResult<()> {
        let persisted = PersistedSettings::from(*settings);
        let raw = serde_json::to_string_pretty(&persisted)?;
        fs::write(&self.path, raw).map_err(|e| {
            RsjobfilterError::SettingsSaveError(format!("{}：{}", self.path.display(), e))
        })
    }
}

/// 内存存储实现（测试与演示用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    persisted: PersistedSettings,
    // 注入读取故障，验证降级路径
    pub fail_load: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            persisted: PersistedSettings::from(settings),
            fail_load: false,
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> RsjResult<PersistedSettings> {
        if self.fail_load {
            return Err(RsjobfilterError::SettingsLoadError(
                "注入的存储故障".to_string(),
            ));
        }
        Ok(self.persisted.clone())
    }

    fn save(&mut self, settings: &Settings) -> RsjResult<()> {
        self.persisted = PersistedSettings::from(*settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::CountryCode;

    #[test]
    fn test_memory_store_round_trip() {
        // 测试场景：保存后读取并入得到同一设置
        let mut store = MemoryStore::new();
        let settings = Settings {
            country: CountryCode::NZ,
            show_remote: false,
        };
        store.save(&settings).unwrap();
        assert_eq!(load_or_default(&store), settings);
    }

    #[test]
    fn test_load_failure_degrades_to_defaults() {
        // 测试场景：读取故障降级为默认设置而非报错
        let store = MemoryStore {
            fail_load: true,
            ..MemoryStore::new()
        };
        assert_eq!(load_or_default(&store), Settings::default());
    }

    #[test]
    fn test_json_file_store_missing_file_is_first_install() {
        // 测试场景：文件不存在等价于首次安装（全默认）
        let store = JsonFileStore::new(PathBuf::from("/nonexistent/rsjobfilter-settings.json"));
        let persisted = store.load().unwrap();
        assert!(persisted.country.is_none());
        assert!(persisted.show_remote.is_none());
    }

    #[test]
    fn test_json_file_store_round_trip() {
        // 测试场景：JSON 文件写入后读取一致
        let path = std::env::temp_dir().join("rsjobfilter_store_test.json");
        let mut store = JsonFileStore::new(path.clone());
        let settings = Settings {
            country: CountryCode::EU,
            show_remote: true,
        };
        store.save(&settings).unwrap();
        assert_eq!(load_or_default(&store), settings);
        let _ = fs::remove_file(path);
    }
}
