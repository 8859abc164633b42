//! 地域规则模块：国家代码、规则数据模型与静态规则表

pub mod model;
pub mod table;

pub use model::{CountryCode, LocationRule};
pub use table::location_rules;
