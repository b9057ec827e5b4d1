//! 配置管理
//!
//! 静态配置来自 `config.toml`、`config.{APP_ENV}.toml` 与 `ACADEMY_` 前缀的环境变量，
//! 运行期可修改的配置见 `services::system::DynamicConfig`。

mod r#impl;
mod structs;

pub use structs::*;
