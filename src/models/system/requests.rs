use serde::Deserialize;
use ts_rs::TS;

/// 更新配置请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct UpdateSettingRequest {
    pub value: String,
}
