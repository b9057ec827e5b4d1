use serde::Serialize;
use ts_rs::TS;

use super::entities::SystemSetting;

/// 管理员配置列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct AdminSettingsListResponse {
    pub settings: Vec<SystemSetting>,
}

/// 单个配置响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct SettingResponse {
    pub setting: SystemSetting,
}
