//! Academy Admin - 语言学校后台管理服务
//!
//! 基于 Actix Web 与 SeaORM 构建，报名、课程与基础资料都通过声明式的资源描述符驱动。
//!
//! # 架构
//! - `admin`: 通用后台面板（描述符、查询计划、渲染、校验、导出）
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod admin;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
