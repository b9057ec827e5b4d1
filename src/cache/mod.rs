//! 对象缓存
//!
//! 缓存后端以插件形式在进程启动前注册（见 [`declare_object_cache_plugin!`]），
//! 启动时按 `cache.type` 选择，失败时回退到进程内的 moka。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明一个缓存插件，在程序加载时注册到插件表
///
/// `$ty` 需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::AcademyError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
