//! AOP 错误类型定义

use thiserror::Error;
use trellis_beans::BeansError;

/// AOP 操作结果类型
pub type AopResult<T> = Result<T, AopError>;

/// AOP 错误枚举
///
/// 配置错误在装配期快速失败；切面错误发生在调用分发期。
/// 目标或拦截器返回的容器错误原样提升，不做二次包装。
#[derive(Debug, Error)]
pub enum AopError {
    /// 代理装配配置非法
    #[error("AOP configuration error: {0}")]
    Config(String),

    /// 调用分发非法（越过链尾、未暴露的接口等）
    #[error("Aspect error: {0}")]
    Aspect(String),

    /// 当前线程没有活动的 AOP 调用
    #[error("No AOP invocation is active on the current thread")]
    NoInvocationContext,

    /// 来自容器层的错误
    #[error(transparent)]
    Beans(#[from] BeansError),
}

impl From<AopError> for BeansError {
    fn from(e: AopError) -> Self {
        match e {
            AopError::Beans(inner) => inner,
            other => BeansError::Other(anyhow::Error::new(other)),
        }
    }
}
