//! 容器错误类型
//!
//! 使用可判别的错误枚举代替异常继承体系：调用方可以直接对
//! “未找到”与“致命错误”进行模式匹配，而不依赖错误类型的层级关系。

use thiserror::Error;

/// 框架统一的 Result 别名
pub type BeansResult<T> = std::result::Result<T, BeansError>;

/// Bean 容器错误
///
/// 只有 `NoSuchBeanDefinition` 是可恢复的（允许回退到父工厂查找），
/// 其余错误一律立即向调用方传播。
#[derive(Debug, Error)]
pub enum BeansError {
    /// 请求的 Bean 定义不存在
    #[error("No bean named '{name}' is defined")]
    NoSuchBeanDefinition { name: String },

    /// Bean 的实际类型不满足调用方要求的类型
    #[error("Bean named '{name}' must be of type '{required}', but was actually '{actual}'")]
    BeanNotOfRequiredType {
        name: String,
        required: &'static str,
        actual: String,
    },

    /// 通过 `&` 前缀请求工厂对象，但该 Bean 不是 FactoryBean
    #[error("Bean named '{name}' is not a factory bean and cannot be dereferenced")]
    BeanIsNotAFactory { name: String },

    /// 无法实例化 Bean（构造函数失败）
    #[error("Could not instantiate class '{class}'")]
    Instantiation {
        class: String,
        #[source]
        source: Box<BeansError>,
    },

    /// 致命的 Bean 错误：属性设置、引用解析、生命周期回调失败等
    #[error("{message}")]
    Fatal {
        message: String,
        #[source]
        source: Option<Box<BeansError>>,
    },

    /// Bean 定义本身非法（继承环、类型转换失败、未知类等）
    #[error("Bean definition store error: {message}")]
    DefinitionStore { message: String },

    /// 其他错误（用户回调等）
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BeansError {
    /// 构造一个带原因的致命错误
    pub fn fatal(message: impl Into<String>, source: BeansError) -> Self {
        BeansError::Fatal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// 构造一个不带原因的致命错误
    pub fn fatal_msg(message: impl Into<String>) -> Self {
        BeansError::Fatal {
            message: message.into(),
            source: None,
        }
    }

    /// 是否为“未找到”错误（唯一允许父工厂回退的错误种类）
    pub fn is_not_found(&self) -> bool {
        matches!(self, BeansError::NoSuchBeanDefinition { .. })
    }
}
