// trellis-beans: Bean 容器与依赖解析引擎
//
// 提供基于命名定义的对象装配，支持：
// - 单例和原型作用域
// - 属性注入与按名称的引用解析（含循环引用）
// - 定义继承（根/子定义合并）
// - 生命周期回调与工厂 Bean
// - TOML 定义读取

pub mod bean;
pub mod bean_factory;
pub mod constants;
pub mod container;
pub mod definition_reader;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod property;
pub mod scope;
pub mod utils;
pub mod value;

#[cfg(test)]
pub mod test_fixtures;

// 重新导出常用类型
pub use bean::{
    Bean, BeanClass, BeanDefinition, BeanInstance, BeanWrapper, ChildBeanDefinition,
    ClassBuilder, RootBeanDefinition,
};
pub use bean_factory::{
    BeanDefinitionRegistry, BeanFactory, BeanFactoryExt, ListableBeanFactory,
    StaticBeanDefinitionRegistry,
};
pub use constants::FACTORY_BEAN_PREFIX;
pub use container::DefaultBeanFactory;
pub use definition_reader::{ClassRegistry, DefinitionReader};
pub use error::{BeansError, BeansResult};
pub use lifecycle::{BeanFactoryAware, FactoryBean, InitializingBean};
pub use logging::{LogFormat, LoggingConfig};
pub use property::{PropertyValue, PropertyValues};
pub use scope::Scope;
pub use value::{BeanValue, FromBeanValue};

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::bean::{
        Bean, BeanClass, BeanDefinition, BeanInstance, BeanWrapper, ClassBuilder,
    };
    pub use crate::bean_factory::{
        BeanDefinitionRegistry, BeanFactory, BeanFactoryExt, ListableBeanFactory,
        StaticBeanDefinitionRegistry,
    };
    pub use crate::container::DefaultBeanFactory;
    pub use crate::definition_reader::{ClassRegistry, DefinitionReader};
    pub use crate::error::{BeansError, BeansResult};
    pub use crate::lifecycle::{BeanFactoryAware, FactoryBean, InitializingBean};
    pub use crate::property::{PropertyValue, PropertyValues};
    pub use crate::scope::Scope;
    pub use crate::value::{BeanValue, FromBeanValue};
    // Re-export anyhow for convenience
    pub use anyhow::{anyhow, Context};
}
