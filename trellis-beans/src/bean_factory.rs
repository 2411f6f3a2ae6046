//! Bean Factory - 核心容器接口
//!
//! `BeanDefinitionRegistry` 是定义的只读来源，`BeanFactory` 是按名称
//! 获取 Bean 的消费端口，`ListableBeanFactory` 追加枚举能力。
//! 工厂可以有父工厂，仅在本地找不到定义时委托。

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::bean::{Bean, BeanClass, BeanDefinition, BeanInstance};
use crate::error::{BeansError, BeansResult};

/// Bean 定义的只读注册表
pub trait BeanDefinitionRegistry: Send + Sync {
    /// 按名称查找定义
    fn bean_definition(&self, name: &str) -> BeansResult<BeanDefinition>;

    /// 是否包含指定名称的定义
    fn contains_definition(&self, name: &str) -> bool;

    /// 所有已注册的定义名称
    fn definition_names(&self) -> Vec<String>;
}

/// 基于内存映射的可写注册表
///
/// 支持可选的默认父定义名：查找失败时尝试
/// 返回一个继承默认父定义的空子定义。
#[derive(Default)]
pub struct StaticBeanDefinitionRegistry {
    definitions: RwLock<HashMap<String, BeanDefinition>>,
    default_parent: Option<String>,
}

impl StaticBeanDefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置默认父定义名
    pub fn with_default_parent(mut self, parent: impl Into<String>) -> Self {
        self.default_parent = Some(parent.into());
        self
    }

    /// 注册一个定义，重名直接覆盖
    pub fn register_bean_definition(&self, name: impl Into<String>, definition: BeanDefinition) {
        let name = name.into();
        tracing::debug!(bean = %name, "Registering bean definition");
        self.definitions.write().insert(name, definition);
    }
}

impl std::fmt::Debug for StaticBeanDefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticBeanDefinitionRegistry")
            .field("definitions", &self.definition_names())
            .field("default_parent", &self.default_parent)
            .finish()
    }
}

impl BeanDefinitionRegistry for StaticBeanDefinitionRegistry {
    fn bean_definition(&self, name: &str) -> BeansResult<BeanDefinition> {
        if let Some(definition) = self.definitions.read().get(name) {
            return Ok(definition.clone());
        }
        if let Some(parent) = &self.default_parent {
            if parent != name {
                tracing::trace!(bean = %name, parent = %parent, "Falling back to default parent definition");
                return Ok(BeanDefinition::child_of(
                    parent.clone(),
                    crate::property::PropertyValues::new(),
                ));
            }
        }
        Err(BeansError::NoSuchBeanDefinition {
            name: name.to_string(),
        })
    }

    fn contains_definition(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }

    fn definition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Bean Factory trait - 定义容器的消费端核心接口
pub trait BeanFactory: Send + Sync {
    /// 通过名称获取 Bean
    ///
    /// 名称可以是定义名、别名或 `&` 前缀的工厂解引用。
    fn get_bean(&self, name: &str) -> BeansResult<BeanInstance>;

    /// 检查是否包含指定名称的 Bean（含父工厂）
    fn contains_bean(&self, name: &str) -> bool;

    /// 指定名称的 Bean 是否为单例
    fn is_singleton(&self, name: &str) -> BeansResult<bool>;

    /// 指定名称 Bean 的类元数据（来自合并后的根定义）
    fn bean_class(&self, name: &str) -> BeansResult<Arc<BeanClass>>;

    /// 若该工厂支持枚举则返回枚举视图
    fn as_listable(&self) -> Option<&dyn ListableBeanFactory> {
        None
    }
}

/// 类型化获取的扩展方法
pub trait BeanFactoryExt: BeanFactory {
    /// 获取 Bean 并向下转型为指定具体类型
    fn get_bean_of<T: Any + Send + Sync>(&self, name: &str) -> BeansResult<Arc<T>> {
        let instance = self.get_bean(name)?;
        let actual = instance.as_ref().type_name().to_string();
        instance
            .into_any()
            .downcast::<T>()
            .map_err(|_| BeansError::BeanNotOfRequiredType {
                name: name.to_string(),
                required: std::any::type_name::<T>(),
                actual,
            })
    }
}

impl<F: BeanFactory + ?Sized> BeanFactoryExt for F {}

/// 可枚举的 Bean Factory
///
/// 仅报告本工厂的定义，不级联父工厂。
pub trait ListableBeanFactory: BeanFactory {
    /// 所有定义名称
    fn bean_names(&self) -> Vec<String>;

    /// 定义数量
    fn bean_definition_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValues;
    use crate::test_fixtures::test_bean_class;

    #[test]
    fn test_registry_register_and_lookup() {
        let registry = StaticBeanDefinitionRegistry::new();
        registry.register_bean_definition(
            "rod",
            BeanDefinition::root(test_bean_class(), PropertyValues::new().with("name", "Rod")),
        );

        assert!(registry.contains_definition("rod"));
        assert!(matches!(
            registry.bean_definition("rod").unwrap(),
            BeanDefinition::Root(_)
        ));
        assert!(matches!(
            registry.bean_definition("missing").unwrap_err(),
            BeansError::NoSuchBeanDefinition { .. }
        ));
        assert_eq!(registry.definition_names(), vec!["rod".to_string()]);
    }

    #[test]
    fn test_registry_default_parent_fallback() {
        let registry = StaticBeanDefinitionRegistry::new().with_default_parent("template");
        registry.register_bean_definition(
            "template",
            BeanDefinition::root(test_bean_class(), PropertyValues::new()),
        );

        let definition = registry.bean_definition("anything").unwrap();
        match definition {
            BeanDefinition::Child(child) => assert_eq!(child.parent_name(), "template"),
            other => panic!("expected child definition, got {other:?}"),
        }
    }
}
