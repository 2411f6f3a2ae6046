//! Bean 生命周期接口
//!
//! 容器在属性注入完成后按固定顺序回调：
//! 1. `InitializingBean::after_properties_set`
//! 2. 定义中声明的自定义初始化方法
//! 3. `BeanFactoryAware::set_bean_factory`

use std::sync::Arc;

use crate::bean::{BeanClass, BeanInstance};
use crate::bean_factory::BeanFactory;
use crate::error::BeansResult;
use crate::property::PropertyValues;

/// 属性设置完成后的初始化回调
pub trait InitializingBean: Send + Sync {
    /// 所有属性注入完成后调用，失败则中止该 Bean 的创建
    fn after_properties_set(&self) -> BeansResult<()>;
}

/// 需要感知所属工厂的 Bean
pub trait BeanFactoryAware: Send + Sync {
    /// 注入创建该 Bean 的工厂引用
    fn set_bean_factory(&self, factory: Arc<dyn BeanFactory>) -> BeansResult<()>;
}

/// 生产其他对象的工厂 Bean
///
/// 按名称获取该 Bean 时返回的是 `object()` 的产物而不是工厂本身；
/// 加 `&` 前缀可以取回工厂实例。
pub trait FactoryBean: Send + Sync {
    /// 返回该工厂管理的对象
    fn object(&self) -> BeansResult<BeanInstance>;

    /// 产物是否为单例（每次返回同一实例）
    fn is_singleton(&self) -> bool {
        true
    }

    /// 要应用到产物上的穿透属性值，仅支持普通值
    fn pass_through_property_values(&self) -> Option<PropertyValues> {
        None
    }

    /// 产物的类元数据，用于应用穿透属性
    fn product_class(&self) -> Option<Arc<BeanClass>> {
        None
    }
}
