//! Bean 运行时类型元数据与定义模型
//!
//! `BeanClass` 是容器的“反射面”：显式注册的无参构造函数、
//! 类型化属性 setter、可按名称调用的方法表，以及生命周期能力挂钩。
//! `BeanDefinition` 描述如何构建一个命名对象，分为带具体类的根定义
//! 和按名称继承另一个定义的子定义两种变体。

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::bean_factory::BeanFactory;
use crate::error::{BeansError, BeansResult};
use crate::lifecycle::{BeanFactoryAware, FactoryBean, InitializingBean};
use crate::property::PropertyValues;
use crate::scope::Scope;
use crate::value::{BeanValue, FromBeanValue};

/// Bean trait - 所有可以被容器管理的类型都需要实现此 trait
pub trait Bean: Any + Send + Sync {
    /// 获取 Bean 的类型名称
    fn type_name(&self) -> &'static str;

    /// 以 `Any` 形式借用，用于向具体类型的向下转型
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// 以 `Any` 形式消费共享引用，用于 `Arc` 级别的向下转型
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// 为所有满足条件的类型自动实现 Bean trait
impl<T: Any + Send + Sync> Bean for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for dyn Bean {
    // 只打印类型名，绝不触碰实例本身
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bean({})", self.type_name())
    }
}

/// 容器中流转的 Bean 实例
pub type BeanInstance = Arc<dyn Bean>;

type Constructor = Box<dyn Fn() -> BeansResult<BeanInstance> + Send + Sync>;
type Setter = Box<dyn Fn(&dyn Bean, BeanValue) -> BeansResult<()> + Send + Sync>;
type Method = Box<dyn Fn(&dyn Bean, &[BeanValue]) -> BeansResult<BeanValue> + Send + Sync>;
type InitHook = Box<dyn Fn(&dyn Bean) -> BeansResult<()> + Send + Sync>;
type AwareHook = Box<dyn Fn(&dyn Bean, Arc<dyn BeanFactory>) -> BeansResult<()> + Send + Sync>;
type FactoryHook = Box<dyn Fn(BeanInstance) -> BeansResult<Arc<dyn FactoryBean>> + Send + Sync>;

/// Bean 的运行时类元数据
///
/// 相当于 `java.lang.Class` 加 JavaBeans 内省信息的显式版本：
/// 构造、属性写入和方法调用都通过这里注册的闭包完成。
/// 生命周期能力（InitializingBean / BeanFactoryAware / FactoryBean）
/// 以显式挂钩的方式组合，而不是依赖继承层级。
pub struct BeanClass {
    name: &'static str,
    constructor: Constructor,
    setters: HashMap<String, Setter>,
    methods: HashMap<String, Method>,
    interfaces: Vec<&'static str>,
    init_hook: Option<InitHook>,
    aware_hook: Option<AwareHook>,
    factory_hook: Option<FactoryHook>,
}

impl BeanClass {
    /// 创建指定具体类型的类元数据构建器
    pub fn builder<T: Any + Send + Sync>(name: &'static str) -> ClassBuilder<T> {
        ClassBuilder {
            name,
            constructor: None,
            setters: HashMap::new(),
            methods: HashMap::new(),
            interfaces: Vec::new(),
            init_hook: None,
            aware_hook: None,
            factory_hook: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// 类名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 声明实现的接口名称
    pub fn interfaces(&self) -> &[&'static str] {
        &self.interfaces
    }

    /// 是否声明了指定属性
    pub fn has_property(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// 是否声明了指定方法
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// 通过无参构造函数实例化
    pub fn instantiate(&self) -> BeansResult<BeanInstance> {
        (self.constructor)().map_err(|e| BeansError::Instantiation {
            class: self.name.to_string(),
            source: Box::new(e),
        })
    }

    /// 写入单个属性
    pub fn set_property(
        &self,
        bean: &dyn Bean,
        name: &str,
        value: BeanValue,
    ) -> BeansResult<()> {
        let setter = self.setters.get(name).ok_or_else(|| {
            BeansError::fatal_msg(format!(
                "No property named '{}' on class '{}'",
                name, self.name
            ))
        })?;
        setter(bean, value)
    }

    /// 按名称调用方法
    pub fn invoke(
        &self,
        bean: &dyn Bean,
        method: &str,
        args: &[BeanValue],
    ) -> BeansResult<BeanValue> {
        let method_fn = self.methods.get(method).ok_or_else(|| {
            BeansError::fatal_msg(format!(
                "No method named '{}' on class '{}'",
                method, self.name
            ))
        })?;
        method_fn(bean, args)
    }

    pub(crate) fn init_hook(&self) -> Option<&InitHook> {
        self.init_hook.as_ref()
    }

    pub(crate) fn aware_hook(&self) -> Option<&AwareHook> {
        self.aware_hook.as_ref()
    }

    /// 若该类具有 FactoryBean 能力，返回其工厂视图
    pub fn as_factory_bean(&self, bean: BeanInstance) -> Option<BeansResult<Arc<dyn FactoryBean>>> {
        self.factory_hook.as_ref().map(|hook| hook(bean))
    }

    /// 该类是否具有 FactoryBean 能力
    pub fn is_factory_class(&self) -> bool {
        self.factory_hook.is_some()
    }
}

impl fmt::Debug for BeanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanClass")
            .field("name", &self.name)
            .field("properties", &self.setters.keys().collect::<Vec<_>>())
            .field("interfaces", &self.interfaces)
            .finish()
    }
}

/// BeanClass 的类型化构建器
pub struct ClassBuilder<T> {
    name: &'static str,
    constructor: Option<Constructor>,
    setters: HashMap<String, Setter>,
    methods: HashMap<String, Method>,
    interfaces: Vec<&'static str>,
    init_hook: Option<InitHook>,
    aware_hook: Option<AwareHook>,
    factory_hook: Option<FactoryHook>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

fn borrow_as<'a, T: Any + Send + Sync>(
    bean: &'a dyn Bean,
    class: &'static str,
) -> BeansResult<&'a T> {
    bean.as_any().downcast_ref::<T>().ok_or_else(|| {
        BeansError::fatal_msg(format!(
            "Instance of type '{}' does not match class '{}'",
            bean.type_name(),
            class
        ))
    })
}

impl<T: Any + Send + Sync> ClassBuilder<T> {
    /// 注册无参构造函数
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn() -> BeansResult<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Box::new(move || {
            f().map(|t| Arc::new(t) as BeanInstance)
        }));
        self
    }

    /// 注册类型化属性 setter
    ///
    /// 属性值先经 `FromBeanValue` 转换为声明类型，再交给闭包写入。
    pub fn setter<V, F>(mut self, name: &str, f: F) -> Self
    where
        V: FromBeanValue + 'static,
        F: Fn(&T, V) -> BeansResult<()> + Send + Sync + 'static,
    {
        let class = self.name;
        self.setters.insert(
            name.to_string(),
            Box::new(move |bean, value| {
                let target = borrow_as::<T>(bean, class)?;
                let converted = V::from_bean_value(value)?;
                f(target, converted)
            }),
        );
        self
    }

    /// 注册可按名称调用的方法
    pub fn method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&T, &[BeanValue]) -> BeansResult<BeanValue> + Send + Sync + 'static,
    {
        let class = self.name;
        self.methods.insert(
            name.to_string(),
            Box::new(move |bean, args| {
                let target = borrow_as::<T>(bean, class)?;
                f(target, args)
            }),
        );
        self
    }

    /// 声明实现的接口名称
    pub fn interface(mut self, name: &'static str) -> Self {
        self.interfaces.push(name);
        self
    }

    /// 声明 InitializingBean 能力（属性设置完成后回调）
    pub fn initializing(mut self) -> Self
    where
        T: InitializingBean,
    {
        let class = self.name;
        self.init_hook = Some(Box::new(move |bean| {
            borrow_as::<T>(bean, class)?.after_properties_set()
        }));
        self
    }

    /// 声明 BeanFactoryAware 能力（注入所属工厂）
    pub fn factory_aware(mut self) -> Self
    where
        T: BeanFactoryAware,
    {
        let class = self.name;
        self.aware_hook = Some(Box::new(move |bean, factory| {
            borrow_as::<T>(bean, class)?.set_bean_factory(factory)
        }));
        self
    }

    /// 声明 FactoryBean 能力（该类生产其他对象）
    pub fn factory_bean(mut self) -> Self
    where
        T: FactoryBean,
    {
        let class = self.name;
        self.factory_hook = Some(Box::new(move |bean| {
            bean.into_any()
                .downcast::<T>()
                .map(|t| t as Arc<dyn FactoryBean>)
                .map_err(|_| {
                    BeansError::fatal_msg(format!(
                        "Instance does not match factory class '{}'",
                        class
                    ))
                })
        }));
        self
    }

    /// 完成构建
    ///
    /// 未注册构造函数的类在实例化时报告实例化错误，
    /// 对应“无可访问的无参构造函数”的情形。
    pub fn build(self) -> Arc<BeanClass> {
        let name = self.name;
        let constructor = self.constructor.unwrap_or_else(|| {
            Box::new(move || {
                Err(BeansError::fatal_msg(format!(
                    "No accessible no-arg constructor registered for class '{}'",
                    name
                )))
            })
        });
        Arc::new(BeanClass {
            name: self.name,
            constructor,
            setters: self.setters,
            methods: self.methods,
            interfaces: self.interfaces,
            init_hook: self.init_hook,
            aware_hook: self.aware_hook,
            factory_hook: self.factory_hook,
        })
    }
}

/// 包装一个实例及其类元数据，提供属性写入与方法调用
///
/// 容器在构建 Bean、应用穿透属性时都通过它操作实例。
#[derive(Clone)]
pub struct BeanWrapper {
    instance: BeanInstance,
    class: Arc<BeanClass>,
}

impl BeanWrapper {
    pub fn new(instance: BeanInstance, class: Arc<BeanClass>) -> Self {
        Self { instance, class }
    }

    /// 实例化一个新对象并包装
    pub fn instantiate(class: Arc<BeanClass>) -> BeansResult<Self> {
        let instance = class.instantiate()?;
        Ok(Self { instance, class })
    }

    pub fn wrapped_instance(&self) -> &BeanInstance {
        &self.instance
    }

    pub fn class(&self) -> &Arc<BeanClass> {
        &self.class
    }

    pub fn set_property_value(&self, name: &str, value: BeanValue) -> BeansResult<()> {
        self.class.set_property(&*self.instance, name, value)
    }

    /// 批量写入已解析的属性值
    pub fn set_property_values(
        &self,
        values: impl IntoIterator<Item = (String, BeanValue)>,
    ) -> BeansResult<()> {
        for (name, value) in values {
            self.set_property_value(&name, value)?;
        }
        Ok(())
    }

    /// 按名称调用方法
    pub fn invoke(&self, method: &str, args: &[BeanValue]) -> BeansResult<BeanValue> {
        self.class.invoke(&*self.instance, method, args)
    }
}

impl fmt::Debug for BeanWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanWrapper")
            .field("class", &self.class.name())
            .finish()
    }
}

/// 根定义：具有具体类与属性
#[derive(Clone, Debug)]
pub struct RootBeanDefinition {
    class: Arc<BeanClass>,
    property_values: PropertyValues,
    scope: Scope,
    init_method: Option<String>,
}

impl RootBeanDefinition {
    pub fn new(class: Arc<BeanClass>, property_values: PropertyValues, scope: Scope) -> Self {
        Self {
            class,
            property_values,
            scope,
            init_method: None,
        }
    }

    /// 设置自定义初始化方法名（在 afterPropertiesSet 之后调用）
    pub fn with_init_method(mut self, method: impl Into<String>) -> Self {
        self.init_method = Some(method.into());
        self
    }

    pub fn class(&self) -> &Arc<BeanClass> {
        &self.class
    }

    pub fn property_values(&self) -> &PropertyValues {
        &self.property_values
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_singleton(&self) -> bool {
        self.scope.is_singleton()
    }

    pub fn init_method(&self) -> Option<&str> {
        self.init_method.as_deref()
    }

    pub(crate) fn set_property_values(&mut self, pvs: PropertyValues) {
        self.property_values = pvs;
    }

    pub(crate) fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }
}

impl PartialEq for RootBeanDefinition {
    // 纯比较，无副作用：作用域、属性值与类身份
    fn eq(&self, other: &Self) -> bool {
        self.scope == other.scope
            && Arc::ptr_eq(&self.class, &other.class)
            && self.property_values == other.property_values
    }
}

/// 子定义：按名称继承另一个定义，仅携带自身的属性覆盖
#[derive(Clone, Debug, PartialEq)]
pub struct ChildBeanDefinition {
    parent_name: String,
    property_values: PropertyValues,
    scope: Scope,
}

impl ChildBeanDefinition {
    pub fn new(
        parent_name: impl Into<String>,
        property_values: PropertyValues,
        scope: Scope,
    ) -> Self {
        Self {
            parent_name: parent_name.into(),
            property_values,
            scope,
        }
    }

    pub fn parent_name(&self) -> &str {
        &self.parent_name
    }

    pub fn property_values(&self) -> &PropertyValues {
        &self.property_values
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
}

/// Bean 定义 - 描述如何创建和管理一个命名对象
///
/// 使用带标签的和类型代替继承层级：
/// 根定义有具体类，子定义通过父定义名继承。
#[derive(Clone, Debug, PartialEq)]
pub enum BeanDefinition {
    Root(RootBeanDefinition),
    Child(ChildBeanDefinition),
}

impl BeanDefinition {
    /// 便捷构造：单例根定义
    pub fn root(class: Arc<BeanClass>, property_values: PropertyValues) -> Self {
        BeanDefinition::Root(RootBeanDefinition::new(
            class,
            property_values,
            Scope::Singleton,
        ))
    }

    /// 便捷构造：单例子定义
    pub fn child_of(parent: impl Into<String>, property_values: PropertyValues) -> Self {
        BeanDefinition::Child(ChildBeanDefinition::new(
            parent,
            property_values,
            Scope::Singleton,
        ))
    }

    /// 调整作用域
    pub fn with_scope(self, scope: Scope) -> Self {
        match self {
            BeanDefinition::Root(mut root) => {
                root.set_scope(scope);
                BeanDefinition::Root(root)
            }
            BeanDefinition::Child(mut child) => {
                child.scope = scope;
                BeanDefinition::Child(child)
            }
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            BeanDefinition::Root(root) => root.scope(),
            BeanDefinition::Child(child) => child.scope(),
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.scope().is_singleton()
    }

    pub fn property_values(&self) -> &PropertyValues {
        match self {
            BeanDefinition::Root(root) => root.property_values(),
            BeanDefinition::Child(child) => child.property_values(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{test_bean_class, TestBean};

    #[test]
    fn test_wrapper_sets_properties_and_invokes() {
        let class = test_bean_class();
        let wrapper = BeanWrapper::instantiate(class).unwrap();
        wrapper
            .set_property_values([
                ("name".to_string(), BeanValue::from("Rod")),
                ("age".to_string(), BeanValue::Int(31)),
            ])
            .unwrap();

        let bean = wrapper.wrapped_instance();
        let tb = bean.as_ref().as_any().downcast_ref::<TestBean>().unwrap();
        assert_eq!(tb.name().as_deref(), Some("Rod"));
        assert_eq!(tb.age(), 31);

        // 文本属性值允许转换为数值
        wrapper
            .set_property_value("age", BeanValue::from("32"))
            .unwrap();
        assert_eq!(tb.age(), 32);

        let result = wrapper.invoke("mark_custom_init", &[]).unwrap();
        assert_eq!(result, BeanValue::Null);
        assert!(tb.custom_initialized());
    }

    #[test]
    fn test_instance_handle_reports_pointee_type() {
        // 通过 Arc 句柄访问时必须落到被指对象，而不是句柄本身
        let class = test_bean_class();
        let wrapper = BeanWrapper::instantiate(class).unwrap();
        let bean = wrapper.wrapped_instance();

        let reported = bean.as_ref().type_name();
        assert!(reported.ends_with("TestBean"), "{}", reported);
        assert!(bean.as_ref().as_any().downcast_ref::<TestBean>().is_some());

        let shown = format!("{:?}", bean);
        assert!(shown.contains("TestBean"), "{}", shown);
    }

    #[test]
    fn test_unknown_property_is_fatal() {
        let class = test_bean_class();
        let wrapper = BeanWrapper::instantiate(class).unwrap();
        let err = wrapper
            .set_property_value("nonexistent", BeanValue::Null)
            .unwrap_err();
        assert!(matches!(err, BeansError::Fatal { .. }));
    }

    #[test]
    fn test_missing_constructor_reports_instantiation_error() {
        struct NoCtor;
        let class = BeanClass::builder::<NoCtor>("NoCtor").build();
        let err = class.instantiate().unwrap_err();
        assert!(matches!(err, BeansError::Instantiation { .. }));
    }

    #[test]
    fn test_definition_equality_is_pure() {
        let class = test_bean_class();
        let pvs = PropertyValues::new().with("name", "Rod");
        let d1 = BeanDefinition::Root(RootBeanDefinition::new(
            class.clone(),
            pvs.clone(),
            Scope::Singleton,
        ));
        let d2 = BeanDefinition::Root(RootBeanDefinition::new(
            class.clone(),
            pvs.clone(),
            Scope::Prototype,
        ));

        // 比较不得修改任何一方的作用域
        assert_ne!(d1, d2);
        assert!(d1.is_singleton());
        assert!(!d2.is_singleton());
        assert_eq!(
            d1,
            BeanDefinition::Root(RootBeanDefinition::new(class, pvs, Scope::Singleton))
        );
    }
}
