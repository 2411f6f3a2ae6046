//! 默认 Bean Factory 实现 - 容器的核心引擎
//!
//! 负责定义合并、实例化、引用解析、单例缓存与生命周期回调。
//! 单例创建走工厂级可重入锁：解析引用时会在同一线程上
//! 再次进入共享实例获取路径。

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::{ReentrantMutex, RwLock};

use crate::bean::{
    BeanDefinition, BeanInstance, BeanWrapper, ChildBeanDefinition, RootBeanDefinition,
};
use crate::bean_factory::{
    BeanDefinitionRegistry, BeanFactory, ListableBeanFactory,
};
use crate::constants::{is_factory_dereference, strip_factory_prefix, FACTORY_BEAN_PREFIX};
use crate::error::{BeansError, BeansResult};
use crate::lifecycle::FactoryBean;
use crate::property::PropertyValues;
use crate::utils::InFlightBeans;
use crate::value::BeanValue;

/// 默认 Bean Factory 实现
///
/// 定义来自注入的注册表；可选父工厂仅在本地定义缺失时兜底。
pub struct DefaultBeanFactory {
    registry: Arc<dyn BeanDefinitionRegistry>,
    parent: Option<Arc<dyn BeanFactory>>,
    shared_instances: RwLock<HashMap<String, BeanInstance>>,
    aliases: RwLock<HashMap<String, String>>,
    creation_lock: ReentrantMutex<()>,
    me: Weak<DefaultBeanFactory>,
}

impl DefaultBeanFactory {
    /// 创建无父工厂的实例
    pub fn new(registry: Arc<dyn BeanDefinitionRegistry>) -> Arc<Self> {
        Self::with_parent(registry, None)
    }

    /// 创建带可选父工厂的实例
    pub fn with_parent(
        registry: Arc<dyn BeanDefinitionRegistry>,
        parent: Option<Arc<dyn BeanFactory>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            registry,
            parent,
            shared_instances: RwLock::new(HashMap::new()),
            aliases: RwLock::new(HashMap::new()),
            creation_lock: ReentrantMutex::new(()),
            me: me.clone(),
        })
    }

    /// 注册别名，已绑定到其他名称时失败
    pub fn register_alias(
        &self,
        name: impl Into<String>,
        alias: impl Into<String>,
    ) -> BeansResult<()> {
        let name = name.into();
        let alias = alias.into();
        let mut aliases = self.aliases.write();
        match aliases.get(&alias) {
            Some(existing) if *existing != name => Err(BeansError::DefinitionStore {
                message: format!(
                    "Alias '{}' is already registered for bean '{}'",
                    alias, existing
                ),
            }),
            _ => {
                tracing::debug!(bean = %name, alias = %alias, "Registering alias");
                aliases.insert(alias, name);
                Ok(())
            }
        }
    }

    /// 直接指向该名称的所有别名
    pub fn aliases(&self, name: &str) -> Vec<String> {
        let mut result: Vec<String> = self
            .aliases
            .read()
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.clone())
            .collect();
        result.sort();
        result
    }

    /// 预实例化所有单例定义
    pub fn preinstantiate_singletons(&self) -> BeansResult<()> {
        for name in self.registry.definition_names() {
            let definition = self.registry.bean_definition(&name)?;
            let merged = self.merged_definition(&name, definition)?;
            if merged.is_singleton() {
                tracing::info!(bean = %name, "Pre-instantiating singleton");
                self.get_bean(&name)?;
            }
        }
        Ok(())
    }

    /// 别名解析到规范名，未命中保留原名
    fn canonical_name(&self, name: &str) -> String {
        let aliases = self.aliases.read();
        let mut current = name;
        let mut hops = 0;
        while let Some(next) = aliases.get(current) {
            current = next.as_str();
            hops += 1;
            if hops > aliases.len() {
                break;
            }
        }
        current.to_string()
    }

    fn get_bean_internal(
        &self,
        name: &str,
        in_flight: &mut InFlightBeans,
    ) -> BeansResult<BeanInstance> {
        let bean_name = strip_factory_prefix(name);
        let canonical = self.canonical_name(bean_name);
        tracing::trace!(bean = %canonical, requested = %name, "Retrieving bean");

        // 创建中的 Bean 直接返回未完成实例，支撑循环引用
        if let Some(raw) = in_flight.get(&canonical) {
            return Ok(raw);
        }

        let definition = match self.registry.bean_definition(&canonical) {
            Ok(definition) => definition,
            Err(e) if e.is_not_found() => {
                if let Some(parent) = &self.parent {
                    tracing::trace!(bean = %canonical, "Not found locally, delegating to parent factory");
                    return parent.get_bean(name);
                }
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let merged = self.merged_definition(&canonical, definition)?;
        let instance = if merged.is_singleton() {
            self.shared_instance(&canonical, &merged, in_flight)?
        } else {
            self.create_bean(&canonical, &merged, in_flight)?
        };
        self.apply_factory_semantics(name, &canonical, &merged, instance)
    }

    /// 单例获取：快路径读缓存，未命中在可重入锁内复查并创建
    fn shared_instance(
        &self,
        name: &str,
        merged: &RootBeanDefinition,
        in_flight: &mut InFlightBeans,
    ) -> BeansResult<BeanInstance> {
        if let Some(existing) = self.shared_instances.read().get(name) {
            return Ok(existing.clone());
        }

        let _guard = self.creation_lock.lock();
        if let Some(existing) = self.shared_instances.read().get(name) {
            return Ok(existing.clone());
        }

        tracing::info!(bean = %name, class = %merged.class().name(), "Creating shared bean instance");
        let created = self.create_bean(name, merged, in_flight)?;
        self.shared_instances
            .write()
            .insert(name.to_string(), created.clone());
        Ok(created)
    }

    /// 构建流程：实例化、注册创建中、解析并应用属性、生命周期回调
    fn create_bean(
        &self,
        name: &str,
        merged: &RootBeanDefinition,
        in_flight: &mut InFlightBeans,
    ) -> BeansResult<BeanInstance> {
        tracing::debug!(bean = %name, class = %merged.class().name(), "Creating bean");
        let wrapper = BeanWrapper::instantiate(merged.class().clone())?;
        in_flight.insert(name, wrapper.wrapped_instance().clone());

        let populated = self.populate_and_initialize(name, &wrapper, merged, in_flight);
        in_flight.remove(name);
        populated?;
        Ok(wrapper.wrapped_instance().clone())
    }

    fn populate_and_initialize(
        &self,
        name: &str,
        wrapper: &BeanWrapper,
        merged: &RootBeanDefinition,
        in_flight: &mut InFlightBeans,
    ) -> BeansResult<()> {
        // 解析的是合并属性的深拷贝，定义本身永不改写
        for pv in merged.property_values().iter() {
            let resolved = self.resolve_value(name, pv.value(), in_flight)?;
            wrapper.set_property_value(pv.name(), resolved)?;
        }

        let class = wrapper.class();
        if let Some(hook) = class.init_hook() {
            hook(&**wrapper.wrapped_instance()).map_err(|e| {
                BeansError::fatal(format!("Initialization of bean '{}' failed", name), e)
            })?;
        }
        if let Some(method) = merged.init_method() {
            tracing::trace!(bean = %name, method = %method, "Invoking custom init method");
            wrapper.invoke(method, &[]).map_err(|e| {
                BeansError::fatal(
                    format!("Custom init method '{}' of bean '{}' failed", method, name),
                    e,
                )
            })?;
        }
        if let Some(hook) = class.aware_hook() {
            let factory: Arc<dyn BeanFactory> = self.me.upgrade().ok_or_else(|| {
                BeansError::fatal_msg("Bean factory dropped during bean creation")
            })?;
            hook(&**wrapper.wrapped_instance(), factory)?;
        }
        Ok(())
    }

    /// 深拷贝解析属性值：Ref 换成实例，列表与映射递归
    fn resolve_value(
        &self,
        bean_name: &str,
        value: &BeanValue,
        in_flight: &mut InFlightBeans,
    ) -> BeansResult<BeanValue> {
        match value {
            BeanValue::Ref(target) => {
                tracing::trace!(bean = %bean_name, reference = %target, "Resolving bean reference");
                let resolved = self.get_bean_internal(target, in_flight).map_err(|e| {
                    BeansError::fatal(
                        format!(
                            "Can't resolve reference to bean '{}' while setting properties on bean '{}'",
                            target, bean_name
                        ),
                        e,
                    )
                })?;
                Ok(BeanValue::Instance(resolved))
            }
            BeanValue::List(items) => {
                let resolved: BeansResult<Vec<BeanValue>> = items
                    .iter()
                    .map(|item| self.resolve_value(bean_name, item, in_flight))
                    .collect();
                Ok(BeanValue::List(resolved?))
            }
            BeanValue::Map(entries) => {
                let mut resolved = std::collections::BTreeMap::new();
                for (key, item) in entries {
                    resolved.insert(key.clone(), self.resolve_value(bean_name, item, in_flight)?);
                }
                Ok(BeanValue::Map(resolved))
            }
            other => Ok(other.clone()),
        }
    }

    /// 工厂 Bean 语义：`&` 取工厂本身，否则返回产物并应用穿透属性
    fn apply_factory_semantics(
        &self,
        requested_name: &str,
        canonical: &str,
        merged: &RootBeanDefinition,
        instance: BeanInstance,
    ) -> BeansResult<BeanInstance> {
        let deref = is_factory_dereference(requested_name);
        if !merged.class().is_factory_class() {
            if deref {
                return Err(BeansError::BeanIsNotAFactory {
                    name: canonical.to_string(),
                });
            }
            return Ok(instance);
        }
        if deref {
            return Ok(instance);
        }

        let factory = self.factory_view(canonical, merged, instance)?;
        let product = factory.object()?;
        if let Some(pass_through) = factory.pass_through_property_values() {
            let product_class = factory.product_class().ok_or_else(|| {
                BeansError::fatal_msg(format!(
                    "Factory bean '{}' declares pass-through property values but no product class",
                    canonical
                ))
            })?;
            let product_wrapper = BeanWrapper::new(product.clone(), product_class);
            for pv in pass_through.iter() {
                if pv.value().contains_reference() {
                    return Err(BeansError::fatal_msg(format!(
                        "Pass-through property values of factory bean '{}' can only contain plain values",
                        canonical
                    )));
                }
                product_wrapper.set_property_value(pv.name(), pv.value().clone())?;
            }
        }
        Ok(product)
    }

    fn factory_view(
        &self,
        name: &str,
        merged: &RootBeanDefinition,
        instance: BeanInstance,
    ) -> BeansResult<Arc<dyn FactoryBean>> {
        merged
            .class()
            .as_factory_bean(instance)
            .ok_or_else(|| BeansError::BeanIsNotAFactory {
                name: name.to_string(),
            })?
    }

    /// 合并定义：根定义深拷贝；子定义沿父链折叠属性，子属性优先。
    /// 合并结果采用发起定义的作用域；父链成环判定为定义存储错误。
    fn merged_definition(
        &self,
        name: &str,
        definition: BeanDefinition,
    ) -> BeansResult<RootBeanDefinition> {
        let scope = definition.scope();
        let mut current: ChildBeanDefinition = match definition {
            BeanDefinition::Root(root) => return Ok(root),
            BeanDefinition::Child(child) => child,
        };

        let mut overrides: Vec<PropertyValues> = Vec::new();
        let mut seen = vec![name.to_string()];
        loop {
            overrides.push(current.property_values().clone());
            let parent_name = current.parent_name().to_string();
            if seen.contains(&parent_name) {
                return Err(BeansError::DefinitionStore {
                    message: format!(
                        "Cycle in parent chain of bean definition '{}': '{}' visited twice",
                        name, parent_name
                    ),
                });
            }
            seen.push(parent_name.clone());

            match self.registry.bean_definition(&parent_name)? {
                BeanDefinition::Root(root) => {
                    let mut merged_values = root.property_values().clone();
                    for pvs in overrides.iter().rev() {
                        for pv in pvs.iter() {
                            merged_values.add_or_override(pv.clone());
                        }
                    }
                    let mut merged = root;
                    merged.set_property_values(merged_values);
                    merged.set_scope(scope);
                    return Ok(merged);
                }
                BeanDefinition::Child(child) => current = child,
            }
        }
    }
}

impl BeanFactory for DefaultBeanFactory {
    fn get_bean(&self, name: &str) -> BeansResult<BeanInstance> {
        let mut in_flight = InFlightBeans::new();
        self.get_bean_internal(name, &mut in_flight)
    }

    fn contains_bean(&self, name: &str) -> bool {
        let canonical = self.canonical_name(strip_factory_prefix(name));
        if self.registry.contains_definition(&canonical) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.contains_bean(name),
            None => false,
        }
    }

    fn is_singleton(&self, name: &str) -> BeansResult<bool> {
        let canonical = self.canonical_name(strip_factory_prefix(name));
        match self.registry.bean_definition(&canonical) {
            Ok(definition) => {
                let merged = self.merged_definition(&canonical, definition)?;
                if merged.class().is_factory_class() && !is_factory_dereference(name) {
                    // 产物的单例性由工厂自己回答
                    let factory_instance =
                        self.get_bean(&format!("{}{}", FACTORY_BEAN_PREFIX, canonical))?;
                    let factory = self.factory_view(&canonical, &merged, factory_instance)?;
                    return Ok(factory.is_singleton());
                }
                Ok(merged.is_singleton())
            }
            Err(e) if e.is_not_found() => match &self.parent {
                Some(parent) => parent.is_singleton(name),
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    fn bean_class(&self, name: &str) -> BeansResult<Arc<crate::bean::BeanClass>> {
        let canonical = self.canonical_name(strip_factory_prefix(name));
        match self.registry.bean_definition(&canonical) {
            Ok(definition) => Ok(self.merged_definition(&canonical, definition)?.class().clone()),
            Err(e) if e.is_not_found() => match &self.parent {
                Some(parent) => parent.bean_class(name),
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    fn as_listable(&self) -> Option<&dyn ListableBeanFactory> {
        Some(self)
    }
}

impl ListableBeanFactory for DefaultBeanFactory {
    fn bean_names(&self) -> Vec<String> {
        self.registry.definition_names()
    }

    fn bean_definition_count(&self) -> usize {
        self.registry.definition_names().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::BeanClass;
    use crate::bean_factory::{BeanFactoryExt, StaticBeanDefinitionRegistry};
    use crate::scope::Scope;
    use crate::test_fixtures::{test_bean_class, TestBean};

    fn factory_with(
        setup: impl FnOnce(&StaticBeanDefinitionRegistry),
    ) -> Arc<DefaultBeanFactory> {
        let registry = StaticBeanDefinitionRegistry::new();
        setup(&registry);
        DefaultBeanFactory::new(Arc::new(registry))
    }

    fn rod_registry(registry: &StaticBeanDefinitionRegistry) {
        registry.register_bean_definition(
            "rod",
            BeanDefinition::root(
                test_bean_class(),
                PropertyValues::new().with("name", "Rod").with("age", 31_i64),
            ),
        );
        registry.register_bean_definition(
            "roderick",
            BeanDefinition::child_of("rod", PropertyValues::new().with("name", "Roderick")),
        );
    }

    #[test]
    fn test_singleton_identity() {
        let factory = factory_with(rod_registry);
        let first = factory.get_bean("rod").unwrap();
        let second = factory.get_bean("rod").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_request_constructs_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::thread;
        use std::time::Duration;

        let constructions = Arc::new(AtomicUsize::new(0));
        let counter = constructions.clone();
        let class = BeanClass::builder::<TestBean>("SlowBean")
            .constructor(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                // 拉长构造窗口，让并发请求撞上同一次创建
                thread::sleep(Duration::from_millis(100));
                Ok(TestBean::default())
            })
            .build();
        let factory = factory_with(|registry| {
            registry.register_bean_definition(
                "slow",
                BeanDefinition::root(class, PropertyValues::new()),
            );
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let factory = factory.clone();
                thread::spawn(move || factory.get_bean("slow").unwrap())
            })
            .collect();
        let instances: Vec<BeanInstance> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for other in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], other));
        }
    }

    #[test]
    fn test_prototype_independence() {
        let factory = factory_with(|registry| {
            registry.register_bean_definition(
                "proto",
                BeanDefinition::root(
                    test_bean_class(),
                    PropertyValues::new().with("name", "Jenny"),
                )
                .with_scope(Scope::Prototype),
            );
        });
        let first = factory.get_bean_of::<TestBean>("proto").unwrap();
        let second = factory.get_bean_of::<TestBean>("proto").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), second.name());
    }

    #[test]
    fn test_child_definition_inherits_and_overrides() {
        let factory = factory_with(rod_registry);
        let rod = factory.get_bean_of::<TestBean>("rod").unwrap();
        let roderick = factory.get_bean_of::<TestBean>("roderick").unwrap();
        assert!(!Arc::ptr_eq(&rod, &roderick));
        assert_eq!(roderick.name().as_deref(), Some("Roderick"));
        assert_eq!(roderick.age(), 31);
        assert_eq!(rod.name().as_deref(), Some("Rod"));
    }

    #[test]
    fn test_child_scope_wins_over_parent() {
        let factory = factory_with(|registry| {
            rod_registry(registry);
            registry.register_bean_definition(
                "proto-rod",
                BeanDefinition::child_of("rod", PropertyValues::new())
                    .with_scope(Scope::Prototype),
            );
        });
        assert!(factory.is_singleton("rod").unwrap());
        assert!(!factory.is_singleton("proto-rod").unwrap());
        let first = factory.get_bean("proto-rod").unwrap();
        let second = factory.get_bean("proto-rod").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_parent_chain_cycle_is_rejected() {
        let factory = factory_with(|registry| {
            registry.register_bean_definition(
                "a",
                BeanDefinition::child_of("b", PropertyValues::new()),
            );
            registry.register_bean_definition(
                "b",
                BeanDefinition::child_of("a", PropertyValues::new()),
            );
        });
        let err = factory.get_bean("a").unwrap_err();
        assert!(matches!(err, BeansError::DefinitionStore { .. }));
    }

    #[test]
    fn test_circular_singleton_references() {
        let factory = factory_with(|registry| {
            registry.register_bean_definition(
                "husband",
                BeanDefinition::root(
                    test_bean_class(),
                    PropertyValues::new()
                        .with("name", "Rod")
                        .with("spouse", BeanValue::reference("wife")),
                ),
            );
            registry.register_bean_definition(
                "wife",
                BeanDefinition::root(
                    test_bean_class(),
                    PropertyValues::new()
                        .with("name", "Kerry")
                        .with("spouse", BeanValue::reference("husband")),
                ),
            );
        });
        let husband = factory.get_bean_of::<TestBean>("husband").unwrap();
        let wife = factory.get_bean_of::<TestBean>("wife").unwrap();
        assert!(Arc::ptr_eq(&husband.spouse().unwrap(), &wife));
        assert!(Arc::ptr_eq(&wife.spouse().unwrap(), &husband));
    }

    #[test]
    fn test_not_found_and_parent_fallback() {
        let parent = factory_with(rod_registry);
        let err = parent.get_bean("nope").unwrap_err();
        assert!(matches!(err, BeansError::NoSuchBeanDefinition { ref name } if name == "nope"));

        let child = DefaultBeanFactory::with_parent(
            Arc::new(StaticBeanDefinitionRegistry::new()),
            Some(parent.clone() as Arc<dyn BeanFactory>),
        );
        let from_child = child.get_bean("rod").unwrap();
        let from_parent = parent.get_bean("rod").unwrap();
        assert!(Arc::ptr_eq(&from_child, &from_parent));
        assert!(child.get_bean("nope").is_err());
    }

    #[test]
    fn test_required_type_mismatch() {
        let factory = factory_with(rod_registry);
        let err = factory.get_bean_of::<String>("rod").unwrap_err();
        match err {
            BeansError::BeanNotOfRequiredType {
                name,
                required,
                actual,
            } => {
                assert_eq!(name, "rod");
                assert!(required.contains("String"));
                assert!(actual.contains("TestBean"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_alias_resolution() {
        let factory = factory_with(rod_registry);
        factory.register_alias("rod", "the-rod").unwrap();
        let direct = factory.get_bean("rod").unwrap();
        let aliased = factory.get_bean("the-rod").unwrap();
        assert!(Arc::ptr_eq(&direct, &aliased));
        assert_eq!(factory.aliases("rod"), vec!["the-rod".to_string()]);

        let clash = factory.register_alias("roderick", "the-rod");
        assert!(matches!(
            clash.unwrap_err(),
            BeansError::DefinitionStore { .. }
        ));
    }

    struct TestBeanFactory {
        pass_through: PropertyValues,
    }

    impl FactoryBean for TestBeanFactory {
        fn object(&self) -> BeansResult<BeanInstance> {
            Ok(Arc::new(TestBean::default()))
        }

        fn pass_through_property_values(&self) -> Option<PropertyValues> {
            if self.pass_through.is_empty() {
                None
            } else {
                Some(self.pass_through.clone())
            }
        }

        fn product_class(&self) -> Option<Arc<BeanClass>> {
            Some(test_bean_class())
        }
    }

    fn test_bean_factory_class() -> Arc<BeanClass> {
        BeanClass::builder::<TestBeanFactory>("TestBeanFactory")
            .constructor(|| {
                Ok(TestBeanFactory {
                    pass_through: PropertyValues::new().with("name", "Produced"),
                })
            })
            .factory_bean()
            .build()
    }

    #[test]
    fn test_factory_bean_product_and_dereference() {
        let factory = factory_with(|registry| {
            registry.register_bean_definition(
                "producer",
                BeanDefinition::root(test_bean_factory_class(), PropertyValues::new()),
            );
        });

        let product = factory.get_bean_of::<TestBean>("producer").unwrap();
        assert_eq!(product.name().as_deref(), Some("Produced"));

        let raw = factory.get_bean_of::<TestBeanFactory>("&producer").unwrap();
        assert!(raw.pass_through_property_values().is_some());
    }

    #[test]
    fn test_dereference_of_plain_bean_fails() {
        let factory = factory_with(rod_registry);
        let err = factory.get_bean("&rod").unwrap_err();
        assert!(matches!(err, BeansError::BeanIsNotAFactory { ref name } if name == "rod"));
    }

    #[test]
    fn test_lifecycle_callbacks_run_in_order() {
        let factory = factory_with(|registry| {
            registry.register_bean_definition(
                "lifecycle",
                match BeanDefinition::root(
                    test_bean_class(),
                    PropertyValues::new().with("name", "Lively"),
                ) {
                    BeanDefinition::Root(root) => {
                        BeanDefinition::Root(root.with_init_method("mark_custom_init"))
                    }
                    other => other,
                },
            );
        });
        let bean = factory.get_bean_of::<TestBean>("lifecycle").unwrap();
        assert!(bean.initialized());
        assert!(bean.custom_initialized());
        assert!(bean.bean_factory().is_some());
        // afterPropertiesSet 先于自定义初始化方法
        assert!(bean.init_order_correct());
    }

    #[test]
    fn test_preinstantiate_singletons() {
        let factory = factory_with(|registry| {
            rod_registry(registry);
            registry.register_bean_definition(
                "proto",
                BeanDefinition::root(test_bean_class(), PropertyValues::new())
                    .with_scope(Scope::Prototype),
            );
        });
        factory.preinstantiate_singletons().unwrap();
        let cached = factory.shared_instances.read();
        assert!(cached.contains_key("rod"));
        assert!(cached.contains_key("roderick"));
        assert!(!cached.contains_key("proto"));
    }

    #[test]
    fn test_listable_view() {
        let factory = factory_with(rod_registry);
        let listable = factory.as_listable().unwrap();
        assert_eq!(listable.bean_definition_count(), 2);
        assert_eq!(
            listable.bean_names(),
            vec!["rod".to_string(), "roderick".to_string()]
        );
    }
}
