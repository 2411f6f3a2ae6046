//! 容器测试共享的夹具

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::bean::BeanClass;
use crate::bean_factory::BeanFactory;
use crate::error::{BeansError, BeansResult};
use crate::lifecycle::{BeanFactoryAware, InitializingBean};
use crate::value::BeanValue;

/// 生命周期可观测的普通 Bean，人员记录风格
#[derive(Default)]
pub struct TestBean {
    name: RwLock<Option<String>>,
    age: RwLock<i64>,
    touchy: RwLock<Option<String>>,
    spouse: RwLock<Option<Arc<TestBean>>>,
    numbers: RwLock<Vec<i64>>,
    factory: RwLock<Option<Arc<dyn BeanFactory>>>,
    events: RwLock<Vec<&'static str>>,
}

impl TestBean {
    pub fn name(&self) -> Option<String> {
        self.name.read().clone()
    }

    pub fn age(&self) -> i64 {
        *self.age.read()
    }

    pub fn touchy(&self) -> Option<String> {
        self.touchy.read().clone()
    }

    pub fn spouse(&self) -> Option<Arc<TestBean>> {
        self.spouse.read().clone()
    }

    pub fn numbers(&self) -> Vec<i64> {
        self.numbers.read().clone()
    }

    pub fn bean_factory(&self) -> Option<Arc<dyn BeanFactory>> {
        self.factory.read().clone()
    }

    pub fn initialized(&self) -> bool {
        self.events.read().contains(&"afterPropertiesSet")
    }

    pub fn custom_initialized(&self) -> bool {
        self.events.read().contains(&"init")
    }

    /// 生命周期回调必须按 afterPropertiesSet、自定义初始化方法、
    /// setBeanFactory 的顺序执行
    pub fn init_order_correct(&self) -> bool {
        let events = self.events.read();
        let position = |event| events.iter().position(|e| *e == event);
        match (
            position("afterPropertiesSet"),
            position("init"),
            position("setBeanFactory"),
        ) {
            (Some(a), Some(i), Some(f)) => a < i && i < f,
            _ => false,
        }
    }

    pub fn record(&self, event: &'static str) {
        self.events.write().push(event);
    }
}

impl InitializingBean for TestBean {
    fn after_properties_set(&self) -> BeansResult<()> {
        if let Some(touchy) = self.touchy.read().as_deref() {
            if touchy.contains('.') {
                return Err(BeansError::fatal_msg(format!(
                    "Touchy value '{touchy}' must not contain a '.'"
                )));
            }
        }
        self.record("afterPropertiesSet");
        Ok(())
    }
}

impl BeanFactoryAware for TestBean {
    fn set_bean_factory(&self, factory: Arc<dyn BeanFactory>) -> BeansResult<()> {
        *self.factory.write() = Some(factory);
        self.record("setBeanFactory");
        Ok(())
    }
}

/// [`TestBean`] 的类元数据，共享以保证同一测试内各定义的类身份一致
pub fn test_bean_class() -> Arc<BeanClass> {
    static CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
        BeanClass::builder::<TestBean>("TestBean")
            .constructor(|| Ok(TestBean::default()))
            .setter("name", |bean: &TestBean, value: String| {
                *bean.name.write() = Some(value);
                Ok(())
            })
            .setter("age", |bean: &TestBean, value: i64| {
                *bean.age.write() = value;
                Ok(())
            })
            .setter("touchy", |bean: &TestBean, value: String| {
                *bean.touchy.write() = Some(value);
                Ok(())
            })
            .setter("spouse", |bean: &TestBean, value: Arc<TestBean>| {
                *bean.spouse.write() = Some(value);
                Ok(())
            })
            .setter("numbers", |bean: &TestBean, value: Vec<i64>| {
                *bean.numbers.write() = value;
                Ok(())
            })
            .method("mark_custom_init", |bean: &TestBean, _args| {
                bean.record("init");
                Ok(BeanValue::Null)
            })
            .method("name", |bean: &TestBean, _args| {
                Ok(bean
                    .name()
                    .map(BeanValue::Str)
                    .unwrap_or(BeanValue::Null))
            })
            .interface("ITestBean")
            .initializing()
            .factory_aware()
            .build()
    });
    CLASS.clone()
}
