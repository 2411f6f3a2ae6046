//! 代理测试共享的夹具

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use trellis_beans::{BeanClass, BeanInstance, BeansError, BeanValue};

/// 带接口声明且调用次数可观测的目标对象
pub struct Person {
    name: RwLock<String>,
    partner: RwLock<Option<BeanInstance>>,
    calls: AtomicUsize,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: RwLock::new(name.into()),
            partner: RwLock::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_partner(&self, partner: BeanInstance) {
        *self.partner.write() = Some(partner);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// [`Person`] 的类元数据，声明 `IPerson` 接口
pub fn person_class() -> Arc<BeanClass> {
    static CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
        BeanClass::builder::<Person>("Person")
            .constructor(|| Ok(Person::new("anonymous")))
            .interface("IPerson")
            .setter("name", |person: &Person, value: String| {
                *person.name.write() = value;
                Ok(())
            })
            .method("name", |person: &Person, _args| {
                person.calls.fetch_add(1, Ordering::SeqCst);
                Ok(BeanValue::Str(person.name.read().clone()))
            })
            .method("set_name", |person: &Person, args| {
                match args.first() {
                    Some(BeanValue::Str(name)) => {
                        person.calls.fetch_add(1, Ordering::SeqCst);
                        *person.name.write() = name.clone();
                        Ok(BeanValue::Null)
                    }
                    other => Err(BeansError::fatal_msg(format!(
                        "set_name expects a string argument, got {other:?}"
                    ))),
                }
            })
            .method("partner", |person: &Person, _args| {
                Ok(person
                    .partner
                    .read()
                    .clone()
                    .map(BeanValue::Instance)
                    .unwrap_or(BeanValue::Null))
            })
            .build()
    });
    CLASS.clone()
}
