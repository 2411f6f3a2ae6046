//! AOP 代理引擎
//!
//! `ProxyConfig` 是可共享、可并发修改的装配状态；`Proxy` 在每次
//! 调用时对链做快照，使进行中的调用不受并发修改影响，而后续
//! 调用看到新链。

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use trellis_beans::{BeanClass, BeanInstance, BeanValue};

use crate::advice::{Advice, MethodInterceptor, MethodKey};
use crate::context::{ContextGuard, CurrentInvocation};
use crate::error::{AopError, AopResult};
use crate::invocation::MethodInvocation;

/// 被代理的目标对象及其类元数据
#[derive(Clone)]
pub struct TargetObject {
    instance: BeanInstance,
    class: Arc<BeanClass>,
}

impl TargetObject {
    pub fn new(instance: BeanInstance, class: Arc<BeanClass>) -> Self {
        Self { instance, class }
    }

    pub fn instance(&self) -> &BeanInstance {
        &self.instance
    }

    pub fn class(&self) -> &Arc<BeanClass> {
        &self.class
    }
}

/// 代理装配配置
///
/// 所有字段内部加锁，多个代理可以共享同一份配置。
#[derive(Default)]
pub struct ProxyConfig {
    chain: RwLock<Vec<Advice>>,
    interfaces: RwLock<BTreeSet<String>>,
    expose_invocation: RwLock<bool>,
    target: RwLock<Option<TargetObject>>,
}

impl ProxyConfig {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 带目标构造；未显式声明接口时收集目标类声明的接口
    pub fn with_target(target: TargetObject) -> Arc<Self> {
        let config = Self::new();
        config.set_target(target);
        config
    }

    pub fn set_target(&self, target: TargetObject) {
        let mut interfaces = self.interfaces.write();
        if interfaces.is_empty() {
            interfaces.extend(target.class().interfaces().iter().map(|s| s.to_string()));
        }
        drop(interfaces);
        *self.target.write() = Some(target);
    }

    pub fn target(&self) -> Option<TargetObject> {
        self.target.read().clone()
    }

    pub fn add_interface(&self, name: impl Into<String>) {
        self.interfaces.write().insert(name.into());
    }

    pub fn interfaces(&self) -> BTreeSet<String> {
        self.interfaces.read().clone()
    }

    pub fn set_expose_invocation(&self, expose: bool) {
        *self.expose_invocation.write() = expose;
    }

    pub fn expose_invocation(&self) -> bool {
        *self.expose_invocation.read()
    }

    /// 追加链尾；链上已有直接调用目标的环节时拒绝
    pub fn add_advice(&self, advice: Advice) -> AopResult<()> {
        let mut chain = self.chain.write();
        if chain.iter().any(Advice::invokes_target) {
            return Err(AopError::Config(
                "Cannot add advice after a target-invoking interceptor".to_string(),
            ));
        }
        self.register_introduction(&advice);
        chain.push(advice);
        Ok(())
    }

    /// 定点插入；invoker 之前的位置始终合法
    pub fn add_advice_at(&self, index: usize, advice: Advice) -> AopResult<()> {
        let mut chain = self.chain.write();
        if index > chain.len() {
            return Err(AopError::Config(format!(
                "Insertion index {} out of bounds for chain of length {}",
                index,
                chain.len()
            )));
        }
        if let Some(invoker) = chain.iter().position(Advice::invokes_target) {
            if index > invoker {
                return Err(AopError::Config(
                    "Cannot add advice after a target-invoking interceptor".to_string(),
                ));
            }
        }
        self.register_introduction(&advice);
        chain.insert(index, advice);
        Ok(())
    }

    pub fn add_interceptor(&self, interceptor: Arc<dyn MethodInterceptor>) -> AopResult<()> {
        self.add_advice(Advice::Interceptor(interceptor))
    }

    pub fn add_interceptor_at(
        &self,
        index: usize,
        interceptor: Arc<dyn MethodInterceptor>,
    ) -> AopResult<()> {
        self.add_advice_at(index, Advice::Interceptor(interceptor))
    }

    fn register_introduction(&self, advice: &Advice) {
        if let Advice::Introduction(introduction) = advice {
            self.interfaces
                .write()
                .extend(introduction.introduced_interfaces());
        }
    }

    /// 按身份移除，返回是否命中
    pub fn remove_interceptor(&self, interceptor: &Arc<dyn MethodInterceptor>) -> bool {
        let mut chain = self.chain.write();
        let before = chain.len();
        chain.retain(|advice| match advice {
            Advice::Interceptor(existing) => !Arc::ptr_eq(existing, interceptor),
            _ => true,
        });
        chain.len() != before
    }

    pub fn advice_count(&self) -> usize {
        self.chain.read().len()
    }

    pub(crate) fn snapshot_chain(&self) -> Arc<[Advice]> {
        Arc::from(self.chain.read().as_slice())
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("advice_count", &self.advice_count())
            .field("interfaces", &self.interfaces())
            .field("expose_invocation", &self.expose_invocation())
            .finish()
    }
}

/// 代理构建器：校验配置并产出可调用的代理
pub struct AopProxy {
    config: Arc<ProxyConfig>,
}

impl AopProxy {
    pub fn new(config: Arc<ProxyConfig>) -> AopResult<Self> {
        if config.advice_count() == 0 {
            return Err(AopError::Config(
                "Cannot create proxy without interceptors".to_string(),
            ));
        }
        if config.interfaces().is_empty() && config.target().is_none() {
            return Err(AopError::Config(
                "Cannot create proxy without interfaces or a target".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn get_proxy(&self) -> Arc<Proxy> {
        Proxy::new(self.config.clone())
    }
}

impl fmt::Debug for AopProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AopProxy").field("config", &self.config).finish()
    }
}

/// 可调用的代理对象
pub struct Proxy {
    config: Arc<ProxyConfig>,
    me: Weak<Proxy>,
}

impl Proxy {
    fn new(config: Arc<ProxyConfig>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            config,
            me: me.clone(),
        })
    }

    pub fn config(&self) -> &Arc<ProxyConfig> {
        &self.config
    }

    pub fn interfaces(&self) -> BTreeSet<String> {
        self.config.interfaces()
    }

    /// 分发一次方法调用
    pub fn invoke(&self, method: &MethodKey, args: Vec<BeanValue>) -> AopResult<BeanValue> {
        if !self.config.interfaces().contains(&method.interface) {
            return Err(AopError::Aspect(format!(
                "Interface '{}' is not exposed by this proxy",
                method.interface
            )));
        }

        let me = self.me.upgrade().ok_or_else(|| {
            AopError::Aspect("Proxy dropped during invocation".to_string())
        })?;
        let chain = self.config.snapshot_chain();
        let target = self.config.target().map(|t| t.instance().clone());
        let mut invocation =
            MethodInvocation::new(me.clone(), target.clone(), method.clone(), args, chain)?;

        let _guard = if self.config.expose_invocation() {
            Some(ContextGuard::enter(CurrentInvocation {
                proxy: me.clone(),
                target: target.clone(),
                method: method.clone(),
                args: invocation.args().to_vec(),
            }))
        } else {
            None
        };

        tracing::trace!(method = %method, "Dispatching through interceptor chain");
        let result = invocation.proceed()?;

        // 目标返回自身时换成代理，保持后续调用仍被通知
        if let BeanValue::Instance(returned) = &result {
            if let Some(target) = &target {
                if Arc::ptr_eq(returned, target) {
                    return Ok(BeanValue::Instance(me as BeanInstance));
                }
            }
        }
        Ok(result)
    }
}

/// 相等当且仅当链内容相同且接口集合相同；代理永不等于其目标
impl PartialEq for Proxy {
    fn eq(&self, other: &Self) -> bool {
        *self.config.chain.read() == *other.config.chain.read()
            && self.config.interfaces() == other.config.interfaces()
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("interfaces", &self.interfaces())
            .field("advice_count", &self.config.advice_count())
            .finish()
    }
}
