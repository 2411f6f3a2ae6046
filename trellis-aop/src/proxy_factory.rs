//! 代理工厂
//!
//! `ProxyFactory` 是编程式装配入口：给定目标、按需插入通知、
//! 产出代理。`ProxyFactoryBean` 把同样的装配搬进容器：链从
//! Bean 名称解析，支持全局通知展开与单例/原型两种产出模式。

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use trellis_beans::{
    Bean, BeanClass, BeanFactory, BeanFactoryAware, BeanInstance, BeansResult, FactoryBean,
};

use crate::advice::{Advice, MethodInterceptor};
use crate::error::{AopError, AopResult};
use crate::interceptor::InvokerInterceptor;
use crate::proxy::{AopProxy, Proxy, ProxyConfig, TargetObject};

/// 在拦截器名称列表中展开全局通知的标记
pub const GLOBALS: &str = "*";

/// 参与全局展开的 Bean 名称前缀
pub const GLOBAL_PREFIX: &str = "g_";

/// 编程式代理装配入口
///
/// 终端 invoker 常驻链尾，追加通知的语义是插到它前面。
pub struct ProxyFactory {
    config: Arc<ProxyConfig>,
}

impl ProxyFactory {
    /// 目标类必须声明至少一个接口
    pub fn new(target: TargetObject) -> AopResult<Self> {
        if target.class().interfaces().is_empty() {
            return Err(AopError::Config(format!(
                "Target class '{}' declares no interfaces to proxy",
                target.class().name()
            )));
        }
        let config = ProxyConfig::with_target(target.clone());
        config.add_interceptor(Arc::new(InvokerInterceptor::new(target)))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Arc<ProxyConfig> {
        &self.config
    }

    pub fn add_advice(&self, advice: Advice) -> AopResult<()> {
        let index = self.config.advice_count() - 1;
        self.config.add_advice_at(index, advice)
    }

    pub fn add_interceptor(&self, interceptor: Arc<dyn MethodInterceptor>) -> AopResult<()> {
        self.add_advice(Advice::Interceptor(interceptor))
    }

    pub fn add_interceptor_at(
        &self,
        index: usize,
        interceptor: Arc<dyn MethodInterceptor>,
    ) -> AopResult<()> {
        self.config.add_interceptor_at(index, interceptor)
    }

    pub fn get_proxy(&self) -> AopResult<Arc<Proxy>> {
        Ok(AopProxy::new(self.config.clone())?.get_proxy())
    }
}

impl std::fmt::Debug for ProxyFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyFactory")
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Clone)]
enum ChainEntry {
    Advice(Advice),
    Target(TargetObject),
}

/// 链环节及其来源 Bean
#[derive(Clone)]
struct ChainSource {
    bean_name: String,
    prototype: bool,
    entry: ChainEntry,
}

/// 以 FactoryBean 形式提供代理的容器适配器
///
/// 链由 `interceptor_names` 中的 Bean 名称解析而来；`*` 展开所有
/// `g_` 前缀且为通知的 Bean；非通知 Bean 作为目标自动包上 invoker。
/// 单例模式在装配期即创建并缓存代理；原型模式每次产出新代理，
/// 且来自原型 Bean 的环节先重新解析。
pub struct ProxyFactoryBean {
    interceptor_names: RwLock<Vec<String>>,
    interfaces: RwLock<Vec<String>>,
    singleton: RwLock<bool>,
    expose_invocation: RwLock<bool>,
    factory: RwLock<Option<Arc<dyn BeanFactory>>>,
    sources: RwLock<Vec<ChainSource>>,
    cached: RwLock<Option<Arc<Proxy>>>,
}

impl Default for ProxyFactoryBean {
    fn default() -> Self {
        Self {
            interceptor_names: RwLock::new(Vec::new()),
            interfaces: RwLock::new(Vec::new()),
            singleton: RwLock::new(true),
            expose_invocation: RwLock::new(false),
            factory: RwLock::new(None),
            sources: RwLock::new(Vec::new()),
            cached: RwLock::new(None),
        }
    }
}

impl ProxyFactoryBean {
    pub fn new() -> Self {
        Self::default()
    }

    /// 逗号分隔的 Bean 名称列表
    pub fn set_interceptor_names(&self, names: &str) {
        *self.interceptor_names.write() = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }

    pub fn set_interceptor_name_list(&self, names: Vec<String>) {
        *self.interceptor_names.write() = names;
    }

    pub fn set_interfaces(&self, interfaces: Vec<String>) {
        *self.interfaces.write() = interfaces;
    }

    pub fn set_singleton(&self, singleton: bool) {
        *self.singleton.write() = singleton;
    }

    pub fn set_expose_invocation(&self, expose: bool) {
        *self.expose_invocation.write() = expose;
    }

    /// 把名称列表解析成链来源
    fn resolve_sources(&self, factory: &Arc<dyn BeanFactory>) -> AopResult<Vec<ChainSource>> {
        let names = self.interceptor_names.read().clone();
        if names.is_empty() {
            return Err(AopError::Config(
                "No interceptor names specified".to_string(),
            ));
        }
        let last = names.len() - 1;
        let mut sources = Vec::new();
        for (i, name) in names.iter().enumerate() {
            if name == GLOBALS {
                if i == last {
                    return Err(AopError::Config(
                        "Target required after globals".to_string(),
                    ));
                }
                let listable = factory.as_listable().ok_or_else(|| {
                    AopError::Config(
                        "Global interceptors require a listable bean factory".to_string(),
                    )
                })?;
                let mut globals: Vec<String> = listable
                    .bean_names()
                    .into_iter()
                    .filter(|bean_name| bean_name.starts_with(GLOBAL_PREFIX))
                    .collect();
                globals.sort();
                tracing::debug!(count = globals.len(), "Expanding global advice beans");
                for global in globals {
                    let source = resolve_one(factory, &global)?;
                    // 全局展开只收通知 Bean
                    if matches!(source.entry, ChainEntry::Advice(_)) {
                        sources.push(source);
                    }
                }
            } else {
                sources.push(resolve_one(factory, name)?);
            }
        }
        Ok(sources)
    }

    fn build_proxy(&self) -> AopResult<Arc<Proxy>> {
        let sources: Vec<ChainSource> = if *self.singleton.read() {
            self.sources.read().clone()
        } else {
            let factory_guard = self.factory.read();
            let factory = factory_guard
                .as_ref()
                .ok_or_else(|| AopError::Config("Bean factory not set".to_string()))?;
            self.sources
                .read()
                .iter()
                .map(|source| {
                    if source.prototype {
                        tracing::trace!(bean = %source.bean_name, "Re-resolving prototype chain entry");
                        resolve_one(factory, &source.bean_name)
                    } else {
                        Ok(source.clone())
                    }
                })
                .collect::<AopResult<_>>()?
        };

        let config = ProxyConfig::new();
        for interface in self.interfaces.read().iter() {
            config.add_interface(interface.clone());
        }
        config.set_expose_invocation(*self.expose_invocation.read());
        for source in sources {
            match source.entry {
                ChainEntry::Advice(advice) => config.add_advice(advice)?,
                ChainEntry::Target(target) => {
                    config.set_target(target.clone());
                    config.add_interceptor(Arc::new(InvokerInterceptor::new(target)))?;
                }
            }
        }
        Ok(AopProxy::new(config)?.get_proxy())
    }

    /// 注册为容器 Bean 时使用的类元数据
    pub fn bean_class() -> Arc<BeanClass> {
        static CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
            BeanClass::builder::<ProxyFactoryBean>("ProxyFactoryBean")
                .constructor(|| Ok(ProxyFactoryBean::new()))
                .setter(
                    "interceptor_names",
                    |bean: &ProxyFactoryBean, names: String| {
                        bean.set_interceptor_names(&names);
                        Ok(())
                    },
                )
                .setter(
                    "interfaces",
                    |bean: &ProxyFactoryBean, interfaces: Vec<String>| {
                        bean.set_interfaces(interfaces);
                        Ok(())
                    },
                )
                .setter("singleton", |bean: &ProxyFactoryBean, singleton: bool| {
                    bean.set_singleton(singleton);
                    Ok(())
                })
                .setter(
                    "expose_invocation",
                    |bean: &ProxyFactoryBean, expose: bool| {
                        bean.set_expose_invocation(expose);
                        Ok(())
                    },
                )
                .factory_bean()
                .factory_aware()
                .build()
        });
        CLASS.clone()
    }
}

fn resolve_one(factory: &Arc<dyn BeanFactory>, name: &str) -> AopResult<ChainSource> {
    let bean = factory.get_bean(name)?;
    let prototype = !factory.is_singleton(name)?;
    let entry = match bean.as_ref().as_any().downcast_ref::<Advice>() {
        Some(advice) => ChainEntry::Advice(advice.clone()),
        None => {
            let class = factory.bean_class(name)?;
            ChainEntry::Target(TargetObject::new(bean, class))
        }
    };
    Ok(ChainSource {
        bean_name: name.to_string(),
        prototype,
        entry,
    })
}

impl BeanFactoryAware for ProxyFactoryBean {
    /// 装配期解析整条链；单例模式下立即创建并缓存代理
    fn set_bean_factory(&self, factory: Arc<dyn BeanFactory>) -> BeansResult<()> {
        let sources = self.resolve_sources(&factory)?;
        *self.sources.write() = sources;
        *self.factory.write() = Some(factory);
        if *self.singleton.read() {
            let proxy = self.build_proxy()?;
            *self.cached.write() = Some(proxy);
        }
        Ok(())
    }
}

impl FactoryBean for ProxyFactoryBean {
    fn object(&self) -> BeansResult<BeanInstance> {
        if *self.singleton.read() {
            if let Some(proxy) = self.cached.read().clone() {
                return Ok(proxy as BeanInstance);
            }
            let proxy = self.build_proxy()?;
            *self.cached.write() = Some(proxy.clone());
            Ok(proxy as BeanInstance)
        } else {
            Ok(self.build_proxy()? as BeanInstance)
        }
    }

    fn is_singleton(&self) -> bool {
        *self.singleton.read()
    }
}
