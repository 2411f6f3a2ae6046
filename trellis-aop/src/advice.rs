//! 拦截器与切点模型
//!
//! 方法身份由 `MethodKey`（接口名 + 方法名）显式给出。
//! `Advice` 是链与 Bean 中都能存放的和类型：普通拦截器、
//! 静态/动态切点、引入（mixin）。

use std::fmt;
use std::sync::Arc;

use trellis_beans::BeanValue;

use crate::error::AopResult;
use crate::invocation::MethodInvocation;

/// 方法身份单元：接口名加方法名
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub interface: String,
    pub name: String,
}

impl MethodKey {
    pub fn new(interface: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            name: name.into(),
        }
    }

    /// `Interface.method` 形式的全名，切点表达式的匹配对象
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.interface, self.name)
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.interface, self.name)
    }
}

/// 方法拦截器
pub trait MethodInterceptor: Send + Sync {
    /// 环绕通知：可在调用 `invocation.proceed()` 前后作任意处理
    fn invoke(&self, invocation: &mut MethodInvocation) -> AopResult<BeanValue>;

    /// 是否直接调用目标对象（仅终端 invoker 为 true）
    ///
    /// 链上出现此类拦截器后不允许再追加。
    fn invokes_target(&self) -> bool {
        false
    }
}

/// 静态切点：匹配只看方法身份，不看参数
pub trait StaticMethodPointcut: Send + Sync {
    fn interceptor(&self) -> Arc<dyn MethodInterceptor>;

    fn applies(&self, method: &MethodKey) -> bool;
}

/// 动态切点：匹配可以检查每次调用的参数
pub trait DynamicMethodPointcut: Send + Sync {
    fn interceptor(&self) -> Arc<dyn MethodInterceptor>;

    fn applies(&self, method: &MethodKey, args: &[BeanValue]) -> bool;
}

/// 引入拦截器：为代理追加目标没有的接口并自行处理其调用
pub trait IntroductionInterceptor: MethodInterceptor {
    /// 要引入的接口名称
    fn introduced_interfaces(&self) -> Vec<String>;
}

/// 链上的一个环节
#[derive(Clone)]
pub enum Advice {
    Interceptor(Arc<dyn MethodInterceptor>),
    StaticPointcut(Arc<dyn StaticMethodPointcut>),
    DynamicPointcut(Arc<dyn DynamicMethodPointcut>),
    Introduction(Arc<dyn IntroductionInterceptor>),
}

impl Advice {
    /// 该环节是否最终直接调用目标
    pub fn invokes_target(&self) -> bool {
        match self {
            Advice::Interceptor(i) => i.invokes_target(),
            Advice::StaticPointcut(p) => p.interceptor().invokes_target(),
            Advice::DynamicPointcut(p) => p.interceptor().invokes_target(),
            Advice::Introduction(i) => i.invokes_target(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Advice::Interceptor(_) => "Interceptor",
            Advice::StaticPointcut(_) => "StaticPointcut",
            Advice::DynamicPointcut(_) => "DynamicPointcut",
            Advice::Introduction(_) => "Introduction",
        }
    }
}

/// 按环节种类与对象身份比较
impl PartialEq for Advice {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Advice::Interceptor(a), Advice::Interceptor(b)) => Arc::ptr_eq(a, b),
            (Advice::StaticPointcut(a), Advice::StaticPointcut(b)) => Arc::ptr_eq(a, b),
            (Advice::DynamicPointcut(a), Advice::DynamicPointcut(b)) => Arc::ptr_eq(a, b),
            (Advice::Introduction(a), Advice::Introduction(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Advice::{}", self.kind())
    }
}
