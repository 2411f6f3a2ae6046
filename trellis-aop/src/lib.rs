// trellis-aop: 基于拦截器链的 AOP 代理支持
//
// 围绕显式的方法身份（接口名 + 方法名）构建：
// - 拦截器、静态/动态切点、引入（mixin）
// - 按调用快照链的代理分发与自引用改写
// - 线程本地、随调用栈作用域的调用上下文
// - 编程式 ProxyFactory 与容器内 ProxyFactoryBean

pub mod advice;
pub mod context;
pub mod error;
pub mod interceptor;
pub mod invocation;
pub mod pointcut;
pub mod proxy;
pub mod proxy_factory;

#[cfg(test)]
pub mod test_fixtures;

// 重新导出常用类型
pub use advice::{
    Advice, DynamicMethodPointcut, IntroductionInterceptor, MethodInterceptor, MethodKey,
    StaticMethodPointcut,
};
pub use context::{AopContext, CurrentInvocation};
pub use error::{AopError, AopResult};
pub use interceptor::{DebugInterceptor, InvokerInterceptor, PerformanceMonitorInterceptor};
pub use invocation::{Attachment, MethodInvocation};
pub use pointcut::{MethodNamePointcut, RegexpMethodPointcut};
pub use proxy::{AopProxy, Proxy, ProxyConfig, TargetObject};
pub use proxy_factory::{ProxyFactory, ProxyFactoryBean, GLOBALS, GLOBAL_PREFIX};

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::advice::{
        Advice, DynamicMethodPointcut, IntroductionInterceptor, MethodInterceptor, MethodKey,
        StaticMethodPointcut,
    };
    pub use crate::context::AopContext;
    pub use crate::error::{AopError, AopResult};
    pub use crate::interceptor::{DebugInterceptor, InvokerInterceptor};
    pub use crate::invocation::MethodInvocation;
    pub use crate::proxy::{AopProxy, Proxy, ProxyConfig, TargetObject};
    pub use crate::proxy_factory::{ProxyFactory, ProxyFactoryBean};
}
