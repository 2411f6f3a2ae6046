//! 常用拦截器
//!
//! `InvokerInterceptor` 是链尾的终端环节，经目标类的方法表
//! 调用真实对象；其余是装配期可自由插入的观测拦截器。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use trellis_beans::BeanValue;

use crate::error::AopResult;
use crate::invocation::MethodInvocation;
use crate::advice::MethodInterceptor;
use crate::proxy::TargetObject;

/// 终端 invoker：把调用转给目标对象
pub struct InvokerInterceptor {
    target: TargetObject,
}

impl InvokerInterceptor {
    pub fn new(target: TargetObject) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &TargetObject {
        &self.target
    }
}

impl MethodInterceptor for InvokerInterceptor {
    fn invoke(&self, invocation: &mut MethodInvocation) -> AopResult<BeanValue> {
        let result = self.target.class().invoke(
            &**self.target.instance(),
            &invocation.method().name,
            invocation.args(),
        )?;
        Ok(result)
    }

    fn invokes_target(&self) -> bool {
        true
    }
}

/// 计数并打印调试日志的拦截器
#[derive(Default)]
pub struct DebugInterceptor {
    count: AtomicUsize,
}

impl DebugInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已拦截的调用次数
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl MethodInterceptor for DebugInterceptor {
    fn invoke(&self, invocation: &mut MethodInvocation) -> AopResult<BeanValue> {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(method = %invocation.method(), count, "Before invocation");
        let result = invocation.proceed();
        tracing::debug!(method = %invocation.method(), ok = result.is_ok(), "After invocation");
        result
    }
}

/// 统计墙钟耗时的拦截器
#[derive(Default)]
pub struct PerformanceMonitorInterceptor;

impl PerformanceMonitorInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl MethodInterceptor for PerformanceMonitorInterceptor {
    fn invoke(&self, invocation: &mut MethodInvocation) -> AopResult<BeanValue> {
        let method = invocation.method().clone();
        let started = Instant::now();
        let result = invocation.proceed();
        tracing::info!(
            method = %method,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Method timing"
        );
        result
    }
}
