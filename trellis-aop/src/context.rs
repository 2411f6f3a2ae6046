//! 调用上下文 - 严格随调用栈作用域的线程本地暴露
//!
//! 仅当代理配置了 `expose_invocation` 时，分发入口压入快照，
//! 返回路径（含错误路径）由 RAII 守卫弹出。

use std::cell::RefCell;
use std::sync::Arc;

use trellis_beans::{BeanInstance, BeanValue};

use crate::advice::MethodKey;
use crate::error::{AopError, AopResult};
use crate::proxy::Proxy;

/// 当前调用的快照
#[derive(Clone)]
pub struct CurrentInvocation {
    pub proxy: Arc<Proxy>,
    pub target: Option<BeanInstance>,
    pub method: MethodKey,
    pub args: Vec<BeanValue>,
}

thread_local! {
    static INVOCATIONS: RefCell<Vec<CurrentInvocation>> = const { RefCell::new(Vec::new()) };
}

/// 调用上下文查询入口
pub struct AopContext;

impl AopContext {
    /// 当前线程最内层的活动调用
    ///
    /// 没有活动调用（或代理未开启暴露）时返回无上下文错误。
    pub fn current_invocation() -> AopResult<CurrentInvocation> {
        INVOCATIONS.with(|stack| {
            stack
                .borrow()
                .last()
                .cloned()
                .ok_or(AopError::NoInvocationContext)
        })
    }
}

/// 压入/弹出调用快照的 RAII 守卫
pub(crate) struct ContextGuard;

impl ContextGuard {
    pub(crate) fn enter(snapshot: CurrentInvocation) -> Self {
        INVOCATIONS.with(|stack| stack.borrow_mut().push(snapshot));
        Self
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        INVOCATIONS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
