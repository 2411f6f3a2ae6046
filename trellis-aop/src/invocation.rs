//! 方法调用对象 - 链式分发的载体
//!
//! 持有调用快照（代理、目标、方法、参数、链）与单调前进的游标。
//! 拦截器通过 `proceed()` 驱动链上的下一个环节。

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trellis_beans::{Bean, BeanInstance, BeanValue};

use crate::advice::{Advice, MethodKey};
use crate::error::{AopError, AopResult};
use crate::proxy::Proxy;

/// 附件值：调用期间拦截器之间传递的任意数据
pub type Attachment = Arc<dyn Any + Send + Sync>;

/// 一次方法调用
pub struct MethodInvocation {
    proxy: Arc<Proxy>,
    target: Option<BeanInstance>,
    method: MethodKey,
    args: Vec<BeanValue>,
    chain: Arc<[Advice]>,
    index: usize,
    attachments: HashMap<String, Attachment>,
}

impl MethodInvocation {
    pub(crate) fn new(
        proxy: Arc<Proxy>,
        target: Option<BeanInstance>,
        method: MethodKey,
        args: Vec<BeanValue>,
        chain: Arc<[Advice]>,
    ) -> AopResult<Self> {
        if chain.is_empty() {
            return Err(AopError::Config(format!(
                "Cannot dispatch method '{}' with an empty interceptor chain",
                method
            )));
        }
        Ok(Self {
            proxy,
            target,
            method,
            args,
            chain,
            index: 0,
            attachments: HashMap::new(),
        })
    }

    pub fn proxy(&self) -> &Arc<Proxy> {
        &self.proxy
    }

    pub fn target(&self) -> Option<&BeanInstance> {
        self.target.as_ref()
    }

    pub fn method(&self) -> &MethodKey {
        &self.method
    }

    pub fn args(&self) -> &[BeanValue] {
        &self.args
    }

    /// 下一个待执行环节的位置
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// 写入附件，返回旧值；`None` 表示清除
    pub fn set_attachment(
        &mut self,
        key: impl Into<String>,
        value: Option<Attachment>,
    ) -> Option<Attachment> {
        let key = key.into();
        match value {
            Some(value) => self.attachments.insert(key, value),
            None => self.attachments.remove(&key),
        }
    }

    pub fn attachment(&self, key: &str) -> Option<Attachment> {
        self.attachments.get(key).cloned()
    }

    /// 执行链上的下一个环节
    ///
    /// 不匹配的切点被跳过；游标只向前移动；
    /// 越过链尾是切面错误且不再推进游标。
    pub fn proceed(&mut self) -> AopResult<BeanValue> {
        loop {
            if self.index >= self.chain.len() {
                return Err(AopError::Aspect(format!(
                    "Proceeded past the end of the interceptor chain for method '{}'",
                    self.method
                )));
            }
            let advice = self.chain[self.index].clone();
            self.index += 1;
            match advice {
                Advice::Interceptor(interceptor) => return interceptor.invoke(self),
                Advice::Introduction(interceptor) => return interceptor.invoke(self),
                Advice::StaticPointcut(pointcut) => {
                    if pointcut.applies(&self.method) {
                        return pointcut.interceptor().invoke(self);
                    }
                    tracing::trace!(method = %self.method, "Static pointcut does not apply, skipping");
                }
                Advice::DynamicPointcut(pointcut) => {
                    if pointcut.applies(&self.method, &self.args) {
                        return pointcut.interceptor().invoke(self);
                    }
                    tracing::trace!(method = %self.method, "Dynamic pointcut does not apply, skipping");
                }
            }
        }
    }
}

/// 不触碰目标对象本身，只报告其类型
impl fmt::Debug for MethodInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvocation")
            .field("method", &self.method)
            .field("target", &self.target.as_ref().map(|t| t.as_ref().type_name()))
            .field("index", &self.index)
            .field("chain_len", &self.chain.len())
            .finish()
    }
}
