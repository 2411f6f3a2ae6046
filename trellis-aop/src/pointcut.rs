//! 常用静态切点
//!
//! 正则切点匹配 `Interface.method` 全名，名称切点用 `*` 通配
//! 方法名。两者都只看方法身份，不看参数。

use std::sync::Arc;

use regex::Regex;

use crate::advice::{MethodInterceptor, MethodKey, StaticMethodPointcut};
use crate::error::{AopError, AopResult};

/// 正则表达式切点
///
/// 模式整体锚定：`Iface\.set.*` 只匹配完整的全名。
pub struct RegexpMethodPointcut {
    patterns: Vec<Regex>,
    interceptor: Arc<dyn MethodInterceptor>,
}

impl RegexpMethodPointcut {
    pub fn new(
        patterns: &[&str],
        interceptor: Arc<dyn MethodInterceptor>,
    ) -> AopResult<Self> {
        let compiled = patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                    AopError::Config(format!("Invalid pointcut pattern '{}': {}", pattern, e))
                })
            })
            .collect::<AopResult<Vec<Regex>>>()?;
        Ok(Self {
            patterns: compiled,
            interceptor,
        })
    }
}

impl std::fmt::Debug for RegexpMethodPointcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexpMethodPointcut")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl StaticMethodPointcut for RegexpMethodPointcut {
    fn interceptor(&self) -> Arc<dyn MethodInterceptor> {
        self.interceptor.clone()
    }

    fn applies(&self, method: &MethodKey) -> bool {
        let qualified = method.qualified_name();
        self.patterns.iter().any(|pattern| pattern.is_match(&qualified))
    }
}

/// 方法名切点，`*` 通配任意字符段
pub struct MethodNamePointcut {
    patterns: Vec<String>,
    interceptor: Arc<dyn MethodInterceptor>,
}

impl MethodNamePointcut {
    pub fn new(interceptor: Arc<dyn MethodInterceptor>) -> Self {
        Self {
            patterns: Vec::new(),
            interceptor,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }
}

impl StaticMethodPointcut for MethodNamePointcut {
    fn interceptor(&self) -> Arc<dyn MethodInterceptor> {
        self.interceptor.clone()
    }

    fn applies(&self, method: &MethodKey) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern_matches(pattern, &method.name))
    }
}

/// `*` 通配匹配，无通配符时要求完全相等
fn pattern_matches(pattern: &str, name: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == name;
    }
    let segments: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;
    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            if !name.starts_with(segment) {
                return false;
            }
            pos = segment.len();
        } else if i == segments.len() - 1 {
            return name[pos..].ends_with(segment);
        } else {
            match name[pos..].find(segment) {
                Some(found) => pos += found + segment.len(),
                None => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::DebugInterceptor;

    fn noop() -> Arc<dyn MethodInterceptor> {
        Arc::new(DebugInterceptor::new())
    }

    #[test]
    fn test_regexp_pointcut_is_anchored() {
        let pointcut =
            RegexpMethodPointcut::new(&[r"IPerson\.set.*", r"IOrder\.cancel"], noop()).unwrap();
        assert!(pointcut.applies(&MethodKey::new("IPerson", "set_name")));
        assert!(pointcut.applies(&MethodKey::new("IOrder", "cancel")));
        assert!(!pointcut.applies(&MethodKey::new("IPerson", "name")));
        // 非完整匹配不算命中
        assert!(!pointcut.applies(&MethodKey::new("IOrder", "cancel_all")));
        assert!(!pointcut.applies(&MethodKey::new("XIOrder", "cancel")));
    }

    #[test]
    fn test_invalid_regexp_is_config_error() {
        let err = RegexpMethodPointcut::new(&["("], noop()).unwrap_err();
        assert!(matches!(err, AopError::Config(_)));
    }

    #[test]
    fn test_method_name_wildcards() {
        let pointcut = MethodNamePointcut::new(noop())
            .with_pattern("set_*")
            .with_pattern("exact")
            .with_pattern("*_all");
        assert!(pointcut.applies(&MethodKey::new("I", "set_name")));
        assert!(pointcut.applies(&MethodKey::new("I", "exact")));
        assert!(pointcut.applies(&MethodKey::new("I", "cancel_all")));
        assert!(!pointcut.applies(&MethodKey::new("I", "exactly")));
        assert!(!pointcut.applies(&MethodKey::new("I", "name")));
    }

    #[test]
    fn test_pattern_matches_middle_wildcard() {
        assert!(pattern_matches("get*count", "get_item_count"));
        assert!(!pattern_matches("get*count", "get_items"));
        assert!(pattern_matches("*", "anything"));
    }
}
