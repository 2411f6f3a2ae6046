//! 容器内部的辅助工具

use std::collections::HashMap;

use crate::bean::BeanInstance;

/// 单次顶层获取过程中正在构建的 Bean 集合
///
/// 由最外层的 `get_bean` 调用持有，以 `&mut` 贯穿引用解析过程，
/// 循环引用因此能拿到尚在填充属性的原始实例。绝不跨线程共享。
#[derive(Default)]
pub struct InFlightBeans {
    beans: HashMap<String, BeanInstance>,
}

impl InFlightBeans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<BeanInstance> {
        self.beans.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, instance: BeanInstance) {
        self.beans.insert(name.into(), instance);
    }

    pub fn remove(&mut self, name: &str) {
        self.beans.remove(name);
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_in_flight_tracking() {
        let mut in_flight = InFlightBeans::new();
        assert!(in_flight.is_empty());

        let instance: BeanInstance = Arc::new(42_i64);
        in_flight.insert("answer", instance.clone());
        assert!(in_flight.contains("answer"));
        assert!(Arc::ptr_eq(&in_flight.get("answer").unwrap(), &instance));

        in_flight.remove("answer");
        assert!(!in_flight.contains("answer"));
        assert!(in_flight.get("answer").is_none());
    }
}
