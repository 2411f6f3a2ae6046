//! 属性值存储
//!
//! 按定义顺序保存“属性名 → 值”的有序集合，支持覆盖与差异比较。
//! 容器在合并继承定义和应用属性时都以该结构为基础。

use std::fmt;

use crate::value::BeanValue;

/// 单个属性赋值
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyValue {
    name: String,
    value: BeanValue,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: impl Into<BeanValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &BeanValue {
        &self.value
    }

    pub fn into_value(self) -> BeanValue {
        self.value
    }
}

/// 有序的属性值集合
///
/// 同名覆盖发生在原位置（保持首次定义的顺序），新名称追加到末尾。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyValues {
    values: Vec<PropertyValue>,
}

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加或覆盖一个属性值
    pub fn add_or_override(&mut self, pv: PropertyValue) {
        if let Some(existing) = self.values.iter_mut().find(|v| v.name == pv.name) {
            *existing = pv;
        } else {
            self.values.push(pv);
        }
    }

    /// 便捷写法：按名称和值添加
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<BeanValue>) {
        self.add_or_override(PropertyValue::new(name, value));
    }

    /// 链式构造
    pub fn with(mut self, name: impl Into<String>, value: impl Into<BeanValue>) -> Self {
        self.add(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&BeanValue> {
        self.values.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|v| v.name == name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.values.iter()
    }

    /// 计算相对于 `old` 的变更集
    ///
    /// 返回所有在 `old` 中不存在、或值不同的属性。
    pub fn changes_since(&self, old: &PropertyValues) -> PropertyValues {
        let mut changes = PropertyValues::new();
        for pv in &self.values {
            match old.get(pv.name()) {
                Some(previous) if previous == pv.value() => {}
                _ => changes.add_or_override(pv.clone()),
            }
        }
        changes
    }
}

impl FromIterator<PropertyValue> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = PropertyValue>>(iter: I) -> Self {
        let mut pvs = PropertyValues::new();
        for pv in iter {
            pvs.add_or_override(pv);
        }
        pvs
    }
}

impl fmt::Display for PropertyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} property values", self.values.len())
    }
}
