//! 属性值的运行时表示
//!
//! `BeanValue` 是属性注入时流经容器的统一值类型：
//! 普通标量、列表、映射、按名称引用其他 Bean 的标记，
//! 以及引用解析完成后的具体实例。

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::bean::Bean;
use crate::error::{BeansError, BeansResult};

/// 属性值
///
/// `Ref` 变体是“按名称引用 Bean”的标记，在实例化时被解析为
/// `Instance`，每次实例化恰好解析一次。Map 的键永远是普通字符串。
#[derive(Clone, Default)]
pub enum BeanValue {
    /// 空值
    #[default]
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    Str(String),
    /// 有序列表，元素可能是引用
    List(Vec<BeanValue>),
    /// 键值映射，值可能是引用或嵌套列表
    Map(BTreeMap<String, BeanValue>),
    /// 运行时 Bean 引用（按名称，解析前的形态）
    Ref(String),
    /// 已解析的 Bean 实例
    Instance(Arc<dyn Bean>),
}

impl BeanValue {
    /// 包装一个已有实例
    pub fn instance<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        BeanValue::Instance(value)
    }

    /// 构造一个运行时引用
    pub fn reference(name: impl Into<String>) -> Self {
        BeanValue::Ref(name.into())
    }

    /// 值里是否还残留未解析的引用（含嵌套）
    pub fn contains_reference(&self) -> bool {
        match self {
            BeanValue::Ref(_) => true,
            BeanValue::List(items) => items.iter().any(BeanValue::contains_reference),
            BeanValue::Map(entries) => entries.values().any(BeanValue::contains_reference),
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            BeanValue::Null => "null",
            BeanValue::Bool(_) => "bool",
            BeanValue::Int(_) => "int",
            BeanValue::Float(_) => "float",
            BeanValue::Str(_) => "str",
            BeanValue::List(_) => "list",
            BeanValue::Map(_) => "map",
            BeanValue::Ref(_) => "ref",
            BeanValue::Instance(_) => "instance",
        }
    }
}

impl PartialEq for BeanValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BeanValue::Null, BeanValue::Null) => true,
            (BeanValue::Bool(a), BeanValue::Bool(b)) => a == b,
            (BeanValue::Int(a), BeanValue::Int(b)) => a == b,
            (BeanValue::Float(a), BeanValue::Float(b)) => a == b,
            (BeanValue::Str(a), BeanValue::Str(b)) => a == b,
            (BeanValue::List(a), BeanValue::List(b)) => a == b,
            (BeanValue::Map(a), BeanValue::Map(b)) => a == b,
            (BeanValue::Ref(a), BeanValue::Ref(b)) => a == b,
            // 实例按引用同一性比较
            (BeanValue::Instance(a), BeanValue::Instance(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for BeanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanValue::Null => write!(f, "Null"),
            BeanValue::Bool(v) => write!(f, "Bool({})", v),
            BeanValue::Int(v) => write!(f, "Int({})", v),
            BeanValue::Float(v) => write!(f, "Float({})", v),
            BeanValue::Str(v) => write!(f, "Str({:?})", v),
            BeanValue::List(v) => f.debug_tuple("List").field(v).finish(),
            BeanValue::Map(v) => f.debug_tuple("Map").field(v).finish(),
            BeanValue::Ref(name) => write!(f, "Ref({})", name),
            // 只打印类型名，绝不触碰实例本身
            BeanValue::Instance(v) => write!(f, "Instance({})", v.as_ref().type_name()),
        }
    }
}

impl From<&str> for BeanValue {
    fn from(v: &str) -> Self {
        BeanValue::Str(v.to_string())
    }
}

impl From<String> for BeanValue {
    fn from(v: String) -> Self {
        BeanValue::Str(v)
    }
}

impl From<i64> for BeanValue {
    fn from(v: i64) -> Self {
        BeanValue::Int(v)
    }
}

impl From<i32> for BeanValue {
    fn from(v: i32) -> Self {
        BeanValue::Int(v as i64)
    }
}

impl From<bool> for BeanValue {
    fn from(v: bool) -> Self {
        BeanValue::Bool(v)
    }
}

impl From<f64> for BeanValue {
    fn from(v: f64) -> Self {
        BeanValue::Float(v)
    }
}

fn conversion_error(value: &BeanValue, target: &str) -> BeansError {
    BeansError::DefinitionStore {
        message: format!("Cannot convert {} value to {}", value.kind(), target),
    }
}

/// 从 `BeanValue` 到具体属性类型的转换
///
/// 类型化 setter 通过此 trait 声明期望的属性类型。
/// `Vec<V>` 的实现对应“列表转数组”的场景：逐元素转换，
/// 允许文本到数值的转换，失败时报告目标元素类型。
pub trait FromBeanValue: Sized {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self>;
}

impl FromBeanValue for BeanValue {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        Ok(value)
    }
}

impl FromBeanValue for String {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::Str(s) => Ok(s),
            BeanValue::Int(v) => Ok(v.to_string()),
            BeanValue::Float(v) => Ok(v.to_string()),
            BeanValue::Bool(v) => Ok(v.to_string()),
            other => Err(conversion_error(&other, "String")),
        }
    }
}

impl FromBeanValue for i64 {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::Int(v) => Ok(v),
            // 允许文本表示
            BeanValue::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| conversion_error(&BeanValue::Str(s), "i64")),
            other => Err(conversion_error(&other, "i64")),
        }
    }
}

impl FromBeanValue for i32 {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        let wide = i64::from_bean_value(value)?;
        i32::try_from(wide).map_err(|_| BeansError::DefinitionStore {
            message: format!("Cannot convert int value {} to i32", wide),
        })
    }
}

impl FromBeanValue for u32 {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        let wide = i64::from_bean_value(value)?;
        u32::try_from(wide).map_err(|_| BeansError::DefinitionStore {
            message: format!("Cannot convert int value {} to u32", wide),
        })
    }
}

impl FromBeanValue for f64 {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::Float(v) => Ok(v),
            BeanValue::Int(v) => Ok(v as f64),
            BeanValue::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| conversion_error(&BeanValue::Str(s), "f64")),
            other => Err(conversion_error(&other, "f64")),
        }
    }
}

impl FromBeanValue for bool {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::Bool(v) => Ok(v),
            BeanValue::Str(s) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(conversion_error(&BeanValue::Str(s), "bool")),
            },
            other => Err(conversion_error(&other, "bool")),
        }
    }
}

impl<V: FromBeanValue> FromBeanValue for Option<V> {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::Null => Ok(None),
            other => V::from_bean_value(other).map(Some),
        }
    }
}

impl<V: FromBeanValue> FromBeanValue for Vec<V> {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let converted = V::from_bean_value(item).map_err(|_| {
                        BeansError::DefinitionStore {
                            message: format!(
                                "Cannot convert list element to component type {}",
                                std::any::type_name::<V>()
                            ),
                        }
                    })?;
                    out.push(converted);
                }
                Ok(out)
            }
            other => Err(conversion_error(&other, "list")),
        }
    }
}

impl FromBeanValue for BTreeMap<String, BeanValue> {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::Map(entries) => Ok(entries),
            other => Err(conversion_error(&other, "map")),
        }
    }
}

impl<T: Any + Send + Sync> FromBeanValue for Arc<T> {
    fn from_bean_value(value: BeanValue) -> BeansResult<Self> {
        match value {
            BeanValue::Instance(instance) => {
                let actual = instance.as_ref().type_name();
                instance.into_any().downcast::<T>().map_err(|_| {
                    BeansError::DefinitionStore {
                        message: format!(
                            "Bean reference is of type '{}', expected '{}'",
                            actual,
                            std::any::type_name::<T>()
                        ),
                    }
                })
            }
            other => Err(conversion_error(&other, std::any::type_name::<T>())),
        }
    }
}
