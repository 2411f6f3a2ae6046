//! TOML Bean 定义读取器
//!
//! 把 `[beans.<name>]` 表翻译成定义并装入静态注册表。
//! 类名通过调用方提供的 `ClassRegistry` 解析为运行时类元数据，
//! 属性表中的 `{ ref = "x" }` 标记翻译为引用值。

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::bean::{BeanClass, BeanDefinition, ChildBeanDefinition, RootBeanDefinition};
use crate::bean_factory::StaticBeanDefinitionRegistry;
use crate::error::{BeansError, BeansResult};
use crate::property::PropertyValues;
use crate::scope::Scope;
use crate::value::BeanValue;

/// 类名到类元数据的映射，读取器的“类路径”
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Arc<BeanClass>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: Arc<BeanClass>) {
        self.classes.insert(class.name().to_string(), class);
    }

    pub fn with(mut self, class: Arc<BeanClass>) -> Self {
        self.register(class);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<BeanClass>> {
        self.classes.get(name).cloned()
    }
}

#[derive(Deserialize)]
struct DefinitionFile {
    #[serde(rename = "default-parent")]
    default_parent: Option<String>,
    #[serde(default)]
    beans: BTreeMap<String, BeanEntry>,
}

#[derive(Deserialize)]
struct BeanEntry {
    class: Option<String>,
    parent: Option<String>,
    scope: Option<String>,
    #[serde(rename = "init-method")]
    init_method: Option<String>,
    #[serde(default)]
    properties: toml::Table,
}

/// 定义读取器
pub struct DefinitionReader<'a> {
    classes: &'a ClassRegistry,
}

impl<'a> DefinitionReader<'a> {
    pub fn new(classes: &'a ClassRegistry) -> Self {
        Self { classes }
    }

    /// 从 TOML 文本装配注册表
    pub fn read_str(&self, input: &str) -> BeansResult<StaticBeanDefinitionRegistry> {
        let file: DefinitionFile = toml::from_str(input).map_err(|e| {
            BeansError::DefinitionStore {
                message: format!("Malformed definition document: {e}"),
            }
        })?;

        let mut registry = StaticBeanDefinitionRegistry::new();
        if let Some(parent) = file.default_parent {
            registry = registry.with_default_parent(parent);
        }
        for (name, entry) in file.beans {
            let definition = self.translate(&name, entry)?;
            registry.register_bean_definition(name, definition);
        }
        Ok(registry)
    }

    fn translate(&self, name: &str, entry: BeanEntry) -> BeansResult<BeanDefinition> {
        let scope = match entry.scope.as_deref() {
            Some(raw) => Scope::from_str(raw).map_err(|e| BeansError::DefinitionStore {
                message: format!("Bean '{}': {}", name, e),
            })?,
            None => Scope::default(),
        };
        let mut properties = PropertyValues::new();
        for (key, raw) in entry.properties {
            properties.add(key, translate_value(name, &raw)?);
        }

        match (entry.class, entry.parent) {
            (Some(class_name), None) => {
                let class =
                    self.classes
                        .get(&class_name)
                        .ok_or_else(|| BeansError::DefinitionStore {
                            message: format!(
                                "Bean '{}' names unknown class '{}'",
                                name, class_name
                            ),
                        })?;
                let mut root = RootBeanDefinition::new(class, properties, scope);
                if let Some(method) = entry.init_method {
                    root = root.with_init_method(method);
                }
                Ok(BeanDefinition::Root(root))
            }
            (None, Some(parent)) => {
                if entry.init_method.is_some() {
                    return Err(BeansError::DefinitionStore {
                        message: format!(
                            "Bean '{}': init-method is only valid on a class-bearing definition",
                            name
                        ),
                    });
                }
                Ok(BeanDefinition::Child(ChildBeanDefinition::new(
                    parent, properties, scope,
                )))
            }
            (Some(_), Some(_)) => Err(BeansError::DefinitionStore {
                message: format!("Bean '{}' declares both class and parent", name),
            }),
            (None, None) => Err(BeansError::DefinitionStore {
                message: format!("Bean '{}' declares neither class nor parent", name),
            }),
        }
    }
}

/// TOML 值到属性值的翻译，`{ ref = "x" }` 为引用标记
fn translate_value(bean: &str, raw: &toml::Value) -> BeansResult<BeanValue> {
    match raw {
        toml::Value::String(s) => Ok(BeanValue::Str(s.clone())),
        toml::Value::Integer(i) => Ok(BeanValue::Int(*i)),
        toml::Value::Float(f) => Ok(BeanValue::Float(*f)),
        toml::Value::Boolean(b) => Ok(BeanValue::Bool(*b)),
        toml::Value::Array(items) => {
            let translated: BeansResult<Vec<BeanValue>> = items
                .iter()
                .map(|item| translate_value(bean, item))
                .collect();
            Ok(BeanValue::List(translated?))
        }
        toml::Value::Table(table) => {
            if table.contains_key("ref") {
                if table.len() != 1 {
                    return Err(BeansError::DefinitionStore {
                        message: format!(
                            "Bean '{}': a reference marker must contain only the 'ref' key",
                            bean
                        ),
                    });
                }
                match table.get("ref") {
                    Some(toml::Value::String(target)) => Ok(BeanValue::Ref(target.clone())),
                    _ => Err(BeansError::DefinitionStore {
                        message: format!("Bean '{}': 'ref' must name a bean", bean),
                    }),
                }
            } else {
                let mut map = BTreeMap::new();
                for (key, value) in table {
                    map.insert(key.clone(), translate_value(bean, value)?);
                }
                Ok(BeanValue::Map(map))
            }
        }
        toml::Value::Datetime(_) => Err(BeansError::DefinitionStore {
            message: format!("Bean '{}': datetime values are not supported", bean),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean_factory::{BeanFactoryExt, BeanDefinitionRegistry};
    use crate::container::DefaultBeanFactory;
    use crate::test_fixtures::{test_bean_class, TestBean};

    const DOCUMENT: &str = r#"
        [beans.rod]
        class = "TestBean"
        init-method = "mark_custom_init"

        [beans.rod.properties]
        name = "Rod"
        age = 31
        numbers = [1, 2, 3]
        spouse = { ref = "kerry" }

        [beans.kerry]
        class = "TestBean"
        scope = "prototype"

        [beans.kerry.properties]
        name = "Kerry"

        [beans.roderick]
        parent = "rod"

        [beans.roderick.properties]
        name = "Roderick"
    "#;

    fn classes() -> ClassRegistry {
        ClassRegistry::new().with(test_bean_class())
    }

    #[test]
    fn test_reader_populates_working_factory() {
        let classes = classes();
        let registry = DefinitionReader::new(&classes).read_str(DOCUMENT).unwrap();
        assert_eq!(registry.definition_names().len(), 3);

        let factory = DefaultBeanFactory::new(std::sync::Arc::new(registry));
        let rod = factory.get_bean_of::<TestBean>("rod").unwrap();
        assert_eq!(rod.name().as_deref(), Some("Rod"));
        assert_eq!(rod.age(), 31);
        assert_eq!(rod.numbers(), vec![1, 2, 3]);
        assert_eq!(rod.spouse().unwrap().name().as_deref(), Some("Kerry"));
        assert!(rod.custom_initialized());

        let roderick = factory.get_bean_of::<TestBean>("roderick").unwrap();
        assert_eq!(roderick.name().as_deref(), Some("Roderick"));
        assert_eq!(roderick.age(), 31);
    }

    #[test]
    fn test_unknown_class_is_rejected() {
        let classes = classes();
        let err = DefinitionReader::new(&classes)
            .read_str("[beans.x]\nclass = \"Missing\"\n")
            .unwrap_err();
        assert!(matches!(err, BeansError::DefinitionStore { .. }));
    }

    #[test]
    fn test_malformed_ref_marker_is_rejected() {
        let classes = classes();
        let err = DefinitionReader::new(&classes)
            .read_str(
                "[beans.x]\nclass = \"TestBean\"\n[beans.x.properties]\nspouse = { ref = \"y\", extra = 1 }\n",
            )
            .unwrap_err();
        assert!(matches!(err, BeansError::DefinitionStore { .. }));
    }

    #[test]
    fn test_class_and_parent_are_exclusive() {
        let classes = classes();
        let err = DefinitionReader::new(&classes)
            .read_str("[beans.x]\nclass = \"TestBean\"\nparent = \"rod\"\n")
            .unwrap_err();
        assert!(matches!(err, BeansError::DefinitionStore { .. }));
    }

    #[test]
    fn test_default_parent_passthrough() {
        let classes = classes();
        let registry = DefinitionReader::new(&classes)
            .read_str("default-parent = \"rod\"\n[beans.rod]\nclass = \"TestBean\"\n")
            .unwrap();
        assert!(registry.bean_definition("anything").is_ok());
    }
}
