/// 核心常量定义
///
/// 这个模块定义了容器层面使用的保留标记，
/// 确保在工厂与配置读取器中使用相同的标识符，避免硬编码。

/// FactoryBean 解引用前缀
///
/// 以此前缀开头的 Bean 名称请求的是工厂对象本身，
/// 而不是工厂生产的对象。例如 Bean `myProxy` 是一个工厂时，
/// `getBean("&myProxy")` 返回工厂，`getBean("myProxy")` 返回产品。
pub const FACTORY_BEAN_PREFIX: &str = "&";

/// 去掉名称上的工厂解引用前缀（如果有）
pub fn strip_factory_prefix(name: &str) -> &str {
    name.strip_prefix(FACTORY_BEAN_PREFIX).unwrap_or(name)
}

/// 名称是否为工厂解引用形式
pub fn is_factory_dereference(name: &str) -> bool {
    name.starts_with(FACTORY_BEAN_PREFIX)
}
