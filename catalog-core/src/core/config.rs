use shared::error::AppError;
use shared::models::EntityType;
use std::path::PathBuf;

/// 运行配置 - catalog core 的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | $WORK_DIR/catalog.db | SQLite 数据库文件 |
/// | ENTITY_TYPE | equipment | 管理的目录类型 (equipment / consumables) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 滚动日志目录 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// ENTITY_TYPE=consumables DATABASE_PATH=/tmp/catalog.db cargo run -p catalog-core
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: PathBuf,
    /// SQLite 数据库文件路径
    pub database_path: PathBuf,
    /// 管理的目录类型
    pub entity_type: EntityType,
    /// 日志级别
    pub log_level: String,
    /// 滚动日志目录 (未设置则输出到 stdout)
    pub log_dir: Option<PathBuf>,
    /// 运行环境: development | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// Unset variables fall back to defaults; an unparsable `ENTITY_TYPE` is an
    /// error rather than a silent default.
    pub fn from_env() -> Result<Self, AppError> {
        let work_dir = PathBuf::from(std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()));
        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("catalog.db"));
        let entity_type = match std::env::var("ENTITY_TYPE") {
            Ok(raw) => raw
                .parse::<EntityType>()
                .map_err(|e| AppError::config(format!("ENTITY_TYPE: {e}")))?,
            Err(_) => EntityType::Equipment,
        };

        Ok(Self {
            work_dir,
            database_path,
            entity_type,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        })
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<PathBuf>, entity_type: EntityType) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: work_dir.join("catalog.db"),
            work_dir,
            entity_type,
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_place_database_in_work_dir() {
        let config = Config::with_overrides("/tmp/catalog-test", EntityType::Consumables);
        assert_eq!(config.database_path, PathBuf::from("/tmp/catalog-test/catalog.db"));
        assert_eq!(config.entity_type, EntityType::Consumables);
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
