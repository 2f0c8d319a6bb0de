use catalog_core::{Config, DbService, SqliteBackend, TaxonomyService, init_logger_with_file};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        entity_type = %config.entity_type,
        database = %config.database_path.display(),
        environment = %config.environment,
        "Catalog core starting"
    );

    // 2. 打开数据库
    let db = DbService::new(&config.database_path).await?;
    let service = TaxonomyService::new(Arc::new(SqliteBackend::new(db.pool)), config.entity_type);

    // 3. 加载分类并输出
    let store = service.load_taxonomy().await?;
    tracing::info!(
        categories = store.len(),
        items = store.total_items(),
        "Taxonomy loaded"
    );

    let json = serde_json::to_string_pretty(&store.sorted_by_label())?;
    println!("{json}");
    Ok(())
}
