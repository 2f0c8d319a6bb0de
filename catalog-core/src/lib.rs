//! Catalog Core - 目录分类管理核心
//!
//! # 架构概述
//!
//! Two-level taxonomy (category → subcategory) over a catalog of items,
//! plus manual display ranking of the items within each scope.
//!
//! - **存储** (`backend`): `CatalogBackend` trait, SQLite and in-memory implementations
//! - **数据库** (`db`): SQLite pool, migrations, repository functions
//! - **分类** (`taxonomy`): loader, store, category / subcategory mutators
//! - **商品排序** (`products`): ordered listing and sort-key moves
//! - **服务** (`service`): `TaxonomyService` facade
//!
//! # 模块结构
//!
//! ```text
//! catalog-core/src/
//! ├── core/          # 配置
//! ├── backend/       # 存储接口 + SQLite / Memory 实现
//! ├── db/            # 连接池、迁移、repository
//! ├── taxonomy/      # 分类加载与变更
//! ├── products/      # 商品列表与排序
//! ├── service.rs     # 对外接口
//! └── utils/         # 日志
//! ```

pub mod backend;
pub mod core;
pub mod db;
pub mod products;
pub mod service;
pub mod taxonomy;
pub mod utils;

// Re-export 公共类型
pub use backend::{CatalogBackend, MemoryBackend, SqliteBackend, WriteBatch, WriteOp, WriteTarget};
pub use crate::core::Config;
pub use db::DbService;
pub use products::{Direction, MoveOutcome, ProductScope};
pub use service::TaxonomyService;
pub use taxonomy::{CategoryEntry, SubcategoryEntry, TaxonomyError, TaxonomyResult, TaxonomyStore};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
