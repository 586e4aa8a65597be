//! Persistence behind the `TodoStore` trait.
//!
//! `SqliteTodoStore` is the production store; `MemoryTodoStore` keeps rows in
//! process and is used where a database would only add noise.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::error::TodoResult;
use crate::model::Todo;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// CRUD primitives over the todo table. Ids are assigned by the store and
/// increase monotonically; a deleted id is never handed out again.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    async fn create(&self, text: &str) -> TodoResult<Todo>;
    /// All rows in insertion order.
    async fn find_all(&self) -> TodoResult<Vec<Todo>>;
    async fn find_by_id(&self, id: i64) -> TodoResult<Option<Todo>>;
    /// Overwrite the row with `todo.id`. Returns `None` if it no longer exists.
    async fn update(&self, todo: &Todo) -> TodoResult<Option<Todo>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> TodoResult<bool>;
}

/// Open a pool for `config.database_url` and bring the schema up to date.
///
/// In-memory databases live and die with their connection, so the pool is
/// pinned to one connection that never expires.
pub async fn connect(config: &ServerConfig) -> Result<SqlitePool, sqlx::Error> {
    let database_url = config.database_url.as_str();
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new();
    if is_in_memory(database_url) {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options.max_connections(config.max_connections.max(1));
    }

    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;
    tracing::debug!(database_url, "todo schema migrated");
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[derive(Clone, Debug)]
pub struct SqliteTodoStore {
    pool: SqlitePool,
}

impl SqliteTodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fresh private in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..ServerConfig::default()
        };
        Ok(Self::new(connect(&config).await?))
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn create(&self, text: &str) -> TodoResult<Todo> {
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (text, completed_at) VALUES (?, NULL) \
             RETURNING id, text, completed_at",
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn find_all(&self) -> TodoResult<Vec<Todo>> {
        let todos =
            sqlx::query_as::<_, Todo>("SELECT id, text, completed_at FROM todos ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(todos)
    }

    async fn find_by_id(&self, id: i64) -> TodoResult<Option<Todo>> {
        let todo =
            sqlx::query_as::<_, Todo>("SELECT id, text, completed_at FROM todos WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> TodoResult<Option<Todo>> {
        let updated = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET text = ?, completed_at = ? WHERE id = ? \
             RETURNING id, text, completed_at",
        )
        .bind(&todo.text)
        .bind(todo.completed_at)
        .bind(todo.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> TodoResult<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: i64,
    rows: BTreeMap<i64, Todo>,
}

/// Process-local store. Ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    table: RwLock<MemoryTable>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn create(&self, text: &str) -> TodoResult<Todo> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let todo = Todo {
            id: table.last_id,
            text: text.to_string(),
            completed_at: None,
        };
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_all(&self) -> TodoResult<Vec<Todo>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> TodoResult<Option<Todo>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, todo: &Todo) -> TodoResult<Option<Todo>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&todo.id).map(|row| {
            *row = todo.clone();
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> TodoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
