use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoStore,
    todo::{Todo, TodoFields, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoStore {
    /// Opens the database, creating a missing database file.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let connect = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool = SqlitePoolOptions::new().max_connections(5);
        // every connection to an in-memory database gets its own empty database
        if database_url.starts_with("sqlite::memory:") {
            pool = pool.max_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = pool.connect_with(connect).await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn create(&self, input: TodoFields) -> Result<Todo> {
        let result = sqlx::query("INSERT INTO todos (title, description) VALUES (?1, ?2)")
            .bind(&input.title)
            .bind(&input.description)
            .execute(&*self.pool)
            .await?;
        Ok(Todo { id: TodoId(result.last_insert_rowid()), title: input.title, description: input.description })
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, title, description FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(row_to_todo))
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, title, description FROM todos ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(row_to_todo).collect())
    }

    async fn update(&self, id: TodoId, input: TodoFields) -> Result<Option<Todo>> {
        let result = sqlx::query("UPDATE todos SET title = ?2, description = ?3 WHERE id = ?1")
            .bind(id.0)
            .bind(&input.title)
            .bind(&input.description)
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 { return Ok(None); }
        Ok(Some(Todo { id, title: input.title, description: input.description }))
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: SqliteRow) -> Todo {
    Todo {
        id: TodoId(row.get("id")),
        title: row.get("title"),
        description: row.get("description"),
    }
}
