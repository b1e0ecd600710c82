use async_trait::async_trait;
use super::todo::{NewTodo, Todo, TodoId, TodoPatch};

/// Storage behind the development backend.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn create(&self, input: NewTodo) -> anyhow::Result<Todo>;
    async fn get(&self, id: &TodoId) -> anyhow::Result<Option<Todo>>;
    /// `completed = None` lists everything, in insertion order.
    async fn list(&self, completed: Option<bool>) -> anyhow::Result<Vec<Todo>>;
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: &TodoId) -> anyhow::Result<bool>;
}
