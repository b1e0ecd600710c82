use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId, TodoPatch},
};

/// Process-local store for the development backend. Keeps insertion order.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    items: Arc<RwLock<Vec<Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self { Self::default() }

    /// A few sample rows so a fresh server has something to show.
    pub async fn seed(&self) -> Result<()> {
        for (title, completed) in [("Read the docs", true), ("Write the tests", false), ("Ship it", false)] {
            self.create(NewTodo { title: title.to_string(), completed }).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, input: NewTodo) -> Result<Todo> {
        let todo = Todo { id: TodoId(Uuid::new_v4().to_string()), title: input.title, completed: input.completed };
        self.items.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn get(&self, id: &TodoId) -> Result<Option<Todo>> {
        Ok(self.items.read().await.iter().find(|t| t.id == *id).cloned())
    }

    async fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>> {
        let items = self.items.read().await;
        Ok(items.iter().filter(|t| completed.is_none_or(|c| t.completed == c)).cloned().collect())
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>> {
        let mut items = self.items.write().await;
        let Some(todo) = items.iter_mut().find(|t| t.id == *id) else { return Ok(None) };
        if let Some(title) = patch.title { todo.title = title; }
        if let Some(completed) = patch.completed { todo.completed = completed; }
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: &TodoId) -> Result<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|t| t.id != *id);
        Ok(items.len() != before)
    }
}
