//! View-model behind the todo screen.
//!
//! Owns the component-local state (draft text, filter, edit state) and the
//! four hooks. Every request runs on its own tokio task and reports back
//! through a channel; [`TodoApp::pump`] applies whatever has finished without
//! blocking, so the UI loop stays responsive while requests are in flight.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use super::{
    mutation::Mutation,
    query::Query,
    request::{execute, SuccessNotice},
};
use crate::domain::{
    error::RequestError,
    notifier::Notifier,
    todo::{clean_title, todo_path, Deleted, Filter, NewTodo, Todo, TodoId, TodoPatch},
    transport::{ApiRequest, RequestConfig, Transport},
};

pub const PLACEHOLDER_ROWS: usize = 5;
pub const EMPTY_MESSAGE: &str = "No todos yet. Add one above! ✨";

/// At most one row is edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing { id: TodoId, buffer: String },
}

impl EditState {
    pub fn editing_id(&self) -> Option<&TodoId> {
        match self {
            EditState::Idle => None,
            EditState::Editing { id, .. } => Some(id),
        }
    }

    pub fn is_editing(&self, id: &TodoId) -> bool { self.editing_id() == Some(id) }
}

/// What the list area should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Failed(String),
    Placeholders(usize),
    Empty(&'static str),
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: TodoId,
    pub completed: bool,
    /// The stored title, or the edit buffer for the row being edited.
    pub text: String,
    pub editing: bool,
}

impl RowView {
    pub fn controls(&self) -> [&'static str; 2] {
        if self.editing { ["Save", "Cancel"] } else { ["Edit", "Delete"] }
    }
}

enum Completion {
    Fetched { generation: u64, outcome: Result<Vec<Todo>, RequestError> },
    Created(Result<Todo, RequestError>),
    Updated { renamed: Option<TodoId>, outcome: Result<Todo, RequestError> },
    Deleted(Result<Option<Deleted>, RequestError>),
}

pub struct TodoApp {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    draft: String,
    filter: Filter,
    edit: EditState,
    todos: Query<Vec<Todo>>,
    create: Mutation<Todo>,
    update: Mutation<Todo>,
    remove: Mutation<Option<Deleted>>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl TodoApp {
    /// Mounts the view: the initial list fetch is issued right away, so this
    /// must be called from within a tokio runtime.
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let filter = Filter::default();
        let mut app = Self {
            transport,
            notifier,
            draft: String::new(),
            filter,
            edit: EditState::Idle,
            todos: Query::new(filter.path(), RequestConfig::default()),
            create: Mutation::post(),
            update: Mutation::patch(),
            remove: Mutation::delete(),
            completions_tx,
            completions,
            in_flight: 0,
        };
        app.sync();
        app
    }

    pub fn draft(&self) -> &str { &self.draft }
    pub fn draft_mut(&mut self) -> &mut String { &mut self.draft }
    pub fn set_draft(&mut self, text: impl Into<String>) { self.draft = text.into(); }
    pub fn filter(&self) -> Filter { self.filter }
    pub fn edit(&self) -> &EditState { &self.edit }
    pub fn todos(&self) -> &Query<Vec<Todo>> { &self.todos }
    pub fn create(&self) -> &Mutation<Todo> { &self.create }
    pub fn update(&self) -> &Mutation<Todo> { &self.update }
    pub fn remove(&self) -> &Mutation<Option<Deleted>> { &self.remove }
    pub fn in_flight(&self) -> usize { self.in_flight }

    /// Submits the draft. Blank drafts are ignored and issue no request.
    pub fn add_todo(&mut self) -> bool {
        let Some(new_todo) = NewTodo::from_draft(&self.draft) else { return false };
        let request = match self.create.begin_json("/todos", &new_todo, None) {
            Ok(request) => request,
            Err(err) => return self.reject(&err),
        };
        self.draft.clear();
        self.spawn_request(request, SuccessNotice::Always, Completion::Created);
        true
    }

    /// Flips `completed` on a row currently held in the list.
    pub fn toggle(&mut self, id: &TodoId) -> bool {
        let Some(completed) = self.find(id).map(|todo| todo.completed) else { return false };
        let request = match self.update.begin_json(todo_path(id), &TodoPatch::completed(!completed), None) {
            Ok(request) => request,
            Err(err) => return self.reject(&err),
        };
        self.spawn_request(request, SuccessNotice::Always, |outcome| Completion::Updated { renamed: None, outcome });
        true
    }

    pub fn delete(&mut self, id: &TodoId) {
        let request = self.remove.begin(todo_path(id), None, None);
        self.spawn_request(request, SuccessNotice::Always, Completion::Deleted);
    }

    /// Starts editing a held row, replacing any edit already in progress.
    pub fn start_edit(&mut self, id: &TodoId) -> bool {
        let Some(title) = self.find(id).map(|todo| todo.title.clone()) else { return false };
        self.edit = EditState::Editing { id: id.clone(), buffer: title };
        true
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        match &mut self.edit {
            EditState::Idle => None,
            EditState::Editing { buffer, .. } => Some(buffer),
        }
    }

    /// Saves the edit buffer as the row's title. A blank buffer issues no
    /// request and keeps the row in edit mode.
    pub fn save_edit(&mut self) -> bool {
        let EditState::Editing { id, buffer } = &self.edit else { return false };
        let Some(title) = clean_title(buffer) else { return false };
        let id = id.clone();
        let request = match self.update.begin_json(todo_path(&id), &TodoPatch::title(title), None) {
            Ok(request) => request,
            Err(err) => return self.reject(&err),
        };
        self.spawn_request(request, SuccessNotice::Always, move |outcome| Completion::Updated { renamed: Some(id), outcome });
        true
    }

    pub fn cancel_edit(&mut self) { self.edit = EditState::Idle; }

    pub fn set_filter(&mut self, filter: Filter) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.todos.set_url(filter.path());
        self.sync();
    }

    pub fn refetch(&mut self) {
        self.todos.refetch();
        self.sync();
    }

    /// Applies every finished request without waiting. Returns whether
    /// anything changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completions.try_recv() {
            self.apply(completion);
            changed = true;
        }
        changed
    }

    /// Waits until no request is in flight, including refetches triggered
    /// by the requests it waits on.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.completions.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    pub fn list_view(&self) -> ListView {
        if let Some(err) = self.todos.error() {
            return ListView::Failed(err.to_string());
        }
        let Some(todos) = self.todos.data() else {
            return if self.todos.loading() { ListView::Placeholders(PLACEHOLDER_ROWS) } else { ListView::Rows(Vec::new()) };
        };
        if todos.is_empty() {
            return ListView::Empty(EMPTY_MESSAGE);
        }
        let rows = todos
            .iter()
            .map(|todo| match &self.edit {
                EditState::Editing { id, buffer } if *id == todo.id => {
                    RowView { id: todo.id.clone(), completed: todo.completed, text: buffer.clone(), editing: true }
                }
                _ => RowView { id: todo.id.clone(), completed: todo.completed, text: todo.title.clone(), editing: false },
            })
            .collect();
        ListView::Rows(rows)
    }

    fn find(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.data().and_then(|todos| todos.iter().find(|todo| todo.id == *id))
    }

    fn reject(&self, err: &RequestError) -> bool {
        self.notifier.error(&err.notice());
        false
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Fetched { generation, outcome } => {
                self.todos.complete(generation, outcome);
            }
            Completion::Created(outcome) => {
                self.create.settle(outcome);
                self.todos.refetch();
            }
            Completion::Updated { renamed, outcome } => {
                self.update.settle(outcome);
                if let Some(id) = renamed {
                    if self.edit.is_editing(&id) {
                        self.edit = EditState::Idle;
                    }
                }
                self.todos.refetch();
            }
            Completion::Deleted(outcome) => {
                self.remove.settle(outcome);
                self.todos.refetch();
            }
        }
        self.sync();
    }

    /// Issues the list fetch if its URL or reload counter moved.
    fn sync(&mut self) {
        if let Some(ticket) = self.todos.poll_due() {
            let generation = ticket.generation;
            self.spawn_request(ticket.request, SuccessNotice::UnlessOk, move |outcome| Completion::Fetched { generation, outcome });
        }
    }

    fn spawn_request<T, F>(&mut self, request: ApiRequest, notice: SuccessNotice, wrap: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, RequestError>) -> Completion + Send + 'static,
    {
        self.in_flight += 1;
        let transport = Arc::clone(&self.transport);
        let notifier = Arc::clone(&self.notifier);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = execute::<T>(transport.as_ref(), notifier.as_ref(), request, notice).await;
            // receiver gone means the view was torn down
            let _ = completions.send(wrap(outcome));
        });
    }
}
