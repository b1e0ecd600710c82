#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use serde_json::json;

    use super::super::fakes::{RecordingNotifier, ScriptedTransport};
    use super::super::todo_app::{EditState, ListView, TodoApp, EMPTY_MESSAGE, PLACEHOLDER_ROWS};
    use crate::domain::todo::{Filter, TodoId};

    const THREE: &str = r#"[
        {"id":"1","title":"a","completed":false},
        {"id":"2","title":"b","completed":true},
        {"id":"3","title":"c","completed":false}
    ]"#;

    fn backend(list: &str) -> (Arc<ScriptedTransport>, Arc<RecordingNotifier>) {
        let transport = Arc::new(ScriptedTransport::default());
        transport.respond(Method::GET, "/todos", 200, list);
        (transport, Arc::new(RecordingNotifier::default()))
    }

    async fn mounted(transport: &Arc<ScriptedTransport>, notifier: &Arc<RecordingNotifier>) -> TodoApp {
        let mut app = TodoApp::new(transport.clone(), notifier.clone());
        app.settle().await;
        app
    }

    fn bodies(transport: &ScriptedTransport, method: Method) -> Vec<serde_json::Value> {
        transport
            .requests()
            .into_iter()
            .filter(|r| r.method == method)
            .map(|r| r.body.unwrap_or(serde_json::Value::Null))
            .collect()
    }

    #[tokio::test]
    async fn placeholders_until_the_first_fetch_lands() {
        let (transport, notifier) = backend(THREE);
        let mut app = TodoApp::new(transport.clone(), notifier.clone());
        assert_eq!(app.list_view(), ListView::Placeholders(PLACEHOLDER_ROWS));

        app.settle().await;
        match app.list_view() {
            ListView::Rows(rows) => {
                assert_eq!(rows.len(), 3);
                assert_eq!(rows[1].text, "b");
                assert!(rows[1].completed);
                assert_eq!(rows[1].controls(), ["Edit", "Delete"]);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_list_renders_the_empty_state() {
        let (transport, notifier) = backend("[]");
        let app = mounted(&transport, &notifier).await;
        assert_eq!(app.list_view(), ListView::Empty(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn add_posts_trimmed_title_once_then_refetches() {
        let (transport, notifier) = backend("[]");
        transport.respond(Method::POST, "/todos", 201, r#"{"id":"7","title":"buy milk","completed":false}"#);
        let mut app = mounted(&transport, &notifier).await;

        app.set_draft("  buy milk  ");
        assert!(app.add_todo());
        assert_eq!(app.draft(), "");
        app.settle().await;

        assert_eq!(bodies(&transport, Method::POST), vec![json!({ "title": "buy milk", "completed": false })]);
        assert_eq!(transport.calls(), vec!["GET /todos", "POST /todos", "GET /todos"]);
        assert_eq!(notifier.successes(), vec!["Success: Created".to_string()]);
        assert_eq!(app.create().data().map(|t| t.id.clone()), Some(TodoId::new("7")));
    }

    #[tokio::test]
    async fn blank_draft_issues_nothing() {
        let (transport, notifier) = backend("[]");
        let mut app = mounted(&transport, &notifier).await;

        for draft in ["", "   ", "\t\n"] {
            app.set_draft(draft);
            assert!(!app.add_todo());
        }
        app.settle().await;
        assert_eq!(transport.calls(), vec!["GET /todos"]);
    }

    #[tokio::test]
    async fn toggle_flips_only_completed() {
        let (transport, notifier) = backend(THREE);
        transport.respond(Method::PATCH, "/todos/2", 200, r#"{"id":"2","title":"b","completed":false}"#);
        let mut app = mounted(&transport, &notifier).await;

        assert!(app.toggle(&TodoId::new("2")));
        app.settle().await;

        assert_eq!(bodies(&transport, Method::PATCH), vec![json!({ "completed": false })]);
        assert_eq!(transport.calls(), vec!["GET /todos", "PATCH /todos/2", "GET /todos"]);
    }

    #[tokio::test]
    async fn toggle_of_unknown_row_is_ignored() {
        let (transport, notifier) = backend(THREE);
        let mut app = mounted(&transport, &notifier).await;
        assert!(!app.toggle(&TodoId::new("99")));
        assert_eq!(app.in_flight(), 0);
    }

    #[tokio::test]
    async fn save_edit_patches_only_the_title_and_returns_to_idle() {
        let (transport, notifier) = backend(THREE);
        transport.respond(Method::PATCH, "/todos/1", 200, r#"{"id":"1","title":"renamed","completed":false}"#);
        let mut app = mounted(&transport, &notifier).await;

        assert!(app.start_edit(&TodoId::new("1")));
        assert_eq!(app.edit(), &EditState::Editing { id: TodoId::new("1"), buffer: "a".into() });
        *app.edit_buffer_mut().unwrap() = " renamed ".into();
        match app.list_view() {
            ListView::Rows(rows) => {
                assert!(rows[0].editing);
                assert_eq!(rows[0].text, " renamed ");
                assert_eq!(rows[0].controls(), ["Save", "Cancel"]);
            }
            other => panic!("expected rows, got {other:?}"),
        }

        assert!(app.save_edit());
        app.settle().await;

        assert_eq!(bodies(&transport, Method::PATCH), vec![json!({ "title": "renamed" })]);
        assert_eq!(app.edit(), &EditState::Idle);
        assert_eq!(transport.calls(), vec!["GET /todos", "PATCH /todos/1", "GET /todos"]);
    }

    #[tokio::test]
    async fn blank_edit_is_not_saved() {
        let (transport, notifier) = backend(THREE);
        let mut app = mounted(&transport, &notifier).await;

        app.start_edit(&TodoId::new("3"));
        *app.edit_buffer_mut().unwrap() = "   ".into();
        assert!(!app.save_edit());
        app.settle().await;

        assert_eq!(app.edit(), &EditState::Editing { id: TodoId::new("3"), buffer: "   ".into() });
        assert_eq!(transport.calls(), vec!["GET /todos"]);
    }

    #[tokio::test]
    async fn cancel_discards_the_buffer_without_a_request() {
        let (transport, notifier) = backend(THREE);
        let mut app = mounted(&transport, &notifier).await;

        app.start_edit(&TodoId::new("1"));
        app.edit_buffer_mut().unwrap().push_str(" more");
        app.cancel_edit();

        assert_eq!(app.edit(), &EditState::Idle);
        assert!(app.edit_buffer_mut().is_none());
        assert_eq!(transport.calls(), vec!["GET /todos"]);
    }

    #[tokio::test]
    async fn starting_a_second_edit_replaces_the_first() {
        let (transport, notifier) = backend(THREE);
        let mut app = mounted(&transport, &notifier).await;

        app.start_edit(&TodoId::new("1"));
        app.edit_buffer_mut().unwrap().push('!');
        app.start_edit(&TodoId::new("3"));

        assert_eq!(app.edit(), &EditState::Editing { id: TodoId::new("3"), buffer: "c".into() });
    }

    #[tokio::test]
    async fn filters_map_to_the_completed_query_parameter() {
        let (transport, notifier) = backend(THREE);
        transport.respond(Method::GET, "/todos?completed=true", 200, "[]");
        transport.respond(Method::GET, "/todos?completed=false", 200, "[]");
        let mut app = mounted(&transport, &notifier).await;

        app.set_filter(Filter::Completed);
        app.settle().await;
        app.set_filter(Filter::Active);
        app.settle().await;
        app.set_filter(Filter::All);
        app.settle().await;
        app.set_filter(Filter::All);
        app.settle().await;

        assert_eq!(
            transport.calls(),
            vec!["GET /todos", "GET /todos?completed=true", "GET /todos?completed=false", "GET /todos"]
        );
        assert_eq!(app.filter(), Filter::All);
    }

    #[tokio::test]
    async fn latest_filter_wins_when_fetches_overlap() {
        let (transport, notifier) = backend(THREE);
        transport.respond(Method::GET, "/todos?completed=true", 200, r#"[{"id":"2","title":"b","completed":true}]"#);
        transport.respond(Method::GET, "/todos?completed=false", 200, r#"[{"id":"1","title":"a","completed":false}]"#);
        let mut app = TodoApp::new(transport.clone(), notifier.clone());

        app.set_filter(Filter::Completed);
        app.set_filter(Filter::Active);
        app.settle().await;

        let ids: Vec<_> = app.todos().data().unwrap().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![TodoId::new("1")]);
        assert!(!app.todos().loading());
    }

    #[tokio::test]
    async fn failed_fetch_sets_error_and_clears_data() {
        let (transport, notifier) = backend(THREE);
        transport.respond(Method::GET, "/todos", 500, "boom");
        let mut app = mounted(&transport, &notifier).await;
        assert!(app.todos().data().is_some());

        app.refetch();
        app.settle().await;

        assert!(app.todos().data().is_none());
        assert_eq!(app.todos().error().and_then(|e| e.status()), Some(500));
        assert!(matches!(app.list_view(), ListView::Failed(_)));
        assert_eq!(notifier.errors(), vec!["Error 500: Internal Server Error".to_string()]);
    }

    #[tokio::test]
    async fn delete_fires_once_then_refetches_once() {
        let (transport, notifier) = backend(THREE);
        transport.respond(Method::DELETE, "/todos/2", 200, r#"{"id":"2"}"#);
        let mut app = mounted(&transport, &notifier).await;

        app.delete(&TodoId::new("2"));
        app.settle().await;

        assert_eq!(transport.calls(), vec!["GET /todos", "DELETE /todos/2", "GET /todos"]);
        assert_eq!(notifier.successes(), vec!["Success: OK".to_string()]);
    }

    #[tokio::test]
    async fn failed_mutation_still_refetches() {
        let (transport, notifier) = backend(THREE);
        transport.respond(Method::DELETE, "/todos/3", 404, r#"{"message":"Not found"}"#);
        let mut app = mounted(&transport, &notifier).await;

        app.delete(&TodoId::new("3"));
        app.settle().await;

        assert!(app.remove().error().is_some());
        assert!(app.remove().data().is_none());
        assert_eq!(notifier.errors(), vec!["Error 404: Not Found".to_string()]);
        assert_eq!(transport.calls(), vec!["GET /todos", "DELETE /todos/3", "GET /todos"]);
    }
}
