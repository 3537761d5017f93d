use std::net::SocketAddr;
use std::time::Duration;

use todo_sync::application::notice::{Level, Toasts};
use todo_sync::application::synchronizer::{self, TodoSynchronizer};
use todo_sync::application::view::{ListView, EMPTY_MESSAGE};
use todo_sync::domain::repository::TodoStore;
use todo_sync::domain::todo::{Draft, Field, TodoFields};
use todo_sync::http::routing::{self, todos};
use todo_sync::infrastructure::{http_collection::HttpTodoCollection, sqlite_repo::SqliteTodoStore};

async fn spawn_server() -> SocketAddr {
    // use in-memory sqlite for tests
    let store = SqliteTodoStore::connect("sqlite::memory:").await.unwrap();
    store.init().await.unwrap();
    let app = routing::app(todos::router(todos::AppState { store }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

fn client(addr: SocketAddr) -> TodoSynchronizer<HttpTodoCollection, Toasts> {
    let collection = HttpTodoCollection::new(&format!("http://{addr}/api/todo"), Duration::from_secs(5)).unwrap();
    TodoSynchronizer::new(collection, Toasts::new(Duration::from_secs(60)))
}

#[tokio::test]
async fn acceptance_add_edit_delete_round_trip() {
    let addr = spawn_server().await;
    let mut sync = client(addr);

    // empty collection
    sync.fetch_all().await.unwrap();
    assert_eq!(ListView::project(sync.list()), ListView::Empty);
    assert_eq!(EMPTY_MESSAGE, "No todos available");

    // add
    sync.apply_input("title", "A").unwrap();
    sync.apply_input("description", "B").unwrap();
    sync.submit().await.unwrap();
    assert_eq!(sync.draft(), &Draft::default());
    assert_eq!(sync.list().len(), 1);
    let created = sync.list()[0].clone();
    assert_eq!((created.title.as_str(), created.description.as_str()), ("A", "B"));
    assert_eq!(sync.notifier().current().unwrap().message, synchronizer::ADDED);

    // edit
    sync.begin_edit(&created);
    sync.set_field(Field::Title, "A2");
    sync.submit().await.unwrap();
    assert!(!sync.draft().is_editing());
    assert_eq!(sync.list().len(), 1);
    assert_eq!(sync.list()[0].id, created.id);
    assert_eq!(sync.list()[0].title, "A2");

    // delete
    sync.remove(created.id).await.unwrap();
    assert_eq!(ListView::project(sync.list()), ListView::Empty);
    assert_eq!(sync.notifier().current().unwrap().message, synchronizer::REMOVED);
}

#[tokio::test]
async fn acceptance_refresh_is_idempotent() {
    let addr = spawn_server().await;
    let mut sync = client(addr);
    for (title, description) in [("one", "1"), ("two", "2")] {
        sync.set_field(Field::Title, title);
        sync.set_field(Field::Description, description);
        sync.submit().await.unwrap();
    }
    sync.fetch_all().await.unwrap();
    let first = ListView::project(sync.list());
    sync.fetch_all().await.unwrap();
    assert_eq!(ListView::project(sync.list()), first);
    assert_eq!(first.rows().len(), 2);
}

#[tokio::test]
async fn acceptance_update_of_vanished_todo_keeps_draft() {
    let addr = spawn_server().await;
    let mut sync = client(addr);
    sync.set_field(Field::Title, "A");
    sync.set_field(Field::Description, "B");
    sync.submit().await.unwrap();
    let todo = sync.list()[0].clone();

    // someone else deletes it
    let mut other = client(addr);
    other.remove(todo.id).await.unwrap();

    sync.begin_edit(&todo);
    sync.set_field(Field::Description, "B2");
    assert!(sync.submit().await.is_err());
    assert_eq!(sync.draft(), &Draft::Editing(todo.id, TodoFields::new("A", "B2")));
    let notice = sync.notifier().current().unwrap();
    assert_eq!((notice.level, notice.message.as_str()), (Level::Error, synchronizer::UPDATE_FAILED));
}

#[tokio::test]
async fn acceptance_unreachable_collection_only_notifies() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let mut sync = client(addr);

    assert!(sync.fetch_all().await.is_err());
    sync.set_field(Field::Title, "A");
    sync.set_field(Field::Description, "B");
    assert!(sync.submit().await.is_err());

    assert!(sync.list().is_empty());
    assert_eq!(sync.draft(), &Draft::New(TodoFields::new("A", "B")));
    assert_eq!(sync.notifier().current().unwrap().message, synchronizer::ADD_FAILED);
}
