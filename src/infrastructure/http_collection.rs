use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::domain::collection::TodoCollection;
use crate::domain::todo::{Todo, TodoId, TodoPayload};
use crate::error::CollectionError;

/// The remote collection reached over HTTP: `GET`/`POST` on the base URL,
/// `PUT`/`DELETE` on `{base}{id}/`.
#[derive(Clone)]
pub struct HttpTodoCollection {
    client: Client,
    base_url: String,
}

impl HttpTodoCollection {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollectionError> {
        let client = Client::builder().timeout(timeout).build().map_err(network)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        let base_url = format!("{}/", base_url.trim_end_matches('/'));
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn item_url(&self, id: TodoId) -> String { format!("{}{}/", self.base_url, id) }
}

#[async_trait]
impl TodoCollection for HttpTodoCollection {
    async fn list(&self) -> Result<Vec<Todo>, CollectionError> {
        debug!(url = %self.base_url, "GET");
        let response = self.client.get(&self.base_url).send().await.map_err(network)?;
        let body = success(response).await?.bytes().await.map_err(network)?;
        serde_json::from_slice(&body).map_err(|e| CollectionError::Decode(e.to_string()))
    }

    async fn create(&self, payload: &TodoPayload) -> Result<(), CollectionError> {
        debug!(url = %self.base_url, "POST");
        let response = self.client
            .post(&self.base_url)
            .json(payload)
            .send()
            .await
            .map_err(network)?;
        success(response).await.map(drop)
    }

    async fn update(&self, id: TodoId, payload: &TodoPayload) -> Result<(), CollectionError> {
        let url = self.item_url(id);
        debug!(%url, "PUT");
        let response = self.client
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(network)?;
        success(response).await.map(drop)
    }

    async fn delete(&self, id: TodoId) -> Result<(), CollectionError> {
        let url = self.item_url(id);
        debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await.map_err(network)?;
        success(response).await.map(drop)
    }
}

async fn success(response: Response) -> Result<Response, CollectionError> {
    let status = response.status();
    if status.is_success() { return Ok(response); }
    let body = response.text().await.unwrap_or_default();
    Err(CollectionError::Server { status: status.as_u16(), body })
}

fn network(e: reqwest::Error) -> CollectionError { CollectionError::Network(e.to_string()) }

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::Bytes, extract::State, http::{Method, StatusCode, Uri}, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::todo::{Draft, Field, TodoFields};

    type Seen = Arc<Mutex<Vec<(Method, String, Value)>>>;

    async fn remember(State(seen): State<Seen>, method: Method, uri: Uri, body: Bytes) -> StatusCode {
        let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
        seen.lock().unwrap().push((method, uri.path().to_string(), json));
        StatusCode::OK
    }

    async fn recording_server() -> (HttpTodoCollection, Seen) {
        let seen = Seen::default();
        let app = Router::new().fallback(remember).with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        let collection = HttpTodoCollection::new(&format!("http://{addr}/api/todo"), Duration::from_secs(5)).unwrap();
        (collection, seen)
    }

    #[tokio::test]
    async fn drafts_go_on_the_wire_as_documented() {
        let (collection, seen) = recording_server().await;

        let mut draft = Draft::default();
        draft.set(Field::Title, "A");
        draft.set(Field::Description, "B");
        collection.create(&draft.payload()).await.unwrap();

        let editing = Draft::Editing(TodoId(4), TodoFields::new("A2", "B"));
        collection.update(TodoId(4), &editing.payload()).await.unwrap();
        collection.delete(TodoId(4)).await.unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![
            (Method::POST, "/api/todo/".to_string(), json!({ "id": null, "title": "A", "description": "B" })),
            (Method::PUT, "/api/todo/4/".to_string(), json!({ "id": 4, "title": "A2", "description": "B" })),
            (Method::DELETE, "/api/todo/4/".to_string(), Value::Null),
        ]);
    }

    #[tokio::test]
    async fn error_statuses_keep_status_and_body() {
        let app = Router::new().fallback(|| async { (StatusCode::NOT_FOUND, "gone") });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        let collection = HttpTodoCollection::new(&format!("http://{addr}/api/todo/"), Duration::from_secs(5)).unwrap();

        let err = collection.delete(TodoId(1)).await.unwrap_err();
        assert!(matches!(err, CollectionError::Server { status: 404, ref body } if body == "gone"));
    }

    #[test]
    fn base_url_always_ends_with_one_slash() {
        let a = HttpTodoCollection::with_client(Client::new(), "http://127.0.0.1:8000/api/todo");
        let b = HttpTodoCollection::with_client(Client::new(), "http://127.0.0.1:8000/api/todo//");
        assert_eq!(a.base_url(), "http://127.0.0.1:8000/api/todo/");
        assert_eq!(b.base_url(), "http://127.0.0.1:8000/api/todo/");
    }

    #[test]
    fn item_url_appends_id_and_trailing_slash() {
        let c = HttpTodoCollection::with_client(Client::new(), "http://127.0.0.1:8000/api/todo/");
        assert_eq!(c.item_url(TodoId(12)), "http://127.0.0.1:8000/api/todo/12/");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // nothing listens on the discard port
        let c = HttpTodoCollection::new("http://127.0.0.1:9/api/todo/", Duration::from_secs(2)).unwrap();
        assert!(matches!(c.list().await, Err(CollectionError::Network(_))));
    }
}
