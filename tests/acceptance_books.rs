use axum::body::to_bytes;
use axum::Router;
use bookshelf::application::record_service::RecordServiceImpl;
use bookshelf::domain::{book::{Book, seed_books}, store::IdPolicy};
use bookshelf::http::{routes, routing};
use bookshelf::infrastructure::memory_repo::InMemoryRepository;
use serde_json::{json, Value};

fn app() -> Router {
    let repo = InMemoryRepository::seeded(IdPolicy::Tail, seed_books());
    routing::app(routes::books(RecordServiceImpl::<Book, _>::new(repo)))
}

fn new_book() -> Value {
    json!({
        "title": "A new book",
        "author": "A new Author",
        "description": "A description of a new book",
        "rating": 5,
        "published_date": 2000
    })
}

#[tokio::test]
async fn acceptance_seeded_books_scenario() {
    let app = app();

    let res = request(&app, "GET", "/health", None).await;
    assert_eq!(res.status(), 200);

    // list
    let res = request(&app, "GET", "/books", None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(body(res).await.as_array().unwrap().len(), 5);

    // filter by rating
    let res = request(&app, "GET", "/books?rating=5", None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(body(res).await.as_array().unwrap().len(), 4);

    // replace id 3 so it is rated 5 too
    let mut replacement = new_book();
    replacement["id"] = json!(3);
    let res = request(&app, "PUT", "/books/3", Some(replacement)).await;
    assert_eq!(res.status(), 204);
    let res = request(&app, "GET", "/books?rating=5", None).await;
    assert_eq!(body(res).await.as_array().unwrap().len(), 5);

    // delete id 3
    let res = request(&app, "DELETE", "/books/3", None).await;
    assert_eq!(res.status(), 204);
    let res = request(&app, "GET", "/books/3", None).await;
    assert_eq!(res.status(), 404);
    assert!(body(res).await["message"].as_str().unwrap().contains('3'));

    // create takes tail id + 1, whatever id the body carries
    let mut with_id = new_book();
    with_id["id"] = json!(0);
    let res = request(&app, "POST", "/books", Some(with_id)).await;
    assert_eq!(res.status(), 201);
    let created = body(res).await;
    assert_eq!(created["id"], 6);
    assert_eq!(created["title"], "A new book");

    let res = request(&app, "GET", "/books/6", None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(body(res).await, created);
}

#[tokio::test]
async fn acceptance_filters_ignore_case_and_combine() {
    let app = app();

    let res = request(&app, "GET", "/books?author=CODINGCO4", None).await;
    let found = body(res).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], 4);

    let res = request(&app, "GET", "/books?rating=5&published_date=2012", None).await;
    assert_eq!(body(res).await.as_array().unwrap().len(), 2);

    let res = request(&app, "GET", "/books?author=nobody", None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(body(res).await, json!([]));
}

#[tokio::test]
async fn acceptance_rejects_bad_input() {
    let app = app();

    // out-of-range query value
    let res = request(&app, "GET", "/books?rating=9", None).await;
    assert_eq!(res.status(), 422);

    // query strings that do not parse get the same JSON error body
    let res = request(&app, "GET", "/books?rating=abc", None).await;
    assert_eq!(res.status(), 422);
    assert!(body(res).await["message"].as_str().unwrap().contains("query string"));
    let res = request(&app, "GET", "/books?category=science", None).await;
    assert_eq!(res.status(), 422);
    assert!(body(res).await["message"].as_str().unwrap().contains("category"));

    // validation failure on create leaves the store alone
    let mut short = new_book();
    short["title"] = json!("ab");
    let res = request(&app, "POST", "/books", Some(short)).await;
    assert_eq!(res.status(), 422);
    let res = request(&app, "GET", "/books", None).await;
    assert_eq!(body(res).await.as_array().unwrap().len(), 5);

    // ids in the path must be positive integers
    let res = request(&app, "GET", "/books/0", None).await;
    assert_eq!(res.status(), 422);
    let res = request(&app, "GET", "/books/abc", None).await;
    assert_eq!(res.status(), 422);

    // body id disagreeing with the path
    let mut mismatch = new_book();
    mismatch["id"] = json!(2);
    let res = request(&app, "PUT", "/books/1", Some(mismatch)).await;
    assert_eq!(res.status(), 400);

    // replacing or deleting something absent
    let res = request(&app, "PUT", "/books/99", Some(new_book())).await;
    assert_eq!(res.status(), 404);
    let res = request(&app, "DELETE", "/books/99", None).await;
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn acceptance_update_book_takes_id_from_body() {
    let app = app();

    let mut payload = new_book();
    payload["id"] = json!(2);
    payload["rating"] = json!(1);
    let res = request(&app, "PUT", "/books/update_book", Some(payload)).await;
    assert_eq!(res.status(), 204);
    let res = request(&app, "GET", "/books/2", None).await;
    assert_eq!(body(res).await["rating"], 1);

    let res = request(&app, "PUT", "/books/update_book", Some(new_book())).await;
    assert_eq!(res.status(), 422);

    let mut zero = new_book();
    zero["id"] = json!(0);
    let res = request(&app, "PUT", "/books/update_book", Some(zero.clone())).await;
    assert_eq!(res.status(), 422);
    let res = request(&app, "PUT", "/books/2", Some(zero)).await;
    assert_eq!(res.status(), 422);
}

async fn body(res: hyper::Response<axum::body::Body>) -> Value {
    serde_json::from_slice(&to_bytes(res.into_body(), 1024 * 1024).await.unwrap()).unwrap()
}

async fn request(app: &Router, method: &str, path: &str, body: Option<Value>) -> hyper::Response<axum::body::Body> {
    use axum::body::Body;
    use axum::http::{Request, Method};
    use tower::ServiceExt;

    let req = Request::builder().method(Method::from_bytes(method.as_bytes()).unwrap()).uri(path);
    let req = match body {
        Some(json) => req.header("content-type", "application/json").body(Body::from(json.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
}
