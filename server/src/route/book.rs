use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookPayloadTransformer, BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookRequest,
    UpdateBookRequest,
};
use crate::response::{BookPresenter, BookResponse, CreatedBookResponse};
use application::service::{
    CreateBookService, DeleteBookService, GetBookService, UpdateBookService,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), BookPresenter)
                    .bypass(|| async move { module.pgpool().get_all_books().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(create_book),
        )
        .route(
            "/books/:isbn",
            get(
                |State(module): State<AppModule>, Path(isbn): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(isbn.clone()))
                        .handle(|dto| async move { module.pgpool().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .and_then(|res| {
                            res.ok_or_else(|| {
                                ErrorStatus::not_found(format!(
                                    "There is no book with an isbn '{isbn}"
                                ))
                            })
                        })
                },
            )
            .put(update_book)
            .delete(
                |State(module): State<AppModule>, Path(isbn): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(isbn.clone()))
                        .handle(|dto| async move { module.pgpool().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .and_then(|res| {
                            res.ok_or_else(|| {
                                ErrorStatus::not_found(format!(
                                    "There is no book with an isbn {isbn}"
                                ))
                            })
                        })
                },
            ),
        )
    }
}

async fn create_book(
    State(module): State<AppModule>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CreatedBookResponse, ErrorStatus> {
    let body = payload(body)?;
    Controller::new(BookPayloadTransformer::new(module.schema().clone()), BookPresenter)
        .try_intake(CreateBookRequest::new(body))?
        .handle(|dto| async move { module.pgpool().create_book(dto).await })
        .await
        .map_err(ErrorStatus::from)
}

async fn update_book(
    State(module): State<AppModule>,
    Path(isbn): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<BookResponse, ErrorStatus> {
    let body = payload(body)?;
    Controller::new(BookPayloadTransformer::new(module.schema().clone()), BookPresenter)
        .try_intake(UpdateBookRequest::new(isbn.clone(), body))?
        .handle(|dto| async move { module.pgpool().update_book(dto).await })
        .await
        .map_err(ErrorStatus::from)?
        .ok_or_else(|| ErrorStatus::not_found(format!("There is no book with an isbn '{isbn}")))
}

/// A body sent without a JSON content type is validated as an empty object.
fn payload(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ErrorStatus> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Map::new())),
        Err(rejection) => Err(ErrorStatus::from(rejection)),
    }
}

#[cfg(test)]
mod test {
    use axum::body::{to_bytes, Body};
    use axum::extract::rejection::JsonRejection;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use rand::distributions::{Distribution, Uniform};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{payload, BookRouter};
    use crate::handler::AppModule;

    fn random_isbn() -> String {
        let digit = Uniform::from(0..10);
        let mut rng = rand::thread_rng();
        (0..13)
            .map(|_| char::from(b'0' + digit.sample(&mut rng)))
            .collect()
    }

    fn book(isbn: &str) -> Value {
        json!({
            "isbn": isbn,
            "amazon_url": "https://www.amazon.com/dp/0143127748",
            "author": "Atul Gawande",
            "language": "english",
            "pages": 304,
            "publisher": "Metropolitan Books",
            "title": "Being Mortal: Medicine and What Matters in the End",
            "year": 2014
        })
    }

    async fn router() -> Router {
        let app = AppModule::new().await.unwrap();
        Router::new().route_book().with_state(app)
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_then_fetch_echoes_input() {
        let router = router().await;
        let isbn = random_isbn();

        let (status, body) = send(&router, Method::POST, "/books", Some(book(&isbn))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "book": book(&isbn) }));

        let (status, body) = send(&router, Method::GET, &format!("/books/{isbn}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "book": book(&isbn) }));

        let (status, body) = send(&router, Method::GET, "/books", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["books"].as_array().unwrap().contains(&book(&isbn)));

        let (status, body) = send(&router, Method::POST, "/books", Some(book(&isbn))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"]["message"],
            json!(format!("There is already a book with an isbn {isbn}"))
        );

        send(&router, Method::DELETE, &format!("/books/{isbn}"), None).await;
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_rejects_mistyped_fields() {
        let router = router().await;
        let mut invalid = book(&random_isbn());
        invalid["amazon_url"] = json!(890);
        invalid["pages"] = json!("304");

        let (status, body) = send(&router, Method::POST, "/books", Some(invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            json!([
                "instance.amazon_url is not of a type(s) string",
                "instance.pages is not of a type(s) integer"
            ])
        );
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn unknown_isbn_is_not_found() {
        let router = router().await;
        let (status, body) = send(&router, Method::GET, "/books/97814548539", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            json!("There is no book with an isbn '97814548539")
        );
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn update_changes_fields_and_validates() {
        let router = router().await;
        let isbn = random_isbn();
        send(&router, Method::POST, "/books", Some(book(&isbn))).await;
        let uri = format!("/books/{isbn}");

        let mut changed = book(&isbn);
        changed["pages"] = json!(500);
        changed["year"] = json!(2000);
        let (status, body) = send(&router, Method::PUT, &uri, Some(changed.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "book": changed }));

        let partial = json!({ "pages": 500, "publisher": 90, "title": "Steve Jobs", "year": 2000 });
        let (status, body) = send(&router, Method::PUT, &uri, Some(partial)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            json!([
                "instance requires property \"isbn\"",
                "instance requires property \"amazon_url\"",
                "instance requires property \"author\"",
                "instance requires property \"language\"",
                "instance.publisher is not of a type(s) string"
            ])
        );

        let missing = random_isbn();
        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/books/{missing}"),
            Some(book(&missing)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            json!(format!("There is no book with an isbn '{missing}"))
        );

        send(&router, Method::DELETE, &uri, None).await;
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn delete_twice_reports_missing_book() {
        let router = router().await;
        let isbn = random_isbn();
        send(&router, Method::POST, "/books", Some(book(&isbn))).await;
        let uri = format!("/books/{isbn}");

        let (status, body) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Book deleted" }));

        let (status, body) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            json!(format!("There is no book with an isbn {isbn}"))
        );
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let router = router().await;
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn body_without_content_type_is_empty_object() {
        let router: Router = Router::new().route(
            "/",
            post(|body: Result<Json<Value>, JsonRejection>| async move {
                payload(body).map(Json)
            }),
        );

        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from(r#"{"isbn":"9781451648539"}"#))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!({}));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_without_content_type_lists_required_fields() {
        let router = router().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/books")
            .body(Body::from(book(&random_isbn()).to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["error"]["message"],
            json!([
                "instance requires property \"isbn\"",
                "instance requires property \"amazon_url\"",
                "instance requires property \"author\"",
                "instance requires property \"language\"",
                "instance requires property \"pages\"",
                "instance requires property \"publisher\"",
                "instance requires property \"title\"",
                "instance requires property \"year\""
            ])
        );
    }
}
