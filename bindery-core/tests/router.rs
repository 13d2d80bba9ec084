use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::routing::get;
use bindery_core::prelude::*;
use bindery_core::{ParamLocation, ResultDeclaration};
use http_body_util::BodyExt;
use schemars::JsonSchema;
use serde::Serialize;
use tower::ServiceExt;

#[derive(Debug, Clone, Serialize, JsonSchema)]
struct Pet {
    id: i64,
    name: String,
}

async fn get_pet(_ctx: RequestContext, id: i64) -> Json<Pet> {
    Json(Pet {
        id,
        name: "Rex".into(),
    })
}

async fn list_pets(_ctx: RequestContext, limit: i32, species: Option<String>) -> Json<Vec<Pet>> {
    let _ = species;
    Json(
        (0..limit as i64)
            .map(|id| Pet {
                id,
                name: format!("pet-{id}"),
            })
            .collect(),
    )
}

fn pets() -> DocumentedRouter {
    DocumentedRouter::new()
        .get(
            "/pets/{id}",
            documented(
                (path::<i64>("id").description("Pet identifier"),),
                |doc| {
                    doc.summary("Fetch a pet").tag("pets");
                },
                get_pet,
                |results| {
                    results.json::<Pet>(200).empty(404);
                },
            ),
        )
        .get(
            "/pets",
            documented(
                (
                    query::<i32>("limit").default_value(2),
                    query::<String>("species").nullable(),
                ),
                |doc| {
                    doc.operation_id("listPets");
                },
                list_pets,
                |results| {
                    results.json::<Vec<Pet>>(200);
                },
            ),
        )
}

#[test]
fn routes_are_collected_in_registration_order() {
    let router = pets();
    let routes = router.routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].method, "GET");
    assert_eq!(routes[0].path, "/pets/{id}");
    assert_eq!(routes[1].path, "/pets");
}

#[test]
fn default_operation_id_is_derived() {
    let router = pets();
    let routes = router.routes();
    assert_eq!(routes[0].operation.operation_id.as_deref(), Some("get_pets_id"));
    assert_eq!(routes[1].operation.operation_id.as_deref(), Some("listPets"));
}

#[test]
fn documentation_carries_params_and_results() {
    let router = pets();
    let op = &router.routes()[1].operation;

    let query: Vec<_> = op.params_in(ParamLocation::Query).collect();
    assert_eq!(query.len(), 2);
    assert_eq!(query[0].name, "limit");
    assert!(!query[0].required);
    assert_eq!(query[0].default, Some(serde_json::json!(2)));
    assert_eq!(query[1].name, "species");
    assert!(query[1].nullable);

    let single = &router.routes()[0].operation;
    assert_eq!(single.summary.as_deref(), Some("Fetch a pet"));
    assert_eq!(single.tags, vec!["pets"]);
    assert!(single.params[0].required);
    assert_eq!(single.params[0].description.as_deref(), Some("Pet identifier"));
    let statuses: Vec<u16> = single.responses.iter().map(ResultDeclaration::status).collect();
    assert_eq!(statuses, vec![200, 404]);
}

#[test]
fn merge_combines_documentation() {
    let health = DocumentedRouter::new().route(
        Method::HEAD,
        "/health",
        documented((), |_| {}, |_ctx: RequestContext| async { StatusCode::OK }, |r| {
            r.empty(200);
        }),
    );
    let router = pets().merge(health);
    let methods: Vec<&str> = router.routes().iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["GET", "GET", "HEAD"]);
}

#[test]
fn route_docs_serialize_to_json() {
    let router = pets();
    let value = serde_json::to_value(&router.routes()[0]).unwrap();
    assert_eq!(value["method"], "GET");
    assert_eq!(value["path"], "/pets/{id}");
    assert_eq!(value["operation"]["summary"], "Fetch a pet");
    assert_eq!(value["operation"]["params"][0]["name"], "id");
}

#[test]
#[should_panic(expected = "axum does not route")]
fn unroutable_method_is_rejected_at_registration() {
    let purge = Method::from_bytes(b"PURGE").unwrap();
    let _ = DocumentedRouter::<()>::new().route(
        purge,
        "/cache",
        documented((), |_| {}, |_ctx: RequestContext| async { StatusCode::OK }, |_| {}),
    );
}

#[tokio::test]
async fn documented_router_serves_requests() {
    let app = pets()
        .route_service("/health", get(|| async { "ok" }))
        .with_trace_layer()
        .into_router();

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/pets?limit=3").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let pets: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(pets.as_array().unwrap().len(), 3);

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn router_options_apply_to_registered_handlers() {
    let options = BindOptions {
        expose_details: false,
        ..BindOptions::default()
    };
    let app = DocumentedRouter::<()>::new()
        .with_options(options)
        .get(
            "/pets/{id}",
            documented((path::<i64>("id"),), |_| {}, get_pet, |_| {}),
        )
        .into_router();

    let resp = app
        .oneshot(Request::builder().uri("/pets/x").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json.get("parameter").is_none());
}
