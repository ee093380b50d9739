use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use serde_json::{Value, json};

use audit_log_axum::AuditHandle;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_items(
    Extension(audit): Extension<AuditHandle>,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let name = query.get("name").cloned().unwrap_or_default();
    let items: Vec<Value> = ["alpha", "beta", "gamma"]
        .iter()
        .enumerate()
        .filter(|(_, item)| item.contains(name.as_str()))
        .map(|(id, item)| json!({ "id": id, "name": item }))
        .collect();

    audit.with(|record| {
        record.set_filter("item", "name", name.as_str());
        record.set_results(items.clone());
        record.info("listed items");
    });

    Json(items)
}

pub async fn get_item(
    Extension(audit): Extension<AuditHandle>,
    Path(id): Path<u32>,
) -> Result<Json<Value>, StatusCode> {
    if id > 2 {
        audit.with(|record| {
            record.warning(format!("item {id} not found"));
        });
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "id": id })))
}

pub async fn admin(Extension(audit): Extension<AuditHandle>) -> StatusCode {
    let authenticated = audit
        .with(|record| record.user.as_ref().is_some_and(|u| u.authenticated))
        .unwrap_or(false);

    audit.with(|record| {
        let grantee = record
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .unwrap_or_default();
        record.set_authorization(authenticated, grantee, vec!["admin".to_string()]);
    });

    if authenticated {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::FORBIDDEN
    }
}

pub async fn explode() -> &'static str {
    panic!("requested panic");
}
