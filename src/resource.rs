//! The `/customers` resource.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/customers` | 200, JSON array |
//! | POST | `/customers` | 201, `location: /customers/{id}` |
//! | GET | `/customers/{id}` | 200, JSON object |
//! | PUT | `/customers/{id}` | 200, body `{"Name": "..."}` |
//! | DELETE | `/customers/{id}` | 200 |
//!
//! Every path is mounted under a configurable base path.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::method::Method;
use crate::rejection::Rejection;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;
use crate::store::{CustomerStore, Fields, NAME_FIELD};

/// The state every customer handler receives.
pub type Store = Arc<CustomerStore>;

/// Builds the router with all five customer routes mounted under `base_path`
/// (e.g. `/spring`, or `""` for the root).
pub fn router(store: Store, base_path: &str) -> Router<Store> {
    let base = base_path.trim_end_matches('/');
    let collection = format!("{base}/customers");
    let item = format!("{collection}/{{id}}");

    Router::new(store)
        .on(Method::Get,    &collection, list_customers)
        .on(Method::Post,   &collection, create_customer)
        .on(Method::Get,    &item,       get_customer)
        .on(Method::Put,    &item,       update_customer)
        .on(Method::Delete, &item,       delete_customer)
}

// GET /customers
pub async fn list_customers(store: Store, _req: Request) -> Result<Response, Rejection> {
    Ok(Response::json(serde_json::to_vec(&store.list())?))
}

// POST /customers
//
// The location is always `/customers/{id}`, whatever the base path.
pub async fn create_customer(store: Store, _req: Request) -> Response {
    let customer = store.create();
    info!(id = %customer.id, total = store.len(), "created customer");

    Response::builder()
        .status(Status::Created)
        .header("location", &format!("/customers/{}", customer.id))
        .no_body()
}

// GET /customers/{id}
pub async fn get_customer(store: Store, req: Request) -> Result<Response, Rejection> {
    let id = customer_id(&req);
    info!(id, "requested customer");

    let customer = store.get(id)?;
    Ok(Response::json(serde_json::to_vec(&customer)?))
}

// PUT /customers/{id}
pub async fn update_customer(store: Store, req: Request) -> Result<Response, Rejection> {
    let id = customer_id(&req);
    info!(id, "updating customer");

    let media_type = req.media_type();
    if media_type.as_deref() != Some("application/json") {
        debug!(id, ?media_type, "rejected update content type");
        return Err(Rejection::UnsupportedMediaType);
    }
    let fields = parse_fields(req.body())?;
    store.update(id, &fields)?;

    info!(id, "updated customer");
    Ok(Response::status(Status::Ok))
}

// DELETE /customers/{id}
pub async fn delete_customer(store: Store, req: Request) -> Result<Response, Rejection> {
    let id = customer_id(&req);
    info!(id, "deleting customer");

    store.delete(id)?;

    info!(id, remaining = store.len(), "deleted customer");
    Ok(Response::status(Status::Ok))
}

fn customer_id(req: &Request) -> &str {
    req.param("id").unwrap_or_default()
}

/// Reads an update body into a field set.
///
/// An empty body is an empty field set. Strings are taken as-is, `null`
/// stays `None`, numbers and booleans become their JSON text. Arrays and
/// objects are dropped, except under `Name` where they make the body
/// malformed.
fn parse_fields(body: &[u8]) -> Result<Fields, Rejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Fields::new());
    }

    let object: serde_json::Map<String, Value> = serde_json::from_slice(body).map_err(|e| {
        debug!("unreadable update body: {e}");
        Rejection::MalformedBody("The request body is not a valid JSON object.".to_owned())
    })?;

    let mut fields = Fields::new();
    for (key, value) in object {
        let value = match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
            Value::Array(_) | Value::Object(_) if key == NAME_FIELD => {
                return Err(Rejection::MalformedBody(format!(
                    "The argument '{NAME_FIELD}' must be a string."
                )));
            }
            Value::Array(_) | Value::Object(_) => continue,
        };
        fields.insert(key, value);
    }
    Ok(fields)
}
