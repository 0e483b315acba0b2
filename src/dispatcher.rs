//! Maps `(method, path)` pairs onto store operations.

use hyper::Method;
use tracing::debug;

use crate::actor_framework::{Entity, ResourceClient};
use crate::domain::{Category, Product, RecordId};
use crate::error::ApiError;
use crate::response::ApiResponse;

/// Collection prefixes. `/api/produk` is the path older register clients
/// still call.
const RESOURCE_PREFIXES: [(&str, Resource); 3] = [
    ("/api/products", Resource::Products),
    ("/api/produk", Resource::Products),
    ("/api/categories", Resource::Categories),
];

const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Products,
    Categories,
}

/// Which part of a collection a path addresses. Member segments are kept raw
/// so that id parsing happens after the method is known to be supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Collection,
    Member(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Health,
    Resource(Resource, Target<'a>),
    Unknown,
}

impl<'a> Route<'a> {
    pub fn parse(path: &'a str) -> Self {
        if path == HEALTH_PATH {
            return Route::Health;
        }
        for (prefix, resource) in RESOURCE_PREFIXES {
            let Some(rest) = path.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() {
                return Route::Resource(resource, Target::Collection);
            }
            if let Some(tail) = rest.strip_prefix('/') {
                let segment = tail.trim_matches('/');
                let target = if segment.is_empty() {
                    Target::Collection
                } else {
                    Target::Member(segment)
                };
                return Route::Resource(resource, target);
            }
        }
        Route::Unknown
    }
}

/// Stateless router over the two independent stores.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    products: ResourceClient<Product>,
    categories: ResourceClient<Category>,
}

impl Dispatcher {
    pub fn new(products: ResourceClient<Product>, categories: ResourceClient<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }

    pub async fn dispatch(&self, method: &Method, path: &str, body: &[u8]) -> ApiResponse {
        let result = match Route::parse(path) {
            Route::Health if *method == Method::GET => Ok(ApiResponse::health()),
            Route::Health => Err(method_not_allowed(method, path)),
            Route::Resource(Resource::Products, target) => {
                dispatch_resource(&self.products, method, path, target, body).await
            }
            Route::Resource(Resource::Categories, target) => {
                dispatch_resource(&self.categories, method, path, target, body).await
            }
            Route::Unknown => Err(ApiError::RouteNotFound(path.to_string())),
        };
        if let Err(err) = &result {
            debug!(error = %err, "Request rejected");
        }
        result.into()
    }
}

async fn dispatch_resource<T: Entity>(
    store: &ResourceClient<T>,
    method: &Method,
    path: &str,
    target: Target<'_>,
    body: &[u8],
) -> Result<ApiResponse, ApiError> {
    match (target, method) {
        (Target::Collection, &Method::GET) => Ok(ApiResponse::ok(&store.list().await?)),
        (Target::Collection, &Method::POST) => {
            let record = decode_record::<T>(body)?;
            Ok(ApiResponse::created(&store.create(record).await?))
        }
        (Target::Member(segment), &Method::GET) => {
            let id = parse_id::<T>(segment)?;
            Ok(ApiResponse::ok(&store.get(id).await?))
        }
        (Target::Member(segment), &Method::PUT) => {
            let id = parse_id::<T>(segment)?;
            let record = decode_record::<T>(body)?;
            Ok(ApiResponse::ok(&store.update(id, record).await?))
        }
        (Target::Member(segment), &Method::DELETE) => {
            let id = parse_id::<T>(segment)?;
            store.delete(id).await?;
            Ok(ApiResponse::deleted())
        }
        _ => Err(method_not_allowed(method, path)),
    }
}

/// Percent-decodes the segment before parsing, so `%31` addresses id 1.
fn parse_id<T: Entity>(segment: &str) -> Result<RecordId, ApiError> {
    let invalid = || ApiError::InvalidId {
        kind: T::KIND,
        segment: segment.to_string(),
    };
    let decoded = urlencoding::decode(segment).map_err(|_| invalid())?;
    decoded.parse().map_err(|_| invalid())
}

fn decode_record<T: Entity>(body: &[u8]) -> Result<T, ApiError> {
    let mut record: T =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    record.validate().map_err(ApiError::ValidationFailed)?;
    Ok(record)
}

fn method_not_allowed(method: &Method, path: &str) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: path.to_string(),
    }
}
