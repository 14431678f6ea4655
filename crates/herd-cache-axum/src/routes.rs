use axum::{Json, Router, extract::State, routing::get};
use herd_cache::{CacheMetrics, CacheStore, Loader, ReadThrough, Serializer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::rejection::CacheRejection;

/// Response body wrapping the cached document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<V> {
    pub data: V,
}

/// Router answering `GET /` from `read_through`
pub fn router<St, S, M, V, L>(read_through: ReadThrough<St, S, M, V, L>) -> Router
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
    L: Loader<V>,
{
    Router::new()
        .route("/", get(serve::<St, S, M, V, L>))
        .with_state(Arc::new(read_through))
}

async fn serve<St, S, M, V, L>(
    State(read_through): State<Arc<ReadThrough<St, S, M, V, L>>>,
) -> Result<Json<DataEnvelope<V>>, CacheRejection>
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
    L: Loader<V>,
{
    let data = read_through.get().await?;
    Ok(Json(DataEnvelope { data }))
}
