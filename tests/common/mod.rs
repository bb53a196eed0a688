//! In-process fake Docker registry for integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";

pub const SAMPLE_MANIFEST: &str = r#"{
   "schemaVersion": 2,
   "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
   "config": {
      "mediaType": "application/vnd.docker.container.image.v1+json",
      "size": 1469,
      "digest": "sha256:feb5d9fea6a5e9606aa995e879d862b825965ba48de054caab5ef356dc6b3412"
   },
   "layers": [
      {
         "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
         "size": 2479,
         "digest": "sha256:2db29710123e3e53a794f2694094b9b4338aa9ee5c40b930cb8063a1be392c54"
      }
   ]
}"#;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub name: String,
    pub reference: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
struct Inner {
    manifests: HashMap<String, (String, Vec<u8>)>,
    requests: Vec<RecordedRequest>,
    put_status: HashMap<String, StatusCode>,
}

/// Stores manifests under `name:reference` and records every request
#[derive(Clone, Default)]
pub struct FakeRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl FakeRegistry {
    pub fn with_manifest(self, name: &str, reference: &str, body: &str) -> Self {
        self.inner.lock().unwrap().manifests.insert(
            format!("{}:{}", name, reference),
            (MANIFEST_V2.to_string(), body.as_bytes().to_vec()),
        );
        self
    }

    /// Answer PUTs for `reference` with `status` instead of 201
    pub fn with_put_status(self, reference: &str, status: StatusCode) -> Self {
        self.inner
            .lock()
            .unwrap()
            .put_status
            .insert(reference.to_string(), status);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    pub fn stored(&self, name: &str, reference: &str) -> Option<(String, Vec<u8>)> {
        self.inner
            .lock()
            .unwrap()
            .manifests
            .get(&format!("{}:{}", name, reference))
            .cloned()
    }

    /// Serve on an ephemeral port, returning `127.0.0.1:<port>`
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("127.0.0.1:{}", addr.port())
    }
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle(
    State(registry): State<FakeRegistry>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some((name, reference)) = uri
        .path()
        .strip_prefix("/v2/")
        .and_then(|rest| rest.rsplit_once("/manifests/"))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let key = format!("{}:{}", name, reference);

    let mut inner = registry.inner.lock().unwrap();
    inner.requests.push(RecordedRequest {
        method: method.clone(),
        name: name.to_string(),
        reference: reference.to_string(),
        authorization: header_string(&headers, header::AUTHORIZATION),
        accept: header_string(&headers, header::ACCEPT),
        content_type: header_string(&headers, header::CONTENT_TYPE),
    });

    match method {
        Method::GET => match inner.manifests.get(&key) {
            Some((content_type, data)) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.clone())],
                data.clone(),
            )
                .into_response(),
            None => (
                StatusCode::NOT_FOUND,
                r#"{"errors":[{"code":"MANIFEST_UNKNOWN","message":"manifest unknown"}]}"#,
            )
                .into_response(),
        },
        Method::PUT => {
            if let Some(status) = inner.put_status.get(reference) {
                return (*status, "rejected").into_response();
            }
            let content_type = header_string(&headers, header::CONTENT_TYPE).unwrap_or_default();
            inner.manifests.insert(key, (content_type, body.to_vec()));
            StatusCode::CREATED.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
