// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request seen by the mock, in arrival order
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    /// Decoded query string pairs
    pub query: Vec<(String, String)>,
    /// JSON request body, `Null` when empty
    pub body: serde_json::Value,
}

impl RecordedCall {
    /// Value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
enum Reply {
    Fixed(u16, String),
    /// Respond with the request body, as the API server does for a successful create
    Echo(u16),
}

/// A mock HTTP service that returns predefined responses based on request paths
/// and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), Reply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, reply: Reply) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), reply);
        self
    }

    /// Add a response for GET requests matching the path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, Reply::Fixed(status, body.to_string()))
    }

    /// Add a response for POST requests matching the path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, Reply::Fixed(status, body.to_string()))
    }

    /// Accept POST requests on the path, answering with the submitted object
    pub fn echo_post(self, path: &str) -> Self {
        self.on("POST", path, Reply::Echo(201))
    }

    /// Add a response for PATCH requests matching the path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, Reply::Fixed(status, body.to_string()))
    }

    /// Add a response for DELETE requests matching the path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, Reply::Fixed(status, body.to_string()))
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests received so far with the given method
    pub fn calls_with_method(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<Reply> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Fall back to the longest registered prefix
        responses
            .iter()
            .filter(|((m, p), _)| m == method && path.starts_with(p.as_str()))
            .max_by_key(|((_, p), _)| p.len())
            .map(|(_, resp)| resp.clone())
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = url::form_urlencoded::parse(req.uri().query().unwrap_or_default().as_bytes())
            .into_owned()
            .collect();
        let reply = self.find_response(&method, &path);
        let calls = self.calls.clone();

        Box::pin(async move {
            let request_body: Bytes = req
                .into_body()
                .collect()
                .await
                .map(|collected| collected.to_bytes())
                .unwrap_or_default();
            let json = serde_json::from_slice(&request_body).unwrap_or(serde_json::Value::Null);
            calls.lock().unwrap().push(RecordedCall {
                method,
                path,
                query,
                body: json,
            });

            let (status, body) = match reply {
                Some(Reply::Fixed(status, body)) => (status, body.into_bytes()),
                Some(Reply::Echo(status)) => (status, request_body.to_vec()),
                // Default 404 for unmatched requests
                None => (404, not_found_json("resource", "unknown").into_bytes()),
            };

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap())
        })
    }
}

/// Create a mock Flux Kustomization JSON response reconciling from the `flux-system` GitRepository
pub fn kustomization_json(name: &str, namespace: &str, path: &str) -> String {
    serde_json::json!({
        "apiVersion": "kustomize.toolkit.fluxcd.io/v1",
        "kind": "Kustomization",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": "1",
            "uid": "test-uid"
        },
        "spec": {
            "interval": "10m",
            "path": path,
            "prune": true,
            "sourceRef": {"kind": "GitRepository", "name": "flux-system"}
        }
    })
    .to_string()
}

/// Create a mock Flux GitRepository JSON response with an SSH secret reference
pub fn git_repository_json(name: &str, namespace: &str, url: &str, branch: &str) -> String {
    serde_json::json!({
        "apiVersion": "source.toolkit.fluxcd.io/v1",
        "kind": "GitRepository",
        "metadata": {"name": name, "namespace": namespace, "resourceVersion": "1"},
        "spec": {
            "interval": "1m",
            "url": url,
            "ref": {"branch": branch},
            "secretRef": {"name": name}
        }
    })
    .to_string()
}

/// Create a mock Flux HelmRelease JSON response sourced from the `podinfo` HelmRepository
pub fn helm_release_json(name: &str, namespace: &str, values: serde_json::Value) -> String {
    serde_json::json!({
        "apiVersion": "helm.toolkit.fluxcd.io/v2",
        "kind": "HelmRelease",
        "metadata": {"name": name, "namespace": namespace, "resourceVersion": "7"},
        "spec": {
            "interval": "5m",
            "chart": {
                "spec": {
                    "chart": "podinfo",
                    "version": "6.5.4",
                    "sourceRef": {"kind": "HelmRepository", "name": "podinfo"}
                }
            },
            "install": {"createNamespace": true},
            "targetNamespace": "podinfo",
            "values": values
        }
    })
    .to_string()
}

/// Create a mock Flux HelmRepository JSON response
pub fn helm_repository_json(name: &str, namespace: &str, url: &str) -> String {
    serde_json::json!({
        "apiVersion": "source.toolkit.fluxcd.io/v1",
        "kind": "HelmRepository",
        "metadata": {"name": name, "namespace": namespace},
        "spec": {"interval": "1h", "url": url}
    })
    .to_string()
}

/// Create a mock Argo CD ApplicationSet JSON response
pub fn application_set_json(name: &str, namespace: &str) -> String {
    serde_json::json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "ApplicationSet",
        "metadata": {"name": name, "namespace": namespace},
        "spec": {
            "generators": [{
                "git": {
                    "repoURL": "git@example.com:org/repo.git",
                    "revision": "main",
                    "directories": [{"path": "*"}]
                }
            }],
            "template": {
                "metadata": {"name": "{{path.basename}}"},
                "spec": {
                    "project": "default",
                    "source": {
                        "repoURL": "git@example.com:org/repo.git",
                        "targetRevision": "main",
                        "path": "{{path}}"
                    },
                    "destination": {"server": "https://kubernetes.default.svc"}
                }
            }
        }
    })
    .to_string()
}

/// Create a mock Argo CD Application JSON response for a Helm chart
pub fn application_json(name: &str, namespace: &str) -> String {
    serde_json::json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "Application",
        "metadata": {"name": name, "namespace": namespace},
        "spec": {
            "project": "default",
            "source": {
                "repoURL": "https://stefanprodan.github.io/podinfo",
                "targetRevision": "6.5.4",
                "chart": name
            },
            "destination": {"server": "https://kubernetes.default.svc", "namespace": name}
        }
    })
    .to_string()
}

/// Create a mock Secret JSON response; values are base64 encoded as the API server does
pub fn secret_json(name: &str, namespace: &str, data: &[(&str, &str)]) -> String {
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(
            data.iter()
                .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
                .collect::<BTreeMap<_, _>>(),
        ),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    };
    let mut json = serde_json::to_value(&secret).unwrap();
    json["apiVersion"] = "v1".into();
    json["kind"] = "Secret".into();
    json.to_string()
}

/// Create a mock list JSON response
pub fn list_json(api_version: &str, kind: &str, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": api_version,
        "kind": format!("{}List", kind),
        "metadata": {"resourceVersion": "1"},
        "items": items
    })
    .to_string()
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a 409 conflict response
pub fn conflict_json(resource: &str, name: &str) -> String {
    status_json(409, "AlreadyExists", &format!("{} \"{}\" already exists", resource, name))
}

/// Create a 403 forbidden response
pub fn forbidden_json(resource: &str) -> String {
    status_json(403, "Forbidden", &format!("{} is forbidden", resource))
}

fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a successful delete response
pub fn deleted_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Success",
        "code": 200
    })
    .to_string()
}
