#![allow(dead_code)]

use openapi_catalog::config::{DomainSpec, GeneratorConfig, ServiceSpec};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two operations: an event the service sends and an untagged query it receives.
pub const ORDERS_SPEC: &str = r#"openapi: 3.0.3
info:
  title: Orders API
  version: __VERSION__
  description: Order management.
tags:
  - name: orders
components:
  schemas:
    Order:
      type: object
      properties:
        id: { type: string }
        total: { type: number }
paths:
  /orders:
    post:
      operationId: orderPlaced
      summary: __SUMMARY__
      x-eventcatalog-message-type: event
      x-eventcatalog-message-action: sends
      tags: [orders]
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Order'
      responses:
        "202":
          description: Accepted
    get:
      operationId: listOrders
      responses:
        "200":
          description: Orders
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Order'
"#;

/// `ORDERS_SPEC` at `version`, with a given summary on the event.
pub fn orders_spec(version: &str, summary: &str) -> String {
    ORDERS_SPEC
        .replace("__VERSION__", version)
        .replace("__SUMMARY__", summary)
}

/// An operation without `operationId`.
pub const ANONYMOUS_SPEC: &str = r#"openapi: 3.1.0
info:
  title: Orders API
  version: 1.0.0
paths:
  /orders/{orderId}:
    get:
      parameters:
        - name: orderId
          in: path
          schema: { type: string }
      responses:
        "200": { description: OK }
"#;

/// Temporary directory holding spec files and (optionally) a catalog.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.dir.path().join("catalog")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Config processing `specs` in order, catalog inside the workspace.
    pub fn config(&self, specs: &[&Path]) -> GeneratorConfig {
        GeneratorConfig {
            services: specs
                .iter()
                .map(|path| ServiceSpec {
                    path: path.to_string_lossy().into_owned(),
                    ..Default::default()
                })
                .collect(),
            catalog_dir: Some(self.catalog_dir()),
            ..Default::default()
        }
    }
}

pub fn orders_domain(version: &str) -> DomainSpec {
    DomainSpec {
        id: "orders".into(),
        name: "Orders".into(),
        version: version.into(),
    }
}

/// Serve a single HTTP request on localhost, answering `status` with `body`.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and the serving thread.
pub fn serve_once(status: u16, body: &str) -> (String, std::thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let body = body.to_string();
    let handle = std::thread::spawn(move || {
        let request = server.recv().unwrap();
        let response = tiny_http::Response::from_string(body).with_status_code(status);
        request.respond(response).unwrap();
    });
    (format!("http://{addr}"), handle)
}

/// A spec with one malformed operation: parameter without `in`, non-object responses.
pub const MALFORMED_SPEC: &str = r#"openapi: 3.0.0
info:
  title: Bad API
  version: 1.0.0
paths:
  /bad:
    get:
      operationId: badOp
      parameters:
        - name: x
      responses: 42
"#;

/// Two queries, the first with an id that cannot be a catalog directory.
pub const SLASHED_ID_SPEC: &str = r#"openapi: 3.0.0
info:
  title: Pets API
  version: 1.0.0
paths:
  /a:
    get:
      operationId: pets/list
      responses:
        "200": { description: OK }
  /b:
    get:
      operationId: getB
      responses:
        "200": { description: OK }
"#;
