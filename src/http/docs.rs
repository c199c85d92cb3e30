//! Machine-readable API description.
//!
//! [`ROUTES`] describes every book route as plain data. [`openapi`] turns the
//! table into an OpenAPI 3.0 document, served at `/api-docs/openapi.json`
//! and rendered by Swagger UI at `/api-docs`.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Map, Value};

use super::AppState;
use crate::book::REQUIRED_FIELDS;
use crate::store::BookStore;

/// Body shape of a request or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Book,
    /// Partial book for updates; no field is required.
    BookPatch,
    BookList,
}

impl Shape {
    fn schema(self) -> Value {
        match self {
            Shape::Book => json!({ "$ref": "#/components/schemas/Book" }),
            Shape::BookPatch => json!({ "$ref": "#/components/schemas/BookPatch" }),
            Shape::BookList => json!({
                "type": "array",
                "items": { "$ref": "#/components/schemas/Book" }
            }),
        }
    }
}

/// One documented route.
#[derive(Debug, Clone, Copy)]
pub struct RouteDoc {
    /// Lowercase HTTP method.
    pub method: &'static str,
    /// OpenAPI-style path (`/books/{id}`).
    pub path: &'static str,
    pub summary: &'static str,
    /// Whether the path carries the `{id}` parameter.
    pub has_id: bool,
    pub request: Option<Shape>,
    pub responses: &'static [(u16, &'static str, Option<Shape>)],
}

pub const ROUTES: &[RouteDoc] = &[
    RouteDoc {
        method: "get",
        path: "/books",
        summary: "Return the list of all books",
        has_id: false,
        request: None,
        responses: &[(200, "The list of all books", Some(Shape::BookList))],
    },
    RouteDoc {
        method: "get",
        path: "/books/{id}",
        summary: "Get the book by id",
        has_id: true,
        request: None,
        responses: &[
            (200, "The book with this id", Some(Shape::Book)),
            (404, "The book was not found", None),
        ],
    },
    RouteDoc {
        method: "post",
        path: "/books",
        summary: "Create a new book",
        has_id: false,
        request: Some(Shape::Book),
        responses: &[
            (200, "The book was successfully created", Some(Shape::Book)),
            (400, "The body is not a valid book", None),
            (500, "The book could not be saved", None),
        ],
    },
    RouteDoc {
        method: "put",
        path: "/books/{id}",
        summary: "Update the book by id",
        has_id: true,
        request: Some(Shape::BookPatch),
        responses: &[
            (200, "The book was updated", Some(Shape::Book)),
            (400, "The body is not a valid patch", None),
            (404, "The book was not found", None),
            (500, "The book could not be saved", None),
        ],
    },
    RouteDoc {
        method: "delete",
        path: "/books/{id}",
        summary: "Remove the book by id",
        has_id: true,
        request: None,
        responses: &[
            (200, "The book was deleted", None),
            (404, "The book was not found", None),
            (500, "The collection could not be saved", None),
        ],
    },
];

impl RouteDoc {
    /// The same path in axum's `:param` syntax.
    pub fn axum_path(&self) -> String {
        self.path.replace("{id}", ":id")
    }

    fn operation(&self) -> Value {
        let mut op = Map::new();
        op.insert("summary".into(), json!(self.summary));
        op.insert("tags".into(), json!(["Books"]));

        if self.has_id {
            op.insert(
                "parameters".into(),
                json!([{
                    "in": "path",
                    "name": "id",
                    "required": true,
                    "schema": { "type": "string" },
                    "description": "The book id"
                }]),
            );
        }

        if let Some(shape) = self.request {
            op.insert(
                "requestBody".into(),
                json!({
                    "required": true,
                    "content": { "application/json": { "schema": shape.schema() } }
                }),
            );
        }

        let mut responses = Map::new();
        for (status, description, shape) in self.responses {
            let mut response = Map::new();
            response.insert("description".into(), json!(description));
            if let Some(shape) = shape {
                response.insert(
                    "content".into(),
                    json!({ "application/json": { "schema": shape.schema() } }),
                );
            }
            responses.insert(status.to_string(), Value::Object(response));
        }
        op.insert("responses".into(), Value::Object(responses));

        Value::Object(op)
    }
}

/// Build the OpenAPI document for [`ROUTES`].
pub fn openapi(public_url: &str) -> Value {
    let mut paths = Map::new();
    for route in ROUTES {
        let entry = paths
            .entry(route.path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(route.method.to_string(), route.operation());
        }
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "library API",
            "version": "1.0.0",
            "description": "A simple library API"
        },
        "servers": [{ "url": public_url }],
        "tags": [{ "name": "Books", "description": "The book managing API" }],
        "paths": paths,
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "required": REQUIRED_FIELDS,
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "The auto-generated id of the book"
                        },
                        "title": { "type": "string", "description": "The book title" },
                        "author": { "type": "string", "description": "The book author" }
                    },
                    "example": {
                        "id": "d5fE_asz",
                        "title": "How to Win Friends and Influence People",
                        "author": "Dale Carnegie"
                    }
                },
                "BookPatch": {
                    "type": "object",
                    "description": "Fields to merge into an existing book; the id cannot be changed",
                    "properties": {
                        "title": { "type": "string", "description": "The book title" },
                        "author": { "type": "string", "description": "The book author" }
                    },
                    "example": { "author": "F. Herbert" }
                }
            }
        }
    })
}

/// `GET /api-docs/openapi.json`
pub(super) async fn openapi_handler<S: BookStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<Value> {
    Json(state.docs.as_ref().clone())
}

/// `GET /api-docs`
pub(super) async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>library API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;
