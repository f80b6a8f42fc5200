use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

/// In-process BookBuddy backend serving `/api/books` and `/api/books/search`.
///
/// Search behavior by query text:
/// - `"dune"`: pages of 10 hits out of `total_hits`.
/// - `"flaky"`: like `"dune"` at cursor 0, then 500 for every later page.
/// - `"boom"`: always 500 with an `error` payload.
/// - anything else: an empty page with `totalItems: 0`.
pub struct BackendStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackendStub {
    pub fn spawn(total_hits: u32) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start backend stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                if request.method() != &tiny_http::Method::Get {
                    let _ = request.respond(
                        tiny_http::Response::from_string("not found").with_status_code(404),
                    );
                    continue;
                }

                let url = match url::Url::parse(&format!("http://stub{}", request.url())) {
                    Ok(url) => url,
                    Err(_) => {
                        let _ = request.respond(
                            tiny_http::Response::from_string("bad request").with_status_code(400),
                        );
                        continue;
                    }
                };

                match url.path() {
                    "/api/books" => {
                        respond_json(request, 200, &catalog_body());
                    }
                    "/api/books/search" => {
                        let params: HashMap<String, String> =
                            url.query_pairs().into_owned().collect();
                        let query = params.get("q").map(String::as_str).unwrap_or_default();
                        let start = params
                            .get("startIndex")
                            .and_then(|v| v.parse::<u32>().ok())
                            .unwrap_or(0);

                        if query == "boom" || (query == "flaky" && start > 0) {
                            respond_json(
                                request,
                                500,
                                &json!({ "error": "external lookup exploded" }),
                            );
                        } else if query == "dune" || query == "flaky" {
                            respond_json(request, 200, &search_body(start, total_hits));
                        } else {
                            respond_json(request, 200, &json!({ "books": [], "totalItems": 0 }));
                        }
                    }
                    _ => {
                        let _ = request.respond(
                            tiny_http::Response::from_string("not found").with_status_code(404),
                        );
                    }
                }
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for BackendStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond_json(request: tiny_http::Request, status: u16, body: &Value) {
    let mut response =
        tiny_http::Response::from_string(body.to_string()).with_status_code(status);
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("build header");
    response = response.with_header(header);
    let _ = request.respond(response);
}

fn search_body(start: u32, total_hits: u32) -> Value {
    let end = start.saturating_add(10).min(total_hits);
    let books = (start..end)
        .map(|i| {
            json!({
                "title": format!("Dune {}", i + 1),
                "author": "Frank Herbert",
                "category": "fiction",
                "language": "en"
            })
        })
        .collect::<Vec<_>>();

    json!({ "books": books, "totalItems": total_hits })
}

fn catalog_body() -> Value {
    json!([
        {
            "id": 1,
            "title": "Dune",
            "author": "Frank Herbert",
            "category": "fiction",
            "description": "Spice and sandworms"
        },
        {
            "id": 2,
            "title": "Cosmos",
            "author": "Carl Sagan",
            "category": "science",
            "description": "A personal voyage"
        },
        {
            "id": 3,
            "title": "Hyperion",
            "author": "Dan Simmons",
            "category": "fiction"
        }
    ])
}
