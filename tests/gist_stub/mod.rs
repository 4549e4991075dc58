use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct GistStubConfig {
    /// Served for `GET /<owner>/<id>/raw/...`.
    pub document: String,
    pub raw_status: u16,
    pub patch_status: u16,
}

impl Default for GistStubConfig {
    fn default() -> Self {
        Self {
            document: "{}".to_owned(),
            raw_status: 200,
            patch_status: 200,
        }
    }
}

pub struct GistStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl GistStub {
    pub fn spawn(config: GistStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start gist stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let authorization = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                    .map(|h| h.value.as_str().to_owned());
                let method = request.method().to_string();
                let url = request.url().to_owned();
                recorded.lock().expect("lock requests").push(RecordedRequest {
                    method: method.clone(),
                    url: url.clone(),
                    authorization,
                    body,
                });

                let response = match method.as_str() {
                    "GET" if url.contains("/raw/") => {
                        tiny_http::Response::from_string(config.document.clone())
                            .with_status_code(config.raw_status)
                    }
                    "PATCH" if url.starts_with("/gists/") => {
                        let body = if config.patch_status == 200 {
                            r#"{"id": "stub"}"#
                        } else {
                            r#"{"message": "Bad credentials"}"#
                        };
                        tiny_http::Response::from_string(body)
                            .with_status_code(config.patch_status)
                    }
                    _ => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn raw_url(&self, file: &str) -> String {
        format!("{}/alice/abc123/raw/{file}", self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock requests").clone()
    }
}

impl Drop for GistStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
