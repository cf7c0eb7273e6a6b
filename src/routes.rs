// Fixed route dispatch: (method, target) -> response
use crate::http::{Request, Response};
use crate::store::{FileStore, StoreError};

/// Map a parsed request onto one of the fixed routes. Pure with respect to
/// everything except the file store.
pub fn dispatch(req: &Request, store: &FileStore) -> Response {
    match req.method.as_str() {
        "GET" => handle_get(req, store),
        "POST" => handle_post(req, store),
        _ => {
            crate::log::warn(&format!("Unsupported HTTP method: {}", req.method));
            Response::new(501)
        }
    }
}

/// Targets shared by every supported method.
fn handle_universal(req: &Request) -> Option<Response> {
    if req.target == "/" {
        // Universal ping back, nothing to do
        return Some(Response::new(200));
    }
    None
}

/// The target is split on its first two `/` boundaries only, so an echo
/// payload may itself contain slashes.
fn split_target(target: &str) -> Vec<&str> {
    target.splitn(3, '/').collect()
}

fn handle_get(req: &Request, store: &FileStore) -> Response {
    if let Some(resp) = handle_universal(req) {
        return resp;
    }

    let mut resp = Response::new(404);
    resp.encoding_method = req.accept_encoding.clone();

    let parts = split_target(&req.target);
    if parts.len() < 2 {
        resp.status_code = 400;
        resp.body = Some(b"Invalid target structure".to_vec());
        return resp;
    }

    match parts[1] {
        "echo" => match parts.get(2) {
            Some(text) => {
                resp.status_code = 200;
                resp.content_type = "text/plain".to_string();
                resp.body = Some(text.as_bytes().to_vec());
            }
            None => {
                resp.status_code = 400;
                resp.body = Some(b"Invalid target structure".to_vec());
            }
        },
        "user-agent" => {
            resp.status_code = 200;
            resp.content_type = "text/plain".to_string();
            resp.body = Some(req.user_agent.clone().into_bytes());
        }
        "files" => match parts.get(2) {
            Some(name) => match store.read(name) {
                Ok(contents) => {
                    resp.status_code = 200;
                    resp.content_type = "application/octet-stream".to_string();
                    resp.body = Some(contents);
                }
                Err(StoreError::NotFound) => resp.status_code = 404,
                Err(e) => {
                    crate::log::error(&format!("Error reading file {name}: {e}"));
                    resp.status_code = 500;
                    resp.body = Some(b"There was an error reading the requested file\n".to_vec());
                }
            },
            None => {
                resp.status_code = 400;
                resp.body = Some(b"Invalid file target structure\n".to_vec());
            }
        },
        _ => resp.status_code = 404,
    }

    resp
}

fn handle_post(req: &Request, store: &FileStore) -> Response {
    if let Some(resp) = handle_universal(req) {
        return resp;
    }

    let mut resp = Response::new(400);

    let parts = split_target(&req.target);
    if parts.len() < 2 {
        resp.body = Some(b"Invalid target structure\n".to_vec());
        return resp;
    }

    match parts[1] {
        "files" => match parts.get(2) {
            Some(name) => match store.write(name, &req.body) {
                Ok(()) => resp.status_code = 201,
                Err(e) => {
                    crate::log::error(&format!("Error writing file {name}: {e}"));
                    resp.status_code = 500;
                }
            },
            None => {
                resp.body = Some(b"Invalid files target path\n".to_vec());
            }
        },
        _ => {
            resp.body = Some(b"Invalid target".to_vec());
        }
    }

    resp
}
