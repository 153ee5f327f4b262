use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use cardfile_server::router::Router;
use cardfile_server::server::Server;
use cardfile_server::store::Schema;

fn spawn_server(schema: Schema) -> SocketAddr {
    let server = Server::bind(
        ("127.0.0.1", 0),
        Router::new(schema),
        Some(Duration::from_secs(5)),
    )
    .unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    return addr;
}

fn send(addr: &SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream.write_all(request.as_bytes()).unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    return response;
}

fn request(method: &str, target: &str) -> String {
    return format!("{method} {target} HTTP/1.1\r\nHost: localhost\r\n\r\n");
}

#[test]
fn contacts_crud_scenario() {
    let addr = spawn_server(Schema::contacts());

    let resp = send(&addr, &request("GET", "/contacts"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.contains("No contacts"));

    let resp = send(&addr, &request("POST", "/add?name=Ann&phone=555"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.contains("Contact added: Ann"));

    let resp = send(&addr, &request("GET", "/contacts"));
    assert!(resp.contains("<tr><td>0</td><td>Ann</td><td>555</td></tr>"), "{resp}");

    let resp = send(&addr, &request("POST", "/edit?index=0&phone=999"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.contains("Contact updated"));

    let resp = send(&addr, &request("GET", "/contacts"));
    assert!(resp.contains("<tr><td>0</td><td>Ann</td><td>999</td></tr>"), "{resp}");

    let resp = send(&addr, &request("POST", "/remove?index=5"));
    assert!(resp.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{resp}");
    assert!(resp.contains("Invalid index"));

    let resp = send(&addr, &request("POST", "/remove?index=0"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.contains("Contact removed: Ann"));

    let resp = send(&addr, &request("GET", "/contacts"));
    assert!(resp.contains("No contacts"), "{resp}");
}

#[test]
fn contacts_validation_and_misses() {
    let addr = spawn_server(Schema::contacts());

    let resp = send(&addr, &request("POST", "/add?name=Ann"));
    assert!(resp.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{resp}");
    assert!(resp.contains("Name and phone are required"));

    let resp = send(&addr, &request("GET", "/unknown"));
    assert!(resp.starts_with("HTTP/1.1 404 Not Found\r\n"), "{resp}");

    let resp = send(&addr, &request("FROB", "/contacts"));
    assert!(resp.starts_with("HTTP/1.1 404 Not Found\r\n"), "{resp}");

    // Store untouched by any of the misses above.
    let resp = send(&addr, &request("GET", "/contacts"));
    assert!(resp.contains("No contacts"), "{resp}");
}

#[test]
fn contacts_listing_escapes_markup() {
    let addr = spawn_server(Schema::contacts());

    let resp = send(&addr, &request("POST", "/add?name=%3Cb%3EAnn%3C%2Fb%3E&phone=555"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");

    let resp = send(&addr, &request("GET", "/contacts"));
    assert!(resp.contains("&lt;b&gt;Ann&lt;/b&gt;"), "{resp}");
    assert!(!resp.contains("<td><b>Ann</b></td>"), "{resp}");
}

#[test]
fn notes_placeholder_deployment() {
    let addr = spawn_server(Schema::notes());

    let resp = send(&addr, &request("POST", "/remove?index=0"));
    assert!(resp.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{resp}");
    assert!(resp.contains("No notes to remove"));

    let resp = send(&addr, &request("POST", "/add"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.contains("Note added"));

    let resp = send(&addr, &request("POST", "/edit?index=0&text=Buy%20milk"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.contains("Note updated"));

    let resp = send(&addr, &request("GET", "/notes"));
    assert!(resp.contains("<tr><td>0</td><td>Buy milk</td></tr>"), "{resp}");

    let resp = send(&addr, &request("POST", "/remove?index=0"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.contains("Note removed"));
}

#[test]
fn malformed_and_empty_requests_close_silently() {
    let addr = spawn_server(Schema::contacts());

    // Connect-and-close: no request, no response.
    let resp = send(&addr, "");
    assert_eq!(resp, "");

    // A bare blank line has no request line to parse.
    let resp = send(&addr, "\r\n\r\n");
    assert_eq!(resp, "");

    // The service keeps serving afterwards.
    let resp = send(&addr, &request("GET", "/contacts"));
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
}

#[test]
fn content_length_matches_body() {
    let addr = spawn_server(Schema::contacts());

    let resp = send(&addr, &request("GET", "/contacts"));
    let (head, body) = resp.split_once("\r\n\r\n").unwrap();
    assert!(head.contains("Content-Type: text/html"));
    let length: usize = head
        .split("Content-Length: ")
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(length, body.len());
}
