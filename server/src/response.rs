use bytes::{BufMut, BytesMut};

use crate::store::{capitalize, Schema, Store};

/// The only status codes this engine ever produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
}

impl Status {
    pub fn code(self) -> u16 {
        return match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
        };
    }

    pub fn reason(self) -> &'static str {
        return match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
        };
    }
}

static BODY_DELIM: &[u8] = b"\r\n\r\n";

/// A status plus a finished HTML body, serialized once per connection.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    body: String,
}

impl Response {
    /// One-line status view carrying a human-readable message.
    pub fn status_page(status: Status, message: &str) -> Self {
        return Response {
            status,
            body: format!("<html><body><h1>{}</h1></body></html>", escape_html(message)),
        };
    }

    /// Listing view: a numbered table of every record, or a "No {collection}"
    /// line when the store is empty. Field values are escaped before they
    /// reach the markup.
    pub fn listing(schema: &Schema, store: &Store) -> Self {
        let mut html = String::from("<html><body>");
        html.push_str("<h1>");
        html.push_str(&capitalize(schema.collection));
        html.push_str("</h1>");

        if store.is_empty() {
            html.push_str("<p>No ");
            html.push_str(schema.collection);
            html.push_str("</p>");
        } else {
            html.push_str("<table border='1'><tr><th>#</th>");
            for field in schema.fields {
                html.push_str("<th>");
                html.push_str(&capitalize(field));
                html.push_str("</th>");
            }
            html.push_str("</tr>");
            for (i, record) in store.iter().enumerate() {
                html.push_str("<tr><td>");
                html.push_str(&i.to_string());
                html.push_str("</td>");
                for value in record.fields() {
                    html.push_str("<td>");
                    html.push_str(&escape_html(value));
                    html.push_str("</td>");
                }
                html.push_str("</tr>");
            }
            html.push_str("</table>");
        }

        html.push_str("</body></html>");
        return Response {
            status: Status::Ok,
            body: html,
        };
    }

    pub fn body(&self) -> &str {
        return &self.body;
    }

    /// Writes the literal wire form. The peer can frame the body either by
    /// Content-Length or by the connection close that follows the write.
    pub fn encode(&self, resp_buf: &mut BytesMut) {
        resp_buf.put_slice(b"HTTP/1.1 ");
        resp_buf.put_slice(self.status.code().to_string().as_bytes());
        resp_buf.put_slice(b" ");
        resp_buf.put_slice(self.status.reason().as_bytes());
        resp_buf.put_slice(b"\r\nContent-Type: text/html\r\nContent-Length: ");
        resp_buf.put_slice(self.body.len().to_string().as_bytes());
        resp_buf.put_slice(BODY_DELIM);
        resp_buf.put_slice(self.body.as_bytes());
    }
}

/// Record fields are echoed into HTML verbatim otherwise; stored markup
/// would execute in any browser that loads the listing.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    return out;
}
