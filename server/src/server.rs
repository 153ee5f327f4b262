use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{BufMut, BytesMut};
use tracing::{debug, warn};

use cardfile_parser::request_parser;

use crate::router::Router;

const SCRATCH_SIZE: usize = 1024;

/// Parse and response buffers, reused across connections since only one
/// connection is ever live.
struct RequestBuffers {
    parse_buf: BytesMut,
    resp_buf: BytesMut,
}

impl RequestBuffers {
    #[inline(always)]
    fn clear(&mut self) {
        self.parse_buf.clear();
        self.resp_buf.clear();
    }
}

impl Default for RequestBuffers {
    #[inline(always)]
    fn default() -> Self {
        return RequestBuffers {
            parse_buf: BytesMut::new(),
            resp_buf: BytesMut::new(),
        };
    }
}

/// Blocking accept loop: one connection at a time, processed to completion
/// and closed before the next accept. Suspension points are the blocking
/// read of the request head and the blocking response write.
pub struct Server {
    listener: TcpListener,
    router: Router,
    buffers: RequestBuffers,
    scratch: [u8; SCRATCH_SIZE],
    read_timeout: Option<Duration>,
}

impl Server {
    /// Bind failure is the only fatal error in the server's life.
    pub fn bind(
        addr: impl ToSocketAddrs,
        router: Router,
        read_timeout: Option<Duration>,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        return Ok(Server {
            listener,
            router,
            buffers: RequestBuffers::default(),
            scratch: [0_u8; SCRATCH_SIZE],
            read_timeout,
        });
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        return self.listener.local_addr();
    }

    /// Runs forever. A failing connection is logged and the loop keeps
    /// accepting; one bad client never takes the service down.
    pub fn run(mut self) -> io::Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            if let Err(e) = self.handle(stream) {
                warn!(peer = %peer, error = %e, "connection failed");
            }
        }
    }

    fn handle(&mut self, mut stream: TcpStream) -> io::Result<()> {
        stream.set_read_timeout(self.read_timeout)?;
        self.buffers.clear();

        read_head(&mut stream, &mut self.scratch, &mut self.buffers.parse_buf)?;
        if self.buffers.parse_buf.is_empty() {
            // Peer connected and closed without sending anything.
            return Ok(());
        }

        let request = match request_parser::parse_request(&self.buffers.parse_buf) {
            Ok(request) => request,
            Err(e) => {
                // Protocol-shape errors get no response, just the close.
                debug!(error = %e, "dropping malformed request");
                return Ok(());
            }
        };

        let response = self.router.route(request.method, request.target);
        response.encode(&mut self.buffers.resp_buf);
        return stream.write_all(&self.buffers.resp_buf);
    }
}

fn is_double_crnl(window: &[u8]) -> bool {
    return window.len() >= 4
        && (window[0] == b'\r')
        && (window[1] == b'\n')
        && (window[2] == b'\r')
        && (window[3] == b'\n');
}

/// Accumulates bytes until the end-of-headers marker or EOF. Header content
/// and any body bytes already read land in `parse_buf` too; the parser
/// ignores them. There is no cap: the read blocks for as long as the peer
/// keeps the head incomplete (unless a read timeout is set).
fn read_head(reader: &mut impl Read, scratch: &mut [u8], parse_buf: &mut BytesMut) -> io::Result<()> {
    loop {
        let n = reader.read(scratch)?;
        if n == 0 {
            return Ok(());
        }
        parse_buf.put(&scratch[..n]);
        if parse_buf.windows(4).any(is_double_crnl) {
            return Ok(());
        }
    }
}
