use nom::character::is_space;
use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::map,
    sequence::separated_pair,
    IResult,
};
use thiserror::Error;

// METHOD TARGET [PROTOCOL]
// HEADER-LINES (read off the wire, never retained)
// \r\n\r\n
// BODY (ignored)

/// The slice of a request the router actually consumes: the verb and the
/// raw request target. The target keeps its query string; splitting it off
/// is the query decoder's job.
#[derive(PartialEq, Debug)]
pub struct HttpRequest<'a> {
    pub method: Method,
    pub target: &'a str,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
    /// Any verb token we don't recognize. It still reaches the router,
    /// which answers 404 for it.
    Other,
}

impl Method {
    fn from_token(token: &[u8]) -> Method {
        match token.to_ascii_uppercase().as_slice() {
            b"CONNECT" => Method::Connect,
            b"DELETE" => Method::Delete,
            b"GET" => Method::Get,
            b"HEAD" => Method::Head,
            b"OPTIONS" => Method::Options,
            b"PATCH" => Method::Patch,
            b"POST" => Method::Post,
            b"PUT" => Method::Put,
            b"TRACE" => Method::Trace,
            _ => Method::Other,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequestLine,
    #[error("request target is not valid utf-8")]
    TargetEncoding,
}

#[inline]
fn is_token_byte(i: u8) -> bool {
    return !is_space(i) && i != b'\r' && i != b'\n';
}

#[inline]
fn parse_method(input: &[u8]) -> IResult<&[u8], Method> {
    return map(take_while1(is_token_byte), Method::from_token)(input);
}

#[inline]
fn parse_target(input: &[u8]) -> IResult<&[u8], &[u8]> {
    return take_while1(is_token_byte)(input);
}

#[inline]
fn parse_request_line(input: &[u8]) -> IResult<&[u8], (Method, &[u8])> {
    return separated_pair(parse_method, char(' '), parse_target)(input);
}

/// Parses the request line out of a raw request. Everything after the
/// target (protocol token, header lines, body) is discarded: nothing
/// downstream looks at it. A request line with fewer than two tokens is
/// malformed.
#[inline]
pub fn parse_request(req: &[u8]) -> Result<HttpRequest, ParseError> {
    return match parse_request_line(req) {
        Ok((_, (method, target))) => Ok(HttpRequest {
            method,
            target: std::str::from_utf8(target).map_err(|_| ParseError::TargetEncoding)?,
        }),
        Err(_) => Err(ParseError::InvalidRequestLine),
    };
}
