//! # Requests HTTP/1.1
//! src/http/request.rs
//!
//! Representación de un request ya parseado. El parser (`http::parser`)
//! lo construye línea a línea; aquí solo viven la estructura, el troceo de
//! la request line y de cada header, y los accesores.
//!
//! ## Formato
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Content-Type: application/octet-stream\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! La request line, el path y los valores de header se guardan como bytes,
//! tal como llegaron: HTTP no obliga a que sean UTF-8 y `echo` y
//! `user-agent` los devuelven sin tocar. Solo el método, la versión y el
//! nombre de cada header se decodifican a texto.
//!
//! El parsing es tolerante: una request line sin path produce un path
//! vacío y un header sin `:` se descarta, nunca un error.

use crate::error::Result;
use crate::http::parser::{Limits, RequestParser};
use crate::rio::RioReader;
use std::str;

/// Método HTTP del request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro token
    Other(String),
}

impl Method {
    /// Interpreta el token de método. Nunca falla.
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

/// Request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Primera línea tal como llegó, sin el terminador
    request_line: Vec<u8>,

    method: Method,

    /// Path de la petición, puede incluir query u otros restos
    path: Vec<u8>,

    /// Versión HTTP ("HTTP/1.1"), vacía si no vino
    version: String,

    /// Headers en orden de llegada, se permiten duplicados
    headers: Vec<(String, Vec<u8>)>,

    /// Body de longitud `Content-Length`
    body: Vec<u8>,
}

impl Request {
    /// Construye el request a partir de la request line.
    ///
    /// El método es lo que hay antes del primer espacio y el path lo que hay
    /// entre ese espacio y el siguiente, sin caracteres de control finales.
    ///
    /// # Ejemplo
    /// ```
    /// use rio_httpd::http::request::{Method, Request};
    ///
    /// let request = Request::from_request_line(b"GET /echo/abc HTTP/1.1\r\n");
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.path(), b"/echo/abc");
    /// assert_eq!(request.version(), "HTTP/1.1");
    /// ```
    pub fn from_request_line(line: &[u8]) -> Self {
        let line = trim_control(line);
        let (method, path, version) = split_request_line(line);

        Self {
            request_line: line.to_vec(),
            method: Method::parse(&String::from_utf8_lossy(method)),
            path: trim_control(path).to_vec(),
            version: String::from_utf8_lossy(version).trim().to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Parsea un request completo desde bytes en memoria.
    ///
    /// Retorna `Ok(None)` si `raw` está vacío.
    ///
    /// # Ejemplo
    /// ```
    /// use rio_httpd::http::Request;
    ///
    /// let raw = b"GET /user-agent HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap().unwrap();
    ///
    /// assert_eq!(request.path(), b"/user-agent");
    /// assert_eq!(request.header("user-agent"), Some(&b"curl/8.0"[..]));
    /// ```
    pub fn parse(raw: &[u8]) -> Result<Option<Self>> {
        let mut reader = RioReader::new(raw);
        RequestParser::new(Limits::default()).parse(&mut reader)
    }

    /// Agrega una línea de header.
    ///
    /// Retorna false si la línea no tiene `:` y se descartó.
    pub fn push_header_line(&mut self, line: &[u8]) -> bool {
        match split_header_line(line) {
            Some((name, value)) => {
                self.headers.push((name, value.to_vec()));
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    // === Accesores ===

    pub fn request_line(&self) -> &[u8] {
        &self.request_line
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path crudo, byte a byte como lo envió el cliente
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    /// Path como texto, `None` si no es UTF-8 válido
    pub fn path_str(&self) -> Option<&str> {
        str::from_utf8(&self.path).ok()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Todos los headers en orden de llegada
    pub fn headers(&self) -> &[(String, Vec<u8>)] {
        &self.headers
    }

    /// Valor del primer header con ese nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// `Content-Length` declarado. Ausente o no numérico => `None`.
    pub fn content_length(&self) -> Option<usize> {
        let value = self.header("Content-Length")?;
        str::from_utf8(value).ok()?.trim().parse().ok()
    }

    /// true si `Accept-Encoding` lista `token` entre sus valores separados
    /// por coma
    pub fn accepts_encoding(&self, token: &str) -> bool {
        self.header("Accept-Encoding")
            .map(|value| {
                value
                    .split(|&b| b == b',')
                    .any(|candidate| trim_ascii_ws(candidate).eq_ignore_ascii_case(token.as_bytes()))
            })
            .unwrap_or(false)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Posición de la primera aparición de `needle` en `haystack`
pub(crate) fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Quita `\r`, `\n` y demás caracteres de control al final
fn trim_control(s: &[u8]) -> &[u8] {
    let end = s
        .iter()
        .rposition(|b| !b.is_ascii_control())
        .map_or(0, |i| i + 1);
    &s[..end]
}

fn trim_ascii_ws(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(s.len());
    let end = s
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &s[start..end]
}

/// Separa método, path y versión por el primer y el segundo espacio
fn split_request_line(line: &[u8]) -> (&[u8], &[u8], &[u8]) {
    const EMPTY: &[u8] = &[];

    let Some(first) = line.iter().position(|&b| b == b' ') else {
        return (line, EMPTY, EMPTY);
    };

    let method = &line[..first];
    let rest = &line[first + 1..];

    match rest.iter().position(|&b| b == b' ') {
        Some(second) => (method, &rest[..second], &rest[second + 1..]),
        None => (method, rest, EMPTY),
    }
}

/// Separa "Name: value". El valor empieza tras los espacios que siguen a `:`.
fn split_header_line(line: &[u8]) -> Option<(String, &[u8])> {
    let line = trim_control(line);
    let colon = line.iter().position(|&b| b == b':')?;

    let name = String::from_utf8_lossy(trim_ascii_ws(&line[..colon])).into_owned();
    if name.is_empty() {
        return None;
    }

    let value = &line[colon + 1..];
    let start = value
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(value.len());
    Some((name, &value[start..]))
}
