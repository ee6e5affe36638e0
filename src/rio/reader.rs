//! # Lector con Buffer
//! src/rio/reader.rs
//!
//! `RioReader` envuelve cualquier `Read` y mantiene un buffer interno de
//! capacidad fija. Invariante: `cnt <= buf.len()` y `pos + cnt <= buf.len()`.
//! Un lector pertenece a una sola conexión y nunca se comparte entre threads.

use std::io::{self, Read};

/// Capacidad por defecto del buffer interno
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Lector con buffer sobre una conexión
pub struct RioReader<R> {
    inner: R,

    /// Buffer interno de capacidad fija
    buf: Box<[u8]>,

    /// Posición del primer byte no leído
    pos: usize,

    /// Bytes no leídos que quedan en el buffer
    cnt: usize,
}

impl<R: Read> RioReader<R> {
    /// Crea un lector con la capacidad por defecto
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Crea un lector con un buffer interno de `capacity` bytes
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            cnt: 0,
        }
    }

    /// Rellena el buffer si está vacío.
    ///
    /// Retorna los bytes disponibles; 0 significa fin de stream.
    /// Un `read()` interrumpido por una señal se reintenta.
    fn fill(&mut self) -> io::Result<usize> {
        while self.cnt == 0 {
            match self.inner.read(&mut self.buf) {
                Ok(0) => return Ok(0),
                Ok(n) => {
                    self.pos = 0;
                    self.cnt = n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(self.cnt)
    }

    fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.cnt);
        self.pos += n;
        self.cnt -= n;
    }

    /// Versión con buffer de `read()`.
    ///
    /// Copia como máximo `out.len()` bytes. Solo hace una syscall cuando el
    /// buffer interno está vacío.
    pub fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() || self.fill()? == 0 {
            return Ok(0);
        }

        let n = out.len().min(self.cnt);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.consume(n);
        Ok(n)
    }

    /// Lee la siguiente línea, incluyendo el `\n` final.
    ///
    /// Devuelve como máximo `max_len - 1` bytes: si no aparece el terminador
    /// dentro de ese presupuesto la línea se corta y el resto queda en el
    /// buffer para la siguiente lectura. Un resultado vacío significa que el
    /// peer cerró la conexión antes de enviar ningún byte de la línea.
    ///
    /// # Ejemplo
    /// ```
    /// use rio_httpd::rio::RioReader;
    ///
    /// let mut reader = RioReader::new(&b"GET / HTTP/1.1\r\nHost: x\r\n"[..]);
    /// assert_eq!(reader.read_line(256).unwrap(), b"GET / HTTP/1.1\r\n");
    /// assert_eq!(reader.read_line(256).unwrap(), b"Host: x\r\n");
    /// assert!(reader.read_line(256).unwrap().is_empty());
    /// ```
    pub fn read_line(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        let budget = max_len.saturating_sub(1);
        let mut line = Vec::new();

        while line.len() < budget {
            if self.fill()? == 0 {
                break;
            }

            let want = (budget - line.len()).min(self.cnt);
            let chunk = &self.buf[self.pos..self.pos + want];

            if let Some(i) = chunk.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&chunk[..=i]);
                self.consume(i + 1);
                return Ok(line);
            }

            line.extend_from_slice(chunk);
            self.consume(want);
        }

        Ok(line)
    }

    /// Llena `out` por completo, tolerando short counts.
    ///
    /// Retorna los bytes obtenidos: menos de `out.len()` solo si el stream
    /// terminó antes.
    pub fn read_exact(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;

        while filled < out.len() {
            let n = self.read(&mut out[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        Ok(filled)
    }

    /// Bytes ya leídos del stream que todavía no se consumieron
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.pos..self.pos + self.cnt]
    }

    /// Capacidad del buffer interno
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Acceso mutable al stream, usado para escribir la respuesta
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    enum Step {
        Data(&'static [u8]),
        Interrupt,
        Fail,
    }

    /// Stream que entrega los datos en trozos predefinidos
    struct Scripted {
        steps: VecDeque<Step>,
        reads: usize,
    }

    impl Scripted {
        fn new(steps: Vec<Step>) -> Self {
            Self { steps: steps.into(), reads: 0 }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Step::Interrupt) => Err(io::Error::from(io::ErrorKind::Interrupted)),
                Some(Step::Fail) => Err(io::Error::from(io::ErrorKind::ConnectionReset)),
                Some(Step::Data(data)) => {
                    let n = data.len().min(out.len());
                    out[..n].copy_from_slice(&data[..n]);
                    if n < data.len() {
                        self.steps.push_front(Step::Data(&data[n..]));
                    }
                    Ok(n)
                }
            }
        }
    }

    #[test]
    fn test_read_line_across_chunks() {
        let stream = Scripted::new(vec![
            Step::Data(b"GET /ec"),
            Step::Data(b"ho/abc HTTP/1.1\r"),
            Step::Data(b"\nUser-Agent: x\r\n"),
        ]);
        let mut reader = RioReader::new(stream);

        assert_eq!(reader.read_line(256).unwrap(), b"GET /echo/abc HTTP/1.1\r\n");
        assert_eq!(reader.read_line(256).unwrap(), b"User-Agent: x\r\n");
        assert!(reader.read_line(256).unwrap().is_empty());
    }

    #[test]
    fn test_read_line_retries_interrupted() {
        let stream = Scripted::new(vec![
            Step::Interrupt,
            Step::Data(b"hello\n"),
        ]);
        let mut reader = RioReader::new(stream);

        assert_eq!(reader.read_line(64).unwrap(), b"hello\n");
    }

    #[test]
    fn test_read_line_error_is_surfaced() {
        let stream = Scripted::new(vec![Step::Fail]);
        let mut reader = RioReader::new(stream);

        let err = reader.read_line(64).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn test_read_line_truncates_at_budget() {
        let mut reader = RioReader::new(&b"abcdefgh\n"[..]);

        // max_len 5 => como máximo 4 bytes
        assert_eq!(reader.read_line(5).unwrap(), b"abcd");
        assert_eq!(reader.buffered(), b"efgh\n");
        assert_eq!(reader.read_line(64).unwrap(), b"efgh\n");
    }

    #[test]
    fn test_read_line_partial_at_eof() {
        let mut reader = RioReader::new(&b"no terminator"[..]);

        assert_eq!(reader.read_line(64).unwrap(), b"no terminator");
        assert!(reader.read_line(64).unwrap().is_empty());
    }

    #[test]
    fn test_small_buffer_does_not_limit_line() {
        let mut reader = RioReader::with_capacity(4, &b"0123456789\r\nrest"[..]);

        assert_eq!(reader.capacity(), 4);
        assert_eq!(reader.read_line(64).unwrap(), b"0123456789\r\n");
        assert!(reader.buffered().len() <= reader.capacity());
    }

    #[test]
    fn test_read_exact_after_line() {
        let stream = Scripted::new(vec![
            Step::Data(b"Content-Length: 10\r\n\r\n012"),
            Step::Interrupt,
            Step::Data(b"3456"),
            Step::Data(b"789"),
        ]);
        let mut reader = RioReader::new(stream);

        reader.read_line(64).unwrap();
        assert_eq!(reader.read_line(64).unwrap(), b"\r\n");

        let mut body = [0u8; 10];
        assert_eq!(reader.read_exact(&mut body).unwrap(), 10);
        assert_eq!(&body, b"0123456789");
    }

    #[test]
    fn test_read_exact_short_on_eof() {
        let mut reader = RioReader::new(&b"abc"[..]);
        let mut out = [0u8; 8];

        assert_eq!(reader.read_exact(&mut out).unwrap(), 3);
        assert_eq!(&out[..3], b"abc");
    }

    #[test]
    fn test_buffering_avoids_syscalls() {
        let stream = Scripted::new(vec![Step::Data(b"a\nb\nc\n")]);
        let mut reader = RioReader::new(stream);

        for expected in [&b"a\n"[..], b"b\n", b"c\n"] {
            assert_eq!(reader.read_line(16).unwrap(), expected);
        }
        assert_eq!(reader.get_ref().reads, 1);
    }
}
