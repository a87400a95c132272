//! Test doubles for the data collaborators.
//!
//! [`CountingGeocoder`] records how often it is consulted, which is what the
//! cache tests need. [`StubMapsServer`] is a minimal blocking HTTP server
//! that answers canned JSON bodies, so the HTTP providers can be exercised
//! without a real maps service.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use carefinder_core::{GeocodeError, Geocoder};
use geo::Coord;

/// In-memory [`Geocoder`] that counts lookups.
#[derive(Debug, Default)]
pub struct CountingGeocoder {
    known: HashMap<String, Coord<f64>>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl CountingGeocoder {
    /// Build a geocoder from `(address, location)` pairs.
    #[must_use]
    pub fn new<'a, I>(known: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Coord<f64>)>,
    {
        Self {
            known: known
                .into_iter()
                .map(|(address, location)| (address.to_owned(), location))
                .collect(),
            ..Self::default()
        }
    }

    /// Make lookups of `address` fail with a network error.
    #[must_use]
    pub fn failing_on(mut self, address: &str) -> Self {
        self.failing.push(address.to_owned());
        self
    }

    /// Number of lookups served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for CountingGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|failing| failing == address) {
            return Err(GeocodeError::Network {
                url: "http://stub.invalid/maps/api/geocode/json".to_owned(),
                message: "connection refused".to_owned(),
            });
        }
        Ok(self.known.get(address).copied())
    }
}

/// Blocking HTTP server answering one canned JSON body per connection.
///
/// The server accepts exactly as many connections as there are bodies and
/// records each request line, e.g.
/// `GET /maps/api/geocode/json?address=Ikeja&key=k HTTP/1.1`.
#[derive(Debug)]
pub struct StubMapsServer {
    addr: SocketAddr,
    handle: JoinHandle<io::Result<Vec<String>>>,
}

impl StubMapsServer {
    /// Start serving `bodies` in order on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub fn start<I>(bodies: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let queue: Vec<String> = bodies.into_iter().collect();
        let handle = thread::spawn(move || serve(&listener, queue));
        Ok(Self { addr, handle })
    }

    /// Base URL to configure providers with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait for all bodies to be served and return the request lines.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection failed or the server thread
    /// panicked.
    pub fn finish(self) -> io::Result<Vec<String>> {
        self.handle
            .join()
            .map_err(|_| io::Error::other("stub maps server panicked"))?
    }
}

fn serve(listener: &TcpListener, bodies: Vec<String>) -> io::Result<Vec<String>> {
    let mut requests = Vec::with_capacity(bodies.len());
    for body in bodies {
        let (mut stream, _) = listener.accept()?;
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;
        let mut header = String::new();
        while reader.read_line(&mut header)? > 0 && !header.trim_end().is_empty() {
            header.clear();
        }
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )?;
        stream.flush()?;
        requests.push(request_line.trim_end().to_owned());
    }
    Ok(requests)
}
