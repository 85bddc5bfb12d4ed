//! In-process doubles used by unit tests: a recording transport and output sinks.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::rc::Rc;

use reqwest::StatusCode;
use serde::Serialize;

use crate::client::{ApiRequest, ApiResponse, Endpoint, Transport};
use crate::commands::ExecutionContext;
use crate::error::TransportError;

pub(crate) const TEST_ENDPOINT: &str = "http://api.test";

/// Transport that records requests and replays queued outcomes.
///
/// With nothing queued it answers `200 OK` with an empty body.
#[derive(Default)]
pub(crate) struct FakeTransport {
    requests: RefCell<Vec<ApiRequest>>,
    outcomes: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, response: ApiResponse) {
        self.outcomes.borrow_mut().push_back(Ok(response));
    }

    pub(crate) fn respond_json<T: Serialize>(&self, status: StatusCode, body: &T) {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.respond(ApiResponse::from_bytes(status, bytes));
    }

    pub(crate) fn fail_with(&self, error: TransportError) {
        self.outcomes.borrow_mut().push_back(Err(error));
    }

    pub(crate) fn fail_next(&self, message: &str) {
        self.fail_with(TransportError::Send {
            url: TEST_ENDPOINT.to_string(),
            source: Box::new(io::Error::new(io::ErrorKind::ConnectionRefused, message)),
        });
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::from_bytes(StatusCode::OK, Vec::new())))
    }
}

/// Captured stdout/stderr for one command invocation.
#[derive(Default)]
pub(crate) struct Sink {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Sink {
    pub(crate) fn context(&mut self, args: &[&str]) -> ExecutionContext<'_> {
        self.context_with_endpoint(args, TEST_ENDPOINT)
    }

    pub(crate) fn context_with_endpoint(
        &mut self,
        args: &[&str],
        endpoint: &str,
    ) -> ExecutionContext<'_> {
        ExecutionContext::new(
            args.iter().map(|arg| (*arg).to_string()).collect(),
            Endpoint::new(endpoint),
            &mut self.stdout,
            &mut self.stderr,
        )
    }

    pub(crate) fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Records whether a wrapped body reader has been dropped.
#[derive(Clone, Default)]
pub(crate) struct DropFlag(Rc<Cell<bool>>);

impl DropFlag {
    pub(crate) fn wrap<R: Read>(&self, inner: R) -> TrackedReader<R> {
        TrackedReader {
            inner,
            flag: self.clone(),
        }
    }

    pub(crate) fn dropped(&self) -> bool {
        self.0.get()
    }
}

pub(crate) struct TrackedReader<R> {
    inner: R,
    flag: DropFlag,
}

impl<R: Read> Read for TrackedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R> Drop for TrackedReader<R> {
    fn drop(&mut self) {
        self.flag.0.set(true);
    }
}

/// Body reader that fails on the first read.
pub(crate) struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "body truncated"))
    }
}
