use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::router::Router;

/// Size of the single read a request must fit into.
pub const BUFFER_SIZE: usize = 1024;

pub struct Connection<S> {
    stream: S,
    router: Arc<Router>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Receiving,
    Parsing(BytesMut),
    Routing(Request),
    Sending(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>) -> Self {
        Self {
            stream,
            router,
            state: ConnectionState::Receiving,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Drive one request/response exchange to completion.
    ///
    /// The write half is shut down once the response is sent; the stream
    /// itself is released when the connection is dropped, on success and on
    /// error alike.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Receiving => {
                    match self.receive().await? {
                        Some(buf) => {
                            self.state = ConnectionState::Parsing(buf);
                        }
                        None => {
                            tracing::debug!("Client closed connection before sending a request");
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Parsing(buf) => {
                    tracing::debug!(request = %String::from_utf8_lossy(buf), "Received request");

                    match parse_request(buf) {
                        Ok(req) => {
                            self.state = ConnectionState::Routing(req);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Rejecting malformed request");
                            let writer = ResponseWriter::new(&Response::bad_request());
                            self.state = ConnectionState::Sending(writer);
                        }
                    }
                }

                ConnectionState::Routing(req) => {
                    tracing::info!(
                        method = %req.method,
                        path = %req.path,
                        version = req.version.as_deref().unwrap_or("-"),
                        user_agent = req.user_agent().unwrap_or("-"),
                        "Handling request"
                    );

                    let response = self.router.route(req).await;

                    tracing::info!(
                        status = response.status.as_u16(),
                        bytes = response.content_length(),
                        "Response ready"
                    );

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Sending(writer);
                }

                ConnectionState::Sending(writer) => {
                    tracing::trace!(bytes = writer.remaining(), "Sending response");
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Perform the single read a request is expected to arrive in.
    ///
    /// Returns `None` if the peer closed the connection without sending data.
    async fn receive(&mut self) -> anyhow::Result<Option<BytesMut>> {
        let mut buf = BytesMut::with_capacity(BUFFER_SIZE);
        let n = self.stream.read_buf(&mut buf).await?;

        if n == 0 {
            return Ok(None);
        }

        Ok(Some(buf))
    }
}
