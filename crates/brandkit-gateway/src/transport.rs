use crate::request::{RemoteRequest, RemoteResponse};
use brandkit_core::ClientError;
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::util::BoxCloneSyncService;
use tower::Service;

/// A type-erased transport as held by the gateway.
pub type BoxTransport = BoxCloneSyncService<RemoteRequest, RemoteResponse, ClientError>;

/// The production transport: one shared `reqwest` client.
///
/// Delivery failures map to [`ClientError::Transient`]. Any status code,
/// including errors, is returned as a [`RemoteResponse`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Service<RemoteRequest> for HttpTransport {
    type Response = RemoteResponse;
    type Error = ClientError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RemoteRequest) -> Self::Future {
        let client = self.client.clone();

        Box::pin(async move {
            let mut builder = client.request(req.method, req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = req.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(map_reqwest_error)?;

            Ok(RemoteResponse { status, body })
        })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> ClientError {
    if error.is_builder() {
        ClientError::Unknown(error.to_string())
    } else {
        ClientError::Transient(error.to_string())
    }
}
