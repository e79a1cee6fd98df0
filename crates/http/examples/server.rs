//! Demo server answering one request per connection.
//!
//! Listens on `RAW_HTTP_ADDR` (default `127.0.0.1:42069`):
//!
//! - `/yourproblem` answers `400 Bad Request`
//! - `/myproblem` answers `500 Internal Server Error`
//! - `/chunked` streams a chunked body followed by an `X-Content-Length` trailer
//! - anything else answers `200 OK`

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::io::AsyncWrite;
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use raw_http::connection::{HttpConnection, ResponseWriter};
use raw_http::handler::make_handler;
use raw_http::protocol::{HandlerError, Headers, Request, StatusCode, default_headers};

const DEFAULT_ADDR: &str = "127.0.0.1:42069";

const BAD_REQUEST_HTML: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>
";

const INTERNAL_ERROR_HTML: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>
";

const OK_HTML: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>
";

const CHUNKS: [&str; 4] = ["The quick brown fox ", "jumps over ", "the lazy ", "dog\n"];

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let addr = std::env::var("RAW_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let tcp_listener = match TcpListener::bind(&addr).await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, %addr, "bind server error");
            return;
        }
    };
    info!(%addr, "start listening");

    let handler = Arc::new(make_handler(route::<OwnedWriteHalf>));

    loop {
        let (tcp_stream, remote_addr) = tokio::select! {
            accepted = tcp_listener.accept() => match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("server gracefully stopped");
                return;
            }
        };

        let handler = handler.clone();

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(_) => info!(%remote_addr, "finished process, connection shutdown"),
                Err(e) => error!(%remote_addr, "service has error, cause {}, connection shutdown", e),
            }
        });
    }
}

fn route<'a, W>(writer: &'a mut ResponseWriter<W>, request: &'a Request) -> BoxFuture<'a, Result<(), HandlerError>>
where
    W: AsyncWrite + Unpin + Send,
{
    Box::pin(async move {
        match request.request_target() {
            "/yourproblem" => html(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_HTML).await,
            "/myproblem" => html(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_HTML).await,
            "/chunked" => chunked(writer).await,
            _ => html(writer, StatusCode::OK, OK_HTML).await,
        }
    })
}

async fn html<W>(writer: &mut ResponseWriter<W>, status: StatusCode, body: &str) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(body.len());
    headers.set("Content-Type", "text/html")?;

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}

async fn chunked<W>(writer: &mut ResponseWriter<W>) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.set("Transfer-Encoding", "chunked")?;
    headers.set("Trailer", "X-Content-Length")?;

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;

    let mut total = 0;
    for chunk in CHUNKS {
        writer.write_chunked_body(chunk.as_bytes()).await?;
        total += chunk.len();
    }
    writer.finish_chunked_body().await?;

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", total.to_string())?;
    writer.write_trailers(&trailers).await?;
    Ok(())
}
