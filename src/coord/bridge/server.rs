use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

use crate::coord::error::CoordError;
use crate::coord::slave::SlaveMachine;

const BUFFER_SIZE: usize = 256;

/// TCP input bridge: an echo server that turns remote text commands into
/// slave transition requests.
///
/// Lines of the form `ID=<int>;DATA=<int>` are parsed and `DATA` is fed to
/// the slave machine as a raw [`SlaveInputState`](crate::coord::state::SlaveInputState)
/// ordinal. Received bytes are echoed back verbatim whether or not the
/// transition succeeded; malformed lines and rejected transitions are
/// logged and the connection continues.
#[derive(Debug)]
pub struct TcpBridge {
    listener: TcpListener,
    pace: Duration,
}

impl TcpBridge {
    /// Bind the listening endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Comm`] if the address cannot be bound. This is
    /// fatal to the bridge task only; a supervisor restart recreates it.
    pub async fn bind(addr: &str, pace: Duration) -> Result<Self, CoordError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| CoordError::Comm(format!("failed to bind {addr}: {err}")))?;
        #[cfg(feature = "tracing")]
        tracing::info!(component = "TcpBridge", addr, "listening");
        Ok(TcpBridge { listener, pace })
    }

    /// Address the bridge actually bound, useful when binding port 0.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Comm`] if the socket cannot report its address.
    pub fn local_addr(&self) -> Result<SocketAddr, CoordError> {
        self.listener
            .local_addr()
            .map_err(|err| CoordError::Comm(format!("failed to read local addr: {err}")))
    }

    /// Accept loop. Connections are served one at a time; a second client
    /// waits in the backlog until the current one disconnects.
    pub async fn serve(self, slave: Arc<SlaveMachine>) {
        loop {
            let (stream, _peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(component = "TcpBridge", error = %_err, "accept failed");
                    continue;
                }
            };
            #[cfg(feature = "tracing")]
            tracing::info!(component = "TcpBridge", peer = %_peer, "client connected");

            handle_client(stream, &slave, self.pace).await;
        }
    }
}

async fn handle_client(mut stream: TcpStream, slave: &Arc<SlaveMachine>, pace: Duration) {
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let received = match stream.read(&mut buffer).await {
            Ok(0) => {
                #[cfg(feature = "tracing")]
                tracing::info!(component = "TcpBridge", "client disconnected");
                break;
            }
            Ok(n) => &buffer[..n],
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(component = "TcpBridge", error = %_err, "recv failed");
                break;
            }
        };

        if let Err(_err) = process_client_message(received, slave).await {
            #[cfg(feature = "tracing")]
            tracing::error!(
                component = "TcpBridge",
                error = %_err,
                "failed to process client message"
            );
        }

        // Echo is unconditional: the client always gets its bytes back.
        if let Err(_err) = stream.write_all(received).await {
            #[cfg(feature = "tracing")]
            tracing::error!(component = "TcpBridge", error = %_err, "echo failed");
            break;
        }

        sleep(pace).await;
    }

    #[cfg(feature = "tracing")]
    tracing::info!(component = "TcpBridge", "connection closed");
}

async fn process_client_message(
    bytes: &[u8],
    slave: &Arc<SlaveMachine>,
) -> Result<(), CoordError> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(component = "TcpBridge", "dropping non-utf8 payload");
            return Ok(());
        }
    };

    let Some((_id, data)) = parse_command(text) else {
        #[cfg(feature = "tracing")]
        tracing::debug!(component = "TcpBridge", payload = text, "failed to parse");
        return Ok(());
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(component = "TcpBridge", id = _id, data, "command parsed");

    let raw = u8::try_from(data)
        .map_err(|_| CoordError::State(format!("slave input out of range: {data}")))?;
    slave.handle_status_raw(raw).await
}

/// Parse a `ID=<int>;DATA=<int>` command line. Trailing newline or NUL
/// padding from the wire is tolerated.
pub(crate) fn parse_command(text: &str) -> Option<(i64, i64)> {
    let text = text.trim_end_matches(['\r', '\n', '\0']).trim();
    let (id_part, data_part) = text.split_once(';')?;
    let id = id_part.strip_prefix("ID=")?.trim().parse::<i64>().ok()?;
    let data = data_part.strip_prefix("DATA=")?.trim().parse::<i64>().ok()?;
    Some((id, data))
}
