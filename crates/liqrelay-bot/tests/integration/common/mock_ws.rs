//! Mock WebSocket server for integration tests.
//!
//! Plays the role of the exchange stream endpoint:
//! - accepts connections and answers pings
//! - pushes text frames to every connected client
//! - optionally drops each connection right after the handshake, to
//!   exercise the reconnect path

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// A mock stream server for testing.
pub struct MockWsServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    frame_tx: broadcast::Sender<String>,
    connections: Arc<Mutex<u32>>,
}

impl MockWsServer {
    /// Start a server that keeps connections open.
    pub async fn start() -> Self {
        Self::start_with(false).await
    }

    /// Start a server that closes every connection immediately after the
    /// handshake, forcing the client to reconnect.
    pub async fn start_dropping() -> Self {
        Self::start_with(true).await
    }

    async fn start_with(close_on_connect: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (frame_tx, _) = broadcast::channel::<String>(32);
        let connections: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let frame_tx_clone = frame_tx.clone();
        let connections_clone = connections.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let frames = frame_tx_clone.subscribe();
                        let connections = connections_clone.clone();
                        tokio::spawn(handle_connection(
                            stream,
                            frames,
                            connections,
                            close_on_connect,
                        ));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            frame_tx,
            connections,
        }
    }

    /// Get the server's WebSocket URL.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Get the number of connections received.
    pub async fn connection_count(&self) -> u32 {
        *self.connections.lock().await
    }

    /// Push one text frame to all connected clients.
    pub fn send_frame(&self, text: &str) {
        let _ = self.frame_tx.send(text.to_string());
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    mut frames: broadcast::Receiver<String>,
    connections: Arc<Mutex<u32>>,
    close_on_connect: bool,
) {
    {
        let mut count = connections.lock().await;
        *count += 1;
    }

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    if close_on_connect {
        let _ = write.send(Message::Close(None)).await;
        return;
    }

    loop {
        tokio::select! {
            frame = frames.recv() => {
                match frame {
                    Ok(text) => {
                        if write.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }
}
