//! mpv backend over its JSON IPC socket.
//!
//! The proxy's `/stream` URL is handed to mpv opaquely via `loadfile`.
//! Playback start failures are best-effort: they come back as
//! `PlayerEvent::Error` and are shown as a status line, nothing more.

use crate::app::events::{Event, PlayerEvent};
use anyhow::Context;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    process::{Child, Command},
    sync::mpsc,
};

#[derive(Debug)]
pub struct MpvHandle {
    child: Child,
    socket_path: PathBuf,
    writer: tokio::sync::Mutex<tokio::io::WriteHalf<UnixStream>>,
    request_id: AtomicU64,
}

impl MpvHandle {
    pub async fn spawn(
        event_tx: mpsc::Sender<Event>,
        audio_device: Option<&str>,
    ) -> anyhow::Result<Self> {
        let socket_path = std::env::temp_dir().join("periscope-mpv.sock");
        let _ = std::fs::remove_file(&socket_path);

        let mut cmd = Command::new("mpv");
        cmd.args([
            "--idle=yes",
            "--force-window=yes",
            "--keep-open=no",
            "--input-terminal=no",
            "--really-quiet",
        ]);
        if let Some(dev) = audio_device {
            cmd.arg(format!("--audio-device={dev}"));
        }
        let child = cmd
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("spawn mpv")?;

        let stream = connect_with_retry(&socket_path).await?;
        let (reader, writer) = tokio::io::split(stream);

        tokio::spawn(pump_events(reader, event_tx.clone()));

        let this = Self {
            child,
            socket_path,
            writer: tokio::sync::Mutex::new(writer),
            request_id: AtomicU64::new(1),
        };

        // Properties the player bar relies on. End-of-media comes from the
        // end-file event; with --keep-open=no the eof-reached property never
        // turns true, the file just unloads.
        for (id, prop) in [(1, "time-pos"), (2, "duration"), (3, "pause")] {
            this.command(json!({"command": ["observe_property", id, prop]}))
                .await?;
        }

        Ok(this)
    }

    /// Replace the current source. Whatever mpv makes of the URL is
    /// reported back asynchronously; the caller does not wait.
    pub async fn load_url(&self, url: &str) -> anyhow::Result<()> {
        self.command(json!({"command": ["loadfile", url, "replace"]}))
            .await
    }

    pub async fn toggle_pause(&self) -> anyhow::Result<()> {
        self.command(json!({"command": ["cycle", "pause"]})).await
    }

    pub async fn seek_relative(&self, seconds: f64) -> anyhow::Result<()> {
        self.command(json!({"command": ["seek", seconds, "relative"]}))
            .await
    }

    pub async fn set_volume(&self, volume_0_100: u8) -> anyhow::Result<()> {
        self.command(json!({"command": ["set_property", "volume", volume_0_100]}))
            .await
    }

    async fn command(&self, mut v: serde_json::Value) -> anyhow::Result<()> {
        // Tag requests so errors on the IPC stream stay attributable.
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        if let serde_json::Value::Object(ref mut o) = v {
            o.insert("request_id".to_string(), serde_json::Value::from(id));
        }
        let mut line = serde_json::to_vec(&v).context("encode mpv json")?;
        line.push(b'\n');
        let mut w = self.writer.lock().await;
        w.write_all(&line).await.context("write mpv ipc")?;
        w.flush().await.context("flush mpv ipc")?;
        Ok(())
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn connect_with_retry(path: &PathBuf) -> anyhow::Result<UnixStream> {
    // mpv creates the socket shortly after starting.
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) => {
                if tokio::time::Instant::now() > deadline {
                    return Err(e)
                        .with_context(|| format!("connect to mpv ipc {}", path.display()));
                }
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
        }
    }
}

async fn pump_events(reader: tokio::io::ReadHalf<UnixStream>, event_tx: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        // Command replies: {"request_id":..., "error":"..."}
        if let (Some(_rid), Some(err)) = (v.get("request_id"), v.get("error"))
            && let Some(err_s) = err.as_str()
            && err_s != "success"
        {
            let _ = event_tx
                .send(Event::Player(PlayerEvent::Error(format!(
                    "mpv ipc error: {err_s}"
                ))))
                .await;
        }
        if let Some(pe) = map_mpv_event(&v) {
            let _ = event_tx.send(Event::Player(pe)).await;
        }
    }
}

fn map_mpv_event(v: &serde_json::Value) -> Option<PlayerEvent> {
    match v.get("event")?.as_str()? {
        "property-change" => {
            let name = v.get("name")?.as_str()?;
            match name {
                "time-pos" => Some(PlayerEvent::Position {
                    seconds: v.get("data")?.as_f64().unwrap_or(0.0),
                }),
                "duration" => Some(PlayerEvent::Duration {
                    seconds: v.get("data")?.as_f64().unwrap_or(0.0),
                }),
                "pause" => {
                    let paused = v.get("data")?.as_bool().unwrap_or(false);
                    Some(if paused {
                        PlayerEvent::Paused
                    } else {
                        PlayerEvent::Started
                    })
                }
                _ => None,
            }
        }
        "end-file" => {
            // reason=eof is a natural end of media. loadfile replacement
            // arrives as reason=stop and must not advance the playlist.
            // A failed stream comes back as reason=error; keep it as a
            // status-only error, the attempted item stays "now playing".
            match v.get("reason").and_then(|x| x.as_str()).unwrap_or("") {
                "eof" => Some(PlayerEvent::Ended),
                "error" => {
                    let err = v.get("error").and_then(|x| x.as_str()).unwrap_or("unknown");
                    Some(PlayerEvent::Error(format!("mpv end-file error: {err}")))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_file_eof_maps_to_ended() {
        let v = json!({"event": "end-file", "reason": "eof"});
        assert!(matches!(map_mpv_event(&v), Some(PlayerEvent::Ended)));
    }

    #[test]
    fn end_file_replacement_is_ignored() {
        let v = json!({"event": "end-file", "reason": "stop"});
        assert!(map_mpv_event(&v).is_none());
        let v = json!({"event": "end-file", "reason": "redirect"});
        assert!(map_mpv_event(&v).is_none());
    }

    #[test]
    fn end_file_error_maps_to_error() {
        let v = json!({"event": "end-file", "reason": "error", "error": "no stream"});
        match map_mpv_event(&v) {
            Some(PlayerEvent::Error(msg)) => assert!(msg.contains("no stream")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pause_property_maps_to_pause_states() {
        let v = json!({"event": "property-change", "name": "pause", "data": true});
        assert!(matches!(map_mpv_event(&v), Some(PlayerEvent::Paused)));
        let v = json!({"event": "property-change", "name": "pause", "data": false});
        assert!(matches!(map_mpv_event(&v), Some(PlayerEvent::Started)));
    }
}
