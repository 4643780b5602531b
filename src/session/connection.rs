//! Read loop: frame the input stream into lines and write responses

use super::Session;
use super::handler::{self, Flow};
use crate::error::ProtocolError;
use crate::protocol::ResponseWriter;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Drive one session until EOF, `quit`, or cancellation
pub async fn handle<R, W>(session: &Session, mut reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let config = &session.config;
    let mut read_buf = BytesMut::with_capacity(config.read_buffer_size);
    let mut response = ResponseWriter::new(config.write_buffer_size);
    // Set after an over-long line was rejected; cleared at its newline
    let mut discarding = false;

    if session.interactive {
        if config.banner {
            response.line(handler::BANNER);
        }
        response.raw(&config.prompt);
        flush(&mut writer, &mut response).await?;
    }

    loop {
        tokio::select! {
            _ = session.cancel_token.cancelled() => {
                break;
            }
            result = reader.read_buf(&mut read_buf) => {
                let eof = match result {
                    Ok(n) => n == 0,
                    Err(e) => {
                        debug!("Read error: {}", e);
                        break;
                    }
                };

                // Process all complete lines in the buffer
                while let Some(pos) = memchr::memchr(b'\n', &read_buf) {
                    let line = read_buf.split_to(pos + 1);
                    let content = line[..pos].strip_suffix(b"\r").unwrap_or(&line[..pos]);
                    if discarding {
                        discarding = false;
                    } else if content.len() > config.max_line_length {
                        reject_long_line(session, &mut response);
                    } else if handler::handle_line(session, content, &mut response) == Flow::Quit {
                        flush(&mut writer, &mut response).await?;
                        return Ok(());
                    }
                    if session.interactive {
                        response.raw(&config.prompt);
                    }
                }

                if eof {
                    // Last line may lack its newline
                    if !read_buf.is_empty() && !discarding {
                        let line = read_buf.split();
                        handler::handle_line(session, &line, &mut response);
                    }
                    flush(&mut writer, &mut response).await?;
                    break;
                }

                // One byte of slack for a `\r` still waiting on its `\n`
                if read_buf.len() > config.max_line_length.saturating_add(1) {
                    if !discarding {
                        reject_long_line(session, &mut response);
                        discarding = true;
                    }
                    read_buf.clear();
                }

                flush(&mut writer, &mut response).await?;
            }
        }
    }

    Ok(())
}

fn reject_long_line(session: &Session, response: &mut ResponseWriter) {
    let reply = session
        .engine
        .reject(ProtocolError::LineTooLong(session.config.max_line_length));
    response.text(&reply);
}

async fn flush<W>(writer: &mut W, response: &mut ResponseWriter) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if response.is_empty() {
        return Ok(());
    }
    let buf = response.take();
    writer.write_all(&buf).await?;
    writer.flush().await
}
