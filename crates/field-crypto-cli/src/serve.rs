//! JSON-lines request loop.
//!
//! For each input line the loop:
//! 1. Parses a [`Request`]; a malformed line yields a `bad_request` response.
//! 2. Runs it against the engine and the configured field policy.
//! 3. Writes exactly one [`Response`] line and flushes.
//!
//! Blank lines are skipped. End of input ends the loop.

use anyhow::{Context, Result};
use common::protocol::{ErrorResponse, Request, Response};
use common::ServiceError;
use field_crypto::{decrypt_record, encrypt_record, FieldCipher, FieldPolicy};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Read requests from `reader` until EOF, writing one response per request to `writer`.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run<R, W, C>(mut reader: R, mut writer: W, cipher: &C, policy: &FieldPolicy) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: FieldCipher + ?Sized,
{
    let mut buf = Vec::new();
    let mut handled = 0u64;
    let mut failed = 0u64;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("failed to read request")?;
        if read == 0 {
            break;
        }
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        // Raw bytes, so a line that is not UTF-8 is answered rather than fatal.
        let response = match serde_json::from_slice::<Request>(&buf) {
            Ok(req) => handle(cipher, policy, req),
            Err(e) => {
                debug!(error = %e, "malformed request line");
                error_response(&ServiceError::BadRequest(e.to_string()))
            }
        };
        handled += 1;
        if matches!(response, Response::Error { .. }) {
            failed += 1;
        }

        let mut out = serde_json::to_vec(&response).context("failed to serialise response")?;
        out.push(b'\n');
        writer.write_all(&out).await.context("failed to write response")?;
        writer.flush().await.context("failed to flush response")?;
    }

    info!(handled, failed, "input closed");
    Ok(())
}

/// Execute a single request.
pub fn handle<C>(cipher: &C, policy: &FieldPolicy, req: Request) -> Response
where
    C: FieldCipher + ?Sized,
{
    match req {
        Request::Encrypt { mode, value } => Response::Value {
            value: cipher.encrypt_field(mode, value.as_deref()),
        },
        Request::Decrypt { mode, value } => match cipher.decrypt_field(mode, value.as_deref()) {
            Ok(value) => Response::Value { value },
            Err(e) => {
                warn!(%mode, "field decryption failed");
                error_response(&ServiceError::from(e))
            }
        },
        Request::EncryptRecord { payload } => Response::Record {
            payload: encrypt_record(cipher, policy, &payload),
        },
        Request::DecryptRecord { payload } => match decrypt_record(cipher, policy, &payload) {
            Ok(payload) => Response::Record { payload },
            Err(e) => error_response(&ServiceError::from(e)),
        },
    }
}

fn error_response(e: &ServiceError) -> Response {
    Response::Error {
        error: ErrorResponse::from(e),
    }
}
