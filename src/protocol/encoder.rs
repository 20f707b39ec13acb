//! Response Encoder
//!
//! Maps an [`Outcome`] to the bytes written back to the client.
//!
//! | Outcome | Reply |
//! |---|---|
//! | `Contents` | the raw file bytes, no framing |
//! | `Created` | `server: created file '<path>' [200]` |
//! | `Removed` | `server: removed file '<path>' [200]` |
//! | `Appended` | `APPEND returned 200.` |
//! | `Failed` | `<code> - <reason>` |
//!
//! The status-to-body mapping only covers the error statuses. Asking it to
//! encode `200` as an error is a contract violation between the handlers and
//! the encoder; it is reported as [`EncodeError::UnexpectedStatus`] so the
//! caller can drop that one connection and keep serving.

use crate::protocol::types::{Outcome, Status, APPEND_OK};
use bytes::Bytes;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Errors that can occur while encoding or sending a response.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A status with no error body reached `send_err`
    #[error("no error reply for status {0}")]
    UnexpectedStatus(Status),

    /// Writing to the sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodes an outcome into its reply bytes.
pub fn encode(outcome: &Outcome) -> Result<Bytes, EncodeError> {
    match outcome {
        Outcome::Contents(data) => Ok(data.clone()),
        Outcome::Created(path) => Ok(Bytes::from(format!(
            "server: created file '{}' [200]",
            path
        ))),
        Outcome::Removed(path) => Ok(Bytes::from(format!(
            "server: removed file '{}' [200]",
            path
        ))),
        Outcome::Appended => Ok(Bytes::from_static(APPEND_OK.as_bytes())),
        Outcome::Failed(status) => encode_err(*status),
    }
}

/// Encodes the fixed error body of a failure status.
pub fn encode_err(status: Status) -> Result<Bytes, EncodeError> {
    status
        .error_body()
        .map(|body| Bytes::from_static(body.as_bytes()))
        .ok_or(EncodeError::UnexpectedStatus(status))
}

/// Writes the reply for `outcome` to `sink`.
///
/// Returns the number of bytes written. Write failures are returned, not
/// retried.
pub async fn send_response<W>(outcome: &Outcome, sink: &mut W) -> Result<usize, EncodeError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode(outcome)?;
    write_reply(&bytes, sink).await
}

/// Writes the fixed error body for `status` to `sink`.
pub async fn send_err<W>(status: Status, sink: &mut W) -> Result<usize, EncodeError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode_err(status)?;
    write_reply(&bytes, sink).await
}

async fn write_reply<W>(bytes: &[u8], sink: &mut W) -> Result<usize, EncodeError>
where
    W: AsyncWrite + Unpin,
{
    sink.write_all(bytes).await?;
    sink.flush().await?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contents_verbatim() {
        let data = Bytes::from(&b"line one\nline two\x00\xff"[..]);
        let encoded = encode(&Outcome::Contents(data.clone())).unwrap();
        assert_eq!(encoded, data);
    }

    #[test]
    fn test_encode_confirmations() {
        assert_eq!(
            encode(&Outcome::Created("notes.txt".into())).unwrap(),
            Bytes::from("server: created file 'notes.txt' [200]")
        );
        assert_eq!(
            encode(&Outcome::Removed("notes.txt".into())).unwrap(),
            Bytes::from("server: removed file 'notes.txt' [200]")
        );
        assert_eq!(
            encode(&Outcome::Appended).unwrap(),
            Bytes::from("APPEND returned 200.")
        );
    }

    #[test]
    fn test_encode_failures() {
        assert_eq!(
            encode(&Outcome::failed(Status::BadRequest)).unwrap(),
            Bytes::from("400 - Bad Request")
        );
        assert_eq!(
            encode(&Outcome::failed(Status::NotFound)).unwrap(),
            Bytes::from("404 - Not Found")
        );
        assert_eq!(
            encode(&Outcome::failed(Status::UnprocessableEntity)).unwrap(),
            Bytes::from("422 - Unprocessable Entity")
        );
        assert_eq!(
            encode(&Outcome::failed(Status::InternalServerError)).unwrap(),
            Bytes::from("500 - Internal Server Error")
        );
    }

    #[test]
    fn test_ok_is_not_an_error_reply() {
        let result = encode(&Outcome::failed(Status::Ok));
        assert!(matches!(
            result,
            Err(EncodeError::UnexpectedStatus(Status::Ok))
        ));
    }

    #[tokio::test]
    async fn test_send_response_writes_reply() {
        let mut sink = tokio_test::io::Builder::new()
            .write(b"APPEND returned 200.")
            .build();

        let n = send_response(&Outcome::Appended, &mut sink).await.unwrap();
        assert_eq!(n, 20);
    }

    #[tokio::test]
    async fn test_send_err_writes_body() {
        let mut sink: Vec<u8> = Vec::new();
        let n = send_err(Status::NotFound, &mut sink).await.unwrap();
        assert_eq!(n, 15);
        assert_eq!(sink, b"404 - Not Found");
    }

    #[tokio::test]
    async fn test_send_err_rejects_ok_without_writing() {
        let mut sink: Vec<u8> = Vec::new();
        let result = send_err(Status::Ok, &mut sink).await;
        assert!(matches!(result, Err(EncodeError::UnexpectedStatus(_))));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_send_response_reports_write_failure() {
        let mut sink = tokio_test::io::Builder::new()
            .write_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "peer closed",
            ))
            .build();

        let result = send_response(&Outcome::Appended, &mut sink).await;
        assert!(matches!(result, Err(EncodeError::Io(_))));
    }
}
