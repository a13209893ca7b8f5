//! Tests for `ResponseBody`.

use super::{ResponseBody, TransportError};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_stream::StreamExt;

fn chunked(parts: &[&'static str]) -> ResponseBody {
    let chunks: Vec<Result<Bytes, TransportError>> = parts
        .iter()
        .map(|part| Ok(Bytes::from_static(part.as_bytes())))
        .collect();
    ResponseBody::from_stream(tokio_stream::iter(chunks))
}

mod reading {
    use super::*;

    #[tokio::test]
    async fn bytes_concatenates_chunks() {
        let body = chunked(&["hel", "lo ", "world"]);
        assert_eq!(body.bytes().await.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn empty_body_reads_as_empty() {
        assert!(ResponseBody::empty().bytes().await.unwrap().is_empty());
        assert!(ResponseBody::from_bytes("").bytes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn next_chunk_yields_in_order() {
        let mut body = chunked(&["a", "b"]);

        assert_eq!(body.next_chunk().await.unwrap().unwrap(), "a");
        assert_eq!(body.next_chunk().await.unwrap().unwrap(), "b");
        assert!(body.next_chunk().await.is_none());
    }

    #[tokio::test]
    async fn stream_error_is_surfaced() {
        let chunks: Vec<Result<Bytes, TransportError>> =
            vec![Ok(Bytes::from_static(b"partial")), Err(TransportError::Timeout)];
        let body = ResponseBody::from_stream(tokio_stream::iter(chunks));

        assert!(matches!(body.bytes().await, Err(TransportError::Timeout)));
    }
}

mod limits {
    use super::*;

    #[tokio::test]
    async fn bytes_limited_truncates() {
        let body = chunked(&["0123", "4567", "89"]);
        assert_eq!(body.bytes_limited(6).await.unwrap(), b"012345");
    }

    #[tokio::test]
    async fn bytes_limited_returns_all_when_small() {
        let body = chunked(&["abc"]);
        assert_eq!(body.bytes_limited(1024).await.unwrap(), b"abc");
    }

    #[tokio::test]
    async fn bytes_limited_still_consumes_remaining_chunks() {
        let consumed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&consumed);
        let chunks: Vec<Result<Bytes, TransportError>> =
            (0..4).map(|_| Ok(Bytes::from_static(b"xxxx"))).collect();
        let stream = tokio_stream::iter(chunks).map(move |chunk| {
            counter.fetch_add(1, Ordering::SeqCst);
            chunk
        });

        let body = ResponseBody::from_stream(stream);
        let read = body.bytes_limited(2).await.unwrap();

        assert_eq!(read, b"xx");
        assert_eq!(consumed.load(Ordering::SeqCst), 4);
    }
}

mod draining {
    use super::*;

    #[tokio::test]
    async fn drain_counts_bytes() {
        let body = chunked(&["abc", "de"]);
        assert_eq!(body.drain().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn default_body_is_empty() {
        assert_eq!(ResponseBody::default().drain().await.unwrap(), 0);
    }

    #[test]
    fn debug_is_opaque() {
        let debug = format!("{:?}", ResponseBody::empty());
        assert!(debug.contains("ResponseBody"));
    }

    #[test]
    fn body_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ResponseBody>();
    }
}
