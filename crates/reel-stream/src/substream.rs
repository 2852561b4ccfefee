//! A bounded, read-only window over an open byte stream.

use std::io::{self, SeekFrom};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::io::{AsyncRead, AsyncSeek, AsyncSeekExt, ReadBuf};

use crate::crossing::CrossingDetector;

/// Exposes `length` bytes of `inner` starting at `start`, then reports EOF
/// even if `inner` has more data.
///
/// The sub-stream seeks `inner` exactly once, in [`BoundedSubStream::new`],
/// and owns its read cursor from then on. If `inner` runs dry before the
/// window is exhausted the read fails with [`io::ErrorKind::UnexpectedEof`]
/// so the response is aborted rather than cut short silently.
#[derive(Debug)]
pub struct BoundedSubStream<R> {
    inner: R,
    start: u64,
    length: u64,
    consumed: u64,
    detector: Option<CrossingDetector>,
}

impl<R> BoundedSubStream<R>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    /// Seek `inner` to `start` and wrap it.
    pub async fn new(mut inner: R, start: u64, length: u64) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(start)).await?;
        Ok(Self {
            inner,
            start,
            length,
            consumed: 0,
            detector: None,
        })
    }
}

impl<R> BoundedSubStream<R> {
    /// Report absolute positions to `detector` after every read.
    pub fn with_detector(mut self, detector: CrossingDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Bytes left in the window.
    pub fn remaining(&self) -> u64 {
        self.length - self.consumed
    }

    /// Absolute position in the underlying stream.
    pub fn position(&self) -> u64 {
        self.start + self.consumed
    }
}

impl<R> AsyncRead for BoundedSubStream<R>
where
    R: AsyncRead + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        let remaining = this.length - this.consumed;
        if remaining == 0 || buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let max = remaining.min(buf.remaining() as u64) as usize;
        let dst = buf.initialize_unfilled_to(max);
        let mut window = ReadBuf::new(dst);
        ready!(Pin::new(&mut this.inner).poll_read(cx, &mut window))?;
        let n = window.filled().len();

        if n == 0 {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "source ended at byte {} with {remaining} bytes of the range unsent",
                    this.start + this.consumed
                ),
            )));
        }

        buf.advance(n);
        this.consumed += n as u64;

        if let Some(detector) = this.detector.as_mut() {
            detector.observe(this.start + this.consumed);
        }

        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::AsyncReadExt;

    fn source(len: usize) -> Cursor<Vec<u8>> {
        Cursor::new((0..len).map(|i| (i % 251) as u8).collect())
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        (hits, move || {
            h.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test]
    async fn stops_at_window_boundary() {
        let mut sub = BoundedSubStream::new(source(5000), 0, 1000).await.unwrap();
        let mut out = Vec::new();
        sub.read_to_end(&mut out).await.unwrap();
        assert_eq!(out.len(), 1000);
        assert_eq!(sub.remaining(), 0);
    }

    #[tokio::test]
    async fn serves_bytes_from_offset() {
        let data = source(5000).into_inner();
        let mut sub = BoundedSubStream::new(source(5000), 1200, 300).await.unwrap();
        let mut out = Vec::new();
        sub.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, data[1200..1500]);
        assert_eq!(sub.position(), 1500);
    }

    #[tokio::test]
    async fn small_buffer_never_overreads() {
        let mut sub = BoundedSubStream::new(source(100), 10, 25).await.unwrap();
        let mut chunk = [0u8; 7];
        let mut total = 0;
        loop {
            let n = sub.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, 25);
    }

    #[tokio::test]
    async fn truncated_source_is_an_error() {
        let mut sub = BoundedSubStream::new(source(500), 0, 1000).await.unwrap();
        let mut out = Vec::new();
        let err = sub.read_to_end(&mut out).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn crossing_fires_on_the_read_reaching_threshold() {
        let (hits, on_cross) = counter();
        let detector = CrossingDetector::for_file(1000, 0.89, on_cross);
        let mut sub = BoundedSubStream::new(source(1000), 0, 1000)
            .await
            .unwrap()
            .with_detector(detector);

        let mut chunk = [0u8; 10];
        loop {
            let before = sub.position();
            let n = sub.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            let after = sub.position();
            let expected = usize::from(after >= 890);
            assert_eq!(
                hits.load(Ordering::SeqCst),
                expected,
                "after read {before}..{after}"
            );
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn crossing_not_reached_inside_window() {
        let (hits, on_cross) = counter();
        let detector = CrossingDetector::for_file(1000, 0.89, on_cross);
        let mut sub = BoundedSubStream::new(source(1000), 0, 501)
            .await
            .unwrap()
            .with_detector(detector);

        let mut out = Vec::new();
        sub.read_to_end(&mut out).await.unwrap();
        assert_eq!(out.len(), 501);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn crossing_fires_on_first_read_past_threshold() {
        let (hits, on_cross) = counter();
        let detector = CrossingDetector::for_file(1000, 0.89, on_cross);
        let mut sub = BoundedSubStream::new(source(1000), 900, 100)
            .await
            .unwrap()
            .with_detector(detector);

        let mut chunk = [0u8; 1];
        let n = sub.read(&mut chunk).await.unwrap();
        assert_eq!(n, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let mut rest = Vec::new();
        sub.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest.len(), 99);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_length_window_is_immediately_exhausted() {
        let mut sub = BoundedSubStream::new(source(10), 0, 0).await.unwrap();
        let mut out = Vec::new();
        assert_eq!(sub.read_to_end(&mut out).await.unwrap(), 0);
    }
}
