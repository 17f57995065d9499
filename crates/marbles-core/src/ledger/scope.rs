use crate::{
    ledger::{LedgerError, LedgerIterator},
    obs::{MetricsEvent, ScanKind, record},
};
use std::marker::PhantomData;

///
/// ScopedIterator
///
/// Owns a ledger iterator for the duration of one scan and guarantees that
/// it is closed exactly once: on exhaustion, through `finish`, or on drop
/// (early return, error propagation, unwinding).
///

pub struct ScopedIterator<I, T>
where
    I: LedgerIterator<T>,
{
    inner: I,
    scan: ScanKind,
    closed: bool,
    close_error: Option<LedgerError>,
    _marker: PhantomData<T>,
}

impl<I, T> ScopedIterator<I, T>
where
    I: LedgerIterator<T>,
{
    #[must_use]
    pub const fn new(scan: ScanKind, inner: I) -> Self {
        Self {
            inner,
            scan,
            closed: false,
            close_error: None,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn scan_kind(&self) -> ScanKind {
        self.scan
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the iterator and surface any close failure, including one
    /// deferred from closing on exhaustion.
    pub fn finish(mut self) -> Result<(), LedgerError> {
        self.close_once();

        match self.close_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn close_once(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let result = self.inner.close();
        record(MetricsEvent::IteratorClosed {
            scan: self.scan,
            clean: result.is_ok(),
        });
        if let Err(err) = result {
            self.close_error = Some(err);
        }
    }
}

impl<I, T> Iterator for ScopedIterator<I, T>
where
    I: LedgerIterator<T>,
{
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }

        let item = self.inner.next();
        if item.is_none() {
            self.close_once();
        }

        item
    }
}

impl<I, T> Drop for ScopedIterator<I, T>
where
    I: LedgerIterator<T>,
{
    fn drop(&mut self) {
        self.close_once();
    }
}
