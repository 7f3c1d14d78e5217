//! Batch error policies
//!
//! A policy decides what a host gets back from a batch operation when some
//! elements fail. [`Exception`] returns plain values and fails the whole call
//! on the first failed element. [`Variant`] returns one `Result` per element
//! and never fails per element.
//!
//! Both are driven by the same collector, which turns the out-of-order
//! callbacks of a manager into a vector ordered by input index.

use std::cell::RefCell;

use tracing::warn;

use assetbridge_core::{
    BatchElementError, BatchElementException, ElementDetail, Error, Result,
};
use assetbridge_interfaces::{BatchElementErrorCallback, SuccessCallback};

/// How per-element failures are presented to the host
pub trait ErrorPolicy {
    /// What the host receives for each element
    type Element<T>;

    /// Wrap a successful value
    fn on_success<T>(value: T) -> Self::Element<T>;

    /// Handle a failed element.
    ///
    /// `Ok` stores the returned element. `Err` stops the batch. `detail` is
    /// only called by policies that need it.
    fn on_error<T>(
        index: usize,
        error: BatchElementError,
        detail: impl FnOnce() -> ElementDetail,
    ) -> Result<Self::Element<T>>;
}

/// Fail the call with a [`BatchElementException`] on the first failed element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exception;

impl ErrorPolicy for Exception {
    type Element<T> = T;

    fn on_success<T>(value: T) -> T {
        value
    }

    fn on_error<T>(
        index: usize,
        error: BatchElementError,
        detail: impl FnOnce() -> ElementDetail,
    ) -> Result<T> {
        Err(BatchElementException::new(index, error, detail()).into())
    }
}

/// Return a `Result` per element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Variant;

impl ErrorPolicy for Variant {
    type Element<T> = std::result::Result<T, BatchElementError>;

    fn on_success<T>(value: T) -> Self::Element<T> {
        Ok(value)
    }

    fn on_error<T>(
        _index: usize,
        error: BatchElementError,
        _detail: impl FnOnce() -> ElementDetail,
    ) -> Result<Self::Element<T>> {
        Ok(Err(error))
    }
}

struct Collector<P: ErrorPolicy, T> {
    slots: Vec<Option<P::Element<T>>>,
    failure: Option<Error>,
}

impl<P: ErrorPolicy, T> Collector<P, T> {
    fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self {
            slots,
            failure: None,
        }
    }

    fn success(&mut self, index: usize, value: T) -> Result<()> {
        self.accept(index)?;
        self.slots[index] = Some(P::on_success(value));
        Ok(())
    }

    fn error(
        &mut self,
        index: usize,
        error: BatchElementError,
        detail: impl FnOnce() -> ElementDetail,
    ) -> Result<()> {
        self.accept(index)?;
        match P::on_error(index, error, detail) {
            Ok(element) => {
                self.slots[index] = Some(element);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Refuse the callback once the batch has failed or if the index breaks
    /// the one-callback-per-index contract
    fn accept(&mut self, index: usize) -> Result<()> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        let violation = match self.slots.get(index) {
            Some(None) => return Ok(()),
            Some(Some(_)) => format!("Batch element index {} was reported more than once.", index),
            None => format!(
                "Batch element index {} is out of range for a batch of {} elements.",
                index,
                self.slots.len()
            ),
        };

        warn!(index, batch_size = self.slots.len(), "{}", violation);
        self.fail(Error::Unhandled(violation))
    }

    fn fail(&mut self, error: Error) -> Result<()> {
        self.failure = Some(error.clone());
        Err(error)
    }

    fn finish(self, outcome: Result<()>) -> Result<Vec<P::Element<T>>> {
        // The first failure wins, even if the manager swallowed it.
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        outcome?;

        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    Error::Unhandled(format!("No result was reported for batch element {}.", index))
                })
            })
            .collect()
    }
}

/// Run a callback-form batch operation of `len` elements, collecting the
/// results in input order under policy `P`.
///
/// `detail` describes an element for exception messages and is only called
/// for failed elements under policies that need it.
pub(crate) fn collect<P, T, D, F>(len: usize, detail: D, dispatch: F) -> Result<Vec<P::Element<T>>>
where
    P: ErrorPolicy,
    D: Fn(usize) -> ElementDetail,
    F: FnOnce(&mut SuccessCallback<'_, T>, &mut BatchElementErrorCallback<'_>) -> Result<()>,
{
    let collector = RefCell::new(Collector::<P, T>::new(len));

    let outcome = {
        let mut on_success = |index: usize, value: T| collector.borrow_mut().success(index, value);
        let mut on_error = |index: usize, error: BatchElementError| {
            collector.borrow_mut().error(index, error, || detail(index))
        };
        let success: &mut SuccessCallback<'_, T> = &mut on_success;
        let error: &mut BatchElementErrorCallback<'_> = &mut on_error;
        dispatch(success, error)
    };

    collector.into_inner().finish(outcome)
}

/// Take the only element of a single-element batch
pub(crate) fn single<E>(elements: Result<Vec<E>>) -> Result<E> {
    elements?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Unhandled("No result was reported for batch element 0.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use assetbridge_core::{EntityReference, ErrorCode};

    fn no_detail(_: usize) -> ElementDetail {
        ElementDetail::default()
    }

    #[test]
    fn test_exception_restores_order() {
        let result = collect::<Exception, u32, _, _>(3, no_detail, |success, _error| {
            success(2, 20)?;
            success(0, 0)?;
            success(1, 10)?;
            Ok(())
        });

        assert_eq!(result, Ok(vec![0, 10, 20]));
    }

    #[test]
    fn test_exception_fails_fast_with_detail() {
        let mut after_failure = None;
        let result = collect::<Exception, u32, _, _>(
            2,
            |index| ElementDetail::default().with_entity_reference(EntityReference::new(format!("r{}", index))),
            |success, error| {
                error(1, BatchElementError::new(ErrorCode::EntityResolutionError, "missing"))?;
                after_failure = Some(success(0, 1));
                Ok(())
            },
        );

        assert!(after_failure.is_none());
        let err = result.unwrap_err();
        let exception = err.as_batch_element().unwrap();
        assert_eq!(exception.index, 1);
        assert_eq!(exception.entity_reference, Some(EntityReference::new("r1")));
        assert_eq!(exception.message(), "entityResolutionError: missing [index=1] [entity=r1]");
    }

    #[test]
    fn test_swallowed_failure_is_still_returned() {
        let mut refused = Vec::new();
        let result = collect::<Exception, u32, _, _>(3, no_detail, |success, error| {
            let _ = error(0, BatchElementError::new(ErrorCode::Unknown, "first"));
            refused.push(success(1, 1).is_err());
            refused.push(error(2, BatchElementError::new(ErrorCode::Unknown, "second")).is_err());
            Ok(())
        });

        assert_eq!(refused, vec![true, true]);
        let err = result.unwrap_err();
        assert_eq!(err.as_batch_element().map(|e| e.error.message.as_str()), Some("first"));
    }

    #[test]
    fn test_variant_never_fails_per_element() {
        let result = collect::<Variant, u32, _, _>(
            2,
            |_| panic!("variant policy must not build element detail"),
            |success, error| {
                error(0, BatchElementError::new(ErrorCode::InvalidTraitSet, "bad"))?;
                success(1, 7)?;
                Ok(())
            },
        );

        assert_eq!(
            result,
            Ok(vec![
                Err(BatchElementError::new(ErrorCode::InvalidTraitSet, "bad")),
                Ok(7)
            ])
        );
    }

    #[test]
    fn test_whole_batch_error_propagates() {
        let result = collect::<Variant, u32, _, _>(1, no_detail, |_success, _error| {
            Err(Error::Unhandled("backend offline".to_string()))
        });

        assert_eq!(result, Err(Error::Unhandled("backend offline".to_string())));
    }

    #[test]
    fn test_contract_violations() {
        let out_of_range = collect::<Variant, u32, _, _>(1, no_detail, |success, _| success(1, 0));
        assert_matches!(out_of_range, Err(Error::Unhandled(msg)) if msg.contains("out of range"));

        let duplicate = collect::<Variant, u32, _, _>(1, no_detail, |success, _| {
            success(0, 0)?;
            success(0, 1)
        });
        assert_matches!(duplicate, Err(Error::Unhandled(msg)) if msg.contains("more than once"));

        let missing = collect::<Variant, u32, _, _>(2, no_detail, |success, _| success(0, 0));
        assert_eq!(
            missing,
            Err(Error::Unhandled("No result was reported for batch element 1.".to_string()))
        );
    }

    #[test]
    fn test_empty_batch() {
        let result = collect::<Exception, u32, _, _>(0, no_detail, |_, _| Ok(()));
        assert_eq!(result, Ok(vec![]));
    }

    #[test]
    fn test_single() {
        assert_eq!(single(Ok(vec![5])), Ok(5));
        assert_matches!(single::<u32>(Ok(vec![])), Err(Error::Unhandled(_)));
    }
}
