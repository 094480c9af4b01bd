//! Sequential asynchronous combinators.
//!
//! Each step is awaited to completion before the next one starts, so at most
//! one invocation of the step function is in flight at a time, with strictly
//! increasing indices. The first failing step ends the sequence; remaining
//! items are never started.

use std::future::Future;

/// Folds `items` in order with an asynchronous `reducer(accumulator, item, index)`.
pub async fn reduce_sequential<I, A, E, F, Fut>(items: I, initial: A, mut reducer: F) -> Result<A, E>
where
    I: IntoIterator,
    F: FnMut(A, I::Item, usize) -> Fut,
    Fut: Future<Output = Result<A, E>>,
{
    let mut accumulator = initial;
    for (index, item) in items.into_iter().enumerate() {
        accumulator = reducer(accumulator, item, index).await?;
    }
    Ok(accumulator)
}

/// Maps `items` in order with an asynchronous `f(item, index)`, collecting
/// results in the same order.
pub async fn map_sequential<I, R, E, F, Fut>(items: I, mut f: F) -> Result<Vec<R>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let items = items.into_iter();
    let capacity = items.size_hint().0;
    reduce_sequential(items, Vec::with_capacity(capacity), |mut results, item, index| {
        let step = f(item, index);
        async move {
            results.push(step.await?);
            Ok(results)
        }
    })
    .await
}
