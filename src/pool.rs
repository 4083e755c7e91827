// src/pool.rs

use futures::{StreamExt, stream};
use std::future::Future;

/// 以最多 `limit` 个并发对输入逐项执行 `f`，结果顺序与输入一致。
/// 所有任务完成后才返回。
pub async fn bounded_map<I, T, F, Fut>(inputs: Vec<I>, limit: usize, f: F) -> Vec<(I, T)>
where
    I: Clone,
    F: Fn(I) -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(inputs)
        .map(|input| {
            let fut = f(input.clone());
            async move { (input, fut.await) }
        })
        .buffered(limit.max(1))
        .collect()
        .await
}

/// 与 [`bounded_map`] 相同，但单项失败不会影响其他项: 失败的输入交给
/// `on_error` 换成一个降级值。
pub async fn bounded_map_or_else<I, T, E, F, Fut, G>(
    inputs: Vec<I>,
    limit: usize,
    f: F,
    on_error: G,
) -> Vec<(I, T)>
where
    I: Clone,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    G: Fn(&I, E) -> T,
{
    bounded_map(inputs, limit, f)
        .await
        .into_iter()
        .map(|(input, result)| {
            let value = result.unwrap_or_else(|e| on_error(&input, e));
            (input, value)
        })
        .collect()
}
