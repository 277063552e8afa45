use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Run `future`, turning a panic into `Err(message)`.
///
/// Remote calls run in spawned tasks that must always report back, otherwise
/// in-flight markers (deleting ids, the pending row) would never be released.
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&'static str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "task panicked".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_value_through() {
        let result = catch_task_panic(async { 5 }).await;
        assert_eq!(result, Ok(5));
    }

    #[tokio::test]
    async fn test_panic_becomes_error() {
        let result: Result<(), String> = catch_task_panic(async { panic!("store exploded") }).await;
        assert_eq!(result, Err("store exploded".to_string()));
    }

    #[tokio::test]
    async fn test_formatted_panic_message() {
        let id = 3;
        let result: Result<(), String> =
            catch_task_panic(async move { panic!("bad id {}", id) }).await;
        assert_eq!(result, Err("bad id 3".to_string()));
    }
}
