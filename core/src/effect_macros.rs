//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The body must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use todosync_core::async_effect;
///
/// async_effect! {
///     let lists = api.get_todolists().await;
///     Some(TodolistAction::TodolistsFetched { request_id, todolists: lists.ok()? })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
