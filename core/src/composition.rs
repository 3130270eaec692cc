//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Embed a child reducer that owns a slice of a larger
//!   state and speaks its own action type
//!
//! Scoping is what lets independent stores share one runtime: each child only
//! sees the actions its `to_child` function accepts, mutates only its own
//! slice, and has its effects re-tagged into parent actions.

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// Shared, thread-safe reducer trait object.
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use todosync_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
/// use todosync_core::composition::{combine_reducers, CombinedReducer};
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     counter: i32,
///     logged: bool,
/// }
///
/// #[derive(Clone)]
/// enum AppAction {
///     Increment,
///     Log,
/// }
///
/// struct CounterReducer;
/// struct LoggingReducer;
///
/// impl Reducer for CounterReducer {
///     type State = AppState;
///     type Action = AppAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
///         if matches!(action, AppAction::Increment) {
///             state.counter += 1;
///         }
///         smallvec![Effect::None]
///     }
/// }
///
/// impl Reducer for LoggingReducer {
///     type State = AppState;
///     type Action = AppAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
///         if matches!(action, AppAction::Log) {
///             state.logged = true;
///         }
///         smallvec![Effect::None]
///     }
/// }
///
/// let combined: CombinedReducer<AppState, AppAction, ()> =
///     combine_reducers(vec![Arc::new(CounterReducer), Arc::new(LoggingReducer)]);
///
/// let mut state = AppState::default();
/// let _ = combined.reduce(&mut state, AppAction::Increment, &());
/// assert_eq!(state.counter, 1);
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|e| !e.is_none()));
        }

        all_effects
    }
}

/// Scopes a child reducer to a slice of a parent state.
///
/// - `state`: lens from the parent state to the child's slice
/// - `to_child`: offers a parent action to the child; `None` means the child
///   ignores it. The same parent action may be accepted by several children,
///   which is how one store observes another's outcomes.
/// - `to_parent`: wraps actions produced by the child's effects
///
/// # Examples
///
/// ```
/// use todosync_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
/// use todosync_core::composition::scope_reducer;
///
/// #[derive(Clone, Default)]
/// struct CounterState {
///     count: i32,
/// }
///
/// #[derive(Clone)]
/// enum CounterAction {
///     Increment,
/// }
///
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = CounterState;
///     type Action = CounterAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut CounterState, action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
///         match action {
///             CounterAction::Increment => state.count += 1,
///         }
///         smallvec![Effect::None]
///     }
/// }
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     counter: CounterState,
///     other_data: String,
/// }
///
/// #[derive(Clone)]
/// enum AppAction {
///     Counter(CounterAction),
/// }
///
/// fn counter_slice(app: &mut AppState) -> &mut CounterState {
///     &mut app.counter
/// }
///
/// fn to_counter(action: &AppAction) -> Option<CounterAction> {
///     match action {
///         AppAction::Counter(a) => Some(a.clone()),
///     }
/// }
///
/// let scoped = scope_reducer(CounterReducer, counter_slice, to_counter, AppAction::Counter);
///
/// let mut state = AppState::default();
/// let _ = scoped.reduce(&mut state, AppAction::Counter(CounterAction::Increment), &());
/// assert_eq!(state.counter.count, 1);
/// ```
pub const fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    to_child: fn(&A) -> Option<SubA>,
    to_parent: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        to_child,
        to_parent,
    }
}

/// A scoped reducer that operates on a slice of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, R> {
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    to_child: fn(&A) -> Option<SubA>,
    to_parent: fn(SubA) -> A,
}

impl<S, SubS, A, SubA, R: Clone> Clone for ScopedReducer<S, SubS, A, SubA, R> {
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            to_child: self.to_child,
            to_parent: self.to_parent,
        }
    }
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, R>
where
    A: Send + 'static,
    SubA: Send + 'static,
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.to_child)(&action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);

        self.reducer
            .reduce(child_state, child_action, env)
            .into_iter()
            .map(|effect| effect.map(self.to_parent))
            .collect()
    }
}
