//! Delay command definitions.
//!
//! The Core has no clock of its own. Scheduling the next status poll is an
//! effect: the Shell arms a timer for the requested duration and resolves the
//! request once it fired.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Ask the Shell to wait before resolving
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelayOperation {
    pub millis: u64,
}

/// What the Shell reports back once the timer fired
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DelayOutput {
    Elapsed,
}

impl Operation for DelayOperation {
    type Output = DelayOutput;
}

/// Command-based delay API
pub struct Delay<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Delay<Effect, Event>
where
    Effect: Send + From<crux_core::Request<DelayOperation>> + 'static,
    Event: Send + 'static,
{
    /// Resolve after `millis` milliseconds
    pub fn after(millis: u64) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(DelayOperation { millis })
    }
}

#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: DelayOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<DelayOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: DelayOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    pub fn operation(&self) -> &DelayOperation {
        &self.operation
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = DelayOutput>> {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
