//! Callback manager for dispatching events to multiple callbacks

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::Result;

/// Manages multiple callbacks and dispatches events in registration order
pub struct CallbackManager {
    callbacks: Vec<Box<dyn TrainerCallback>>,
}

impl CallbackManager {
    /// Create new callback manager
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Add a callback
    pub fn add<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Get number of callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Names of the registered callbacks
    pub fn names(&self) -> Vec<&'static str> {
        self.callbacks.iter().map(|cb| cb.name()).collect()
    }

    /// Fire train begin event
    pub fn on_train_begin(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            if cb.on_train_begin(ctx)? == CallbackAction::Stop {
                return Ok(CallbackAction::Stop);
            }
        }
        Ok(CallbackAction::Continue)
    }

    /// Fire train end event
    pub fn on_train_end(&mut self, ctx: &CallbackContext) -> Result<()> {
        for cb in &mut self.callbacks {
            cb.on_train_end(ctx)?;
        }
        Ok(())
    }

    /// Fire epoch begin event
    pub fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            match cb.on_epoch_begin(ctx)? {
                CallbackAction::Stop => return Ok(CallbackAction::Stop),
                CallbackAction::SkipEpoch => return Ok(CallbackAction::SkipEpoch),
                CallbackAction::Continue => {}
            }
        }
        Ok(CallbackAction::Continue)
    }

    /// Fire epoch end event
    ///
    /// Every callback sees the event even when an earlier one asks to stop.
    pub fn on_epoch_end(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        let mut action = CallbackAction::Continue;
        for cb in &mut self.callbacks {
            if cb.on_epoch_end(ctx)? == CallbackAction::Stop {
                action = CallbackAction::Stop;
            }
        }
        Ok(action)
    }

    /// Fire step end event
    pub fn on_step_end(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            match cb.on_step_end(ctx)? {
                CallbackAction::Continue => {}
                other => return Ok(other),
            }
        }
        Ok(CallbackAction::Continue)
    }
}

impl Default for CallbackManager {
    fn default() -> Self {
        Self::new()
    }
}
