use std::time::Duration;

use crate::context::AppContext;

/// A piece of UI logic with an explicit lifetime, driven by the app.
///
/// `activate` and `deactivate` bracket the time a component is on screen.
/// Anything subscribed or scheduled in `activate` must be undone in
/// `deactivate`; a deactivated component never hears from signals or timers.
///
/// Only `name` is required. The hooks default to doing nothing.
pub trait Component {
    fn name(&self) -> &'static str;

    /// Called once, before the first activation.
    fn initialize(&mut self, _ctx: &mut AppContext) {}

    fn activate(&mut self, _ctx: &mut AppContext) {}

    /// Called every frame while active.
    fn tick(&mut self, _ctx: &mut AppContext, _dt: Duration) {}

    fn deactivate(&mut self, _ctx: &mut AppContext) {}
}
