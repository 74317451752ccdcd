/// Outcome of offering a key to a component.
///
/// Components return this to the view that owns them so the view can decide
/// whether to keep dispatching the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the owner to do
  Handled,
  /// Consumed, and the owner should react to this event
  Event(T),
  /// Not consumed; try the next handler
  NotHandled,
}
