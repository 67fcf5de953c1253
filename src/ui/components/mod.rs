mod debounce;
mod input;
mod item_list;
mod search_input;

pub use debounce::Debouncer;
pub use item_list::ItemList;
pub use search_input::{SearchEvent, SearchInput};

/// How a component answered a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, with an event for the parent
  Event(T),
  /// Not consumed, parent should try the next handler
  NotHandled,
}
