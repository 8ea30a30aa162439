//! Pure data structures shared by every layer: the [`Account`] record, the list projection,
//! the service envelope and the modal/notification vocabulary.

pub mod account;
pub mod envelope;
pub mod notification;
pub mod view;

pub use account::*;
pub use envelope::*;
pub use notification::*;
pub use view::*;
