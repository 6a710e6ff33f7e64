pub mod catalog;
pub mod interpretation;
pub mod message;
pub mod request;
pub mod session;

pub use catalog::{MenuOffering, NamedRow, ValidValueSet};
pub use interpretation::{TurnIntent, TurnInterpretation};
pub use message::{ChatMessage, MessageKind, Sender};
pub use request::{MeetingRequest, RequiredField};
pub use session::ChatSession;
