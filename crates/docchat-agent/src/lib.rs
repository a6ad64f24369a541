#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod personas;
pub mod session;
pub mod settings;
pub mod tools;
pub mod traits;

pub use session::{AgentSpec, AppContext, ChatSession, Reply};
pub use traits::{BackendResponse, ChatBackend};
