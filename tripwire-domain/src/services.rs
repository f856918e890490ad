// Detection services

pub mod checks;
pub mod dispatcher;
pub mod entity_states;
pub mod ledger;

pub use checks::*;
pub use dispatcher::*;
pub use entity_states::*;
pub use ledger::*;
