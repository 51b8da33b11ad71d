pub mod breach_table;
pub mod notification;
pub mod payment_hook;
pub mod register_order;

pub use crate::domain::gateway::{GatewayEvent, InvocationContext, ResponseEnvelope};
pub use crate::domain::model::{BreachRecord, BreachReport, Order};
pub use crate::domain::ports::{BreachLookup, Notifier, Storage};
pub use crate::utils::error::Result;
