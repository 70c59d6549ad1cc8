pub use crate::config::{self, Config};
pub use crate::error::{Error, Result};
pub use crate::events::{self, HandlerEvent};
pub use crate::family;
pub use crate::handler::{LinkState, ProtocolHandler};
pub use crate::options::Options;
pub use crate::sensor::{SensorMap, Value};

pub use log::{debug, error, info, trace, warn};
pub use tokio::sync::broadcast;
