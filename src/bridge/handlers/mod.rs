//! Peer event handlers, one per bridged IRC command.

mod join;
mod nick;
mod part;
mod quit;
mod register;

pub use join::JoinHandler;
pub use nick::NickHandler;
pub use part::PartHandler;
pub use quit::QuitHandler;
pub use register::RegisterHandler;

use super::{BridgeContext, PeerArgs};
use crate::error::HandlerResult;
use async_trait::async_trait;

/// Handler for one peer event command.
#[async_trait]
pub trait PeerHandler: Send + Sync {
    async fn handle(&self, ctx: &BridgeContext, args: &PeerArgs) -> HandlerResult;
}
