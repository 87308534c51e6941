//! Operator session: feeds console commands to a booted controller.
//!
//! Cards travel on the same channel as `reload` and `quit`, and at most one
//! command is taken per scan cycle, so every card typed before `quit` (or
//! before end of input) is scanned before the session ends.

use gatepass_hardware::mock::{MockRfid, MockRfidHandle};
use gatepass_hardware::{Buzzer, NetworkLink};
use gatepass_network::{ChatSink, DirectorySource, ScanSink};
use gatepass_terminal::{AttendanceController, ScanOutcome};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{info, warn};

use crate::console::Command;

/// Run scan cycles until `quit` or until the console goes away. Returns the
/// number of scan decisions made.
pub async fn serve<B, L, F, S, C>(
    controller: &mut AttendanceController<MockRfid, B, L, F, S, C>,
    cards: &MockRfidHandle,
    commands: &mut mpsc::Receiver<Command>,
) -> anyhow::Result<usize>
where
    B: Buzzer,
    L: NetworkLink,
    F: DirectorySource,
    S: ScanSink,
    C: ChatSink,
{
    let mut decisions = 0;

    loop {
        match commands.try_recv() {
            Ok(Command::Card(uid)) => {
                if let Err(e) = cards.present_card(uid).await {
                    warn!("Card rejected by reader: {}", e);
                }
            }
            Ok(Command::Reload) => {
                let reload = controller.reload_directory().await?;
                info!("Directory reload: {:?}", reload);
            }
            Ok(Command::Quit) | Err(TryRecvError::Disconnected) => break,
            Ok(Command::Blank) | Err(TryRecvError::Empty) => {}
        }

        match controller.tick().await {
            ScanOutcome::NoCard => {}
            ScanOutcome::Granted { record } => {
                decisions += 1;
                info!("Granted: {} ({})", record.display_name, record.external_id);
            }
            ScanOutcome::Denied { uid } => {
                decisions += 1;
                info!("Denied: {}", uid);
            }
        }
    }

    Ok(decisions)
}
