//! Host-side stand-ins for the terminal's radio and buzzer, and the operator
//! console that feeds the simulated reader.

use std::time::Duration;

use gatepass_core::parse_uid_bytes;
use gatepass_hardware::{Buzzer, NetworkLink};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The host's own network connection; always up.
#[derive(Debug, Default)]
pub struct HostLink;

impl NetworkLink for HostLink {
    async fn begin(&mut self, ssid: &str) -> gatepass_hardware::Result<()> {
        if !ssid.is_empty() {
            debug!("Host build ignores SSID {}", ssid);
        }
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        true
    }

    async fn local_address(&self) -> Option<String> {
        Some("127.0.0.1".to_string())
    }
}

/// Buzzer that logs each tone.
#[derive(Debug, Default)]
pub struct ConsoleBuzzer;

impl Buzzer for ConsoleBuzzer {
    async fn tone(&mut self, frequency_hz: u32, duration: Duration) -> gatepass_hardware::Result<()> {
        debug!("Buzzer: {} Hz for {} ms", frequency_hz, duration.as_millis());
        Ok(())
    }
}

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Present a card with these UID bytes.
    Card(Vec<u8>),
    /// Download the directory again.
    Reload,
    Quit,
    Blank,
}

/// Parse an operator line: hex UID bytes (`0A FF` or `0aff`), `reload`, or
/// `quit`.
pub fn parse_command(line: &str) -> gatepass_core::Result<Command> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Ok(Command::Blank),
        "reload" => Ok(Command::Reload),
        "quit" | "exit" => Ok(Command::Quit),
        _ => parse_uid_bytes(line).map(Command::Card),
    }
}

/// Read stdin until EOF, forwarding every command in the order typed.
/// Always ends by sending `Quit`.
pub async fn read_console(commands: mpsc::Sender<Command>) {
    info!("Enter card UIDs as hex (e.g. `0A FF`), `reload`, or `quit`");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Console read failed: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(Command::Blank) => {}
            Ok(Command::Quit) => break,
            Ok(command) => {
                if commands.send(command).await.is_err() {
                    return;
                }
            }
            Err(e) => warn!("Ignoring input: {}", e),
        }
    }

    let _ = commands.send(Command::Quit).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0A FF", Command::Card(vec![0x0A, 0xFF]))]
    #[case("  04ab1c9d ", Command::Card(vec![0x04, 0xAB, 0x1C, 0x9D]))]
    #[case("reload", Command::Reload)]
    #[case("RELOAD", Command::Reload)]
    #[case("quit", Command::Quit)]
    #[case("exit", Command::Quit)]
    #[case("   ", Command::Blank)]
    fn test_parse_command(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(parse_command(line).unwrap(), expected);
    }

    #[rstest]
    #[case("hello")]
    #[case("0A 1FF")]
    fn test_parse_command_rejects_garbage(#[case] line: &str) {
        assert!(parse_command(line).is_err());
    }

    #[tokio::test]
    async fn test_host_link_always_connected() {
        let mut link = HostLink;
        link.begin("EcoArchers").await.unwrap();
        assert!(link.is_connected().await);
        assert_eq!(link.local_address().await.as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_console_buzzer_accepts_tones() {
        let mut buzzer = ConsoleBuzzer;
        assert!(buzzer.tone(2200, Duration::from_millis(300)).await.is_ok());
    }
}
