//! Recording fakes for controller tests.
//!
//! Reporter and chat calls land in one shared journal so tests can assert
//! the order in which the controller talks to each service.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gatepass_core::ScanEvent;
use gatepass_hardware::mock::{
    MockBuzzer, MockBuzzerHandle, MockLink, MockLinkHandle, MockRfid, MockRfidHandle,
};
use gatepass_network::{ChatMessage, ChatSink, Delivery, DirectorySource, ScanSink};
use gatepass_terminal::{AttendanceController, ControllerConfig, Peripherals, Services};

pub const JANE: &str = r#"[{"uid":"0A FF","dlsu_id":"12012345","name":"Jane Doe","discord_username":"jane"}]"#;

pub const TEAM: &str = r#"[
  {"uid":"0A FF","dlsu_id":"12012345","name":"Jane Doe","discord_username":"jane"},
  {"uid":"04 AB 1C 9D","dlsu_id":"12054321","name":"Juan Cruz","discord_username":"juanc"},
  {"uid":"DE AD BE EF","dlsu_id":"12099999","name":"Ana Reyes","discord_username":"ana.r"}
]"#;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Fetch,
    Report { uid: String, authorized: bool },
    Chat(ChatMessage),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> usize {
        self.events().iter().filter(|e| matches!(e, Event::Fetch)).count()
    }

    pub fn reports(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Report { uid, authorized } => Some((uid, authorized)),
                _ => None,
            })
            .collect()
    }

    pub fn chats(&self) -> Vec<ChatMessage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Chat(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Report and chat events only, in order.
    pub fn outbound(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, Event::Fetch))
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Serves bodies in order; the last one repeats.
pub struct ScriptedSource {
    bodies: Mutex<VecDeque<String>>,
    journal: Journal,
}

impl DirectorySource for ScriptedSource {
    async fn fetch_raw(&self) -> String {
        self.journal.push(Event::Fetch);
        let mut bodies = self.bodies.lock().unwrap();
        if bodies.len() > 1 {
            bodies.pop_front().unwrap_or_default()
        } else {
            bodies.front().cloned().unwrap_or_default()
        }
    }
}

pub struct RecordingReporter {
    journal: Journal,
}

impl ScanSink for RecordingReporter {
    async fn report(&self, event: &ScanEvent) {
        self.journal.push(Event::Report {
            uid: event.badge_id.to_string(),
            authorized: event.authorized,
        });
    }
}

pub struct RecordingChat {
    journal: Journal,
    delivery: Delivery,
}

impl ChatSink for RecordingChat {
    async fn send(&self, message: &ChatMessage) -> Delivery {
        self.journal.push(Event::Chat(message.clone()));
        self.delivery
    }
}

pub type TestController = AttendanceController<
    MockRfid,
    MockBuzzer,
    MockLink,
    ScriptedSource,
    RecordingReporter,
    RecordingChat,
>;

pub struct Harness {
    pub controller: TestController,
    pub cards: MockRfidHandle,
    pub buzzer: MockBuzzerHandle,
    pub link: MockLinkHandle,
    pub journal: Journal,
}

pub fn harness(bodies: &[&str]) -> Harness {
    harness_with(bodies, Delivery::Delivered, |link| link)
}

/// Build a harness; `setup` runs on the link handle before the controller
/// is constructed.
pub fn harness_with(
    bodies: &[&str],
    delivery: Delivery,
    setup: impl FnOnce(MockLinkHandle) -> MockLinkHandle,
) -> Harness {
    let (reader, cards) = MockRfid::new();
    let (buzzer, buzzer_handle) = MockBuzzer::new();
    let (link, link_handle) = MockLink::new();
    let link_handle = setup(link_handle);
    let journal = Journal::default();

    let services = Services {
        directory: ScriptedSource {
            bodies: Mutex::new(bodies.iter().map(|b| b.to_string()).collect()),
            journal: journal.clone(),
        },
        reporter: RecordingReporter {
            journal: journal.clone(),
        },
        chat: RecordingChat {
            journal: journal.clone(),
            delivery,
        },
    };

    let controller = AttendanceController::new(
        Peripherals {
            reader,
            buzzer,
            link,
        },
        services,
        ControllerConfig::builder().wifi_ssid("EcoArchers").build(),
    );

    Harness {
        controller,
        cards,
        buzzer: buzzer_handle,
        link: link_handle,
        journal,
    }
}
