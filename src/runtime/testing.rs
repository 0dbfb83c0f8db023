//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::dispatch::{DeliveryError, OutboundResponse};
use super::traits::*;
use super::Services;
use crate::exercises::Menu;
use crate::journal::{JournalEntry, JournalError};
use crate::mood::Lexicon;
use crate::speech::transcode::{verify_output, MIN_OUTPUT_BYTES};
use crate::speech::{RetrievalError, TranscodeError, TranscriptionError, VoicePipeline};
use crate::state_machine::ChatId;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Poll `done` until it holds or the wait times out
async fn wait_until(what: &str, mut done: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    while !done() {
        assert!(tokio::time::Instant::now() < deadline, "Timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ============================================================================
// Mock Messenger
// ============================================================================

/// Recording messenger with canned attachments
#[derive(Default)]
pub struct MockMessenger {
    sent: Mutex<Vec<OutboundResponse>>,
    acknowledged: Mutex<Vec<String>>,
    attachments: HashMap<String, Vec<u8>>,
    fail_sends: bool,
    /// Delivery attempts, successful or not
    pub send_attempts: AtomicUsize,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.attachments.insert(attachment.into(), bytes);
        self
    }

    /// Reject every send
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn sent(&self) -> Vec<OutboundResponse> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self, chat_id: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.chat_id == chat_id)
            .map(|r| r.text.clone())
            .collect()
    }

    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().unwrap().clone()
    }

    pub async fn wait_for_sent(&self, count: usize) {
        wait_until("sent messages", || self.sent.lock().unwrap().len() >= count).await;
    }

    pub async fn wait_for_acknowledged(&self, count: usize) {
        wait_until("acknowledgements", || {
            self.acknowledged.lock().unwrap().len() >= count
        })
        .await;
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(&self, chat_id: ChatId, text: &str, menu: Option<&Menu>) -> Result<(), DeliveryError> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_sends {
            return Err(DeliveryError::new("Forbidden: bot was blocked by the user"));
        }
        self.sent.lock().unwrap().push(OutboundResponse {
            chat_id,
            text: text.to_string(),
            menu: menu.cloned(),
        });
        Ok(())
    }

    async fn fetch_attachment(&self, attachment: &str) -> Result<Vec<u8>, RetrievalError> {
        self.attachments
            .get(attachment)
            .cloned()
            .ok_or_else(|| RetrievalError::Status {
                status: 404,
                body: format!("no attachment {attachment}"),
            })
    }

    async fn acknowledge(&self, event_id: &str) -> Result<(), DeliveryError> {
        self.acknowledged.lock().unwrap().push(event_id.to_string());
        Ok(())
    }
}

// ============================================================================
// Mock Transcoder
// ============================================================================

/// Transcoder that writes a fixed number of bytes instead of encoding
pub struct MockTranscoder {
    output_bytes: usize,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockTranscoder {
    /// Writes `output_bytes` zero bytes, then applies the real size check
    pub fn writing(output_bytes: usize) -> Self {
        Self {
            output_bytes,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Behaves like an encoder exiting with an error status
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::writing(0)
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<u64, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::metadata(input).await.map_err(TranscodeError::Spawn)?;
        if self.fail {
            return Err(TranscodeError::Failed {
                status: "exit status: 1".to_string(),
                output: "Invalid data found when processing input".to_string(),
            });
        }
        tokio::fs::write(output, vec![0u8; self.output_bytes])
            .await
            .map_err(TranscodeError::Spawn)?;
        verify_output(output, MIN_OUTPUT_BYTES).await
    }
}

// ============================================================================
// Mock Transcriber
// ============================================================================

/// Transcriber returning queued results, optionally held until released
#[derive(Default)]
pub struct MockTranscriber {
    results: Mutex<VecDeque<Result<String, TranscriptionError>>>,
    gate: Option<Arc<Notify>>,
    /// Notified when a transcription starts
    pub started: Arc<Notify>,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every transcription until the returned gate is notified
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn queue_transcript(&self, text: impl Into<String>) {
        self.results.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: TranscriptionError) {
        self.results.lock().unwrap().push_back(Err(error));
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscriptionError> {
        tokio::fs::metadata(audio)
            .await
            .map_err(|source| TranscriptionError::Read {
                path: audio.display().to_string(),
                source,
            })?;
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TranscriptionError::NoTranscript))
    }
}

// ============================================================================
// In-memory Journal
// ============================================================================

#[derive(Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<JournalEntry>>,
    fail: bool,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub async fn wait_for_entries(&self, count: usize) {
        wait_until("journal entries", || self.entries.lock().unwrap().len() >= count).await;
    }
}

#[async_trait]
impl Journal for MemoryJournal {
    async fn record(&self, entry: &JournalEntry) -> Result<(), JournalError> {
        if self.fail {
            return Err(JournalError::Io(std::io::Error::other("disk full")));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

// ============================================================================
// Services builder
// ============================================================================

pub struct ServicesBuilder {
    messenger: Arc<dyn Messenger>,
    transcoder: Arc<dyn Transcoder>,
    transcriber: Arc<dyn Transcriber>,
    journal: Option<Arc<dyn Journal>>,
    scratch_dir: PathBuf,
}

/// Services backed by mocks: a 4 KiB transcode and no queued transcripts
pub fn services(messenger: Arc<dyn Messenger>, scratch_dir: &Path) -> ServicesBuilder {
    ServicesBuilder {
        messenger,
        transcoder: Arc::new(MockTranscoder::writing(4096)),
        transcriber: Arc::new(MockTranscriber::new()),
        journal: None,
        scratch_dir: scratch_dir.to_path_buf(),
    }
}

impl ServicesBuilder {
    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = transcriber;
        self
    }

    pub fn with_journal(mut self, journal: Arc<dyn Journal>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn build(self) -> Services {
        let pipeline = VoicePipeline::new(
            self.messenger.clone(),
            self.transcoder,
            self.transcriber,
            self.scratch_dir,
        );
        Services {
            messenger: self.messenger,
            journal: self.journal,
            pipeline: Arc::new(pipeline),
            lexicon: Arc::new(Lexicon::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::Exercise;
    use crate::journal::MessageKind;
    use crate::mood::Mood;
    use crate::runtime::{ChatRuntime, InboundEvent, RuntimeManager};
    use crate::state_machine::replies::{self, GREETING, HOW_ARE_YOU, TELL_ME_MORE, VOICE_APOLOGY};
    use crate::state_machine::ChatSession;
    use tokio::sync::{mpsc, watch};

    const CHAT: ChatId = 42;

    struct Chat {
        tx: mpsc::UnboundedSender<InboundEvent>,
        state: watch::Receiver<ChatSession>,
    }

    impl Chat {
        fn spawn(services: Services) -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            let (state_tx, state) = watch::channel(ChatSession::idle());
            tokio::spawn(ChatRuntime::new(CHAT, services, rx, state_tx).run());
            Self { tx, state }
        }

        fn text(&self, text: &str) {
            self.tx
                .send(InboundEvent::TextMessage {
                    chat_id: CHAT,
                    sender: "alice".to_string(),
                    text: text.to_string(),
                })
                .unwrap();
        }

        fn voice(&self, attachment: &str) {
            self.tx
                .send(InboundEvent::VoiceMessage {
                    chat_id: CHAT,
                    sender: "alice".to_string(),
                    attachment: attachment.to_string(),
                })
                .unwrap();
        }

        fn press(&self, action_id: &str, event_id: &str) {
            self.tx
                .send(InboundEvent::ButtonPress {
                    chat_id: CHAT,
                    sender: "alice".to_string(),
                    action_id: action_id.to_string(),
                    event_id: event_id.to_string(),
                })
                .unwrap();
        }

        fn session(&self) -> ChatSession {
            *self.state.borrow()
        }
    }

    fn voice_messenger() -> Arc<MockMessenger> {
        Arc::new(MockMessenger::new().with_attachment("voice-1", vec![0x4f; 512]))
    }

    fn is_empty_dir(dir: &Path) -> bool {
        std::fs::read_dir(dir).map_or(true, |mut entries| entries.next().is_none())
    }

    #[tokio::test]
    async fn test_mock_messenger() {
        let messenger = MockMessenger::new().with_attachment("a", vec![1, 2, 3]);
        messenger.send(1, "one", None).await.unwrap();
        messenger.send(2, "two", Some(&Menu::exercises())).await.unwrap();

        assert_eq!(messenger.sent_texts(1), ["one"]);
        assert_eq!(messenger.sent()[1].menu, Some(Menu::exercises()));
        assert_eq!(messenger.fetch_attachment("a").await.unwrap(), [1, 2, 3]);
        assert!(messenger.fetch_attachment("b").await.is_err());
    }

    #[tokio::test]
    async fn test_greeting_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(MockMessenger::new());
        let journal = Arc::new(MemoryJournal::new());
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_journal(journal.clone())
                .build(),
        );

        chat.text("Привет");
        messenger.wait_for_sent(2).await;
        journal.wait_for_entries(1).await;

        assert_eq!(messenger.sent_texts(CHAT), [GREETING, HOW_ARE_YOU]);
        assert!(messenger.sent().iter().all(|r| r.menu.is_none()));
        assert_eq!(chat.session(), ChatSession::awaiting_mood(0));

        let entry = &journal.entries()[0];
        assert_eq!(entry.user_id, CHAT);
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.message_type, MessageKind::Text);
        assert_eq!(entry.content, "привет");
        assert_eq!(entry.bot_response, format!("{GREETING}\n{HOW_ARE_YOU}"));
        assert_eq!(entry.mood, None);
    }

    #[tokio::test]
    async fn test_ignored_text_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(MockMessenger::new());
        let journal = Arc::new(MemoryJournal::new());
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_journal(journal.clone())
                .build(),
        );

        chat.text("как дела");
        chat.text("привет");
        messenger.wait_for_sent(2).await;
        journal.wait_for_entries(1).await;

        // Only the greeting produced output
        assert_eq!(messenger.sent_texts(CHAT), [GREETING, HOW_ARE_YOU]);
        assert_eq!(journal.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_tired_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(MockMessenger::new());
        let journal = Arc::new(MemoryJournal::new());
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_journal(journal.clone())
                .build(),
        );

        chat.text("Привет");
        chat.text("я очень устала");
        messenger.wait_for_sent(3).await;
        journal.wait_for_entries(2).await;

        let reply = &messenger.sent()[2];
        assert_eq!(reply.text, replies::for_mood(Mood::Tired));
        assert_eq!(reply.menu, Some(Menu::exercises()));
        assert_eq!(chat.session(), ChatSession::awaiting_exercise());
        assert_eq!(journal.entries()[1].mood, Some(Mood::Tired));

        // The menu works while awaiting an exercise choice
        chat.press(Exercise::Breathing.action_id(), "cb-1");
        messenger.wait_for_acknowledged(1).await;
        assert_eq!(
            messenger.sent_texts(CHAT).last().map(String::as_str),
            Some(Exercise::Breathing.instructions())
        );
        assert_eq!(chat.session(), ChatSession::awaiting_exercise());
    }

    #[tokio::test]
    async fn test_three_neutral_answers() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(MockMessenger::new());
        let journal = Arc::new(MemoryJournal::new());
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_journal(journal.clone())
                .build(),
        );

        chat.text("привет");
        chat.text("hmm");
        chat.text("ok");
        chat.text("42");
        messenger.wait_for_sent(5).await;
        journal.wait_for_entries(4).await;

        assert_eq!(
            messenger.sent_texts(CHAT),
            [
                GREETING,
                HOW_ARE_YOU,
                TELL_ME_MORE,
                TELL_ME_MORE,
                replies::for_mood(Mood::NeutralFinal)
            ]
        );
        let moods: Vec<_> = journal.entries().iter().map(|e| e.mood).collect();
        assert_eq!(
            moods,
            [None, Some(Mood::Neutral), Some(Mood::Neutral), Some(Mood::NeutralFinal)]
        );
        assert_eq!(chat.session(), ChatSession::idle());
    }

    #[tokio::test]
    async fn test_empty_transcode_apologizes_without_state_change() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("temp");
        let messenger = voice_messenger();
        let journal = Arc::new(MemoryJournal::new());
        let transcriber = Arc::new(MockTranscriber::new());
        transcriber.queue_transcript("я устала");
        let chat = Chat::spawn(
            services(messenger.clone(), &scratch)
                .with_transcoder(Arc::new(MockTranscoder::writing(0)))
                .with_transcriber(transcriber)
                .with_journal(journal.clone())
                .build(),
        );

        chat.text("привет");
        chat.voice("voice-1");
        messenger.wait_for_sent(3).await;

        assert_eq!(messenger.sent_texts(CHAT)[2], VOICE_APOLOGY);
        assert_eq!(chat.session(), ChatSession::awaiting_mood(0));
        assert!(is_empty_dir(&scratch));
        assert_eq!(journal.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_voice_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("temp");
        let messenger = voice_messenger();
        let journal = Arc::new(MemoryJournal::new());
        let transcriber = Arc::new(MockTranscriber::new());
        transcriber.queue_transcript("Я устал.");
        let chat = Chat::spawn(
            services(messenger.clone(), &scratch)
                .with_transcriber(transcriber)
                .with_journal(journal.clone())
                .build(),
        );

        // No greeting needed: voice is classified in any phase
        chat.voice("voice-1");
        messenger.wait_for_sent(1).await;
        journal.wait_for_entries(1).await;

        assert_eq!(messenger.sent()[0].menu, Some(Menu::exercises()));
        assert_eq!(chat.session(), ChatSession::awaiting_exercise());
        let entry = &journal.entries()[0];
        assert_eq!(entry.message_type, MessageKind::Voice);
        assert_eq!(entry.content, "я устал.");
        assert!(is_empty_dir(&scratch));
    }

    #[tokio::test]
    async fn test_transcription_failure_apologizes() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = voice_messenger();
        let transcriber = Arc::new(MockTranscriber::new());
        transcriber.queue_error(TranscriptionError::Status {
            status: 401,
            body: "INVALID_AUTH".to_string(),
        });
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_transcriber(transcriber)
                .build(),
        );

        chat.voice("voice-1");
        messenger.wait_for_sent(1).await;

        assert_eq!(messenger.sent_texts(CHAT), [VOICE_APOLOGY]);
        assert_eq!(chat.session(), ChatSession::idle());
        assert!(is_empty_dir(dir.path()));
    }

    #[tokio::test]
    async fn test_encoder_failure_apologizes() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = voice_messenger();
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_transcoder(Arc::new(MockTranscoder::failing()))
                .build(),
        );

        chat.voice("voice-1");
        messenger.wait_for_sent(1).await;

        assert_eq!(messenger.sent_texts(CHAT), [VOICE_APOLOGY]);
        assert!(is_empty_dir(dir.path()));
    }

    #[tokio::test]
    async fn test_retrieval_failure_apologizes() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = voice_messenger();
        let transcoder = Arc::new(MockTranscoder::writing(4096));
        let calls = transcoder.calls();
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_transcoder(transcoder)
                .build(),
        );

        chat.voice("expired-file");
        messenger.wait_for_sent(1).await;

        assert_eq!(messenger.sent_texts(CHAT), [VOICE_APOLOGY]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(is_empty_dir(dir.path()));
    }

    #[tokio::test]
    async fn test_unknown_button_is_acknowledged_silently() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(MockMessenger::new());
        let journal = Arc::new(MemoryJournal::new());
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_journal(journal.clone())
                .build(),
        );

        chat.press("exercise9", "cb-7");
        messenger.wait_for_acknowledged(1).await;

        assert_eq!(messenger.acknowledged(), ["cb-7"]);
        assert!(messenger.sent().is_empty());
        assert_eq!(messenger.send_attempts.load(Ordering::SeqCst), 0);
        assert_eq!(chat.session(), ChatSession::idle());

        let entries = journal.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message_type, MessageKind::Callback);
        assert_eq!(entries[0].content, "exercise9");
        assert_eq!(entries[0].bot_response, "");
    }

    #[tokio::test]
    async fn test_delivery_failure_keeps_committed_state() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(MockMessenger::new().failing_sends());
        let journal = Arc::new(MemoryJournal::new());
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_journal(journal.clone())
                .build(),
        );

        chat.text("привет");
        chat.text("я очень устала");
        journal.wait_for_entries(2).await;

        assert!(messenger.sent().is_empty());
        assert_eq!(messenger.send_attempts.load(Ordering::SeqCst), 3);
        assert_eq!(chat.session(), ChatSession::awaiting_exercise());
    }

    #[tokio::test]
    async fn test_journal_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(MockMessenger::new());
        let chat = Chat::spawn(
            services(messenger.clone(), dir.path())
                .with_journal(Arc::new(MemoryJournal::failing()))
                .build(),
        );

        chat.text("привет");
        chat.text("я очень устала");
        messenger.wait_for_sent(3).await;

        assert_eq!(chat.session(), ChatSession::awaiting_exercise());
    }

    #[tokio::test]
    async fn test_slow_voice_does_not_block_other_chats() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = voice_messenger();
        let (transcriber, gate) = MockTranscriber::new().gated();
        let transcriber = Arc::new(transcriber);
        transcriber.queue_transcript("Я устал.");
        let started = transcriber.started.clone();

        let manager = RuntimeManager::new(
            services(messenger.clone(), dir.path())
                .with_transcriber(transcriber)
                .build(),
        );

        manager
            .dispatch(InboundEvent::VoiceMessage {
                chat_id: 1,
                sender: "slow".to_string(),
                attachment: "voice-1".to_string(),
            })
            .await;
        // Queued behind the voice turn of the same chat
        manager
            .dispatch(InboundEvent::TextMessage {
                chat_id: 1,
                sender: "slow".to_string(),
                text: "привет".to_string(),
            })
            .await;
        tokio::time::timeout(WAIT_TIMEOUT, started.notified())
            .await
            .expect("transcription should start");

        manager
            .dispatch(InboundEvent::TextMessage {
                chat_id: 2,
                sender: "fast".to_string(),
                text: "Привет".to_string(),
            })
            .await;
        messenger.wait_for_sent(2).await;
        assert_eq!(messenger.sent_texts(2), [GREETING, HOW_ARE_YOU]);
        assert!(messenger.sent_texts(1).is_empty());

        gate.notify_one();
        messenger.wait_for_sent(5).await;
        assert_eq!(
            messenger.sent_texts(1),
            [replies::for_mood(Mood::Tired), GREETING, HOW_ARE_YOU]
        );
        assert_eq!(manager.session(1).await, Some(ChatSession::awaiting_mood(0)));
    }
}
