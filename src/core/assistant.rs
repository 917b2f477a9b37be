//! One AI "modal": a single response slot shared by every request made
//! through it.
//!
//! Requests are numbered. Only the newest number may drive the loading
//! display; any request that finishes writes its text into the slot, so the
//! last write wins.

use crate::core::loading::LoadingTicker;
use crate::core::prompts::PromptPair;
use crate::domain::ports::CompletionBackend;
use tokio::sync::watch;

pub const NO_DATA: &str = "NO DATA RECEIVED.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotState {
    pub generation: u64,
    pub loading: bool,
    pub loading_text: Option<String>,
    pub response: Option<String>,
}

impl SlotState {
    pub fn display_text(&self) -> &str {
        match self.response.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => NO_DATA,
        }
    }
}

pub struct AssistantSession<B: CompletionBackend> {
    backend: B,
    ticker: LoadingTicker,
    slot: watch::Sender<SlotState>,
}

impl<B: CompletionBackend> AssistantSession<B> {
    pub fn new(backend: B, ticker: LoadingTicker) -> Self {
        let (slot, _) = watch::channel(SlotState::default());
        Self {
            backend,
            ticker,
            slot,
        }
    }

    /// Watch slot changes (loading text, responses).
    pub fn subscribe(&self) -> watch::Receiver<SlotState> {
        self.slot.subscribe()
    }

    pub fn snapshot(&self) -> SlotState {
        self.slot.borrow().clone()
    }

    /// Drop the shown response, e.g. to start a new search.
    pub fn clear(&self) {
        self.slot.send_modify(|s| s.response = None);
    }

    /// Run the ticker and the backend call side by side, store the result
    /// and return it.
    pub async fn request(&self, pair: &PromptPair) -> String {
        let mut generation = 0;
        self.slot.send_modify(|s| {
            s.generation += 1;
            s.loading = true;
            s.loading_text = None;
            generation = s.generation;
        });
        tracing::debug!("AI request #{} started", generation);

        let ticker = self.ticker.play(|text| {
            self.slot.send_if_modified(|s| {
                if s.generation != generation {
                    return false;
                }
                s.loading_text = Some(text.to_string());
                true
            });
        });
        let call = self.backend.complete(&pair.prompt, &pair.system_prompt);
        let ((), response) = tokio::join!(ticker, call);

        self.slot.send_modify(|s| {
            s.response = Some(response.clone());
            if s.generation == generation {
                s.loading = false;
                s.loading_text = None;
            }
        });
        tracing::debug!("AI request #{} finished ({} chars)", generation, response.len());

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct EchoBackend {
        delay: Duration,
    }

    #[async_trait]
    impl CompletionBackend for EchoBackend {
        async fn complete(&self, prompt: &str, _system_prompt: &str) -> String {
            tokio::time::sleep(self.delay).await;
            format!("echo: {}", prompt)
        }
    }

    fn pair(prompt: &str) -> PromptPair {
        PromptPair {
            prompt: prompt.to_string(),
            system_prompt: "sys".to_string(),
        }
    }

    #[tokio::test]
    async fn test_request_fills_slot() {
        let session = AssistantSession::new(
            EchoBackend {
                delay: Duration::ZERO,
            },
            LoadingTicker::silent(),
        );

        let response = session.request(&pair("latte")).await;
        assert_eq!(response, "echo: latte");

        let state = session.snapshot();
        assert_eq!(state.generation, 1);
        assert!(!state.loading);
        assert_eq!(state.display_text(), "echo: latte");
    }

    #[tokio::test]
    async fn test_empty_slot_shows_placeholder() {
        let session = AssistantSession::new(
            EchoBackend {
                delay: Duration::ZERO,
            },
            LoadingTicker::silent(),
        );
        assert_eq!(session.snapshot().display_text(), NO_DATA);

        session.request(&pair("x")).await;
        session.clear();
        assert_eq!(session.snapshot().display_text(), NO_DATA);
    }

    #[tokio::test]
    async fn test_ticker_updates_loading_text() {
        let session = AssistantSession::new(
            EchoBackend {
                delay: Duration::from_millis(20),
            },
            LoadingTicker::with_step_delay(Duration::from_millis(1)),
        );
        let mut rx = session.subscribe();

        let watcher = tokio::spawn(async move {
            let mut texts = Vec::new();
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                if let Some(text) = state.loading_text {
                    if texts.last() != Some(&text) {
                        texts.push(text);
                    }
                }
                if state.response.is_some() {
                    break;
                }
            }
            texts
        });

        session.request(&pair("x")).await;
        let texts = watcher.await.unwrap();

        assert_eq!(texts.first().map(String::as_str), Some("ESTABLISHING UPLINK..."));
        assert!(!session.snapshot().loading);
    }

    #[tokio::test]
    async fn test_last_write_wins_and_newest_owns_loading() {
        let slow = AssistantSession::new(DelayByPrompt, LoadingTicker::silent());

        let slow_pair = pair("slow");
        let fast_pair = pair("fast");
        let (first, second) = tokio::join!(slow.request(&slow_pair), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            slow.request(&fast_pair).await
        });

        assert_eq!(first, "slow done");
        assert_eq!(second, "fast done");

        let state = slow.snapshot();
        assert_eq!(state.generation, 2);
        assert_eq!(state.response.as_deref(), Some("slow done"));
        assert!(!state.loading);
    }

    struct DelayByPrompt;

    #[async_trait]
    impl CompletionBackend for DelayByPrompt {
        async fn complete(&self, prompt: &str, _system_prompt: &str) -> String {
            let delay = if prompt == "slow" { 60 } else { 1 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            format!("{} done", prompt)
        }
    }
}
