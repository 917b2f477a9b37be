use std::time::Duration;

pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(800);

pub const DEFAULT_LOADING_TEXTS: [&str; 4] = [
    "ESTABLISHING UPLINK...",
    "CALCULATING VISCOSITY...",
    "ANALYZING AROMATICS...",
    "RENDERING OUTPUT...",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingStep {
    pub text: String,
    pub duration: Duration,
}

/// Scripted status lines shown while an AI request is out. Cosmetic only:
/// the steps run on their own clock and say nothing about the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingTicker {
    steps: Vec<LoadingStep>,
}

impl LoadingTicker {
    pub fn new(steps: Vec<LoadingStep>) -> Self {
        Self { steps }
    }

    pub fn with_step_delay(delay: Duration) -> Self {
        Self::new(
            DEFAULT_LOADING_TEXTS
                .iter()
                .map(|text| LoadingStep {
                    text: text.to_string(),
                    duration: delay,
                })
                .collect(),
        )
    }

    /// No steps; completes immediately.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn steps(&self) -> &[LoadingStep] {
        &self.steps
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Announce each step, then hold it for its duration.
    pub async fn play<F: FnMut(&str)>(&self, mut on_step: F) {
        for step in &self.steps {
            on_step(&step.text);
            tokio::time::sleep(step.duration).await;
        }
    }
}

impl Default for LoadingTicker {
    fn default() -> Self {
        Self::with_step_delay(DEFAULT_STEP_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_script() {
        let ticker = LoadingTicker::default();
        assert_eq!(ticker.steps().len(), 4);
        assert_eq!(ticker.steps()[0].text, "ESTABLISHING UPLINK...");
        assert_eq!(ticker.total_duration(), Duration::from_millis(3200));
    }

    #[tokio::test]
    async fn test_play_announces_steps_in_order() {
        let ticker = LoadingTicker::with_step_delay(Duration::from_millis(1));
        let mut seen = Vec::new();

        ticker.play(|text| seen.push(text.to_string())).await;

        assert_eq!(seen, DEFAULT_LOADING_TEXTS.to_vec());
    }

    #[tokio::test]
    async fn test_silent_ticker() {
        let mut calls = 0;
        LoadingTicker::silent().play(|_| calls += 1).await;
        assert_eq!(calls, 0);
    }
}
