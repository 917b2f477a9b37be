use async_trait::async_trait;

/// Turns a prompt pair into display text. Failures come back as text too
/// (`Error: ...`): AI errors are terminal and shown to the user verbatim.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> String;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for Box<T> {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> String {
        (**self).complete(prompt, system_prompt).await
    }
}

/// Source of the upstream API key. Read once per proxied request.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}
