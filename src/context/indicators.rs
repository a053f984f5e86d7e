//! Hooks that pace a context's queue with typing indicators.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HookError;
use crate::platform::PlatformClient;
use crate::queue::{JobHook, JobPacing};

/// Before-hook: typing on (when requested), then wait out the job's delay.
pub(crate) struct TypingThenPause<C> {
    pub(crate) client: Arc<C>,
    pub(crate) user_id: Option<String>,
}

#[async_trait]
impl<C: PlatformClient> JobHook for TypingThenPause<C> {
    fn name(&self) -> &str {
        "typing_then_pause"
    }

    async fn run(&self, pacing: JobPacing) -> Result<(), HookError> {
        if pacing.show_indicators
            && let Some(user_id) = &self.user_id
        {
            self.client.typing_on(user_id).await?;
        }
        tokio::time::sleep(pacing.delay).await;
        Ok(())
    }
}

/// After-hook: typing off (when requested).
pub(crate) struct TypingOff<C> {
    pub(crate) client: Arc<C>,
    pub(crate) user_id: Option<String>,
}

#[async_trait]
impl<C: PlatformClient> JobHook for TypingOff<C> {
    fn name(&self) -> &str {
        "typing_off"
    }

    async fn run(&self, pacing: JobPacing) -> Result<(), HookError> {
        if pacing.show_indicators
            && let Some(user_id) = &self.user_id
        {
            self.client.typing_off(user_id).await?;
        }
        Ok(())
    }
}
