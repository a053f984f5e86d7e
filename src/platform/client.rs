use async_trait::async_trait;
use serde_json::Value;

use crate::error::PlatformError;
use crate::platform::method::SendMethod;

/// The messaging-platform API a context wraps.
///
/// Implementations own transport, auth and payload shaping. Every operation
/// is addressed to a platform user id and resolves with the platform's raw
/// response.
#[async_trait]
pub trait PlatformClient: Send + Sync + 'static {
    /// Backend identity reported by contexts over this client (e.g. "messenger").
    const PLATFORM: &'static str;

    /// Send a plain text message.
    async fn send_text(
        &self,
        user_id: &str,
        text: &str,
        options: Option<Value>,
    ) -> Result<Value, PlatformError>;

    /// Invoke one of the table-driven send operations with positional args.
    ///
    /// Default: reject as unsupported, so clients only implement what their
    /// platform offers.
    async fn send(
        &self,
        method: SendMethod,
        user_id: &str,
        args: Vec<Value>,
    ) -> Result<Value, PlatformError> {
        let _ = (user_id, args);
        Err(PlatformError::Unsupported {
            platform: Self::PLATFORM.to_string(),
            operation: method.name().to_string(),
        })
    }

    /// Show the typing indicator to the user.
    async fn typing_on(&self, user_id: &str) -> Result<Value, PlatformError>;

    /// Hide the typing indicator.
    async fn typing_off(&self, user_id: &str) -> Result<Value, PlatformError>;
}
