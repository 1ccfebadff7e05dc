use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use partner_chat_model::{
    ErrorKind, ModelCompletion, ModelMessage, ModelProvider,
    ModelProviderError, ModelRequest,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message back after a short pause.
struct EchoModelProvider;

impl ModelProvider for EchoModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelCompletion, Self::Error>> + Send + 'static
    {
        let user_text = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            ModelMessage::System(_) => None,
        });
        async move {
            sleep(Duration::from_millis(1)).await;
            let Some(text) = user_text else {
                return Err(FakeModelProviderError(ErrorKind::Status(400)));
            };
            Ok(ModelCompletion::new(format!("AI: You said {text}")))
        }
    }
}

#[tokio::test]
async fn test_completion() {
    let provider = EchoModelProvider;
    let req = ModelRequest::with_system_and_user("Be brief.", "Good morning");
    let completion = provider.send_request(&req).await.unwrap();
    assert_eq!(completion.content, "AI: You said Good morning");
}

#[tokio::test]
async fn test_error() {
    let provider = EchoModelProvider;
    let req = ModelRequest {
        messages: vec![ModelMessage::System("Be brief.".to_owned())],
    };
    let err = provider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status(400));
}

#[test]
fn test_request_order() {
    let req = ModelRequest::with_system_and_user("sys", "usr");
    assert_eq!(
        req.messages,
        vec![
            ModelMessage::System("sys".to_owned()),
            ModelMessage::User("usr".to_owned()),
        ]
    );
    assert_eq!(req.messages[1].content(), "usr");
}
