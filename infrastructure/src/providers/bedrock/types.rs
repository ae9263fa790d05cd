//! Type conversions between AWS Bedrock SDK and domain types
//!
//! Converts a participant transcript into Converse request blocks and SDK
//! errors into [`GatewayError`].

use arena_application::ports::llm_gateway::GatewayError;
use arena_domain::{Message, Role};
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::operation::converse_stream::ConverseStreamError;
use aws_sdk_bedrockruntime::types as bedrock;

/// Placeholder user turn for transcripts that open with the participant's
/// own line. Converse requires the first message to come from the user.
const OPENING_USER_TURN: &str = "Begin.";

/// Request payload for one Converse call
#[derive(Debug)]
pub struct ConverseInput {
    pub system: Vec<bedrock::SystemContentBlock>,
    pub messages: Vec<bedrock::Message>,
}

/// Convert a transcript into Converse system blocks and messages.
///
/// Consecutive entries with the same role are merged. When `system_supported`
/// is false the system text is prepended to the first user message.
pub fn to_converse_input(
    transcript: &[Message],
    system_supported: bool,
) -> Result<ConverseInput, GatewayError> {
    let system_text: Vec<&str> = transcript
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let mut turns: Vec<(bedrock::ConversationRole, String)> = Vec::new();
    for message in transcript.iter().filter(|m| m.role != Role::System) {
        let role = match message.role {
            Role::Assistant => bedrock::ConversationRole::Assistant,
            _ => bedrock::ConversationRole::User,
        };
        match turns.last_mut() {
            Some((last_role, text)) if *last_role == role => {
                text.push_str("\n\n");
                text.push_str(&message.content);
            }
            _ => turns.push((role, message.content.clone())),
        }
    }

    if turns
        .first()
        .is_none_or(|(role, _)| *role != bedrock::ConversationRole::User)
    {
        turns.insert(
            0,
            (bedrock::ConversationRole::User, OPENING_USER_TURN.to_string()),
        );
    }

    let mut system = Vec::new();
    if !system_text.is_empty() {
        let joined = system_text.join("\n\n");
        if system_supported {
            system.push(bedrock::SystemContentBlock::Text(joined));
        } else if let Some((_, first)) = turns.first_mut() {
            *first = format!("{}\n\n{}", joined, first);
        }
    }

    let messages = turns
        .into_iter()
        .map(|(role, text)| {
            bedrock::Message::builder()
                .role(role)
                .set_content(Some(vec![bedrock::ContentBlock::Text(text)]))
                .build()
                .map_err(|e| GatewayError::RequestFailed(format!("Failed to build message: {}", e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConverseInput { system, messages })
}

/// Concatenate the text blocks of a Converse output.
pub fn output_text(output: Option<&bedrock::ConverseOutput>) -> String {
    match output {
        Some(bedrock::ConverseOutput::Message(message)) => message
            .content()
            .iter()
            .filter_map(|block| match block {
                bedrock::ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect(),
        _ => String::new(),
    }
}

pub fn convert_converse_error(err: &SdkError<ConverseError>) -> GatewayError {
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            ConverseError::ThrottlingException(e) => {
                GatewayError::RequestFailed(format!("Bedrock throttled: {}", e))
            }
            ConverseError::ModelNotReadyException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not ready: {}", e))
            }
            ConverseError::ResourceNotFoundException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not found: {}", e))
            }
            ConverseError::ValidationException(e) => {
                GatewayError::RequestFailed(format!("Bedrock validation error: {}", e))
            }
            ConverseError::ModelTimeoutException(e) => {
                GatewayError::RequestFailed(format!("Bedrock model timed out: {}", e))
            }
            other => GatewayError::RequestFailed(format!("Bedrock error: {:?}", other)),
        },
        other => GatewayError::ConnectionError(format!("Bedrock SDK error: {}", other)),
    }
}

pub fn convert_converse_stream_error(err: &SdkError<ConverseStreamError>) -> GatewayError {
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            ConverseStreamError::ThrottlingException(e) => {
                GatewayError::RequestFailed(format!("Bedrock throttled: {}", e))
            }
            ConverseStreamError::ModelNotReadyException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not ready: {}", e))
            }
            ConverseStreamError::ResourceNotFoundException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not found: {}", e))
            }
            ConverseStreamError::ValidationException(e) => {
                GatewayError::RequestFailed(format!("Bedrock validation error: {}", e))
            }
            other => GatewayError::RequestFailed(format!("Bedrock error: {:?}", other)),
        },
        other => GatewayError::ConnectionError(format!("Bedrock SDK error: {}", other)),
    }
}
