use pennypost_proto::SendMessageRequest;

use super::TextField;

/// Fields of the send-message form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageField {
    /// Recipient's login name.
    Recipient,
    /// Message text.
    Content,
}

/// Send-message form state.
#[derive(Debug, Clone, Default)]
pub struct SendMessageForm {
    /// Recipient's login name.
    pub recipient: TextField,
    /// Message text.
    pub content: TextField,
    /// A send is in flight.
    pub pending: bool,
}

impl SendMessageForm {
    /// Field by name.
    pub fn field_mut(&mut self, field: MessageField) -> &mut TextField {
        match field {
            MessageField::Recipient => &mut self.recipient,
            MessageField::Content => &mut self.content,
        }
    }

    /// Submission needs a recipient and content, and nothing pending.
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.recipient.is_empty() && !self.content.is_empty()
    }

    /// Request body for the current input.
    pub fn request(&self) -> SendMessageRequest {
        SendMessageRequest {
            recipient_username: self.recipient.value().to_string(),
            content: self.content.value().to_string(),
        }
    }

    /// Clear input after a successful send.
    pub fn clear(&mut self) {
        self.recipient.clear();
        self.content.clear();
    }
}
