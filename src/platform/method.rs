//! The fixed table of pass-through send operations.
//!
//! Every entry forwards `(user_id, ...args)` to the same-named client
//! operation. `send_text` is not in the table because it has its own
//! signature with optional send options.

use std::fmt;
use std::str::FromStr;

/// A generic send operation exposed on every conversation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendMethod {
    Attachment,
    Image,
    Audio,
    Video,
    File,
    QuickReplies,
    GenericTemplate,
    ButtonTemplate,
    ListTemplate,
    ReceiptTemplate,
    AirlineBoardingPassTemplate,
    AirlineCheckinTemplate,
    AirlineItineraryTemplate,
    AirlineFlightUpdateTemplate,
}

impl SendMethod {
    pub const ALL: [SendMethod; 14] = [
        SendMethod::Attachment,
        SendMethod::Image,
        SendMethod::Audio,
        SendMethod::Video,
        SendMethod::File,
        SendMethod::QuickReplies,
        SendMethod::GenericTemplate,
        SendMethod::ButtonTemplate,
        SendMethod::ListTemplate,
        SendMethod::ReceiptTemplate,
        SendMethod::AirlineBoardingPassTemplate,
        SendMethod::AirlineCheckinTemplate,
        SendMethod::AirlineItineraryTemplate,
        SendMethod::AirlineFlightUpdateTemplate,
    ];

    /// Name of the client operation this method invokes.
    pub fn name(self) -> &'static str {
        match self {
            SendMethod::Attachment => "sendAttachment",
            SendMethod::Image => "sendImage",
            SendMethod::Audio => "sendAudio",
            SendMethod::Video => "sendVideo",
            SendMethod::File => "sendFile",
            SendMethod::QuickReplies => "sendQuickReplies",
            SendMethod::GenericTemplate => "sendGenericTemplate",
            SendMethod::ButtonTemplate => "sendButtonTemplate",
            SendMethod::ListTemplate => "sendListTemplate",
            SendMethod::ReceiptTemplate => "sendReceiptTemplate",
            SendMethod::AirlineBoardingPassTemplate => "sendAirlineBoardingPassTemplate",
            SendMethod::AirlineCheckinTemplate => "sendAirlineCheckinTemplate",
            SendMethod::AirlineItineraryTemplate => "sendAirlineItineraryTemplate",
            SendMethod::AirlineFlightUpdateTemplate => "sendAirlineFlightUpdateTemplate",
        }
    }

    /// Name of the deprecated explicit-delay variant.
    pub fn with_delay_name(self) -> &'static str {
        match self {
            SendMethod::Attachment => "sendAttachmentWithDelay",
            SendMethod::Image => "sendImageWithDelay",
            SendMethod::Audio => "sendAudioWithDelay",
            SendMethod::Video => "sendVideoWithDelay",
            SendMethod::File => "sendFileWithDelay",
            SendMethod::QuickReplies => "sendQuickRepliesWithDelay",
            SendMethod::GenericTemplate => "sendGenericTemplateWithDelay",
            SendMethod::ButtonTemplate => "sendButtonTemplateWithDelay",
            SendMethod::ListTemplate => "sendListTemplateWithDelay",
            SendMethod::ReceiptTemplate => "sendReceiptTemplateWithDelay",
            SendMethod::AirlineBoardingPassTemplate => "sendAirlineBoardingPassTemplateWithDelay",
            SendMethod::AirlineCheckinTemplate => "sendAirlineCheckinTemplateWithDelay",
            SendMethod::AirlineItineraryTemplate => "sendAirlineItineraryTemplateWithDelay",
            SendMethod::AirlineFlightUpdateTemplate => "sendAirlineFlightUpdateTemplateWithDelay",
        }
    }
}

impl fmt::Display for SendMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SendMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SendMethod::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown send method '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: HashSet<_> = SendMethod::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), SendMethod::ALL.len());
        for method in SendMethod::ALL {
            assert_eq!(method.name().parse::<SendMethod>().unwrap(), method);
        }
    }

    #[test]
    fn with_delay_name_extends_base_name() {
        for method in SendMethod::ALL {
            assert_eq!(
                method.with_delay_name(),
                format!("{}WithDelay", method.name())
            );
        }
    }

    #[test]
    fn send_text_is_not_a_table_entry() {
        assert!("sendText".parse::<SendMethod>().is_err());
    }
}
