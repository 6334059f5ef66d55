//! Base64 encode/decode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use strum_macros::EnumString;

use crate::error_handling::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Base64Action {
    Encode,
    Decode,
}

/// Encodes text as standard base64, or decodes base64 into UTF-8 text.
///
/// Input that is not valid base64, or that decodes to bytes which are not
/// UTF-8, is rejected with a 400.
pub fn base64_convert(action: Option<&str>, text: Option<&str>) -> Result<String, ApiError> {
    let (Some(action), Some(text)) = (action, text) else {
        return Err(ApiError::bad_request("Missing text or action"));
    };
    let action: Base64Action = action
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Action must be 'encode' or 'decode'"))?;

    match action {
        Base64Action::Encode => Ok(STANDARD.encode(text)),
        Base64Action::Decode => {
            let bytes = STANDARD
                .decode(text.trim())
                .map_err(|_| ApiError::bad_request("Conversion failed"))?;
            String::from_utf8(bytes).map_err(|_| ApiError::bad_request("Conversion failed"))
        }
    }
}
