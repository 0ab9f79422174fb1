use crate::codec::CodecError;
use crate::model::{ControlMessage, RobotCommand, SignalingMessage};
use serde::{Deserialize, Serialize};

const ROBOT_COMMAND_TYPE: &str = "robot_command";

#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub fn encode<T: Serialize>(msg: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(msg)?)
}

/// Прочитать только дискриминатор `type` (брокеру не нужен весь payload).
pub fn message_type(text: &str) -> Result<String, CodecError> {
    let tag: TypeTag = serde_json::from_str(text)?;
    tag.kind.ok_or(CodecError::MissingType)
}

/// Декодировать кадр брокера. `Ok(None)`: корректный кадр неизвестного типа, его пропускаем.
pub fn decode_signaling(text: &str) -> Result<Option<SignalingMessage>, CodecError> {
    match serde_json::from_str::<SignalingMessage>(text)? {
        SignalingMessage::Unknown => Ok(None),
        msg => Ok(Some(msg)),
    }
}

/// Декодировать кадр канала управления. `Ok(None)`: тип, который мы не знаем.
pub fn decode_control(text: &str) -> Result<Option<ControlMessage>, CodecError> {
    match serde_json::from_str::<ControlMessage>(text)? {
        ControlMessage::Other => Ok(None),
        msg => Ok(Some(msg)),
    }
}

/// Входящий кадр канала управления. Всё, что не `robot_command`, молча игнорируется.
pub fn decode_command(text: &str) -> Result<Option<RobotCommand>, CodecError> {
    let kind = match message_type(text) {
        Ok(kind) => kind,
        Err(CodecError::MissingType) => return Ok(None),
        Err(e) => return Err(e),
    };
    if kind != ROBOT_COMMAND_TYPE {
        return Ok(None);
    }

    match decode_control(text)? {
        Some(ControlMessage::RobotCommand(cmd)) => Ok(Some(cmd)),
        _ => Ok(None),
    }
}
