use super::*;

const OP_PUSHDATA1: u8 = opcodes::all::OP_PUSHDATA1.to_u8();

/// Append `data` to `script` as a single push.
///
/// Empty pushes are written as `OP_PUSHDATA1 0x00`, since a bare OP_0 is not
/// accepted by decoders.
pub(crate) fn push(data: &[u8], script: &mut Vec<u8>) -> Result<(), Error> {
  match data.len() {
    0 => script.extend_from_slice(&[OP_PUSHDATA1, 0]),
    len @ 1..=75 => script.push(u8::try_from(len).map_err(|_| Error::PushSize(len))?),
    len @ 76..=255 => {
      script.push(OP_PUSHDATA1);
      script.push(u8::try_from(len).map_err(|_| Error::PushSize(len))?);
    }
    len => return Err(Error::PushSize(len)),
  }

  script.extend_from_slice(data);

  Ok(())
}

/// Split an OP_RETURN script into the payloads of the pushes that follow the
/// OP_RETURN.
pub(crate) fn pushes(script: &Script) -> Result<Vec<&[u8]>, Error> {
  let bytes = script.as_bytes();

  if bytes.first() != Some(&opcodes::all::OP_RETURN.to_u8()) {
    return Err(Error::NotOpReturn);
  }

  let body = Script::from_bytes(&bytes[1..]);

  let mut pushes = Vec::new();

  for result in body.instruction_indices() {
    match result {
      Ok((index, Instruction::PushBytes(push))) => {
        if body.as_bytes()[index] == opcodes::OP_0.to_u8() {
          return Err(Error::OpZero);
        }

        pushes.push(push.as_bytes());
      }
      Ok((_, Instruction::Op(_))) => return Err(Error::Opcode),
      Err(_) => return Err(Error::InvalidScript),
    }
  }

  Ok(pushes)
}
