use crate::Result;
use crate::cards::CardRecord;

/// A streaming sink for cards.
///
/// Encoders write each card as it arrives; `close` finishes the format and flushes. Callers
/// must always call `close`, including after a failed run.
pub trait CardEncoder {
    fn write_card(&mut self, card: &CardRecord) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
