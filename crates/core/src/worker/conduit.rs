//! Single-slot hand-off between the record source and the workers.

use crate::record::Record;

/// At most one record waits in the conduit; the next send blocks until a
/// worker takes it.
pub const CONDUIT_CAPACITY: usize = 1;

pub type RecordSender = async_channel::Sender<Record>;
pub type RecordReceiver = async_channel::Receiver<Record>;

/// Create the conduit. Dropping every sender closes it; receivers still
/// drain whatever is buffered before seeing the close.
pub fn dispatch_conduit() -> (RecordSender, RecordReceiver) {
    async_channel::bounded(CONDUIT_CAPACITY)
}
