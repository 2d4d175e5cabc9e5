use crate::rcon::{Command, CommandSink};
use crate::resource::ResourceId;

/// Send one `restart <id>` per resource, in order.
///
/// Fire-and-forget: a failed send is logged and dropped, and the rest of the
/// batch still goes out. Returns how many commands the sink accepted.
pub fn dispatch(sink: &dyn CommandSink, ids: &[ResourceId]) -> usize {
    let mut sent = 0;
    for id in ids {
        match sink.send(&Command::Restart(id.clone())) {
            Ok(()) => sent += 1,
            Err(e) => crate::log!("restart"; "{}: {:#}", id, anyhow::Error::from(e)),
        }
    }
    sent
}
