//! Full refresh after a deploy.

use crate::actor::restart::dispatch;
use crate::rcon::{Command, CommandSink};
use crate::resource::autostart::AutoStartList;

/// Send `refresh`, then restart every auto-start resource in order.
///
/// Returns the number of commands the sink accepted. A failed `refresh`
/// is logged and the restarts are still sent.
pub fn full_refresh(sink: &dyn CommandSink, auto_start: &AutoStartList) -> usize {
    let refreshed = match sink.send(&Command::Refresh) {
        Ok(()) => 1,
        Err(e) => {
            crate::log!("rcon"; "refresh: {:#}", anyhow::Error::from(e));
            0
        }
    };

    let ids: Vec<_> = auto_start.iter().cloned().collect();
    refreshed + dispatch(sink, &ids)
}
