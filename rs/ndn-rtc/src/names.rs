//! Name component literals of the stream hierarchy.
//!
//! The full layout under a stream prefix `<base>/<timestamp>/<stream>`:
//!
//! ```text
//! <prefix>/_meta                          stream metadata
//! <prefix>/<frame>/<seg>                  data segments
//! <prefix>/<frame>/parity/<seg>           parity segments
//! <prefix>/<frame>/_manifest              segment digests
//! <prefix>/<frame>/_meta                  frame metadata
//! <prefix>/_gop/<n>/start                 pointer to the first frame of GoP n
//! <prefix>/_gop/<n>/end                   pointer to the last frame of GoP n-1
//! <prefix>/_latest/<ms>                   newest frame + GoP pointers
//! <prefix>/_live/<ms>                     publish rate and segment profile
//! ```

pub const META: &str = "_meta";
pub const MANIFEST: &str = "_manifest";
pub const GOP: &str = "_gop";
pub const LATEST: &str = "_latest";
pub const LIVE: &str = "_live";
pub const PARITY: &str = "parity";
pub const GOP_START: &str = "start";
pub const GOP_END: &str = "end";
